use rand::Rng;
use std::f64::consts::TAU;
use tracing::debug;

use super::state::{Position, Snake, is_inside};

/// Result of moving the food
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Placed(Position),
    /// Every cell of the disk is covered by the snake
    BoardFull,
}

/// The single piece of food on the board
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    position: Position,
    border_radius: i32,
}

impl Food {
    /// Food starts just inside the right edge, before its first relocation.
    pub fn new(border_radius: i32) -> Self {
        Self {
            position: Position::new(border_radius - 1, 0),
            border_radius,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Put the food on a specific cell
    pub fn place_at(&mut self, position: Position) {
        self.position = position;
    }

    /// Move the food to a uniformly random free cell of the disk.
    ///
    /// Samples are redrawn when they round to a cell outside the disk or on
    /// the snake. After `max_attempts` misses the disk is scanned row by row
    /// and the first free cell is taken.
    pub fn relocate<R: Rng + ?Sized>(
        &mut self,
        snake: &Snake,
        rng: &mut R,
        max_attempts: u32,
    ) -> Placement {
        for _ in 0..max_attempts {
            let candidate = sample_disk(self.border_radius, rng);
            if is_inside(candidate, self.border_radius) && !snake.occupies(candidate) {
                self.position = candidate;
                return Placement::Placed(candidate);
            }
        }

        debug!(
            attempts = max_attempts,
            "random food placement exhausted, scanning for a free cell"
        );
        match first_free_cell(self.border_radius, snake) {
            Some(cell) => {
                self.position = cell;
                Placement::Placed(cell)
            }
            None => Placement::BoardFull,
        }
    }
}

/// Draw a point uniformly from the disk and round it to the lattice.
pub fn sample_disk<R: Rng + ?Sized>(radius: i32, rng: &mut R) -> Position {
    let r = radius as f64 * rng.r#gen::<f64>().sqrt();
    let theta = TAU * rng.r#gen::<f64>();
    Position::new(
        (r * theta.cos()).round() as i32,
        (r * theta.sin()).round() as i32,
    )
}

fn first_free_cell(radius: i32, snake: &Snake) -> Option<Position> {
    (-radius..=radius)
        .flat_map(|y| (-radius..=radius).map(move |x| Position::new(x, y)))
        .find(|&cell| is_inside(cell, radius) && !snake.occupies(cell))
}
