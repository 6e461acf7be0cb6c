use std::collections::VecDeque;

use super::action::{Axis, Direction};
use super::food::Food;

/// A position on the game lattice, with the origin at the centre of the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// True if `position` lies within Euclidean distance `radius` of the origin.
pub fn is_inside(position: Position, radius: i32) -> bool {
    let (x, y, r) = (position.x as i64, position.y as i64, radius as i64);
    x * x + y * y <= r * r
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    head: Position,
    prev_head: Position,
    /// Heading used by the next step
    direction: Direction,
    /// Heading used by the last step; turns are judged against it
    moving: Direction,
    length: usize,
    /// Recent head positions, most recent first
    history: VecDeque<Position>,
    border_radius: i32,
    initial_length: usize,
}

impl Snake {
    /// Create a snake at the origin, heading left, with its tail trailing along +x.
    pub fn new(border_radius: i32, initial_length: usize) -> Self {
        let mut snake = Self {
            head: Position::new(0, 0),
            prev_head: Position::new(0, 0),
            direction: Direction::Left,
            moving: Direction::Left,
            length: initial_length,
            history: VecDeque::with_capacity(initial_length + 1),
            border_radius,
            initial_length,
        };
        snake.reset();
        snake
    }

    /// Create a snake from an explicit trail, most recent first.
    ///
    /// The first entry becomes the head and the trail length becomes the
    /// snake length. Panics if `history` is empty.
    pub fn with_history(border_radius: i32, history: Vec<Position>, direction: Direction) -> Self {
        assert!(!history.is_empty(), "a snake needs at least a head");
        let head = history[0];
        let length = history.len();
        Self {
            head,
            prev_head: head,
            direction,
            moving: direction,
            length,
            history: history.into(),
            border_radius,
            initial_length: length,
        }
    }

    /// Restore the starting state
    pub fn reset(&mut self) {
        self.length = self.initial_length;
        self.head = Position::new(0, 0);
        self.prev_head = Position::new(0, 0);
        self.direction = Direction::Left;
        self.moving = Direction::Left;
        self.history = (0..self.initial_length as i32)
            .map(|x| Position::new(x, 0))
            .collect();
    }

    /// Where the head lands on the next step.
    ///
    /// Leaving the disk mirrors the moving coordinate through the centre, so
    /// the snake re-enters on the far side of the same row or column.
    pub fn next_position(&self) -> Position {
        let next = self.head.moved_in_direction(self.direction);
        if is_inside(next, self.border_radius) {
            return next;
        }

        match self.direction.axis() {
            Axis::Horizontal => Position::new(-self.head.x, self.head.y),
            Axis::Vertical => Position::new(self.head.x, -self.head.y),
        }
    }

    /// Advance one cell. Returns the tail cell that dropped out of the trail, if any.
    ///
    /// The trail is truncated to the current length, so a length increase
    /// becomes visible one cell per following step.
    pub fn step(&mut self) -> Option<Position> {
        let next = self.next_position();
        self.prev_head = self.head;
        self.head = next;
        self.moving = self.direction;

        self.history.push_front(next);
        let vacated = if self.history.len() > self.length {
            self.history.back().copied()
        } else {
            None
        };
        self.history.truncate(self.length);
        vacated
    }

    /// Request a new heading. Only quarter turns are accepted; returns whether it was.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.moving.is_perpendicular(direction) {
            self.direction = direction;
            true
        } else {
            false
        }
    }

    /// Lengthen the snake by one cell
    pub fn grow(&mut self) {
        self.length += 1;
    }

    /// True if the head sits on another part of the trail
    pub fn is_overlapping(&self) -> bool {
        self.body().any(|pos| pos == self.head)
    }

    /// Check if position is anywhere on the trail, head included
    pub fn occupies(&self, pos: Position) -> bool {
        self.history.contains(&pos)
    }

    pub fn head(&self) -> Position {
        self.head
    }

    pub fn prev_head(&self) -> Position {
        self.prev_head
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn history(&self) -> &VecDeque<Position> {
        &self.history
    }

    /// Trail entries behind the head
    pub fn body(&self) -> impl Iterator<Item = Position> + '_ {
        self.history.iter().skip(1).copied()
    }
}

/// Phase of the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Food,
    pub score: u32,
    pub steps: u32,
    /// Clock reading at the last simulation step
    pub last_step_ms: u32,
    pub phase: GamePhase,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Food, now_ms: u32) -> Self {
        Self {
            snake,
            food,
            score: 0,
            steps: 0,
            last_step_ms: now_ms,
            phase: GamePhase::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}
