//! Collaborators the game loop drives
//!
//! The engine only talks to the outside world through these traits: a clock,
//! a joystick, and a round display addressed in lattice cells. High score
//! storage lives in [`crate::storage`].

pub mod clock;
#[cfg(test)]
pub(crate) mod testing;

pub use clock::{Clock, ManualClock, MonotonicClock};

use crate::game::{Input, Position};

/// Non-blocking source of joystick readings
pub trait InputSource {
    /// Return what is held right now, or [`Input::None`]
    fn poll(&mut self) -> Input;
}

/// What a cell or a line of text represents; the display picks the colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tint {
    SnakeHead,
    SnakeBody,
    Food,
    Alert,
    Text,
}

/// A centred line of text on the given row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub row: u8,
    pub text: String,
    pub tint: Tint,
}

impl TextLine {
    pub fn new(row: u8, text: impl Into<String>, tint: Tint) -> Self {
        Self {
            row,
            text: text.into(),
            tint,
        }
    }
}

/// A display addressed in lattice cells.
///
/// Translating cells to pixels (or terminal columns) is the implementor's job.
pub trait Renderer {
    /// Blank the whole screen
    fn clear(&mut self);

    fn draw_cell(&mut self, position: Position, tint: Tint);

    fn clear_cell(&mut self, position: Position);

    fn draw_text(&mut self, lines: &[TextLine]);

    /// Push pending drawing to the device
    fn present(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
