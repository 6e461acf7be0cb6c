//! In-memory collaborators for engine tests

use std::collections::{HashMap, VecDeque};

use super::{InputSource, Renderer, TextLine, Tint};
use crate::game::{Input, Position};

/// Hands out queued readings, then `Input::None` forever
#[derive(Debug, Default)]
pub struct ScriptedInput {
    queue: VecDeque<Input>,
    pub polls: usize,
}

impl ScriptedInput {
    pub fn push(&mut self, input: impl Into<Input>) {
        self.queue.push_back(input.into());
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Input {
        self.polls += 1;
        self.queue.pop_front().unwrap_or_default()
    }
}

/// Keeps the screen as a cell map and counts calls
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub cells: HashMap<Position, Tint>,
    pub text: Vec<TextLine>,
    pub clears: usize,
    pub frames: usize,
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.cells.clear();
        self.text.clear();
        self.clears += 1;
    }

    fn draw_cell(&mut self, position: Position, tint: Tint) {
        self.cells.insert(position, tint);
    }

    fn clear_cell(&mut self, position: Position) {
        self.cells.remove(&position);
    }

    fn draw_text(&mut self, lines: &[TextLine]) {
        self.text.extend_from_slice(lines);
    }

    fn present(&mut self) -> anyhow::Result<()> {
        self.frames += 1;
        Ok(())
    }
}
