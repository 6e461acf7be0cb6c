use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Direction, Input};
use crate::platform::InputSource;

/// The five joystick contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Right,
    Down,
    Left,
    Up,
    Select,
}

impl Button {
    /// Resolution order when several contacts are held at once
    pub const PRIORITY: [Button; 5] = [
        Button::Right,
        Button::Down,
        Button::Left,
        Button::Up,
        Button::Select,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn input(self) -> Input {
        match self {
            Button::Right => Input::Move(Direction::Right),
            Button::Down => Input::Move(Direction::Down),
            Button::Left => Input::Move(Direction::Left),
            Button::Up => Input::Move(Direction::Up),
            Button::Select => Input::Confirm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Press(Button),
    Quit,
    None,
}

/// Maps terminal keys onto joystick buttons
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Press(Button::Up),
            KeyCode::Down => KeyAction::Press(Button::Down),
            KeyCode::Left => KeyAction::Press(Button::Left),
            KeyCode::Right => KeyAction::Press(Button::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Press(Button::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Press(Button::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Press(Button::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Press(Button::Right),

            // Joystick select
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R') => {
                KeyAction::Press(Button::Select)
            }

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Joystick fed by key presses.
///
/// A terminal reports presses rather than held contacts, so a press counts as
/// held until the next poll reads it.
#[derive(Debug, Clone, Default)]
pub struct JoystickLatch {
    held: [bool; 5],
}

impl JoystickLatch {
    pub fn press(&mut self, button: Button) {
        self.held[button.index()] = true;
    }

    /// The highest-priority held button, without releasing anything
    pub fn peek(&self) -> Input {
        Button::PRIORITY
            .iter()
            .find(|button| self.held[button.index()])
            .map(|button| button.input())
            .unwrap_or_default()
    }

    pub fn release_all(&mut self) {
        self.held = [false; 5];
    }
}

impl InputSource for JoystickLatch {
    fn poll(&mut self) -> Input {
        let input = self.peek();
        self.release_all();
        input
    }
}
