pub mod handler;

pub use handler::{Button, InputHandler, JoystickLatch, KeyAction};
