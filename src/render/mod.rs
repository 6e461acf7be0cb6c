pub mod renderer;

pub use renderer::TerminalDisplay;
