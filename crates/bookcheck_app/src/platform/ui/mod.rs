mod render;

pub use render::TerminalRenderer;
