//! Terminal UI using ratatui.

mod app;
mod input;
pub mod render;
mod worker;

pub use app::{App, AppOptions, TerminalHandoff};
pub use input::{handle_input, map_key};
pub use render::render;
