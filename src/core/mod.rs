//! Diff exploration engine (no TUI dependencies).

mod editor;
mod git;
mod hg;
mod layout;
mod resolve;
mod session;
mod tree;
mod vcs;
mod watcher;

pub use editor::*;
pub use git::*;
pub use hg::*;
pub use layout::*;
pub use resolve::*;
pub use session::*;
pub use tree::*;
pub use vcs::*;
pub use watcher::*;
