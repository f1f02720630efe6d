//! Common re-exports.
//!
//! ```rust,ignore
//! use difi::prelude::*;
//! ```

pub use crate::core::{
    build, resolve_line, Backend, Command, DiffSummary, Event, FileListing, Key, PathNode,
    Session, VcsError, VcsProvider,
};
