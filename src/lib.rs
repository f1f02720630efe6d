//! difi - browse changed files, read their diffs, jump into your editor.
//!
//! The crate is split into a TUI-free engine ([`core`]) and the terminal front
//! end ([`ui`]). The engine turns a flat list of changed paths into a compacted
//! tree, maps diff rows back to file lines, and drives the interaction state
//! machine; the front end only renders state and performs the commands the
//! engine asks for.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use difi::prelude::*;
//!
//! let (backend, root) = Backend::detect(std::path::Path::new("."))?;
//! let provider = backend.provider(root);
//! let target = provider.default_target();
//! let rows = build(provider.list_changed_files(&target)?);
//! # Ok::<(), VcsError>(())
//! ```

#![deny(missing_docs)]

pub mod config;
pub mod core;
pub mod logging;
pub mod metrics;
pub mod prelude;
pub mod theme;
pub mod ui;
