//! Working-copy watching so the file list follows edits made outside difi.

use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};

/// Debounce window for file-system events.
pub const DEBOUNCE: Duration = Duration::from_millis(250);

/// VCS metadata directories whose churn never means "the change set moved".
const IGNORED_DIRS: [&str; 3] = [".git", ".hg", ".jj"];

/// Signal that something in the working copy changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingCopyChanged;

/// Recursive, debounced watcher over a repository root.
pub struct RepoWatcher {
    rx: Receiver<WorkingCopyChanged>,
    // dropping the debouncer stops the watch
    _debouncer: Debouncer<notify::RecommendedWatcher>,
}

impl RepoWatcher {
    /// Start watching `root`.
    pub fn new(root: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let repo_path: PathBuf = root.to_path_buf();

        let mut debouncer = new_debouncer(DEBOUNCE, move |res: DebounceEventResult| match res {
            Ok(events) => {
                if events.iter().any(|e| !is_ignored_path(&e.path, &repo_path)) {
                    let _ = tx.send(WorkingCopyChanged);
                }
            }
            Err(err) => tracing::warn!(%err, "watch error"),
        })?;

        debouncer.watcher().watch(root, RecursiveMode::Recursive)?;
        tracing::debug!(root = %root.display(), "watching working copy");

        Ok(Self {
            rx,
            _debouncer: debouncer,
        })
    }

    /// Non-blocking; coalesces everything queued since the last poll.
    pub fn poll(&self) -> Option<WorkingCopyChanged> {
        match self.rx.try_recv() {
            Ok(signal) => {
                while self.rx.try_recv().is_ok() {}
                Some(signal)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

fn is_ignored_path(path: &Path, repo_root: &Path) -> bool {
    let Ok(rel) = path.strip_prefix(repo_root) else {
        return false;
    };

    rel.components().any(|component| match component {
        Component::Normal(name) => IGNORED_DIRS.iter().any(|dir| name == *dir),
        _ => false,
    })
}
