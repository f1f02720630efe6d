//! Application runtime: owns the session and performs its commands.

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::{
    Command, EditorLauncher, Event, FileListing, RepoWatcher, Session, VcsProvider,
};
use crate::theme::Theme;

use super::worker::{spawn_diff_worker, DiffWorker, WorkerRequest};

mod external;
mod watcher;

pub use external::TerminalHandoff;

/// Startup settings for [`App`].
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Revision compared against.
    pub target: String,
    /// Colours.
    pub theme: Theme,
    /// Show file-type icons in the tree.
    pub icons: bool,
    /// Watch this directory and refresh on changes.
    pub watch_root: Option<PathBuf>,
    /// Initial terminal width.
    pub width: u16,
    /// Initial terminal height.
    pub height: u16,
}

/// Application state.
pub struct App {
    session: Session,
    /// Revision compared against.
    pub target: String,
    /// Repository name for the status bar.
    pub repo_name: String,
    /// Current branch for the status bar.
    pub branch: String,
    /// Active colours.
    pub theme: Theme,
    /// Show file-type icons.
    pub icons: bool,
    /// Redraw needed.
    pub dirty: bool,
    /// Leave the event loop.
    pub should_quit: bool,
    /// The screen was handed to another process; repaint everything.
    pub needs_clear: bool,

    launcher: Box<dyn EditorLauncher>,
    worker: DiffWorker,
    watcher: Option<RepoWatcher>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("target", &self.target)
            .field("repo_name", &self.repo_name)
            .field("selected", &self.session.selected_path())
            .field("watching", &self.watcher.is_some())
            .finish_non_exhaustive()
    }
}

impl App {
    /// Build the app from an initial listing and request the first diff.
    pub fn new(
        provider: Arc<dyn VcsProvider>,
        launcher: Box<dyn EditorLauncher>,
        listing: FileListing,
        options: AppOptions,
    ) -> Self {
        let AppOptions {
            target,
            theme,
            icons,
            watch_root,
            width,
            height,
        } = options;

        let repo_name = provider.repository_display_name();
        let branch = provider.current_branch_name();
        let worker = spawn_diff_worker(Arc::clone(&provider), target.clone());

        let watcher = watch_root.and_then(|root| match RepoWatcher::new(&root) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                tracing::warn!(%err, "file watching disabled");
                None
            }
        });

        let mut app = Self {
            session: Session::new(width, height),
            target,
            repo_name,
            branch,
            theme,
            icons,
            dirty: true,
            should_quit: false,
            needs_clear: false,
            launcher,
            worker,
            watcher,
        };
        app.dispatch(Event::FilesListed {
            result: Ok(listing),
        });
        app
    }

    /// Read-only view of the session for rendering.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Feed one event to the session and carry out what it asks for.
    pub fn dispatch(&mut self, event: Event) {
        let commands = self.session.handle(event);
        self.run_commands(commands);
        self.mark_dirty();
    }

    fn run_commands(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::FetchDiff { path } => self.worker.request(WorkerRequest::Diff { path }),
                Command::RefreshFiles => self.worker.request(WorkerRequest::Files),
                Command::Quit => self.should_quit = true,
                Command::OpenEditor { path, line } => {
                    let error = self
                        .launcher
                        .launch(&path, line)
                        .err()
                        .map(|err| err.to_string());
                    if let Some(err) = &error {
                        tracing::warn!(%err, %path, "editor failed");
                    }
                    self.needs_clear = true;
                    self.dispatch(Event::EditorFinished { error });
                }
            }
        }
    }

    /// Apply every finished worker result. Returns true if any arrived.
    pub fn poll_worker(&mut self) -> bool {
        let mut any = false;
        while let Some(event) = self.worker.try_recv() {
            self.dispatch(event);
            any = true;
        }
        any
    }

    /// Mark the UI as needing a redraw.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the redraw flag after drawing.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
