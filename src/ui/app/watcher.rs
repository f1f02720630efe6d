use super::App;
use crate::core::{Event, Key};

impl App {
    /// Poll the file watcher and relist files when the working copy moved.
    pub fn poll_watcher(&mut self) -> bool {
        let Some(watcher) = &self.watcher else {
            return false;
        };
        if watcher.poll().is_none() || self.session.is_editing() {
            return false;
        }

        tracing::debug!("working copy changed");
        self.dispatch(Event::Key(Key::Refresh));
        true
    }
}
