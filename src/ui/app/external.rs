use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};

use crate::core::{EditorLauncher, LaunchError};

/// Releases the terminal around another launcher so the editor owns the tty.
pub struct TerminalHandoff<L> {
    inner: L,
}

impl<L: EditorLauncher> TerminalHandoff<L> {
    /// Wrap `inner`.
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

impl<L: EditorLauncher> EditorLauncher for TerminalHandoff<L> {
    fn launch(&self, path: &str, line: usize) -> Result<(), LaunchError> {
        if let Err(err) = suspend_terminal_for_external() {
            tracing::warn!(%err, "failed to release terminal");
        }

        let result = self.inner.launch(path, line);

        if let Err(err) = resume_terminal_after_external() {
            tracing::warn!(%err, "failed to restore terminal");
        }
        result
    }
}

fn suspend_terminal_for_external() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    io::stdout().flush()
}

fn resume_terminal_after_external() -> io::Result<()> {
    execute!(io::stdout(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    io::stdout().flush()
}
