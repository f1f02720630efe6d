//! External editor resolution and launching.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Environment variable naming a difi-specific editor.
pub const EDITOR_ENV: &str = "DIFI_EDITOR";

/// Environment variable the editor receives with the diff target.
pub const TARGET_ENV: &str = "DIFI_TARGET";

/// Editors looked up on `PATH` when nothing is configured, in order.
pub const FALLBACK_EDITORS: [&str; 4] = ["nvim", "vim", "vi", "nano"];

/// Errors from resolving or running the editor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LaunchError {
    /// Nothing configured and no known editor on `PATH`.
    #[error("no editor found: set $DIFI_EDITOR, $VISUAL or $EDITOR")]
    NoEditor,
    /// The configured command could not be split into words.
    #[error("invalid editor command from {source_name}: {message}")]
    InvalidCommand {
        /// Where the command came from (`config` or an env var name).
        source_name: String,
        /// Parser message.
        message: String,
    },
    /// The process could not be started.
    #[error("failed to launch {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The editor ran but exited unsuccessfully.
    #[error("editor exited with {0}")]
    ExitStatus(String),
}

/// A resolved editor program plus its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    program: String,
    args: Vec<String>,
}

impl EditorCommand {
    /// Resolve from the configured editor, the environment, then `PATH`.
    pub fn resolve(configured: Option<&str>) -> Result<Self, LaunchError> {
        Self::resolve_with(configured, |key| env::var(key).ok(), |name| {
            find_in_path(name, env::var_os("PATH"))
        })
    }

    /// [`resolve`](Self::resolve) with injectable lookups.
    pub fn resolve_with(
        configured: Option<&str>,
        env_var: impl Fn(&str) -> Option<String>,
        on_path: impl Fn(&str) -> Option<PathBuf>,
    ) -> Result<Self, LaunchError> {
        if let Some(cmd) = configured.and_then(|c| Self::parse("config", c).transpose()) {
            return cmd;
        }

        for key in [EDITOR_ENV, "VISUAL", "EDITOR"] {
            let Some(value) = env_var(key) else {
                continue;
            };
            if let Some(cmd) = Self::parse(key, &value).transpose() {
                return cmd;
            }
        }

        FALLBACK_EDITORS
            .into_iter()
            .find(|name| on_path(*name).is_some())
            .map(|name| Self {
                program: name.to_string(),
                args: Vec::new(),
            })
            .ok_or(LaunchError::NoEditor)
    }

    /// Split `value` into words; blank input yields `None`.
    fn parse(source_name: &str, value: &str) -> Result<Option<Self>, LaunchError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let mut parts =
            shell_words::split(trimmed).map_err(|e| LaunchError::InvalidCommand {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;
        if parts.is_empty() {
            return Ok(None);
        }
        let program = parts.remove(0);
        Ok(Some(Self {
            program,
            args: parts,
        }))
    }

    /// Program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument list for opening `path` at `line` (`+line` only when > 0).
    #[must_use]
    pub fn args_for(&self, path: &str, line: usize) -> Vec<String> {
        let mut args = self.args.clone();
        if line > 0 {
            args.push(format!("+{line}"));
        }
        args.push(path.to_string());
        args
    }

    /// Build the process, run from `cwd` with [`TARGET_ENV`] set.
    pub fn command(&self, path: &str, line: usize, target: &str, cwd: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args_for(path, line))
            .current_dir(cwd)
            .env(TARGET_ENV, target);
        cmd
    }
}

/// First executable named `name` in a `PATH`-style list.
pub fn find_in_path(name: &str, path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Something that can open a file at a line and wait for it to finish.
pub trait EditorLauncher {
    /// Open `path` (repository-relative) at `line`; blocks until the editor exits.
    fn launch(&self, path: &str, line: usize) -> Result<(), LaunchError>;
}

/// Launches the resolved editor as a child process inheriting the terminal.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    configured: Option<String>,
    root: PathBuf,
    target: String,
}

impl ProcessLauncher {
    /// Launcher for files in `root`, compared against `target`.
    pub fn new(configured: Option<String>, root: PathBuf, target: String) -> Self {
        Self {
            configured,
            root,
            target,
        }
    }
}

impl EditorLauncher for ProcessLauncher {
    fn launch(&self, path: &str, line: usize) -> Result<(), LaunchError> {
        let editor = EditorCommand::resolve(self.configured.as_deref())?;
        tracing::debug!(program = editor.program(), path, line, "launching editor");

        let status = editor
            .command(path, line, &self.target, &self.root)
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: editor.program().to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(LaunchError::ExitStatus(status.to_string()))
        }
    }
}
