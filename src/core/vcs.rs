//! Version-control backends.
//!
//! Everything the explorer needs from git or Mercurial goes through
//! [`VcsProvider`]. Implementations shell out to the VCS binary and never
//! panic; failures either surface as [`VcsError`] or degrade to a fallback
//! value the UI can show directly.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{GitProvider, HgProvider};

/// Repository name shown when the backend cannot report one.
pub const FALLBACK_REPO_NAME: &str = "Repo";

/// Prefix of the diff text returned when fetching a diff fails.
pub const DIFF_ERROR_PREFIX: &str = "Error fetching diff: ";

/// Errors from VCS operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VcsError {
    /// No supported repository contains the working directory.
    #[error("not inside a git or mercurial repository")]
    NotARepo,
    /// The VCS command exited unsuccessfully.
    #[error("{program} command failed: {message}")]
    CommandFailed {
        /// Binary that was invoked.
        program: &'static str,
        /// Trimmed stderr, or the exit status when stderr was empty.
        message: String,
    },
    /// The VCS binary could not be started.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Command output was not valid UTF-8.
    #[error("invalid utf-8 in {0} output")]
    InvalidUtf8(&'static str),
}

/// Supported version-control backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// git
    Git,
    /// Mercurial
    Hg,
}

impl Backend {
    /// Name of the backend's executable.
    pub fn program(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Hg => "hg",
        }
    }

    /// Find the backend owning `dir` and its repository root.
    ///
    /// git is tried first, then Mercurial.
    pub fn detect(dir: &Path) -> Result<(Self, PathBuf), VcsError> {
        for backend in [Self::Git, Self::Hg] {
            if let Ok(root) = backend.root_of(dir) {
                return Ok((backend, root));
            }
        }
        Err(VcsError::NotARepo)
    }

    /// Repository root of `dir` for this backend.
    pub fn root_of(self, dir: &Path) -> Result<PathBuf, VcsError> {
        let args: &[&str] = match self {
            Self::Git => &["rev-parse", "--show-toplevel"],
            Self::Hg => &["root"],
        };
        let out = run(self.program(), args, dir).map_err(|e| match e {
            VcsError::CommandFailed { .. } => VcsError::NotARepo,
            other => other,
        })?;
        let root = out.trim();
        if root.is_empty() {
            return Err(VcsError::NotARepo);
        }
        Ok(PathBuf::from(root))
    }

    /// Build the provider for a repository rooted at `root`.
    pub fn provider(self, root: PathBuf) -> Box<dyn VcsProvider> {
        match self {
            Self::Git => Box::new(GitProvider::new(root)),
            Self::Hg => Box::new(HgProvider::new(root)),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "git" => Ok(Self::Git),
            "hg" | "mercurial" => Ok(Self::Hg),
            other => Err(format!("unknown backend '{other}' (expected git or hg)")),
        }
    }
}

/// Aggregate line counts for the whole change set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Inserted lines.
    pub added: usize,
    /// Deleted lines.
    pub deleted: usize,
}

/// Changed files plus their aggregate counts, fetched together on refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileListing {
    /// Repository-relative changed paths.
    pub files: Vec<String>,
    /// Added and deleted lines across `files`.
    pub summary: DiffSummary,
}

/// Capability the explorer consumes from a version-control backend.
pub trait VcsProvider: Send + Sync {
    /// Which backend this is.
    fn backend(&self) -> Backend;

    /// Current branch, or a backend-specific constant when unavailable.
    fn current_branch_name(&self) -> String;

    /// Last component of the repository root, or [`FALLBACK_REPO_NAME`].
    fn repository_display_name(&self) -> String;

    /// Repository-relative paths that differ from `target`.
    fn list_changed_files(&self, target: &str) -> Result<Vec<String>, VcsError>;

    /// Raw diff of one file against `target`.
    ///
    /// On failure the returned text starts with [`DIFF_ERROR_PREFIX`] so it can
    /// be shown in place of the diff.
    fn fetch_diff(&self, target: &str, path: &str) -> String;

    /// Added and deleted line counts against `target`; zero when unknown.
    fn diff_summary(&self, target: &str) -> DiffSummary;

    /// Plain-text per-file status listing for non-interactive output.
    fn status_summary(&self, target: &str) -> Result<String, VcsError>;

    /// Revision compared against when none is given.
    fn default_target(&self) -> String;

    /// Changed files and the summary in one call.
    fn file_listing(&self, target: &str) -> Result<FileListing, VcsError> {
        let files = self.list_changed_files(target)?;
        let summary = self.diff_summary(target);
        Ok(FileListing { files, summary })
    }
}

/// Run a VCS command in `cwd` and return its stdout.
pub(crate) fn run(program: &'static str, args: &[&str], cwd: &Path) -> Result<String, VcsError> {
    tracing::debug!(program, ?args, "running vcs command");
    let output = Command::new(program).args(args).current_dir(cwd).output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            output.status.to_string()
        } else {
            stderr
        };
        return Err(VcsError::CommandFailed { program, message });
    }

    String::from_utf8(output.stdout).map_err(|_| VcsError::InvalidUtf8(program))
}

/// Render a failed diff fetch as displayable text.
pub(crate) fn diff_error_text(err: &VcsError) -> String {
    format!("{DIFF_ERROR_PREFIX}{err}")
}

/// Split command output into one path per non-empty line.
pub fn parse_file_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the summary line of `git diff --shortstat` / `hg diff --stat`.
///
/// Looks for the first line mentioning `changed` and either `insertion` or
/// `deletion`, e.g. ` 3 files changed, 10 insertions(+), 2 deletions(-)`.
/// Missing counts stay zero.
pub fn parse_diff_summary(output: &str) -> DiffSummary {
    let mut summary = DiffSummary::default();

    let Some(line) = output.lines().find(|line| {
        line.contains("changed") && (line.contains("insertion") || line.contains("deletion"))
    }) else {
        return summary;
    };

    for part in line.split(',') {
        let mut words = part.split_whitespace();
        let (Some(count), Some(label)) = (words.next(), words.next()) else {
            continue;
        };
        let Ok(count) = count.parse::<usize>() else {
            continue;
        };
        if label.starts_with("insertion") {
            summary.added = count;
        } else if label.starts_with("deletion") {
            summary.deleted = count;
        }
    }

    summary
}

/// Last path component of a repository root.
pub(crate) fn display_name_of(root: &str) -> String {
    root.trim()
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_REPO_NAME)
        .to_string()
}
