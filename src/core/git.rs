//! git backend.

use std::path::{Path, PathBuf};

use super::vcs::{
    diff_error_text, display_name_of, parse_diff_summary, parse_file_list, run, Backend,
    DiffSummary, VcsError, VcsProvider,
};

/// Branch reported when HEAD is unreadable.
pub const GIT_FALLBACK_BRANCH: &str = "HEAD";

/// [`VcsProvider`] backed by the `git` CLI.
#[derive(Debug, Clone)]
pub struct GitProvider {
    root: PathBuf,
}

impl GitProvider {
    /// Provider for the repository rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn git(&self, args: &[&str]) -> Result<String, VcsError> {
        run("git", args, &self.root)
    }
}

impl VcsProvider for GitProvider {
    fn backend(&self) -> Backend {
        Backend::Git
    }

    fn current_branch_name(&self) -> String {
        match self.git(&["rev-parse", "--abbrev-ref", "HEAD"]) {
            Ok(out) if !out.trim().is_empty() => out.trim().to_string(),
            Ok(_) => GIT_FALLBACK_BRANCH.to_string(),
            Err(err) => {
                tracing::warn!(%err, "could not read git branch");
                GIT_FALLBACK_BRANCH.to_string()
            }
        }
    }

    fn repository_display_name(&self) -> String {
        match self.git(&["rev-parse", "--show-toplevel"]) {
            Ok(out) => display_name_of(&out),
            Err(err) => {
                tracing::warn!(%err, "could not read git toplevel");
                display_name_of("")
            }
        }
    }

    fn list_changed_files(&self, target: &str) -> Result<Vec<String>, VcsError> {
        // `--` keeps a target like "-x" from being read as an option
        let out = self.git(&["diff", "--name-only", "--no-color", target, "--"])?;
        Ok(parse_file_list(&out))
    }

    fn fetch_diff(&self, target: &str, path: &str) -> String {
        let _timer = crate::metrics::Timer::start("diff_fetch");
        self.git(&["diff", "--no-color", target, "--", path])
            .unwrap_or_else(|err| {
                tracing::warn!(%err, path, "git diff failed");
                diff_error_text(&err)
            })
    }

    fn diff_summary(&self, target: &str) -> DiffSummary {
        match self.git(&["diff", "--shortstat", target, "--"]) {
            Ok(out) => parse_diff_summary(&out),
            Err(err) => {
                tracing::warn!(%err, "git diff --shortstat failed");
                DiffSummary::default()
            }
        }
    }

    fn status_summary(&self, target: &str) -> Result<String, VcsError> {
        self.git(&["diff", "--name-status", "--no-color", target, "--"])
    }

    fn default_target(&self) -> String {
        "HEAD".to_string()
    }
}
