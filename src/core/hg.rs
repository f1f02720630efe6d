//! Mercurial backend.

use std::path::{Path, PathBuf};

use super::vcs::{
    diff_error_text, display_name_of, parse_diff_summary, parse_file_list, run, Backend,
    DiffSummary, VcsError, VcsProvider,
};

/// Branch reported when `hg branch` fails.
pub const HG_FALLBACK_BRANCH: &str = "default";

/// [`VcsProvider`] backed by the `hg` CLI.
#[derive(Debug, Clone)]
pub struct HgProvider {
    root: PathBuf,
}

impl HgProvider {
    /// Provider for the repository rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn hg(&self, args: &[&str]) -> Result<String, VcsError> {
        run("hg", args, &self.root)
    }
}

impl VcsProvider for HgProvider {
    fn backend(&self) -> Backend {
        Backend::Hg
    }

    fn current_branch_name(&self) -> String {
        match self.hg(&["branch"]) {
            Ok(out) if !out.trim().is_empty() => out.trim().to_string(),
            Ok(_) => HG_FALLBACK_BRANCH.to_string(),
            Err(err) => {
                tracing::warn!(%err, "could not read hg branch");
                HG_FALLBACK_BRANCH.to_string()
            }
        }
    }

    fn repository_display_name(&self) -> String {
        match self.hg(&["root"]) {
            Ok(out) => display_name_of(&out),
            Err(err) => {
                tracing::warn!(%err, "could not read hg root");
                display_name_of("")
            }
        }
    }

    fn list_changed_files(&self, target: &str) -> Result<Vec<String>, VcsError> {
        let out = self.hg(&["status", "--rev", target, "--no-status"])?;
        Ok(parse_file_list(&out))
    }

    fn fetch_diff(&self, target: &str, path: &str) -> String {
        let _timer = crate::metrics::Timer::start("diff_fetch");
        self.hg(&["diff", "--rev", target, path])
            .unwrap_or_else(|err| {
                tracing::warn!(%err, path, "hg diff failed");
                diff_error_text(&err)
            })
    }

    fn diff_summary(&self, target: &str) -> DiffSummary {
        match self.hg(&["diff", "--rev", target, "--stat"]) {
            Ok(out) => parse_diff_summary(&out),
            Err(err) => {
                tracing::warn!(%err, "hg diff --stat failed");
                DiffSummary::default()
            }
        }
    }

    fn status_summary(&self, target: &str) -> Result<String, VcsError> {
        self.hg(&["status", "--rev", target])
    }

    fn default_target(&self) -> String {
        HG_FALLBACK_BRANCH.to_string()
    }
}
