//! User configuration from `<config dir>/difi/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::Backend;
use crate::theme::DEFAULT_THEME;

/// Settings read at startup. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editor command line, e.g. `"code --wait"`. Beats `$EDITOR`.
    pub editor: Option<String>,
    /// Theme name.
    pub theme: String,
    /// Force a backend instead of detecting one.
    pub backend: Option<Backend>,
    /// Refresh the file list when the working copy changes.
    pub watch: bool,
    /// Show per-extension icons in the tree (needs a Nerd Font).
    pub icons: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: None,
            theme: DEFAULT_THEME.to_string(),
            backend: None,
            watch: true,
            icons: true,
        }
    }
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("difi").join("config.json"))
    }

    /// Load from the default location; missing file or directory means defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`; a missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load, falling back to defaults with a warning on stderr.
    pub fn load_or_warn() -> Self {
        Self::load().unwrap_or_else(|err| {
            eprintln!("warning: {err:#}; using default settings");
            tracing::warn!(error = %format!("{err:#}"), "config ignored");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.watch);
        assert!(config.icons);
        assert_eq!(config.theme, "nord");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"editor": "hx", "backend": "hg", "icons": false}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.editor.as_deref(), Some("hx"));
        assert_eq!(config.backend, Some(Backend::Hg));
        assert!(!config.icons);
        assert!(config.watch);
        assert_eq!(config.theme, DEFAULT_THEME);
    }

    #[test]
    fn malformed_file_is_an_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ editor: ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.json"));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"backend": "svn"}"#).unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
