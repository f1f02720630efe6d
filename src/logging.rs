//! File-backed tracing setup.
//!
//! The terminal belongs to the TUI, so log output never goes to stdout or
//! stderr. Logging stays off unless `DIFI_LOG` names a level.

use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Level switch, e.g. `DIFI_LOG=debug`.
pub const LOG_ENV: &str = "DIFI_LOG";
/// Overrides the log file location.
pub const LOG_FILE_ENV: &str = "DIFI_LOG_FILE";

/// Where logs go when `DIFI_LOG_FILE` is unset: `<cache dir>/difi/difi.log`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("difi").join("difi.log"))
}

/// Parse a level name; empty or unknown input means logging stays off.
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    LevelFilter::from_str(value)
        .ok()
        .filter(|level| *level != LevelFilter::OFF)
}

/// Install the global subscriber when `DIFI_LOG` is set. Returns the log path.
pub fn init() -> Result<Option<PathBuf>> {
    let Some(level) = std::env::var(LOG_ENV).ok().as_deref().and_then(parse_level) else {
        return Ok(None);
    };

    let path = match std::env::var_os(LOG_FILE_ENV) {
        Some(path) => PathBuf::from(path),
        None => default_log_path().context("no cache directory for the log file")?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }

    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(level),
        )
        .try_init()
        .context("installing tracing subscriber")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), %level, "logging started");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::DEBUG));
        assert_eq!(parse_level(" WARN "), Some(LevelFilter::WARN));
        assert_eq!(parse_level("off"), None);
        assert_eq!(parse_level(""), None);
        assert_eq!(parse_level("chatty"), None);
    }

    #[test]
    fn default_path_ends_in_difi_log() {
        if let Some(path) = default_log_path() {
            assert!(path.ends_with("difi/difi.log"));
        }
    }
}
