//! Colour themes.

use ratatui::style::Color;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "nord";

/// Every colour the renderer reads.
///
/// Field names describe the role, not the hue (`added` rather than `green`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct Theme {
    // Bars
    pub bar_bg: Color,
    pub bar_fg: Color,
    pub divider: Color,

    // Panes
    pub border_dim: Color,
    pub border_active: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,

    // Text
    pub text_normal: Color,
    pub text_muted: Color,
    pub directory: Color,

    // Diff
    pub added: Color,
    pub deleted: Color,
    pub hunk: Color,
    pub file_header: Color,
    pub error: Color,

    // Status bar sections
    pub repo: Color,
    pub branch: Color,
    pub help_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::nord()
    }
}

/// JSON theme file: a palette of named colours plus role assignments.
#[derive(Debug, Deserialize)]
#[allow(missing_docs)]
pub struct ThemeJson {
    #[serde(default)]
    pub defs: HashMap<String, String>,
    #[serde(default)]
    pub theme: ThemeColorsJson,
}

/// Role assignments; each value is `#rrggbb` or a key into `defs`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(missing_docs)]
pub struct ThemeColorsJson {
    pub bar_bg: Option<String>,
    pub bar_fg: Option<String>,
    pub divider: Option<String>,
    pub border_dim: Option<String>,
    pub border_active: Option<String>,
    pub selected_bg: Option<String>,
    pub selected_fg: Option<String>,
    pub text_normal: Option<String>,
    pub text_muted: Option<String>,
    pub directory: Option<String>,
    pub added: Option<String>,
    pub deleted: Option<String>,
    pub hunk: Option<String>,
    pub file_header: Option<String>,
    pub error: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub help_text: Option<String>,
}

impl Theme {
    /// Load a theme by name: user themes first, then builtins, then the default.
    pub fn load(name: &str) -> Self {
        if let Some(theme) = user_themes_dir().and_then(|dir| load_user_theme(&dir, name)) {
            return theme;
        }

        Self::builtin(name).unwrap_or_else(|| {
            tracing::warn!(theme = name, fallback = DEFAULT_THEME, "unknown theme");
            Self::default()
        })
    }

    /// Builtin theme by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "nord" => Some(Self::nord()),
            "tokyonight" | "tokyo-night" => Some(Self::tokyonight()),
            _ => None,
        }
    }

    /// Nord palette.
    pub fn nord() -> Self {
        let nord0 = Color::Rgb(0x2e, 0x34, 0x40);
        let nord3 = Color::Rgb(0x4c, 0x56, 0x6a);
        let nord4 = Color::Rgb(0xd8, 0xde, 0xe9);
        let nord9 = Color::Rgb(0x81, 0xa1, 0xc1);
        let nord11 = Color::Rgb(0xbf, 0x61, 0x6a);
        let nord14 = Color::Rgb(0xa3, 0xbe, 0x8c);

        Self {
            bar_bg: nord0,
            bar_fg: nord4,
            divider: nord3,

            border_dim: nord3,
            border_active: nord9,
            selected_bg: Color::Indexed(237),
            selected_fg: Color::Indexed(255),

            text_normal: Color::Indexed(252),
            text_muted: Color::Indexed(245),
            directory: Color::Indexed(99),

            added: nord14,
            deleted: nord11,
            hunk: nord9,
            file_header: Color::Indexed(245),
            error: nord11,

            repo: Color::Rgb(0x7a, 0xa2, 0xf7),
            branch: Color::Rgb(0xbb, 0x9a, 0xf7),
            help_text: Color::Indexed(241),
        }
    }

    /// Tokyo Night palette.
    pub fn tokyonight() -> Self {
        let bg = Color::Rgb(0x1a, 0x1b, 0x26);
        let comment = Color::Rgb(0x56, 0x5f, 0x89);
        let fg = Color::Rgb(0xc0, 0xca, 0xf5);
        let blue = Color::Rgb(0x7a, 0xa2, 0xf7);
        let magenta = Color::Rgb(0xbb, 0x9a, 0xf7);
        let red = Color::Rgb(0xf7, 0x76, 0x8e);

        Self {
            bar_bg: bg,
            bar_fg: fg,
            divider: comment,

            border_dim: Color::Rgb(0x29, 0x2e, 0x42),
            border_active: blue,
            selected_bg: Color::Rgb(0x28, 0x34, 0x57),
            selected_fg: fg,

            text_normal: Color::Rgb(0xa9, 0xb1, 0xd6),
            text_muted: comment,
            directory: magenta,

            added: Color::Rgb(0x9e, 0xce, 0x6a),
            deleted: red,
            hunk: Color::Rgb(0x7d, 0xcf, 0xff),
            file_header: Color::Rgb(0xe0, 0xaf, 0x68),
            error: red,

            repo: blue,
            branch: magenta,
            help_text: Color::Rgb(0x73, 0x7a, 0xa2),
        }
    }

    /// Parse a JSON theme; unset roles keep the default theme's colours.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let json: ThemeJson = serde_json::from_str(content)?;
        Ok(resolve_theme(&json))
    }
}

/// `<config dir>/difi/themes`.
pub fn user_themes_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("difi").join("themes"))
}

fn load_user_theme(dir: &Path, name: &str) -> Option<Theme> {
    let path = dir.join(format!("{name}.json"));
    if !path.exists() {
        return None;
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!(%err, path = %path.display(), "could not read theme");
            return None;
        }
    };
    match Theme::from_json(&content) {
        Ok(theme) => Some(theme),
        Err(err) => {
            tracing::warn!(%err, path = %path.display(), "invalid theme json");
            None
        }
    }
}

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex(s: &str) -> Option<Color> {
    let s = s.trim_start_matches('#');
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;

    Some(Color::Rgb(r, g, b))
}

/// Resolve a hex literal or a `defs` reference.
fn resolve_color(value: &str, defs: &HashMap<String, String>, fallback: Color) -> Color {
    if value.starts_with('#') {
        parse_hex(value).unwrap_or(fallback)
    } else if let Some(def) = defs.get(value) {
        parse_hex(def).unwrap_or(fallback)
    } else {
        fallback
    }
}

fn resolve_theme(json: &ThemeJson) -> Theme {
    let base = Theme::default();
    let defs = &json.defs;
    let t = &json.theme;
    let pick = |value: &Option<String>, fallback: Color| {
        value
            .as_deref()
            .map_or(fallback, |v| resolve_color(v, defs, fallback))
    };

    Theme {
        bar_bg: pick(&t.bar_bg, base.bar_bg),
        bar_fg: pick(&t.bar_fg, base.bar_fg),
        divider: pick(&t.divider, base.divider),
        border_dim: pick(&t.border_dim, base.border_dim),
        border_active: pick(&t.border_active, base.border_active),
        selected_bg: pick(&t.selected_bg, base.selected_bg),
        selected_fg: pick(&t.selected_fg, base.selected_fg),
        text_normal: pick(&t.text_normal, base.text_normal),
        text_muted: pick(&t.text_muted, base.text_muted),
        directory: pick(&t.directory, base.directory),
        added: pick(&t.added, base.added),
        deleted: pick(&t.deleted, base.deleted),
        hunk: pick(&t.hunk, base.hunk),
        file_header: pick(&t.file_header, base.file_header),
        error: pick(&t.error, base.error),
        repo: pick(&t.repo, base.repo),
        branch: pick(&t.branch, base.branch),
        help_text: pick(&t.help_text, base.help_text),
    }
}
