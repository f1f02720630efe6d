//! Shared rendering helpers and constants.

use crate::core::strip_ansi;

/// Tab stop width for display alignment.
pub const TAB_WIDTH: usize = 4;

/// Nerd Font folder glyph.
pub const DIRECTORY_ICON: &str = "\u{f115}";

/// Nerd Font glyph for a file name, by extension.
pub fn file_icon(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "go" => "\u{e627}",
        "rs" => "\u{e7a8}",
        "js" | "ts" | "tsx" => "\u{e60c}",
        "svelte" => "\u{f260}",
        "md" => "\u{e609}",
        "json" => "\u{e60b}",
        "yml" | "yaml" | "toml" => "\u{e615}",
        "html" => "\u{e60e}",
        "css" => "\u{e614}",
        "git" | "gitignore" => "\u{e702}",
        "dockerfile" => "\u{e7b0}",
        _ => "\u{f15c}",
    }
}

/// Make a raw diff line safe to draw: no escapes, tabs expanded, control
/// characters replaced.
pub fn sanitize_line(line: &str) -> String {
    let clean = strip_ansi(line);
    let mut out = String::with_capacity(clean.len());
    let mut col = 0usize;
    for c in clean.chars() {
        match c {
            '\t' => {
                let width = TAB_WIDTH - col % TAB_WIDTH;
                out.extend(std::iter::repeat(' ').take(width));
                col += width;
            }
            '\r' => {}
            '\x00'..='\x1f' | '\x7f' => {
                out.push('\u{FFFD}');
                col += 1;
            }
            _ => {
                out.push(c);
                col += 1;
            }
        }
    }
    out
}

/// Truncate to `max_len` characters, marking the cut with an ellipsis.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len == 0 {
        String::new()
    } else {
        let truncated: String = s.chars().take(max_len - 1).collect();
        format!("{truncated}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_by_extension() {
        assert_eq!(file_icon("main.go"), "\u{e627}");
        assert_eq!(file_icon("README.MD"), "\u{e609}");
        assert_eq!(file_icon("Makefile"), "\u{f15c}");
    }

    #[test]
    fn sanitize_expands_tabs_and_strips_escapes() {
        assert_eq!(sanitize_line("+\tx"), "+   x");
        assert_eq!(sanitize_line("\x1b[32m+ok\x1b[0m\r"), "+ok");
        assert_eq!(sanitize_line("a\x07b"), "a\u{FFFD}b");
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_str("abc", 5), "abc");
        assert_eq!(truncate_str("abcdef", 4), "abc…");
        assert_eq!(truncate_str("abc", 0), "");
    }
}
