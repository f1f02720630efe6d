//! Map a row of a rendered diff back to a line in the new file.

use std::borrow::Cow;

/// Returned when the requested row does not exist.
pub const NO_SELECTION: usize = 0;

/// Kind of a single diff line, after decoration is stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    /// `diff ...`, `index ...`, `--- a/...`, `+++ b/...` and similar.
    FileHeader,
    /// `@@ -a,b +c,d @@`.
    HunkHeader,
    /// Line present only in the new file.
    Added,
    /// Line present only in the old file.
    Removed,
    /// Unchanged line shown for context.
    Context,
    /// Anything else (`\ No newline at end of file`, blank trailer, errors).
    Other,
}

/// Line ranges parsed from a hunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    /// First line of the old range.
    pub old_start: usize,
    /// Number of lines in the old range.
    pub old_count: usize,
    /// First line of the new range.
    pub new_start: usize,
    /// Number of lines in the new range.
    pub new_count: usize,
}

/// Resolve the file line under `visual_row` of `diff_text`.
///
/// Rows index `diff_text.lines()`. The scan replays every row up to and
/// including `visual_row`: a hunk header re-anchors the counter at its
/// new-file start, context and added rows advance it, removed rows and
/// metadata do not. The reported line is the counter minus one, never below 1.
/// A diff with no hunk header before the cursor resolves to line 1, and a row
/// past the end resolves to [`NO_SELECTION`].
///
/// # Examples
///
/// ```
/// use difi::core::resolve_line;
///
/// let diff = "@@ -1,3 +10,3 @@\n a\n b\n c";
/// assert_eq!(resolve_line(diff, 1), 10);
/// assert_eq!(resolve_line(diff, 3), 12);
/// assert_eq!(resolve_line(diff, 9), 0);
/// ```
pub fn resolve_line(diff_text: &str, visual_row: usize) -> usize {
    let mut current: Option<usize> = None;
    let mut scanned = 0usize;

    for raw in diff_text.lines().take(visual_row.saturating_add(1)) {
        scanned += 1;
        let line = strip_ansi(raw);

        if let Some(header) = parse_hunk_header(&line) {
            current = Some(header.new_start);
            continue;
        }

        if let Some(n) = current.as_mut() {
            if line.starts_with(' ') || line.starts_with('+') {
                *n += 1;
            }
        }
    }

    if scanned <= visual_row {
        return NO_SELECTION;
    }

    match current {
        Some(n) => n.saturating_sub(1).max(1),
        None => 1,
    }
}

/// Parse `@@ -a[,b] +c[,d] @@`. The header must start the line; strip any
/// ANSI decoration first.
pub fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    let after = line.strip_prefix("@@ ")?;
    let end = after.find(" @@")?;
    let mut ranges = after[..end].split_whitespace();

    let old = ranges.next()?.strip_prefix('-')?;
    let new = ranges.next()?.strip_prefix('+')?;
    if ranges.next().is_some() {
        return None;
    }

    let (old_start, old_count) = parse_range(old)?;
    let (new_start, new_count) = parse_range(new)?;
    Some(HunkHeader {
        old_start,
        old_count,
        new_start,
        new_count,
    })
}

/// Parse `start,count` or a bare `start` (count defaults to 1).
fn parse_range(s: &str) -> Option<(usize, usize)> {
    match s.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((s.parse().ok()?, 1)),
    }
}

const FILE_HEADERS: [&str; 10] = [
    "diff ",
    "index ",
    "--- ",
    "+++ ",
    "new file mode",
    "deleted file mode",
    "old mode",
    "new mode",
    "rename ",
    "similarity index",
];

/// Classifies the rows of one diff in order.
///
/// Inside a hunk the header's line counts decide where the body ends, so a
/// removed `-- comment` or an added `++x` stays a content line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineClassifier {
    old_left: usize,
    new_left: usize,
}

impl LineClassifier {
    /// Classifier positioned before the first row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind of the next row.
    pub fn classify(&mut self, line: &str) -> DiffLineKind {
        let line = strip_ansi(line);

        if let Some(header) = parse_hunk_header(&line) {
            self.old_left = header.old_count;
            self.new_left = header.new_count;
            return DiffLineKind::HunkHeader;
        }

        if self.in_hunk() {
            match line.as_bytes().first() {
                Some(b'+') => {
                    self.new_left = self.new_left.saturating_sub(1);
                    return DiffLineKind::Added;
                }
                Some(b'-') => {
                    self.old_left = self.old_left.saturating_sub(1);
                    return DiffLineKind::Removed;
                }
                Some(b' ') => {
                    self.old_left = self.old_left.saturating_sub(1);
                    self.new_left = self.new_left.saturating_sub(1);
                    return DiffLineKind::Context;
                }
                Some(b'\\') => return DiffLineKind::Other,
                _ => {
                    self.old_left = 0;
                    self.new_left = 0;
                }
            }
        }

        if FILE_HEADERS.iter().any(|p| line.starts_with(p)) {
            return DiffLineKind::FileHeader;
        }

        match line.as_bytes().first() {
            Some(b'+') => DiffLineKind::Added,
            Some(b'-') => DiffLineKind::Removed,
            Some(b' ') => DiffLineKind::Context,
            _ => DiffLineKind::Other,
        }
    }

    fn in_hunk(&self) -> bool {
        self.old_left > 0 || self.new_left > 0
    }
}

/// Kind of every row of `diff_text.lines()`, for colouring.
pub fn classify_lines(diff_text: &str) -> Vec<DiffLineKind> {
    let mut classifier = LineClassifier::new();
    diff_text
        .lines()
        .map(|line| classifier.classify(line))
        .collect()
}

/// Remove ANSI escape sequences (CSI, OSC and two-byte escapes).
///
/// Borrows when the input has no escape character.
pub fn strip_ansi(input: &str) -> Cow<'_, str> {
    if !input.contains('\x1b') && !input.contains('\u{9b}') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\x1b' => match chars.peek() {
                Some('[') => {
                    chars.next();
                    skip_csi(&mut chars);
                }
                Some(']') => {
                    chars.next();
                    skip_osc(&mut chars);
                }
                Some(_) => {
                    chars.next();
                }
                None => {}
            },
            '\u{9b}' => skip_csi(&mut chars),
            _ => out.push(ch),
        }
    }

    Cow::Owned(out)
}

/// Consume parameter and intermediate bytes up to the final byte.
fn skip_csi(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    for c in chars.by_ref() {
        if ('\u{40}'..='\u{7e}').contains(&c) {
            break;
        }
    }
}

/// Consume up to BEL or ST (`ESC \`).
fn skip_osc(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while let Some(c) = chars.next() {
        if c == '\x07' {
            break;
        }
        if c == '\x1b' && chars.peek() == Some(&'\\') {
            chars.next();
            break;
        }
    }
}
