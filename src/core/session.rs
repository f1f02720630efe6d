//! Interaction state machine.
//!
//! [`Session`] owns everything the user can see and change: focus, the tree
//! cursor, the diff cursor, help visibility and pane geometry. It consumes
//! [`Event`]s and answers with [`Command`]s; it never performs I/O itself, so
//! the runtime decides how and where fetches and editor launches happen.

use std::collections::BTreeSet;

use super::{
    build, classify_lines, resolve_line, visible_rows, DiffLineKind, DiffSummary, FileListing,
    PaneLayout, PathNode, DIFF_ERROR_PREFIX,
};

/// Status prefix for a failed file-list refresh; cleared by the next success.
const REFRESH_FAILED_PREFIX: &str = "Refresh failed: ";

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    /// File tree.
    #[default]
    Tree,
    /// Diff of the selected file.
    Diff,
}

/// Key categories the session understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// One row up.
    Up,
    /// One row down.
    Down,
    /// One page up.
    PageUp,
    /// One page down.
    PageDown,
    /// First row.
    Top,
    /// Last row.
    Bottom,
    /// Focus the tree pane.
    FocusTree,
    /// Focus the diff pane.
    FocusDiff,
    /// Switch focus.
    ToggleFocus,
    /// Open the selected file in the editor.
    Edit,
    /// Show or hide the help drawer.
    ToggleHelp,
    /// Reload the file list and current diff.
    Refresh,
    /// Fold or unfold the highlighted directory.
    ToggleFold,
    /// Leave.
    Quit,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Terminal resized.
    Resize {
        /// Columns.
        width: u16,
        /// Rows.
        height: u16,
    },
    /// Key press, already mapped to a category.
    Key(Key),
    /// A diff fetch finished.
    DiffLoaded {
        /// Path the diff was requested for.
        path: String,
        /// Diff text, or an error string.
        content: String,
    },
    /// The external editor exited.
    EditorFinished {
        /// Launch or exit failure, if any.
        error: Option<String>,
    },
    /// A file-list refresh finished.
    FilesListed {
        /// New listing or the failure message.
        result: Result<FileListing, String>,
    },
}

/// Side effects requested from the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch the diff for `path` and answer with [`Event::DiffLoaded`].
    FetchDiff {
        /// Repository-relative path.
        path: String,
    },
    /// Run the editor and answer with [`Event::EditorFinished`].
    OpenEditor {
        /// Repository-relative path.
        path: String,
        /// Line in the new file, 0 for none.
        line: usize,
    },
    /// Relist changed files and answer with [`Event::FilesListed`].
    RefreshFiles,
    /// Exit the program.
    Quit,
}

/// Flattened tree rows, the directories folded away, and a cursor over the
/// rows left visible.
#[derive(Debug, Clone, Default)]
pub struct TreeList {
    nodes: Vec<PathNode>,
    collapsed: BTreeSet<String>,
    /// Indices into `nodes`, in display order.
    visible: Vec<usize>,
    selected: usize,
    scroll: usize,
}

impl TreeList {
    /// Visible rows in display order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &PathNode> + '_ {
        self.visible.iter().map(|&i| &self.nodes[i])
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Index of the highlighted row among the visible ones.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// First visible row.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Highlighted row, if any.
    pub fn selected_row(&self) -> Option<&PathNode> {
        self.visible.get(self.selected).map(|&i| &self.nodes[i])
    }

    /// Whether `row` is a directory whose children are hidden.
    pub fn is_collapsed(&self, row: &PathNode) -> bool {
        row.is_directory && self.collapsed.contains(&row.full_path)
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    fn replace(&mut self, nodes: Vec<PathNode>) {
        self.nodes = nodes;
        let dirs: BTreeSet<&str> = self
            .nodes
            .iter()
            .filter(|row| row.is_directory)
            .map(|row| row.full_path.as_str())
            .collect();
        self.collapsed.retain(|path| dirs.contains(path.as_str()));
        self.refresh_visible();
    }

    fn refresh_visible(&mut self) {
        self.visible = visible_rows(&self.nodes, &self.collapsed);
        self.selected = self.selected.min(self.visible.len().saturating_sub(1));
    }

    /// Visible row showing the file `path`: its own row, or the folded
    /// directory hiding it.
    fn file_row(&self, path: &str) -> Option<usize> {
        let node = self
            .nodes
            .iter()
            .position(|row| row.is_file() && row.full_path == path)?;
        // pre-order: the closest visible row at or above a hidden node is its folded ancestor
        self.visible.iter().rposition(|&i| i <= node)
    }

    fn first_file_path(&self) -> Option<&str> {
        self.nodes
            .iter()
            .find(|row| row.is_file())
            .map(|row| row.full_path.as_str())
    }

    fn select(&mut self, index: usize, visible: usize) {
        self.selected = index.min(self.visible.len().saturating_sub(1));
        self.scroll = keep_visible(self.selected, self.scroll, visible);
    }

    /// Fold or unfold the highlighted directory. Returns false on a file row.
    fn toggle_selected(&mut self, visible: usize) -> bool {
        let Some(row) = self.selected_row() else {
            return false;
        };
        if !row.is_directory {
            return false;
        }
        let path = row.full_path.clone();
        if !self.collapsed.remove(&path) {
            self.collapsed.insert(path);
        }
        // rows above the directory are unaffected, so the cursor stays on it
        self.refresh_visible();
        self.clamp_scroll(visible);
        true
    }

    fn clamp_scroll(&mut self, visible: usize) {
        self.scroll = keep_visible(self.selected, self.scroll, visible);
    }
}

/// Diff of the selected file plus its cursor.
#[derive(Debug, Clone, Default)]
pub struct DiffView {
    raw_text: String,
    lines: Vec<String>,
    kinds: Vec<DiffLineKind>,
    cursor: usize,
    scroll: usize,
    loading: bool,
}

impl DiffView {
    /// Diff text exactly as fetched.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Diff split into lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Kind of each line, parallel to [`lines`](Self::lines).
    pub fn kinds(&self) -> &[DiffLineKind] {
        &self.kinds
    }

    /// Highlighted line.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// First visible line.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Whether a fetch for the selected file is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the content is a fetch failure message.
    pub fn is_error(&self) -> bool {
        self.raw_text.starts_with(DIFF_ERROR_PREFIX)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn set_text(&mut self, text: String, visible: usize) {
        self.lines = text.lines().map(str::to_string).collect();
        self.kinds = classify_lines(&text);
        self.raw_text = text;
        self.loading = false;
        self.cursor = self.cursor.min(self.lines.len().saturating_sub(1));
        self.scroll = keep_visible(self.cursor, self.scroll, visible);
    }

    fn move_to(&mut self, cursor: usize, visible: usize) {
        self.cursor = cursor.min(self.lines.len().saturating_sub(1));
        self.scroll = keep_visible(self.cursor, self.scroll, visible);
    }
}

/// Adjust `scroll` so `cursor` sits inside a window of `visible` rows.
fn keep_visible(cursor: usize, scroll: usize, visible: usize) -> usize {
    let visible = visible.max(1);
    if cursor < scroll {
        cursor
    } else if cursor >= scroll + visible {
        cursor + 1 - visible
    } else {
        scroll
    }
}

/// Target index after a navigation key over `len` rows.
fn step(current: usize, len: usize, key: Key, page: usize) -> usize {
    let last = len.saturating_sub(1);
    match key {
        Key::Up => current.saturating_sub(1),
        Key::Down => current.saturating_add(1).min(last),
        Key::PageUp => current.saturating_sub(page),
        Key::PageDown => current.saturating_add(page).min(last),
        Key::Top => 0,
        Key::Bottom => last,
        _ => current,
    }
}

/// State of one browsing session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    focus: Focus,
    selected_path: String,
    help_visible: bool,
    layout: PaneLayout,
    status: Option<String>,
    editing: bool,
    summary: DiffSummary,
    tree: TreeList,
    diff: DiffView,
}

impl Session {
    /// Fresh session for a terminal of the given size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            layout: PaneLayout::compute(width, height, false),
            ..Self::default()
        }
    }

    /// Focused pane.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Path shown in the diff pane, empty when nothing is selected.
    pub fn selected_path(&self) -> &str {
        &self.selected_path
    }

    /// Whether the help drawer is open.
    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// Current pane geometry.
    pub fn layout(&self) -> PaneLayout {
        self.layout
    }

    /// Last non-fatal message.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Whether the editor currently owns the terminal.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Added/deleted counts from the last listing.
    pub fn summary(&self) -> DiffSummary {
        self.summary
    }

    /// Tree rows and cursor.
    pub fn tree(&self) -> &TreeList {
        &self.tree
    }

    /// Diff of the selected file.
    pub fn diff(&self) -> &DiffView {
        &self.diff
    }

    /// Apply one event.
    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Resize { width, height } => {
                self.relayout(PaneLayout::compute(width, height, self.help_visible));
                Vec::new()
            }
            Event::Key(_) if self.editing => Vec::new(),
            Event::Key(key) => self.handle_key(key),
            Event::DiffLoaded { path, content } => {
                if path != self.selected_path {
                    tracing::debug!(%path, selected = %self.selected_path, "dropping stale diff");
                    return Vec::new();
                }
                let rows = self.layout.inner_rows();
                self.diff.set_text(content, rows);
                Vec::new()
            }
            Event::EditorFinished { error } => self.editor_finished(error),
            Event::FilesListed { result } => self.files_listed(result),
        }
    }

    fn handle_key(&mut self, key: Key) -> Vec<Command> {
        match key {
            Key::Quit => vec![Command::Quit],
            Key::ToggleHelp => {
                self.help_visible = !self.help_visible;
                self.relayout(self.layout.with_help(self.help_visible));
                Vec::new()
            }
            Key::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Tree => Focus::Diff,
                    Focus::Diff => Focus::Tree,
                };
                Vec::new()
            }
            Key::FocusTree => {
                self.focus = Focus::Tree;
                Vec::new()
            }
            Key::FocusDiff => {
                self.focus = Focus::Diff;
                Vec::new()
            }
            Key::Edit => self.edit(),
            Key::ToggleFold => {
                if self.focus == Focus::Tree {
                    self.tree.toggle_selected(self.layout.inner_rows());
                }
                Vec::new()
            }
            Key::Refresh => {
                let mut commands = vec![Command::RefreshFiles];
                commands.extend(self.refetch());
                commands
            }
            Key::Up | Key::Down | Key::PageUp | Key::PageDown | Key::Top | Key::Bottom => {
                self.navigate(key)
            }
        }
    }

    fn navigate(&mut self, key: Key) -> Vec<Command> {
        let rows = self.layout.inner_rows();
        match self.focus {
            Focus::Tree => {
                if self.tree.is_empty() {
                    return Vec::new();
                }
                let target = step(self.tree.selected, self.tree.len(), key, rows);
                self.tree.select(target, rows);
                self.select_current_row()
            }
            Focus::Diff => {
                let target = step(self.diff.cursor, self.diff.lines.len(), key, rows);
                self.diff.move_to(target, rows);
                Vec::new()
            }
        }
    }

    /// Switch the diff pane to the highlighted tree row when it is a new file.
    fn select_current_row(&mut self) -> Vec<Command> {
        let Some(row) = self.tree.selected_row() else {
            return Vec::new();
        };
        if !row.is_file() || row.full_path == self.selected_path {
            return Vec::new();
        }
        let path = row.full_path.clone();
        self.show_file(path)
    }

    fn show_file(&mut self, path: String) -> Vec<Command> {
        self.selected_path = path.clone();
        self.diff.reset();
        self.diff.loading = true;
        vec![Command::FetchDiff { path }]
    }

    fn refetch(&mut self) -> Option<Command> {
        if self.selected_path.is_empty() {
            return None;
        }
        self.diff.loading = true;
        Some(Command::FetchDiff {
            path: self.selected_path.clone(),
        })
    }

    fn edit(&mut self) -> Vec<Command> {
        if self.selected_path.is_empty() {
            return Vec::new();
        }
        let row = match self.focus {
            Focus::Diff => self.diff.cursor,
            Focus::Tree => 0,
        };
        let line = resolve_line(&self.diff.raw_text, row);
        self.editing = true;
        vec![Command::OpenEditor {
            path: self.selected_path.clone(),
            line,
        }]
    }

    fn editor_finished(&mut self, error: Option<String>) -> Vec<Command> {
        self.editing = false;
        self.status = error.map(|e| format!("Editor: {e}"));
        let mut commands: Vec<Command> = self.refetch().into_iter().collect();
        commands.push(Command::RefreshFiles);
        commands
    }

    fn files_listed(&mut self, result: Result<FileListing, String>) -> Vec<Command> {
        let listing = match result {
            Ok(listing) => listing,
            Err(message) => {
                tracing::warn!(%message, "file refresh failed");
                self.status = Some(format!("{REFRESH_FAILED_PREFIX}{message}"));
                return Vec::new();
            }
        };
        if self
            .status
            .as_deref()
            .is_some_and(|status| status.starts_with(REFRESH_FAILED_PREFIX))
        {
            self.status = None;
        }

        self.summary = listing.summary;
        self.tree.replace(build(&listing.files));
        let rows = self.layout.inner_rows();

        if !self.selected_path.is_empty() {
            if let Some(index) = self.tree.file_row(&self.selected_path) {
                self.tree.select(index, rows);
                return Vec::new();
            }
        }

        match self.tree.first_file_path().map(str::to_string) {
            Some(path) => {
                if let Some(index) = self.tree.file_row(&path) {
                    self.tree.select(index, rows);
                }
                self.show_file(path)
            }
            None => {
                self.selected_path.clear();
                self.diff.reset();
                self.tree.select(0, rows);
                Vec::new()
            }
        }
    }

    fn relayout(&mut self, layout: PaneLayout) {
        self.layout = layout;
        let rows = layout.inner_rows();
        self.tree.clamp_scroll(rows);
        self.diff.scroll = keep_visible(self.diff.cursor, self.diff.scroll, rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(files: &[&str]) -> Event {
        Event::FilesListed {
            result: Ok(FileListing {
                files: files.iter().map(|f| f.to_string()).collect(),
                summary: DiffSummary {
                    added: 3,
                    deleted: 1,
                },
            }),
        }
    }

    fn loaded(path: &str, content: &str) -> Event {
        Event::DiffLoaded {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    fn fetch(path: &str) -> Command {
        Command::FetchDiff {
            path: path.to_string(),
        }
    }

    const DIFF: &str = "diff --git a/a.rs b/a.rs\n--- a/a.rs\n+++ b/a.rs\n@@ -1,3 +10,3 @@\n a\n b\n c\n";

    #[test]
    fn first_listing_selects_first_file() {
        let mut s = Session::new(100, 30);
        let cmds = s.handle(listing(&["src/b.rs", "README.md", "src/a.rs"]));
        // "src" directory row sorts first, its first file is a.rs
        assert_eq!(cmds, vec![fetch("src/a.rs")]);
        assert_eq!(s.selected_path(), "src/a.rs");
        assert!(s.diff().is_loading());
        assert_eq!(s.summary().added, 3);
    }

    #[test]
    fn empty_listing_selects_nothing() {
        let mut s = Session::new(100, 30);
        assert!(s.handle(listing(&[])).is_empty());
        assert_eq!(s.selected_path(), "");
        assert!(s.handle(Event::Key(Key::Edit)).is_empty());
        assert!(s.handle(Event::Key(Key::Down)).is_empty());
    }

    #[test]
    fn moving_onto_a_new_file_fetches_it() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs", "b.rs"]));
        s.handle(loaded("a.rs", DIFF));

        let cmds = s.handle(Event::Key(Key::Down));
        assert_eq!(cmds, vec![fetch("b.rs")]);
        assert_eq!(s.selected_path(), "b.rs");
        assert!(s.diff().lines().is_empty());
        assert!(s.diff().is_loading());

        // bottom already reached, nothing to fetch
        assert!(s.handle(Event::Key(Key::Down)).is_empty());
    }

    #[test]
    fn directory_rows_do_not_change_selection() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["z.rs", "src/x/a.rs", "src/y/b.rs"]));
        assert_eq!(s.selected_path(), "src/x/a.rs");

        assert!(s.handle(Event::Key(Key::Top)).is_empty());
        assert_eq!(s.tree().selected_row().unwrap().display_name, "src");
        assert_eq!(s.selected_path(), "src/x/a.rs");
    }

    #[test]
    fn stale_diff_is_discarded() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs", "b.rs"]));
        s.handle(Event::Key(Key::Down));

        s.handle(loaded("a.rs", "old content"));
        assert!(s.diff().lines().is_empty());
        assert!(s.diff().is_loading());

        s.handle(loaded("b.rs", DIFF));
        assert_eq!(s.diff().lines().len(), 7);
        assert!(!s.diff().is_loading());
    }

    #[test]
    fn diff_cursor_clamps_and_scrolls() {
        let mut s = Session::new(100, 6); // content 5 rows, 3 inner rows
        s.handle(listing(&["a.rs"]));
        s.handle(loaded("a.rs", DIFF));
        s.handle(Event::Key(Key::FocusDiff));

        s.handle(Event::Key(Key::Up));
        assert_eq!(s.diff().cursor(), 0);

        for _ in 0..4 {
            s.handle(Event::Key(Key::Down));
        }
        assert_eq!(s.diff().cursor(), 4);
        assert_eq!(s.diff().scroll(), 2);

        s.handle(Event::Key(Key::Bottom));
        assert_eq!(s.diff().cursor(), 6);
        s.handle(Event::Key(Key::Down));
        assert_eq!(s.diff().cursor(), 6);

        s.handle(Event::Key(Key::Top));
        assert_eq!((s.diff().cursor(), s.diff().scroll()), (0, 0));
    }

    #[test]
    fn edit_resolves_line_under_cursor() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs"]));
        s.handle(loaded("a.rs", DIFF));
        s.handle(Event::Key(Key::ToggleFocus));
        for _ in 0..6 {
            s.handle(Event::Key(Key::Down));
        }

        let cmds = s.handle(Event::Key(Key::Edit));
        assert_eq!(
            cmds,
            vec![Command::OpenEditor {
                path: "a.rs".to_string(),
                line: 12
            }]
        );
        assert!(s.is_editing());
    }

    #[test]
    fn edit_from_tree_uses_first_row() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs"]));
        s.handle(loaded("a.rs", DIFF));
        let cmds = s.handle(Event::Key(Key::Edit));
        assert_eq!(
            cmds,
            vec![Command::OpenEditor {
                path: "a.rs".to_string(),
                line: 1
            }]
        );
    }

    #[test]
    fn keys_ignored_while_editing_and_finish_refreshes() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs", "b.rs"]));
        s.handle(Event::Key(Key::Edit));

        assert!(s.handle(Event::Key(Key::Down)).is_empty());
        assert!(s.handle(Event::Key(Key::Quit)).is_empty());

        let cmds = s.handle(Event::EditorFinished {
            error: Some("no editor found".to_string()),
        });
        assert_eq!(cmds, vec![fetch("a.rs"), Command::RefreshFiles]);
        assert!(!s.is_editing());
        assert_eq!(s.status(), Some("Editor: no editor found"));
    }

    #[test]
    fn relisting_keeps_selection_by_path() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs", "b.rs"]));
        s.handle(Event::Key(Key::Down));
        assert_eq!(s.selected_path(), "b.rs");

        let cmds = s.handle(listing(&["0.rs", "a.rs", "b.rs"]));
        assert!(cmds.is_empty());
        assert_eq!(s.selected_path(), "b.rs");
        assert_eq!(s.tree().selected(), 2);
    }

    #[test]
    fn relisting_without_selected_file_moves_to_first() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs", "b.rs"]));
        s.handle(Event::Key(Key::Down));

        let cmds = s.handle(listing(&["c.rs", "d.rs"]));
        assert_eq!(cmds, vec![fetch("c.rs")]);
    }

    #[test]
    fn failed_listing_keeps_old_tree() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs"]));
        let cmds = s.handle(Event::FilesListed {
            result: Err("git exploded".to_string()),
        });
        assert!(cmds.is_empty());
        assert_eq!(s.tree().rows().len(), 1);
        assert_eq!(s.status(), Some("Refresh failed: git exploded"));
    }

    #[test]
    fn stale_diff_arriving_after_the_current_one_is_discarded() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs", "b.rs"]));
        s.handle(Event::Key(Key::Down));

        s.handle(loaded("b.rs", "B"));
        s.handle(loaded("a.rs", "A"));
        assert_eq!(s.diff().raw_text(), "B");
        assert!(!s.diff().is_loading());
    }

    #[test]
    fn successful_listing_clears_refresh_failure_only() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs"]));
        s.handle(Event::FilesListed {
            result: Err("index.lock exists".to_string()),
        });
        s.handle(listing(&["a.rs"]));
        assert_eq!(s.status(), None);

        s.handle(Event::Key(Key::Edit));
        s.handle(Event::EditorFinished {
            error: Some("exit status: 1".to_string()),
        });
        s.handle(listing(&["a.rs"]));
        assert_eq!(s.status(), Some("Editor: exit status: 1"));
    }

    fn visible_names(s: &Session) -> Vec<String> {
        s.tree().rows().map(|r| r.display_name.clone()).collect()
    }

    #[test]
    fn folding_hides_and_restores_a_directory() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["src/a.rs", "src/b.rs", "z.rs"]));
        s.handle(Event::Key(Key::Top));
        assert_eq!(s.tree().selected_row().unwrap().display_name, "src");

        assert!(s.handle(Event::Key(Key::ToggleFold)).is_empty());
        assert_eq!(visible_names(&s), ["src", "z.rs"]);
        assert!(s.tree().is_collapsed(s.tree().selected_row().unwrap()));
        // the diff pane keeps showing the hidden file
        assert_eq!(s.selected_path(), "src/a.rs");

        assert_eq!(s.handle(Event::Key(Key::Down)), vec![fetch("z.rs")]);
        s.handle(Event::Key(Key::Up));
        s.handle(Event::Key(Key::ToggleFold));
        assert_eq!(visible_names(&s), ["src", "a.rs", "b.rs", "z.rs"]);
        assert_eq!(s.tree().selected(), 0);
    }

    #[test]
    fn fold_key_ignores_files_and_diff_focus() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["src/a.rs", "z.rs"]));
        s.handle(Event::Key(Key::ToggleFold));
        assert_eq!(visible_names(&s).len(), 3);

        s.handle(Event::Key(Key::Top));
        s.handle(Event::Key(Key::FocusDiff));
        s.handle(Event::Key(Key::ToggleFold));
        assert_eq!(visible_names(&s).len(), 3);
    }

    #[test]
    fn folds_survive_relisting_and_selection_lands_on_folded_parent() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs", "src/b.rs", "src/c.rs"]));
        assert_eq!(s.selected_path(), "src/b.rs");
        s.handle(Event::Key(Key::Top));
        s.handle(Event::Key(Key::ToggleFold));

        let cmds = s.handle(listing(&["0.rs", "a.rs", "src/b.rs", "src/c.rs"]));
        assert!(cmds.is_empty());
        assert_eq!(visible_names(&s), ["src", "0.rs", "a.rs"]);
        assert_eq!(s.selected_path(), "src/b.rs");
        assert_eq!(s.tree().selected_row().unwrap().display_name, "src");

        // a folded directory that disappears forgets its fold
        s.handle(listing(&["a.rs"]));
        s.handle(listing(&["a.rs", "src/b.rs"]));
        assert_eq!(visible_names(&s), ["src", "b.rs", "a.rs"]);
    }

    #[test]
    fn toggling_help_twice_restores_layout() {
        let mut s = Session::new(120, 40);
        let before = s.layout();
        s.handle(Event::Key(Key::ToggleHelp));
        assert!(s.help_visible());
        assert_ne!(s.layout(), before);
        s.handle(Event::Key(Key::ToggleHelp));
        assert_eq!(s.layout(), before);
    }

    #[test]
    fn resize_keeps_cursor_visible() {
        let mut s = Session::new(100, 40);
        s.handle(listing(&["a.rs"]));
        s.handle(loaded("a.rs", &"+x\n".repeat(50)));
        s.handle(Event::Key(Key::FocusDiff));
        s.handle(Event::Key(Key::Bottom));

        s.handle(Event::Resize {
            width: 100,
            height: 10,
        });
        let rows = s.layout().inner_rows();
        let d = s.diff();
        assert!(d.cursor() >= d.scroll() && d.cursor() < d.scroll() + rows);
    }

    #[test]
    fn refresh_key_relists_and_refetches() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs"]));
        s.handle(loaded("a.rs", DIFF));
        let cmds = s.handle(Event::Key(Key::Refresh));
        assert_eq!(cmds, vec![Command::RefreshFiles, fetch("a.rs")]);
    }

    #[test]
    fn shorter_reload_clamps_cursor() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs"]));
        s.handle(loaded("a.rs", DIFF));
        s.handle(Event::Key(Key::FocusDiff));
        s.handle(Event::Key(Key::Bottom));
        s.handle(loaded("a.rs", "@@ -1 +1 @@\n+x"));
        assert_eq!(s.diff().cursor(), 1);
    }

    #[test]
    fn error_text_is_flagged() {
        let mut s = Session::new(100, 30);
        s.handle(listing(&["a.rs"]));
        s.handle(loaded("a.rs", "Error fetching diff: boom"));
        assert!(s.diff().is_error());
    }
}
