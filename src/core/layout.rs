//! Pane geometry derived from the terminal size.

/// Share of the terminal width given to the tree pane, in percent.
pub const TREE_WIDTH_PERCENT: u16 = 20;
/// Narrowest tree pane.
pub const MIN_TREE_WIDTH: u16 = 20;
/// Columns eaten by the diff pane's borders.
pub const DIFF_BORDER_COLUMNS: u16 = 2;
/// Rows used by the status bar.
pub const STATUS_BAR_HEIGHT: u16 = 1;
/// Rows used by the help drawer when open.
pub const HELP_DRAWER_HEIGHT: u16 = 6;

/// Widths and heights of the panes for one terminal size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaneLayout {
    /// Terminal width.
    pub width: u16,
    /// Terminal height.
    pub height: u16,
    /// Tree pane width including its border.
    pub tree_width: u16,
    /// Usable diff pane width, borders excluded.
    pub diff_width: u16,
    /// Rows available to both panes; never below 1.
    pub content_height: u16,
    /// Whether the help drawer is taken out of the content height.
    pub help_visible: bool,
}

impl PaneLayout {
    /// Compute the layout. Pure; toggling `help_visible` back restores the
    /// previous result exactly.
    #[must_use]
    pub fn compute(width: u16, height: u16, help_visible: bool) -> Self {
        let proportional = (u32::from(width) * u32::from(TREE_WIDTH_PERCENT) / 100) as u16;
        let tree_width = proportional.max(MIN_TREE_WIDTH);
        let diff_width = width
            .saturating_sub(tree_width)
            .saturating_sub(DIFF_BORDER_COLUMNS);

        let drawer = if help_visible { HELP_DRAWER_HEIGHT } else { 0 };
        let content_height = height
            .saturating_sub(STATUS_BAR_HEIGHT)
            .saturating_sub(drawer)
            .max(1);

        Self {
            width,
            height,
            tree_width,
            diff_width,
            content_height,
            help_visible,
        }
    }

    /// Same terminal size with the help drawer flipped.
    #[must_use]
    pub fn with_help(self, help_visible: bool) -> Self {
        Self::compute(self.width, self.height, help_visible)
    }

    /// Rows visible inside a bordered pane.
    #[must_use]
    pub fn inner_rows(&self) -> usize {
        usize::from(self.content_height.saturating_sub(2)).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_terminal_uses_proportional_tree() {
        let l = PaneLayout::compute(200, 50, false);
        assert_eq!(l.tree_width, 40);
        assert_eq!(l.diff_width, 158);
        assert_eq!(l.content_height, 49);
    }

    #[test]
    fn narrow_terminal_keeps_minimum_tree() {
        let l = PaneLayout::compute(80, 24, false);
        assert_eq!(l.tree_width, 20);
        assert_eq!(l.diff_width, 58);
    }

    #[test]
    fn help_drawer_takes_six_rows() {
        let closed = PaneLayout::compute(120, 40, false);
        let open = PaneLayout::compute(120, 40, true);
        assert_eq!(closed.content_height - open.content_height, HELP_DRAWER_HEIGHT);
        assert_eq!(closed.tree_width, open.tree_width);
    }

    #[test]
    fn toggling_help_twice_restores_layout() {
        let start = PaneLayout::compute(97, 31, false);
        let back = start.with_help(true).with_help(false);
        assert_eq!(start, back);
    }

    #[test]
    fn tiny_terminal_never_collapses() {
        let l = PaneLayout::compute(5, 3, true);
        assert_eq!(l.content_height, 1);
        assert_eq!(l.diff_width, 0);
        assert_eq!(l.inner_rows(), 1);
    }
}
