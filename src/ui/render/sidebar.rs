//! File tree pane.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::core::Focus;
use crate::ui::app::App;

use super::helpers::{file_icon, truncate_str, DIRECTORY_ICON};

const FOLDED_MARKER: &str = "▸ ";
const UNFOLDED_MARKER: &str = "▾ ";

/// Render the file tree.
pub fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();
    let theme = &app.theme;
    let is_focused = session.focus() == Focus::Tree;

    let border_color = if is_focused {
        theme.border_active
    } else {
        theme.border_dim
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let height = inner.height as usize;
    if height == 0 || inner.width == 0 {
        return;
    }

    let tree = session.tree();
    if tree.is_empty() {
        let para = Paragraph::new("No changes").style(Style::default().fg(theme.text_muted));
        frame.render_widget(para, inner);
        return;
    }

    let width = inner.width as usize;
    let lines: Vec<Line> = tree
        .rows()
        .enumerate()
        .skip(tree.scroll())
        .take(height)
        .map(|(index, row)| {
            let is_selected = index == tree.selected();
            let indent = "  ".repeat(row.depth);
            let marker = match (row.is_directory, tree.is_collapsed(row)) {
                (false, _) => "  ",
                (true, true) => FOLDED_MARKER,
                (true, false) => UNFOLDED_MARKER,
            };
            let icon = match (app.icons, row.is_directory) {
                (false, _) => String::new(),
                (true, true) => format!("{} ", DIRECTORY_ICON),
                (true, false) => format!("{} ", file_icon(&row.display_name)),
            };
            let label = format!("{indent}{marker}{icon}{}", row.display_name);
            let label = truncate_str(&label, width);

            let mut style = if row.is_directory {
                Style::default().fg(theme.directory)
            } else {
                Style::default().fg(theme.text_normal)
            };
            if is_selected {
                style = style.bg(theme.selected_bg).add_modifier(Modifier::BOLD);
                style = if is_focused {
                    style.fg(theme.selected_fg)
                } else {
                    style.fg(theme.text_muted)
                };
            }

            let padding = width.saturating_sub(label.chars().count());
            Line::from(vec![
                Span::styled(label, style),
                Span::styled(" ".repeat(padding), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
