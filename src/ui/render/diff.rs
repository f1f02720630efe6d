//! Diff pane.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::core::{DiffLineKind, Focus};
use crate::theme::Theme;
use crate::ui::app::App;

use super::helpers::{sanitize_line, truncate_str};

/// Render the selected file's diff.
pub fn render_diff(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();
    let theme = &app.theme;
    let is_focused = session.focus() == Focus::Diff;

    let border_color = if is_focused {
        theme.border_active
    } else {
        theme.border_dim
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));
    if !session.selected_path().is_empty() {
        block = block.title(Span::styled(
            format!(" {} ", session.selected_path()),
            Style::default().fg(theme.text_muted),
        ));
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let diff = session.diff();
    if diff.lines().is_empty() {
        let msg = if diff.is_loading() {
            "Loading diff…"
        } else if session.selected_path().is_empty() {
            "Select a file"
        } else {
            "No diff"
        };
        let para = Paragraph::new(msg).style(Style::default().fg(theme.text_muted));
        frame.render_widget(para, inner);
        return;
    }

    let width = inner.width as usize;
    let is_error = diff.is_error();
    let lines: Vec<Line> = diff
        .lines()
        .iter()
        .zip(diff.kinds())
        .enumerate()
        .skip(diff.scroll())
        .take(inner.height as usize)
        .map(|(index, (raw, kind))| {
            let text = truncate_str(&sanitize_line(raw), width);
            let mut style = if is_error {
                Style::default().fg(theme.error)
            } else {
                line_style(*kind, theme)
            };
            if is_focused && index == diff.cursor() {
                style = style.bg(theme.selected_bg).fg(theme.selected_fg);
                let padding = width.saturating_sub(text.chars().count());
                return Line::from(vec![
                    Span::styled(text, style),
                    Span::styled(" ".repeat(padding), style),
                ]);
            }
            Line::from(Span::styled(text, style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn line_style(kind: DiffLineKind, theme: &Theme) -> Style {
    match kind {
        DiffLineKind::Added => Style::default().fg(theme.added),
        DiffLineKind::Removed => Style::default().fg(theme.deleted),
        DiffLineKind::HunkHeader => Style::default().fg(theme.hunk),
        DiffLineKind::FileHeader => Style::default()
            .fg(theme.file_header)
            .add_modifier(Modifier::BOLD),
        DiffLineKind::Context | DiffLineKind::Other => Style::default().fg(theme.text_normal),
    }
}
