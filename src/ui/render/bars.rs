//! Status bar and help drawer.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::ui::app::App;

/// Key hints in the help drawer, one array per column.
const HELP_COLUMNS: [[&str; 3]; 4] = [
    ["↑/k   Move Up", "↓/j   Move Down", "g/G   Top/Bottom"],
    ["←/h   Left Panel", "→/l   Right Panel", "Spc   Fold Folder"],
    ["Tab   Switch Panel", "Ent/e Edit File", "r     Refresh"],
    ["q     Quit", "?     Close Help", ""],
];

const HELP_HINT: &str = "? Help ";

/// Render the bottom status bar.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let base = Style::default().bg(theme.bar_bg).fg(theme.bar_fg);
    let divider = Span::styled(" │ ", base.fg(theme.divider));
    let summary = app.session().summary();

    let mut spans = vec![
        Span::styled(
            format!(" {}", app.repo_name),
            base.fg(theme.repo).add_modifier(Modifier::BOLD),
        ),
        divider.clone(),
        Span::styled(
            format!("{} ↔ {}", app.branch, app.target),
            base.fg(theme.branch),
        ),
        divider.clone(),
        Span::styled(format!("+{}", summary.added), base.fg(theme.added)),
        Span::styled(" ", base),
        Span::styled(format!("-{}", summary.deleted), base.fg(theme.deleted)),
    ];

    if let Some(status) = app.session().status() {
        spans.push(divider);
        spans.push(Span::styled(status.to_string(), base.fg(theme.error)));
    }

    let total = area.width as usize;
    let right_len = HELP_HINT.chars().count();
    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding = total.saturating_sub(left_len).saturating_sub(right_len);
    spans.push(Span::styled(" ".repeat(padding), base));
    spans.push(Span::styled(HELP_HINT, base.fg(theme.help_text)));

    let para = Paragraph::new(Line::from(spans)).style(base);
    frame.render_widget(para, area);
}

/// Render the key-hint drawer above the status bar.
pub fn render_help_drawer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(theme.divider))
        .padding(Padding::new(2, 2, 1, 0));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::horizontal([Constraint::Length(22); HELP_COLUMNS.len()]).split(inner);
    let style = Style::default().fg(theme.help_text);
    for (column, entries) in columns.iter().zip(HELP_COLUMNS) {
        let lines: Vec<Line> = entries
            .iter()
            .map(|entry| Line::from(Span::styled(*entry, style)))
            .collect();
        frame.render_widget(Paragraph::new(lines), *column);
    }
}
