//! UI rendering with ratatui.
//!
//! Rendering is a pure projection of [`App`] state: pane sizes come from the
//! session's [`PaneLayout`](crate::core::PaneLayout), colours from the theme.

mod bars;
mod diff;
mod helpers;
mod sidebar;

use ratatui::{
    layout::{Constraint, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use crate::core::{HELP_DRAWER_HEIGHT, STATUS_BAR_HEIGHT};

use super::app::App;

pub use helpers::{file_icon, sanitize_line, truncate_str, DIRECTORY_ICON};

/// Main render function.
pub fn render(frame: &mut Frame, app: &App) {
    let _timer = crate::metrics::Timer::start("render_frame");

    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.bar_bg)),
        frame.area(),
    );

    let layout = app.session().layout();
    let mut rows = vec![Constraint::Length(layout.content_height)];
    if layout.help_visible {
        rows.push(Constraint::Length(HELP_DRAWER_HEIGHT));
    }
    rows.push(Constraint::Length(STATUS_BAR_HEIGHT));
    let chunks = Layout::vertical(rows).split(frame.area());

    let panes = Layout::horizontal([Constraint::Length(layout.tree_width), Constraint::Min(0)])
        .split(chunks[0]);
    sidebar::render_sidebar(frame, app, panes[0]);
    diff::render_diff(frame, app, panes[1]);

    if layout.help_visible {
        bars::render_help_drawer(frame, app, chunks[1]);
    }
    bars::render_status_bar(frame, app, chunks[chunks.len() - 1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        Backend, DiffSummary, EditorLauncher, Event, FileListing, Key, LaunchError, VcsError,
        VcsProvider,
    };
    use crate::theme::Theme;
    use crate::ui::AppOptions;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct Fixed;

    impl VcsProvider for Fixed {
        fn backend(&self) -> Backend {
            Backend::Git
        }
        fn current_branch_name(&self) -> String {
            "feature".into()
        }
        fn repository_display_name(&self) -> String {
            "difi".into()
        }
        fn list_changed_files(&self, _: &str) -> Result<Vec<String>, VcsError> {
            Ok(vec!["src/main.rs".into()])
        }
        fn fetch_diff(&self, _: &str, _: &str) -> String {
            "@@ -1,1 +1,2 @@\n fn main() {}\n+// added".into()
        }
        fn diff_summary(&self, _: &str) -> DiffSummary {
            DiffSummary {
                added: 1,
                deleted: 0,
            }
        }
        fn status_summary(&self, _: &str) -> Result<String, VcsError> {
            Ok(String::new())
        }
        fn default_target(&self) -> String {
            "HEAD".into()
        }
    }

    struct NoEditor;

    impl EditorLauncher for NoEditor {
        fn launch(&self, _: &str, _: usize) -> Result<(), LaunchError> {
            Err(LaunchError::NoEditor)
        }
    }

    fn app(width: u16, height: u16) -> App {
        let provider: Arc<dyn VcsProvider> = Arc::new(Fixed);
        let listing = provider.file_listing("HEAD").unwrap();
        App::new(
            provider,
            Box::new(NoEditor),
            listing,
            AppOptions {
                target: "HEAD".into(),
                theme: Theme::default(),
                icons: false,
                watch_root: None,
                width,
                height,
            },
        )
    }

    fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn status_bar_shows_repo_branch_and_counts() {
        let app = app(100, 20);
        let text = screen(&app, 100, 20);
        assert!(text.contains("difi"));
        assert!(text.contains("feature"));
        assert!(text.contains("HEAD"));
        assert!(text.contains("+1"));
        assert!(text.contains("? Help"));
        assert!(text.contains("src"));
        assert!(text.contains("main.rs"));
    }

    #[test]
    fn help_drawer_lists_keys() {
        let mut app = app(100, 20);
        app.dispatch(Event::Key(Key::ToggleHelp));
        let text = screen(&app, 100, 20);
        assert!(text.contains("Switch Panel"));
        assert!(text.contains("Edit File"));
    }

    #[test]
    fn diff_text_appears_once_loaded() {
        let mut app = app(100, 20);
        for _ in 0..200 {
            app.poll_worker();
            if !app.session().diff().lines().is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        let text = screen(&app, 100, 20);
        assert!(text.contains("+// added"));
    }

    #[test]
    fn folded_directory_shows_closed_marker() {
        let mut app = app(100, 20);
        assert!(screen(&app, 100, 20).contains("▾ src"));

        app.dispatch(Event::Key(Key::Top));
        app.dispatch(Event::Key(Key::ToggleFold));
        let text = screen(&app, 100, 20);
        assert!(text.contains("▸ src"));
        assert!(!text.contains("▾ src"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut app = app(4, 2);
        app.dispatch(Event::Key(Key::ToggleHelp));
        let _ = screen(&app, 4, 2);
    }

    #[test]
    fn editor_failure_reaches_status_bar() {
        let mut app = app(120, 20);
        app.dispatch(Event::Key(Key::Edit));
        let text = screen(&app, 120, 20);
        assert!(text.contains("no editor found"));
        assert!(!app.session().is_editing());
    }

    #[test]
    fn empty_listing_renders_placeholder() {
        let provider: Arc<dyn VcsProvider> = Arc::new(Fixed);
        let app = App::new(
            provider,
            Box::new(NoEditor),
            FileListing::default(),
            AppOptions {
                target: "HEAD".into(),
                theme: Theme::default(),
                icons: true,
                watch_root: None,
                width: 80,
                height: 12,
            },
        );
        let text = screen(&app, 80, 12);
        assert!(text.contains("No changes"));
    }
}
