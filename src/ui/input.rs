//! Input handling.

use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::App;
use crate::core::{Event, Key};

/// Feed a crossterm event to the app. Returns true if it was used.
pub fn handle_input(app: &mut App, event: TermEvent) -> bool {
    match event {
        TermEvent::Resize(width, height) => {
            app.dispatch(Event::Resize { width, height });
            true
        }
        TermEvent::Key(key) if key.kind != KeyEventKind::Release => match map_key(key) {
            Some(key) => {
                app.dispatch(Event::Key(key));
                true
            }
            None => false,
        },
        _ => false,
    }
}

/// Map a key press to the category the session understands.
pub fn map_key(key: KeyEvent) -> Option<Key> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    let mapped = match key.code {
        KeyCode::Char('c') if ctrl => Key::Quit,
        KeyCode::Char('l') if ctrl => Key::FocusDiff,
        KeyCode::Char('h') if ctrl => Key::FocusTree,
        _ if ctrl => return None,

        KeyCode::Char('q') => Key::Quit,
        KeyCode::Char('?') => Key::ToggleHelp,
        KeyCode::Tab | KeyCode::BackTab => Key::ToggleFocus,
        KeyCode::Char('l') | KeyCode::Char(']') | KeyCode::Right => Key::FocusDiff,
        KeyCode::Char('h') | KeyCode::Char('[') | KeyCode::Left => Key::FocusTree,
        KeyCode::Char('e') | KeyCode::Enter => Key::Edit,
        KeyCode::Char('j') | KeyCode::Down => Key::Down,
        KeyCode::Char('k') | KeyCode::Up => Key::Up,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::Char('g') | KeyCode::Home => Key::Top,
        KeyCode::Char('G') | KeyCode::End => Key::Bottom,
        KeyCode::Char('r') => Key::Refresh,
        KeyCode::Char(' ') => Key::ToggleFold,
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn quit_keys() {
        assert_eq!(map_key(key(KeyCode::Char('q'))), Some(Key::Quit));
        assert_eq!(map_key(ctrl('c')), Some(Key::Quit));
    }

    #[test]
    fn focus_keys() {
        for code in [KeyCode::Char('l'), KeyCode::Char(']'), KeyCode::Right] {
            assert_eq!(map_key(key(code)), Some(Key::FocusDiff));
        }
        for code in [KeyCode::Char('h'), KeyCode::Char('['), KeyCode::Left] {
            assert_eq!(map_key(key(code)), Some(Key::FocusTree));
        }
        assert_eq!(map_key(ctrl('l')), Some(Key::FocusDiff));
        assert_eq!(map_key(ctrl('h')), Some(Key::FocusTree));
        assert_eq!(map_key(key(KeyCode::Tab)), Some(Key::ToggleFocus));
    }

    #[test]
    fn movement_and_actions() {
        assert_eq!(map_key(key(KeyCode::Char('j'))), Some(Key::Down));
        assert_eq!(map_key(key(KeyCode::Up)), Some(Key::Up));
        assert_eq!(map_key(key(KeyCode::Char('G'))), Some(Key::Bottom));
        assert_eq!(map_key(key(KeyCode::Char('g'))), Some(Key::Top));
        assert_eq!(map_key(key(KeyCode::Enter)), Some(Key::Edit));
        assert_eq!(map_key(key(KeyCode::Char('e'))), Some(Key::Edit));
        assert_eq!(map_key(key(KeyCode::Char('?'))), Some(Key::ToggleHelp));
        assert_eq!(map_key(key(KeyCode::Char('r'))), Some(Key::Refresh));
        assert_eq!(map_key(key(KeyCode::Char(' '))), Some(Key::ToggleFold));
    }

    #[test]
    fn unmapped_keys() {
        assert_eq!(map_key(key(KeyCode::Char('x'))), None);
        assert_eq!(map_key(ctrl('j')), None);
        assert_eq!(map_key(key(KeyCode::Esc)), None);
    }
}
