use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Everything a keypress can do in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    EnlargeGrid,
    ShrinkGrid,
    ToggleMic,
    ToggleCamera,
    NextSlot,
    PrevSlot,
    ToggleFocus,
    Refetch,
}

pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::EnlargeGrid),
        KeyCode::Char('-') => Some(Action::ShrinkGrid),
        KeyCode::Char('m') => Some(Action::ToggleMic),
        KeyCode::Char('v') => Some(Action::ToggleCamera),
        KeyCode::Right | KeyCode::Down | KeyCode::Tab => Some(Action::NextSlot),
        KeyCode::Left | KeyCode::Up => Some(Action::PrevSlot),
        KeyCode::Enter => Some(Action::ToggleFocus),
        KeyCode::Char('r') => Some(Action::Refetch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    #[test]
    fn test_quit_bindings() {
        assert_eq!(map_key(key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(Action::Quit));

        let ctrl_c = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        };
        assert_eq!(map_key(ctrl_c), Some(Action::Quit));
    }

    #[test]
    fn test_grid_and_media_bindings() {
        assert_eq!(map_key(key(KeyCode::Char('+'))), Some(Action::EnlargeGrid));
        assert_eq!(map_key(key(KeyCode::Char('-'))), Some(Action::ShrinkGrid));
        assert_eq!(map_key(key(KeyCode::Char('m'))), Some(Action::ToggleMic));
        assert_eq!(map_key(key(KeyCode::Char('v'))), Some(Action::ToggleCamera));
        assert_eq!(map_key(key(KeyCode::Char('x'))), None);
    }
}
