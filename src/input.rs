use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::messages::UiEvent;

/// Map a terminal key event to a UiEvent.
///
/// Space is the straight key: press and auto-repeat map to `KeyDown`, release
/// to `KeyUp`. Every other binding fires on press/repeat only.
pub fn handle_key(key: KeyEvent, entering_text: bool, sending: bool) -> Option<UiEvent> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(UiEvent::Quit);
    }

    // A held straight key must still be released while the text line is open
    if key.code == KeyCode::Char(' ') && key.kind == KeyEventKind::Release {
        return Some(UiEvent::KeyUp);
    }

    if entering_text {
        return handle_text_key(key);
    }

    if key.code == KeyCode::Char(' ') {
        return match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => Some(UiEvent::KeyDown),
            KeyEventKind::Release => Some(UiEvent::KeyUp),
        };
    }

    if key.kind == KeyEventKind::Release {
        return None;
    }

    let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Esc if sending => Some(UiEvent::CancelSend),
        KeyCode::Esc | KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('.') => Some(UiEvent::Dit),
        KeyCode::Char('-') => Some(UiEvent::Dah),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectControl(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectControl(1)),
        KeyCode::Left | KeyCode::Char('h') => Some(UiEvent::Adjust(-1, coarse)),
        KeyCode::Right | KeyCode::Char('l') => Some(UiEvent::Adjust(1, coarse)),
        KeyCode::Enter => Some(UiEvent::Activate),
        KeyCode::Char('/') => Some(UiEvent::BeginText),
        _ => None,
    }
}

fn handle_text_key(key: KeyEvent) -> Option<UiEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Esc => Some(UiEvent::CancelText),
        KeyCode::Enter => Some(UiEvent::SubmitText),
        KeyCode::Backspace => Some(UiEvent::TextBackspace),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(UiEvent::TextChar(c))
        }
        _ => None,
    }
}

/// Key labels for the hint bar
pub fn key_hints(entering_text: bool) -> Vec<(&'static str, &'static str)> {
    if entering_text {
        return vec![("Enter", "Send"), ("Backspace", "Delete"), ("Esc", "Cancel")];
    }
    vec![
        (".", "Dit"),
        ("-", "Dah"),
        ("Space", "Key"),
        ("↑/↓", "Select"),
        ("←/→", "Adjust"),
        ("Shift", "Coarse"),
        ("Enter", "Toggle"),
        ("/", "Send text"),
        ("Esc", "Quit"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn with_kind(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)
    }

    #[test]
    fn space_is_the_straight_key() {
        let space = KeyCode::Char(' ');
        assert_eq!(handle_key(press(space), false, false), Some(UiEvent::KeyDown));
        assert_eq!(
            handle_key(with_kind(space, KeyEventKind::Repeat), false, false),
            Some(UiEvent::KeyDown)
        );
        assert_eq!(
            handle_key(with_kind(space, KeyEventKind::Release), false, false),
            Some(UiEvent::KeyUp)
        );
    }

    #[test]
    fn releases_of_other_keys_are_ignored() {
        assert_eq!(
            handle_key(with_kind(KeyCode::Char('.'), KeyEventKind::Release), false, false),
            None
        );
    }

    #[test]
    fn dit_dah_and_navigation() {
        assert_eq!(handle_key(press(KeyCode::Char('.')), false, false), Some(UiEvent::Dit));
        assert_eq!(handle_key(press(KeyCode::Char('-')), false, false), Some(UiEvent::Dah));
        assert_eq!(
            handle_key(press(KeyCode::Down), false, false),
            Some(UiEvent::SelectControl(1))
        );
        let shift_right =
            KeyEvent::new_with_kind(KeyCode::Right, KeyModifiers::SHIFT, KeyEventKind::Press);
        assert_eq!(handle_key(shift_right, false, false), Some(UiEvent::Adjust(1, true)));
    }

    #[test]
    fn escape_cancels_send_before_quitting() {
        assert_eq!(handle_key(press(KeyCode::Esc), false, true), Some(UiEvent::CancelSend));
        assert_eq!(handle_key(press(KeyCode::Esc), false, false), Some(UiEvent::Quit));
    }

    #[test]
    fn text_entry_captures_characters() {
        assert_eq!(
            handle_key(press(KeyCode::Char('q')), true, false),
            Some(UiEvent::TextChar('q'))
        );
        assert_eq!(
            handle_key(press(KeyCode::Char(' ')), true, false),
            Some(UiEvent::TextChar(' '))
        );
        assert_eq!(handle_key(press(KeyCode::Enter), true, false), Some(UiEvent::SubmitText));
        assert_eq!(handle_key(press(KeyCode::Esc), true, false), Some(UiEvent::CancelText));
    }

    #[test]
    fn space_release_reaches_keyer_during_text_entry() {
        let release = with_kind(KeyCode::Char(' '), KeyEventKind::Release);
        assert_eq!(handle_key(release, true, false), Some(UiEvent::KeyUp));
        assert_eq!(
            handle_key(with_kind(KeyCode::Char('x'), KeyEventKind::Release), true, false),
            None
        );
    }
}
