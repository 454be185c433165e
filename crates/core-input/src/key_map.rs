use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a crossterm key event into an editor key.
///
/// Releases and keys the editor has no binding for (function keys, media
/// keys, lone modifiers) map to `None`. Shift is dropped from characters
/// since it is already reflected in the character itself.
pub fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    let code = match event.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::BackTab => KeyCode::BackTab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        _ => return None,
    };
    let mut mods = map_mods(event.modifiers);
    if matches!(code, KeyCode::Char(_) | KeyCode::BackTab) {
        mods.remove(KeyModifiers::SHIFT);
    }
    Some(KeyEvent::new(code, mods))
}

pub fn map_mods(m: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: CKeyCode, mods: CKeyModifiers) -> CKeyEvent {
        CKeyEvent::new(code, mods)
    }

    #[test]
    fn shifted_characters_are_plain() {
        let key = map_key_event(&press(CKeyCode::Char('A'), CKeyModifiers::SHIFT)).unwrap();
        assert_eq!(key, KeyEvent::from('A'));
    }

    #[test]
    fn control_chords_keep_ctrl() {
        let key = map_key_event(&press(CKeyCode::Char('z'), CKeyModifiers::CONTROL)).unwrap();
        assert!(key.is_ctrl('z'));
    }

    #[test]
    fn back_tab_is_its_own_key() {
        let key = map_key_event(&press(CKeyCode::BackTab, CKeyModifiers::SHIFT)).unwrap();
        assert_eq!(key, KeyEvent::from(KeyCode::BackTab));
    }

    #[test]
    fn unbound_keys_and_releases_are_dropped() {
        assert_eq!(map_key_event(&press(CKeyCode::F(5), CKeyModifiers::NONE)), None);
        let mut release = press(CKeyCode::Char('a'), CKeyModifiers::NONE);
        release.kind = CKeyEventKind::Release;
        assert_eq!(map_key_event(&release), None);
    }
}
