use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

/// Identifier of a pressed key, reduced to what the typing core cares about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// a single printable character
    Char(char),
    Backspace,
    /// reset signal
    Escape,
    /// modifiers, arrows, function keys and any other named key
    Other,
}

impl Key {
    /// Parse a web-style key identifier ("a", " ", "Backspace", "Shift", "ArrowLeft", ...).
    /// Only identifiers made of exactly one character are printable.
    pub fn from_identifier(identifier: &str) -> Self {
        let mut chars = identifier.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::Char(c),
            _ => match identifier {
                "Backspace" => Key::Backspace,
                "Escape" => Key::Escape,
                _ => Key::Other,
            },
        }
    }
}

/// A key event as consumed by the session controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub caps_lock: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            caps_lock: false,
        }
    }

    pub fn with_caps_lock(mut self, caps_lock: bool) -> Self {
        self.caps_lock = caps_lock;
        self
    }
}

impl From<Key> for KeyPress {
    fn from(key: Key) -> Self {
        KeyPress::new(key)
    }
}

impl From<KeyEvent> for KeyPress {
    fn from(event: KeyEvent) -> Self {
        let chorded = event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        let key = match event.code {
            // ctrl/alt chords are shortcuts, not typing
            KeyCode::Char(_) if chorded => Key::Other,
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Esc => Key::Escape,
            _ => Key::Other,
        };

        KeyPress {
            key,
            caps_lock: event.state.contains(KeyEventState::CAPS_LOCK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_characters_are_printable() {
        assert_eq!(Key::from_identifier("a"), Key::Char('a'));
        assert_eq!(Key::from_identifier(" "), Key::Char(' '));
        assert_eq!(Key::from_identifier("é"), Key::Char('é'));
        assert_eq!(Key::from_identifier("Q"), Key::Char('Q'));
    }

    #[test]
    fn named_keys() {
        assert_eq!(Key::from_identifier("Backspace"), Key::Backspace);
        assert_eq!(Key::from_identifier("Escape"), Key::Escape);
    }

    #[test]
    fn multi_character_names_are_ignored() {
        for name in ["Shift", "CapsLock", "ArrowLeft", "F5", "Tab", "Enter", ""] {
            assert_eq!(Key::from_identifier(name), Key::Other, "{name}");
        }
    }

    #[test]
    fn crossterm_char_event() {
        let press = KeyPress::from(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(press.key, Key::Char('x'));
        assert!(!press.caps_lock);

        let shifted = KeyPress::from(KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT));
        assert_eq!(shifted.key, Key::Char('X'));
    }

    #[test]
    fn crossterm_chords_are_not_typing() {
        let press = KeyPress::from(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(press.key, Key::Other);

        let press = KeyPress::from(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::ALT));
        assert_eq!(press.key, Key::Other);
    }

    #[test]
    fn crossterm_named_keys() {
        assert_eq!(
            KeyPress::from(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)).key,
            Key::Backspace
        );
        assert_eq!(
            KeyPress::from(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)).key,
            Key::Escape
        );
        assert_eq!(
            KeyPress::from(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)).key,
            Key::Other
        );
        assert_eq!(
            KeyPress::from(KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE)).key,
            Key::Other
        );
    }

    #[test]
    fn crossterm_caps_lock_state() {
        let event = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('A'),
            KeyModifiers::NONE,
            crossterm::event::KeyEventKind::Press,
            KeyEventState::CAPS_LOCK,
        );
        let press = KeyPress::from(event);
        assert!(press.caps_lock);
        assert_eq!(press.key, Key::Char('A'));
    }
}
