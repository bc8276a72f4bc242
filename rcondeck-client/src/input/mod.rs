//! Input handling
//!
//! Maps terminal key events onto the dispatcher's event vocabulary. Keys that
//! are not bound to a dashboard action are forwarded to the widgets.

mod keys;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::executor::ContainerAction;

pub use keys::KeyBinding;

/// Result of resolving a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    SelectNext,
    Submit,
    Container(ContainerAction),
    Quit,
    /// Not a dashboard key; hand it to the widgets
    Forward,
}

/// Dashboard key bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    pub select_next: KeyBinding,
    pub start: KeyBinding,
    pub stop: KeyBinding,
    pub restart: KeyBinding,
    pub status: KeyBinding,
    pub quit: KeyBinding,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            select_next: KeyBinding::plain(KeyCode::Tab),
            start: KeyBinding::ctrl('s'),
            stop: KeyBinding::ctrl('x'),
            restart: KeyBinding::ctrl('r'),
            status: KeyBinding::ctrl('d'),
            quit: KeyBinding::ctrl('c'),
        }
    }
}

impl Keymap {
    /// Bindings paired with the action they trigger, in match priority order
    pub fn bindings(&self) -> [(KeyBinding, KeyAction); 6] {
        [
            (self.quit, KeyAction::Quit),
            (self.select_next, KeyAction::SelectNext),
            (self.start, KeyAction::Container(ContainerAction::Start)),
            (self.stop, KeyAction::Container(ContainerAction::Stop)),
            (self.restart, KeyAction::Container(ContainerAction::Restart)),
            (self.status, KeyAction::Container(ContainerAction::Status)),
        ]
    }

    pub fn resolve(&self, key: &KeyEvent) -> KeyAction {
        if let Some((_, action)) = self.bindings().into_iter().find(|(b, _)| b.matches(key)) {
            return action;
        }

        let chorded = KeyModifiers::CONTROL | KeyModifiers::ALT;
        if key.code == KeyCode::Enter && !key.modifiers.intersects(chorded) {
            return KeyAction::Submit;
        }

        KeyAction::Forward
    }

    /// First binding that appears twice, if any
    pub fn find_conflict(&self) -> Option<KeyBinding> {
        let bindings = self.bindings();
        bindings.iter().enumerate().find_map(|(i, (a, _))| {
            bindings[i + 1..]
                .iter()
                .any(|(b, _)| a == b)
                .then_some(*a)
        })
    }

    /// First binding that would shadow typing, submitting or list navigation
    pub fn find_reserved(&self) -> Option<KeyBinding> {
        self.bindings()
            .into_iter()
            .map(|(binding, _)| binding)
            .find(KeyBinding::is_reserved)
    }

    /// Footer help text
    pub fn help_text(&self) -> String {
        format!(
            " [{}] switch | [{}] start | [{}] stop | [{}] restart | [{}] status | [{}] quit",
            self.select_next, self.start, self.stop, self.restart, self.status, self.quit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_default_bindings() {
        let keymap = Keymap::default();

        assert_eq!(keymap.resolve(&key(KeyCode::Tab, KeyModifiers::NONE)), KeyAction::SelectNext);
        assert_eq!(keymap.resolve(&key(KeyCode::Enter, KeyModifiers::NONE)), KeyAction::Submit);
        assert_eq!(
            keymap.resolve(&key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            KeyAction::Container(ContainerAction::Start)
        );
        assert_eq!(
            keymap.resolve(&key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            KeyAction::Container(ContainerAction::Stop)
        );
        assert_eq!(
            keymap.resolve(&key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            KeyAction::Container(ContainerAction::Restart)
        );
        assert_eq!(
            keymap.resolve(&key(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            KeyAction::Container(ContainerAction::Status)
        );
        assert_eq!(
            keymap.resolve(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_unbound_keys_forwarded() {
        let keymap = Keymap::default();
        for event in [
            key(KeyCode::Char('s'), KeyModifiers::NONE),
            key(KeyCode::Up, KeyModifiers::NONE),
            key(KeyCode::PageDown, KeyModifiers::NONE),
            key(KeyCode::Backspace, KeyModifiers::NONE),
            key(KeyCode::Char('z'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(keymap.resolve(&event), KeyAction::Forward, "{:?}", event);
        }
    }

    #[test]
    fn test_custom_binding_overrides_default() {
        let keymap = Keymap {
            select_next: "F2".parse().unwrap(),
            ..Keymap::default()
        };
        assert_eq!(keymap.resolve(&key(KeyCode::F(2), KeyModifiers::NONE)), KeyAction::SelectNext);
        assert_eq!(keymap.resolve(&key(KeyCode::Tab, KeyModifiers::NONE)), KeyAction::Forward);
    }

    #[test]
    fn test_find_conflict() {
        assert!(Keymap::default().find_conflict().is_none());

        let keymap = Keymap {
            stop: KeyBinding::ctrl('s'),
            ..Keymap::default()
        };
        assert_eq!(keymap.find_conflict(), Some(KeyBinding::ctrl('s')));
    }

    #[test]
    fn test_find_reserved() {
        assert!(Keymap::default().find_reserved().is_none());

        let keymap = Keymap {
            start: "s".parse().unwrap(),
            ..Keymap::default()
        };
        assert_eq!(keymap.find_reserved(), Some(KeyBinding::plain(KeyCode::Char('s'))));

        let keymap = Keymap {
            quit: "Enter".parse().unwrap(),
            ..Keymap::default()
        };
        assert_eq!(keymap.find_reserved(), Some(KeyBinding::plain(KeyCode::Enter)));

        // Function keys and chords leave the editor alone
        let keymap = Keymap {
            status: "F5".parse().unwrap(),
            stop: "Alt-x".parse().unwrap(),
            ..Keymap::default()
        };
        assert!(keymap.find_reserved().is_none());
    }

    #[test]
    fn test_help_text_defaults() {
        assert_eq!(
            Keymap::default().help_text(),
            " [Tab] switch | [Ctrl+S] start | [Ctrl+X] stop | [Ctrl+R] restart | [Ctrl+D] status | [Ctrl+C] quit"
        );
    }
}
