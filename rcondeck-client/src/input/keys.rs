//! Key binding parsing and matching
//!
//! Bindings are written as modifier prefixes joined with `-` followed by a
//! key name: `Tab`, `Ctrl-s`, `Alt-x`, `Ctrl-Shift-PageUp`, `F5`.

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single key chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// True when binding this key would take it away from the command line
    /// or the server list: Enter, unchorded characters, and unchorded
    /// editing or navigation keys
    pub fn is_reserved(&self) -> bool {
        let chorded = self
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match self.code {
            KeyCode::Enter => true,
            KeyCode::Char(_)
            | KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Home
            | KeyCode::End
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::PageUp
            | KeyCode::PageDown => !chorded,
            _ => false,
        }
    }

    /// Check whether a terminal key event triggers this binding
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let (code, modifiers) = normalize(key.code, key.modifiers);
        code == self.code && modifiers == self.modifiers
    }
}

/// Fold case and shift so that `Ctrl-S`, `Ctrl-s` and Shift+Tab compare sanely
fn normalize(code: KeyCode, modifiers: KeyModifiers) -> (KeyCode, KeyModifiers) {
    let relevant = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
    let modifiers = modifiers & relevant;
    match code {
        KeyCode::Char(c) => (
            KeyCode::Char(c.to_ascii_lowercase()),
            modifiers - KeyModifiers::SHIFT,
        ),
        KeyCode::BackTab => (KeyCode::BackTab, modifiers - KeyModifiers::SHIFT),
        other => (other, modifiers),
    }
}

/// Binding string could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid key binding '{input}': {reason}")]
pub struct KeyParseError {
    pub input: String,
    pub reason: String,
}

impl KeyParseError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl FromStr for KeyBinding {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(KeyParseError::new(s, "empty binding"));
        }

        // A trailing "-" is the minus key itself, as in "Ctrl--"
        let (prefix, key) = match trimmed.strip_suffix("--") {
            Some(rest) => (rest, "-"),
            None => match trimmed.rsplit_once('-') {
                Some((prefix, key)) => (prefix, key),
                None => ("", trimmed),
            },
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.split('-').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" | "meta" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                other => {
                    return Err(KeyParseError::new(s, format!("unknown modifier '{}'", other)))
                }
            };
        }

        let code = parse_key_name(key).ok_or_else(|| {
            KeyParseError::new(s, format!("unknown key '{}'", key))
        })?;

        let (code, modifiers) = match (code, modifiers.contains(KeyModifiers::SHIFT)) {
            (KeyCode::Tab, true) => (KeyCode::BackTab, modifiers - KeyModifiers::SHIFT),
            (code, _) => normalize(code, modifiers),
        };

        Ok(Self { code, modifiers })
    }
}

fn parse_key_name(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }

    let lower = name.to_ascii_lowercase();
    let code = match lower.as_str() {
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        f if f.starts_with('f') => {
            let n: u8 = f[1..].parse().ok()?;
            if (1..=24).contains(&n) {
                KeyCode::F(n)
            } else {
                return None;
            }
        }
        _ => return None,
    };
    Some(code)
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("Ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("Alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("Shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::BackTab => f.write_str("Shift+Tab"),
            KeyCode::PageUp => f.write_str("PgUp"),
            KeyCode::PageDown => f.write_str("PgDn"),
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_parse_plain_keys() {
        assert_eq!("Tab".parse::<KeyBinding>().unwrap(), KeyBinding::plain(KeyCode::Tab));
        assert_eq!("F5".parse::<KeyBinding>().unwrap(), KeyBinding::plain(KeyCode::F(5)));
        assert_eq!("q".parse::<KeyBinding>().unwrap(), KeyBinding::plain(KeyCode::Char('q')));
        assert_eq!(
            "PageDown".parse::<KeyBinding>().unwrap(),
            KeyBinding::plain(KeyCode::PageDown)
        );
    }

    #[test]
    fn test_parse_modifiers() {
        assert_eq!("Ctrl-s".parse::<KeyBinding>().unwrap(), KeyBinding::ctrl('s'));
        assert_eq!("ctrl-S".parse::<KeyBinding>().unwrap(), KeyBinding::ctrl('s'));
        assert_eq!(
            "Alt-x".parse::<KeyBinding>().unwrap(),
            KeyBinding::new(KeyCode::Char('x'), KeyModifiers::ALT)
        );
        assert_eq!(
            "Ctrl-Shift-PageUp".parse::<KeyBinding>().unwrap(),
            KeyBinding::new(KeyCode::PageUp, KeyModifiers::CONTROL | KeyModifiers::SHIFT)
        );
        assert_eq!(
            "Shift-Tab".parse::<KeyBinding>().unwrap(),
            KeyBinding::plain(KeyCode::BackTab)
        );
        assert_eq!(
            "Ctrl--".parse::<KeyBinding>().unwrap(),
            KeyBinding::ctrl('-')
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<KeyBinding>().is_err());
        assert!("Hyper-x".parse::<KeyBinding>().is_err());
        assert!("Ctrl-Banana".parse::<KeyBinding>().is_err());
        assert!("F99".parse::<KeyBinding>().is_err());

        let err = "Ctrl-Banana".parse::<KeyBinding>().unwrap_err();
        assert_eq!(err.to_string(), "invalid key binding 'Ctrl-Banana': unknown key 'Banana'");
    }

    #[test]
    fn test_matches_ignores_case_and_shift_on_chars() {
        let binding = KeyBinding::ctrl('s');
        assert!(binding.matches(&key(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(binding.matches(&key(
            KeyCode::Char('S'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        )));
        assert!(!binding.matches(&key(KeyCode::Char('s'), KeyModifiers::NONE)));
        assert!(!binding.matches(&key(KeyCode::Char('s'), KeyModifiers::ALT)));
    }

    #[test]
    fn test_matches_backtab() {
        let binding: KeyBinding = "Shift-Tab".parse().unwrap();
        assert!(binding.matches(&key(KeyCode::BackTab, KeyModifiers::SHIFT)));
        assert!(!binding.matches(&key(KeyCode::Tab, KeyModifiers::NONE)));
    }

    #[test]
    fn test_display() {
        assert_eq!(KeyBinding::plain(KeyCode::Tab).to_string(), "Tab");
        assert_eq!(KeyBinding::ctrl('s').to_string(), "Ctrl+S");
        assert_eq!(KeyBinding::plain(KeyCode::F(5)).to_string(), "F5");
        assert_eq!(
            KeyBinding::new(KeyCode::Char('x'), KeyModifiers::ALT).to_string(),
            "Alt+X"
        );
    }
}
