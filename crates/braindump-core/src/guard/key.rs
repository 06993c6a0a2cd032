//! Keyboard input model.
//!
//! [`Key`] mirrors DOM `KeyboardEvent.key` names. [`KeyEvent`] carries the
//! consumed flag the guard sets to stop the editor's default handling.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Key identifier, named after DOM `KeyboardEvent.key` values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Backspace,
    Delete,
    Enter,
    Tab,
    Char(char),
    /// Any other key (modifiers, function keys, ...).
    Named(String),
}

impl Key {
    /// Text the key inserts into the document, if any.
    ///
    /// Enter is deliberately `None`: a line break never extends the
    /// trailing content of a snapshot.
    pub fn produced_char(&self) -> Option<char> {
        match self {
            Key::Char(c) => Some(*c),
            Key::Tab => Some('\t'),
            _ => None,
        }
    }

    pub fn is_backward_navigation(&self) -> bool {
        matches!(self, Key::ArrowLeft | Key::ArrowUp)
    }

    pub fn is_deletion(&self) -> bool {
        matches!(self, Key::Backspace | Key::Delete)
    }
}

impl FromStr for Key {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowUp" => Key::ArrowUp,
            "ArrowRight" => Key::ArrowRight,
            "ArrowDown" => Key::ArrowDown,
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            "Enter" => Key::Enter,
            "Tab" => Key::Tab,
            "Space" => Key::Char(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Named(other.to_string()),
                }
            }
        };
        Ok(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::ArrowLeft => f.write_str("ArrowLeft"),
            Key::ArrowUp => f.write_str("ArrowUp"),
            Key::ArrowRight => f.write_str("ArrowRight"),
            Key::ArrowDown => f.write_str("ArrowDown"),
            Key::Backspace => f.write_str("Backspace"),
            Key::Delete => f.write_str("Delete"),
            Key::Enter => f.write_str("Enter"),
            Key::Tab => f.write_str("Tab"),
            Key::Char(' ') => f.write_str("Space"),
            Key::Char(c) => write!(f, "{c}"),
            Key::Named(name) => f.write_str(name),
        }
    }
}

/// A keystroke on its way to the editor.
///
/// Consuming it suppresses the editor's default handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    key: Key,
    consumed: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            consumed: false,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Key {
        s.parse().unwrap()
    }

    #[test]
    fn parses_dom_key_names() {
        assert_eq!(parse("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(parse("Backspace"), Key::Backspace);
        assert_eq!(parse("a"), Key::Char('a'));
        assert_eq!(parse("é"), Key::Char('é'));
        assert_eq!(parse("Space"), Key::Char(' '));
        assert_eq!(parse("Shift"), Key::Named("Shift".into()));
    }

    #[test]
    fn display_round_trips_names() {
        for name in ["ArrowUp", "Delete", "Enter", "Space", "x", "Escape"] {
            assert_eq!(parse(name).to_string(), name);
        }
    }

    #[test]
    fn enter_and_modifiers_produce_nothing() {
        assert_eq!(Key::Enter.produced_char(), None);
        assert_eq!(Key::Named("Shift".into()).produced_char(), None);
        assert_eq!(Key::Char('x').produced_char(), Some('x'));
    }
}
