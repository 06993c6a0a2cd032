//! Host-facing ports.
//!
//! The editor implements these traits. The in-memory implementations below
//! back the replay runner and the tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::guard::{Key, KeyEvent};

/// The active document. Hosts pass `None` wherever no document is open.
pub trait Document {
    fn content(&self) -> String;
    fn set_content(&mut self, text: &str);
    fn set_cursor_to_end(&mut self);
}

/// Status-bar style text output.
pub trait DisplaySink {
    fn set_text(&mut self, text: &str);
}

/// User-visible toast/notice output.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

impl DisplaySink for Rc<RefCell<String>> {
    fn set_text(&mut self, text: &str) {
        let mut current = self.borrow_mut();
        current.clear();
        current.push_str(text);
    }
}

impl Notifier for Rc<RefCell<Vec<String>>> {
    fn notify(&mut self, message: &str) {
        self.borrow_mut().push(message.to_string());
    }
}

/// Display sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn set_text(&mut self, _text: &str) {}
}

impl Notifier for NullSink {
    fn notify(&mut self, _message: &str) {}
}

/// Plain-text document with a byte-offset cursor.
///
/// [`apply`](Self::apply) performs the editor's default handling of a key,
/// which lets a caller run the guard first and the edit second, the same
/// order a real editor dispatches in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    text: String,
    cursor: usize,
}

impl MemoryDocument {
    /// Cursor starts at the end of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Apply default handling unless the event was consumed.
    pub fn apply(&mut self, event: &KeyEvent) {
        if event.is_consumed() {
            return;
        }
        match event.key() {
            Key::ArrowLeft => self.cursor = self.prev_boundary(),
            Key::ArrowRight => self.cursor = self.next_boundary(),
            Key::ArrowUp => self.cursor = self.line_start().saturating_sub(1),
            Key::ArrowDown => {
                let end = self.line_end();
                self.cursor = match self.text.get(end + 1..) {
                    Some(rest) => rest.find('\n').map(|i| end + 1 + i).unwrap_or(self.text.len()),
                    None => end,
                };
            }
            Key::Backspace => {
                let start = self.prev_boundary();
                self.text.replace_range(start..self.cursor, "");
                self.cursor = start;
            }
            Key::Delete => {
                let end = self.next_boundary();
                self.text.replace_range(self.cursor..end, "");
            }
            Key::Enter => self.insert("\n"),
            other => {
                if let Some(c) = other.produced_char() {
                    let mut buf = [0u8; 4];
                    self.insert(c.encode_utf8(&mut buf));
                }
            }
        }
    }

    fn insert(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.cursor)
    }

    fn line_start(&self) -> usize {
        self.text[..self.cursor].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self) -> usize {
        self.text[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.text.len())
    }
}

impl Document for MemoryDocument {
    fn content(&self) -> String {
        self.text.clone()
    }

    fn set_content(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.cursor.min(self.text.len());
        while !self.text.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    fn set_cursor_to_end(&mut self) {
        self.cursor = self.text.len();
    }
}
