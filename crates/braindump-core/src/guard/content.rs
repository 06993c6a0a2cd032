//! Forward-only content guard.
//!
//! ## State Transitions
//!
//! ```text
//! Unlocked --lock()--> Locked --unlock()--> Unlocked
//! ```
//!
//! Transitions are driven from outside. While locked, every keystroke is
//! classified before the editor handles it, in this order:
//!
//! 1. backward navigation: cursor jumps to the end, event consumed
//! 2. deletion: content restored from the snapshot, event consumed
//! 3. anything else: snapshot becomes content + produced character
//!
//! A missing document turns the keystroke into a no-op.

use serde::{Deserialize, Serialize};

use super::key::KeyEvent;
use crate::events::BlockReason;
use crate::host::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardState {
    Unlocked,
    Locked,
}

#[derive(Debug, Clone)]
pub struct ContentGuard {
    state: GuardState,
    /// Last known-good content. `None` until a document has been seen.
    snapshot: Option<String>,
}

impl Default for ContentGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentGuard {
    pub fn new() -> Self {
        Self {
            state: GuardState::Unlocked,
            snapshot: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == GuardState::Locked
    }

    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enter `Locked`, re-snapshotting the live document so a later
    /// deletion never reverts to text from before the guard was off.
    pub fn lock(&mut self, doc: Option<&dyn Document>) {
        self.snapshot = doc.map(|d| d.content());
        self.state = GuardState::Locked;
        tracing::debug!(has_document = self.snapshot.is_some(), "guard locked");
    }

    pub fn unlock(&mut self) {
        self.state = GuardState::Unlocked;
        tracing::debug!("guard unlocked");
    }

    /// Inspect a keystroke before the editor applies it.
    ///
    /// Returns the reason when the keystroke was blocked; the event is then
    /// consumed.
    pub fn handle_key(
        &mut self,
        event: &mut KeyEvent,
        doc: Option<&mut dyn Document>,
    ) -> Option<BlockReason> {
        if self.state == GuardState::Unlocked {
            return None;
        }
        let doc = doc?;
        let key = event.key();

        if key.is_backward_navigation() {
            doc.set_cursor_to_end();
            event.consume();
            tracing::debug!(key = %event.key(), "backward navigation blocked");
            return Some(BlockReason::BackwardNavigation);
        }

        if key.is_deletion() {
            // Nothing known-good yet: keep what is there.
            let restored = self.snapshot.get_or_insert_with(|| doc.content());
            doc.set_content(restored);
            doc.set_cursor_to_end();
            event.consume();
            tracing::debug!(key = %event.key(), "deletion blocked, snapshot restored");
            return Some(BlockReason::Deletion);
        }

        let mut next = doc.content();
        if let Some(c) = key.produced_char() {
            next.push(c);
        }
        self.snapshot = Some(next);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::Key;
    use crate::host::MemoryDocument;

    fn locked_on(doc: &MemoryDocument) -> ContentGuard {
        let mut guard = ContentGuard::new();
        guard.lock(Some(doc));
        guard
    }

    /// Run the guard, then let the document apply whatever got through.
    fn press(guard: &mut ContentGuard, doc: &mut MemoryDocument, key: Key) -> Option<BlockReason> {
        let mut event = KeyEvent::new(key);
        let blocked = guard.handle_key(&mut event, Some(&mut *doc));
        doc.apply(&event);
        blocked
    }

    #[test]
    fn starts_unlocked_and_passes_through() {
        let mut guard = ContentGuard::new();
        let mut doc = MemoryDocument::new("abc");
        assert_eq!(guard.state(), GuardState::Unlocked);
        assert_eq!(press(&mut guard, &mut doc, Key::Backspace), None);
        assert_eq!(doc.text(), "ab");
        assert_eq!(guard.snapshot(), None);
    }

    #[test]
    fn typing_updates_snapshot() {
        let mut doc = MemoryDocument::default();
        let mut guard = locked_on(&doc);
        press(&mut guard, &mut doc, Key::Char('H'));
        assert_eq!(guard.snapshot(), Some("H"));
        press(&mut guard, &mut doc, Key::Char('i'));
        assert_eq!(guard.snapshot(), Some("Hi"));
        press(&mut guard, &mut doc, Key::Enter);
        assert_eq!(guard.snapshot(), Some("Hi"));
        assert_eq!(doc.text(), "Hi\n");
    }

    #[test]
    fn backspace_restores_snapshot() {
        let mut doc = MemoryDocument::new("Hello");
        let mut guard = locked_on(&doc);
        // The editor lost a character behind the guard's back.
        doc.set_content("Hell");

        let blocked = press(&mut guard, &mut doc, Key::Backspace);
        assert_eq!(blocked, Some(BlockReason::Deletion));
        assert_eq!(doc.text(), "Hello");
        assert_eq!(doc.cursor(), 5);
    }

    #[test]
    fn delete_is_blocked_like_backspace() {
        let mut doc = MemoryDocument::new("abc");
        let mut guard = locked_on(&doc);
        press(&mut guard, &mut doc, Key::ArrowRight);
        assert_eq!(press(&mut guard, &mut doc, Key::Delete), Some(BlockReason::Deletion));
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    fn backward_navigation_jumps_to_end() {
        let mut doc = MemoryDocument::new("one\ntwo");
        let mut guard = locked_on(&doc);
        assert_eq!(
            press(&mut guard, &mut doc, Key::ArrowLeft),
            Some(BlockReason::BackwardNavigation)
        );
        assert_eq!(
            press(&mut guard, &mut doc, Key::ArrowUp),
            Some(BlockReason::BackwardNavigation)
        );
        assert_eq!(doc.cursor(), doc.text().len());
        assert_eq!(doc.text(), "one\ntwo");
    }

    #[test]
    fn missing_document_is_a_no_op() {
        let mut guard = ContentGuard::new();
        guard.lock(None);
        let mut event = KeyEvent::new(Key::Backspace);
        assert_eq!(guard.handle_key(&mut event, None), None);
        assert!(!event.is_consumed());
        assert_eq!(guard.snapshot(), None);
    }

    #[test]
    fn deletion_without_snapshot_keeps_content() {
        let mut guard = ContentGuard::new();
        guard.lock(None);
        let mut doc = MemoryDocument::new("draft");
        assert_eq!(press(&mut guard, &mut doc, Key::Backspace), Some(BlockReason::Deletion));
        assert_eq!(doc.text(), "draft");
        assert_eq!(guard.snapshot(), Some("draft"));
    }

    #[test]
    fn relock_takes_fresh_snapshot() {
        let mut doc = MemoryDocument::new("old");
        let mut guard = locked_on(&doc);
        guard.unlock();

        doc.set_content("brand new text");
        guard.lock(Some(&doc));
        doc.set_content("brand new tex");
        press(&mut guard, &mut doc, Key::Backspace);
        assert_eq!(doc.text(), "brand new text");
    }
}
