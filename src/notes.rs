//! Notes for the "External Brain" screen
//!
//! [`Note`] is the persisted record. [`NotePad`] is the screen's working state:
//! the list, the draft being composed, and an in-flight dictation session.

use serde::{Deserialize, Serialize};

use crate::capabilities::CaptureSession;

/// A saved note. Only these two fields are ever written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    id: i64,
    text: String,
}

impl Note {
    pub fn new(id: i64, text: String) -> Self {
        Self { id, text }
    }

    /// Creation time in milliseconds, also the note's unique key
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Picks an id for a note created at `now_ms`: the clock reading, bumped past
/// the newest existing id so two saves in one millisecond cannot collide.
/// Returns None when no larger id exists.
pub fn next_note_id(notes: &[Note], now_ms: i64) -> Option<i64> {
    match notes.iter().map(Note::id).max() {
        Some(newest) if newest >= now_ms => newest.checked_add(1),
        _ => Some(now_ms),
    }
}

/// Working state of the notes screen for one visit
#[derive(Debug, Default)]
pub struct NotePad {
    notes: Vec<Note>,
    draft: String,
    capture: Option<(u64, CaptureSession)>,
}

impl NotePad {
    /// Starts a visit with the collection loaded from the store
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes,
            draft: String::new(),
            capture: None,
        }
    }

    /// Notes, newest first
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: String) {
        self.draft = text;
    }

    /// Adds typed text to the draft, one line per call
    pub fn push_draft_line(&mut self, line: &str) {
        if !self.draft.is_empty() {
            self.draft.push('\n');
        }
        self.draft.push_str(line);
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    /// Prepends a note unless `text` is blank. Returns the new note.
    pub fn add(&mut self, text: &str, now_ms: i64) -> Option<Note> {
        if text.trim().is_empty() {
            return None;
        }

        let Some(id) = next_note_id(&self.notes, now_ms) else {
            tracing::warn!("Note ids exhausted, note not added");
            return None;
        };
        let note = Note::new(id, text.to_string());
        self.notes.insert(0, note.clone());
        Some(note)
    }

    /// Saves the draft as a note and clears it. Blank drafts are left alone.
    pub fn save_draft(&mut self, now_ms: i64) -> Option<Note> {
        let draft = std::mem::take(&mut self.draft);
        let note = self.add(&draft, now_ms);
        if note.is_none() {
            self.draft = draft;
        }
        note
    }

    /// Removes the note with `id`. Returns false if there was none.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id() != id);
        self.notes.len() != before
    }

    pub fn is_listening(&self) -> bool {
        self.capture.is_some()
    }

    /// Whether `session` is the dictation session currently in flight
    pub fn is_listening_session(&self, session: u64) -> bool {
        matches!(&self.capture, Some((current, _)) if *current == session)
    }

    pub fn start_listening(&mut self, session: u64, capture: CaptureSession) {
        if let Some((_, previous)) = self.capture.replace((session, capture)) {
            previous.stop();
        }
    }

    /// Stops the in-flight session, if any
    pub fn stop_listening(&mut self) {
        if let Some((_, capture)) = self.capture.take() {
            capture.stop();
        }
    }

    /// Clears the listening indicator once a session has ended on its own
    pub fn finish_listening(&mut self) {
        if let Some((_, capture)) = self.capture.take() {
            capture.detach();
        }
    }

    /// Appends recognized speech to the draft, space-separated
    pub fn append_transcript(&mut self, transcript: &str) {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return;
        }
        if !self.draft.is_empty() {
            self.draft.push(' ');
        }
        self.draft.push_str(transcript);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_text_is_rejected() {
        let mut pad = NotePad::default();
        assert_eq!(pad.add("", 1), None);
        assert_eq!(pad.add("   ", 2), None);
        assert_eq!(pad.add("\n\t", 3), None);
        assert!(pad.notes().is_empty());
    }

    #[test]
    fn test_add_prepends_newest_first() {
        let mut pad = NotePad::default();
        pad.add("first", 100);
        let second = pad.add("Drink water", 200).unwrap();

        assert_eq!(second.id(), 200);
        assert_eq!(pad.notes()[0].text(), "Drink water");
        assert_eq!(pad.notes()[1].text(), "first");
    }

    #[test]
    fn test_same_millisecond_saves_get_distinct_ids() {
        let mut pad = NotePad::default();
        let a = pad.add("a", 500).unwrap();
        let b = pad.add("b", 500).unwrap();
        // Clock went backwards
        let c = pad.add("c", 10).unwrap();

        assert_eq!(a.id(), 500);
        assert_eq!(b.id(), 501);
        assert_eq!(c.id(), 502);
    }

    #[test]
    fn test_next_note_id_follows_the_clock() {
        let notes = vec![Note::new(1, "old".to_string())];
        assert_eq!(next_note_id(&notes, 1_700_000_000_000), Some(1_700_000_000_000));
        assert_eq!(next_note_id(&[], 42), Some(42));
    }

    #[test]
    fn test_largest_id_rejects_further_adds() {
        let mut pad = NotePad::new(vec![Note::new(i64::MAX, "x".to_string())]);
        pad.set_draft("hello".to_string());

        assert_eq!(next_note_id(pad.notes(), 5), None);
        assert_eq!(pad.add("hello", 5), None);
        assert_eq!(pad.save_draft(5), None);
        assert_eq!(pad.draft(), "hello");
        assert_eq!(pad.notes().len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut pad = NotePad::new(vec![
            Note::new(2, "keep".to_string()),
            Note::new(1, "drop".to_string()),
        ]);

        assert!(!pad.remove(99));
        assert_eq!(pad.notes().len(), 2);

        assert!(pad.remove(1));
        assert_eq!(pad.notes(), &[Note::new(2, "keep".to_string())]);
    }

    #[test]
    fn test_save_draft_clears_only_on_success() {
        let mut pad = NotePad::default();
        pad.set_draft("  ".to_string());
        assert_eq!(pad.save_draft(1), None);
        assert_eq!(pad.draft(), "  ");

        pad.set_draft("Remember to rest".to_string());
        let note = pad.save_draft(2).unwrap();
        assert_eq!(note.text(), "Remember to rest");
        assert_eq!(pad.draft(), "");
    }

    #[test]
    fn test_draft_lines_and_transcripts() {
        let mut pad = NotePad::default();
        pad.append_transcript("call the doctor");
        assert_eq!(pad.draft(), "call the doctor");

        pad.append_transcript(" tomorrow ");
        assert_eq!(pad.draft(), "call the doctor tomorrow");

        pad.push_draft_line("bring the forms");
        assert_eq!(pad.draft(), "call the doctor tomorrow\nbring the forms");

        pad.clear_draft();
        pad.push_draft_line("one line");
        assert_eq!(pad.draft(), "one line");
    }
}
