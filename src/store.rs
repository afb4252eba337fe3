//! Durable storage for the note collection
//!
//! The whole collection is one JSON array of `{"id", "text"}` objects, newest
//! first, overwritten in full on every change.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::notes::Note;

/// Name of the single storage entry holding the notes
pub const NOTES_KEY: &str = "recovery_notes";

/// Errors from reading or writing the note collection
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed note collection: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Load/save seam for the note collection
pub trait NoteStore: Send + Sync {
    /// Reads the collection. A missing entry is an empty collection, not an error.
    fn load(&self) -> Result<Vec<Note>, StoreError>;

    /// Replaces the stored collection with `notes`
    fn save(&self, notes: &[Note]) -> Result<(), StoreError>;
}

/// Serializes a collection in the stored format
pub fn encode(notes: &[Note]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(notes)?)
}

/// Parses the stored format
pub fn decode(raw: &str) -> Result<Vec<Note>, StoreError> {
    Ok(serde_json::from_str(raw)?)
}

/// Reads the collection, treating unreadable or malformed data as empty
pub fn load_or_empty(store: &dyn NoteStore) -> Vec<Note> {
    match store.load() {
        Ok(notes) => notes,
        Err(e) => {
            tracing::warn!("Could not read saved notes, starting empty: {}", e);
            Vec::new()
        }
    }
}

/// Notes kept in a JSON file on local disk
#[derive(Debug, Clone)]
pub struct FileNoteStore {
    path: PathBuf,
}

impl FileNoteStore {
    /// Store at `<dir>/recovery_notes.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", NOTES_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NoteStore for FileNoteStore {
    fn load(&self) -> Result<Vec<Note>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, notes: &[Note]) -> Result<(), StoreError> {
        let raw = encode(notes)?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        // Write beside the target and rename over it, so a crash mid-write
        // leaves the previous collection intact.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, raw)?;
        fs::rename(&staging, &self.path)?;

        tracing::debug!("Saved {} notes to {}", notes.len(), self.path.display());
        Ok(())
    }
}

/// In-memory store holding the serialized text, for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    raw: Mutex<Option<String>>,
    writes: Mutex<usize>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `raw` as its serialized collection
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
            writes: Mutex::new(0),
        }
    }

    /// The serialized collection as last written
    pub fn raw(&self) -> Option<String> {
        lock(&self.raw).clone()
    }

    /// Number of saves so far
    pub fn writes(&self) -> usize {
        *lock(&self.writes)
    }
}

impl NoteStore for MemoryNoteStore {
    fn load(&self) -> Result<Vec<Note>, StoreError> {
        match lock(&self.raw).as_deref() {
            Some(raw) => decode(raw),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, notes: &[Note]) -> Result<(), StoreError> {
        let raw = encode(notes)?;
        *lock(&self.raw) = Some(raw);
        *lock(&self.writes) += 1;
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
