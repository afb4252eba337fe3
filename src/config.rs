//! Runtime configuration resolved from the command line and environment

use std::path::PathBuf;

use crate::store::FileNoteStore;

/// Directory name used under the platform data directory
pub const APP_DIR_NAME: &str = "recovery-mode";

/// Default log filter; the interactive screen should stay clean
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Settings for one run of the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub sound_enabled: bool,
    pub dictation_command: Option<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            sound_enabled: true,
            dictation_command: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// The notes file inside the data directory
    pub fn note_store(&self) -> FileNoteStore {
        FileNoteStore::in_dir(&self.data_dir)
    }
}

/// Platform data directory joined with the app name, or the working directory
/// when the platform has none
pub fn default_data_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join(APP_DIR_NAME),
        None => PathBuf::from("."),
    }
}
