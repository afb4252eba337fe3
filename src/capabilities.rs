//! Optional host capabilities
//!
//! Speech-to-text and tone synthesis are provided by the host when it can.
//! Both are resolved once at startup into a [`Capability`], and callers branch
//! on availability instead of probing.

use std::io::{IsTerminal, Write};
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Errors from a host capability
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("speech capture failed: {0}")]
    Capture(String),

    #[error("tone playback failed: {0}")]
    Tone(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A capability the host may or may not provide
#[derive(Debug, Clone)]
pub enum Capability<T> {
    Available(T),
    Unavailable,
}

impl<T> Capability<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Capability::Available(value),
            None => Capability::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }
}

impl<T> Default for Capability<T> {
    fn default() -> Self {
        Capability::Unavailable
    }
}

/// Single-utterance speech recognition
#[async_trait::async_trait]
pub trait SpeechToText: Send + Sync {
    /// Listens for one utterance. `Ok(None)` means the session ended without
    /// recognizing anything.
    async fn listen(&self) -> Result<Option<String>, CapabilityError>;
}

/// Plays a short tone
pub trait ToneGenerator: Send + Sync {
    fn play(&self, chime: &ChimeSpec) -> Result<(), CapabilityError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
}

/// Shape of a chime: a soft attack up to `peak_gain`, then an exponential
/// fade to `floor_gain` at `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChimeSpec {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    pub peak_gain: f32,
    pub attack: Duration,
    pub floor_gain: f32,
    pub duration: Duration,
}

/// The chime played when a rest ends
pub const GENTLE_CHIME: ChimeSpec = ChimeSpec {
    waveform: Waveform::Sine,
    frequency_hz: 330.0,
    peak_gain: 0.15,
    attack: Duration::from_millis(500),
    floor_gain: 0.001,
    duration: Duration::from_secs(4),
};

/// The host capabilities, resolved once
#[derive(Clone, Default)]
pub struct Capabilities {
    pub speech: Capability<Arc<dyn SpeechToText>>,
    pub tone: Capability<Arc<dyn ToneGenerator>>,
}

impl Capabilities {
    /// Probes the terminal host: the bell is used when stdout is a terminal,
    /// dictation only when a local command is configured.
    pub fn detect(dictation_command: Option<&str>) -> Self {
        let tone: Capability<Arc<dyn ToneGenerator>> = if std::io::stdout().is_terminal() {
            Capability::Available(Arc::new(TerminalBell::stdout()))
        } else {
            Capability::Unavailable
        };

        let speech: Capability<Arc<dyn SpeechToText>> = Capability::from_option(
            dictation_command
                .and_then(CommandDictation::parse)
                .map(|dictation| Arc::new(dictation) as Arc<dyn SpeechToText>),
        );

        tracing::debug!(
            "Capabilities: tone={}, speech={}",
            tone.is_available(),
            speech.is_available()
        );

        Self { speech, tone }
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("speech", &self.speech.is_available())
            .field("tone", &self.tone.is_available())
            .finish()
    }
}

/// Tone generator for a terminal: rings the bell. A terminal has no control
/// over pitch or envelope, so the chime shape only decides whether to ring.
pub struct TerminalBell {
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalBell {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl ToneGenerator for TerminalBell {
    fn play(&self, chime: &ChimeSpec) -> Result<(), CapabilityError> {
        if chime.peak_gain <= 0.0 || chime.duration.is_zero() {
            return Ok(());
        }

        let mut out = self
            .out
            .lock()
            .map_err(|_| CapabilityError::Tone("bell writer poisoned".to_string()))?;
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(())
    }
}

/// Dictation through a local speech-to-text program. The program records one
/// utterance and prints the transcript on stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDictation {
    program: String,
    args: Vec<String>,
}

impl CommandDictation {
    /// Splits a command line on whitespace. Returns None for a blank command.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait::async_trait]
impl SpeechToText for CommandDictation {
    async fn listen(&self) -> Result<Option<String>, CapabilityError> {
        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(CapabilityError::Capture(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if transcript.is_empty() {
            None
        } else {
            Some(transcript)
        })
    }
}

/// An in-flight dictation session. Dropping it (or [`CaptureSession::stop`])
/// aborts the capture.
#[derive(Debug)]
pub struct CaptureSession {
    task: Option<JoinHandle<()>>,
}

impl CaptureSession {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// Aborts the capture
    pub fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Lets go of a session that has already delivered its result
    pub fn detach(mut self) {
        self.task.take();
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
