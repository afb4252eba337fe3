//! Core models for the recovery-mode library
//!
//! This module holds the application state tree and the shared [`Core`]
//! handle the shell drives. Exactly one screen is active at a time; each
//! sub-view's state lives inside its [`Screen`] variant, so leaving a view
//! drops that state and entering builds it fresh.

use std::sync::{Arc, Mutex};

use crate::capabilities::{Capabilities, Capability, CapabilityError, CaptureSession, GENTLE_CHIME};
use crate::catalog::{random_source, Fact, FactPicker, IndexSource};
use crate::notes::{Note, NotePad};
use crate::store::{load_or_empty, NoteStore, StoreError};
use crate::timer::{RestTimer, TickHandle, TickOutcome, TimerPhase, TICK_PERIOD};

/// Screen identifiers. Home is the default; everything else is one step away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Blackout,
    Rest,
    Fuel,
    Facts,
    Pacing,
    Notes,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Home,
        View::Blackout,
        View::Rest,
        View::Fuel,
        View::Facts,
        View::Pacing,
        View::Notes,
    ];
}

/// The active screen together with the state that only exists while it is shown
#[derive(Debug)]
pub enum Screen {
    Home,
    Blackout,
    Rest(RestTimer),
    Fuel,
    Facts,
    Pacing,
    Notes(NotePad),
}

impl Screen {
    pub fn view(&self) -> View {
        match self {
            Screen::Home => View::Home,
            Screen::Blackout => View::Blackout,
            Screen::Rest(_) => View::Rest,
            Screen::Fuel => View::Fuel,
            Screen::Facts => View::Facts,
            Screen::Pacing => View::Pacing,
            Screen::Notes(_) => View::Notes,
        }
    }
}

/// Wall clock in milliseconds, injected so note ids are testable
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// The system clock
pub fn system_clock() -> Clock {
    Arc::new(|| chrono::Utc::now().timestamp_millis())
}

/// Read-only picture of the active screen, for rendering
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Home,
    Blackout,
    Rest {
        remaining: u32,
        phase: TimerPhase,
        sound_enabled: bool,
    },
    Fuel,
    Facts(Fact),
    Pacing,
    Notes {
        notes: Vec<Note>,
        draft: String,
        listening: bool,
    },
}

impl Snapshot {
    pub fn view(&self) -> View {
        match self {
            Snapshot::Home => View::Home,
            Snapshot::Blackout => View::Blackout,
            Snapshot::Rest { .. } => View::Rest,
            Snapshot::Fuel => View::Fuel,
            Snapshot::Facts(_) => View::Facts,
            Snapshot::Pacing => View::Pacing,
            Snapshot::Notes { .. } => View::Notes,
        }
    }
}

/// Result of pressing the dictation control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationOutcome {
    Started,
    Stopped,
    /// The host has no speech-to-text; the user must be told
    Unsupported,
    /// Not on the notes screen
    Inactive,
}

/// The application state tree
pub struct AppState {
    screen: Screen,
    facts: FactPicker,
    store: Arc<dyn NoteStore>,
    clock: Clock,
    sound_default: bool,
    sessions: u64,
}

impl AppState {
    /// Starts on the home screen with a random fact source and the system clock
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self {
            screen: Screen::Home,
            facts: FactPicker::new(random_source()),
            store,
            clock: system_clock(),
            sound_default: true,
            sessions: 0,
        }
    }

    pub fn with_fact_source(mut self, source: IndexSource) -> Self {
        self.facts = FactPicker::new(source);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Whether the rest timer's sound starts enabled on each visit
    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_default = enabled;
        self
    }

    pub fn view(&self) -> View {
        self.screen.view()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Switches to `view`, always with fresh view state
    pub fn navigate(&mut self, view: View) {
        tracing::debug!("Navigating from {:?} to {:?}", self.view(), view);

        self.screen = match view {
            View::Home => Screen::Home,
            View::Blackout => Screen::Blackout,
            View::Rest => Screen::Rest(RestTimer::new(self.sound_default)),
            View::Fuel => Screen::Fuel,
            View::Facts => {
                self.facts.reset();
                Screen::Facts
            }
            View::Pacing => Screen::Pacing,
            View::Notes => Screen::Notes(NotePad::new(load_or_empty(self.store.as_ref()))),
        };
    }

    /// Every back action lands on home
    pub fn back(&mut self) {
        self.navigate(View::Home);
    }

    /// Hands out a session id for a timer run or dictation session
    pub fn next_session(&mut self) -> u64 {
        self.sessions += 1;
        self.sessions
    }

    pub fn rest_timer(&self) -> Option<&RestTimer> {
        match &self.screen {
            Screen::Rest(timer) => Some(timer),
            _ => None,
        }
    }

    pub fn rest_timer_mut(&mut self) -> Option<&mut RestTimer> {
        match &mut self.screen {
            Screen::Rest(timer) => Some(timer),
            _ => None,
        }
    }

    pub fn note_pad(&self) -> Option<&NotePad> {
        match &self.screen {
            Screen::Notes(pad) => Some(pad),
            _ => None,
        }
    }

    pub fn note_pad_mut(&mut self) -> Option<&mut NotePad> {
        match &mut self.screen {
            Screen::Notes(pad) => Some(pad),
            _ => None,
        }
    }

    /// The fact on display, when on the facts screen
    pub fn current_fact(&self) -> Option<Fact> {
        match self.screen {
            Screen::Facts => Some(self.facts.current()),
            _ => None,
        }
    }

    /// Draws another fact, when on the facts screen
    pub fn next_fact(&mut self) -> Option<Fact> {
        match self.screen {
            Screen::Facts => Some(self.facts.next()),
            _ => None,
        }
    }

    /// Adds a note on the notes screen and persists the collection.
    /// Blank text and other screens are no-ops.
    pub fn add_note(&mut self, text: &str) -> Result<Option<Note>, StoreError> {
        let now = (self.clock)();
        let Screen::Notes(pad) = &mut self.screen else {
            return Ok(None);
        };

        let Some(note) = pad.add(text, now) else {
            return Ok(None);
        };
        self.store.save(pad.notes())?;
        tracing::debug!("Added note {}", note.id());
        Ok(Some(note))
    }

    /// Saves the draft as a note and persists the collection
    pub fn save_draft(&mut self) -> Result<Option<Note>, StoreError> {
        let now = (self.clock)();
        let Screen::Notes(pad) = &mut self.screen else {
            return Ok(None);
        };

        let Some(note) = pad.save_draft(now) else {
            return Ok(None);
        };
        self.store.save(pad.notes())?;
        tracing::debug!("Saved draft as note {}", note.id());
        Ok(Some(note))
    }

    /// Removes a note by id and persists the collection if anything changed
    pub fn remove_note(&mut self, id: i64) -> Result<bool, StoreError> {
        let Screen::Notes(pad) = &mut self.screen else {
            return Ok(false);
        };

        if !pad.remove(id) {
            return Ok(false);
        }
        self.store.save(pad.notes())?;
        tracing::debug!("Removed note {}", id);
        Ok(true)
    }

    pub fn snapshot(&self) -> Snapshot {
        match &self.screen {
            Screen::Home => Snapshot::Home,
            Screen::Blackout => Snapshot::Blackout,
            Screen::Rest(timer) => Snapshot::Rest {
                remaining: timer.remaining(),
                phase: timer.phase(),
                sound_enabled: timer.sound_enabled(),
            },
            Screen::Fuel => Snapshot::Fuel,
            Screen::Facts => Snapshot::Facts(self.facts.current()),
            Screen::Pacing => Snapshot::Pacing,
            Screen::Notes(pad) => Snapshot::Notes {
                notes: pad.notes().to_vec(),
                draft: pad.draft().to_string(),
                listening: pad.is_listening(),
            },
        }
    }
}

/// Shared handle on the application state.
///
/// Every operation runs inside one lock scope, so a timer tick or dictation
/// result can never interleave with a user action. Observers are told about
/// each change through [`Core::subscribe`].
#[derive(Clone)]
pub struct Core {
    inner: Arc<Mutex<AppState>>,
    capabilities: Capabilities,
    update_tx: Arc<tokio::sync::broadcast::Sender<()>>,
}

impl Core {
    pub fn new(state: AppState, capabilities: Capabilities) -> Self {
        let (tx, _rx) = tokio::sync::broadcast::channel(100);

        Self {
            inner: Arc::new(Mutex::new(state)),
            capabilities,
            update_tx: Arc::new(tx),
        }
    }

    // Runs `f` against the state and tells observers something changed
    fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut AppState) -> R,
    {
        let mut state = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let result = f(&mut state);
        drop(state);

        let _ = self.update_tx.send(());

        result
    }

    fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&state)
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<()> {
        self.update_tx.subscribe()
    }

    pub fn view(&self) -> View {
        self.read(AppState::view)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.read(AppState::snapshot)
    }

    pub fn navigate(&self, view: View) {
        self.with_state(|state| state.navigate(view));
    }

    pub fn back(&self) {
        self.with_state(AppState::back);
    }

    /// Start, pause or resume the rest timer. Returns the phase afterwards, or
    /// None when not on the rest screen. An expired timer stays expired.
    pub fn toggle_timer(&self) -> Option<TimerPhase> {
        let core = self.clone();
        self.with_state(move |state| {
            let session = state.next_session();
            let timer = state.rest_timer_mut()?;

            match timer.phase() {
                TimerPhase::Running => {
                    timer.pause();
                    tracing::debug!("Rest timer paused at {}", timer.display());
                }
                TimerPhase::Ready | TimerPhase::Paused => {
                    if timer.start(session) {
                        let ticker =
                            TickHandle::spawn(TICK_PERIOD, move || core.tick_rest_timer(session));
                        timer.attach(ticker);
                        tracing::debug!("Rest timer running from {}", timer.display());
                    }
                }
                TimerPhase::Expired => {}
            }

            Some(timer.phase())
        })
    }

    /// Flips the rest timer's sound flag. Returns the new value.
    pub fn toggle_sound(&self) -> Option<bool> {
        self.with_state(|state| state.rest_timer_mut().map(RestTimer::toggle_sound))
    }

    /// One second elapsed for timer session `session`. Returns whether the
    /// ticker should keep going.
    pub fn tick_rest_timer(&self, session: u64) -> bool {
        let outcome = self.with_state(|state| match state.rest_timer_mut() {
            Some(timer) => timer.tick(session),
            None => TickOutcome::Ignored,
        });

        match outcome {
            TickOutcome::Counting(remaining) => {
                tracing::trace!("Rest timer at {}s", remaining);
                true
            }
            TickOutcome::Expired { chime } => {
                tracing::info!("Rest finished");
                if chime {
                    self.play_chime();
                }
                false
            }
            TickOutcome::Ignored => {
                tracing::debug!("Dropped tick from stale timer session {}", session);
                false
            }
        }
    }

    // Tone failures never reach the user or the timer
    fn play_chime(&self) {
        match &self.capabilities.tone {
            Capability::Available(tone) => {
                if let Err(e) = tone.play(&GENTLE_CHIME) {
                    tracing::debug!("Chime failed: {}", e);
                }
            }
            Capability::Unavailable => tracing::debug!("No tone generator, rest ended silently"),
        }
    }

    /// The fact on display, when on the facts screen
    pub fn current_fact(&self) -> Option<Fact> {
        self.read(AppState::current_fact)
    }

    pub fn next_fact(&self) -> Option<Fact> {
        self.with_state(AppState::next_fact)
    }

    /// Replaces the notes draft
    pub fn set_draft(&self, text: String) {
        self.with_state(|state| {
            if let Some(pad) = state.note_pad_mut() {
                pad.set_draft(text);
            }
        });
    }

    /// Appends one typed line to the notes draft
    pub fn push_draft_line(&self, line: &str) {
        self.with_state(|state| {
            if let Some(pad) = state.note_pad_mut() {
                pad.push_draft_line(line);
            }
        });
    }

    pub fn clear_draft(&self) {
        self.with_state(|state| {
            if let Some(pad) = state.note_pad_mut() {
                pad.clear_draft();
            }
        });
    }

    pub fn add_note(&self, text: &str) -> Result<Option<Note>, StoreError> {
        self.with_state(|state| state.add_note(text))
    }

    pub fn save_draft(&self) -> Result<Option<Note>, StoreError> {
        self.with_state(AppState::save_draft)
    }

    pub fn remove_note(&self, id: i64) -> Result<bool, StoreError> {
        self.with_state(|state| state.remove_note(id))
    }

    /// Presses the dictation control: starts a capture session, or stops the
    /// one in flight.
    pub fn toggle_dictation(&self) -> DictationOutcome {
        if self.view() != View::Notes {
            return DictationOutcome::Inactive;
        }
        let Capability::Available(speech) = &self.capabilities.speech else {
            return DictationOutcome::Unsupported;
        };

        let speech = Arc::clone(speech);
        let core = self.clone();
        self.with_state(move |state| {
            let session = state.next_session();
            let Some(pad) = state.note_pad_mut() else {
                return DictationOutcome::Inactive;
            };

            if pad.is_listening() {
                pad.stop_listening();
                tracing::debug!("Dictation stopped");
                return DictationOutcome::Stopped;
            }

            let task = tokio::spawn(async move {
                let result = speech.listen().await;
                core.finish_dictation(session, result);
            });
            pad.start_listening(session, CaptureSession::new(task));
            tracing::debug!("Dictation session {} started", session);
            DictationOutcome::Started
        })
    }

    // A result for a session that was stopped, or a notes visit that ended,
    // is dropped
    fn finish_dictation(&self, session: u64, result: Result<Option<String>, CapabilityError>) {
        self.with_state(|state| {
            let Some(pad) = state.note_pad_mut() else {
                return;
            };
            if !pad.is_listening_session(session) {
                return;
            }

            match result {
                Ok(Some(transcript)) => pad.append_transcript(&transcript),
                Ok(None) => tracing::debug!("Dictation ended without a transcript"),
                Err(e) => tracing::debug!("Dictation failed: {}", e),
            }
            pad.finish_listening();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::SpeechToText;
    use crate::catalog::{scripted_source, FACTS};
    use crate::store::MemoryNoteStore;
    use pretty_assertions::assert_eq;

    fn state_with(store: Arc<MemoryNoteStore>) -> AppState {
        AppState::new(store)
            .with_fact_source(scripted_source(vec![5, 9]))
            .with_clock(Arc::new(|| 1_000))
    }

    #[test]
    fn test_starts_on_home() {
        let state = state_with(Arc::new(MemoryNoteStore::new()));
        assert_eq!(state.view(), View::Home);
        assert_eq!(state.snapshot(), Snapshot::Home);
    }

    #[test]
    fn test_back_always_returns_home() {
        let mut state = state_with(Arc::new(MemoryNoteStore::new()));
        for view in View::ALL {
            state.navigate(view);
            assert_eq!(state.view(), view);
            state.back();
            assert_eq!(state.view(), View::Home);
        }
    }

    #[test]
    fn test_navigate_is_unconditional() {
        let mut state = state_with(Arc::new(MemoryNoteStore::new()));
        state.navigate(View::Fuel);
        state.navigate(View::Pacing);
        assert_eq!(state.view(), View::Pacing);
        state.back();
        assert_eq!(state.view(), View::Home);
    }

    #[test]
    fn test_facts_reset_on_entry() {
        let mut state = state_with(Arc::new(MemoryNoteStore::new()));
        assert_eq!(state.next_fact(), None);

        state.navigate(View::Facts);
        assert_eq!(state.current_fact(), Some(FACTS[0]));
        assert_eq!(state.next_fact(), Some(FACTS[5]));

        state.back();
        state.navigate(View::Facts);
        assert_eq!(state.snapshot(), Snapshot::Facts(FACTS[0]));
        assert_eq!(state.next_fact(), Some(FACTS[9]));
    }

    #[test]
    fn test_notes_load_on_entry() {
        let store = Arc::new(MemoryNoteStore::with_raw(
            r#"[{"id":1,"text":"Previously saved note"}]"#,
        ));
        let mut state = state_with(store);
        state.navigate(View::Notes);

        match state.snapshot() {
            Snapshot::Notes { notes, draft, listening } => {
                assert_eq!(notes, vec![Note::new(1, "Previously saved note".to_string())]);
                assert_eq!(draft, "");
                assert!(!listening);
            }
            other => panic!("expected notes screen, got {:?}", other),
        }
    }

    #[test]
    fn test_note_ops_persist_only_on_change() {
        let store = Arc::new(MemoryNoteStore::new());
        let mut state = state_with(store.clone());

        // Not on the notes screen
        assert_eq!(state.add_note("ignored").unwrap(), None);

        state.navigate(View::Notes);
        assert_eq!(state.add_note("   ").unwrap(), None);
        assert_eq!(store.writes(), 0);

        let note = state.add_note("Drink water").unwrap().unwrap();
        assert_eq!(note, Note::new(1_000, "Drink water".to_string()));
        assert_eq!(store.writes(), 1);

        assert!(!state.remove_note(42).unwrap());
        assert_eq!(store.writes(), 1);

        assert!(state.remove_note(1_000).unwrap());
        assert_eq!(store.writes(), 2);
        assert_eq!(store.raw().as_deref(), Some("[]"));
    }

    #[test]
    fn test_save_draft_persists_and_clears() {
        let store = Arc::new(MemoryNoteStore::new());
        let mut state = state_with(store.clone());
        state.navigate(View::Notes);

        state.note_pad_mut().unwrap().push_draft_line("Persistent note");
        let note = state.save_draft().unwrap().unwrap();

        assert_eq!(note.text(), "Persistent note");
        assert_eq!(state.note_pad().unwrap().draft(), "");
        assert!(store.raw().unwrap().contains("Persistent note"));
    }

    #[test]
    fn test_rest_timer_fresh_on_every_entry() {
        let mut state = state_with(Arc::new(MemoryNoteStore::new())).with_sound(false);
        state.navigate(View::Rest);
        {
            let timer = state.rest_timer_mut().unwrap();
            timer.start(1);
            timer.tick(1);
            timer.toggle_sound();
        }
        state.back();
        state.navigate(View::Rest);

        assert_eq!(
            state.snapshot(),
            Snapshot::Rest {
                remaining: 900,
                phase: TimerPhase::Ready,
                sound_enabled: false,
            }
        );
    }

    #[test]
    fn test_sessions_are_unique() {
        let mut state = state_with(Arc::new(MemoryNoteStore::new()));
        let a = state.next_session();
        let b = state.next_session();
        assert_ne!(a, b);
    }

    #[test]
    fn test_core_dictation_unsupported_without_capability() {
        let core = Core::new(
            state_with(Arc::new(MemoryNoteStore::new())),
            Capabilities::default(),
        );
        assert_eq!(core.toggle_dictation(), DictationOutcome::Inactive);

        core.navigate(View::Notes);
        core.set_draft("half a thought".to_string());
        assert_eq!(core.toggle_dictation(), DictationOutcome::Unsupported);

        match core.snapshot() {
            Snapshot::Notes { draft, listening, .. } => {
                assert_eq!(draft, "half a thought");
                assert!(!listening);
            }
            other => panic!("expected notes screen, got {:?}", other),
        }
    }

    #[test]
    fn test_core_timer_controls_off_screen_are_noops() {
        let core = Core::new(
            state_with(Arc::new(MemoryNoteStore::new())),
            Capabilities::default(),
        );
        assert_eq!(core.toggle_timer(), None);
        assert_eq!(core.toggle_sound(), None);
        assert!(!core.tick_rest_timer(1));
    }

    /// Capture that never completes on its own
    struct SilentSpeech;

    #[async_trait::async_trait]
    impl SpeechToText for SilentSpeech {
        async fn listen(&self) -> Result<Option<String>, CapabilityError> {
            std::future::pending().await
        }
    }

    fn dictation_core() -> Core {
        let capabilities = Capabilities {
            speech: Capability::Available(Arc::new(SilentSpeech) as Arc<dyn SpeechToText>),
            ..Capabilities::default()
        };
        let core = Core::new(state_with(Arc::new(MemoryNoteStore::new())), capabilities);
        core.navigate(View::Notes);
        core
    }

    fn draft_and_listening(core: &Core) -> (String, bool) {
        match core.snapshot() {
            Snapshot::Notes {
                draft, listening, ..
            } => (draft, listening),
            other => panic!("expected notes screen, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_result_for_current_session_lands_in_draft() {
        let core = dictation_core();
        core.set_draft("call".to_string());

        assert_eq!(core.toggle_dictation(), DictationOutcome::Started);
        let session = core.read(|state| state.sessions);
        core.finish_dictation(session, Ok(Some("the pharmacy".to_string())));

        assert_eq!(
            draft_and_listening(&core),
            ("call the pharmacy".to_string(), false)
        );
    }

    #[tokio::test]
    async fn test_late_transcript_from_stopped_session_is_dropped() {
        let core = dictation_core();
        core.set_draft("call".to_string());

        assert_eq!(core.toggle_dictation(), DictationOutcome::Started);
        let stopped = core.read(|state| state.sessions);
        assert_eq!(core.toggle_dictation(), DictationOutcome::Stopped);
        assert_eq!(core.toggle_dictation(), DictationOutcome::Started);

        core.finish_dictation(stopped, Ok(Some("late words".to_string())));

        // The newer session is still listening and the draft is untouched
        assert_eq!(draft_and_listening(&core), ("call".to_string(), true));
    }

    #[tokio::test]
    async fn test_late_transcript_after_leaving_notes_is_dropped() {
        let core = dictation_core();

        assert_eq!(core.toggle_dictation(), DictationOutcome::Started);
        let abandoned = core.read(|state| state.sessions);
        core.back();
        core.navigate(View::Notes);

        core.finish_dictation(abandoned, Ok(Some("late words".to_string())));

        assert_eq!(draft_and_listening(&core), (String::new(), false));
    }
}
