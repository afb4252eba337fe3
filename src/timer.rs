//! Rest timer
//!
//! The countdown behind the "Aggressive Rest" screen and the cancellable tick
//! task that drives it.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Length of one rest, in seconds
pub const REST_SECONDS: u32 = 900;

/// Interval between two ticks of a running timer
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Where the rest timer is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Full duration, never started
    Ready,
    Running,
    Paused,
    /// Reached zero; only re-entering the rest screen starts over
    Expired,
}

/// What a single tick did to the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting, with this many seconds left
    Counting(u32),
    /// Just reached zero. `chime` is the sound flag as read at this instant.
    Expired { chime: bool },
    /// The tick belonged to a cancelled session or the timer is not running
    Ignored,
}

/// Handle on a scheduled, repeating tick.
///
/// Dropping the handle (or calling [`TickHandle::cancel`]) aborts the task, so
/// no tick can fire after its owner is gone.
#[derive(Debug)]
pub struct TickHandle {
    task: Option<JoinHandle<()>>,
}

impl TickHandle {
    /// Spawns a task calling `on_tick` once per `period`, starting one period
    /// from now. The task stops as soon as `on_tick` returns false.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });

        Self { task: Some(task) }
    }

    /// Aborts the pending tick
    pub fn cancel(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Releases the handle without aborting. Used from inside the tick itself
    /// when it has decided to stop.
    pub fn detach(mut self) {
        self.task.take();
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Countdown state for one visit to the rest screen
#[derive(Debug)]
pub struct RestTimer {
    remaining: u32,
    phase: TimerPhase,
    sound_enabled: bool,
    session: Option<u64>,
    ticker: Option<TickHandle>,
}

impl RestTimer {
    /// Creates a full, stopped timer
    pub fn new(sound_enabled: bool) -> Self {
        Self {
            remaining: REST_SECONDS,
            phase: TimerPhase::Ready,
            sound_enabled,
            session: None,
            ticker: None,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Starts or resumes counting under a fresh session id.
    /// Returns false when the timer cannot start (running or expired).
    pub fn start(&mut self, session: u64) -> bool {
        match self.phase {
            TimerPhase::Ready | TimerPhase::Paused => {
                self.phase = TimerPhase::Running;
                self.session = Some(session);
                true
            }
            TimerPhase::Running | TimerPhase::Expired => false,
        }
    }

    /// Hands the scheduled tick for the current session to the timer, which
    /// cancels it on pause or drop.
    pub fn attach(&mut self, ticker: TickHandle) {
        if let Some(previous) = self.ticker.replace(ticker) {
            previous.cancel();
        }
    }

    /// Pauses a running timer, keeping the remaining time.
    /// Returns false when there was nothing to pause.
    pub fn pause(&mut self) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }

        self.phase = TimerPhase::Paused;
        self.session = None;
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
        true
    }

    /// Flips the sound flag and returns the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Applies one elapsed second. Decrement and the zero check happen
    /// together, so expiry is reported exactly once.
    pub fn tick(&mut self, session: u64) -> TickOutcome {
        if self.phase != TimerPhase::Running || self.session != Some(session) {
            return TickOutcome::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return TickOutcome::Counting(self.remaining);
        }

        self.phase = TimerPhase::Expired;
        self.session = None;
        // The tick task is the caller here; it stops on its own once told.
        if let Some(ticker) = self.ticker.take() {
            ticker.detach();
        }
        TickOutcome::Expired {
            chime: self.sound_enabled,
        }
    }

    /// Remaining time as `M:SS`
    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }
}

impl Default for RestTimer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Formats whole seconds as minutes and zero-padded seconds
pub fn format_clock(total_seconds: u32) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}
