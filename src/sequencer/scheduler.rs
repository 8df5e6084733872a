// Look-ahead scheduling - bridges the coarse frame cadence to the audio clock
//
// The tick runs once per displayed frame with no guaranteed period. Each tick
// drains every beat that falls inside the look-ahead window, so beats are
// never skipped even when the frame cadence is coarser than the beat interval
// (high tempo, fine subdivision).

use super::beat::{BeatState, advance};
use super::meter::{Meter, Tempo};

/// Window and lead constants, in seconds
const LOOK_AHEAD_SECONDS: f64 = 0.1;
const START_LEAD_SECONDS: f64 = 0.05;

/// Frame-driven beat scheduler
/// Idle until `start`; while running, `tick` emits beats with precise target
/// times via the supplied callback
#[derive(Debug, Clone)]
pub struct LookAheadScheduler {
    running: Option<BeatState>,
    look_ahead: f64,
    start_lead: f64,
}

impl LookAheadScheduler {
    /// Create an idle scheduler with the default window
    pub fn new() -> Self {
        Self::with_window(LOOK_AHEAD_SECONDS, START_LEAD_SECONDS)
    }

    /// Create with explicit window and start lead
    pub fn with_window(look_ahead: f64, start_lead: f64) -> Self {
        Self {
            running: None,
            look_ahead,
            start_lead,
        }
    }

    /// Whether a session is running
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Current beat state, if running
    pub fn beat_state(&self) -> Option<BeatState> {
        self.running
    }

    /// Start a session: beat index 0, first beat slightly in the future so
    /// the audio path is never asked to play in the past
    pub fn start(&mut self, now: f64) {
        self.running = Some(BeatState::starting_at(now + self.start_lead));
    }

    /// Stop the session. Idempotent; beats already emitted stay committed.
    pub fn stop(&mut self) {
        self.running = None;
    }

    /// Restart the cycle at beat 0 without moving the next beat time.
    /// Called when the meter changes mid-session.
    pub fn reset_cycle(&mut self) {
        if let Some(state) = &mut self.running {
            state.beat_index = 0;
        }
    }

    /// Emit every beat whose target time falls before `now + look_ahead`,
    /// advancing the sequencer once per emitted beat. Tempo and meter are
    /// read fresh each call, so changes apply from the next interval on and
    /// never move an already-computed target time.
    pub fn tick<F>(&mut self, now: f64, tempo: Tempo, meter: Meter, mut emit: F)
    where
        F: FnMut(u32, f64),
    {
        let Some(mut state) = self.running else {
            return;
        };

        while state.next_beat_time < now + self.look_ahead {
            emit(state.beat_index, state.next_beat_time);
            state = advance(state, tempo, meter);
        }

        self.running = Some(state);
    }
}

impl Default for LookAheadScheduler {
    fn default() -> Self {
        Self::new()
    }
}
