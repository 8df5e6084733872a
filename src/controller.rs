// Controller - central owner of the mutable metronome state
//
// Translates UI gestures into validated settings mutations (persisting after
// each one), runs the look-ahead scheduler on the frame tick, and turns
// emitted beats into click events for the audio path plus deferred beat
// highlights for the display.

use std::collections::VecDeque;

use crate::audio::click::ClickType;
use crate::audio::clock::AudioClock;
use crate::messaging::channels::ClickProducer;
use crate::messaging::event::ClickEvent;
use crate::sequencer::meter::{Meter, Tempo};
use crate::sequencer::scheduler::LookAheadScheduler;
use crate::settings::{KvStore, QuickPickRow, Settings, SettingsError};

/// A beat highlight waiting for the clock to reach its click
#[derive(Debug, Clone, Copy)]
struct PendingVisual {
    beat_index: u32,
    at: f64,
}

pub struct MetronomeController {
    settings: Settings,
    store: Box<dyn KvStore>,
    scheduler: LookAheadScheduler,
    clock: AudioClock,
    click_tx: ClickProducer,
    editing: [bool; 2],
    pending_visuals: VecDeque<PendingVisual>,
}

fn row_slot(row: QuickPickRow) -> usize {
    match row {
        QuickPickRow::Top => 0,
        QuickPickRow::Bottom => 1,
    }
}

impl MetronomeController {
    pub fn new(store: Box<dyn KvStore>, clock: AudioClock, click_tx: ClickProducer) -> Self {
        let settings = Settings::load(store.as_ref());
        Self {
            settings,
            store,
            scheduler: LookAheadScheduler::new(),
            clock,
            click_tx,
            editing: [false; 2],
            pending_visuals: VecDeque::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    fn persist(&mut self) {
        self.settings.save(self.store.as_mut());
    }

    pub fn set_tempo(&mut self, bpm: u16) {
        self.settings.tempo = Tempo::new(bpm);
        self.persist();
    }

    pub fn nudge_tempo(&mut self, delta: i32) {
        self.settings.tempo = self.settings.tempo.nudged(delta);
        self.persist();
    }

    /// Meter changes restart the cycle at beat 0; the next beat's target
    /// time stays where the sequencer already put it
    pub fn set_beats_per_bar(&mut self, beats_per_bar: u8) {
        self.settings.meter = Meter::new(beats_per_bar, self.settings.meter.subdivision());
        self.scheduler.reset_cycle();
        self.persist();
    }

    pub fn set_subdivision(&mut self, subdivision: u8) {
        self.settings.meter = Meter::new(self.settings.meter.beats_per_bar(), subdivision);
        self.scheduler.reset_cycle();
        self.persist();
    }

    pub fn set_accent_enabled(&mut self, enabled: bool) {
        self.settings.accent_enabled = enabled;
        self.persist();
    }

    /// Recall a quick-pick tempo
    pub fn select_quick_pick(&mut self, row: QuickPickRow, index: usize) {
        if let Some(&bpm) = self.settings.quick_picks.row(row).get(index) {
            self.set_tempo(bpm);
        }
    }

    pub fn is_editing(&self, row: QuickPickRow) -> bool {
        self.editing[row_slot(row)]
    }

    pub fn toggle_edit_mode(&mut self, row: QuickPickRow) {
        self.editing[row_slot(row)] = !self.editing[row_slot(row)];
    }

    /// Commit a numeric quick-pick entry; a rejected entry leaves the row
    /// untouched and nothing is persisted
    pub fn commit_quick_pick_edit(
        &mut self,
        row: QuickPickRow,
        index: usize,
        entry: &str,
    ) -> Result<u16, SettingsError> {
        let value = self.settings.quick_picks.commit_edit(row, index, entry)?;
        self.persist();
        Ok(value)
    }

    pub fn toggle_playback(&mut self) {
        if self.scheduler.is_running() {
            self.scheduler.stop();
        } else {
            self.scheduler.start(self.clock.now_seconds());
        }
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Frame tick: drain every beat inside the look-ahead window into the
    /// audio path and queue its highlight for the display
    pub fn tick(&mut self) {
        let now = self.clock.now_seconds();
        let tempo = self.settings.tempo;
        let meter = self.settings.meter;
        let accent_enabled = self.settings.accent_enabled;

        let clock = &self.clock;
        let click_tx = &mut self.click_tx;
        let visuals = &mut self.pending_visuals;

        self.scheduler.tick(now, tempo, meter, |beat_index, target_time| {
            let click = ClickType::for_beat(beat_index, meter.beats_per_bar(), accent_enabled);
            let event = ClickEvent {
                click,
                start_sample: clock.seconds_to_samples(target_time),
            };
            // A full ring buffer drops the click; it never blocks the UI
            let _ = ringbuf::traits::Producer::try_push(click_tx, event);
            visuals.push_back(PendingVisual {
                beat_index,
                at: target_time,
            });
        });
    }

    /// Latest beat highlight whose click time the clock has reached, if any.
    /// Highlights queued before a stop still fire; cosmetic only.
    pub fn due_visual(&mut self) -> Option<u32> {
        let now = self.clock.now_seconds();
        let mut latest = None;
        while self
            .pending_visuals
            .front()
            .is_some_and(|visual| visual.at <= now)
        {
            latest = self.pending_visuals.pop_front().map(|visual| visual.beat_index);
        }
        latest
    }
}
