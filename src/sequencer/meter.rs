// Musical context - tempo and meter
// Tempo is a bounded integer BPM; every mutation clamps back into range

use std::fmt;

/// Lowest selectable tempo in BPM
pub const MIN_BPM: u16 = 20;

/// Highest selectable tempo in BPM
pub const MAX_BPM: u16 = 230;

/// Tempo in BPM (Beats Per Minute), always within `MIN_BPM..=MAX_BPM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tempo {
    bpm: u16,
}

impl Tempo {
    /// Creates a new tempo, clamping into the valid range
    pub fn new(bpm: u16) -> Self {
        Self {
            bpm: bpm.clamp(MIN_BPM, MAX_BPM),
        }
    }

    /// Get BPM value
    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    /// Tempo shifted by `delta` BPM, clamped at the range bounds
    pub fn nudged(self, delta: i32) -> Self {
        let shifted = (self.bpm as i32 + delta).clamp(MIN_BPM as i32, MAX_BPM as i32);
        Self { bpm: shifted as u16 }
    }

    /// Duration of one beat in seconds
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    /// Classical tempo marking for display
    pub fn marking(&self) -> &'static str {
        match self.bpm {
            ..60 => "Largo",
            60..100 => "Andante",
            100..120 => "Moderato",
            120..160 => "Allegro",
            160.. => "Presto",
        }
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(120)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.bpm)
    }
}

/// Meter: beats per bar and subdivisions per beat
/// The beat cycle length is `beats_per_bar * subdivision`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meter {
    beats_per_bar: u8,
    subdivision: u8,
}

impl Meter {
    /// Creates a new meter; both fields are floored at 1
    pub fn new(beats_per_bar: u8, subdivision: u8) -> Self {
        Self {
            beats_per_bar: beats_per_bar.max(1),
            subdivision: subdivision.max(1),
        }
    }

    /// Beats per bar
    pub fn beats_per_bar(&self) -> u8 {
        self.beats_per_bar
    }

    /// Subdivisions per beat
    pub fn subdivision(&self) -> u8 {
        self.subdivision
    }

    /// One full bar expressed in subdivision units
    pub fn cycle_len(&self) -> u32 {
        self.beats_per_bar as u32 * self.subdivision as u32
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new(4, 1)
    }
}
