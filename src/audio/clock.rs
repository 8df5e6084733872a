// Audio clock - monotonic sample counter shared with the audio callback
// The only source of truth for "now" in scheduling decisions

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared stream clock
/// The audio callback advances it; the UI thread reads it as seconds
#[derive(Debug, Clone)]
pub struct AudioClock {
    /// Current sample position (incremented by the audio callback)
    sample_position: Arc<AtomicU64>,
    sample_rate: f64,
}

impl AudioClock {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_position: Arc::new(AtomicU64::new(0)),
            sample_rate,
        }
    }

    /// Current sample position (called from the UI thread)
    pub fn current_sample(&self) -> u64 {
        self.sample_position.load(Ordering::Relaxed)
    }

    /// Advance the position (called from the audio callback)
    pub fn advance(&self, frames: usize) {
        self.sample_position
            .fetch_add(frames as u64, Ordering::Relaxed);
    }

    /// Current stream time in seconds
    pub fn now_seconds(&self) -> f64 {
        self.current_sample() as f64 / self.sample_rate
    }

    /// Convert an absolute stream time to a sample position
    pub fn seconds_to_samples(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.sample_rate).round() as u64
    }

    /// Get sample rate
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}
