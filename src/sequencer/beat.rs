// Beat sequencing - pure advance over the running beat state

use super::meter::{Meter, Tempo};

/// State of a running metronome session
/// `beat_index` wraps at the meter's cycle length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatState {
    /// Absolute clock time of the next beat to emit, in seconds
    pub next_beat_time: f64,
    /// 0-based position within the beat cycle
    pub beat_index: u32,
}

impl BeatState {
    /// Fresh state for a session whose first beat lands at `time`
    pub fn starting_at(time: f64) -> Self {
        Self {
            next_beat_time: time,
            beat_index: 0,
        }
    }
}

/// Compute the state after one beat
/// Deterministic; tempo and meter are pre-validated upstream
pub fn advance(state: BeatState, tempo: Tempo, meter: Meter) -> BeatState {
    let interval = tempo.beat_duration_seconds() / meter.subdivision() as f64;
    BeatState {
        next_beat_time: state.next_beat_time + interval,
        beat_index: (state.beat_index + 1) % meter.cycle_len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::meter::{MAX_BPM, MIN_BPM};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_advance_interval_exact() {
        // One advance adds exactly 60/(bpm*subdivision) seconds,
        // across the whole tempo range and several subdivisions
        for bpm in [MIN_BPM, 60, 97, 120, 185, MAX_BPM] {
            for subdivision in [1u8, 2, 3, 4] {
                let tempo = Tempo::new(bpm);
                let meter = Meter::new(4, subdivision);
                let expected = 60.0 / (bpm as f64 * subdivision as f64);

                let state = BeatState::starting_at(1.0);
                let next = advance(state, tempo, meter);
                assert!(
                    (next.next_beat_time - (1.0 + expected)).abs() < EPSILON,
                    "interval off at {} BPM / {} subdivisions",
                    bpm,
                    subdivision
                );
            }
        }
    }

    #[test]
    fn test_advance_accumulates() {
        // 120 BPM, subdivision 2: interval = 0.25s
        let tempo = Tempo::new(120);
        let meter = Meter::new(4, 2);

        let mut state = BeatState::starting_at(0.0);
        for step in 1..=16 {
            state = advance(state, tempo, meter);
            assert!((state.next_beat_time - step as f64 * 0.25).abs() < EPSILON);
        }
    }

    #[test]
    fn test_beat_index_cycles() {
        let tempo = Tempo::new(100);

        for (beats, subdivision) in [(4u8, 1u8), (4, 2), (3, 4), (7, 3)] {
            let meter = Meter::new(beats, subdivision);
            let cycle = meter.cycle_len();

            let mut state = BeatState::starting_at(0.0);
            for expected in 1..cycle {
                state = advance(state, tempo, meter);
                assert_eq!(state.beat_index, expected);
            }

            // Wraps back to 0 after exactly cycle_len advances
            state = advance(state, tempo, meter);
            assert_eq!(state.beat_index, 0);
        }
    }

    #[test]
    fn test_starting_state() {
        let state = BeatState::starting_at(2.5);
        assert_eq!(state.beat_index, 0);
        assert_eq!(state.next_beat_time, 2.5);
    }
}
