// Sequencer module - tempo, meter, and look-ahead beat scheduling

pub mod beat;
pub mod meter;
pub mod scheduler;

pub use beat::{BeatState, advance};
pub use meter::{MAX_BPM, MIN_BPM, Meter, Tempo};
pub use scheduler::LookAheadScheduler;
