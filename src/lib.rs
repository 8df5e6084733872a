// Woodblock - a desktop metronome
// Library exports for tests and benchmarks

pub mod audio;
pub mod controller;
pub mod messaging;
pub mod sequencer;
pub mod settings;
pub mod ui;

// Re-export commonly used types for convenience
pub use audio::click::{ClickMixer, ClickSound, ClickType};
pub use audio::clock::AudioClock;
pub use audio::engine::{AudioEngine, EngineError};
pub use audio::parameters::AtomicF32;
pub use controller::MetronomeController;
pub use messaging::channels::create_click_channel;
pub use messaging::event::ClickEvent;
pub use sequencer::{BeatState, LookAheadScheduler, MAX_BPM, MIN_BPM, Meter, Tempo};
pub use settings::{FileStore, KvStore, MemoryStore, QuickPickRow, QuickPicks, Settings};
