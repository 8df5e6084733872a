// Audio module - stream clock, click synthesis/mixing, and the CPAL engine

pub mod click;
pub mod clock;
pub mod engine;
pub mod parameters;

pub use click::{ClickMixer, ClickSound, ClickType};
pub use clock::AudioClock;
pub use engine::{AudioEngine, EngineError};
pub use parameters::AtomicF32;
