// Messaging - lock-free channel between the UI thread and the audio callback

pub mod channels;
pub mod event;

pub use channels::{ClickConsumer, ClickProducer, create_click_channel};
pub use event::ClickEvent;
