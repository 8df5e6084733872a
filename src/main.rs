use woodblock::audio::clock::AudioClock;
use woodblock::audio::engine::AudioEngine;
use woodblock::audio::parameters::AtomicF32;
use woodblock::controller::MetronomeController;
use woodblock::messaging::channels::create_click_channel;
use woodblock::settings::{FileStore, KvStore, MemoryStore, default_settings_path};
use woodblock::ui::app::MetronomeApp;

// Sized well past the worst case: a full look-ahead window at the highest
// tempo and finest subdivision is under 16 clicks
const CLICK_RINGBUFFER_CAPACITY: usize = 64;

/// Sample rate assumed when no audio device is available; the clock then
/// never advances and the app runs silent
const FALLBACK_SAMPLE_RATE: f64 = 48_000.0;

fn main() {
    tracing_subscriber::fmt::init();

    let (click_tx, click_rx) = create_click_channel(CLICK_RINGBUFFER_CAPACITY);

    // A missing or failing audio device leaves the app running without sound
    let (clock, volume, _engine) = match AudioEngine::new(click_rx) {
        Ok(engine) => (engine.clock(), engine.volume.clone(), Some(engine)),
        Err(err) => {
            tracing::error!(%err, "audio unavailable, continuing without sound");
            (AudioClock::new(FALLBACK_SAMPLE_RATE), AtomicF32::new(0.8), None)
        }
    };

    let store: Box<dyn KvStore> = match default_settings_path() {
        Some(path) => Box::new(FileStore::open(path)),
        None => {
            tracing::warn!("no user config directory, settings will not persist");
            Box::new(MemoryStore::default())
        }
    };

    let controller = MetronomeController::new(store, clock, click_tx);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 560.0])
            .with_title("Woodblock"),
        ..Default::default()
    };

    let _ = eframe::run_native(
        "Woodblock",
        native_options,
        Box::new(|_cc| Ok(Box::new(MetronomeApp::new(controller, volume)))),
    );
}
