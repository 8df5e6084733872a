// Persisted metronome configuration
//
// Each field is stored under its own key and loaded independently: a missing
// or malformed key falls back to that field's default without failing the
// rest of the load. Saved values always win over built-in defaults.

pub mod quick_pick;
pub mod store;

pub use quick_pick::{ENTRY_MAX_DIGITS, QuickPickRow, QuickPicks, SettingsError};
pub use store::{FileStore, KvStore, MemoryStore, default_settings_path};

use crate::sequencer::meter::{Meter, Tempo};

mod keys {
    pub const BPM: &str = "bpm";
    pub const BEATS_PER_BAR: &str = "beats_per_bar";
    pub const SUBDIVISION: &str = "subdivision";
    pub const ACCENT: &str = "accent";
    pub const QUICK_PICKS: &str = "quick_picks";
}

/// The full persisted configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub tempo: Tempo,
    pub meter: Meter,
    pub accent_enabled: bool,
    pub quick_picks: QuickPicks,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tempo: Tempo::default(),
            meter: Meter::default(),
            accent_enabled: false,
            quick_picks: QuickPicks::default(),
        }
    }
}

impl Settings {
    /// Load every field, each falling back to its default independently.
    /// Numeric fields are clamped back into their valid ranges.
    pub fn load(store: &dyn KvStore) -> Self {
        let defaults = Self::default();

        let tempo = store
            .get(keys::BPM)
            .and_then(|value| value.trim().parse::<u16>().ok())
            .map(Tempo::new)
            .unwrap_or(defaults.tempo);

        let beats_per_bar = store
            .get(keys::BEATS_PER_BAR)
            .and_then(|value| value.trim().parse::<u8>().ok())
            .unwrap_or(defaults.meter.beats_per_bar());
        let subdivision = store
            .get(keys::SUBDIVISION)
            .and_then(|value| value.trim().parse::<u8>().ok())
            .unwrap_or(defaults.meter.subdivision());

        let accent_enabled = store
            .get(keys::ACCENT)
            .and_then(|value| value.trim().parse::<bool>().ok())
            .unwrap_or(defaults.accent_enabled);

        let quick_picks = store
            .get(keys::QUICK_PICKS)
            .and_then(|value| serde_json::from_str::<QuickPicks>(&value).ok())
            .map(QuickPicks::sanitized)
            .unwrap_or(defaults.quick_picks);

        Self {
            tempo,
            meter: Meter::new(beats_per_bar, subdivision),
            accent_enabled,
            quick_picks,
        }
    }

    /// Write every key through to the store
    pub fn save(&self, store: &mut dyn KvStore) {
        store.set(keys::BPM, &self.tempo.bpm().to_string());
        store.set(
            keys::BEATS_PER_BAR,
            &self.meter.beats_per_bar().to_string(),
        );
        store.set(keys::SUBDIVISION, &self.meter.subdivision().to_string());
        store.set(keys::ACCENT, &self.accent_enabled.to_string());

        match serde_json::to_string(&self.quick_picks) {
            Ok(json) => store.set(keys::QUICK_PICKS, &json),
            Err(err) => tracing::warn!(%err, "failed to serialize quick picks"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::meter::{MAX_BPM, MIN_BPM};

    #[test]
    fn test_load_from_empty_store_yields_defaults() {
        let store = MemoryStore::default();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut store = MemoryStore::default();

        let mut settings = Settings::default();
        settings.tempo = Tempo::new(175);
        settings.meter = Meter::new(3, 2);
        settings.accent_enabled = true;
        settings
            .quick_picks
            .commit_edit(QuickPickRow::Bottom, 5, "208")
            .unwrap();

        settings.save(&mut store);
        let loaded = Settings::load(&store);
        assert_eq!(loaded, settings);

        // Saving what was loaded changes nothing
        loaded.save(&mut store);
        assert_eq!(Settings::load(&store), loaded);
    }

    #[test]
    fn test_malformed_keys_fall_back_independently() {
        let mut store = MemoryStore::default();
        store.set("bpm", "not a tempo");
        store.set("beats_per_bar", "3");
        store.set("subdivision", "");
        store.set("accent", "yes");
        store.set("quick_picks", "[broken");

        let settings = Settings::load(&store);
        assert_eq!(settings.tempo, Tempo::default());
        assert_eq!(settings.meter.beats_per_bar(), 3);
        assert_eq!(settings.meter.subdivision(), 1);
        assert!(!settings.accent_enabled);
        assert_eq!(settings.quick_picks, QuickPicks::default());
    }

    #[test]
    fn test_out_of_range_values_clamped_on_load() {
        let mut store = MemoryStore::default();
        store.set("bpm", "231");
        store.set("beats_per_bar", "0");
        store.set("subdivision", "0");
        store.set("quick_picks", r#"{"row1":[10,250],"row2":[120]}"#);

        let settings = Settings::load(&store);
        assert_eq!(settings.tempo.bpm(), MAX_BPM);
        assert_eq!(settings.meter.beats_per_bar(), 1);
        assert_eq!(settings.meter.subdivision(), 1);
        assert_eq!(settings.quick_picks.row1, vec![MIN_BPM, MAX_BPM]);
        assert_eq!(settings.quick_picks.row2, vec![120]);
    }

    #[test]
    fn test_saved_meter_wins_over_defaults() {
        // Saved user preference is respected; defaults apply only to the
        // fields that are absent
        let mut store = MemoryStore::default();
        store.set("subdivision", "4");

        let settings = Settings::load(&store);
        assert_eq!(settings.meter.subdivision(), 4);
        assert_eq!(settings.meter.beats_per_bar(), 4);
        assert_eq!(settings.tempo, Tempo::default());
    }
}
