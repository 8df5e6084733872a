// Click synthesis and sample-accurate mixing
// Both click presets are rendered once at engine start and played back by
// reference, keeping per-beat cost to a buffer copy

use std::f32::consts::PI;

use crate::messaging::event::ClickEvent;

/// Click flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickType {
    /// First subdivision of the bar (louder, higher-pitched)
    Accent,
    /// Every other position
    Regular,
}

impl ClickType {
    /// Accent fires only when enabled and the raw cycle index lands on a
    /// multiple of beats-per-bar
    pub fn for_beat(beat_index: u32, beats_per_bar: u8, accent_enabled: bool) -> Self {
        if accent_enabled && beat_index % beats_per_bar as u32 == 0 {
            ClickType::Accent
        } else {
            ClickType::Regular
        }
    }
}

/// Pre-rendered woodblock-style click waveforms
#[derive(Debug, Clone)]
pub struct ClickSound {
    accent: Vec<f32>,
    regular: Vec<f32>,
}

impl ClickSound {
    /// Total click duration
    const DURATION_MS: f32 = 100.0;
    /// The pitch falls to 0.8x over this span for the "thwack" attack
    const PITCH_DROP_MS: f32 = 20.0;
    /// Linear attack span
    const ATTACK_MS: f32 = 1.0;

    pub fn new(sample_rate: f32) -> Self {
        Self {
            accent: Self::render(sample_rate, 1200.0, 1.0),
            regular: Self::render(sample_rate, 800.0, 0.7),
        }
    }

    /// Render one click: sine with a falling pitch, sharp attack, quick
    /// exponential decay
    fn render(sample_rate: f32, base_freq: f32, peak: f32) -> Vec<f32> {
        let total = ((Self::DURATION_MS / 1000.0) * sample_rate) as usize;
        let attack = (((Self::ATTACK_MS / 1000.0) * sample_rate) as usize).max(1);
        let drop = (((Self::PITCH_DROP_MS / 1000.0) * sample_rate) as usize).max(1);

        let mut samples = Vec::with_capacity(total);
        let mut phase = 0.0f32;

        for i in 0..total {
            let freq = if i < drop {
                base_freq * (1.0 - 0.2 * i as f32 / drop as f32)
            } else {
                base_freq * 0.8
            };
            phase += 2.0 * PI * freq / sample_rate;

            let envelope = if i < attack {
                peak * (i + 1) as f32 / attack as f32
            } else {
                let t = (i - attack) as f32 / (total - attack) as f32;
                peak * (0.001 / peak).powf(t)
            };

            samples.push(phase.sin() * envelope);
        }

        samples
    }

    /// Get the waveform for a click type
    pub fn waveform(&self, click: ClickType) -> &[f32] {
        match click {
            ClickType::Accent => &self.accent,
            ClickType::Regular => &self.regular,
        }
    }

    /// Click length in samples (both presets share it)
    pub fn len_samples(&self) -> usize {
        self.accent.len()
    }
}

/// Mixes queued clicks into the output at their exact start samples
/// Owned by the audio callback; the queue is bounded so pushes never allocate
#[derive(Debug)]
pub struct ClickMixer {
    sound: ClickSound,
    queue: Vec<ClickEvent>,
}

impl ClickMixer {
    /// Upper bound on simultaneously queued clicks; extra events are dropped
    const MAX_QUEUED: usize = 32;

    pub fn new(sound: ClickSound) -> Self {
        Self {
            sound,
            queue: Vec::with_capacity(Self::MAX_QUEUED),
        }
    }

    /// Queue a click. Returns false (dropping the event) when full.
    pub fn push(&mut self, event: ClickEvent) -> bool {
        if self.queue.len() == Self::MAX_QUEUED {
            return false;
        }
        self.queue.push(event);
        true
    }

    /// Mix every queued click into a mono buffer whose first frame sits at
    /// `base_sample`. A click whose start is already past begins mid-waveform
    /// at the elapsed offset; one past its full length is dropped.
    pub fn render(&mut self, base_sample: u64, out: &mut [f32]) {
        let len = self.sound.len_samples() as u64;
        self.queue.retain(|ev| ev.start_sample + len > base_sample);

        for ev in &self.queue {
            let wave = self.sound.waveform(ev.click);
            let begin = ev.start_sample.saturating_sub(base_sample) as usize;
            if begin >= out.len() {
                continue;
            }
            let skip = (base_sample.saturating_sub(ev.start_sample) as usize).min(wave.len());
            for (slot, &sample) in out[begin..].iter_mut().zip(wave[skip..].iter()) {
                *slot += sample;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_waveforms() {
        let sound = ClickSound::new(48000.0);

        let accent = sound.waveform(ClickType::Accent);
        let regular = sound.waveform(ClickType::Regular);

        assert!(!accent.is_empty());
        assert_eq!(accent.len(), regular.len());

        // 100ms at 48kHz
        assert_eq!(sound.len_samples(), 4800);

        // Accent is louder
        let accent_peak = accent.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        let regular_peak = regular.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        assert!(accent_peak > regular_peak);

        // Envelope decays to near silence by the end
        assert!(accent[accent.len() - 1].abs() < 0.01);
    }

    #[test]
    fn test_accent_decision() {
        // 4 beats per bar, 2 subdivisions: raw indices 0 and 4 are accented
        for index in 0..8u32 {
            let click = ClickType::for_beat(index, 4, true);
            if index == 0 || index == 4 {
                assert_eq!(click, ClickType::Accent, "index {}", index);
            } else {
                assert_eq!(click, ClickType::Regular, "index {}", index);
            }
        }
    }

    #[test]
    fn test_accent_disabled_never_fires() {
        for index in 0..12u32 {
            assert_eq!(ClickType::for_beat(index, 4, false), ClickType::Regular);
        }
    }

    #[test]
    fn test_mixer_exact_start_offset() {
        let mut mixer = ClickMixer::new(ClickSound::new(48000.0));
        let wave: Vec<f32> = mixer.sound.waveform(ClickType::Regular).to_vec();

        mixer.push(ClickEvent {
            click: ClickType::Regular,
            start_sample: 110,
        });

        let mut out = vec![0.0f32; 256];
        mixer.render(100, &mut out);

        // Silent before the start sample, waveform copied from it on
        assert!(out[..10].iter().all(|&s| s == 0.0));
        assert_eq!(&out[10..], &wave[..246]);
    }

    #[test]
    fn test_mixer_click_spans_buffers() {
        let mut mixer = ClickMixer::new(ClickSound::new(48000.0));
        let wave: Vec<f32> = mixer.sound.waveform(ClickType::Accent).to_vec();

        mixer.push(ClickEvent {
            click: ClickType::Accent,
            start_sample: 0,
        });

        let mut first = vec![0.0f32; 512];
        mixer.render(0, &mut first);
        let mut second = vec![0.0f32; 512];
        mixer.render(512, &mut second);

        assert_eq!(&first[..], &wave[..512]);
        assert_eq!(&second[..], &wave[512..1024]);
    }

    #[test]
    fn test_mixer_late_click_starts_mid_waveform() {
        let mut mixer = ClickMixer::new(ClickSound::new(48000.0));
        let wave: Vec<f32> = mixer.sound.waveform(ClickType::Regular).to_vec();

        // Scheduled 100 samples before the buffer start
        mixer.push(ClickEvent {
            click: ClickType::Regular,
            start_sample: 900,
        });

        let mut out = vec![0.0f32; 64];
        mixer.render(1000, &mut out);
        assert_eq!(&out[..], &wave[100..164]);
    }

    #[test]
    fn test_mixer_expired_click_dropped() {
        let mut mixer = ClickMixer::new(ClickSound::new(48000.0));
        let len = mixer.sound.len_samples() as u64;

        mixer.push(ClickEvent {
            click: ClickType::Regular,
            start_sample: 0,
        });

        // The buffer starts after the whole waveform has elapsed
        let mut out = vec![0.0f32; 128];
        mixer.render(len, &mut out);
        assert!(out.iter().all(|&s| s == 0.0));
        assert!(mixer.queue.is_empty());
    }

    #[test]
    fn test_mixer_overlapping_clicks_sum() {
        let mut mixer = ClickMixer::new(ClickSound::new(48000.0));
        let wave: Vec<f32> = mixer.sound.waveform(ClickType::Regular).to_vec();

        mixer.push(ClickEvent {
            click: ClickType::Regular,
            start_sample: 0,
        });
        mixer.push(ClickEvent {
            click: ClickType::Regular,
            start_sample: 0,
        });

        let mut out = vec![0.0f32; 64];
        mixer.render(0, &mut out);
        for (mixed, &single) in out.iter().zip(wave.iter()) {
            assert!((mixed - 2.0 * single).abs() < 1e-6);
        }
    }

    #[test]
    fn test_mixer_queue_bounded() {
        let mut mixer = ClickMixer::new(ClickSound::new(48000.0));
        for i in 0..ClickMixer::MAX_QUEUED {
            assert!(mixer.push(ClickEvent {
                click: ClickType::Regular,
                start_sample: i as u64 * 100_000,
            }));
        }
        // One past capacity is refused, not reallocated
        assert!(!mixer.push(ClickEvent {
            click: ClickType::Regular,
            start_sample: 0,
        }));
    }
}
