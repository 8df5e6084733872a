// Audio engine - real-time CPAL callback
//
// The callback drains click events from the ring buffer and mixes each click
// into the output starting at its exact target sample. All processing happens
// in f32; conversion to the device format goes through CPAL's `FromSample`
// at write time. F32, I16 and U16 devices are supported; anything else is a
// typed error and the app keeps running without sound.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};

use crate::audio::click::{ClickMixer, ClickSound};
use crate::audio::clock::AudioClock;
use crate::audio::parameters::AtomicF32;
use crate::messaging::channels::ClickConsumer;

/// Mono scratch size; device buffers larger than this are mixed in chunks
const SCRATCH_FRAMES: usize = 8192;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no audio output device available")]
    NoDevice,

    #[error("failed to query the output configuration: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build the output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start the output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported sample format: {0:?} (supported: F32, I16, U16)")]
    UnsupportedFormat(SampleFormat),
}

pub struct AudioEngine {
    _device: Device,
    _stream: Stream,
    clock: AudioClock,
    pub volume: AtomicF32,
}

impl AudioEngine {
    pub fn new(click_rx: ClickConsumer) -> Result<Self, EngineError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(EngineError::NoDevice)?;

        tracing::info!(
            device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
            "audio output device"
        );

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let sample_rate = supported_config.sample_rate().0 as f32;
        let channels = supported_config.channels() as usize;
        let config: StreamConfig = supported_config.into();

        tracing::debug!(sample_rate, channels, ?sample_format, "stream configuration");

        let clock = AudioClock::new(sample_rate as f64);
        let volume = AtomicF32::new(0.8);
        let mixer = ClickMixer::new(ClickSound::new(sample_rate));

        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &config,
                channels,
                click_rx,
                mixer,
                clock.clone(),
                volume.clone(),
            ),
            SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &config,
                channels,
                click_rx,
                mixer,
                clock.clone(),
                volume.clone(),
            ),
            SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &config,
                channels,
                click_rx,
                mixer,
                clock.clone(),
                volume.clone(),
            ),
            other => return Err(EngineError::UnsupportedFormat(other)),
        }?;

        stream.play()?;

        Ok(Self {
            _device: device,
            _stream: stream,
            clock,
            volume,
        })
    }

    /// Stream clock handle for the scheduling side
    pub fn clock(&self) -> AudioClock {
        self.clock.clone()
    }

    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        channels: usize,
        mut click_rx: ClickConsumer,
        mut mixer: ClickMixer,
        clock: AudioClock,
        volume: AtomicF32,
    ) -> Result<Stream, EngineError>
    where
        T: SizedSample + FromSample<f32>,
    {
        // Pre-allocated mono scratch; the callback itself never allocates
        let mut scratch = vec![0.0f32; SCRATCH_FRAMES];

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // No allocations, no I/O, no blocking locks here
                while let Some(event) = ringbuf::traits::Consumer::try_pop(&mut click_rx) {
                    mixer.push(event);
                }

                let base = clock.current_sample();
                let gain = volume.get();

                let mut rendered = 0usize;
                for out_chunk in data.chunks_mut(channels * SCRATCH_FRAMES) {
                    let frames = out_chunk.len() / channels;
                    let mono = &mut scratch[..frames];
                    mono.fill(0.0);
                    mixer.render(base + rendered as u64, mono);

                    for (frame, &sample) in out_chunk.chunks_mut(channels).zip(mono.iter()) {
                        let value = T::from_sample(sample * gain);
                        for slot in frame.iter_mut() {
                            *slot = value;
                        }
                    }
                    rendered += frames;
                }

                clock.advance(rendered);
            },
            move |err| {
                tracing::error!("audio stream error: {err}");
            },
            None,
        )?;

        Ok(stream)
    }
}
