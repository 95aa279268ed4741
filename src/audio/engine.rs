use std::sync::Arc;

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use parking_lot::RwLock;

use crate::command::{self, CommandReceiver};
use crate::config::Settings;
use crate::fx::{EffectSnapshot, PingPongDelay};
use crate::render::StereoClip;

/// Largest block handed to the effect in one call; bigger device buffers
/// are split into several blocks
const MAX_BLOCK_FRAMES: usize = 4096;

/// Shared state between the audio thread and the console
#[derive(Clone, Debug, Default)]
pub struct EngineState {
    pub effect: EffectSnapshot,
    pub frames_played: u64,
}

impl EngineState {
    /// One-line summary for the console
    pub fn status_line(&self, sample_rate: u32) -> String {
        let fx = &self.effect;
        let sr = sample_rate as f32;
        format!(
            "{:.1}s  {} BPM  {}  delay {:.1} ms (target {:.1})  depth {:.2}  wet {:.2}  {}",
            self.frames_played as f64 / sample_rate as f64,
            fx.bpm,
            fx.division.name(),
            fx.delay_ms(sr),
            fx.target_delay / sr * 1000.0,
            fx.depth,
            fx.wet,
            fx.routing.name()
        )
    }
}

/// Live host: loops a clip through the delay on the default output device
pub struct LiveEngine {
    _stream: Stream,
    pub state: Arc<RwLock<EngineState>>,
    pub sample_rate: u32,
}

impl LiveEngine {
    /// Open the default output device and start playing
    pub fn new(
        source: StereoClip,
        settings: &Settings,
        command_rx: CommandReceiver,
    ) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("No output device available")?;

        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate().0;
        log::info!(
            "Output device: {} ({} Hz, {} ch, {:?})",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            sample_rate,
            config.channels(),
            config.sample_format()
        );
        if source.sample_rate != sample_rate {
            log::warn!(
                "Source is {} Hz but the device runs at {} Hz; playback pitch will shift",
                source.sample_rate,
                sample_rate
            );
        }

        let state = Arc::new(RwLock::new(EngineState::default()));

        let stream = match config.sample_format() {
            SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &config.into(),
                source,
                settings,
                command_rx,
                state.clone(),
            )?,
            SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &config.into(),
                source,
                settings,
                command_rx,
                state.clone(),
            )?,
            SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &config.into(),
                source,
                settings,
                command_rx,
                state.clone(),
            )?,
            format => anyhow::bail!("Unsupported sample format: {:?}", format),
        };

        stream.play()?;

        Ok(Self {
            _stream: stream,
            state,
            sample_rate,
        })
    }

    /// Build the audio stream for a specific sample format
    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        source: StereoClip,
        settings: &Settings,
        command_rx: CommandReceiver,
        state: Arc<RwLock<EngineState>>,
    ) -> Result<Stream>
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;

        let mut fx = PingPongDelay::new(sample_rate);
        settings.apply(&mut fx);
        let mut bpm = settings.bpm;

        let source_frames = source.frames();
        let samples = source.samples;
        let mut position = 0usize;

        // Preallocated so the callback never allocates
        let mut scratch = vec![0.0f32; MAX_BLOCK_FRAMES * 2];

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // Parameter changes land between blocks only
                while let Some(cmd) = command_rx.try_recv() {
                    command::apply(&mut fx, &mut bpm, cmd);
                }

                let mut frames_written = 0u64;
                for chunk in data.chunks_mut(channels * MAX_BLOCK_FRAMES) {
                    let frames = chunk.len() / channels;
                    let block = &mut scratch[..frames * 2];

                    for frame in block.chunks_exact_mut(2) {
                        if source_frames == 0 {
                            frame.fill(0.0);
                            continue;
                        }
                        frame[0] = samples[position * 2];
                        frame[1] = samples[position * 2 + 1];
                        position = (position + 1) % source_frames;
                    }

                    fx.process_block(block, bpm);

                    for (out, lr) in chunk.chunks_mut(channels).zip(block.chunks_exact(2)) {
                        for (ch, channel_sample) in out.iter_mut().enumerate() {
                            let sample = match (channels, ch) {
                                (1, _) => (lr[0] + lr[1]) * 0.5,
                                (_, 0) => lr[0],
                                (_, 1) => lr[1],
                                _ => 0.0,
                            };
                            *channel_sample = T::from_sample(sample.clamp(-1.0, 1.0));
                        }
                    }
                    frames_written += frames as u64;
                }

                // Never block the audio thread on the console
                if let Some(mut state) = state.try_write() {
                    state.effect = EffectSnapshot::capture(&fx);
                    state.frames_played += frames_written;
                }
            },
            |err| {
                log::error!("Audio stream error: {}", err);
            },
            None,
        )?;

        Ok(stream)
    }
}
