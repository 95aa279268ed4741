use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::Settings;
use crate::fx::PingPongDelay;

/// Frames per host callback on the hardware this effect targets
pub const BLOCK_FRAMES: usize = 16;

pub const DEFAULT_TAIL_SECONDS: f32 = 2.0;

/// Interleaved stereo audio at a fixed sample rate
#[derive(Clone, Debug)]
pub struct StereoClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl StereoClip {
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    pub fn duration_secs(&self) -> f32 {
        self.frames() as f32 / self.sample_rate as f32
    }
}

/// What to render
#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub settings: Settings,
    /// Tempo reached at the end of the input; the ramp is linear
    pub bpm_end: Option<f32>,
    /// Silence appended so the repeats can die away
    pub tail_secs: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            bpm_end: None,
            tail_secs: DEFAULT_TAIL_SECONDS,
        }
    }
}

/// Result of a render operation
pub struct RenderResult {
    pub frames: usize,
    pub duration_secs: f32,
    pub sample_rate: u32,
}

/// Offline host that mirrors the real-time block callback
struct OfflineRenderer {
    fx: PingPongDelay,
    bpm_start: f32,
    bpm_end: f32,
}

impl OfflineRenderer {
    fn new(sample_rate: u32, options: &RenderOptions) -> Self {
        let mut fx = PingPongDelay::new(sample_rate as f32);
        options.settings.apply(&mut fx);
        let bpm_start = options.settings.bpm;
        Self {
            fx,
            bpm_start,
            bpm_end: options.bpm_end.unwrap_or(bpm_start),
        }
    }

    /// Host tempo at `frame`, ramped across the content and held in the tail
    fn tempo_at(&self, frame: usize, content_frames: usize) -> f32 {
        if content_frames == 0 || frame >= content_frames {
            return self.bpm_end;
        }
        let t = frame as f32 / content_frames as f32;
        self.bpm_start + (self.bpm_end - self.bpm_start) * t
    }

    fn render(&mut self, input: &[f32], tail_frames: usize) -> Vec<f32> {
        let content_frames = input.len() / 2;
        let total_frames = content_frames + tail_frames;

        let mut output = Vec::with_capacity(total_frames * 2);
        output.extend_from_slice(&input[..content_frames * 2]);
        output.resize(total_frames * 2, 0.0);

        for (i, block) in output.chunks_mut(BLOCK_FRAMES * 2).enumerate() {
            let bpm = self.tempo_at(i * BLOCK_FRAMES, content_frames);
            self.fx.process_block(block, bpm);
        }

        output
    }
}

/// Run a clip through a fresh effect and return the processed clip, tail included
pub fn render_clip(clip: &StereoClip, options: &RenderOptions) -> StereoClip {
    let tail_frames = (clip.sample_rate as f32 * options.tail_secs.max(0.0)) as usize;
    let mut renderer = OfflineRenderer::new(clip.sample_rate, options);
    StereoClip {
        samples: renderer.render(&clip.samples, tail_frames),
        sample_rate: clip.sample_rate,
    }
}

/// Load a WAV file as interleaved stereo. Mono files feed both channels;
/// channels past the second are ignored.
pub fn load_wav(path: &Path) -> Result<StereoClip> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV: {}", path.display()))?;

    let spec = reader.spec();
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1u32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_val))
                .collect::<Result<Vec<f32>, _>>()
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<f32>, _>>(),
    }
    .with_context(|| format!("Failed to decode WAV: {}", path.display()))?;

    if samples.is_empty() {
        bail!("WAV file is empty: {}", path.display());
    }

    let stereo: Vec<f32> = match channels {
        1 => samples.iter().flat_map(|&s| [s, s]).collect(),
        2 => samples,
        _ => samples
            .chunks_exact(channels)
            .flat_map(|frame| [frame[0], frame[1]])
            .collect(),
    };

    Ok(StereoClip {
        samples: stereo,
        sample_rate: spec.sample_rate,
    })
}

/// Write an interleaved stereo clip as 16-bit PCM
pub fn write_wav(path: &Path, clip: &StereoClip) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;

    for &sample in &clip.samples {
        let s = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer.write_sample(s)?;
    }

    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file: {}", path.display()))?;
    Ok(())
}

/// Render a WAV file through the delay into another WAV file
pub fn render_file(input: &Path, output: &Path, options: &RenderOptions) -> Result<RenderResult> {
    let clip = load_wav(input)?;
    log::info!(
        "Rendering {} ({} frames, {} Hz) at {} BPM",
        input.display(),
        clip.frames(),
        clip.sample_rate,
        options.settings.bpm
    );

    let rendered = render_clip(&clip, options);
    write_wav(output, &rendered)?;

    Ok(RenderResult {
        frames: rendered.frames(),
        duration_secs: rendered.duration_secs(),
        sample_rate: rendered.sample_rate,
    })
}
