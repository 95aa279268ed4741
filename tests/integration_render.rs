//! Offline render path: WAV in, blocks through the delay, WAV out.

use std::path::PathBuf;

use pingpong::render::{self, RenderOptions};
use pingpong::{Routing, Settings};

const SAMPLE_RATE: u32 = 8000;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pingpong-{}-{}.wav", name, std::process::id()))
}

/// Write a 16-bit WAV holding `frames` frames with one full-scale sample at frame 0
fn write_impulse(path: &PathBuf, channels: u16, frames: usize) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames * channels as usize {
        writer.write_sample(if i == 0 { i16::MAX } else { 0 }).unwrap();
    }
    writer.finalize().unwrap();
}

fn read_samples(path: &PathBuf) -> (hound::WavSpec, Vec<i16>) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    (spec, samples)
}

fn options(mix: f32, tail_secs: f32) -> RenderOptions {
    RenderOptions {
        settings: Settings {
            bpm: 120.0,
            time: 0.0,
            depth: 0.5,
            mix,
            routing: Routing::Stereo,
            ..Settings::default()
        },
        bpm_end: None,
        tail_secs,
    }
}

#[test]
fn dry_render_copies_input_and_pads_tail() {
    let input = temp_path("dry-in");
    let output = temp_path("dry-out");
    write_impulse(&input, 2, 400);

    let result = render::render_file(&input, &output, &options(0.0, 0.5)).unwrap();
    assert_eq!(result.frames, 400 + 4000);
    assert_eq!(result.sample_rate, SAMPLE_RATE);

    let (spec, samples) = read_samples(&output);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(samples.len(), 2 * (400 + 4000));
    assert!(samples[0] >= i16::MAX - 1);
    assert!(samples[1..].iter().all(|&s| s == 0));

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn wet_render_moves_energy_later() {
    let input = temp_path("wet-in");
    let output = temp_path("wet-out");
    write_impulse(&input, 1, 64);

    render::render_file(&input, &output, &options(1.0, 2.0)).unwrap();
    let (_, samples) = read_samples(&output);

    // Fully wet: the impulse itself is gone
    assert_eq!(samples[0], 0);
    assert_eq!(samples[1], 0);
    // Its repeats arrive once the glide has pulled the delay in
    assert!(samples.iter().any(|&s| s != 0));

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn mono_input_feeds_both_channels() {
    let input = temp_path("mono-in");
    write_impulse(&input, 1, 10);
    let clip = render::load_wav(&input).unwrap();
    assert_eq!(clip.frames(), 10);
    assert_eq!(clip.samples[0], clip.samples[1]);
    assert!(clip.samples[0] > 0.99);
    let _ = std::fs::remove_file(&input);
}

#[test]
fn missing_input_is_an_error() {
    let err = render::load_wav(&temp_path("does-not-exist")).unwrap_err();
    assert!(err.to_string().contains("Failed to open WAV"));
}
