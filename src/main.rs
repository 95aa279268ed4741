use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use pingpong::audio::LiveEngine;
use pingpong::command::{CommandBus, ControlLine};
use pingpong::render::{self, RenderOptions, DEFAULT_TAIL_SECONDS};
use pingpong::tempo::{TempoClock, DIVISIONS};
use pingpong::{Routing, Settings};

/// Pingpong - tempo-synced ping-pong delay
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Render a WAV file through the delay
    Render {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        knobs: KnobArgs,
        /// Ramp the tempo linearly to this BPM over the input
        #[arg(long)]
        bpm_end: Option<f32>,
        /// Seconds of silence appended for the repeats to decay
        #[arg(long, default_value_t = DEFAULT_TAIL_SECONDS)]
        tail: f32,
    },
    /// Loop a WAV file through the delay on the default output device.
    /// Knobs can be changed on stdin, e.g. `depth 0.6`, `bpm 100`, `status`, `quit`.
    Play {
        input: PathBuf,
        #[command(flatten)]
        knobs: KnobArgs,
    },
    /// List the delay time divisions and their lengths at a tempo
    Divisions {
        #[arg(long, default_value_t = 120.0)]
        bpm: f32,
        #[arg(long, default_value_t = 48000.0)]
        sample_rate: f32,
    },
    /// Write a settings file with default values
    InitConfig { path: PathBuf },
}

/// Settings file plus per-knob overrides
#[derive(Args, Debug)]
struct KnobArgs {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    bpm: Option<f32>,
    /// Time knob, 0..1 (selects the note division)
    #[arg(long)]
    time: Option<f32>,
    /// Feedback depth knob, 0..1
    #[arg(long)]
    depth: Option<f32>,
    /// Wet/dry knob, 0..1 (0.49-0.51 is 50/50)
    #[arg(long)]
    mix: Option<f32>,
    /// stereo | right-only
    #[arg(long, value_parser = parse_routing)]
    routing: Option<Routing>,
}

impl KnobArgs {
    fn resolve(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(bpm) = self.bpm {
            settings.bpm = bpm;
        }
        if let Some(time) = self.time {
            settings.time = time;
        }
        if let Some(depth) = self.depth {
            settings.depth = depth;
        }
        if let Some(mix) = self.mix {
            settings.mix = mix;
        }
        if let Some(routing) = self.routing {
            settings.routing = routing;
        }
        Ok(settings.sanitized())
    }
}

fn parse_routing(s: &str) -> Result<Routing, String> {
    Routing::from_key(s).ok_or_else(|| format!("unknown routing '{}'", s))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Mode::Render {
            input,
            output,
            knobs,
            bpm_end,
            tail,
        } => {
            let options = RenderOptions {
                settings: knobs.resolve()?,
                bpm_end,
                tail_secs: tail,
            };
            let result = render::render_file(&input, &output, &options)?;
            println!(
                "Wrote {} ({} frames, {:.2}s at {} Hz)",
                output.display(),
                result.frames,
                result.duration_secs,
                result.sample_rate
            );
            Ok(())
        }
        Mode::Play { input, knobs } => play(&input, knobs.resolve()?),
        Mode::Divisions { bpm, sample_rate } => {
            let clock = TempoClock::new(sample_rate, bpm);
            println!("{:>5}  {:>10}  {:>9}", "div", "samples", "ms");
            for division in DIVISIONS.iter() {
                let samples = clock.target_samples(division.multiplier());
                println!(
                    "{:>5}  {:>10.1}  {:>9.2}",
                    division.name(),
                    samples,
                    samples / sample_rate * 1000.0
                );
            }
            Ok(())
        }
        Mode::InitConfig { path } => {
            Settings::default().save(&path)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

/// Run the live engine and feed console lines into the command bus
fn play(input: &Path, settings: Settings) -> Result<()> {
    let clip = render::load_wav(input)?;
    let bus = CommandBus::new();
    let engine = LiveEngine::new(clip, &settings, bus.receiver())?;
    let sender = bus.sender();

    println!("Playing {} - type `status` or `quit`", input.display());
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match ControlLine::parse(&line) {
            Ok(ControlLine::Command(cmd)) => {
                log::info!("{}", cmd.description());
                sender.send(cmd);
            }
            Ok(ControlLine::Status) => {
                let state = engine.state.read().clone();
                println!("{}", state.status_line(engine.sample_rate));
            }
            Ok(ControlLine::Quit) => break,
            Err(e) => eprintln!("{}", e),
        }
    }
    Ok(())
}
