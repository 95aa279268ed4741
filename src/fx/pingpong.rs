use serde::{Deserialize, Serialize};

use super::glide::Glide;
use super::params::{map_depth, map_mix, map_time, q31_to_unit, Mix, ParamId};
use super::ring::RingBuffer;
use crate::tempo::{TempoClock, MIN_BPM};

/// Shortest delay the glide may settle on, in samples. Keeps the read
/// position at least one slot behind the slot written in the same frame.
pub const MIN_DELAY_SAMPLES: f32 = 1.0;

// Slots kept free between the longest delay and the ring capacity
const GUARD_SAMPLES: usize = 2;

/// Which inputs are written into the delay network
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Routing {
    /// Both inputs enter their own line; repeats start on the source side
    #[default]
    Stereo,
    /// Only the right input enters the network; the left input stays dry
    RightOnly,
}

impl Routing {
    pub fn name(&self) -> &'static str {
        match self {
            Routing::Stereo => "stereo",
            Routing::RightOnly => "right-only",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "stereo" => Some(Routing::Stereo),
            "right-only" | "right" | "mono" => Some(Routing::RightOnly),
            _ => None,
        }
    }
}

/// Tempo-synced ping-pong delay operating on interleaved stereo blocks.
///
/// All state lives here: both delay lines, the shared write cursor, the
/// gliding delay length and the mapped knob values. Nothing allocates after
/// `new`.
pub struct PingPongDelay {
    left: RingBuffer,
    right: RingBuffer,
    write_pos: usize,
    clock: TempoClock,
    delay: Glide,
    max_delay: f32,
    time: f32,
    multiplier: f32,
    depth: f32,
    mix: Mix,
    routing: Routing,
}

impl PingPongDelay {
    pub fn new(sample_rate: f32) -> Self {
        // Room for a whole note at the fallback tempo, and for the 1 s default
        let longest = TempoClock::max_delay_samples(sample_rate).max(sample_rate);
        let capacity = longest.ceil() as usize + GUARD_SAMPLES + 1;
        let left = RingBuffer::new(capacity);
        let right = RingBuffer::new(capacity);
        let max_delay = (left.capacity() - GUARD_SAMPLES) as f32;

        Self {
            left,
            right,
            write_pos: 0,
            clock: TempoClock::new(sample_rate, MIN_BPM),
            delay: Glide::new(sample_rate),
            max_delay,
            time: 0.0,
            multiplier: 1.0,
            depth: 0.0,
            mix: Mix::HALF,
            routing: Routing::default(),
        }
    }

    /// Clear both lines and return every knob-driven value to its default.
    /// Routing is left as configured.
    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
        self.write_pos = 0;
        self.delay.snap(self.clock.sample_rate());
        self.time = 0.0;
        self.multiplier = 1.0;
        self.depth = 0.0;
        self.mix = Mix::HALF;
    }

    pub fn sample_rate(&self) -> f32 {
        self.clock.sample_rate()
    }

    pub fn capacity(&self) -> usize {
        self.left.capacity()
    }

    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    pub fn bpm(&self) -> f32 {
        self.clock.bpm()
    }

    pub fn current_delay(&self) -> f32 {
        self.delay.current()
    }

    pub fn target_delay(&self) -> f32 {
        self.delay.target()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn mix(&self) -> Mix {
        self.mix
    }

    pub fn routing(&self) -> Routing {
        self.routing
    }

    pub fn set_routing(&mut self, routing: Routing) {
        self.routing = routing;
    }

    /// Apply a normalized [0, 1] knob value
    pub fn set_param(&mut self, param: ParamId, value: f32) {
        match param {
            ParamId::Time => {
                self.time = value;
                self.multiplier = map_time(value);
            }
            ParamId::Depth => self.depth = map_depth(value),
            ParamId::Mix => self.mix = map_mix(value),
        }
    }

    /// Apply a knob value delivered as Q31 fixed point
    pub fn set_param_q31(&mut self, param: ParamId, value: i32) {
        self.set_param(param, q31_to_unit(value));
    }

    /// Jump the delay length straight to `samples` with no glide.
    /// The next `process_block` retargets it from the tempo again.
    pub fn set_delay_samples(&mut self, samples: f32) {
        let samples = self.clamp_delay(samples);
        self.delay.snap(samples);
    }

    /// Take a host tempo reading and retarget the glide
    pub fn update_tempo(&mut self, bpm: f32) {
        self.clock.set_bpm(bpm);
        let target = self.clamp_delay(self.clock.target_samples(self.multiplier));
        self.delay.set_target(target);
    }

    fn clamp_delay(&self, samples: f32) -> f32 {
        if samples.is_nan() {
            return self.max_delay;
        }
        samples.clamp(MIN_DELAY_SAMPLES, self.max_delay)
    }

    /// Process one host block of interleaved L/R frames in place.
    ///
    /// The tempo is read once for the whole block. A trailing odd sample is
    /// left untouched.
    pub fn process_block(&mut self, frames: &mut [f32], bpm: f32) {
        self.update_tempo(bpm);
        for frame in frames.chunks_exact_mut(2) {
            let (l, r) = self.process_frame(frame[0], frame[1]);
            frame[0] = l;
            frame[1] = r;
        }
    }

    /// Advance the glide and locate the read point `delay` samples behind the
    /// cursor as a slot index plus an interpolation weight towards the next
    /// slot. The delay is split before subtracting so the weight keeps full
    /// precision wherever the cursor sits in the ring.
    #[inline]
    fn read_point(&mut self) -> (usize, f32) {
        let delay = self.delay.step();
        let whole = delay.floor();
        let frac = delay - whole;
        // Delay stays below capacity - 1, so one added capacity is enough
        let (back, weight) = if frac > 0.0 {
            (whole as usize + 1, (1.0 - frac) as f32)
        } else {
            (whole as usize, 0.0)
        };
        let index = (self.write_pos + self.left.capacity() - back) & self.left.mask();
        (index, weight)
    }

    /// Run one stereo frame through the delay network.
    ///
    /// The order of the reads and writes below defines the ping-pong
    /// topology: the right line is read before anything is written at the
    /// cursor, and the left line is read after its slot at the cursor has
    /// been written.
    #[inline]
    pub fn process_frame(&mut self, in_l: f32, in_r: f32) -> (f32, f32) {
        let (read_index, frac) = self.read_point();

        let w = self.write_pos;
        let (feed_l, feed_r) = match self.routing {
            Routing::Stereo => (in_l, in_r),
            Routing::RightOnly => (0.0, in_r),
        };

        let delayed_r = self.right.read_frac(read_index, frac);
        self.right.write(w, feed_r);
        self.left.write(w, feed_l + delayed_r * self.depth);

        let delayed_l = self.left.read_frac(read_index, frac);
        self.right.accumulate(w, delayed_l * self.depth);

        self.write_pos = (w + 1) & self.left.mask();

        let out_l = in_l * self.mix.dry + delayed_l * self.mix.wet;
        let out_r = in_r * self.mix.dry + delayed_r * self.mix.wet;
        (out_l, out_r)
    }
}
