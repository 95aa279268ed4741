pub mod glide;
pub mod params;
pub mod pingpong;
pub mod ring;

pub use glide::{Glide, GLIDE_RATE};
pub use params::{map_depth, map_mix, map_time, q31_to_unit, Mix, ParamId};
pub use pingpong::{PingPongDelay, Routing, MIN_DELAY_SAMPLES};
pub use ring::RingBuffer;

use crate::tempo::Division;

/// Effect state published from the audio thread for status display
#[derive(Clone, Copy, Debug)]
pub struct EffectSnapshot {
    pub bpm: f32,
    pub division: Division,
    pub current_delay: f32,
    pub target_delay: f32,
    pub depth: f32,
    pub wet: f32,
    pub routing: Routing,
}

impl EffectSnapshot {
    pub fn capture(fx: &PingPongDelay) -> Self {
        Self {
            bpm: fx.bpm(),
            division: Division::from_knob(fx.time()),
            current_delay: fx.current_delay(),
            target_delay: fx.target_delay(),
            depth: fx.depth(),
            wet: fx.mix().wet,
            routing: fx.routing(),
        }
    }

    /// Delay length in milliseconds at `sample_rate`
    pub fn delay_ms(&self, sample_rate: f32) -> f32 {
        self.current_delay / sample_rate * 1000.0
    }
}

impl Default for EffectSnapshot {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            division: Division::from_knob(0.0),
            current_delay: 0.0,
            target_delay: 0.0,
            depth: 0.0,
            wet: Mix::HALF.wet,
            routing: Routing::default(),
        }
    }
}
