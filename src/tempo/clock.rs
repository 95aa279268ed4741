/// Fallback tempo when the host reports a non-positive BPM
pub const MIN_BPM: f32 = 56.0;

/// Quarter-note beats in the whole note the division table is relative to
pub const NOTES_PER_BEAT: f32 = 4.0;

/// Converts host tempo and a division multiplier into a delay length in samples
#[derive(Debug, Clone, Copy)]
pub struct TempoClock {
    sample_rate: f32,
    bpm: f32,
    samples_per_beat: f32,
}

impl TempoClock {
    pub fn new(sample_rate: f32, bpm: f32) -> Self {
        let mut clock = Self {
            sample_rate,
            bpm: MIN_BPM,
            samples_per_beat: 0.0,
        };
        clock.set_bpm(bpm);
        clock
    }

    fn recalculate_timing(&mut self) {
        // samples_per_beat = sample_rate * 60 / bpm
        self.samples_per_beat = self.sample_rate * (60.0 / self.bpm);
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Accept a host tempo reading. Zero, negative and NaN readings fall
    /// back to `MIN_BPM` so the division below stays finite.
    pub fn set_bpm(&mut self, bpm: f32) {
        self.bpm = if bpm > 0.0 && bpm.is_finite() {
            bpm
        } else {
            MIN_BPM
        };
        self.recalculate_timing();
    }

    /// Delay length for `multiplier` of a whole note at the current tempo
    pub fn target_samples(&self, multiplier: f32) -> f32 {
        self.samples_per_beat * NOTES_PER_BEAT * multiplier
    }

    /// Longest delay any table entry can request at any accepted tempo
    pub fn max_delay_samples(sample_rate: f32) -> f32 {
        sample_rate * (60.0 / MIN_BPM) * NOTES_PER_BEAT
    }
}
