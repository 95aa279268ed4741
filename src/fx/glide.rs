/// Samples-per-e-fold of the delay time glide. Larger = slower.
pub const GLIDE_RATE: f32 = 12000.0;

const _: () = assert!(GLIDE_RATE >= 1.0, "glide rate below 1 overshoots");

/// One-pole smoother moving the current delay length towards its target.
///
/// State is f64; near long targets the per-sample step is below f32 resolution.
#[derive(Debug, Clone, Copy)]
pub struct Glide {
    current: f64,
    target: f64,
}

impl Glide {
    pub fn new(value: f32) -> Self {
        Self {
            current: value as f64,
            target: value as f64,
        }
    }

    pub fn current(&self) -> f32 {
        self.current as f32
    }

    pub fn target(&self) -> f32 {
        self.target as f32
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target as f64;
    }

    /// Jump straight to `value` with no transition
    pub fn snap(&mut self, value: f32) {
        self.current = value as f64;
        self.target = value as f64;
    }

    /// Advance one sample and return the new current value at full precision
    #[inline]
    pub fn step(&mut self) -> f64 {
        self.current += (self.target - self.current) / GLIDE_RATE as f64;
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_steady_at_target() {
        let mut glide = Glide::new(480.0);
        for _ in 0..1000 {
            assert_eq!(glide.step(), 480.0);
        }
    }

    #[test]
    fn approaches_from_below_without_overshoot() {
        let mut glide = Glide::new(1000.0);
        glide.set_target(96000.0);
        let mut prev = glide.step();
        for _ in 0..(GLIDE_RATE as usize * 20) {
            let v = glide.step();
            assert!(v >= prev);
            assert!(v <= 96000.0);
            prev = v;
        }
        assert!((glide.current() - 96000.0).abs() < 1e-2);
    }

    #[test]
    fn approaches_from_above_without_overshoot() {
        let mut glide = Glide::new(96000.0);
        glide.set_target(750.0);
        let mut prev = glide.step();
        for _ in 0..(GLIDE_RATE as usize * 20) {
            let v = glide.step();
            assert!(v <= prev);
            assert!(v >= 750.0);
            prev = v;
        }
        assert!((glide.current() - 750.0).abs() < 1e-2);
    }

    #[test]
    fn long_targets_are_reached() {
        // Whole note at 120 BPM, then at the 56 BPM floor, 48 kHz
        for target in [96000.0, 205714.28] {
            let mut glide = Glide::new(48000.0);
            glide.set_target(target);
            for _ in 0..(GLIDE_RATE as usize * 60) {
                glide.step();
            }
            let gap = (glide.current() - target).abs();
            assert!(gap < 1e-2, "stopped {} samples short of {}", gap, target);
        }
    }

    #[test]
    fn one_time_constant_covers_most_of_the_gap() {
        let mut glide = Glide::new(0.0);
        glide.set_target(1.0);
        for _ in 0..GLIDE_RATE as usize {
            glide.step();
        }
        // (1 - 1/R)^R ~= 1/e
        assert!((glide.current() - (1.0 - (-1.0f32).exp())).abs() < 0.01);
    }

    #[test]
    fn snap_skips_transition() {
        let mut glide = Glide::new(10.0);
        glide.snap(64.0);
        assert_eq!(glide.current(), 64.0);
        assert_eq!(glide.step(), 64.0);
    }
}
