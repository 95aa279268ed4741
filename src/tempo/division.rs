pub const NUM_DIVISIONS: usize = 15;

/// Note divisions selectable with the time knob, shortest first.
/// Each value is a fraction of a whole note.
pub const DIVISIONS: [Division; NUM_DIVISIONS] = [
    Division::new(1, 64),
    Division::new(1, 48),
    Division::new(1, 32),
    Division::new(1, 24),
    Division::new(1, 16),
    Division::new(1, 12),
    Division::new(1, 8),
    Division::new(1, 6),
    Division::new(3, 16),
    Division::new(1, 4),
    Division::new(1, 3),
    Division::new(3, 8),
    Division::new(1, 2),
    Division::new(3, 4),
    Division::new(1, 1),
];

/// A musical fraction of a whole note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Division {
    pub numerator: u8,
    pub denominator: u8,
}

impl Division {
    pub const fn new(numerator: u8, denominator: u8) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn multiplier(&self) -> f32 {
        self.numerator as f32 / self.denominator as f32
    }

    pub fn name(&self) -> String {
        format!("{}/{}", self.numerator, self.denominator)
    }

    /// Table index selected by a normalized knob value (truncating, not rounding)
    pub fn index_for(value: f32) -> usize {
        let scaled = value * (NUM_DIVISIONS - 1) as f32;
        let index = scaled as isize;
        if index < 0 || index >= NUM_DIVISIONS as isize {
            NUM_DIVISIONS - 1
        } else {
            index as usize
        }
    }

    pub fn from_knob(value: f32) -> Self {
        DIVISIONS[Self::index_for(value)]
    }
}
