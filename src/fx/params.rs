use crate::tempo::Division;

/// Knob identifiers accepted by the parameter hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamId {
    /// Delay time, as a note division of the host tempo
    Time,
    /// Cross-channel feedback depth
    Depth,
    /// Wet/dry balance (the shifted depth knob on hardware)
    Mix,
}

impl ParamId {
    pub fn name(&self) -> &'static str {
        match self {
            ParamId::Time => "Time",
            ParamId::Depth => "Depth",
            ParamId::Mix => "Mix",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ParamId::Time => "time",
            ParamId::Depth => "depth",
            ParamId::Mix => "mix",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "time" => Some(ParamId::Time),
            "depth" | "feedback" => Some(ParamId::Depth),
            "mix" => Some(ParamId::Mix),
            _ => None,
        }
    }

    pub fn all() -> [ParamId; 3] {
        [ParamId::Time, ParamId::Depth, ParamId::Mix]
    }
}

/// Wet and dry gains, always summing to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mix {
    pub wet: f32,
    pub dry: f32,
}

impl Mix {
    pub const HALF: Mix = Mix { wet: 0.5, dry: 0.5 };

    pub fn from_wet(wet: f32) -> Self {
        Self {
            wet,
            dry: 1.0 - wet,
        }
    }
}

impl Default for Mix {
    fn default() -> Self {
        Mix::HALF
    }
}

const MIX_DEAD_LOW: f32 = 0.49;
const MIX_DEAD_HIGH: f32 = 0.51;

/// Convert a Q31 fixed-point knob reading to a float in [0, 1]
pub fn q31_to_unit(value: i32) -> f32 {
    (value as f32 / 2_147_483_648.0).clamp(0.0, 1.0)
}

/// Normalized time knob to a whole-note multiplier
pub fn map_time(value: f32) -> f32 {
    Division::from_knob(value).multiplier()
}

/// Normalized depth knob to feedback gain
pub fn map_depth(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Normalized mix knob to wet/dry gains.
///
/// Each half of the knob travel spans half of the mix range, with a small
/// dead zone around the centre that parks the mix at exactly 50/50.
pub fn map_mix(value: f32) -> Mix {
    let value = value.clamp(0.0, 1.0);
    let wet = if value <= MIX_DEAD_LOW {
        value / MIX_DEAD_LOW * 0.5
    } else if value >= MIX_DEAD_HIGH {
        0.5 + (value - MIX_DEAD_HIGH) / (1.0 - MIX_DEAD_HIGH) * 0.5
    } else {
        0.5
    };
    Mix::from_wet(wet)
}
