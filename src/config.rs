use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fx::{ParamId, PingPongDelay, Routing};

const SETTINGS_VERSION: u32 = 1;

/// Knob positions, host tempo and routing for a render or live session.
/// Knob values are normalized to [0, 1] exactly as the parameter hook takes them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub version: u32,
    pub bpm: f32,
    pub time: f32,
    pub depth: f32,
    pub mix: f32,
    pub routing: Routing,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            bpm: 120.0,
            time: 0.7,
            depth: 0.4,
            mix: 0.5,
            routing: Routing::Stereo,
        }
    }
}

impl Settings {
    /// Push every knob value and the routing into a freshly reset effect
    pub fn apply(&self, fx: &mut PingPongDelay) {
        fx.set_param(ParamId::Time, self.time);
        fx.set_param(ParamId::Depth, self.depth);
        fx.set_param(ParamId::Mix, self.mix);
        fx.set_routing(self.routing);
    }

    /// Clamp knob values into [0, 1] and replace a non-positive or
    /// non-finite tempo with the default
    pub fn sanitized(mut self) -> Self {
        if !(self.bpm > 0.0 && self.bpm.is_finite()) {
            self.bpm = Settings::default().bpm;
        }
        self.time = self.time.clamp(0.0, 1.0);
        self.depth = self.depth.clamp(0.0, 1.0);
        self.mix = self.mix.clamp(0.0, 1.0);
        self
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Load settings from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        // Peek at version before committing to the layout
        let raw: Value = serde_json::from_str(json)?;
        let version = raw
            .get("version")
            .and_then(|v| v.as_u64())
            .unwrap_or(SETTINGS_VERSION as u64) as u32;

        if version > SETTINGS_VERSION {
            bail!(
                "Settings version {} is newer than supported version {}",
                version,
                SETTINGS_VERSION
            );
        }

        let settings: Settings = serde_json::from_value(raw)?;
        Ok(settings.sanitized())
    }
}
