use thiserror::Error;

use crate::fx::{ParamId, Routing};

/// Changes sent from control threads to the audio callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Normalized [0, 1] knob value
    SetParam { param: ParamId, value: f32 },
    /// Host tempo, read at the next block
    SetBpm(f32),
    SetRouting(Routing),
    /// Clear the delay lines and return knobs to their defaults
    Reset,
}

impl Command {
    /// Human-readable description of the command
    pub fn description(&self) -> String {
        match self {
            Command::SetParam { param, value } => {
                format!("Set {} to {:.2}", param.name(), value)
            }
            Command::SetBpm(bpm) => format!("Set BPM to {}", bpm),
            Command::SetRouting(routing) => format!("Set routing to {}", routing.name()),
            Command::Reset => "Reset".to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseCommandError {
    #[error("empty line")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs a value")]
    MissingValue(String),
    #[error("invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },
}

/// One line typed on the live console
#[derive(Debug, Clone, PartialEq)]
pub enum ControlLine {
    Command(Command),
    Status,
    Quit,
}

impl ControlLine {
    /// Parse `time 0.5`, `bpm 128`, `routing stereo`, `reset`, `status`, `quit`
    pub fn parse(line: &str) -> Result<Self, ParseCommandError> {
        let mut words = line.split_whitespace();
        let key = words.next().ok_or(ParseCommandError::Empty)?;
        let arg = words.next();

        match key {
            "status" => Ok(ControlLine::Status),
            "quit" | "exit" | "q" => Ok(ControlLine::Quit),
            "reset" => Ok(ControlLine::Command(Command::Reset)),
            "bpm" => {
                let v = require(key, arg)?;
                let bpm = v.parse::<f32>().map_err(|_| invalid(key, v))?;
                Ok(ControlLine::Command(Command::SetBpm(bpm)))
            }
            "routing" => {
                let v = require(key, arg)?;
                let routing = Routing::from_key(v).ok_or_else(|| invalid(key, v))?;
                Ok(ControlLine::Command(Command::SetRouting(routing)))
            }
            _ => {
                let param = ParamId::from_key(key)
                    .ok_or_else(|| ParseCommandError::Unknown(key.to_string()))?;
                let v = require(key, arg)?;
                let parsed = v
                    .parse::<f32>()
                    .ok()
                    .filter(|x| (0.0..=1.0).contains(x))
                    .ok_or_else(|| invalid(key, v))?;
                Ok(ControlLine::Command(Command::SetParam {
                    param,
                    value: parsed,
                }))
            }
        }
    }
}

fn require<'a>(key: &str, arg: Option<&'a str>) -> Result<&'a str, ParseCommandError> {
    arg.ok_or_else(|| ParseCommandError::MissingValue(key.to_string()))
}

fn invalid(key: &str, value: &str) -> ParseCommandError {
    ParseCommandError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_knobs() {
        assert_eq!(
            ControlLine::parse("depth 0.4"),
            Ok(ControlLine::Command(Command::SetParam {
                param: ParamId::Depth,
                value: 0.4
            }))
        );
        assert_eq!(
            ControlLine::parse("  mix   1 "),
            Ok(ControlLine::Command(Command::SetParam {
                param: ParamId::Mix,
                value: 1.0
            }))
        );
    }

    #[test]
    fn parses_transport_lines() {
        assert_eq!(
            ControlLine::parse("bpm 98.5"),
            Ok(ControlLine::Command(Command::SetBpm(98.5)))
        );
        assert_eq!(
            ControlLine::parse("routing right-only"),
            Ok(ControlLine::Command(Command::SetRouting(Routing::RightOnly)))
        );
        assert_eq!(ControlLine::parse("reset"), Ok(ControlLine::Command(Command::Reset)));
        assert_eq!(ControlLine::parse("status"), Ok(ControlLine::Status));
        assert_eq!(ControlLine::parse("q"), Ok(ControlLine::Quit));
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!(ControlLine::parse("   "), Err(ParseCommandError::Empty));
        assert_eq!(
            ControlLine::parse("warp 1"),
            Err(ParseCommandError::Unknown("warp".into()))
        );
        assert_eq!(
            ControlLine::parse("time"),
            Err(ParseCommandError::MissingValue("time".into()))
        );
        assert!(matches!(
            ControlLine::parse("depth 1.5"),
            Err(ParseCommandError::InvalidValue { .. })
        ));
        assert!(matches!(
            ControlLine::parse("bpm fast"),
            Err(ParseCommandError::InvalidValue { .. })
        ));
    }
}
