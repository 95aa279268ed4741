//! Tempo-synced ping-pong delay.
//!
//! The DSP core lives in [`fx`] and [`tempo`]; [`render`] and [`audio`] are
//! offline and live hosts that drive it block by block.

pub mod audio;
pub mod command;
pub mod config;
pub mod fx;
pub mod render;
pub mod tempo;

pub use config::Settings;
pub use fx::{Mix, ParamId, PingPongDelay, Routing};
