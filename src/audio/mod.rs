pub mod engine;

pub use engine::{EngineState, LiveEngine};
