pub mod bus;
pub mod types;

pub use bus::{CommandBus, CommandReceiver, CommandSender};
pub use types::{Command, ControlLine, ParseCommandError};

use crate::fx::PingPongDelay;

/// Apply a command to the effect. Called between blocks only.
pub fn apply(fx: &mut PingPongDelay, bpm: &mut f32, cmd: Command) {
    match cmd {
        Command::SetParam { param, value } => fx.set_param(param, value),
        Command::SetBpm(value) => *bpm = value,
        Command::SetRouting(routing) => fx.set_routing(routing),
        Command::Reset => fx.reset(),
    }
}
