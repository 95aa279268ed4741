use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use super::types::Command;

const BUS_CAPACITY: usize = 256;

/// Command bus from control threads into the audio callback
pub struct CommandBus {
    tx: Sender<Command>,
    rx: Receiver<Command>,
}

impl CommandBus {
    pub fn new() -> Self {
        let (tx, rx) = bounded(BUS_CAPACITY);
        Self { tx, rx }
    }

    /// Get a sender that can be cloned and shared
    pub fn sender(&self) -> CommandSender {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    /// Get a receiver (typically for the audio thread)
    pub fn receiver(&self) -> CommandReceiver {
        CommandReceiver {
            rx: self.rx.clone(),
        }
    }
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable sender for dispatching commands
#[derive(Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    /// Send a command (non-blocking, drops if buffer full)
    pub fn send(&self, cmd: Command) -> bool {
        match self.tx.try_send(cmd) {
            Ok(()) => true,
            Err(TrySendError::Full(cmd)) => {
                log::warn!("Command buffer full, dropping: {}", cmd.description());
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Receiver for consuming commands
#[derive(Clone)]
pub struct CommandReceiver {
    rx: Receiver<Command>,
}

impl CommandReceiver {
    /// Try to receive a command (non-blocking)
    pub fn try_recv(&self) -> Option<Command> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_in_order() {
        let bus = CommandBus::new();
        let tx = bus.sender();
        let rx = bus.receiver();
        assert!(tx.send(Command::SetBpm(90.0)));
        assert!(tx.send(Command::Reset));
        assert_eq!(rx.try_recv(), Some(Command::SetBpm(90.0)));
        assert_eq!(rx.try_recv(), Some(Command::Reset));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn drops_when_full() {
        let bus = CommandBus::new();
        let tx = bus.sender();
        for _ in 0..BUS_CAPACITY {
            assert!(tx.send(Command::Reset));
        }
        assert!(!tx.send(Command::Reset));
    }
}
