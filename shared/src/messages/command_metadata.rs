use crate::{ClientId, SimulationFrame};

/// Provenance of a command, handed to every receiver invocation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandMetadata {
    pub sender: ClientId,
    pub frame: SimulationFrame,
}

impl CommandMetadata {
    pub fn new(sender: ClientId, frame: SimulationFrame) -> Self {
        Self { sender, frame }
    }
}
