pub type SimulationFrame = u64;
pub type ClientId = u32;

/// Identifies the network channel a command travels on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ChannelId(pub u8);

impl ChannelId {
    pub const DEFAULT: ChannelId = ChannelId(0);
}
