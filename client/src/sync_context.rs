/// Debug counters of one entity
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncContext {
    pub ticks: u64,
    pub rebuilds: u64,
    pub payloads_sent: u64,
    pub fields_sent: u64,
    pub stops_sent: u64,
    pub forced_syncs: u64,
    pub send_failures: u64,
    pub updates_received: u64,
    pub fields_received: u64,
    pub callbacks_invoked: u64,
    pub commands_sent: u64,
    pub commands_invoked: u64,
    pub commands_dropped: u64,
    pub adoption_requests: u64,
}

impl SyncContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
