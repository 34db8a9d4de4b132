use crate::world::entity::entity_state::EntityState;

/// What to do about an entity nobody holds state authority over
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    #[default]
    Ignore,
    /// Ask the lifecycle collaborator to hand authority to the local peer
    AutoAdopt,
}

/// Decides when to request adoption of an orphaned entity, at most once per
/// cooldown
#[derive(Clone, Debug, PartialEq)]
pub struct OrphanAdoption {
    policy: OrphanPolicy,
    cooldown: f64,
    last_request: Option<f64>,
}

impl OrphanAdoption {
    pub fn new(policy: OrphanPolicy, cooldown: f64) -> Self {
        Self {
            policy,
            cooldown,
            last_request: None,
        }
    }

    pub fn policy(&self) -> OrphanPolicy {
        self.policy
    }

    /// Whether a request should go out at `now`. Records the request when it
    /// should.
    pub fn poll(&mut self, state: &EntityState, now: f64) -> bool {
        if self.policy != OrphanPolicy::AutoAdopt || !state.is_orphaned {
            return false;
        }

        let last = match (self.last_request, state.last_time_requested_orphan_adoption) {
            (Some(local), Some(recorded)) => Some(local.max(recorded)),
            (local, recorded) => local.or(recorded),
        };
        if let Some(last) = last {
            if now - last < self.cooldown {
                return false;
            }
        }

        self.last_request = Some(now);
        true
    }
}
