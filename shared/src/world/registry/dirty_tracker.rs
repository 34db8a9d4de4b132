use crate::{world::component::field_value::FieldValue, SimulationFrame};

/// Result of a dirty check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirtyOutcome {
    Ok { dirty: bool, just_stopped: bool },
    /// The binding's backing object is gone; the binding set must be rebuilt
    Stale,
}

impl DirtyOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, DirtyOutcome::Stale)
    }

    /// Whether the binding belongs in this tick's payload
    pub fn needs_send(&self) -> bool {
        match self {
            DirtyOutcome::Ok {
                dirty,
                just_stopped,
            } => *dirty || *just_stopped,
            DirtyOutcome::Stale => false,
        }
    }
}

/// Per-binding record of what was sampled and what was last transmitted
#[derive(Clone, Default)]
pub struct DirtyTracker {
    last_sent: Option<FieldValue>,
    last_send_time: Option<f64>,
    current_sample: Option<(SimulationFrame, FieldValue)>,
    moving: bool,
    stop_pending: bool,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the value at `frame`. Sampling the same frame twice only
    /// replaces the value. With `track_motion`, a sample equal to its
    /// predecessor after movement arms a pending stop.
    pub fn sample(&mut self, frame: SimulationFrame, value: FieldValue, track_motion: bool) {
        if let Some((current_frame, current_value)) = &mut self.current_sample {
            if *current_frame == frame {
                *current_value = value;
                return;
            }
        }

        let moving_now = match &self.current_sample {
            Some((_, previous)) => *previous != value,
            None => false,
        };

        if track_motion {
            if moving_now {
                self.stop_pending = false;
            } else if self.moving {
                self.stop_pending = true;
            }
        }

        self.moving = moving_now;
        self.current_sample = Some((frame, value));
    }

    pub fn sample_at(&self, frame: SimulationFrame) -> Option<&FieldValue> {
        match &self.current_sample {
            Some((sampled_frame, value)) if *sampled_frame == frame => Some(value),
            _ => None,
        }
    }

    /// Compares `value` against the last transmitted value
    pub fn check(&self, value: &FieldValue) -> DirtyOutcome {
        DirtyOutcome::Ok {
            dirty: self.last_sent.as_ref() != Some(value),
            just_stopped: self.stop_pending,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn has_pending_stop(&self) -> bool {
        self.stop_pending
    }

    pub fn last_sent(&self) -> Option<&FieldValue> {
        self.last_sent.as_ref()
    }

    /// Rate limiting. `rate` is in samples per second; `None` sends every tick.
    pub fn is_ready_to_sample(&self, time: f64, rate: Option<f64>) -> bool {
        let Some(rate) = rate.filter(|rate| *rate > 0.0) else {
            return true;
        };
        let Some(last_send_time) = self.last_send_time else {
            return true;
        };
        // tolerate float drift on exact multiples of the interval
        time - last_send_time + 1e-9 >= 1.0 / rate
    }

    /// Records a transmitted value. `stop_sent` clears the pending stop.
    pub fn commit(&mut self, value: FieldValue, time: f64, stop_sent: bool) {
        self.last_sent = Some(value);
        self.last_send_time = Some(time);
        if stop_sent {
            self.stop_pending = false;
        }
    }

    /// Forgets everything, used when authority changes hands
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
