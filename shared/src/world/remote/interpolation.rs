//! Interpolation of inbound samples for entities the local peer only
//! observes.
//!
//! Samples arrive once per network tick; rendering runs at its own rate and
//! asks for a value at an arbitrary time. Between two samples the value is
//! blended, past the newest one it is extrapolated for a bounded amount of
//! time, and before the oldest one the oldest value is held.

use std::collections::VecDeque;

use crate::{world::component::field_value::FieldValue, SimulationFrame};

/// Tuning for every interpolated binding of an entity
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolationSettings {
    /// Seconds the rendered time lags behind the newest simulation time
    pub delay: f64,
    /// Longest span, in seconds, a value may be extrapolated past its newest
    /// sample
    pub max_extrapolation: f64,
    /// Samples kept per binding
    pub buffer_size: usize,
}

impl Default for InterpolationSettings {
    fn default() -> Self {
        Self {
            delay: 0.1,
            max_extrapolation: 0.2,
            buffer_size: 16,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub frame: SimulationFrame,
    pub time: f64,
    pub value: FieldValue,
}

#[derive(Clone, Debug)]
pub struct InterpolationBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
    stopped: bool,
}

impl InterpolationBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            capacity: capacity.max(2),
            stopped: false,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    pub fn newest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Stores a sample, keeping the buffer ordered by frame. A sample for a
    /// frame already present replaces it.
    pub fn push(&mut self, frame: SimulationFrame, time: f64, value: FieldValue) {
        let sample = Sample { frame, time, value };

        match self.samples.iter().position(|existing| existing.frame >= frame) {
            None => self.samples.push_back(sample),
            Some(index) => {
                if self.samples[index].frame == frame {
                    self.samples[index] = sample;
                } else {
                    self.samples.insert(index, sample);
                }
            }
        }

        if self.samples.back().map(|newest| newest.frame) == Some(frame) {
            self.stopped = false;
        }

        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// The newest sample is final: hold it instead of extrapolating
    pub fn mark_stopped(&mut self) {
        self.stopped = true;
    }

    /// Replaces the history with a single known value
    pub fn seed(&mut self, frame: SimulationFrame, time: f64, value: FieldValue) {
        self.samples.clear();
        self.stopped = false;
        self.push(frame, time, value);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.stopped = false;
    }

    /// Value at `time`, or `None` when nothing was ever sampled
    pub fn interpolate(&mut self, time: f64, max_extrapolation: f64) -> Option<FieldValue> {
        // samples superseded by two newer ones bracketing `time` are dead
        while self.samples.len() > 2 && self.samples[1].time <= time {
            self.samples.pop_front();
        }

        let first = self.samples.front()?;
        if self.samples.len() == 1 || time <= first.time {
            return Some(first.value.clone());
        }

        for window in 0..self.samples.len() - 1 {
            let from = &self.samples[window];
            let to = &self.samples[window + 1];
            if time <= to.time {
                let span = to.time - from.time;
                if span <= 0.0 {
                    return Some(to.value.clone());
                }
                let t = (time - from.time) / span;
                return Some(from.value.lerp(&to.value, t));
            }
        }

        let newest = &self.samples[self.samples.len() - 1];
        if self.stopped || !newest.value.field_type().is_continuous() {
            return Some(newest.value.clone());
        }

        let previous = &self.samples[self.samples.len() - 2];
        let span = newest.time - previous.time;
        if span <= 0.0 {
            return Some(newest.value.clone());
        }
        let overshoot = (time - newest.time).min(max_extrapolation.max(0.0));
        Some(previous.value.lerp(&newest.value, 1.0 + overshoot / span))
    }
}
