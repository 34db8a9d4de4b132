use log::warn;

use crate::world::component::{
    field_value::FieldValue,
    vector::{Vector3, Vector3d},
};

/// Largest origin shift applied by default, the range of an `f32`
pub const DEFAULT_MAX_ORIGIN_DELTA: f64 = f32::MAX as f64;

/// Re-expresses received positions relative to the local floating origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OriginCorrector {
    max_origin_delta: f64,
}

impl OriginCorrector {
    pub fn new(max_origin_delta: f64) -> Self {
        Self { max_origin_delta }
    }

    pub fn max_origin_delta(&self) -> f64 {
        self.max_origin_delta
    }

    /// `received - local`, or zero when the shift is not finite or exceeds
    /// the configured maximum
    pub fn delta(&self, received: Vector3d, local: Vector3d) -> Vector3 {
        let delta = received - local;
        if !delta.is_finite() || delta.max_abs_component() > self.max_origin_delta {
            warn!(
                "Ignoring floating origin shift {:?} (received {:?}, local {:?}), limit is {}",
                delta, received, local, self.max_origin_delta
            );
            return Vector3::ZERO;
        }
        Vector3::new(delta.x as f32, delta.y as f32, delta.z as f32)
    }

    /// Shifts a position value, anything else passes through
    pub fn correct(&self, value: FieldValue, delta: Vector3) -> FieldValue {
        if delta == Vector3::ZERO {
            return value;
        }
        match value {
            FieldValue::Vector3(position) => FieldValue::Vector3(position + delta),
            other => other,
        }
    }
}

impl Default for OriginCorrector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ORIGIN_DELTA)
    }
}
