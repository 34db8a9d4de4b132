use log::warn;
use tether_serde::BitReader;

use crate::{
    world::{
        component::{
            component_update::{is_identity_group, ComponentUpdate, ComponentUpdates},
            error::BindingError,
            field_value::FieldValue,
            vector::{Vector3, Vector3d},
        },
        host::identity_tracker::IdentityTracker,
        origin::floating_origin::OriginCorrector,
        registry::binding_registry::BindingRegistry,
    },
    SimulationFrame,
};

/// Decodes `update` against the registered group and hands every value to
/// its binding. Nothing is applied unless the whole payload decodes.
/// Returns how many fields were received.
pub fn apply_update(
    registry: &mut BindingRegistry,
    update: &ComponentUpdate,
    frame: SimulationFrame,
    time: f64,
    corrector: &OriginCorrector,
    origin_delta: Vector3,
) -> Result<usize, BindingError> {
    let group = update.component_type.as_str();
    if !registry.has_field_group(group) {
        return Err(BindingError::UnknownGroup {
            group: group.to_string(),
        });
    }

    let mut reader = BitReader::new(&update.payload);
    let mut decoded: Vec<(usize, FieldValue, bool)> = Vec::new();
    for bit in update.fields_mask.iter_bits() {
        let Some(index) = registry.field_binding(group, bit) else {
            return Err(BindingError::UnknownMaskBit {
                group: group.to_string(),
                bit,
            });
        };
        let binding = registry.binding(index);
        let value = binding.read(&mut reader).map_err(|err| BindingError::Decode {
            group: group.to_string(),
            reason: err.to_string(),
        })?;
        let value = if binding.is_position() {
            corrector.correct(value, origin_delta)
        } else {
            value
        };
        decoded.push((index, value, update.stopped_mask.bit(bit)));
    }

    let received = decoded.len();
    for (index, value, stopped) in decoded {
        let binding = registry.binding_mut(index);
        if let Err(err) = binding.receive(frame, time, value, stopped) {
            warn!(
                "Binding {} of group {} rejected a received value: {}",
                binding.name(),
                group,
                err
            );
        }
    }
    Ok(received)
}

/// Applies every update of `batch`. A failing update is logged and skipped,
/// the others still apply. Returns how many fields were received.
pub fn apply_updates(
    registry: &mut BindingRegistry,
    identity: &mut IdentityTracker,
    batch: &ComponentUpdates,
    time: f64,
    corrector: &OriginCorrector,
    local_origin: Vector3d,
) -> usize {
    let origin_delta = corrector.delta(batch.floating_origin, local_origin);
    let mut received = 0;

    for update in &batch.updates {
        let result = if is_identity_group(&update.component_type) {
            identity.receive(update).map(|_| 1)
        } else {
            apply_update(registry, update, batch.frame, time, corrector, origin_delta)
        };

        match result {
            Ok(count) => received += count,
            Err(err) => warn!(
                "Dropping update of {} for {} at frame {}: {}",
                update.component_type, batch.entity, batch.frame, err
            ),
        }
    }

    received
}
