use log::warn;
use tether_serde::{BitReader, BitWrite, SerdeErr};

use crate::{
    messages::command_receiver::ReceiverAccessor,
    world::{
        component::{
            diff_mask::DIFF_MASK_BITS,
            error::{BindingError, FieldError},
            field_cell::FieldAccessor,
            field_value::{FieldType, FieldValue},
        },
        registry::dirty_tracker::{DirtyOutcome, DirtyTracker},
        remote::interpolation::InterpolationBuffer,
    },
    SimulationFrame,
};

pub type ChangeCallback = Box<dyn FnMut(&FieldValue, &FieldValue) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMode {
    /// Sent whenever it changes
    Continuous,
    /// Sent once, with the entity's first update
    CreationOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRole {
    Value,
    /// World-space position, rewritten by the floating origin
    Position,
}

/// Static description of a networked field, part of an entity's schema
#[derive(Clone, Debug, PartialEq)]
pub struct BindingDescriptor {
    pub name: String,
    pub group: String,
    pub mask_bit: u8,
    pub field_type: FieldType,
    pub sync_mode: SyncMode,
    pub interpolated: bool,
    pub role: FieldRole,
    /// Samples per second, `None` to sample every tick
    pub sample_rate: Option<f64>,
}

impl BindingDescriptor {
    pub fn new(group: &str, name: &str, mask_bit: u8, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            group: group.to_string(),
            mask_bit,
            field_type,
            sync_mode: SyncMode::Continuous,
            interpolated: false,
            role: FieldRole::Value,
            sample_rate: None,
        }
    }

    pub fn interpolated(mut self) -> Self {
        self.interpolated = true;
        self
    }

    pub fn creation_only(mut self) -> Self {
        self.sync_mode = SyncMode::CreationOnly;
        self
    }

    pub fn position(mut self) -> Self {
        self.role = FieldRole::Position;
        self
    }

    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = Some(rate);
        self
    }
}

enum BindingTarget {
    Field(FieldAccessor),
    Method(ReceiverAccessor),
}

/// A networked field or method of an entity
pub struct Binding {
    descriptor: BindingDescriptor,
    target: BindingTarget,
    tracker: DirtyTracker,
    interpolation: InterpolationBuffer,
    on_change: Option<ChangeCallback>,
    pending_change: Option<(FieldValue, FieldValue)>,
    predicted: bool,
    valid: bool,
    synced_once: bool,
}

impl Binding {
    /// Creates a field binding
    ///
    /// Returns an error if the mask bit does not fit a diff mask or the
    /// accessor does not carry the declared type.
    pub fn field(
        descriptor: BindingDescriptor,
        accessor: FieldAccessor,
        interpolation_capacity: usize,
    ) -> Result<Self, BindingError> {
        if descriptor.mask_bit >= DIFF_MASK_BITS {
            return Err(BindingError::MaskBitOutOfRange {
                binding: descriptor.name.clone(),
                bit: descriptor.mask_bit,
            });
        }
        if let Ok(value) = accessor.try_get() {
            if value.field_type() != descriptor.field_type {
                return Err(BindingError::FieldTypeMismatch {
                    binding: descriptor.name.clone(),
                    expected: descriptor.field_type.name(),
                    actual: value.field_type().name(),
                });
            }
        }
        Ok(Self::new(
            descriptor,
            BindingTarget::Field(accessor),
            interpolation_capacity,
        ))
    }

    /// Creates a method binding, serving the command `command_name` for the
    /// component `group`
    pub fn method(group: &str, command_name: &str, receiver: ReceiverAccessor) -> Self {
        // methods carry no payload, the field type is never read
        let descriptor = BindingDescriptor::new(group, command_name, 0, FieldType::Bool);
        Self::new(descriptor, BindingTarget::Method(receiver), 2)
    }

    fn new(descriptor: BindingDescriptor, target: BindingTarget, capacity: usize) -> Self {
        Self {
            descriptor,
            target,
            tracker: DirtyTracker::new(),
            interpolation: InterpolationBuffer::new(capacity),
            on_change: None,
            pending_change: None,
            predicted: false,
            valid: true,
            synced_once: false,
        }
    }

    pub fn with_change_callback(mut self, callback: ChangeCallback) -> Self {
        self.on_change = Some(callback);
        self
    }

    pub fn descriptor(&self) -> &BindingDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn group(&self) -> &str {
        &self.descriptor.group
    }

    pub fn mask_bit(&self) -> u8 {
        self.descriptor.mask_bit
    }

    pub fn field_type(&self) -> FieldType {
        self.descriptor.field_type
    }

    pub fn is_method(&self) -> bool {
        matches!(self.target, BindingTarget::Method(_))
    }

    pub fn is_interpolated(&self) -> bool {
        self.descriptor.interpolated
    }

    pub fn is_position(&self) -> bool {
        self.descriptor.role == FieldRole::Position
    }

    pub fn is_creation_only(&self) -> bool {
        self.descriptor.sync_mode == SyncMode::CreationOnly
    }

    pub fn has_change_callback(&self) -> bool {
        self.on_change.is_some()
    }

    pub fn synced_once(&self) -> bool {
        self.synced_once
    }

    pub fn is_predicted(&self) -> bool {
        self.predicted
    }

    /// Local prediction owns the value, interpolation leaves it alone
    pub fn set_predicted(&mut self, predicted: bool) {
        self.predicted = predicted;
    }

    /// Whether the backing object still exists. Once false, stays false.
    pub fn is_valid(&mut self) -> bool {
        if self.valid {
            self.valid = match &self.target {
                BindingTarget::Field(accessor) => accessor.is_alive(),
                BindingTarget::Method(receiver) => receiver.is_alive(),
            };
        }
        self.valid
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn receiver(&self) -> Option<&ReceiverAccessor> {
        match &self.target {
            BindingTarget::Method(receiver) => Some(receiver),
            BindingTarget::Field(_) => None,
        }
    }

    /// Current local value
    pub fn value(&self) -> Result<FieldValue, FieldError> {
        match &self.target {
            BindingTarget::Field(accessor) => accessor.try_get(),
            BindingTarget::Method(_) => Err(FieldError::TypeMismatch {
                expected: self.descriptor.field_type.name(),
                actual: "Method",
            }),
        }
    }

    fn store(&mut self, value: FieldValue) -> Result<(), FieldError> {
        match &self.target {
            BindingTarget::Field(accessor) => accessor.try_set(value),
            BindingTarget::Method(_) => Err(FieldError::TypeMismatch {
                expected: "Method",
                actual: value.field_type().name(),
            }),
        }
    }

    // Host side

    /// Samples the local value at `frame`. Interpolated bindings also keep
    /// the sample so a later loss of authority starts from recent history.
    pub fn sample(&mut self, frame: SimulationFrame, time: f64) -> Result<(), FieldError> {
        let value = self.value()?;
        if self.descriptor.interpolated {
            self.interpolation.push(frame, time, value.clone());
        }
        self.tracker
            .sample(frame, value, self.descriptor.interpolated);
        Ok(())
    }

    /// Compares the value sampled at `frame` with the last transmitted one,
    /// sampling first if `frame` was not sampled yet
    pub fn is_dirty(&mut self, frame: SimulationFrame) -> DirtyOutcome {
        if self.tracker.sample_at(frame).is_none() {
            let Ok(value) = self.value() else {
                return DirtyOutcome::Stale;
            };
            self.tracker
                .sample(frame, value, self.descriptor.interpolated);
        }
        match self.tracker.sample_at(frame) {
            Some(value) => self.tracker.check(value),
            None => DirtyOutcome::Stale,
        }
    }

    pub fn is_ready_to_sample(&self, time: f64) -> bool {
        self.tracker
            .is_ready_to_sample(time, self.descriptor.sample_rate)
    }

    pub fn has_pending_stop(&self) -> bool {
        self.tracker.has_pending_stop()
    }

    /// Value that goes on the wire for `frame`
    pub fn outgoing_value(&self, frame: SimulationFrame) -> Result<FieldValue, FieldError> {
        match self.tracker.sample_at(frame) {
            Some(value) => Ok(value.clone()),
            None => self.value(),
        }
    }

    pub fn write(&self, frame: SimulationFrame, writer: &mut dyn BitWrite) -> Result<(), FieldError> {
        self.outgoing_value(frame)?.write(writer);
        Ok(())
    }

    /// Records that `value` was transmitted
    pub fn commit_sent(&mut self, value: FieldValue, time: f64, stop_sent: bool) {
        self.tracker.commit(value, time, stop_sent);
        self.synced_once = true;
    }

    pub fn last_sent(&self) -> Option<&FieldValue> {
        self.tracker.last_sent()
    }

    /// Forgets transmission history, so everything is dirty again
    pub fn reset_tracking(&mut self) {
        self.tracker.reset();
    }

    // Remote side

    pub fn read(&self, reader: &mut BitReader) -> Result<FieldValue, SerdeErr> {
        FieldValue::read(self.descriptor.field_type, reader)
    }

    /// Takes a value received from the state authority. Interpolated
    /// bindings buffer it, the others apply it right away.
    pub fn receive(
        &mut self,
        frame: SimulationFrame,
        time: f64,
        value: FieldValue,
        stopped: bool,
    ) -> Result<(), FieldError> {
        if value.field_type() != self.descriptor.field_type {
            return Err(FieldError::TypeMismatch {
                expected: self.descriptor.field_type.name(),
                actual: value.field_type().name(),
            });
        }

        if self.descriptor.interpolated && !self.predicted {
            self.interpolation.push(frame, time, value);
            if stopped {
                self.interpolation.mark_stopped();
            }
            return Ok(());
        }

        self.apply(value)
    }

    /// Writes `value` into the local object, queueing the change callback
    fn apply(&mut self, value: FieldValue) -> Result<(), FieldError> {
        let previous = self.value()?;
        if previous == value {
            return Ok(());
        }
        self.store(value.clone())?;
        if self.on_change.is_some() {
            match self.pending_change.take() {
                // several changes in one tick report the oldest previous value
                Some((oldest, _)) => self.pending_change = Some((oldest, value)),
                None => self.pending_change = Some((previous, value)),
            }
        }
        Ok(())
    }

    /// Writes the interpolated value for `time`. Returns true if the local
    /// value was touched.
    pub fn interpolate(&mut self, time: f64, max_extrapolation: f64) -> bool {
        if !self.descriptor.interpolated || self.predicted || !self.valid {
            return false;
        }
        let Some(value) = self.interpolation.interpolate(time, max_extrapolation) else {
            return false;
        };
        match self.apply(value) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "Could not interpolate binding {} of group {}: {}",
                    self.descriptor.name, self.descriptor.group, err
                );
                false
            }
        }
    }

    /// Starts interpolation from the current local value, unless recent
    /// samples are already buffered
    pub fn seed_interpolation(&mut self, frame: SimulationFrame, time: f64) {
        if !self.descriptor.interpolated || !self.interpolation.is_empty() {
            return;
        }
        match self.value() {
            Ok(value) => self.interpolation.seed(frame, time, value),
            Err(_) => self.interpolation.clear(),
        }
    }

    pub fn interpolation(&self) -> &InterpolationBuffer {
        &self.interpolation
    }

    /// Runs the queued change callback, if any
    pub fn invoke_pending_callback(&mut self) -> bool {
        let Some((previous, current)) = self.pending_change.take() else {
            return false;
        };
        let Some(callback) = self.on_change.as_mut() else {
            return false;
        };
        callback(&previous, &current);
        true
    }
}
