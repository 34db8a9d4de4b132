use std::sync::{Arc, RwLock, Weak};

use crate::world::component::{
    error::FieldError,
    field_value::{FieldType, FieldValue},
};

// FieldData
struct FieldData {
    field_type: FieldType,
    value: FieldValue,
}

// FieldCell
/// Game-side owner of a networked value. Bindings only hold a weak
/// `FieldAccessor`, so dropping every clone of the cell invalidates them.
#[derive(Clone)]
pub struct FieldCell {
    data: Arc<RwLock<FieldData>>,
}

impl FieldCell {
    pub fn new(value: impl Into<FieldValue>) -> Self {
        let value = value.into();
        Self {
            data: Arc::new(RwLock::new(FieldData {
                field_type: value.field_type(),
                value,
            })),
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.try_field_type()
            .expect("Lock on FieldCell is held by current thread.")
    }

    pub fn try_field_type(&self) -> Result<FieldType, FieldError> {
        let data = self.data.read().map_err(|_| FieldError::LockPoisoned)?;
        Ok(data.field_type)
    }

    /// Get the current value
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    /// Consider using `try_get` for non-panicking error handling.
    pub fn get(&self) -> FieldValue {
        self.try_get()
            .expect("Lock on FieldCell is held by current thread.")
    }

    pub fn try_get(&self) -> Result<FieldValue, FieldError> {
        let data = self.data.read().map_err(|_| FieldError::LockPoisoned)?;
        Ok(data.value.clone())
    }

    /// Set the current value
    ///
    /// # Panics
    ///
    /// Panics if the value's type differs from the cell's type.
    /// Consider using `try_set` for non-panicking error handling.
    pub fn set(&self, value: impl Into<FieldValue>) {
        self.try_set(value)
            .expect("FieldCell::set called with a value of the wrong type")
    }

    pub fn try_set(&self, value: impl Into<FieldValue>) -> Result<(), FieldError> {
        write_value(&self.data, value.into())
    }

    pub fn accessor(&self) -> FieldAccessor {
        FieldAccessor {
            data: Arc::downgrade(&self.data),
        }
    }
}

// FieldAccessor
#[derive(Clone)]
pub struct FieldAccessor {
    data: Weak<RwLock<FieldData>>,
}

impl FieldAccessor {
    pub fn is_alive(&self) -> bool {
        self.data.strong_count() > 0
    }

    pub fn try_get(&self) -> Result<FieldValue, FieldError> {
        let data = self.data.upgrade().ok_or(FieldError::CellDropped)?;
        let data = data.read().map_err(|_| FieldError::LockPoisoned)?;
        Ok(data.value.clone())
    }

    pub fn try_set(&self, value: FieldValue) -> Result<(), FieldError> {
        let data = self.data.upgrade().ok_or(FieldError::CellDropped)?;
        write_value(&data, value)
    }
}

fn write_value(data: &RwLock<FieldData>, value: FieldValue) -> Result<(), FieldError> {
    let mut data = data.write().map_err(|_| FieldError::LockPoisoned)?;
    if value.field_type() != data.field_type {
        return Err(FieldError::TypeMismatch {
            expected: data.field_type.name(),
            actual: value.field_type().name(),
        });
    }
    data.value = value;
    Ok(())
}
