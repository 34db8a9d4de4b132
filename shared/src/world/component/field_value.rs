use tether_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{
    world::component::vector::{Quaternion, Vector2, Vector3},
    Entity,
};

/// Wire type of a field, fixed by the schema on both peers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Double,
    Vector2,
    Vector3,
    Quaternion,
    Text,
    Bytes,
    Entity,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Bool => "Bool",
            FieldType::Int => "Int",
            FieldType::Float => "Float",
            FieldType::Double => "Double",
            FieldType::Vector2 => "Vector2",
            FieldType::Vector3 => "Vector3",
            FieldType::Quaternion => "Quaternion",
            FieldType::Text => "Text",
            FieldType::Bytes => "Bytes",
            FieldType::Entity => "Entity",
        }
    }

    /// Continuous types blend between samples, the rest step
    pub fn is_continuous(&self) -> bool {
        matches!(
            self,
            FieldType::Int
                | FieldType::Float
                | FieldType::Double
                | FieldType::Vector2
                | FieldType::Vector3
                | FieldType::Quaternion
        )
    }

    pub fn default_value(&self) -> FieldValue {
        match self {
            FieldType::Bool => FieldValue::Bool(false),
            FieldType::Int => FieldValue::Int(0),
            FieldType::Float => FieldValue::Float(0.0),
            FieldType::Double => FieldValue::Double(0.0),
            FieldType::Vector2 => FieldValue::Vector2(Vector2::default()),
            FieldType::Vector3 => FieldValue::Vector3(Vector3::default()),
            FieldType::Quaternion => FieldValue::Quaternion(Quaternion::default()),
            FieldType::Text => FieldValue::Text(String::new()),
            FieldType::Bytes => FieldValue::Bytes(Vec::new()),
            FieldType::Entity => FieldValue::Entity(None),
        }
    }
}

/// Value carried by a field binding
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Double(f64),
    Vector2(Vector2),
    Vector3(Vector3),
    Quaternion(Quaternion),
    Text(String),
    Bytes(Vec<u8>),
    Entity(Option<Entity>),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Double(_) => FieldType::Double,
            FieldValue::Vector2(_) => FieldType::Vector2,
            FieldValue::Vector3(_) => FieldType::Vector3,
            FieldValue::Quaternion(_) => FieldType::Quaternion,
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Bytes(_) => FieldType::Bytes,
            FieldValue::Entity(_) => FieldType::Entity,
        }
    }

    /// Writes the value without a type tag. The reader must know the
    /// `FieldType` from the schema.
    pub fn write(&self, writer: &mut dyn BitWrite) {
        match self {
            FieldValue::Bool(value) => value.ser(writer),
            FieldValue::Int(value) => value.ser(writer),
            FieldValue::Float(value) => value.ser(writer),
            FieldValue::Double(value) => value.ser(writer),
            FieldValue::Vector2(value) => value.ser(writer),
            FieldValue::Vector3(value) => value.ser(writer),
            FieldValue::Quaternion(value) => value.ser(writer),
            FieldValue::Text(value) => value.ser(writer),
            FieldValue::Bytes(value) => value.ser(writer),
            FieldValue::Entity(value) => value.ser(writer),
        }
    }

    pub fn read(field_type: FieldType, reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(match field_type {
            FieldType::Bool => FieldValue::Bool(bool::de(reader)?),
            FieldType::Int => FieldValue::Int(i64::de(reader)?),
            FieldType::Float => FieldValue::Float(f32::de(reader)?),
            FieldType::Double => FieldValue::Double(f64::de(reader)?),
            FieldType::Vector2 => FieldValue::Vector2(Vector2::de(reader)?),
            FieldType::Vector3 => FieldValue::Vector3(Vector3::de(reader)?),
            FieldType::Quaternion => FieldValue::Quaternion(Quaternion::de(reader)?),
            FieldType::Text => FieldValue::Text(String::de(reader)?),
            FieldType::Bytes => FieldValue::Bytes(Vec::<u8>::de(reader)?),
            FieldType::Entity => FieldValue::Entity(Option::<Entity>::de(reader)?),
        })
    }

    /// Blends towards `other` by `t`. `t` outside of `0..=1` extrapolates
    /// continuous types. Mismatched or stepped types switch to `other` once
    /// `t` reaches 1.
    pub fn lerp(&self, other: &FieldValue, t: f64) -> FieldValue {
        let tf = t as f32;
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => {
                FieldValue::Int((*a as f64 + (*b - *a) as f64 * t).round() as i64)
            }
            (FieldValue::Float(a), FieldValue::Float(b)) => FieldValue::Float(a + (b - a) * tf),
            (FieldValue::Double(a), FieldValue::Double(b)) => FieldValue::Double(a + (b - a) * t),
            (FieldValue::Vector2(a), FieldValue::Vector2(b)) => FieldValue::Vector2(Vector2::new(
                a.x + (b.x - a.x) * tf,
                a.y + (b.y - a.y) * tf,
            )),
            (FieldValue::Vector3(a), FieldValue::Vector3(b)) => {
                FieldValue::Vector3(*a + (*b - *a) * tf)
            }
            (FieldValue::Quaternion(a), FieldValue::Quaternion(b)) => {
                FieldValue::Quaternion(a.nlerp(b, tf))
            }
            _ => {
                if t >= 1.0 {
                    other.clone()
                } else {
                    self.clone()
                }
            }
        }
    }

    pub fn as_vector3(&self) -> Option<Vector3> {
        match self {
            FieldValue::Vector3(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<Vector3> for FieldValue {
    fn from(value: Vector3) -> Self {
        FieldValue::Vector3(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(value)
    }
}
