use tether_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{
    world::component::{diff_mask::DiffMask, vector::Vector3d},
    Entity, SimulationFrame,
};

/// Reserved group carrying an entity's unique id
pub const UNIQUE_ID_GROUP: &str = "$uniqueId";
/// Reserved group carrying an entity's tag
pub const TAG_GROUP: &str = "$tag";

pub fn is_identity_group(group: &str) -> bool {
    group == UNIQUE_ID_GROUP || group == TAG_GROUP
}

/// Serialized changes of one component group. `payload` holds the values of
/// the bits set in `fields_mask`, in ascending bit order.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentUpdate {
    pub component_type: String,
    pub fields_mask: DiffMask,
    pub stopped_mask: DiffMask,
    pub payload: Vec<u8>,
}

impl ComponentUpdate {
    pub fn new(component_type: &str, fields_mask: DiffMask, stopped_mask: DiffMask, payload: Vec<u8>) -> Self {
        Self {
            component_type: component_type.to_string(),
            fields_mask,
            stopped_mask,
            payload,
        }
    }
}

impl Serde for ComponentUpdate {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.component_type.ser(writer);
        self.fields_mask.ser(writer);
        self.stopped_mask.ser(writer);
        self.payload.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            component_type: String::de(reader)?,
            fields_mask: DiffMask::de(reader)?,
            stopped_mask: DiffMask::de(reader)?,
            payload: Vec::<u8>::de(reader)?,
        })
    }
}

/// Every update of one entity for one simulation frame
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentUpdates {
    pub entity: Entity,
    pub frame: SimulationFrame,
    /// Sender's floating origin when the values were sampled
    pub floating_origin: Vector3d,
    pub updates: Vec<ComponentUpdate>,
}

impl ComponentUpdates {
    pub fn new(entity: Entity, frame: SimulationFrame, floating_origin: Vector3d) -> Self {
        Self {
            entity,
            frame,
            floating_origin,
            updates: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn find(&self, component_type: &str) -> Option<&ComponentUpdate> {
        self.updates
            .iter()
            .find(|update| update.component_type == component_type)
    }
}

impl Serde for ComponentUpdates {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.entity.ser(writer);
        self.frame.ser(writer);
        self.floating_origin.ser(writer);
        (self.updates.len() as u32).ser(writer);
        for update in &self.updates {
            update.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let entity = Entity::de(reader)?;
        let frame = SimulationFrame::de(reader)?;
        let floating_origin = Vector3d::de(reader)?;
        let count = u32::de(reader)?;
        let mut updates = Vec::new();
        for _ in 0..count {
            updates.push(ComponentUpdate::de(reader)?);
        }
        Ok(Self {
            entity,
            frame,
            floating_origin,
            updates,
        })
    }
}
