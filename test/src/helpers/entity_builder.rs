use std::sync::Arc;

use tether_client::{
    BindingDescriptor, Entity, EntitySync, FieldCell, FieldType, Protocol, Vector3,
};

/// An entity with a typical set of bindings and the cells backing them
pub struct TestEntity {
    pub sync: EntitySync,
    /// `Transform` bit 0, interpolated world position
    pub position: FieldCell,
    /// `Stats` bit 0
    pub health: FieldCell,
    /// `Stats` bit 1
    pub name: FieldCell,
    /// `Look` bit 0, sent once
    pub color: FieldCell,
}

impl TestEntity {
    pub fn new(id: u64, protocol: Arc<Protocol>) -> Self {
        let mut sync = EntitySync::new(Entity::from_u64(id), protocol);
        let position = FieldCell::new(Vector3::ZERO);
        let health = FieldCell::new(100i64);
        let name = FieldCell::new("crate");
        let color = FieldCell::new("red");

        sync.bind_field(
            BindingDescriptor::new("Transform", "position", 0, FieldType::Vector3)
                .interpolated()
                .position(),
            &position,
        )
        .unwrap();
        sync.bind_field(
            BindingDescriptor::new("Stats", "health", 0, FieldType::Int),
            &health,
        )
        .unwrap();
        sync.bind_field(
            BindingDescriptor::new("Stats", "name", 1, FieldType::Text),
            &name,
        )
        .unwrap();
        sync.bind_field(
            BindingDescriptor::new("Look", "color", 0, FieldType::Text).creation_only(),
            &color,
        )
        .unwrap();

        Self {
            sync,
            position,
            health,
            name,
            color,
        }
    }

    pub fn entity(&self) -> Entity {
        self.sync.entity()
    }
}
