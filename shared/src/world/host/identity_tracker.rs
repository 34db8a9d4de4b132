use tether_serde::{BitReader, BitWriter, Serde};

use crate::world::component::{
    component_update::{ComponentUpdate, TAG_GROUP, UNIQUE_ID_GROUP},
    diff_mask::DiffMask,
    error::BindingError,
};

/// Identity values captured by one synthesis pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IdentitySnapshot {
    unique_id: Option<Option<String>>,
    tag: Option<String>,
}

impl IdentitySnapshot {
    pub fn is_empty(&self) -> bool {
        self.unique_id.is_none() && self.tag.is_none()
    }
}

/// Unique id and tag of an entity. They live outside component groups and
/// travel as reserved groups whenever they differ from what was last sent.
#[derive(Clone, Debug, Default)]
pub struct IdentityTracker {
    unique_id: Option<String>,
    tag: String,
    sent_unique_id: Option<Option<String>>,
    sent_tag: Option<String>,
}

impl IdentityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    pub fn set_unique_id(&mut self, unique_id: Option<String>) {
        self.unique_id = unique_id;
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: &str) {
        self.tag = tag.to_string();
    }

    /// Updates for identity values that changed since the last commit, or
    /// for both when `force_all`
    pub fn build(&self, force_all: bool) -> (Vec<ComponentUpdate>, IdentitySnapshot) {
        let mut updates = Vec::new();
        let mut snapshot = IdentitySnapshot::default();

        if force_all || self.sent_unique_id.as_ref() != Some(&self.unique_id) {
            let mut writer = BitWriter::new();
            self.unique_id.ser(&mut writer);
            updates.push(identity_update(UNIQUE_ID_GROUP, writer));
            snapshot.unique_id = Some(self.unique_id.clone());
        }

        if force_all || self.sent_tag.as_ref() != Some(&self.tag) {
            let mut writer = BitWriter::new();
            self.tag.ser(&mut writer);
            updates.push(identity_update(TAG_GROUP, writer));
            snapshot.tag = Some(self.tag.clone());
        }

        (updates, snapshot)
    }

    pub fn commit(&mut self, snapshot: IdentitySnapshot) {
        if let Some(unique_id) = snapshot.unique_id {
            self.sent_unique_id = Some(unique_id);
        }
        if let Some(tag) = snapshot.tag {
            self.sent_tag = Some(tag);
        }
    }

    /// Applies a reserved group received from the state authority. Received
    /// values count as sent, so regaining authority does not echo them.
    pub fn receive(&mut self, update: &ComponentUpdate) -> Result<(), BindingError> {
        let mut reader = BitReader::new(&update.payload);
        let decode_error = |err: tether_serde::SerdeErr| BindingError::Decode {
            group: update.component_type.clone(),
            reason: err.to_string(),
        };

        match update.component_type.as_str() {
            UNIQUE_ID_GROUP => {
                let unique_id = Option::<String>::de(&mut reader).map_err(decode_error)?;
                self.sent_unique_id = Some(unique_id.clone());
                self.unique_id = unique_id;
            }
            TAG_GROUP => {
                let tag = String::de(&mut reader).map_err(decode_error)?;
                self.sent_tag = Some(tag.clone());
                self.tag = tag;
            }
            other => {
                return Err(BindingError::UnknownGroup {
                    group: other.to_string(),
                })
            }
        }
        Ok(())
    }
}

fn identity_update(group: &str, writer: BitWriter) -> ComponentUpdate {
    let mut mask = DiffMask::new();
    mask.set_bit(0, true);
    ComponentUpdate::new(group, mask, DiffMask::EMPTY, writer.to_bytes())
}
