//! Turns an entity's dirty bindings into component updates.
//!
//! Building is side-effect free with respect to transmission state: nothing
//! counts as sent until [`commit_updates`] is called with the result, which
//! the caller only does once the transport accepted the updates.

use log::warn;
use tether_serde::BitWriter;

use crate::{
    world::{
        component::{component_update::ComponentUpdate, diff_mask::DiffMask, field_value::FieldValue},
        host::identity_tracker::{IdentitySnapshot, IdentityTracker},
        registry::{binding_registry::BindingRegistry, dirty_tracker::DirtyOutcome},
    },
    SimulationFrame,
};

/// A value that went into a payload
#[derive(Clone, Debug, PartialEq)]
pub struct SentField {
    pub binding: usize,
    pub value: FieldValue,
    pub stop_sent: bool,
}

/// Output of one synthesis pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SynthesizedUpdates {
    pub frame: SimulationFrame,
    pub time: f64,
    pub updates: Vec<ComponentUpdate>,
    sent: Vec<SentField>,
    identity: IdentitySnapshot,
}

impl SynthesizedUpdates {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn sent_fields(&self) -> &[SentField] {
        &self.sent
    }
}

/// Builds one payload per group holding at least one dirty or just-stopped
/// binding. With `force_all`, every field of every non-empty group is
/// serialized and no stop bits are set, pending stops stay armed.
pub fn build_updates(
    registry: &mut BindingRegistry,
    identity: Option<&IdentityTracker>,
    frame: SimulationFrame,
    time: f64,
    force_all: bool,
) -> SynthesizedUpdates {
    let mut output = SynthesizedUpdates {
        frame,
        time,
        ..Default::default()
    };

    let groups: Vec<(String, Vec<usize>)> = registry
        .groups()
        .iter()
        .filter(|group| !group.is_empty())
        .map(|group| (group.name().to_string(), group.bindings().to_vec()))
        .collect();

    for (group_name, indices) in groups {
        let mut fields_mask = DiffMask::new();
        let mut stopped_mask = DiffMask::new();
        let mut entries: Vec<(u8, SentField)> = Vec::new();

        for index in indices {
            if !force_all && !registry.binding(index).is_ready_to_sample(time) {
                continue;
            }

            let just_stopped = match registry.is_dirty(index, frame) {
                DirtyOutcome::Stale => continue,
                DirtyOutcome::Ok {
                    dirty,
                    just_stopped,
                } => {
                    if !force_all && !dirty && !just_stopped {
                        continue;
                    }
                    just_stopped
                }
            };

            let binding = registry.binding(index);
            let value = match binding.outgoing_value(frame) {
                Ok(value) => value,
                Err(err) => {
                    warn!(
                        "Skipping binding {} of group {}: {}",
                        binding.name(),
                        group_name,
                        err
                    );
                    continue;
                }
            };

            let stop_sent = just_stopped && !force_all;
            let bit = binding.mask_bit();
            fields_mask.set_bit(bit, true);
            if stop_sent {
                stopped_mask.set_bit(bit, true);
            }
            entries.push((
                bit,
                SentField {
                    binding: index,
                    value,
                    stop_sent,
                },
            ));
        }

        if fields_mask.is_clear() {
            continue;
        }

        entries.sort_by_key(|(bit, _)| *bit);
        let mut writer = BitWriter::new();
        for (_, entry) in &entries {
            entry.value.write(&mut writer);
        }

        output.updates.push(ComponentUpdate::new(
            &group_name,
            fields_mask,
            stopped_mask,
            writer.to_bytes(),
        ));
        output
            .sent
            .extend(entries.into_iter().map(|(_, entry)| entry));
    }

    if let Some(identity) = identity {
        let (identity_updates, snapshot) = identity.build(force_all);
        output.updates.extend(identity_updates);
        output.identity = snapshot;
    }

    output
}

/// Records the values of `synthesized` as transmitted. Synced creation-only
/// bindings are regrouped by the next rebuild.
pub fn commit_updates(
    registry: &mut BindingRegistry,
    identity: Option<&mut IdentityTracker>,
    synthesized: SynthesizedUpdates,
) {
    let mut regroup = false;
    for sent in synthesized.sent {
        let Ok(binding) = registry.try_binding_mut(sent.binding) else {
            continue;
        };
        if binding.is_creation_only() && !binding.synced_once() {
            regroup = true;
        }
        binding.commit_sent(sent.value, synthesized.time, sent.stop_sent);
    }
    if regroup {
        registry.request_rebuild();
    }
    if let Some(identity) = identity {
        identity.commit(synthesized.identity);
    }
}
