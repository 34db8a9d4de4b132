use std::collections::HashMap;

use log::{info, warn};

use crate::{
    world::{
        component::{binding::Binding, error::BindingError},
        registry::{dirty_tracker::DirtyOutcome, error::RegistryError},
    },
    SimulationFrame,
};

/// Field bindings that serialize into one payload, in declaration order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentGroup {
    name: String,
    bindings: Vec<usize>,
}

impl ComponentGroup {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bindings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registry indices of the group's bindings
    pub fn bindings(&self) -> &[usize] {
        &self.bindings
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Owns every binding of one entity and the descriptor table grouping them.
///
/// Additions and removals never happen while groups are iterated: new
/// bindings wait in a queue and stale ones are only purged by [`rebuild`],
/// which the owner runs at the start of a tick.
///
/// [`rebuild`]: BindingRegistry::rebuild
pub struct BindingRegistry {
    bindings: Vec<Binding>,
    pending: Vec<Binding>,
    groups: Vec<ComponentGroup>,
    group_index: HashMap<String, usize>,
    field_index: HashMap<(String, u8), usize>,
    rebuild_requested: bool,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            pending: Vec::new(),
            groups: Vec::new(),
            group_index: HashMap::new(),
            field_index: HashMap::new(),
            rebuild_requested: false,
        }
    }

    /// Queues a binding. It takes part in synchronization after the next
    /// rebuild.
    pub fn add(&mut self, binding: Binding) {
        if let Err(err) = self.try_add(binding) {
            panic!("BindingRegistry::add() failed: {}. Use try_add() to handle this case", err);
        }
    }

    pub fn try_add(&mut self, binding: Binding) -> Result<(), RegistryError> {
        if !binding.is_method() {
            let clash = self
                .bindings
                .iter()
                .chain(self.pending.iter())
                .find(|other| {
                    !other.is_method()
                        && other.group() == binding.group()
                        && other.mask_bit() == binding.mask_bit()
                });
            if let Some(other) = clash {
                return Err(BindingError::DuplicateMaskBit {
                    group: binding.group().to_string(),
                    first: other.name().to_string(),
                    second: binding.name().to_string(),
                    bit: binding.mask_bit(),
                }
                .into());
            }
        }
        self.pending.push(binding);
        self.rebuild_requested = true;
        Ok(())
    }

    pub fn request_rebuild(&mut self) {
        self.rebuild_requested = true;
    }

    pub fn is_rebuild_requested(&self) -> bool {
        self.rebuild_requested
    }

    /// Runs [`rebuild`](Self::rebuild) if one was requested. Returns whether
    /// it ran.
    pub fn rebuild_if_requested(&mut self) -> bool {
        if !self.rebuild_requested {
            return false;
        }
        self.rebuild();
        true
    }

    /// Merges queued bindings, drops invalid ones and regroups the rest.
    /// Creation-only bindings leave their group once synced. Returns how many
    /// bindings were dropped.
    pub fn rebuild(&mut self) -> usize {
        self.rebuild_requested = false;
        self.bindings.append(&mut self.pending);

        let before = self.bindings.len();
        self.bindings.retain_mut(|binding| binding.is_valid());
        let dropped = before - self.bindings.len();

        self.groups.clear();
        self.group_index.clear();
        self.field_index.clear();

        for (index, binding) in self.bindings.iter().enumerate() {
            if binding.is_method() {
                continue;
            }
            self.field_index
                .insert((binding.group().to_string(), binding.mask_bit()), index);

            if binding.is_creation_only() && binding.synced_once() {
                continue;
            }
            let group_id = match self.group_index.get(binding.group()) {
                Some(group_id) => *group_id,
                None => {
                    self.groups.push(ComponentGroup::new(binding.group()));
                    let group_id = self.groups.len() - 1;
                    self.group_index
                        .insert(binding.group().to_string(), group_id);
                    group_id
                }
            };
            self.groups[group_id].bindings.push(index);
        }

        if dropped > 0 {
            info!(
                "BindingRegistry: dropped {} stale bindings, {} groups remain",
                dropped,
                self.groups.len()
            );
        }

        dropped
    }

    /// Dirty check for one binding. A stale binding is reported and
    /// schedules a rebuild.
    pub fn is_dirty(&mut self, index: usize, frame: SimulationFrame) -> DirtyOutcome {
        let Some(binding) = self.bindings.get_mut(index) else {
            return DirtyOutcome::Stale;
        };
        let outcome = binding.is_dirty(frame);
        if outcome.is_stale() {
            warn!(
                "Binding {} of group {} is stale, scheduling a rebuild",
                binding.name(),
                binding.group()
            );
            binding.invalidate();
            self.rebuild_requested = true;
        }
        outcome
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty() && self.pending.is_empty()
    }

    /// Bindings merged by the last rebuild
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn groups(&self) -> &[ComponentGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&ComponentGroup> {
        self.group_index.get(name).map(|group_id| &self.groups[*group_id])
    }

    pub fn try_group(&self, name: &str) -> Result<&ComponentGroup, RegistryError> {
        self.group(name).ok_or_else(|| RegistryError::UnknownGroup {
            group: name.to_string(),
        })
    }

    pub fn binding(&self, index: usize) -> &Binding {
        self.try_binding(index)
            .expect("BindingRegistry::binding() failed. Use try_binding() to handle this case")
    }

    pub fn try_binding(&self, index: usize) -> Result<&Binding, RegistryError> {
        self.bindings
            .get(index)
            .ok_or(RegistryError::UnknownBinding { index })
    }

    pub fn binding_mut(&mut self, index: usize) -> &mut Binding {
        self.try_binding_mut(index)
            .expect("BindingRegistry::binding_mut() failed. Use try_binding_mut() to handle this case")
    }

    pub fn try_binding_mut(&mut self, index: usize) -> Result<&mut Binding, RegistryError> {
        self.bindings
            .get_mut(index)
            .ok_or(RegistryError::UnknownBinding { index })
    }

    /// Field binding of `group` using mask bit `bit`, synced or not
    pub fn field_binding(&self, group: &str, bit: u8) -> Option<usize> {
        self.field_index.get(&(group.to_string(), bit)).copied()
    }

    /// Whether any field binding of `group` exists
    pub fn has_field_group(&self, group: &str) -> bool {
        self.field_index.keys().any(|(name, _)| name == group)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Binding> {
        self.bindings.iter_mut()
    }

    /// Valid method bindings serving `command_name`
    pub fn method_bindings(&mut self, command_name: &str) -> Vec<usize> {
        let mut matching = Vec::new();
        for (index, binding) in self.bindings.iter_mut().enumerate() {
            if binding.is_method() && binding.name() == command_name && binding.is_valid() {
                matching.push(index);
            }
        }
        matching
    }
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
