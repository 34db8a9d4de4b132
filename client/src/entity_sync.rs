use std::sync::Arc;

use log::{debug, info, warn};

use tether_shared::{
    apply_updates, build_updates, commit_updates, ArgValue, AuthorityGate, Binding,
    BindingDescriptor, BindingRegistry, CommandError, CommandOptions, ComponentUpdate,
    ComponentUpdates, Entity, FieldCell, IdentityTracker, InboundCommand, MessageTarget,
    OrphanAdoption, OriginCorrector, Protocol, ReceiverCell, RegistryError, SendSet,
    SimulationFrame,
};

use crate::{
    command_handler::CommandHandler,
    sync_context::SyncContext,
    transport::{EntityLifecycle, Transport},
};

/// Where an entity stands in the replication state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    /// No bindings yet
    Unbound,
    /// Local peer holds state authority and sends changes
    Tracking,
    /// Another peer holds state authority, received values are interpolated
    Observing,
}

/// Replication driver of one entity: owns its bindings, decides what to send
/// each tick, applies what is received and routes its commands.
pub struct EntitySync {
    entity: Entity,
    protocol: Arc<Protocol>,
    registry: BindingRegistry,
    identity: IdentityTracker,
    corrector: OriginCorrector,
    orphan_adoption: OrphanAdoption,
    commands: CommandHandler,
    state: SyncState,
    force_next_sync: bool,
    destroyed: bool,
    context: SyncContext,
}

impl EntitySync {
    pub fn new(entity: Entity, protocol: Arc<Protocol>) -> Self {
        let corrector = OriginCorrector::new(protocol.max_origin_delta);
        let orphan_adoption =
            OrphanAdoption::new(protocol.orphan_policy, protocol.adoption_cooldown);
        let commands = CommandHandler::new(protocol.clone());
        Self {
            entity,
            protocol,
            registry: BindingRegistry::new(),
            identity: IdentityTracker::new(),
            corrector,
            orphan_adoption,
            commands,
            state: SyncState::Unbound,
            force_next_sync: false,
            destroyed: false,
            context: SyncContext::new(),
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn context(&self) -> &SyncContext {
        &self.context
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub fn identity(&self) -> &IdentityTracker {
        &self.identity
    }

    pub fn identity_mut(&mut self) -> &mut IdentityTracker {
        &mut self.identity
    }

    // Bindings

    /// Queues a binding, it joins synchronization on the next tick
    pub fn add_binding(&mut self, binding: Binding) {
        self.registry.add(binding);
    }

    pub fn try_add_binding(&mut self, binding: Binding) -> Result<(), RegistryError> {
        self.registry.try_add(binding)
    }

    /// Binds a field backed by `cell`
    pub fn bind_field(
        &mut self,
        descriptor: BindingDescriptor,
        cell: &FieldCell,
    ) -> Result<(), RegistryError> {
        let binding = Binding::field(
            descriptor,
            cell.accessor(),
            self.protocol.interpolation.buffer_size,
        )?;
        self.registry.try_add(binding)
    }

    /// Binds `receiver` as the handler of `command` for component `group`
    pub fn bind_command(
        &mut self,
        group: &str,
        command: &str,
        receiver: &ReceiverCell,
    ) -> Result<(), RegistryError> {
        self.registry
            .try_add(Binding::method(group, command, receiver.accessor()))
    }

    /// Marks a binding as locally predicted, which exempts it from
    /// interpolation
    pub fn set_predicted(&mut self, group: &str, mask_bit: u8, predicted: bool) -> bool {
        self.registry.rebuild_if_requested();
        match self.registry.field_binding(group, mask_bit) {
            Some(index) => {
                self.registry.binding_mut(index).set_predicted(predicted);
                true
            }
            None => false,
        }
    }

    /// Every later tick, update and command becomes a no-op
    pub fn mark_destroyed(&mut self) {
        if !self.destroyed {
            debug!("{} tagged for destruction", self.entity);
        }
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // Tick

    /// Runs one tick: interpolate, pending change callbacks, sample, then
    /// sync and send
    pub fn tick(&mut self, transport: &mut dyn Transport, lifecycle: &mut dyn EntityLifecycle) {
        if self.destroyed {
            return;
        }
        self.context.ticks += 1;

        if self.registry.rebuild_if_requested() {
            self.context.rebuilds += 1;
        }

        let frame = transport.client_simulation_frame();
        let now = transport.time_as_double();
        let gate = AuthorityGate::new(lifecycle.entity_state(self.entity));
        self.update_state(&gate, frame);

        if let Some(state) = gate.state() {
            if self.orphan_adoption.poll(state, now) {
                info!("Requesting adoption of orphaned {}", self.entity);
                self.context.adoption_requests += 1;
                lifecycle.request_orphan_adoption(self.entity);
            }
        }

        // samples are stamped on the frame clock, render on it too
        if self.state == SyncState::Observing {
            self.interpolate(self.frame_time(frame) - self.protocol.interpolation.delay);
        }

        self.invoke_pending_callbacks();

        if self.state == SyncState::Tracking {
            self.sample(frame);
            self.sync_and_send(transport, frame, now);
        }
    }

    fn update_state(&mut self, gate: &AuthorityGate, frame: SimulationFrame) {
        let next = if self.registry.is_empty() {
            SyncState::Unbound
        } else if gate.has_state_authority() {
            SyncState::Tracking
        } else {
            SyncState::Observing
        };
        if next == self.state {
            return;
        }

        info!("{} moves from {:?} to {:?}", self.entity, self.state, next);
        match next {
            SyncState::Tracking => {
                self.force_next_sync = true;
            }
            SyncState::Observing => {
                let time = self.frame_time(frame);
                // history of the previous authority period no longer applies
                for binding in self.registry.iter_mut() {
                    binding.reset_tracking();
                    binding.seed_interpolation(frame, time);
                }
            }
            SyncState::Unbound => {}
        }
        self.state = next;
    }

    fn interpolate(&mut self, time: f64) {
        let max_extrapolation = self.protocol.interpolation.max_extrapolation;
        for binding in self.registry.iter_mut() {
            binding.interpolate(time, max_extrapolation);
        }
    }

    fn invoke_pending_callbacks(&mut self) {
        for binding in self.registry.iter_mut() {
            if binding.invoke_pending_callback() {
                self.context.callbacks_invoked += 1;
            }
        }
    }

    fn sample(&mut self, frame: SimulationFrame) {
        let time = self.frame_time(frame);
        let mut stale = false;
        for binding in self.registry.iter_mut() {
            if binding.is_method() {
                continue;
            }
            if !binding.is_valid() {
                stale = true;
                continue;
            }
            if let Err(err) = binding.sample(frame, time) {
                warn!(
                    "Cannot sample binding {} of group {}: {}",
                    binding.name(),
                    binding.group(),
                    err
                );
                binding.invalidate();
                stale = true;
            }
        }
        if stale {
            self.registry.request_rebuild();
        }
    }

    fn sync_and_send(&mut self, transport: &mut dyn Transport, frame: SimulationFrame, now: f64) {
        if !transport.can_send_updates(self.entity) {
            debug!("{} cannot send updates yet", self.entity);
            return;
        }

        let force = self.force_next_sync;
        let synthesized = build_updates(&mut self.registry, Some(&self.identity), frame, now, force);
        if synthesized.is_empty() {
            self.force_next_sync = false;
            return;
        }

        let mut batch = ComponentUpdates::new(self.entity, frame, transport.floating_origin());
        batch.updates = synthesized.updates.clone();

        match transport.send_component_updates(batch) {
            Ok(()) => {
                self.context.payloads_sent += synthesized.updates.len() as u64;
                self.context.fields_sent += synthesized.sent_fields().len() as u64;
                self.context.stops_sent += synthesized
                    .sent_fields()
                    .iter()
                    .filter(|sent| sent.stop_sent)
                    .count() as u64;
                if force {
                    self.context.forced_syncs += 1;
                }
                self.force_next_sync = false;
                commit_updates(&mut self.registry, Some(&mut self.identity), synthesized);
            }
            Err(err) => {
                self.context.send_failures += 1;
                warn!("Failed to send updates of {}: {}", self.entity, err);
            }
        }
    }

    /// Appends this tick's component updates to `out` and records them as
    /// sent. With `force`, every field is serialized. Returns whether
    /// anything was appended.
    pub fn get_component_updates(
        &mut self,
        out: &mut Vec<ComponentUpdate>,
        time: f64,
        frame: SimulationFrame,
        force: bool,
    ) -> bool {
        if self.destroyed {
            return false;
        }
        self.registry.rebuild_if_requested();

        let synthesized = build_updates(&mut self.registry, Some(&self.identity), frame, time, force);
        if synthesized.is_empty() {
            return false;
        }
        out.extend(synthesized.updates.iter().cloned());
        commit_updates(&mut self.registry, Some(&mut self.identity), synthesized);
        true
    }

    /// Applies updates received from the state authority. Ignored while the
    /// local peer holds state authority itself. Returns how many fields were
    /// received.
    pub fn apply_component_updates(
        &mut self,
        batch: &ComponentUpdates,
        transport: &dyn Transport,
        lifecycle: &dyn EntityLifecycle,
    ) -> usize {
        if self.destroyed {
            return 0;
        }
        if batch.entity != self.entity {
            warn!("{} received updates addressed to {}", self.entity, batch.entity);
            return 0;
        }

        let gate = AuthorityGate::new(lifecycle.entity_state(self.entity));
        if gate.has_state_authority() {
            debug!(
                "{} ignores updates for frame {}, it holds state authority",
                self.entity, batch.frame
            );
            return 0;
        }

        if self.registry.rebuild_if_requested() {
            self.context.rebuilds += 1;
        }
        let time = self.frame_time(batch.frame);
        let received = apply_updates(
            &mut self.registry,
            &mut self.identity,
            batch,
            time,
            &self.corrector,
            transport.floating_origin(),
        );
        self.context.updates_received += batch.updates.len() as u64;
        self.context.fields_received += received as u64;
        received
    }

    // Commands

    /// Sends a command, logging failures. Returns whether it succeeded.
    #[allow(clippy::too_many_arguments)]
    pub fn send_command(
        &mut self,
        transport: &mut dyn Transport,
        lifecycle: &dyn EntityLifecycle,
        type_name: &str,
        method: &str,
        target: MessageTarget,
        options: &CommandOptions,
        args: &[ArgValue],
    ) -> bool {
        self.try_send_command(transport, lifecycle, type_name, method, target, options, args)
            .is_ok()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn try_send_command(
        &mut self,
        transport: &mut dyn Transport,
        lifecycle: &dyn EntityLifecycle,
        type_name: &str,
        method: &str,
        target: MessageTarget,
        options: &CommandOptions,
        args: &[ArgValue],
    ) -> Result<SendSet, CommandError> {
        if self.destroyed {
            debug!("{} is destroyed, dropping {}.{}", self.entity, type_name, method);
            return Ok(SendSet::NONE);
        }
        self.registry.rebuild_if_requested();

        let gate = AuthorityGate::new(lifecycle.entity_state(self.entity));
        let result = self.commands.send(
            self.entity,
            &mut self.registry,
            &gate,
            transport,
            type_name,
            method,
            target,
            options,
            args,
        );
        match &result {
            Ok(send_set) => {
                if send_set.others {
                    self.context.commands_sent += 1;
                }
                if send_set.local {
                    self.context.commands_invoked += 1;
                }
            }
            Err(_) => self.context.commands_dropped += 1,
        }
        result
    }

    /// Dispatches a command received from another peer. Returns how many
    /// bindings ran it.
    pub fn handle_command(
        &mut self,
        inbound: &InboundCommand,
        lifecycle: &dyn EntityLifecycle,
    ) -> Result<usize, CommandError> {
        if self.destroyed {
            return Ok(0);
        }
        self.registry.rebuild_if_requested();

        let gate = AuthorityGate::new(lifecycle.entity_state(self.entity));
        let result = self.commands.handle(&mut self.registry, &gate, inbound);
        match &result {
            Ok(0) | Err(_) => self.context.commands_dropped += 1,
            Ok(_) => self.context.commands_invoked += 1,
        }
        result
    }

    fn frame_time(&self, frame: SimulationFrame) -> f64 {
        frame as f64 * self.protocol.tick_seconds()
    }
}
