use std::time::Duration;

use crate::{
    messages::{
        command_codec::DEFAULT_MAX_COMMAND_BYTES,
        command_schema::{CommandRegistry, TypeDescriptor},
    },
    world::{
        delegation::orphan_adoption::OrphanPolicy,
        origin::floating_origin::DEFAULT_MAX_ORIGIN_DELTA,
        remote::interpolation::InterpolationSettings,
    },
};

pub mod error;
pub use error::ProtocolError;

// Protocol Plugin
pub trait ProtocolPlugin {
    fn build(&self, protocol: &mut Protocol);
}

// Protocol
pub struct Protocol {
    /// Networked types and the commands they declare
    pub commands: CommandRegistry,
    /// Interpolation of observed entities
    pub interpolation: InterpolationSettings,
    pub orphan_policy: OrphanPolicy,
    /// Minimum seconds between two adoption requests for one entity
    pub adoption_cooldown: f64,
    /// Largest floating origin shift applied to received positions
    pub max_origin_delta: f64,
    /// Largest encoded command argument payload, in bytes
    pub max_command_bytes: usize,
    /// The duration between each tick
    pub tick_interval: Duration,
    locked: bool,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            commands: CommandRegistry::new(),
            interpolation: InterpolationSettings::default(),
            orphan_policy: OrphanPolicy::Ignore,
            adoption_cooldown: 1.0,
            max_origin_delta: DEFAULT_MAX_ORIGIN_DELTA,
            max_command_bytes: DEFAULT_MAX_COMMAND_BYTES,
            tick_interval: Duration::from_millis(50),
            locked: false,
        }
    }
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> &mut Self {
        self.check_lock();
        plugin.build(self);
        self
    }

    pub fn add_type(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.check_lock();
        self.commands.add_type(descriptor);
        self
    }

    pub fn interpolation(&mut self, settings: InterpolationSettings) -> &mut Self {
        self.check_lock();
        self.interpolation = settings;
        self
    }

    pub fn orphan_policy(&mut self, policy: OrphanPolicy) -> &mut Self {
        self.check_lock();
        self.orphan_policy = policy;
        self
    }

    pub fn adoption_cooldown(&mut self, seconds: f64) -> &mut Self {
        self.check_lock();
        self.adoption_cooldown = seconds;
        self
    }

    pub fn max_origin_delta(&mut self, max_delta: f64) -> &mut Self {
        self.check_lock();
        self.max_origin_delta = max_delta;
        self
    }

    pub fn max_command_bytes(&mut self, max_bytes: usize) -> &mut Self {
        self.check_lock();
        self.max_command_bytes = max_bytes;
        self
    }

    pub fn tick_interval(&mut self, duration: Duration) -> &mut Self {
        self.check_lock();
        self.tick_interval = duration;
        self
    }

    // Non-panicking builder methods

    pub fn try_add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        plugin.build(self);
        Ok(self)
    }

    pub fn try_add_type(&mut self, descriptor: TypeDescriptor) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.commands.add_type(descriptor);
        Ok(self)
    }

    pub fn try_interpolation(&mut self, settings: InterpolationSettings) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.interpolation = settings;
        Ok(self)
    }

    pub fn try_orphan_policy(&mut self, policy: OrphanPolicy) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.orphan_policy = policy;
        Ok(self)
    }

    pub fn try_adoption_cooldown(&mut self, seconds: f64) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.adoption_cooldown = seconds;
        Ok(self)
    }

    pub fn try_max_origin_delta(&mut self, max_delta: f64) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.max_origin_delta = max_delta;
        Ok(self)
    }

    pub fn try_max_command_bytes(&mut self, max_bytes: usize) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.max_command_bytes = max_bytes;
        Ok(self)
    }

    pub fn try_tick_interval(&mut self, duration: Duration) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.tick_interval = duration;
        Ok(self)
    }

    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;
        self.locked = true;
        Ok(())
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns Err if protocol is locked
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Panics if protocol is locked
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    /// Seconds of simulation covered by one tick
    pub fn tick_seconds(&self) -> f64 {
        self.tick_interval.as_secs_f64()
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
