use std::sync::{Arc, RwLock, Weak};

use crate::{messages::command_metadata::CommandMetadata, FieldValue};

/// Local handler of a command. Arguments are already validated and
/// normalized: they match the registered parameter types and never contain
/// nulls.
pub trait CommandReceiver: Send + Sync {
    fn receive(&mut self, metadata: &CommandMetadata, args: &[FieldValue]);
}

impl<F> CommandReceiver for F
where
    F: FnMut(&CommandMetadata, &[FieldValue]) + Send + Sync,
{
    fn receive(&mut self, metadata: &CommandMetadata, args: &[FieldValue]) {
        self(metadata, args)
    }
}

// ReceiverCell
/// Game-side owner of a command receiver, bindings hold a weak accessor
#[derive(Clone)]
pub struct ReceiverCell {
    data: Arc<RwLock<dyn CommandReceiver>>,
}

impl ReceiverCell {
    pub fn new<R: CommandReceiver + 'static>(receiver: R) -> Self {
        let data: Arc<RwLock<dyn CommandReceiver>> = Arc::new(RwLock::new(receiver));
        Self { data }
    }

    pub fn accessor(&self) -> ReceiverAccessor {
        ReceiverAccessor {
            data: Arc::downgrade(&self.data),
        }
    }
}

// ReceiverAccessor
#[derive(Clone)]
pub struct ReceiverAccessor {
    data: Weak<RwLock<dyn CommandReceiver>>,
}

impl ReceiverAccessor {
    pub fn is_alive(&self) -> bool {
        self.data.strong_count() > 0
    }

    /// Invokes the receiver, returns false when it is gone or poisoned
    pub fn invoke(&self, metadata: &CommandMetadata, args: &[FieldValue]) -> bool {
        let Some(data) = self.data.upgrade() else {
            return false;
        };
        let Ok(mut receiver) = data.write() else {
            return false;
        };
        receiver.receive(metadata, args);
        true
    }
}
