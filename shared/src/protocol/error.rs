use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A builder method ran after `Protocol::lock()`. Command schemas and
    /// sync settings are shared by every `EntitySync` from then on.
    #[error("Cannot change a locked Protocol: command types and sync settings are frozen once Protocol::lock() runs")]
    AlreadyLocked,
}
