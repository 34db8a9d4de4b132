use thiserror::Error;

/// Errors a transport reports back to the sync core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No session to send on
    #[error("Transport is not connected")]
    NotConnected,

    /// Transport refused the payload
    #[error("Transport rejected the payload: {reason}")]
    Rejected { reason: String },
}
