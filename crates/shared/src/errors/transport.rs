use thiserror::Error;

/// Failure reported by a mail transport. Never returned to callers of the
/// provider directly; the provider folds it into a `ServiceError`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("invalid address {address:?}: {reason}")]
    Address { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("smtp delivery failed: {0}")]
    Delivery(String),

    #[error("smtp connection failed: {0}")]
    Connection(String),
}
