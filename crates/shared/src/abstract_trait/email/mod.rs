use crate::{domain::requests::EmailMessage, errors::TransportError};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynMailTransport = Arc<dyn MailTransportTrait>;

/// Delivers composed messages to a mail server.
#[async_trait]
pub trait MailTransportTrait: Send + Sync {
    /// Opens a session and checks the server accepts it.
    async fn verify(&self) -> Result<(), TransportError>;

    async fn send(&self, message: &EmailMessage) -> Result<(), TransportError>;
}
