use crate::{domain::requests::NotificationRequest, errors::ServiceError};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynNotificationProvider = Arc<dyn NotificationProviderTrait>;
pub type DynNotificationService = Arc<dyn NotificationServiceTrait>;

#[async_trait]
pub trait NotificationProviderTrait: Send + Sync {
    fn identifier(&self) -> &'static str;

    async fn send(&self, notification: &NotificationRequest) -> Result<(), ServiceError>;
}

/// Dispatch entry point used by subscribers and HTTP handlers.
#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    async fn create_notification(&self, request: NotificationRequest) -> Result<(), ServiceError>;
}
