use crate::{domain::event::DomainEvent, errors::ServiceError};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynSubscriber = Arc<dyn SubscriberTrait>;

#[async_trait]
pub trait SubscriberTrait: Send + Sync {
    fn event_name(&self) -> &'static str;

    fn subscriber_id(&self) -> &'static str;

    async fn handle(&self, event: &DomainEvent) -> Result<(), ServiceError>;
}
