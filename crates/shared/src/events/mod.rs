use std::collections::HashMap;
use tracing::{debug, error, info};

use crate::abstract_trait::DynSubscriber;
use crate::domain::event::DomainEvent;
use crate::errors::ServiceError;

/// In-process event bus. Subscribers are registered during wiring and the bus
/// is shared read-only afterwards.
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<String, Vec<DynSubscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: DynSubscriber) {
        let event_name = subscriber.event_name().to_string();

        info!(
            "Subscriber registered: id={}, event={}",
            subscriber.subscriber_id(),
            event_name
        );

        self.subscribers
            .entry(event_name)
            .or_default()
            .push(subscriber);
    }

    pub fn subscriber_count(&self, event_name: &str) -> usize {
        self.subscribers.get(event_name).map_or(0, Vec::len)
    }

    /// Runs every subscriber of `event` in registration order. All subscribers
    /// run even if one fails; the first failure is returned.
    pub async fn emit(&self, event: &DomainEvent) -> Result<(), ServiceError> {
        let Some(subscribers) = self.subscribers.get(&event.name) else {
            debug!("No subscribers for event {}", event.name);
            return Ok(());
        };

        let mut first_error = None;

        for subscriber in subscribers {
            match subscriber.handle(event).await {
                Ok(()) => {
                    debug!(
                        "Subscriber {} handled event {}",
                        subscriber.subscriber_id(),
                        event.name
                    );
                }
                Err(e) => {
                    error!(
                        subscriber = subscriber.subscriber_id(),
                        event = %event.name,
                        kind = %e.kind(),
                        "Subscriber failed: {e}"
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
