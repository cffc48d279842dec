use async_trait::async_trait;
use shared::{
    abstract_trait::{DynNotificationProvider, NotificationServiceTrait},
    domain::requests::{Channel, NotificationRequest},
    errors::ServiceError,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// Routes notification requests to the provider registered for their channel.
#[derive(Default)]
pub struct NotificationModuleService {
    providers: HashMap<Channel, DynNotificationProvider>,
}

impl NotificationModuleService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, channels: &[Channel], provider: DynNotificationProvider) {
        for channel in channels {
            info!(
                "Notification provider registered: id={}, channel={}",
                provider.identifier(),
                channel
            );
            self.providers.insert(*channel, provider.clone());
        }
    }

    pub fn provider_for(&self, channel: Channel) -> Option<&DynNotificationProvider> {
        self.providers.get(&channel)
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationModuleService {
    async fn create_notification(&self, request: NotificationRequest) -> Result<(), ServiceError> {
        let provider = self.provider_for(request.channel).ok_or_else(|| {
            ServiceError::invalid_data(format!(
                "No notification provider configured for channel: {}",
                request.channel
            ))
        })?;

        debug!(
            provider = provider.identifier(),
            template = %request.template,
            "Dispatching notification"
        );

        provider.send(&request).await
    }
}
