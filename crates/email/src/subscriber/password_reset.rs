use crate::templates::{PASSWORD_RESET, PasswordResetTemplateData};
use async_trait::async_trait;
use shared::{
    abstract_trait::{DynNotificationService, SubscriberTrait},
    domain::{
        event::{DomainEvent, PASSWORD_RESET_EVENT, PasswordResetEvent},
        requests::{EmailOptions, NotificationRequest},
    },
    errors::ServiceError,
};
use tracing::{info, warn};

pub const PASSWORD_RESET_SUBSCRIBER_ID: &str = "password-reset-handler";
const RESET_SUBJECT: &str = "Reset Your Password";
const RESET_PREVIEW: &str = "Reset your password request";

/// Link embedded in the password reset email. The token is appended as is.
pub fn reset_link(backend_url: &str, token: &str) -> String {
    format!("{backend_url}/app/reset-password?token={token}")
}

/// Sends the password reset email when the host reports a reset request.
pub struct PasswordResetSubscriber {
    notifications: DynNotificationService,
    backend_url: String,
    reply_to: String,
}

impl PasswordResetSubscriber {
    pub fn new(
        notifications: DynNotificationService,
        backend_url: impl Into<String>,
        reply_to: impl Into<String>,
    ) -> Self {
        Self {
            notifications,
            backend_url: backend_url.into(),
            reply_to: reply_to.into(),
        }
    }

    fn build_request(&self, email: &str, token: &str) -> Result<NotificationRequest, ServiceError> {
        let data = PasswordResetTemplateData {
            reset_link: reset_link(&self.backend_url, token),
            email: email.to_string(),
            email_options: EmailOptions {
                subject: Some(RESET_SUBJECT.to_string()),
                reply_to: Some(self.reply_to.clone()),
                ..Default::default()
            },
            preview: Some(RESET_PREVIEW.to_string()),
        };

        let data = serde_json::to_value(data).map_err(|e| {
            ServiceError::unexpected_state(format!("Failed to encode password reset data: {e}"))
        })?;

        Ok(NotificationRequest::email(email, PASSWORD_RESET, data))
    }
}

#[async_trait]
impl SubscriberTrait for PasswordResetSubscriber {
    fn event_name(&self) -> &'static str {
        PASSWORD_RESET_EVENT
    }

    fn subscriber_id(&self) -> &'static str {
        PASSWORD_RESET_SUBSCRIBER_ID
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), ServiceError> {
        let payload: PasswordResetEvent = match &event.data {
            serde_json::Value::Null => PasswordResetEvent::default(),
            data => serde_json::from_value(data.clone()).map_err(|e| {
                ServiceError::invalid_data(format!("Invalid password reset event: {e}"))
            })?,
        };

        let Some(email) = payload.entity_id.filter(|id| !id.trim().is_empty()) else {
            warn!("No email provided for password reset event, skipping");
            return Ok(());
        };

        let token = payload
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ServiceError::invalid_data("Password reset event has no token"))?;

        let request = self.build_request(&email, &token)?;

        self.notifications.create_notification(request).await?;

        info!(
            actor_type = payload.actor_type.as_deref().unwrap_or("unknown"),
            "Password reset email dispatched to {email}"
        );

        Ok(())
    }
}
