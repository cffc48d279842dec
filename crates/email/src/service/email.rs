use crate::templates::{TemplateKey, generate_email_template};
use async_trait::async_trait;
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, Status as SpanStatus, TraceContextExt, Tracer},
};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynMailTransport, NotificationProviderTrait},
    domain::requests::{
        Channel, EmailMessage, MailAttachment, NotificationRequest, Recipients,
    },
    errors::{ErrorKind, ServiceError},
    utils::{Metrics, Status, TracingContext},
};
use tokio::time::Instant;
use tracing::{error, info, warn};

pub const SMTP_PROVIDER_ID: &str = "smtp-notification-provider";
pub const DEFAULT_SUBJECT: &str = "You have a new notification";
const DEFAULT_DISPOSITION: &str = "attachment";

/// Email notification provider delivering rendered templates over SMTP.
pub struct SmtpNotificationProvider {
    from: String,
    transport: DynMailTransport,
    metrics: Metrics,
}

impl SmtpNotificationProvider {
    /// Builds the provider and checks the SMTP connection once. A failed check
    /// is logged only; sends will surface the problem if it persists.
    pub async fn new(
        from: impl Into<String>,
        transport: DynMailTransport,
        metrics: Metrics,
        registry: &mut Registry,
    ) -> Self {
        metrics.register("smtp_notification_provider", registry);

        let provider = Self {
            from: from.into(),
            transport,
            metrics,
        };

        match provider.transport.verify().await {
            Ok(()) => info!("SMTP connection verified successfully"),
            Err(e) => error!(error = %e, "SMTP verification failed"),
        }

        provider
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer(SMTP_PROVIDER_ID)
    }

    fn start_tracing(&self, operation_name: &str, attributes: Vec<KeyValue>) -> TracingContext {
        let start_time = Instant::now();
        let tracer = self.get_tracer();
        let mut span = tracer
            .span_builder(operation_name.to_string())
            .with_kind(SpanKind::Client)
            .with_attributes(attributes)
            .start(&tracer);

        span.add_event(
            "Operation started",
            vec![KeyValue::new("operation", operation_name.to_string())],
        );

        let cx = Context::current_with_span(span);
        TracingContext { cx, start_time }
    }

    fn complete_tracing(&self, tracing_ctx: &TracingContext, template: &str, result: &Result<(), ServiceError>) {
        let elapsed = tracing_ctx.start_time.elapsed().as_secs_f64();
        let span = tracing_ctx.cx.span();

        let status = match result {
            Ok(()) => {
                span.set_status(SpanStatus::Ok);
                Status::Success
            }
            Err(e) => {
                span.set_status(SpanStatus::error(e.to_string()));
                match e.kind() {
                    ErrorKind::InvalidData => Status::InvalidData,
                    ErrorKind::UnexpectedState => Status::Error,
                }
            }
        };

        span.add_event(
            "Operation completed",
            vec![
                KeyValue::new("status", format!("{status:?}")),
                KeyValue::new("duration_secs", elapsed.to_string()),
            ],
        );

        self.metrics.record(template, status, elapsed);
        span.end();
    }

    /// Builds the outbound message for an already rendered body.
    pub fn compose(&self, notification: &NotificationRequest, html: String) -> EmailMessage {
        let options = notification.email_options();

        let from = notification
            .from
            .as_deref()
            .map(str::trim)
            .filter(|from| !from.is_empty())
            .unwrap_or(&self.from)
            .to_string();

        let attachments = notification
            .attachments
            .iter()
            .flatten()
            .map(|attachment| MailAttachment {
                content: attachment.content.clone(),
                filename: attachment.filename.clone(),
                content_type: attachment.content_type.clone(),
                disposition: attachment
                    .disposition
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DISPOSITION.to_string()),
                content_id: attachment.id.clone(),
            })
            .collect();

        EmailMessage {
            from,
            to: notification.to.clone(),
            subject: options
                .subject
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            html,
            cc: options.cc.map(Recipients::into_vec).unwrap_or_default(),
            bcc: options.bcc.map(Recipients::into_vec).unwrap_or_default(),
            reply_to: options.reply_to,
            attachments,
        }
    }

    async fn deliver(&self, notification: &NotificationRequest) -> Result<(), ServiceError> {
        if notification.channel == Channel::Sms {
            return Err(ServiceError::invalid_data("SMS notification not supported"));
        }

        let template = generate_email_template(&notification.template, &notification.data)?;

        let html = template.render().map_err(|e| {
            error!(
                template = %notification.template,
                error = %e,
                "Error generating email content"
            );
            ServiceError::unexpected_state(format!(
                "Failed to generate email content for template: {}",
                notification.template
            ))
        })?;

        let message = self.compose(notification, html);

        info!(
            to = %message.to,
            from = %message.from,
            subject = %message.subject,
            template = %notification.template,
            "Sending email"
        );

        self.transport.send(&message).await.map_err(|e| {
            error!(
                template = %notification.template,
                to = %notification.to,
                error = %e,
                "Failed to send email"
            );
            ServiceError::unexpected_state(format!(
                "Failed to send \"{}\" email to {} via SMTP: {e}",
                notification.template, notification.to
            ))
        })?;

        info!(
            template = %notification.template,
            to = %notification.to,
            "Email sent successfully"
        );

        Ok(())
    }
}

#[async_trait]
impl NotificationProviderTrait for SmtpNotificationProvider {
    fn identifier(&self) -> &'static str {
        SMTP_PROVIDER_ID
    }

    async fn send(&self, notification: &NotificationRequest) -> Result<(), ServiceError> {
        // Unknown keys share one label so the metric family stays bounded.
        let template_label = notification
            .template
            .parse::<TemplateKey>()
            .map(|key| key.as_str())
            .unwrap_or("unknown");

        let tracing_ctx = self.start_tracing(
            "SendNotification",
            vec![
                KeyValue::new("template", template_label),
                KeyValue::new("channel", notification.channel.as_str()),
            ],
        );

        let result = self.deliver(notification).await;

        if let Err(e) = &result {
            warn!(kind = %e.kind(), template = template_label, "notification rejected: {e}");
        }

        self.complete_tracing(&tracing_ctx, template_label, &result);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use shared::{
        abstract_trait::MailTransportTrait, domain::requests::Attachment, errors::TransportError,
    };
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<EmailMessage>>,
        fail_with: Option<TransportError>,
        fail_verify: bool,
    }

    impl RecordingTransport {
        fn sent(&self) -> Vec<EmailMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MailTransportTrait for RecordingTransport {
        async fn verify(&self) -> Result<(), TransportError> {
            if self.fail_verify {
                Err(TransportError::Connection("connection refused".into()))
            } else {
                Ok(())
            }
        }

        async fn send(&self, message: &EmailMessage) -> Result<(), TransportError> {
            self.sent.lock().unwrap().push(message.clone());
            match &self.fail_with {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    async fn provider_with(transport: Arc<RecordingTransport>) -> SmtpNotificationProvider {
        let mut registry = Registry::default();
        SmtpNotificationProvider::new(
            "shop@example.com",
            transport,
            Metrics::new(),
            &mut registry,
        )
        .await
    }

    fn password_reset_request() -> NotificationRequest {
        NotificationRequest::email(
            "user@example.com",
            "password-reset",
            json!({
                "resetLink": "https://x/y",
                "email": "user@example.com",
                "emailOptions": { "subject": "Reset Your Password", "replyTo": "support@example.com" },
            }),
        )
    }

    #[tokio::test]
    async fn sms_is_rejected_without_touching_the_transport() {
        let transport = Arc::new(RecordingTransport::default());
        let provider = provider_with(transport.clone()).await;

        let mut request = password_reset_request();
        request.channel = Channel::Sms;

        let err = provider.send(&request).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn unknown_template_is_invalid_data_naming_the_key() {
        let transport = Arc::new(RecordingTransport::default());
        let provider = provider_with(transport.clone()).await;

        let mut request = password_reset_request();
        request.template = "gift-card".into();

        let err = provider.send(&request).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.message().contains("gift-card"));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn invalid_template_data_never_reaches_the_transport() {
        let transport = Arc::new(RecordingTransport::default());
        let provider = provider_with(transport.clone()).await;

        let mut request = password_reset_request();
        request.data = json!({ "email": "user@example.com", "emailOptions": {} });

        let err = provider.send(&request).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.message().contains("password-reset"));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn password_reset_is_composed_and_delivered() {
        let transport = Arc::new(RecordingTransport::default());
        let provider = provider_with(transport.clone()).await;

        provider.send(&password_reset_request()).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);

        let message = &sent[0];
        assert_eq!(message.to, "user@example.com");
        assert_eq!(message.from, "shop@example.com");
        assert_eq!(message.subject, "Reset Your Password");
        assert_eq!(message.reply_to.as_deref(), Some("support@example.com"));
        assert!(message.html.contains("https://x/y"));
        assert!(message.attachments.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_becomes_unexpected_state() {
        let failure = TransportError::Delivery("550 mailbox unavailable".into());
        let transport = Arc::new(RecordingTransport {
            fail_with: Some(failure.clone()),
            ..Default::default()
        });
        let provider = provider_with(transport.clone()).await;

        let err = provider.send(&password_reset_request()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnexpectedState);
        assert!(err.message().contains("password-reset"));
        assert!(err.message().contains("user@example.com"));
        assert_ne!(err.message(), failure.to_string());
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn identical_sends_are_delivered_independently() {
        let transport = Arc::new(RecordingTransport::default());
        let provider = provider_with(transport.clone()).await;
        let request = password_reset_request();

        provider.send(&request).await.unwrap();
        provider.send(&request).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
    }

    #[tokio::test]
    async fn failed_verification_does_not_prevent_construction() {
        let transport = Arc::new(RecordingTransport {
            fail_verify: true,
            ..Default::default()
        });
        let provider = provider_with(transport.clone()).await;

        assert!(provider.send(&password_reset_request()).await.is_ok());
        assert_eq!(provider.identifier(), SMTP_PROVIDER_ID);
    }

    #[tokio::test]
    async fn concurrent_sends_share_one_transport() {
        let transport = Arc::new(RecordingTransport::default());
        let provider = provider_with(transport.clone()).await;

        let requests: Vec<NotificationRequest> = (0..4)
            .map(|i| {
                let mut request = password_reset_request();
                request.to = format!("user{i}@example.com");
                request
            })
            .collect();

        let (a, b, c, d) = tokio::join!(
            provider.send(&requests[0]),
            provider.send(&requests[1]),
            provider.send(&requests[2]),
            provider.send(&requests[3]),
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok() && d.is_ok());

        let mut recipients: Vec<String> = transport.sent().into_iter().map(|m| m.to).collect();
        recipients.sort();
        assert_eq!(
            recipients,
            vec![
                "user0@example.com",
                "user1@example.com",
                "user2@example.com",
                "user3@example.com",
            ]
        );
    }

    #[tokio::test]
    async fn malformed_email_options_send_with_default_subject() {
        let transport = Arc::new(RecordingTransport::default());
        let provider = provider_with(transport.clone()).await;

        for options in [json!(null), json!({ "subject": 42 })] {
            let mut request = password_reset_request();
            request.data["emailOptions"] = options;
            provider.send(&request).await.unwrap();
        }

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|m| m.subject == DEFAULT_SUBJECT));
        assert!(sent.iter().all(|m| m.html.contains("https://x/y")));
    }

    #[tokio::test]
    async fn compose_applies_defaults_and_overrides() {
        let provider = provider_with(Arc::new(RecordingTransport::default())).await;

        let mut request = NotificationRequest::email(
            "user@example.com",
            "invite-user",
            json!({
                "inviteLink": "https://admin.test/invite",
                "emailOptions": { "cc": "a@example.com", "bcc": ["b@example.com", "c@example.com"] },
            }),
        );
        request.from = Some("  team@example.com ".into());
        request.attachments = Some(vec![
            Attachment {
                content: "data".into(),
                filename: "invoice.pdf".into(),
                content_type: Some("application/pdf".into()),
                disposition: None,
                id: Some("inv-1".into()),
            },
            Attachment {
                content: "logo".into(),
                filename: "logo.png".into(),
                content_type: None,
                disposition: Some("inline".into()),
                id: Some("logo".into()),
            },
        ]);

        let message = provider.compose(&request, "<p>hi</p>".into());

        assert_eq!(message.from, "team@example.com");
        assert_eq!(message.subject, DEFAULT_SUBJECT);
        assert_eq!(message.cc, vec!["a@example.com"]);
        assert_eq!(message.bcc, vec!["b@example.com", "c@example.com"]);
        assert_eq!(message.attachments.len(), 2);
        assert_eq!(message.attachments[0].disposition, "attachment");
        assert_eq!(message.attachments[0].content_id.as_deref(), Some("inv-1"));
        assert_eq!(message.attachments[0].content_type.as_deref(), Some("application/pdf"));
        assert!(message.attachments[1].is_inline());
    }

    #[tokio::test]
    async fn blank_sender_override_falls_back_to_configured_address() {
        let provider = provider_with(Arc::new(RecordingTransport::default())).await;

        let mut request = password_reset_request();
        request.from = Some("   ".into());

        let message = provider.compose(&request, String::new());
        assert_eq!(message.from, "shop@example.com");
    }
}
