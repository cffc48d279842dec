use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    message::{Attachment, Mailbox, Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use shared::{
    abstract_trait::MailTransportTrait,
    config::SmtpConfig,
    domain::requests::{EmailMessage, MailAttachment},
    errors::TransportError,
};
use tracing::{debug, info};

type SmtpTransport = AsyncSmtpTransport<Tokio1Executor>;

/// lettre-backed SMTP transport.
///
/// Connects without implicit TLS and upgrades with STARTTLS when the server
/// offers it. Certificate verification is disabled.
#[derive(Clone)]
pub struct LettreSmtpTransport {
    mailer: SmtpTransport,
}

impl LettreSmtpTransport {
    pub fn new(config: &SmtpConfig) -> Result<Self, TransportError> {
        let tls = TlsParameters::builder(config.host.clone())
            .dangerous_accept_invalid_certs(true)
            .build()
            .map_err(|e| TransportError::Connection(format!("invalid TLS parameters: {e}")))?;

        let mut builder = SmtpTransport::builder_dangerous(config.host.as_str())
            .port(config.port)
            .tls(Tls::Opportunistic(tls));

        if !config.user.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ));
        }

        info!(
            host = %config.host,
            port = config.port,
            user = %config.user,
            "SMTP transport created"
        );

        Ok(Self {
            mailer: builder.build(),
        })
    }
}

#[async_trait]
impl MailTransportTrait for LettreSmtpTransport {
    async fn verify(&self) -> Result<(), TransportError> {
        match self.mailer.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(TransportError::Connection(
                "server did not accept the connection".to_string(),
            )),
            Err(e) => Err(TransportError::Connection(e.to_string())),
        }
    }

    async fn send(&self, email: &EmailMessage) -> Result<(), TransportError> {
        let message = build_message(email)?;

        let response = self
            .mailer
            .send(message)
            .await
            .map_err(|e| TransportError::Delivery(e.to_string()))?;

        debug!(
            to = %email.to,
            code = %response.code(),
            "SMTP server accepted message"
        );

        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| TransportError::Address {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

fn octet_stream() -> ContentType {
    ContentType::parse("application/octet-stream").unwrap_or(ContentType::TEXT_PLAIN)
}

fn build_attachment(attachment: &MailAttachment) -> SinglePart {
    let content_type = attachment
        .content_type
        .as_deref()
        .and_then(|raw| ContentType::parse(raw).ok())
        .unwrap_or_else(octet_stream);

    let part = match attachment.content_id.as_ref() {
        Some(cid) if attachment.is_inline() => {
            Attachment::new_inline_with_name(cid.clone(), attachment.filename.clone())
        }
        _ => Attachment::new(attachment.filename.clone()),
    };

    part.body(attachment.content.clone().into_bytes(), content_type)
}

/// Converts a composed email into a lettre message. Plain HTML bodies are sent
/// as a single part; attachments switch to `multipart/mixed`.
pub fn build_message(email: &EmailMessage) -> Result<Message, TransportError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .to(parse_mailbox(&email.to)?)
        .subject(email.subject.clone());

    for cc in &email.cc {
        builder = builder.cc(parse_mailbox(cc)?);
    }
    for bcc in &email.bcc {
        builder = builder.bcc(parse_mailbox(bcc)?);
    }
    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(parse_mailbox(reply_to)?);
    }

    let built = if email.attachments.is_empty() {
        builder
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
    } else {
        let multipart = email.attachments.iter().fold(
            MultiPart::mixed().singlepart(SinglePart::html(email.html.clone())),
            |multipart, attachment| multipart.singlepart(build_attachment(attachment)),
        );
        builder.multipart(multipart)
    };

    built.map_err(|e| TransportError::Message(e.to_string()))
}
