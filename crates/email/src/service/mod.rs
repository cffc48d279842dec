mod email;
mod notification;
mod transport;

pub use self::email::{DEFAULT_SUBJECT, SMTP_PROVIDER_ID, SmtpNotificationProvider};
pub use self::notification::NotificationModuleService;
pub use self::transport::{LettreSmtpTransport, build_message};
