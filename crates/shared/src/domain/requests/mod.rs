mod email;
mod notification;
mod test_email;

pub use self::email::{EmailMessage, MailAttachment};
pub use self::notification::{Attachment, Channel, EmailOptions, NotificationRequest, Recipients};
pub use self::test_email::TestEmailRequest;
