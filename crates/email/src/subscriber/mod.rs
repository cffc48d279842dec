mod password_reset;

pub use self::password_reset::{PASSWORD_RESET_SUBSCRIBER_ID, PasswordResetSubscriber, reset_link};
