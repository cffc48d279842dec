mod email;
mod notification;
mod subscriber;

pub use self::email::{DynMailTransport, MailTransportTrait};
pub use self::notification::{
    DynNotificationProvider, DynNotificationService, NotificationProviderTrait,
    NotificationServiceTrait,
};
pub use self::subscriber::{DynSubscriber, SubscriberTrait};
