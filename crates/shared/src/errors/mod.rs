mod error;
mod http;
mod service;
mod transport;

pub use self::error::ErrorResponse;
pub use self::http::HttpError;
pub use self::service::{ErrorKind, ServiceError};
pub use self::transport::TransportError;
