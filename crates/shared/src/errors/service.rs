use std::fmt;
use thiserror::Error;

/// Label carried by every [`ServiceError`], stable across message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidData,
    UnexpectedState,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidData => "invalid_data",
            ErrorKind::UnexpectedState => "unexpected_state",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request or its payload was rejected before any delivery attempt.
    #[error("{0}")]
    InvalidData(String),

    /// Rendering or delivery failed after the request was accepted.
    #[error("{0}")]
    UnexpectedState(String),
}

impl ServiceError {
    pub fn invalid_data(message: impl Into<String>) -> Self {
        ServiceError::InvalidData(message.into())
    }

    pub fn unexpected_state(message: impl Into<String>) -> Self {
        ServiceError::UnexpectedState(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidData(_) => ErrorKind::InvalidData,
            ServiceError::UnexpectedState(_) => ErrorKind::UnexpectedState,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::InvalidData(msg) | ServiceError::UnexpectedState(msg) => msg,
        }
    }
}
