use crate::errors::{error::ErrorResponse, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidData(msg) => HttpError::BadRequest(msg),
            ServiceError::UnexpectedState(msg) => HttpError::Internal(msg),
        }
    }
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (kind, msg) = match self {
            HttpError::BadRequest(msg) => ("invalid_data", msg),
            HttpError::Internal(msg) => ("unexpected_state", msg),
        };

        let body = Json(ErrorResponse {
            status: "error".into(),
            kind: kind.into(),
            message: msg,
        });

        (status, body).into_response()
    }
}
