use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use warp::http::StatusCode;

use crate::schema::ValidationError;

#[macro_export]
macro_rules! error_response {
    ($error_code:expr) => {
        $crate::router::error::ErrorResponse::new(Some($error_code), None)
    };
    ($error_code:expr, $msg:expr) => {
        $crate::router::error::ErrorResponse::new(Some($error_code), Some($msg.to_string()))
    };
}

#[macro_export]
macro_rules! not_found {
    ($msg:expr) => {
        $crate::error_response!($crate::router::error::ErrorCode::NotFound, $msg)
    };
}

#[macro_export]
macro_rules! forbidden {
    () => {
        $crate::error_response!($crate::router::error::ErrorCode::Forbidden)
    };
    ($msg:expr) => {
        $crate::error_response!($crate::router::error::ErrorCode::Forbidden, $msg)
    };
}

#[macro_export]
macro_rules! bad_request {
    ($msg:expr) => {
        $crate::error_response!($crate::router::error::ErrorCode::BadRequest, $msg)
    };
}

#[macro_export]
macro_rules! invalid_request {
    ($msg:expr) => {
        $crate::error_response!($crate::router::error::ErrorCode::InvalidRequest, $msg)
    };
}

#[macro_export]
macro_rules! internal_server_error {
    () => {
        $crate::error_response!($crate::router::error::ErrorCode::InternalServerError)
    };
    ($msg:expr) => {
        $crate::error_response!($crate::router::error::ErrorCode::InternalServerError, $msg)
    };
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BadRequest = 400,
    Forbidden = 403,
    NotFound = 404,
    MethodNotAllowed = 405,
    InvalidRequest = 422,
    InternalServerError = 500,
}

impl ErrorCode {
    pub fn to_warp_status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidRequest => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> u16 {
        *self as u16
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::InvalidRequest => "Invalid Request",
            Self::InternalServerError => "Internal Server Error",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub status: ErrorCode,
    pub msg: Option<String>,
}

impl ErrorResponse {
    pub fn new(error_code: Option<ErrorCode>, msg: Option<String>) -> Self {
        let status = error_code.unwrap_or(ErrorCode::InternalServerError);
        Self { status, msg }
    }

    /// The message sent to the caller, falling back to the status reason.
    pub fn message(&self) -> &str {
        self.msg.as_deref().unwrap_or(self.status.reason())
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {:?}", self.message(), self.status)
    }
}

impl std::error::Error for ErrorResponse {}

/// Everything that can stop a call on its way through the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("malformed request body: {0}")]
    Decode(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("authentication failed")]
    Auth,
    #[error("unknown method `{0}`")]
    UnknownMethod(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<DispatchError> for ErrorResponse {
    fn from(err: DispatchError) -> Self {
        match err {
            e @ DispatchError::Decode(_) => bad_request!(e),
            DispatchError::Validation(e) => invalid_request!(e),
            DispatchError::Auth => forbidden!(),
            e @ DispatchError::UnknownMethod(_) => invalid_request!(e),
            DispatchError::Internal(e) => {
                tracing::error!(error = ?e, "unexpected error while handling request");
                internal_server_error!()
            }
        }
    }
}
