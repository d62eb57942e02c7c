use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use santa_core::draw::LookupError;
use santa_core::registry::RegistrationError;
use santa_core::{AuthError, DrawError, StoreError};
use santa_types::api::StatusResponse;

/// Handler failure, rendered as `{"success": false, "message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            Self::Internal(detail) => {
                // Details go to the log, never to the client.
                error!("Request failed: {}", detail);
                "Internal server error".to_string()
            }
            Self::BadRequest(m) | Self::Unauthorized(m) | Self::NotFound(m) | Self::Conflict(m) => m,
        };

        (status, Json(StatusResponse::failed(message))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateIdentity(_) => Self::Conflict("This email is already registered".into()),
            StoreError::Backend(e) => Self::Internal(format!("{e:#}")),
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(e: RegistrationError) -> Self {
        match e {
            RegistrationError::MissingFields | RegistrationError::InvalidEmail => {
                Self::BadRequest(e.to_string())
            }
            RegistrationError::DuplicateIdentity => Self::Conflict(e.to_string()),
            RegistrationError::Store(e) => e.into(),
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::MissingEmail => Self::BadRequest(e.to_string()),
            LookupError::NoAssignment | LookupError::GifteeMissing => Self::NotFound(e.to_string()),
            LookupError::Store(e) => e.into(),
        }
    }
}

impl From<DrawError> for ApiError {
    fn from(e: DrawError) -> Self {
        match e {
            DrawError::InsufficientParticipants { .. }
            | DrawError::DuplicateIdentity(_)
            | DrawError::GenerationExhausted { .. } => Self::BadRequest(e.to_string()),
            DrawError::Store(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidPassphrase | AuthError::InvalidToken => Self::Unauthorized(e.to_string()),
            AuthError::MalformedHash | AuthError::Token(_) => Self::Internal(e.to_string()),
        }
    }
}
