//! Error kinds surfaced by the provisioning core and the HTTP handlers.
//!
//! Every variant renders as `{"error": "<message>"}`; the status code reflects
//! the failure class (see [`ServiceError::status_code`]).

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::requests::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The identity endpoint rejected the client credentials or answered
    /// without a usable `access_token`.
    #[error("authentication with Microsoft identity failed: {0}")]
    Auth(String),
    #[error("{0}")]
    Validation(String),
    /// Graph refused a folder creation for a reason other than the name
    /// already existing.
    #[error("could not create folder `{path}`: {reason}")]
    FolderCreate { path: String, reason: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("missing or invalid bearer token")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Auth(_)
            | ServiceError::FolderCreate { .. }
            | ServiceError::Configuration(_)
            | ServiceError::Upstream { .. }
            | ServiceError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
