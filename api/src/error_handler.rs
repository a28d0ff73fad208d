use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use verse_chat::ChatError;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("invalid API_ADDRESS `{0}` (expected host:port)")]
    InvalidAddress(String),

    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    /// Missing, blank or unparseable message.
    #[error("Empty input")]
    EmptyInput,

    /// Anything unexpected while handling a request; detail stays in logs.
    #[error("internal processing error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmptyInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            AppError::EmptyInput => "Empty input",
            _ => "Internal processing error",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyInput => AppError::EmptyInput,
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// A body we cannot read carries no usable message.
impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        warn!(error = %err, "rejected request body");
        AppError::EmptyInput
    }
}
