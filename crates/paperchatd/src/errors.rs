//! Error types for the paperchatd host and CLI.
//!
//! Two kinds of failure surface here:
//! - [`PaperchatdErrors`] ends a CLI command or the server process. It wraps the library
//!   error and the IO, prompt, JSON and logging errors around it, transparently, so the
//!   underlying message reaches the user unchanged.
//! - [`ApiError`] ends one HTTP request. It carries the status code and the message put in
//!   the `{"error": ...}` body. Library errors caused by the caller become `400` with their
//!   own message; everything else becomes `500` with a generic message, and the details go
//!   to the log only.

use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use paperchat::errors::PaperchatError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors that can end a CLI command or the server.
#[derive(Error, Debug)]
pub enum PaperchatdErrors {
  /// Errors from user interaction dialogs
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// Errors from the underlying paperchat library
  #[error(transparent)]
  Paperchat(#[from] PaperchatError),

  /// File system, socket and terminal errors
  #[error(transparent)]
  IO(#[from] std::io::Error),

  /// Malformed JSON input files
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The rolling log file could not be set up
  #[error(transparent)]
  LogFile(#[from] tracing_appender::rolling::InitError),
}

/// An error response of the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
  /// Response status
  pub status:  StatusCode,
  /// Message for the `error` member of the body
  pub message: String,
}

impl ApiError {
  /// A `400 Bad Request` with `message`.
  pub fn bad_request(message: impl Into<String>) -> Self {
    Self { status: StatusCode::BAD_REQUEST, message: message.into() }
  }

  /// A `500 Internal Server Error` with `message`.
  pub fn internal(message: impl Into<String>) -> Self {
    Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into() }
  }

  /// Maps a library error: caller mistakes keep their message and become `400`, anything
  /// else is logged and answered with `fallback` as a `500`.
  pub fn from_library(err: PaperchatError, fallback: &str) -> Self {
    if err.is_input_error() {
      return Self::bad_request(err.to_string());
    }
    error!("{fallback} ({err})");
    Self::internal(fallback)
  }
}

impl From<PaperchatError> for ApiError {
  fn from(err: PaperchatError) -> Self { Self::from_library(err, "Internal server error") }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::bad_request(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status, Json(json!({ "error": self.message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_input_errors_are_bad_requests() {
    let err = ApiError::from_library(PaperchatError::InvalidIdentifier, "Download failed");
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "Invalid identifier format");

    let err = ApiError::from(PaperchatError::InvalidInput("missing `allPapers`".into()));
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
  }

  #[test]
  fn test_collaborator_errors_hide_details() {
    let err = ApiError::from_library(PaperchatError::MissingApiKey("GROQ_API_KEY"), "Chat failed");
    assert_eq!(err, ApiError::internal("Chat failed"));
  }
}
