//! Error types for the paperchat library.
//!
//! The recommendation core itself never fails on well-formed input, so most variants
//! describe failures of the collaborators around it:
//! - Network and API errors from search, chat, and PDF providers
//! - Input validation at the boundary
//! - Filesystem access when saving PDFs
//!
//! # Examples
//!
//! ```
//! use paperchat::{clients::arxiv::validate_arxiv_id, errors::PaperchatError};
//!
//! match validate_arxiv_id("not-an-id") {
//!   Err(PaperchatError::InvalidIdentifier) => println!("Invalid arXiv ID format"),
//!   Err(e) => println!("Other error: {}", e),
//!   Ok(id) => println!("Valid id: {id}"),
//! }
//! ```

use thiserror::Error;

/// Errors that can occur when working with the paperchat library.
///
/// Most error variants provide additional context through either custom messages
/// or wrapped underlying errors.
#[derive(Error, Debug)]
pub enum PaperchatError {
  /// Caller supplied input that is missing or has the wrong shape.
  ///
  /// This is distinct from a legitimately empty result: an empty candidate pool is
  /// not an error, a missing target paper is.
  #[error("Invalid input: {0}")]
  InvalidInput(String),

  /// The provided paper identifier doesn't match the expected format.
  ///
  /// This can occur when an arXiv ID is neither new-style (2301.07041) nor
  /// old-style (math.AG/0601001).
  #[error("Invalid identifier format")]
  InvalidIdentifier,

  /// A provider needs an API key that was not configured.
  ///
  /// The parameter names the environment variable that should hold the key.
  #[error("Missing API key, set `{0}`")]
  MissingApiKey(&'static str),

  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The server is unreachable
  /// - The request times out
  /// - TLS/SSL errors occur
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The requested paper couldn't be found.
  #[error("Paper not found")]
  NotFound,

  /// An API returned an error response or a body we could not make sense of.
  ///
  /// The string parameter contains the error message for debugging.
  #[error("API error: {0}")]
  ApiError(String),

  /// Failed to parse a URL.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),

  /// Failed to encode or decode JSON.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// A file system operation failed.
  ///
  /// This occurs when:
  /// - Creating the download directory fails
  /// - Writing a PDF to disk fails
  /// - Permission errors occur
  #[error(transparent)]
  Path(#[from] std::io::Error),
}

impl PaperchatError {
  /// Checks if this error was caused by the caller rather than by a collaborator.
  ///
  /// Boundary layers use this to decide between a client error response and a
  /// server error response.
  ///
  /// # Examples
  ///
  /// ```
  /// use paperchat::errors::PaperchatError;
  ///
  /// assert!(PaperchatError::InvalidIdentifier.is_input_error());
  /// assert!(!PaperchatError::NotFound.is_input_error());
  /// ```
  pub fn is_input_error(&self) -> bool {
    matches!(self, PaperchatError::InvalidInput(_) | PaperchatError::InvalidIdentifier)
  }
}
