//! Error types for catalog API operations.

use serde::Deserialize;
use thiserror::Error;

/// Errors returned by catalog API operations.
///
/// The three request-level failure classes are kept distinct so callers
/// can render them differently (backend-reported errors carry a server
/// message, format errors get a generic hint, transport errors surface
/// the underlying cause).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backend answered with a non-success HTTP status.
    #[error("{message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },
    /// The response body could not be decoded into the expected shape.
    #[error("unexpected response format: {0}")]
    Format(#[source] serde_json::Error),
    /// The request could not be sent or the response body not read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// A request URL could not be constructed.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// JSON error body emitted by the backend: `{"detail": ...}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<ErrorDetail>,
}

/// The `detail` field is either an object carrying a `message` or a
/// plain string, depending on which backend path raised the error.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Structured { message: String },
    Plain(String),
}

/// Extracts a display message from an error response body.
///
/// Tries `detail.message`, then `detail` as a plain string, and falls
/// back to a generic message naming the HTTP status when the body is
/// not JSON or carries no usable `detail`.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        match parsed.detail {
            Some(ErrorDetail::Structured { message }) => return message,
            Some(ErrorDetail::Plain(text)) => return text,
            None => {}
        }
    }
    format!("catalog request failed (HTTP {status})")
}
