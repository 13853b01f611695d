//! Gradebook error types with HTTP status code mapping.
//!
//! [`StoreError`] covers failures while reading or writing the on-disk
//! files. [`GradebookError`] is the central error type handed back to HTTP
//! callers; each variant maps to a status code and a structured JSON body.

use std::path::PathBuf;

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Challenge sent with every 401 response.
pub const BASIC_AUTH_CHALLENGE: &str = r#"Basic realm="Login Required""#;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: lab must be at least 1",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Failure while reading or writing the roster or the event log.
///
/// A missing file is never an error; it reads as empty.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying filesystem failure.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// OS error.
        source: std::io::Error,
    },

    /// A log line is not a valid event record. Aborts the scan.
    #[error("malformed record at {}:{line}: {source}", path.display())]
    MalformedRecord {
        /// Event log path.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Decoder error.
        source: serde_json::Error,
    },

    /// An event's `datetime` field could not be parsed for ordering.
    #[error("invalid datetime {value:?} in event for {name}: {source}")]
    InvalidDatetime {
        /// Student the event belongs to.
        name: String,
        /// Raw field value.
        value: String,
        /// Parser error.
        source: chrono::ParseError,
    },

    /// An event could not be encoded as a log line.
    #[error("failed to encode event: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category       | HTTP Status               |
/// |-----------|----------------|---------------------------|
/// | 1000–1099 | Validation     | 400 Bad Request           |
/// | 1100–1199 | Authorization  | 401 Unauthorized          |
/// | 3000–3999 | Server         | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum GradebookError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The named student is not on the roster.
    #[error("There is no such student")]
    UnknownStudent(String),

    /// Missing or wrong admin credentials.
    #[error("Could not verify your access level for that URL. You have to login with proper credentials")]
    Unauthorized,

    /// Roster or event log failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GradebookError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::UnknownStudent(_) => 1002,
            Self::Unauthorized => 1100,
            Self::Store(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::UnknownStudent(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GradebookError {
    fn into_response(self) -> Response {
        if let Self::Store(err) = &self {
            tracing::error!(error = %err, "store failure");
        }

        let status = self.status_code();
        let details = match &self {
            Self::UnknownStudent(name) => Some(name.clone()),
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        if matches!(self, Self::Unauthorized) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_AUTH_CHALLENGE),
            );
        }
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_request() {
        let err = GradebookError::InvalidRequest("lab must be at least 1".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn unauthorized_carries_challenge() {
        let response = GradebookError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE),
            Some(&HeaderValue::from_static(BASIC_AUTH_CHALLENGE))
        );
    }

    #[test]
    fn store_errors_are_server_errors() {
        let Err(source) = serde_json::from_str::<u32>("{") else {
            panic!("decode should fail");
        };
        let err = GradebookError::from(StoreError::MalformedRecord {
            path: PathBuf::from("db.json"),
            line: 3,
            source,
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("db.json:3"));
    }
}
