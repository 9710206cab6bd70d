//! Error types for admin API calls.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use thiserror::Error;

/// Admin client error.
///
/// Every failed call ends up in exactly one of these variants. Callers that
/// want status-specific messaging match on [`AdminClientError::HttpStatus`].
#[derive(Error, Debug)]
pub enum AdminClientError {
    /// No HTTP response was obtained (refused connection, timeout, DNS).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The node answered with a status other than 200.
    #[error(transparent)]
    HttpStatus(#[from] HttpStatusError),

    /// The response body did not have the expected shape.
    #[error("unable to decode admin API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The transport could not be built from the supplied configuration.
    #[error("invalid admin API configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AdminClientError>;

impl AdminClientError {
    /// Wrap a reqwest failure, keeping the full cause chain in the message.
    ///
    /// reqwest's own `Display` stops at "error sending request for url (..)",
    /// which hides the actual connect failure.
    pub fn transport(source: reqwest::Error) -> Self {
        let mut message = source.to_string();
        let mut cause = source.source();
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        AdminClientError::Transport { message, source }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            AdminClientError::HttpStatus(e) => Some(e.status),
            _ => None,
        }
    }

    /// Whether the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, AdminClientError::Transport { .. })
    }
}

/// A response from an admin node with a non-200 status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("request failed with status {status}: {body}")]
pub struct HttpStatusError {
    pub status: u16,
    /// Raw response body, lossily decoded as UTF-8.
    pub body: String,
}

impl HttpStatusError {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the `{"message": ...}` body most admin endpoints return on failure.
    pub fn decode_generic_error_body(&self) -> serde_json::Result<GenericErrorBody> {
        serde_json::from_str(&self.body)
    }
}

/// Error body shared by admin endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericErrorBody {
    pub message: String,
    /// Some endpoints echo the HTTP status as `code`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_generic_error_body() {
        let err = HttpStatusError::new(404, r#"{"message":"not found","code":404}"#);
        let body = err.decode_generic_error_body().unwrap();
        assert_eq!(body.message, "not found");
        assert_eq!(body.code, Some(404));
    }

    #[test]
    fn test_decode_generic_error_body_without_code() {
        let err = HttpStatusError::new(400, r#"{"message":"recovery already running"}"#);
        let body = err.decode_generic_error_body().unwrap();
        assert_eq!(body.message, "recovery already running");
        assert_eq!(body.code, None);
    }

    #[test]
    fn test_decode_generic_error_body_rejects_plain_text() {
        let err = HttpStatusError::new(500, "internal server error");
        assert!(err.decode_generic_error_body().is_err());
    }

    #[test]
    fn test_status_only_for_http_errors() {
        let http: AdminClientError = HttpStatusError::new(503, "").into();
        assert_eq!(http.status(), Some(503));
        assert!(!http.is_transport());

        let config = AdminClientError::Config("no addresses".into());
        assert_eq!(config.status(), None);
    }

    #[test]
    fn test_http_status_display_keeps_body() {
        let err: AdminClientError = HttpStatusError::new(400, r#"{"message":"bad"}"#).into();
        assert_eq!(
            err.to_string(),
            r#"request failed with status 400: {"message":"bad"}"#
        );
    }
}
