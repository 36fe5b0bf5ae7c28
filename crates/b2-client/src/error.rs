//! Client error types

use serde::Deserialize;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, B2Error>;

/// Client errors
#[derive(Error, Debug)]
pub enum B2Error {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The authorization token was rejected (401)
    #[error("unauthorized ({code}): {message}")]
    Unauthorized { code: String, message: String },

    /// The requested entity does not exist (404)
    #[error("not found ({code}): {message}")]
    NotFound { code: String, message: String },

    /// The request was well-formed but rejected by the service (422)
    #[error("validation failed ({code}): {message}")]
    Validation { code: String, message: String },

    /// Any other non-2xx API response
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Response missing a required field or otherwise malformed
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Custom file info would exceed the 10-entry limit
    #[error("file info limited to 10 entries, got {0}")]
    FileInfoLimit(usize),
}

/// Error body returned by the B2 API
///
/// Official documentation: [Error Handling](https://www.backblaze.com/b2/docs/calling.html#error_handling)
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[allow(dead_code)]
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl B2Error {
    /// Classify a non-2xx response into a typed error.
    ///
    /// The body is the raw response text; when it is not the documented
    /// `{status, code, message}` JSON shape, the raw text is preserved as
    /// the message so nothing is lost for diagnostics.
    pub(crate) fn classify(status: u16, body: &str) -> Self {
        let (code, message) = match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => (parsed.code, parsed.message),
            Err(_) => (format!("http_{}", status), body.to_string()),
        };

        match status {
            401 => Self::Unauthorized { code, message },
            404 => Self::NotFound { code, message },
            422 => Self::Validation { code, message },
            _ => Self::Api {
                status,
                code,
                message,
            },
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an authorization error
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unauthorized() {
        let body = r#"{"status": 401, "code": "expired_auth_token", "message": "Authorization token has expired"}"#;
        let error = B2Error::classify(401, body);

        match error {
            B2Error::Unauthorized { code, message } => {
                assert_eq!(code, "expired_auth_token");
                assert_eq!(message, "Authorization token has expired");
            }
            _ => panic!("Expected Unauthorized"),
        }
        assert!(B2Error::classify(401, body).is_unauthorized());
    }

    #[test]
    fn test_classify_not_found() {
        let body = r#"{"status": 404, "code": "file_not_present", "message": "File not present"}"#;
        assert!(B2Error::classify(404, body).is_not_found());
    }

    #[test]
    fn test_classify_validation() {
        let body = r#"{"status": 422, "code": "bad_part_order", "message": "Parts must be in ascending order"}"#;
        let error = B2Error::classify(422, body);
        assert!(error.is_validation());
        match error {
            B2Error::Validation { code, .. } => assert_eq!(code, "bad_part_order"),
            _ => panic!("Expected Validation"),
        }
    }

    #[test]
    fn test_classify_generic_with_unparseable_body() {
        let error = B2Error::classify(503, "service unavailable");
        match error {
            B2Error::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 503);
                assert_eq!(code, "http_503");
                assert_eq!(message, "service unavailable");
            }
            _ => panic!("Expected Api"),
        }
    }
}
