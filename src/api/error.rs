//! Normalized errors for remote operations.
//!
//! Transport failures, non-2xx responses and undecodable payloads all collapse
//! into a single [`ApiError`] carrying the message shown to the user.

use serde::Deserialize;
use std::fmt;

/// A remote operation failure reduced to one user-facing message.
///
/// `status` is `None` when the request never produced a response or the
/// failure was raised locally (for example a missing credential).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Builds the error for a non-2xx response.
    ///
    /// Uses the body's `message` field when the body is a JSON object carrying
    /// a non-blank one, and `fallback` otherwise.
    #[must_use]
    pub fn from_response(status: u16, body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());

        Self {
            message,
            status: Some(status),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_body_message() {
        let err = ApiError::from_response(400, r#"{"message":"Email already taken"}"#, "Registration failed");
        assert_eq!(err.message, "Email already taken");
        assert_eq!(err.status, Some(400));
    }

    #[test]
    fn falls_back_on_missing_or_unparsable_body() {
        assert_eq!(
            ApiError::from_response(500, "", "Failed to delete post").message,
            "Failed to delete post"
        );
        assert_eq!(
            ApiError::from_response(502, "<html>Bad gateway</html>", "Login failed").message,
            "Login failed"
        );
        assert_eq!(
            ApiError::from_response(400, r#"{"errors":["x"]}"#, "Failed to edit comment").message,
            "Failed to edit comment"
        );
    }
}
