//! Error types for the CancApp client.
//!
//! This module defines the centralized error type [`CancappError`] and a type alias
//! [`Result`] used by the storage, configuration and infrastructure layers. Errors
//! raised by remote operations are normalized separately into
//! [`crate::api::ApiError`], because the user only ever sees a single message for
//! those.

use thiserror::Error;

/// The main error type for local CancApp operations.
///
/// Covers everything that can fail without talking to the remote API: reading or
/// writing the credential cache, loading configuration, and constructing the
/// HTTP client.
///
/// # Examples
///
/// ```
/// use cancapp::domain::CancappError;
///
/// fn load_config() -> Result<(), CancappError> {
///     Err(CancappError::Config("base_url is not a valid URL".to_string()))
/// }
/// ```
#[derive(Debug, Error)]
pub enum CancappError {
    /// Credential cache could not be read or written.
    ///
    /// The string contains a description of what went wrong.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(String),
}

/// A specialized `Result` type for local CancApp operations.
pub type Result<T> = std::result::Result<T, CancappError>;
