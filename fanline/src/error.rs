//! Error types.

use thiserror::Error;

/// The main error type for fanline operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-related error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The hosted backend returned an error response.
    #[error("Remote query error [{code}]: {message}")]
    Remote { code: String, message: String },

    /// No viewer identity could be resolved from any source.
    #[error("No viewer identity could be resolved")]
    IdentityUnresolved,

    /// Storage upload failed.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Local key/value store error.
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid argument passed to an API method.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required field was missing in the response.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a remote query error.
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Remote {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Error::MissingField(field.into())
    }

    /// Check if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Remote { code, .. } => {
                matches!(code.as_str(), "429" | "500" | "502" | "503" | "504")
            }
            _ => false,
        }
    }

    /// Check if this error means the caller must surface a sign-in prompt.
    pub fn is_identity_error(&self) -> bool {
        match self {
            Error::IdentityUnresolved => true,
            Error::Remote { code, .. } => code == "401",
            _ => false,
        }
    }
}

/// Result type alias for fanline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::remote("400", "bad request");
        assert_eq!(format!("{}", e), "Remote query error [400]: bad request");
    }

    #[test]
    fn test_retryable() {
        assert!(Error::remote("503", "unavailable").is_retryable());
        assert!(!Error::remote("400", "bad request").is_retryable());
    }

    #[test]
    fn test_identity_error() {
        assert!(Error::IdentityUnresolved.is_identity_error());
        assert!(Error::remote("401", "jwt expired").is_identity_error());
        assert!(!Error::remote("404", "not found").is_identity_error());
    }
}
