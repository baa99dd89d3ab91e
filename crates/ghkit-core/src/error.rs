//! Error types for ghkit.

use thiserror::Error;

/// Main error type for ghkit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(String),

    /// 401 from the API
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 403 from the API
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 404 from the API
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned any other non-success status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body could not be interpreted
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A spawned task panicked or was aborted
    #[error("Task error: {0}")]
    Task(String),

    /// Generic error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Build an error from a non-success HTTP status and the response body.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Error::Unauthorized(message),
            403 => Error::Forbidden(message),
            404 => Error::NotFound(message),
            _ => Error::Api { status, message },
        }
    }

    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized(_) => Some(401),
            Error::Forbidden(_) => Some(403),
            Error::NotFound(_) => Some(404),
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for ghkit operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            Error::from_status(401, "bad credentials".to_string()),
            Error::Unauthorized(_)
        ));
        assert!(matches!(
            Error::from_status(403, String::new()),
            Error::Forbidden(_)
        ));
        assert!(matches!(
            Error::from_status(404, String::new()),
            Error::NotFound(_)
        ));
        assert!(matches!(
            Error::from_status(500, String::new()),
            Error::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [401u16, 403, 404, 422, 502] {
            assert_eq!(
                Error::from_status(status, String::new()).status(),
                Some(status)
            );
        }
        assert_eq!(Error::Http("timeout".to_string()).status(), None);
    }
}
