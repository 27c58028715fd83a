//! Error types for the Scholar core library.
//!
//! Uses `thiserror` for public API error types with structured error variants
//! covering the remote feed, catalog lookups, favorites persistence, and
//! configuration.

/// Top-level error type for the Scholar core library.
#[derive(Debug, thiserror::Error)]
pub enum ScholarError {
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Paper not found: {id}")]
    NotFound { id: String },

    #[error("Invalid filter '{key}': expected <category>-<option>")]
    InvalidFilter { key: String },

    #[error("Favorites error: {0}")]
    Favorites(#[from] FavoritesError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the remote bibliographic feed.
///
/// Only transport-level conditions end up here. Malformed entries degrade
/// field by field during normalization and never produce an error.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Feed request failed: {message}")]
    Transport { message: String },

    #[error("Feed returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Feed request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Invalid arXiv identifier '{id}'")]
    InvalidId { id: String },

    #[error("Failed to create HTTP client: {message}")]
    Client { message: String },
}

/// Errors from the favorites store.
#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    #[error("Failed to persist favorites to {location}: {message}")]
    Persist { location: String, message: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

impl ScholarError {
    /// True when the error came from the network rather than from local state.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScholarError::Feed(
                FeedError::Transport { .. } | FeedError::Status { .. } | FeedError::Timeout { .. }
            )
        )
    }
}

/// Convenience result type for Scholar operations.
pub type Result<T> = std::result::Result<T, ScholarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_error_display() {
        let err = FeedError::Status {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(
            err.to_string(),
            "Feed returned status 503: Service Unavailable"
        );
    }

    #[test]
    fn test_not_found_is_not_transport() {
        let err = ScholarError::NotFound { id: "42".into() };
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "Paper not found: 42");
    }

    #[test]
    fn test_feed_error_converts_to_scholar_error() {
        let err: ScholarError = FeedError::Timeout { timeout_secs: 30 }.into();
        assert!(err.is_transport());
        assert!(err.to_string().contains("timed out after 30s"));
    }

    #[test]
    fn test_local_feed_errors_are_not_transport() {
        let err: ScholarError = FeedError::InvalidId { id: "entry-3".into() }.into();
        assert!(!err.is_transport());
        let err: ScholarError = FeedError::Client {
            message: "no TLS backend".into(),
        }
        .into();
        assert!(!err.is_transport());
        let err: ScholarError = FeedError::Status {
            status: 500,
            message: "Internal Server Error".into(),
        }
        .into();
        assert!(err.is_transport());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ScholarError = io_err.into();
        assert!(matches!(err, ScholarError::Io(_)));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            message: "feed.max_results must be between 1 and 2000".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: feed.max_results must be between 1 and 2000"
        );
    }
}
