//! Error types shared by the resolver, the aggregator and the position checker.

use std::fmt;

use thiserror::Error;

/// Result type alias for upstream-facing operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Terminal outcomes of channel id resolution.
///
/// Every variant means "no channel id"; the first two are validation failures
/// raised before any network call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("could not parse '{0}' as a URL")]
    InvalidUrl(String),

    #[error("'{0}' is not a YouTube host")]
    UnsupportedHost(String),

    #[error("channel id not found")]
    NotFound,
}

impl ResolveError {
    /// True when the input was rejected without consulting the network.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidUrl(_) | Self::UnsupportedHost(_))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The Data API answered with a non-success status
    #[error("YouTube API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// contentDetails.duration was not an ISO-8601 duration
    #[error("invalid duration '{0}'")]
    InvalidDuration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("channel resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    /// The blocking worker running a request did not complete
    #[error("worker task failed: {0}")]
    Task(String),
}

impl AppError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn task(message: impl fmt::Display) -> Self {
        Self::Task(message.to_string())
    }

    /// Network and API failures, as opposed to local configuration problems.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Json(_) | Self::Api { .. } | Self::InvalidDuration(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_are_flagged() {
        assert!(ResolveError::UnsupportedHost("vimeo.com".into()).is_validation());
        assert!(ResolveError::InvalidUrl("::".into()).is_validation());
        assert!(!ResolveError::NotFound.is_validation());
    }

    #[test]
    fn upstream_classification() {
        assert!(AppError::api(403, "quotaExceeded").is_upstream());
        assert!(AppError::InvalidDuration("P1W".into()).is_upstream());
        assert!(!AppError::config("missing key").is_upstream());
        assert!(!AppError::from(ResolveError::NotFound).is_upstream());
    }
}
