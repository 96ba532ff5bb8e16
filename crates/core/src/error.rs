//! Storefront error model.

use thiserror::Error;

/// Result type used across the storefront crates.
pub type StorefrontResult<T> = Result<T, StorefrontError>;

/// Storefront-level error.
///
/// Collaborator failures are carried as [`StorefrontError::Upstream`] and are
/// propagated to the caller without being rewritten.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorefrontError {
    /// The caller asked for something that can never succeed (e.g. page 0).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An external collaborator (search, order history) failed.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl StorefrontError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
