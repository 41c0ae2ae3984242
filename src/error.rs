//! Error types for the lesson plan generation service.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider model not found: {0}")]
    ProviderModelNotFound(String),

    #[error("Unusable provider response: {0}")]
    Normalization(String),

    #[error("All lesson providers failed ({} attempts)", details.len())]
    ProvidersExhausted { details: Vec<String> },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ApiError {
    /// True for errors caused by the caller's input rather than by a provider.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::InvalidRequest(_))
    }

    /// Per-attempt detail lines carried by the error, if any.
    pub fn details(&self) -> Vec<String> {
        match self {
            ApiError::ProvidersExhausted { details } => details.clone(),
            _ => Vec::new(),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// One failed backend attempt, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptFailure {
    pub backend: String,
    pub variant: String,
    pub message: String,
}

impl AttemptFailure {
    pub fn new(backend: impl Into<String>, variant: impl Into<String>, error: &ApiError) -> Self {
        Self {
            backend: backend.into(),
            variant: variant.into(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.backend, self.variant, self.message)
    }
}
