//! Typed errors for the client.
//!
//! Only `ConfigError` is fatal for the session — it is raised at startup,
//! before any request. Everything else is recoverable: the caller shows a
//! message and may retry explicitly. No automatic retries anywhere.

use thiserror::Error;

/// Startup-time configuration failure (missing or malformed environment).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// One field-level constraint violation from client-side pre-validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Client-side validation failure, carrying one message per violated field
/// so a form can render them inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed:")?;
        for err in &self.errors {
            write!(f, " {}: {};", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Runtime error surfaced by the remote notes client and everything above it.
///
/// `Clone` on purpose: cached and observed mutation states hold errors, so
/// the transport error is captured as a string rather than the source
/// `reqwest::Error`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    Validation(ValidationError),
    #[error("network error: {0}")]
    Network(String),
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl ApiError {
    /// Whether the remote reported the resource as gone (e.g. deleting an id
    /// that no longer exists server-side).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}
