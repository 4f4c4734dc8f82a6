//! Shared collaborator error shape.
//!
//! The backend speaks human-readable messages only; there are no structured
//! error codes to preserve. Operations are attempted once, with no retry or
//! idempotency keys.

use std::fmt;

/// Failure reported by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    message: String,
}

impl BackendError {
    /// Wrap a backend-provided message, or a generic fallback when empty.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            Self {
                message: "request failed".into(),
            }
        } else {
            Self { message }
        }
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BackendError {}
