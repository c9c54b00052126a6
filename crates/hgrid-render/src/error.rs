#![forbid(unsafe_code)]

//! Paint failures.

use std::any::Any;
use std::fmt;

/// A failed paint of a component or a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintError {
    /// The paint routine panicked; the panic was contained.
    Panicked { message: String },
    /// The paint routine reported an error.
    Failed(String),
}

impl PaintError {
    /// Build from a payload returned by `catch_unwind`.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        Self::Panicked {
            message: panic_message(payload),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl fmt::Display for PaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaintError::Panicked { message } => write!(f, "paint panicked: {message}"),
            PaintError::Failed(msg) => write!(f, "paint failed: {msg}"),
        }
    }
}

impl std::error::Error for PaintError {}

// ─────────────────────────────────────────────────────────────────────────────
// Panic payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Extract a readable message from a panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
