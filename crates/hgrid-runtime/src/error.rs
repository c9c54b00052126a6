#![forbid(unsafe_code)]

//! Tick failures.

use std::any::Any;
use std::fmt;

use hgrid_render::PaintError;
use hgrid_render::error::panic_message;

/// A failed renderable or resizable tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickError {
    /// The tick panicked; the panic was contained.
    Panicked { message: String },
    /// The tick reported an error.
    Failed(String),
    /// A paint triggered by the tick failed.
    Paint(PaintError),
}

impl TickError {
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

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickError::Panicked { message } => write!(f, "tick panicked: {message}"),
            TickError::Failed(msg) => write!(f, "tick failed: {msg}"),
            TickError::Paint(e) => write!(f, "tick paint: {e}"),
        }
    }
}

impl std::error::Error for TickError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TickError::Paint(e) => Some(e),
            TickError::Panicked { .. } | TickError::Failed(_) => None,
        }
    }
}

impl From<PaintError> for TickError {
    fn from(e: PaintError) -> Self {
        Self::Paint(e)
    }
}
