#![forbid(unsafe_code)]

//! hgrid public facade crate.
//!
//! Re-exports the common types from the internal crates and offers a small
//! prelude. A typical embedding:
//!
//! 1. implement [`CellSource`] over your data,
//! 2. wrap it in a [`GridPainter`],
//! 3. put the painter in a [`Surface`] bound to your [`Host`] and device,
//! 4. [`Surface::attach`] the surface to a [`FrameRegistry`] and call
//!    `on_animation_frame` / `on_timer` from the host's callbacks.

use std::fmt;

#[cfg(feature = "logging")]
pub mod logging;

// --- Core re-exports -------------------------------------------------------

pub use hgrid_core::event::{
    KeyDetail, MouseDetail, ResizeDetail, SurfaceEvent, TouchDetail, WheelDetail,
};
pub use hgrid_core::geometry::{ContainerBox, Point, Rect, Size};
pub use hgrid_core::input::{HostInput, HostKey, HostPointer, HostWheel, Modifiers, MouseButton};
pub use hgrid_core::{ConfigError, SurfaceConfig};

// --- Text re-exports -------------------------------------------------------

pub use hgrid_text::{MonospaceMeasure, TextMeasure, Truncation};

// --- Render re-exports -----------------------------------------------------

pub use hgrid_render::{
    CachedContext, CellAddress, CellBehavior, CellRenderer, CellSource, CellState, CellStyle,
    CellValue, Component, DefaultBehavior, DrawOp, DrawingDevice, FrameStats, GridPainter,
    HAlign, Icon, IconRegistry, PackedRgba, PaintError, Property, PropertyValue,
    RecordingDevice, SimpleCell, TextAlign, TextBaseline, VisibleCell,
};

// --- Runtime re-exports ----------------------------------------------------

pub use hgrid_runtime::{
    Clock, FrameClock, FrameRegistry, HeadlessHost, Host, InputDisposition, ManualClock,
    Renderable, Resizable, Surface, SystemClock, TickError, TickReport,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for hgrid embeddings.
#[derive(Debug)]
pub enum Error {
    /// Invalid configuration input.
    Config(ConfigError),
    /// A component paint failed.
    Paint(PaintError),
    /// A frame-clock tick failed.
    Tick(TickError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Paint(err) => write!(f, "{err}"),
            Self::Tick(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Paint(err) => Some(err),
            Self::Tick(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<PaintError> for Error {
    fn from(err: PaintError) -> Self {
        Self::Paint(err)
    }
}

impl From<TickError> for Error {
    fn from(err: TickError) -> Self {
        Self::Tick(err)
    }
}

/// Standard result type for hgrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CellAddress, CellSource, CellState, CellStyle, CellValue, Component, Error,
        FrameRegistry, GridPainter, Host, HostInput, Point, Rect, Result, Surface, SurfaceConfig,
        SurfaceEvent, VisibleCell,
    };

    pub use crate::{core, render, runtime, text};
}

pub use hgrid_core as core;
pub use hgrid_render as render;
pub use hgrid_runtime as runtime;
pub use hgrid_text as text;
