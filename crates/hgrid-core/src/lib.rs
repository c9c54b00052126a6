#![forbid(unsafe_code)]

//! Core: geometry, host input records, input normalization state, and
//! surface configuration.

pub mod config;
pub mod drag;
pub mod event;
pub mod geometry;
pub mod input;
pub mod keys;

pub use config::{ConfigError, SurfaceConfig};
pub use event::SurfaceEvent;
pub use geometry::{ContainerBox, Point, Rect, Size};
pub use input::{HostInput, HostKey, HostPointer, Modifiers};
