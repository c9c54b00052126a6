#![forbid(unsafe_code)]

//! Runtime: host-driven frame clock, surface controller and pacing.
//!
//! The host owns the event loop. It calls
//! [`FrameRegistry::on_animation_frame`] from its display-refresh callback
//! and [`FrameRegistry::on_timer`] from a periodic timer, and feeds raw
//! input into [`Surface::handle_input`]. Everything here is single-threaded.

pub mod clock;
pub mod error;
pub mod frame_clock;
pub mod host;
pub mod pacing;
pub mod surface;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TickError;
pub use frame_clock::{FrameClock, FrameRegistry, RegistrationId, Renderable, Resizable, TickReport};
pub use host::{HeadlessHost, Host};
pub use pacing::{FramePacer, PaceDecision};
pub use surface::{InputDisposition, ObserverId, Surface, SurfaceId, SurfaceInfo, parse_zoom};
