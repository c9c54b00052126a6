#![forbid(unsafe_code)]

//! Render kernel: cached drawing context, cell paint routine and grid painter.

pub mod cell;
pub mod color;
pub mod component;
pub mod context;
pub mod device;
pub mod error;
pub mod grid;
pub mod icon;
pub mod paint;
pub mod recording;

pub use cell::{
    CellAddress, CellBehavior, CellPaintConfig, CellSnapshot, CellState, CellStyle, CellValue,
    ClickRects, DefaultBehavior, HAlign, HoverHighlight, SnapshotStore,
};
pub use color::PackedRgba;
pub use component::Component;
pub use context::{CachedContext, ContextStats, SaveScope};
pub use device::{DrawingDevice, Property, PropertyValue, TextAlign, TextBaseline};
pub use error::PaintError;
pub use grid::{CellSource, FrameStats, GridPainter, VisibleCell};
pub use icon::{Icon, IconId, IconRegistry, IconRole};
pub use paint::{CellRenderer, PaintOutcome, SimpleCell};
pub use recording::{DrawOp, RecordingDevice};
