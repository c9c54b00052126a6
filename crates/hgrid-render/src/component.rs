#![forbid(unsafe_code)]

//! The paintable component seam.
//!
//! A surface owns exactly one root component. The surface resizes the
//! backing store, sets the component's bounds and asks it to paint; the
//! frame clock forwards ticks to it.

use hgrid_core::geometry::Rect;

use crate::context::CachedContext;
use crate::device::DrawingDevice;
use crate::error::PaintError;

/// Something a surface can paint.
pub trait Component<D: DrawingDevice> {
    /// New bounds in logical pixels, relative to the surface origin.
    fn set_bounds(&mut self, bounds: Rect);

    /// Paint into `gc`. The caller brackets this with save/restore.
    fn paint(&mut self, gc: &mut CachedContext<D>) -> Result<(), PaintError>;

    /// Called once per frame-clock tick, after the paint tick has run.
    fn tick_notification(&mut self) {}

    /// The logical shape changed (rows, columns, styles); retained state
    /// should be dropped.
    fn shape_changed(&mut self) {}
}

impl<D: DrawingDevice, C: Component<D> + ?Sized> Component<D> for Box<C> {
    fn set_bounds(&mut self, bounds: Rect) {
        (**self).set_bounds(bounds);
    }

    fn paint(&mut self, gc: &mut CachedContext<D>) -> Result<(), PaintError> {
        (**self).paint(gc)
    }

    fn tick_notification(&mut self) {
        (**self).tick_notification();
    }

    fn shape_changed(&mut self) {
        (**self).shape_changed();
    }
}
