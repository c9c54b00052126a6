#![forbid(unsafe_code)]

//! Grid painter: drives the cell paint routine over the visible cells.
//!
//! The layout collaborator implements [`CellSource`] and enumerates the
//! cells currently in view. For each one the painter looks up the retained
//! [`CellSnapshot`](crate::cell::CellSnapshot) by logical address and
//! invokes the [`CellRenderer`]. A panic inside a single cell is contained:
//! that cell's snapshot is dropped so it repaints next frame, and the rest
//! of the frame still paints.

use std::panic::{AssertUnwindSafe, catch_unwind};

use hgrid_core::geometry::Rect;
use rustc_hash::FxHashMap;

use crate::cell::{
    CellAddress, CellBehavior, CellPaintConfig, CellState, CellStyle, CellValue, DefaultBehavior,
    SnapshotStore,
};
use crate::color::PackedRgba;
use crate::component::Component;
use crate::context::CachedContext;
use crate::device::DrawingDevice;
use crate::error::{PaintError, panic_message};
use crate::icon::IconRegistry;
use crate::paint::{CellRenderer, PaintOutcome, SimpleCell};

/// One cell in view, as reported by the layout collaborator.
#[derive(Debug)]
pub struct VisibleCell<'a> {
    pub address: CellAddress,
    /// Bounds relative to the painter's origin, scroll already applied.
    pub bounds: Rect,
    pub value: CellValue,
    pub style: &'a CellStyle,
    pub state: CellState,
}

/// Enumerates visible cells.
pub trait CellSource {
    /// Call `f` once per visible cell, in paint order.
    fn for_each_visible(&self, f: &mut dyn FnMut(VisibleCell<'_>));

    /// Value transformation and formatting for this grid.
    fn behavior(&self) -> &dyn CellBehavior {
        &DefaultBehavior
    }
}

/// Per-frame cell counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub painted: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl FrameStats {
    /// Cells visited this frame.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.painted + self.skipped + self.failed
    }
}

/// A [`Component`] that paints a grid of cells.
#[derive(Debug)]
pub struct GridPainter<S, R = SimpleCell> {
    source: S,
    renderer: R,
    icons: IconRegistry,
    snapshots: SnapshotStore,
    bounds: Rect,
    prefill: Option<PackedRgba>,
    stats: FrameStats,
    min_widths: FxHashMap<usize, f64>,
}

impl<S: CellSource> GridPainter<S> {
    /// Painter using the default [`SimpleCell`] renderer.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_renderer(source, SimpleCell)
    }
}

impl<S: CellSource, R: CellRenderer> GridPainter<S, R> {
    #[must_use]
    pub fn with_renderer(source: S, renderer: R) -> Self {
        Self {
            source,
            renderer,
            icons: IconRegistry::new(),
            snapshots: SnapshotStore::new(),
            bounds: Rect::default(),
            prefill: None,
            stats: FrameStats::default(),
            min_widths: FxHashMap::default(),
        }
    }

    /// Builder: icon registry used to resolve style icon names.
    #[must_use]
    pub fn with_icons(mut self, icons: IconRegistry) -> Self {
        self.icons = icons;
        self
    }

    /// Builder: fill the whole grid with `color` before painting cells.
    ///
    /// Cells styled with the same `prefill_color` skip their own base layer.
    #[must_use]
    pub fn with_prefill(mut self, color: PackedRgba) -> Self {
        self.prefill = Some(color);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the cell source.
    ///
    /// Call [`shape_changed`](Component::shape_changed) afterwards if rows,
    /// columns or styles changed.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn icons_mut(&mut self) -> &mut IconRegistry {
        &mut self.icons
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Counts from the most recent frame.
    #[must_use]
    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Widest natural width reported for `column` since the last shape
    /// change. Skipped cells keep the width of their last full paint.
    #[must_use]
    pub fn min_width(&self, column: usize) -> Option<f64> {
        self.min_widths.get(&column).copied()
    }

    #[must_use]
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Force `address` to repaint in full next frame.
    pub fn invalidate_cell(&mut self, address: CellAddress) {
        self.snapshots.invalidate(address);
    }
}

impl<D, S, R> Component<D> for GridPainter<S, R>
where
    D: DrawingDevice,
    S: CellSource,
    R: CellRenderer,
{
    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn paint(&mut self, gc: &mut CachedContext<D>) -> Result<(), PaintError> {
        let Self {
            source,
            renderer,
            icons,
            snapshots,
            bounds,
            prefill,
            stats,
            min_widths,
        } = self;

        *stats = FrameStats::default();

        if let Some(color) = *prefill {
            gc.clear_fill(*bounds, color);
        }

        let behavior = source.behavior();
        let origin = bounds.origin();
        source.for_each_visible(&mut |cell| {
            let VisibleCell {
                address,
                bounds: cell_bounds,
                value,
                style,
                state,
            } = cell;
            let cell_bounds = Rect::new(
                origin.x + cell_bounds.x,
                origin.y + cell_bounds.y,
                cell_bounds.width,
                cell_bounds.height,
            );
            let mut config = CellPaintConfig::new(value, cell_bounds, style, behavior, icons)
                .with_state(state);
            let slot = snapshots.slot(address);

            match catch_unwind(AssertUnwindSafe(|| renderer.paint(gc, &mut config, slot))) {
                Ok(outcome) => {
                    match outcome {
                        PaintOutcome::Painted => stats.painted += 1,
                        PaintOutcome::Skipped => stats.skipped += 1,
                    }
                    let widest = min_widths.entry(address.column).or_insert(0.0);
                    *widest = widest.max(config.min_width);
                }
                Err(payload) => {
                    stats.failed += 1;
                    tracing::warn!(
                        row = address.row,
                        column = address.column,
                        panic = %panic_message(payload.as_ref()),
                        "cell paint panicked"
                    );
                    snapshots.invalidate(address);
                }
            }
        });

        tracing::trace!(
            painted = stats.painted,
            skipped = stats.skipped,
            failed = stats.failed,
            "grid painted"
        );
        Ok(())
    }

    fn shape_changed(&mut self) {
        tracing::debug!(retained = self.snapshots.len(), "grid shape changed");
        self.snapshots.clear();
        self.min_widths.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingDevice;

    struct Table {
        rows: usize,
        columns: usize,
        style: CellStyle,
        panic_at: Option<CellAddress>,
        generation: u32,
    }

    impl Table {
        fn new(rows: usize, columns: usize) -> Self {
            Self {
                rows,
                columns,
                style: CellStyle::default(),
                panic_at: None,
                generation: 0,
            }
        }
    }

    struct Explosive;

    impl CellBehavior for Explosive {
        fn format_value(&self, value: &CellValue) -> String {
            if let CellValue::Text(t) = value {
                assert!(!t.starts_with("boom"), "bad cell");
            }
            value.to_string()
        }
    }

    impl CellSource for Table {
        fn for_each_visible(&self, f: &mut dyn FnMut(VisibleCell<'_>)) {
            for row in 0..self.rows {
                for column in 0..self.columns {
                    let address = CellAddress::new(column, row);
                    let text = if self.panic_at == Some(address) {
                        format!("boom {}", self.generation)
                    } else {
                        format!("r{row}c{column} {}", self.generation)
                    };
                    f(VisibleCell {
                        address,
                        bounds: Rect::new(column as f64 * 80.0, row as f64 * 20.0, 80.0, 20.0),
                        value: CellValue::text(text),
                        style: &self.style,
                        state: CellState::DATA,
                    });
                }
            }
        }

        fn behavior(&self) -> &dyn CellBehavior {
            &Explosive
        }
    }

    fn gc() -> CachedContext<RecordingDevice> {
        CachedContext::new(RecordingDevice::new(400, 300))
    }

    #[test]
    fn second_frame_skips_everything() {
        let mut grid = GridPainter::new(Table::new(3, 2));
        let mut gc = gc();
        grid.paint(&mut gc).unwrap();
        assert_eq!(grid.stats().painted, 6);

        gc.device_mut().reset_counters();
        grid.paint(&mut gc).unwrap();
        assert_eq!(grid.stats(), FrameStats { painted: 0, skipped: 6, failed: 0 });
        assert_eq!(gc.device().draw_calls(), 0);
    }

    #[test]
    fn shape_change_forces_full_repaint() {
        let mut grid = GridPainter::new(Table::new(2, 2));
        let mut gc = gc();
        grid.paint(&mut gc).unwrap();
        Component::<RecordingDevice>::shape_changed(&mut grid);
        assert!(grid.snapshots().is_empty());
        grid.paint(&mut gc).unwrap();
        assert_eq!(grid.stats().painted, 4);
    }

    #[test]
    fn changed_text_repaints() {
        let mut grid = GridPainter::new(Table::new(2, 2));
        let mut gc = gc();
        grid.paint(&mut gc).unwrap();
        grid.source_mut().generation = 1;
        grid.paint(&mut gc).unwrap();
        assert_eq!(grid.stats().painted, 4);

        grid.invalidate_cell(CellAddress::new(0, 0));
        grid.paint(&mut gc).unwrap();
        assert_eq!(grid.stats(), FrameStats { painted: 1, skipped: 3, failed: 0 });
    }

    #[test]
    fn panicking_cell_is_contained() {
        let mut table = Table::new(2, 2);
        table.panic_at = Some(CellAddress::new(1, 0));
        let mut grid = GridPainter::new(table);
        let mut gc = gc();
        grid.paint(&mut gc).unwrap();
        assert_eq!(grid.stats(), FrameStats { painted: 3, skipped: 0, failed: 1 });
        assert!(grid.snapshots().get(CellAddress::new(1, 0)).is_none());
        assert_eq!(gc.depth(), 0);

        // The failing cell is retried every frame; the others are skipped.
        grid.paint(&mut gc).unwrap();
        assert_eq!(grid.stats(), FrameStats { painted: 0, skipped: 3, failed: 1 });
    }

    #[test]
    fn prefill_paints_whole_grid_first() {
        let mut grid = GridPainter::new(Table::new(1, 1)).with_prefill(PackedRgba::WHITE);
        Component::<RecordingDevice>::set_bounds(&mut grid, Rect::new(0.0, 0.0, 400.0, 300.0));
        let mut gc = gc();
        grid.paint(&mut gc).unwrap();
        assert_eq!(
            gc.device().ops().iter().find(|op| op.is_drawing()),
            Some(&crate::recording::DrawOp::ClearRect(Rect::new(0.0, 0.0, 400.0, 300.0)))
        );
    }

    #[test]
    fn min_widths_track_widest_cell_per_column() {
        let mut table = Table::new(2, 1);
        table.style.column_autosizing = true;
        let mut grid = GridPainter::new(table);
        let mut gc = gc();
        grid.paint(&mut gc).unwrap();
        // "r0c0 0" is 6 columns of 7px plus 5px padding each side.
        assert_eq!(grid.min_width(0), Some(52.0));
        assert_eq!(grid.min_width(1), None);
    }
}
