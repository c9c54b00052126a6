//! Benchmarks for incremental cell painting.
//!
//! Compares a steady-state frame where every snapshot matches (partial
//! rendering) against the same grid painted with a prefill color, which
//! forces every cell to repaint.
//!
//! Run with: cargo bench -p hgrid-render --bench cell_paint_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hgrid_core::geometry::Rect;
use hgrid_render::{
    CachedContext, CellAddress, CellSource, CellState, CellStyle, CellValue, Component,
    GridPainter, PackedRgba, RecordingDevice, VisibleCell,
};
use std::hint::black_box;

struct Sheet {
    rows: usize,
    columns: usize,
    style: CellStyle,
}

impl CellSource for Sheet {
    fn for_each_visible(&self, f: &mut dyn FnMut(VisibleCell<'_>)) {
        for row in 0..self.rows {
            for column in 0..self.columns {
                f(VisibleCell {
                    address: CellAddress::new(column, row),
                    bounds: Rect::new(column as f64 * 90.0, row as f64 * 20.0, 90.0, 20.0),
                    value: CellValue::Int((row * self.columns + column) as i64),
                    style: &self.style,
                    state: CellState::DATA,
                });
            }
        }
    }
}

fn device() -> CachedContext<RecordingDevice> {
    let mut dev = RecordingDevice::new(1920, 1080);
    dev.set_recording(false);
    CachedContext::new(dev)
}

// =============================================================================
// Partial vs full frames
// =============================================================================

fn bench_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/frame");

    for (columns, rows) in [(10, 40), (20, 50)] {
        let cells = (columns * rows) as u64;
        group.throughput(Throughput::Elements(cells));
        let size = format!("{columns}x{rows}");

        let mut partial = GridPainter::new(Sheet {
            rows,
            columns,
            style: CellStyle::default(),
        });
        let mut gc = device();
        let _ = partial.paint(&mut gc);
        group.bench_with_input(BenchmarkId::new("unchanged", &size), &(), |b, _| {
            b.iter(|| {
                let _ = partial.paint(&mut gc);
                black_box(partial.stats());
            })
        });

        let mut full = GridPainter::new(Sheet {
            rows,
            columns,
            style: CellStyle {
                prefill_color: Some(PackedRgba::WHITE),
                ..CellStyle::default()
            },
        })
        .with_prefill(PackedRgba::WHITE);
        let mut gc = device();
        group.bench_with_input(BenchmarkId::new("prefilled", &size), &(), |b, _| {
            b.iter(|| {
                let _ = full.paint(&mut gc);
                black_box(full.stats());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_frames);
criterion_main!(benches);
