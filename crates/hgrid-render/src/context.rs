#![forbid(unsafe_code)]

//! Drawing context facade: state-tracked property writes.
//!
//! `CachedContext` wraps a [`DrawingDevice`] and shadows every stateful
//! property. Reads are served from the shadow (populated lazily from the
//! device on first access); writes are compared against the shadow and only
//! forwarded when the value actually changes.
//!
//! # Invariants
//!
//! - A write reaches the device iff the new value differs from the cached one.
//! - `save` pushes a copy of the whole shadow; the matching `restore` pops it,
//!   so any property changed in between reverts in the cache exactly as it
//!   does on the device.
//! - [`invalidate`](CachedContext::invalidate) must be called whenever the
//!   device state is reset behind the facade's back (backing-store resize).
//!
//! # Usage
//!
//! ```
//! use hgrid_render::context::CachedContext;
//! use hgrid_render::recording::RecordingDevice;
//! use hgrid_render::color::PackedRgba;
//!
//! let mut gc = CachedContext::new(RecordingDevice::new(400, 300));
//! gc.set_fill_style(PackedRgba::WHITE);
//! gc.set_fill_style(PackedRgba::WHITE);
//! assert_eq!(gc.stats().forwarded, 1);
//! assert_eq!(gc.stats().suppressed, 1);
//! ```

use std::ops::{Deref, DerefMut};

use hgrid_core::geometry::Rect;
use hgrid_text::{TextMeasure, WidthCache};

use crate::color::PackedRgba;
use crate::device::{DrawingDevice, Property, PropertyValue, TextAlign, TextBaseline};
use crate::icon::Icon;

type Shadow = [Option<PropertyValue>; Property::COUNT];

fn empty_shadow() -> Shadow {
    std::array::from_fn(|_| None)
}

/// Write/read counters, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextStats {
    /// Property writes forwarded to the device.
    pub forwarded: u64,
    /// Property writes dropped because the value was unchanged.
    pub suppressed: u64,
    /// Property reads that had to go to the device.
    pub device_reads: u64,
}

/// A drawing device with a property cache in front of it.
#[derive(Debug)]
pub struct CachedContext<D> {
    device: D,
    shadow: Shadow,
    stack: Vec<Shadow>,
    stats: ContextStats,
    widths: WidthCache,
}

impl<D: DrawingDevice> CachedContext<D> {
    /// Wrap `device`. The cache starts empty.
    #[must_use]
    pub fn new(device: D) -> Self {
        Self {
            device,
            shadow: empty_shadow(),
            stack: Vec::new(),
            stats: ContextStats::default(),
            widths: WidthCache::default(),
        }
    }

    /// The wrapped device.
    #[inline]
    #[must_use]
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the wrapped device.
    ///
    /// Property writes made here bypass the cache; call
    /// [`invalidate`](Self::invalidate) afterwards if any were made.
    #[inline]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    #[must_use]
    pub fn into_inner(self) -> D {
        self.device
    }

    #[inline]
    #[must_use]
    pub const fn stats(&self) -> ContextStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = ContextStats::default();
    }

    /// Current save depth.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Forget every cached value and pending save.
    ///
    /// Needed after the device state was reset, e.g. by a backing-store
    /// resize. Measured text widths are kept.
    pub fn invalidate(&mut self) {
        self.shadow = empty_shadow();
        self.stack.clear();
    }

    /// Drop memoized text widths, e.g. after web fonts finished loading.
    pub fn clear_text_metrics(&mut self) {
        self.widths.clear();
    }

    // ------------------------------------------------------------------
    // Property access
    // ------------------------------------------------------------------

    /// Read a property, populating the cache from the device on first use.
    pub fn get(&mut self, property: Property) -> &PropertyValue {
        let slot = &mut self.shadow[property.index()];
        if slot.is_none() {
            self.stats.device_reads += 1;
        }
        slot.get_or_insert_with(|| self.device.read_property(property))
    }

    /// Write a property if it differs from the cached value.
    ///
    /// Returns whether the write was forwarded.
    pub fn set(&mut self, property: Property, value: PropertyValue) -> bool {
        if self.get(property) == &value {
            self.stats.suppressed += 1;
            return false;
        }
        self.device.write_property(property, &value);
        self.shadow[property.index()] = Some(value);
        self.stats.forwarded += 1;
        true
    }

    #[must_use]
    pub fn fill_style(&mut self) -> Option<PackedRgba> {
        self.get(Property::FillStyle).as_color()
    }

    pub fn set_fill_style(&mut self, color: PackedRgba) -> bool {
        self.set(Property::FillStyle, PropertyValue::Color(color))
    }

    #[must_use]
    pub fn stroke_style(&mut self) -> Option<PackedRgba> {
        self.get(Property::StrokeStyle).as_color()
    }

    pub fn set_stroke_style(&mut self, color: PackedRgba) -> bool {
        self.set(Property::StrokeStyle, PropertyValue::Color(color))
    }

    #[must_use]
    pub fn font(&mut self) -> String {
        self.get(Property::Font).as_text().unwrap_or_default().to_owned()
    }

    /// Set the font. Compares before allocating.
    pub fn set_font(&mut self, font: &str) -> bool {
        if self.get(Property::Font).is_text(font) {
            self.stats.suppressed += 1;
            return false;
        }
        self.set(Property::Font, PropertyValue::Text(font.to_owned()))
    }

    pub fn set_line_width(&mut self, width: f64) -> bool {
        self.set(Property::LineWidth, PropertyValue::Number(width))
    }

    pub fn set_text_align(&mut self, align: TextAlign) -> bool {
        self.set(Property::TextAlign, PropertyValue::Align(align))
    }

    #[must_use]
    pub fn text_align(&mut self) -> TextAlign {
        match self.get(Property::TextAlign) {
            PropertyValue::Align(a) => *a,
            _ => TextAlign::default(),
        }
    }

    pub fn set_text_baseline(&mut self, baseline: TextBaseline) -> bool {
        self.set(Property::TextBaseline, PropertyValue::Baseline(baseline))
    }

    pub fn set_global_alpha(&mut self, alpha: f64) -> bool {
        self.set(Property::GlobalAlpha, PropertyValue::Number(alpha))
    }

    // ------------------------------------------------------------------
    // State stack
    // ------------------------------------------------------------------

    /// Push device state and a copy of the cache.
    pub fn save(&mut self) {
        self.device.save();
        self.stack.push(self.shadow.clone());
    }

    /// Pop device state and the matching cache. Unbalanced calls are ignored.
    pub fn restore(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.device.restore();
            self.shadow = saved;
        }
    }

    /// Save now and restore when the returned guard is dropped, including
    /// during unwinding.
    pub fn save_scope(&mut self) -> SaveScope<'_, D> {
        self.save();
        SaveScope { ctx: self }
    }

    // ------------------------------------------------------------------
    // Forwarded drawing calls
    // ------------------------------------------------------------------

    #[inline]
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.device.scale(sx, sy);
    }

    #[inline]
    pub fn begin_path(&mut self) {
        self.device.begin_path();
    }

    #[inline]
    pub fn close_path(&mut self) {
        self.device.close_path();
    }

    #[inline]
    pub fn rect(&mut self, rect: Rect) {
        self.device.rect(rect);
    }

    #[inline]
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.device.move_to(x, y);
    }

    #[inline]
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.device.line_to(x, y);
    }

    #[inline]
    pub fn clip(&mut self) {
        self.device.clip();
    }

    #[inline]
    pub fn fill(&mut self) {
        self.device.fill();
    }

    #[inline]
    pub fn stroke(&mut self) {
        self.device.stroke();
    }

    #[inline]
    pub fn fill_rect(&mut self, rect: Rect) {
        self.device.fill_rect(rect);
    }

    #[inline]
    pub fn clear_rect(&mut self, rect: Rect) {
        self.device.clear_rect(rect);
    }

    #[inline]
    pub fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.device.fill_text(text, x, y);
    }

    #[inline]
    pub fn draw_image(&mut self, icon: &Icon, dest: Rect) {
        self.device.draw_image(icon, dest);
    }

    /// Clear `rect` to transparent, then fill it with `color`.
    pub fn clear_fill(&mut self, rect: Rect, color: PackedRgba) {
        self.device.clear_rect(rect);
        self.set_fill_style(color);
        self.device.fill_rect(rect);
    }

    /// Alpha of an optional color; `None` is fully transparent.
    #[inline]
    #[must_use]
    pub fn alpha(color: Option<PackedRgba>) -> f64 {
        crate::color::alpha_of(color)
    }
}

impl<D: DrawingDevice> TextMeasure for CachedContext<D> {
    fn text_width(&mut self, font: &str, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let Self {
            device,
            widths,
            shadow,
            stats,
            ..
        } = self;
        widths.get_or_compute_with(font, text, || {
            let current = shadow[Property::Font.index()]
                .get_or_insert_with(|| {
                    stats.device_reads += 1;
                    device.read_property(Property::Font)
                });
            if current.is_text(font) {
                stats.suppressed += 1;
            } else {
                let value = PropertyValue::Text(font.to_owned());
                device.write_property(Property::Font, &value);
                *current = value;
                stats.forwarded += 1;
            }
            device.measure_text(text)
        })
    }

    fn text_height(&mut self, font: &str) -> f64 {
        self.device.text_height(font)
    }
}

/// Guard returned by [`CachedContext::save_scope`].
#[derive(Debug)]
pub struct SaveScope<'a, D: DrawingDevice> {
    ctx: &'a mut CachedContext<D>,
}

impl<D: DrawingDevice> Deref for SaveScope<'_, D> {
    type Target = CachedContext<D>;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl<D: DrawingDevice> DerefMut for SaveScope<'_, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl<D: DrawingDevice> Drop for SaveScope<'_, D> {
    fn drop(&mut self) {
        self.ctx.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawOp, RecordingDevice};
    use proptest::prelude::*;

    fn ctx() -> CachedContext<RecordingDevice> {
        CachedContext::new(RecordingDevice::new(100, 100))
    }

    // ==========================================================================
    // Compare-before-write
    // ==========================================================================

    #[test]
    fn same_value_twice_forwards_once() {
        let mut gc = ctx();
        assert!(gc.set_fill_style(PackedRgba::WHITE));
        assert!(!gc.set_fill_style(PackedRgba::WHITE));
        assert_eq!(gc.device().property_writes(Property::FillStyle), 1);
        assert_eq!(gc.stats().forwarded, 1);
        assert_eq!(gc.stats().suppressed, 1);
    }

    #[test]
    fn writing_device_default_is_suppressed() {
        let mut gc = ctx();
        assert!(!gc.set_fill_style(PackedRgba::BLACK));
        assert_eq!(gc.device().property_writes(Property::FillStyle), 0);
        assert_eq!(gc.stats().device_reads, 1);
    }

    #[test]
    fn reads_hit_device_once() {
        let mut gc = ctx();
        let _ = gc.font();
        let _ = gc.font();
        let _ = gc.fill_style();
        assert_eq!(gc.stats().device_reads, 2);
    }

    #[test]
    fn set_font_compares_strings() {
        let mut gc = ctx();
        assert!(gc.set_font("13px Tahoma"));
        assert!(!gc.set_font("13px Tahoma"));
        assert!(gc.set_font("bold 13px Tahoma"));
        assert_eq!(gc.device().property_writes(Property::Font), 2);
    }

    // ==========================================================================
    // Save / restore
    // ==========================================================================

    #[test]
    fn restore_reverts_cached_values() {
        let mut gc = ctx();
        gc.set_fill_style(PackedRgba::WHITE);
        gc.save();
        gc.set_fill_style(PackedRgba::rgb(1, 2, 3));
        gc.restore();
        assert_eq!(gc.fill_style(), Some(PackedRgba::WHITE));
        assert_eq!(gc.device().current(Property::FillStyle).as_color(), Some(PackedRgba::WHITE));
        // The cache knows the device reverted, so this is a no-op.
        assert!(!gc.set_fill_style(PackedRgba::WHITE));
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut gc = ctx();
        gc.restore();
        assert_eq!(gc.depth(), 0);
        assert!(!gc.device().ops().contains(&DrawOp::Restore));
    }

    #[test]
    fn save_scope_restores_on_drop() {
        let mut gc = ctx();
        {
            let mut scope = gc.save_scope();
            scope.set_line_width(4.0);
            assert_eq!(scope.depth(), 1);
        }
        assert_eq!(gc.depth(), 0);
        assert_eq!(gc.get(Property::LineWidth).as_number(), Some(1.0));
    }

    #[test]
    fn save_scope_restores_on_unwind() {
        let mut gc = ctx();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut scope = gc.save_scope();
            scope.set_line_width(4.0);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(gc.depth(), 0);
        assert_eq!(gc.device().depth(), 0);
    }

    #[test]
    fn invalidate_rereads_device() {
        let mut gc = ctx();
        gc.set_fill_style(PackedRgba::WHITE);
        gc.device_mut().set_backing_size(200, 200);
        gc.invalidate();
        assert_eq!(gc.fill_style(), Some(PackedRgba::BLACK));
        assert!(gc.set_fill_style(PackedRgba::WHITE));
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    #[test]
    fn clear_fill_clears_then_fills() {
        let mut gc = ctx();
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        gc.clear_fill(r, PackedRgba::WHITE);
        let ops = gc.device().ops();
        let clear = ops.iter().position(|op| *op == DrawOp::ClearRect(r));
        let fill = ops.iter().position(|op| matches!(op, DrawOp::FillRect { rect, .. } if *rect == r));
        assert!(clear < fill);
    }

    #[test]
    fn text_width_is_memoized() {
        let mut gc = ctx();
        let a = gc.text_width("13px Tahoma", "hello");
        let b = gc.text_width("13px Tahoma", "hello");
        assert_eq!(a, b);
        assert_eq!(gc.device().measure_calls(), 1);
        assert_eq!(gc.text_width("13px Tahoma", ""), 0.0);
    }

    proptest! {
        #[test]
        fn save_restore_is_identity(widths in prop::collection::vec(0.5f64..10.0, 0..8)) {
            let mut gc = ctx();
            gc.set_line_width(2.0);
            gc.set_fill_style(PackedRgba::WHITE);
            let before: Vec<PropertyValue> =
                Property::ALL.iter().map(|p| gc.get(*p).clone()).collect();

            gc.save();
            for w in &widths {
                gc.set_line_width(*w);
                gc.set_font(&format!("{w}px Arial"));
            }
            gc.restore();

            let after: Vec<PropertyValue> =
                Property::ALL.iter().map(|p| gc.get(*p).clone()).collect();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn forwarded_iff_changed(values in prop::collection::vec(0u8..4, 1..32)) {
            let mut gc = ctx();
            let mut last = PackedRgba::BLACK;
            let mut expected = 0;
            for v in values {
                let c = PackedRgba::rgb(v, 0, 0);
                if c != last {
                    expected += 1;
                    last = c;
                }
                gc.set_fill_style(c);
            }
            prop_assert_eq!(gc.device().property_writes(Property::FillStyle), expected);
        }
    }
}
