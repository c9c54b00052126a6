#![forbid(unsafe_code)]

//! Headless drawing device that records every call.
//!
//! Behaves like a browser 2-D canvas as far as state is concerned (property
//! bag, save/restore stack, reset on resize) and measures text with a
//! [`MonospaceMeasure`]. Used by tests, benchmarks and replay tooling.

use hgrid_core::geometry::Rect;
use hgrid_text::{MonospaceMeasure, TextMeasure};

use crate::color::PackedRgba;
use crate::device::{DrawingDevice, Property, PropertyValue, TextAlign};
use crate::icon::{Icon, IconId};

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    SetProperty(Property, PropertyValue),
    Save,
    Restore,
    Resize { width: u32, height: u32 },
    Scale { sx: f64, sy: f64 },
    BeginPath,
    ClosePath,
    Rect(Rect),
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Clip,
    Fill,
    Stroke { color: PackedRgba, width: f64 },
    FillRect { rect: Rect, color: PackedRgba },
    ClearRect(Rect),
    FillText {
        text: String,
        x: f64,
        y: f64,
        color: PackedRgba,
        font: String,
        align: TextAlign,
    },
    DrawImage { icon: IconId, dest: Rect },
}

impl DrawOp {
    /// Whether the call changes pixels.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            Self::Fill
                | Self::Stroke { .. }
                | Self::FillRect { .. }
                | Self::ClearRect(_)
                | Self::FillText { .. }
                | Self::DrawImage { .. }
        )
    }
}

#[derive(Debug, Clone)]
struct DeviceState {
    properties: Vec<PropertyValue>,
    scale: (f64, f64),
}

impl DeviceState {
    fn initial() -> Self {
        Self {
            properties: Property::ALL.iter().map(|p| p.initial_value()).collect(),
            scale: (1.0, 1.0),
        }
    }
}

/// A recording, canvas-like drawing device.
#[derive(Debug, Clone)]
pub struct RecordingDevice {
    state: DeviceState,
    stack: Vec<DeviceState>,
    size: (u32, u32),
    ops: Vec<DrawOp>,
    recording: bool,
    writes: [u64; Property::COUNT],
    draw_calls: u64,
    measure_calls: u64,
    measure: MonospaceMeasure,
    font_heights: Vec<(String, f64)>,
}

impl RecordingDevice {
    /// A device with the given backing size in device pixels.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: DeviceState::initial(),
            stack: Vec::new(),
            size: (width, height),
            ops: Vec::new(),
            recording: true,
            writes: [0; Property::COUNT],
            draw_calls: 0,
            measure_calls: 0,
            measure: MonospaceMeasure::default(),
            font_heights: Vec::new(),
        }
    }

    /// Builder: measure text with `measure`.
    #[must_use]
    pub fn with_measure(mut self, measure: MonospaceMeasure) -> Self {
        self.measure = measure;
        self
    }

    /// Builder: report `height` as the line height of `font`.
    #[must_use]
    pub fn with_font_height(mut self, font: impl Into<String>, height: f64) -> Self {
        self.font_heights.push((font.into(), height));
        self
    }

    /// Turn op recording on or off. Counters are always maintained.
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Recorded pixel-changing calls.
    pub fn drawing_ops(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| op.is_drawing())
    }

    /// Texts drawn with `fill_text`, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of writes that reached this device for `property`.
    #[must_use]
    pub fn property_writes(&self, property: Property) -> u64 {
        self.writes[property.index()]
    }

    /// Total property writes across all properties.
    #[must_use]
    pub fn total_property_writes(&self) -> u64 {
        self.writes.iter().sum()
    }

    /// Total pixel-changing calls, whether recorded or not.
    #[must_use]
    pub const fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    #[must_use]
    pub const fn measure_calls(&self) -> u64 {
        self.measure_calls
    }

    /// Reset all counters.
    pub fn reset_counters(&mut self) {
        self.writes = [0; Property::COUNT];
        self.draw_calls = 0;
        self.measure_calls = 0;
    }

    /// Current value of `property` on the device.
    #[must_use]
    pub fn current(&self, property: Property) -> &PropertyValue {
        &self.state.properties[property.index()]
    }

    /// Current save depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Accumulated transform scale.
    #[must_use]
    pub const fn current_scale(&self) -> (f64, f64) {
        self.state.scale
    }

    fn color(&self, property: Property) -> PackedRgba {
        self.current(property).as_color().unwrap_or_default()
    }

    fn record(&mut self, op: DrawOp) {
        if op.is_drawing() {
            self.draw_calls += 1;
        }
        if self.recording {
            self.ops.push(op);
        }
    }
}

impl DrawingDevice for RecordingDevice {
    fn read_property(&self, property: Property) -> PropertyValue {
        self.current(property).clone()
    }

    fn write_property(&mut self, property: Property, value: &PropertyValue) {
        self.writes[property.index()] += 1;
        self.state.properties[property.index()] = value.clone();
        self.record(DrawOp::SetProperty(property, value.clone()));
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.record(DrawOp::Save);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
            self.record(DrawOp::Restore);
        }
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.state = DeviceState::initial();
        self.stack.clear();
        self.record(DrawOp::Resize { width, height });
    }

    fn backing_size(&self) -> (u32, u32) {
        self.size
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.scale = (self.state.scale.0 * sx, self.state.scale.1 * sy);
        self.record(DrawOp::Scale { sx, sy });
    }

    fn begin_path(&mut self) {
        self.record(DrawOp::BeginPath);
    }

    fn close_path(&mut self) {
        self.record(DrawOp::ClosePath);
    }

    fn rect(&mut self, rect: Rect) {
        self.record(DrawOp::Rect(rect));
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.record(DrawOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.record(DrawOp::LineTo { x, y });
    }

    fn clip(&mut self) {
        self.record(DrawOp::Clip);
    }

    fn fill(&mut self) {
        self.record(DrawOp::Fill);
    }

    fn stroke(&mut self) {
        let color = self.color(Property::StrokeStyle);
        let width = self.current(Property::LineWidth).as_number().unwrap_or(1.0);
        self.record(DrawOp::Stroke { color, width });
    }

    fn fill_rect(&mut self, rect: Rect) {
        let color = self.color(Property::FillStyle);
        self.record(DrawOp::FillRect { rect, color });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.record(DrawOp::ClearRect(rect));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let color = self.color(Property::FillStyle);
        let font = self
            .current(Property::Font)
            .as_text()
            .unwrap_or_default()
            .to_owned();
        let align = match self.current(Property::TextAlign) {
            PropertyValue::Align(a) => *a,
            _ => TextAlign::default(),
        };
        self.record(DrawOp::FillText {
            text: text.to_owned(),
            x,
            y,
            color,
            font,
            align,
        });
    }

    fn draw_image(&mut self, icon: &Icon, dest: Rect) {
        self.record(DrawOp::DrawImage { icon: icon.id, dest });
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        self.measure_calls += 1;
        self.measure.text_width("", text)
    }

    fn text_height(&mut self, font: &str) -> f64 {
        self.font_heights
            .iter()
            .find(|(f, _)| f == font)
            .map_or_else(|| self.measure.text_height(font), |(_, h)| *h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_resets_state() {
        let mut dev = RecordingDevice::new(10, 10);
        dev.write_property(Property::LineWidth, &PropertyValue::Number(3.0));
        dev.save();
        dev.scale(2.0, 2.0);
        dev.set_backing_size(20, 20);
        assert_eq!(dev.backing_size(), (20, 20));
        assert_eq!(dev.current(Property::LineWidth).as_number(), Some(1.0));
        assert_eq!(dev.depth(), 0);
        assert_eq!(dev.current_scale(), (1.0, 1.0));
    }

    #[test]
    fn restore_pops_state() {
        let mut dev = RecordingDevice::new(10, 10);
        dev.save();
        dev.write_property(Property::FillStyle, &PropertyValue::Color(PackedRgba::WHITE));
        dev.restore();
        assert_eq!(dev.current(Property::FillStyle).as_color(), Some(PackedRgba::BLACK));
        assert_eq!(dev.property_writes(Property::FillStyle), 1);
    }

    #[test]
    fn fill_rect_captures_current_color() {
        let mut dev = RecordingDevice::new(10, 10);
        dev.write_property(Property::FillStyle, &PropertyValue::Color(PackedRgba::WHITE));
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        dev.fill_rect(r);
        assert_eq!(
            dev.ops().last(),
            Some(&DrawOp::FillRect {
                rect: r,
                color: PackedRgba::WHITE
            })
        );
        assert_eq!(dev.draw_calls(), 1);
    }

    #[test]
    fn counters_survive_disabled_recording() {
        let mut dev = RecordingDevice::new(10, 10);
        dev.set_recording(false);
        dev.fill_text("x", 0.0, 0.0);
        assert!(dev.ops().is_empty());
        assert_eq!(dev.draw_calls(), 1);
    }

    #[test]
    fn measures_with_monospace() {
        let mut dev = RecordingDevice::new(10, 10).with_measure(MonospaceMeasure::new(5.0, 12.0));
        assert_eq!(dev.measure_text("abcd"), 20.0);
        assert_eq!(dev.text_height("13px Tahoma"), 12.0);
        assert_eq!(dev.measure_calls(), 1);
    }
}
