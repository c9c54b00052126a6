#![forbid(unsafe_code)]

//! The raw drawing device.
//!
//! [`DrawingDevice`] is the stateful 2-D drawing API the engine paints
//! through: an immediate-mode surface with a property bag, a save/restore
//! state stack, a current path and a transform. Property writes are
//! assumed to be expensive even when they do not change anything, which is
//! why all engine code goes through [`CachedContext`](crate::context::CachedContext).

use hgrid_core::geometry::Rect;

use crate::color::PackedRgba;
use crate::icon::Icon;

/// Horizontal anchor for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlign {
    #[default]
    Start,
    End,
    Left,
    Right,
    Center,
}

/// Vertical anchor for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextBaseline {
    Top,
    Hanging,
    Middle,
    #[default]
    Alphabetic,
    Ideographic,
    Bottom,
}

/// Every stateful property of a drawing device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Property {
    FillStyle,
    StrokeStyle,
    Font,
    LineWidth,
    LineCap,
    LineJoin,
    MiterLimit,
    LineDashOffset,
    TextAlign,
    TextBaseline,
    Direction,
    GlobalAlpha,
    GlobalCompositeOperation,
    ShadowBlur,
    ShadowColor,
    ShadowOffsetX,
    ShadowOffsetY,
    ImageSmoothingEnabled,
    Filter,
}

impl Property {
    /// Number of properties.
    pub const COUNT: usize = 19;

    /// All properties, in declaration order.
    pub const ALL: [Property; Self::COUNT] = [
        Self::FillStyle,
        Self::StrokeStyle,
        Self::Font,
        Self::LineWidth,
        Self::LineCap,
        Self::LineJoin,
        Self::MiterLimit,
        Self::LineDashOffset,
        Self::TextAlign,
        Self::TextBaseline,
        Self::Direction,
        Self::GlobalAlpha,
        Self::GlobalCompositeOperation,
        Self::ShadowBlur,
        Self::ShadowColor,
        Self::ShadowOffsetX,
        Self::ShadowOffsetY,
        Self::ImageSmoothingEnabled,
        Self::Filter,
    ];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The value a freshly created (or freshly resized) device holds.
    #[must_use]
    pub fn initial_value(self) -> PropertyValue {
        match self {
            Self::FillStyle | Self::StrokeStyle => PropertyValue::Color(PackedRgba::BLACK),
            Self::ShadowColor => PropertyValue::Color(PackedRgba::TRANSPARENT),
            Self::Font => PropertyValue::Text("10px sans-serif".to_owned()),
            Self::LineWidth | Self::GlobalAlpha => PropertyValue::Number(1.0),
            Self::MiterLimit => PropertyValue::Number(10.0),
            Self::LineDashOffset | Self::ShadowBlur | Self::ShadowOffsetX | Self::ShadowOffsetY => {
                PropertyValue::Number(0.0)
            }
            Self::LineCap => PropertyValue::Text("butt".to_owned()),
            Self::LineJoin => PropertyValue::Text("miter".to_owned()),
            Self::Direction => PropertyValue::Text("inherit".to_owned()),
            Self::GlobalCompositeOperation => PropertyValue::Text("source-over".to_owned()),
            Self::Filter => PropertyValue::Text("none".to_owned()),
            Self::TextAlign => PropertyValue::Align(TextAlign::Start),
            Self::TextBaseline => PropertyValue::Baseline(TextBaseline::Alphabetic),
            Self::ImageSmoothingEnabled => PropertyValue::Flag(true),
        }
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Color(PackedRgba),
    Number(f64),
    Text(String),
    Flag(bool),
    Align(TextAlign),
    Baseline(TextBaseline),
}

impl PropertyValue {
    /// Compare against a string without allocating.
    #[inline]
    #[must_use]
    pub fn is_text(&self, text: &str) -> bool {
        matches!(self, Self::Text(t) if t == text)
    }

    #[must_use]
    pub fn as_color(&self) -> Option<PackedRgba> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// A stateful immediate-mode 2-D drawing surface.
///
/// Coordinates are in the current transform's user space; after a resize
/// the surface controller scales by the device-pixel ratio so user space is
/// logical pixels.
pub trait DrawingDevice {
    /// Read a property from the device.
    fn read_property(&self, property: Property) -> PropertyValue;

    /// Write a property to the device.
    fn write_property(&mut self, property: Property, value: &PropertyValue);

    /// Push the device state (properties, transform, clip).
    fn save(&mut self);

    /// Pop the device state. Unbalanced restores are ignored.
    fn restore(&mut self);

    /// Resize the backing store in device pixels. Resets all device state.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Backing store size in device pixels.
    fn backing_size(&self) -> (u32, u32);

    /// Multiply the current transform by a scale.
    fn scale(&mut self, sx: f64, sy: f64);

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn rect(&mut self, rect: Rect);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Intersect the clip region with the current path.
    fn clip(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn fill_rect(&mut self, rect: Rect);
    fn clear_rect(&mut self, rect: Rect);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn draw_image(&mut self, icon: &Icon, dest: Rect);

    /// Advance width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f64;

    /// Line height of `font`.
    fn text_height(&mut self, font: &str) -> f64;
}
