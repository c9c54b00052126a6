#![forbid(unsafe_code)]

//! Text measurement seam.
//!
//! Layout never measures text itself; it asks a [`TextMeasure`]. The drawing
//! context implements it by forwarding to the device, tests use
//! [`MonospaceMeasure`].

use unicode_width::UnicodeWidthStr;

/// Measures rendered text in logical pixels.
pub trait TextMeasure {
    /// Advance width of `text` rendered in `font`.
    fn text_width(&mut self, font: &str, text: &str) -> f64;

    /// Line height of `font`.
    fn text_height(&mut self, font: &str) -> f64;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &mut T {
    #[inline]
    fn text_width(&mut self, font: &str, text: &str) -> f64 {
        (**self).text_width(font, text)
    }

    #[inline]
    fn text_height(&mut self, font: &str) -> f64 {
        (**self).text_height(font)
    }
}

/// Fixed-advance measurer: every terminal column is `advance` pixels wide.
///
/// Wide (CJK) graphemes count as two columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub advance: f64,
    pub line_height: f64,
}

impl MonospaceMeasure {
    #[must_use]
    pub const fn new(advance: f64, line_height: f64) -> Self {
        Self {
            advance,
            line_height,
        }
    }
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self::new(7.0, 14.0)
    }
}

impl TextMeasure for MonospaceMeasure {
    #[inline]
    fn text_width(&mut self, _font: &str, text: &str) -> f64 {
        text.width() as f64 * self.advance
    }

    #[inline]
    fn text_height(&mut self, _font: &str) -> f64 {
        self.line_height
    }
}

/// Pixel size of a CSS font shorthand such as `"bold 13px Tahoma"`.
#[must_use]
pub fn font_size_px(font: &str) -> Option<f64> {
    font.split_whitespace()
        .find_map(|part| part.strip_suffix("px"))
        .and_then(|n| n.parse::<f64>().ok())
        .filter(|n| *n > 0.0)
}
