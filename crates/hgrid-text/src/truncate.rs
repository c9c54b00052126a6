#![forbid(unsafe_code)]

//! Single-line measurement and truncation.
//!
//! Truncation is grapheme-aware: a cluster is never split. Right-aligned
//! text keeps its tail and drops leading graphemes, so the visible end of
//! the value stays anchored to the cell edge.

use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

use crate::measure::TextMeasure;

/// The ellipsis appended (or prepended) to truncated text.
pub const ELLIPSIS: &str = "\u{2026}";

/// How overflowing text is shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Truncation {
    /// Never shorten; text may overflow the cell.
    None,
    /// Drop graphemes that do not fit.
    Clip,
    /// Drop graphemes and mark the cut with [`ELLIPSIS`].
    #[default]
    Ellipsis,
}

/// Result of [`measure_truncated`].
#[derive(Debug, Clone, PartialEq)]
pub struct Truncated {
    /// Replacement text when the value had to be shortened.
    pub text: Option<String>,
    /// Measured width. With `abort` this is the width of what will be
    /// drawn; without it, the width of the full value.
    pub width: f64,
}

impl Truncated {
    /// The text to draw: the replacement if any, else `original`.
    #[must_use]
    pub fn display<'a>(&'a self, original: &'a str) -> &'a str {
        self.text.as_deref().unwrap_or(original)
    }

    #[inline]
    #[must_use]
    pub fn was_truncated(&self) -> bool {
        self.text.is_some()
    }
}

/// Measure `text` and shorten it to fit `available` pixels.
///
/// `abort` selects which width is reported: the drawn width (`true`) or the
/// full natural width (`false`, used for column auto-sizing, which still
/// draws the shortened string).
pub fn measure_truncated<M>(
    measure: &mut M,
    font: &str,
    text: &str,
    available: f64,
    truncation: Truncation,
    abort: bool,
    right_aligned: bool,
) -> Truncated
where
    M: TextMeasure + ?Sized,
{
    let full = measure.text_width(font, text);
    if full <= available || truncation == Truncation::None {
        return Truncated {
            text: None,
            width: full,
        };
    }

    let marker = match truncation {
        Truncation::Ellipsis if measure.text_width(font, ELLIPSIS) < available => ELLIPSIS,
        _ => "",
    };
    let shortened = fit_graphemes(measure, font, text, available, marker, right_aligned);
    let drawn = measure.text_width(font, &shortened);
    Truncated {
        text: Some(shortened),
        width: if abort { drawn } else { full },
    }
}

/// Keep as many graphemes as fit alongside `marker` within `available`.
fn fit_graphemes<M>(
    measure: &mut M,
    font: &str,
    text: &str,
    available: f64,
    marker: &str,
    from_end: bool,
) -> String
where
    M: TextMeasure + ?Sized,
{
    let budget = available - measure.text_width(font, marker);
    let graphemes: SmallVec<[&str; 32]> = if from_end {
        text.graphemes(true).rev().collect()
    } else {
        text.graphemes(true).collect()
    };

    let mut kept = 0usize;
    let mut used = 0.0;
    for g in &graphemes {
        let w = measure.text_width(font, g);
        if used + w > budget {
            break;
        }
        used += w;
        kept += 1;
    }

    // Per-grapheme sums can undershoot the measured run; verify the joined
    // result and shed graphemes until it fits.
    loop {
        let candidate = assemble(&graphemes[..kept], marker, from_end);
        if kept == 0 || measure.text_width(font, &candidate) <= available {
            return candidate;
        }
        kept -= 1;
    }
}

fn assemble(kept: &[&str], marker: &str, from_end: bool) -> String {
    let mut out = String::with_capacity(kept.iter().map(|g| g.len()).sum::<usize>() + marker.len());
    if from_end {
        out.push_str(marker);
        for g in kept.iter().rev() {
            out.push_str(g);
        }
    } else {
        for g in kept {
            out.push_str(g);
        }
        out.push_str(marker);
    }
    out
}
