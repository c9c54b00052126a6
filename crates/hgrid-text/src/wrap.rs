#![forbid(unsafe_code)]

//! Greedy word wrap for multi-line header cells.

use crate::measure::TextMeasure;

/// Trim and collapse every whitespace run into one space.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Pack `words` into lines no wider than `width`.
///
/// Words are added to the current line while the joined line still fits.
/// A word wider than `width` on its own is placed on its own line rather
/// than split or dropped.
pub fn find_lines<M>(measure: &mut M, font: &str, words: &[&str], width: f64) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let mut lines = Vec::new();
    let mut iter = words.iter().filter(|w| !w.is_empty());
    let Some(first) = iter.next() else {
        return lines;
    };

    let mut line = String::from(*first);
    for word in iter {
        let start = line.len();
        line.push(' ');
        line.push_str(word);
        if measure.text_width(font, &line) > width {
            line.truncate(start);
            lines.push(std::mem::replace(&mut line, String::from(*word)));
        }
    }
    lines.push(line);
    lines
}

/// Normalize `text` and wrap it to `width`.
pub fn wrap_words<M>(measure: &mut M, font: &str, text: &str, width: f64) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let clean = normalize_whitespace(text);
    let words: Vec<&str> = clean.split(' ').collect();
    find_lines(measure, font, &words, width)
}
