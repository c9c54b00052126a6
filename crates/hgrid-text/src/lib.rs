#![forbid(unsafe_code)]

//! Text layout for grid cells.
//!
//! - [`measure`]: the [`TextMeasure`] seam and a monospace measurer
//! - [`width_cache`]: LRU memoization of measurements
//! - [`truncate`]: single-line fit with optional ellipsis
//! - [`wrap`]: greedy multi-line word wrap

pub mod measure;
pub mod truncate;
pub mod width_cache;
pub mod wrap;

pub use measure::{MonospaceMeasure, TextMeasure, font_size_px};
pub use truncate::{ELLIPSIS, Truncated, Truncation, measure_truncated};
pub use width_cache::{CacheStats, CachedMeasure, WidthCache};
pub use wrap::{find_lines, normalize_whitespace, wrap_words};
