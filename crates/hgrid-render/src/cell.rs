#![forbid(unsafe_code)]

//! Cell paint inputs, outputs and the per-cell snapshot cache.
//!
//! A [`CellPaintConfig`] is rebuilt for every cell on every paint. The
//! [`CellSnapshot`] it produces is retained per [`CellAddress`] in a
//! [`SnapshotStore`] and compared on the next paint to decide whether the
//! cell can be skipped.

use std::fmt;

use bitflags::bitflags;
use hgrid_core::geometry::Rect;
use hgrid_text::Truncation;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::color::PackedRgba;
use crate::icon::{Icon, IconId, IconRegistry, IconRole};

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A cell value as supplied by the data model.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// An image drawn centered in place of text.
    Image(Icon),
    /// A value flanked by explicit icons.
    Decorated(Box<Decorated>),
}

/// `[left icon, value, right icon]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorated {
    pub left: Option<Icon>,
    pub value: CellValue,
    pub right: Option<Icon>,
}

impl CellValue {
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    #[must_use]
    pub fn decorated(left: Option<Icon>, value: CellValue, right: Option<Icon>) -> Self {
        Self::Decorated(Box::new(Decorated { left, value, right }))
    }

    /// Truthiness: empty, `false`, zero, NaN and `""` are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::Image(_) | Self::Decorated(_) => true,
        }
    }

    /// Zero or `false`: the falsy values that "render falsy" still shows.
    #[must_use]
    pub fn is_zero_like(&self) -> bool {
        matches!(self, Self::Bool(false) | Self::Int(0)) || matches!(self, Self::Float(f) if *f == 0.0)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty | Self::Image(_) => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Decorated(d) => fmt::Display::fmt(&d.value, f),
        }
    }
}

/// Data-model accessors used while painting.
pub trait CellBehavior {
    /// Evaluate the middle element of a decorated value.
    fn exec(&self, value: &CellValue) -> CellValue {
        value.clone()
    }

    /// Turn a renderable value into display text.
    fn format_value(&self, value: &CellValue) -> String {
        value.to_string()
    }
}

/// Identity `exec`, `Display` formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBehavior;

impl CellBehavior for DefaultBehavior {}

// ---------------------------------------------------------------------------
// Style and state
// ---------------------------------------------------------------------------

/// Horizontal alignment of cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A hover highlight.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HoverHighlight {
    pub enabled: bool,
    pub background_color: Option<PackedRgba>,
    /// Override used for header (non-data) cells of a hovered row/column.
    pub header_background_color: Option<PackedRgba>,
}

impl HoverHighlight {
    #[must_use]
    pub const fn color(background: PackedRgba) -> Self {
        Self {
            enabled: true,
            background_color: Some(background),
            header_background_color: None,
        }
    }
}

/// Per-column (or per-cell) style attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct CellStyle {
    pub font: String,
    pub selection_font: String,
    pub color: PackedRgba,
    pub selection_color: PackedRgba,
    pub background_color: PackedRgba,
    pub background_selection_color: Option<PackedRgba>,
    /// Ambient color the grid pre-fills behind cells. `None` enables
    /// partial rendering (skipping unchanged cells).
    pub prefill_color: Option<PackedRgba>,
    pub hover_cell: HoverHighlight,
    pub hover_row: HoverHighlight,
    pub hover_column: HoverHighlight,
    pub halign: HAlign,
    pub truncation: Truncation,
    pub cell_padding: f64,
    pub icon_padding: f64,
    pub top_padding: f64,
    /// Extra vertical offset for wrapped header text.
    pub voffset: f64,
    pub left_icon: Option<String>,
    pub center_icon: Option<String>,
    pub right_icon: Option<String>,
    /// The icon whose drawn rectangle is reported for hit testing.
    pub hot_icon: Option<IconRole>,
    /// `0` draws no border.
    pub border_thickness: f64,
    pub border_color: PackedRgba,
    pub render_falsy: bool,
    pub header_text_wrapping: bool,
    pub column_autosizing: bool,
    pub link: bool,
    pub link_on_hover: bool,
    pub link_color: Option<PackedRgba>,
    pub link_color_on_hover: bool,
    pub strike_through: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            font: "13px Tahoma".to_owned(),
            selection_font: "bold 13px Tahoma".to_owned(),
            color: PackedRgba::rgb(0x33, 0x33, 0x33),
            selection_color: PackedRgba::rgb(0x33, 0x33, 0x33),
            background_color: PackedRgba::WHITE,
            background_selection_color: Some(PackedRgba::rgba(147, 185, 255, 159)),
            prefill_color: None,
            hover_cell: HoverHighlight::default(),
            hover_row: HoverHighlight::default(),
            hover_column: HoverHighlight::default(),
            halign: HAlign::Left,
            truncation: Truncation::Ellipsis,
            cell_padding: 5.0,
            icon_padding: 3.0,
            top_padding: 0.0,
            voffset: 0.0,
            left_icon: None,
            center_icon: None,
            right_icon: None,
            hot_icon: None,
            border_thickness: 0.0,
            border_color: PackedRgba::rgb(0xc7, 0xc7, 0xc7),
            render_falsy: false,
            header_text_wrapping: false,
            column_autosizing: false,
            link: false,
            link_on_hover: false,
            link_color: None,
            link_color_on_hover: false,
            strike_through: false,
        }
    }
}

bitflags! {
    /// Per-paint cell state.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CellState: u8 {
        const SELECTED       = 1 << 0;
        const CELL_HOVERED   = 1 << 1;
        const ROW_HOVERED    = 1 << 2;
        const COLUMN_HOVERED = 1 << 3;
        const DATA_ROW       = 1 << 4;
        const DATA_COLUMN    = 1 << 5;
        const HEADER_ROW     = 1 << 6;
        const USER_DATA_AREA = 1 << 7;
    }
}

impl CellState {
    /// An ordinary body cell.
    pub const DATA: Self = Self::DATA_ROW
        .union(Self::DATA_COLUMN)
        .union(Self::USER_DATA_AREA);
}

// ---------------------------------------------------------------------------
// Config and snapshot
// ---------------------------------------------------------------------------

/// Drawn icon rectangles, relative to the cell origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClickRects {
    pub left: Option<Rect>,
    pub center: Option<Rect>,
    pub right: Option<Rect>,
}

impl ClickRects {
    pub fn set(&mut self, role: IconRole, rect: Rect) {
        match role {
            IconRole::Left => self.left = Some(rect),
            IconRole::Center => self.center = Some(rect),
            IconRole::Right => self.right = Some(rect),
        }
    }

    #[must_use]
    pub const fn get(&self, role: IconRole) -> Option<Rect> {
        match role {
            IconRole::Left => self.left,
            IconRole::Center => self.center,
            IconRole::Right => self.right,
        }
    }
}

/// Everything needed to paint one cell, plus its out-values.
pub struct CellPaintConfig<'a> {
    pub value: CellValue,
    pub bounds: Rect,
    pub style: &'a CellStyle,
    pub state: CellState,
    pub behavior: &'a dyn CellBehavior,
    pub icons: &'a IconRegistry,
    /// Out: natural width for column auto-sizing.
    pub min_width: f64,
    /// Out: hot-icon rectangle, when one was drawn.
    pub click_rects: ClickRects,
}

impl<'a> CellPaintConfig<'a> {
    #[must_use]
    pub fn new(
        value: CellValue,
        bounds: Rect,
        style: &'a CellStyle,
        behavior: &'a dyn CellBehavior,
        icons: &'a IconRegistry,
    ) -> Self {
        Self {
            value,
            bounds,
            style,
            state: CellState::DATA,
            behavior,
            icons,
            min_width: 0.0,
            click_rects: ClickRects::default(),
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: CellState) -> Self {
        self.state = state;
        self
    }

    #[inline]
    #[must_use]
    pub fn is(&self, flag: CellState) -> bool {
        self.state.contains(flag)
    }
}

impl fmt::Debug for CellPaintConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellPaintConfig")
            .field("value", &self.value)
            .field("bounds", &self.bounds)
            .field("state", &self.state)
            .field("min_width", &self.min_width)
            .finish_non_exhaustive()
    }
}

/// What a cell looked like when it was last painted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellSnapshot {
    pub value: String,
    pub left_icon: Option<IconId>,
    pub right_icon: Option<IconId>,
    pub text_color: Option<PackedRgba>,
    pub text_font: Option<String>,
    /// Whether `colors[0]` is the opaque base background.
    pub foundation_color: bool,
    pub colors: SmallVec<[PackedRgba; 4]>,
    /// Hot-icon rectangles; not part of the comparison.
    pub click_rects: ClickRects,
}

impl CellSnapshot {
    /// Field-by-field appearance comparison, colors by length and order.
    #[must_use]
    pub fn same_appearance(&self, other: &CellSnapshot) -> bool {
        self.value == other.value
            && self.text_font == other.text_font
            && self.text_color == other.text_color
            && self.left_icon == other.left_icon
            && self.right_icon == other.right_icon
            && self.foundation_color == other.foundation_color
            && self.colors == other.colors
    }
}

/// Logical cell identity, stable across scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub column: usize,
    pub row: usize,
}

impl CellAddress {
    #[must_use]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// Retained snapshots, one per logical cell.
#[derive(Debug, Default, Clone)]
pub struct SnapshotStore {
    snapshots: FxHashMap<CellAddress, Option<CellSnapshot>>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The retained slot for `address`, created empty on first use.
    pub fn slot(&mut self, address: CellAddress) -> &mut Option<CellSnapshot> {
        self.snapshots.entry(address).or_default()
    }

    #[must_use]
    pub fn get(&self, address: CellAddress) -> Option<&CellSnapshot> {
        self.snapshots.get(&address).and_then(Option::as_ref)
    }

    /// Forget one cell so it repaints in full next time.
    pub fn invalidate(&mut self, address: CellAddress) {
        self.snapshots.remove(&address);
    }

    /// Forget everything, e.g. after the grid shape changed.
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Number of cells with a retained snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.values().filter(|s| s.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!CellValue::Empty.is_truthy());
        assert!(!CellValue::Int(0).is_truthy());
        assert!(!CellValue::Float(f64::NAN).is_truthy());
        assert!(!CellValue::text("").is_truthy());
        assert!(!CellValue::Bool(false).is_truthy());
        assert!(CellValue::text("0").is_truthy());
        assert!(CellValue::Float(-0.5).is_truthy());
    }

    #[test]
    fn zero_like() {
        assert!(CellValue::Int(0).is_zero_like());
        assert!(CellValue::Float(0.0).is_zero_like());
        assert!(CellValue::Bool(false).is_zero_like());
        assert!(!CellValue::Empty.is_zero_like());
        assert!(!CellValue::text("").is_zero_like());
        assert!(!CellValue::Float(f64::NAN).is_zero_like());
    }

    #[test]
    fn display_formats() {
        assert_eq!(CellValue::Int(42).to_string(), "42");
        assert_eq!(CellValue::Float(2.0).to_string(), "2");
        assert_eq!(CellValue::Float(1.25).to_string(), "1.25");
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(
            CellValue::decorated(None, CellValue::text("x"), None).to_string(),
            "x"
        );
    }

    #[test]
    fn snapshot_comparison_ignores_click_rects() {
        let a = CellSnapshot {
            value: "Alpha".into(),
            colors: SmallVec::from_slice(&[PackedRgba::WHITE]),
            ..CellSnapshot::default()
        };
        let mut b = a.clone();
        b.click_rects.left = Some(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(a.same_appearance(&b));

        b.colors.push(PackedRgba::BLACK);
        assert!(!a.same_appearance(&b));
    }

    #[test]
    fn snapshot_store_slots() {
        let mut store = SnapshotStore::new();
        let addr = CellAddress::new(2, 7);
        assert!(store.slot(addr).is_none());
        assert!(store.is_empty());
        *store.slot(addr) = Some(CellSnapshot::default());
        assert_eq!(store.len(), 1);
        store.invalidate(addr);
        assert!(store.get(addr).is_none());
    }

    #[test]
    fn click_rects_by_role() {
        let mut rects = ClickRects::default();
        let r = Rect::new(3.0, 4.0, 16.0, 16.0);
        rects.set(IconRole::Right, r);
        assert_eq!(rects.get(IconRole::Right), Some(r));
        assert_eq!(rects.get(IconRole::Left), None);
    }
}
