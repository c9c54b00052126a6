#![forbid(unsafe_code)]

//! The cell paint routine.
//!
//! [`SimpleCell`] paints one cell: background layers, text, up to three
//! icons and an optional border. Before drawing anything it builds a
//! [`CellSnapshot`] of the intended appearance and, when partial rendering
//! is on, compares it with the snapshot retained from the previous paint of
//! the same cell. Equal snapshots mean the pixels are already right and the
//! cell is skipped without a single device call.
//!
//! Clipping is expensive, so single-line text is truncated to fit instead,
//! and the right icon repaints the background under itself before drawing.

use std::borrow::Cow;

use hgrid_core::geometry::Rect;
use hgrid_text::{TextMeasure, find_lines, measure_truncated, normalize_whitespace};
use smallvec::SmallVec;

use crate::cell::{CellPaintConfig, CellSnapshot, CellState, CellValue, HAlign};
use crate::color::{PackedRgba, alpha_of};
use crate::context::CachedContext;
use crate::device::{DrawingDevice, TextAlign, TextBaseline};
use crate::icon::{Icon, IconRole};

type Colors = SmallVec<[PackedRgba; 4]>;

/// Whether a cell was drawn or found unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOutcome {
    Painted,
    Skipped,
}

/// Paints a single cell.
pub trait CellRenderer {
    /// Paint `config` into `gc`, consulting and replacing `retained`.
    fn paint<D: DrawingDevice>(
        &self,
        gc: &mut CachedContext<D>,
        config: &mut CellPaintConfig<'_>,
        retained: &mut Option<CellSnapshot>,
    ) -> PaintOutcome;
}

/// The default renderer for a plain cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCell;

impl CellRenderer for SimpleCell {
    fn paint<D: DrawingDevice>(
        &self,
        gc: &mut CachedContext<D>,
        config: &mut CellPaintConfig<'_>,
        retained: &mut Option<CellSnapshot>,
    ) -> PaintOutcome {
        let style = config.style;
        let Rect {
            x,
            y,
            width,
            height,
        } = config.bounds;
        let icon_padding = style.icon_padding;
        let partial_render = style.prefill_color.is_none();

        let (left_icon, center_icon, right_icon, text, text_font, text_color) = {
            let (left, center, right, value) = resolve_value(config);
            if value.is_truthy() || (style.render_falsy && value.is_zero_like()) {
                let selected = config.is(CellState::SELECTED);
                let (font, color) = if selected {
                    (&style.selection_font, style.selection_color)
                } else {
                    (&style.font, style.color)
                };
                (
                    left,
                    center,
                    right,
                    config.behavior.format_value(&value),
                    Some(font),
                    Some(color),
                )
            } else {
                (left, center, right, String::new(), None, None)
            }
        };

        let layers = background_layers(config);

        let candidate = CellSnapshot {
            value: text,
            left_icon: left_icon.map(|i| i.id),
            right_icon: right_icon.map(|i| i.id),
            text_color,
            text_font: text_font.cloned(),
            foundation_color: layers.foundation,
            colors: layers.colors,
            click_rects: Default::default(),
        };

        if partial_render {
            if let Some(previous) = retained.as_ref() {
                if previous.same_appearance(&candidate) {
                    if style.hot_icon.is_some() {
                        config.click_rects = previous.click_rects;
                    }
                    return PaintOutcome::Skipped;
                }
            }
        }

        let snapshot = retained.insert(candidate);
        debug_assert!(
            !snapshot.foundation_color
                || snapshot.colors.first() == Some(&style.background_color),
            "foundation color must be the base background"
        );

        layer_colors(gc, &snapshot.colors, config.bounds, snapshot.foundation_color);

        let thickness_padding = style.border_thickness / 2.0;
        let left_padding = left_icon.map_or(style.cell_padding, |i| {
            icon_padding + i.width + icon_padding
        }) + thickness_padding;
        let right_padding = right_icon.map_or(style.cell_padding, |i| {
            icon_padding + i.width + icon_padding
        }) + thickness_padding;

        let mut val_width = 0.0;
        let mut right_empty_width = 0.0;

        if let (Some(font), Some(color)) = (text_font, text_color) {
            gc.set_stroke_style(color);
            gc.set_fill_style(color);
            gc.set_font(font);
            let text = snapshot.value.as_str();
            (val_width, right_empty_width) =
                if config.is(CellState::HEADER_ROW) && style.header_text_wrapping {
                    render_multi_line_text(gc, config, text, font, left_padding, right_padding)
                } else {
                    render_single_line_text(
                        gc,
                        config,
                        text,
                        font,
                        left_padding,
                        right_padding,
                        true,
                    )
                };
        }

        let mut click_rects = snapshot.click_rects;

        if let Some(icon) = center_icon {
            let iy = ((height - icon.height) / 2.0).round();
            let ix = width - ((width - icon.width) / 2.0).round() - icon.width;
            gc.draw_image(&icon, Rect::new(x + ix, y + iy, icon.width, icon.height));
            val_width = icon_padding + icon.width + icon_padding;
            if style.hot_icon == Some(IconRole::Center) {
                click_rects.set(IconRole::Center, Rect::new(ix, iy, icon.width, icon.height));
            }
        }

        if let Some(icon) = left_icon {
            let iy = ((height - icon.height) / 2.0).round();
            gc.draw_image(
                &icon,
                Rect::new(x + icon_padding, y + iy, icon.width, icon.height),
            );
            if style.hot_icon == Some(IconRole::Left) {
                click_rects.set(
                    IconRole::Left,
                    Rect::new(icon_padding, iy, icon.width, icon.height),
                );
            }
        }

        if let Some(icon) = right_icon {
            // Text may have run under the icon; repaint the background there
            // instead of clipping.
            if right_empty_width > right_padding {
                let ix = width - (icon.width + icon_padding);
                let right_x = x + ix;
                let mut colors = snapshot.colors.clone();
                let mut foundation = snapshot.foundation_color;
                if layers.inherits_background {
                    foundation = true;
                    colors.insert(0, style.background_color);
                }
                layer_colors(
                    gc,
                    &colors,
                    Rect::new(right_x, y, right_padding, height),
                    foundation,
                );

                let iy = ((height - icon.height) / 2.0).round();
                gc.draw_image(&icon, Rect::new(right_x, y + iy, icon.width, icon.height));
                if style.hot_icon == Some(IconRole::Right) {
                    click_rects.set(IconRole::Right, Rect::new(ix, iy, icon.width, icon.height));
                }
            }
        }

        if style.border_thickness > 0.0 {
            let t = style.border_thickness;
            gc.begin_path();
            gc.rect(Rect::new(
                x + thickness_padding,
                y + thickness_padding,
                width - t,
                height - t,
            ));
            gc.set_line_width(t);
            gc.set_stroke_style(style.border_color);
            gc.stroke();
            gc.close_path();
        }

        snapshot.click_rects = click_rects;
        config.click_rects = click_rects;
        config.min_width = left_padding + val_width + right_padding;
        PaintOutcome::Painted
    }
}

/// Unpack icons and the displayable value.
fn resolve_value<'c>(
    config: &'c CellPaintConfig<'_>,
) -> (Option<Icon>, Option<Icon>, Option<Icon>, Cow<'c, CellValue>) {
    match &config.value {
        CellValue::Decorated(d) => {
            let left = d.left.and_then(Icon::drawable);
            let right = d.right.and_then(Icon::drawable);
            match config.behavior.exec(&d.value) {
                CellValue::Image(icon) => (left, icon.drawable(), right, Cow::Owned(CellValue::Empty)),
                other => (left, None, right, Cow::Owned(other)),
            }
        }
        other => {
            let style = config.style;
            (
                config.icons.lookup(style.left_icon.as_deref()),
                config.icons.lookup(style.center_icon.as_deref()),
                config.icons.lookup(style.right_icon.as_deref()),
                Cow::Borrowed(other),
            )
        }
    }
}

struct Layers {
    colors: Colors,
    foundation: bool,
    inherits_background: bool,
}

/// Ordered background colors: base (unless inherited from the prefill),
/// selection, hover. An opaque hover hides everything below it, an opaque
/// selection hides the base.
fn background_layers(config: &CellPaintConfig<'_>) -> Layers {
    let style = config.style;
    let hover_color = if config.is(CellState::CELL_HOVERED) && style.hover_cell.enabled {
        style.hover_cell.background_color
    } else if config.is(CellState::ROW_HOVERED) && style.hover_row.enabled {
        let hover = style.hover_row;
        if config.is(CellState::DATA_COLUMN) || hover.header_background_color.is_none() {
            hover.background_color
        } else {
            hover.header_background_color
        }
    } else if config.is(CellState::COLUMN_HOVERED) && style.hover_column.enabled {
        let hover = style.hover_column;
        if config.is(CellState::DATA_ROW) || hover.header_background_color.is_none() {
            hover.background_color
        } else {
            hover.header_background_color
        }
    } else {
        None
    };

    let mut layers = Layers {
        colors: Colors::new(),
        foundation: false,
        inherits_background: false,
    };

    if alpha_of(hover_color) < 1.0 {
        let select_color = if config.is(CellState::SELECTED) {
            style.background_selection_color
        } else {
            None
        };

        if alpha_of(select_color) < 1.0 {
            layers.inherits_background = Some(style.background_color) == style.prefill_color;
            if !layers.inherits_background {
                layers.foundation = true;
                layers.colors.push(style.background_color);
            }
        }

        if let Some(c) = select_color {
            layers.colors.push(c);
        }
    }

    if let Some(c) = hover_color {
        layers.colors.push(c);
    }

    layers
}

/// Paint background layers. A foundation color clears before filling so
/// nothing from the previous frame shows through.
fn layer_colors<D: DrawingDevice>(
    gc: &mut CachedContext<D>,
    colors: &[PackedRgba],
    rect: Rect,
    foundation: bool,
) {
    for (i, &color) in colors.iter().enumerate() {
        if foundation && i == 0 {
            gc.clear_fill(rect, color);
        } else {
            gc.set_fill_style(color);
            gc.fill_rect(rect);
        }
    }
}

/// Returns `(min_width, right_empty_width)`.
fn render_single_line_text<D: DrawingDevice>(
    gc: &mut CachedContext<D>,
    config: &CellPaintConfig<'_>,
    text: &str,
    font: &str,
    left_padding: f64,
    right_padding: f64,
    hide_right_icon: bool,
) -> (f64, f64) {
    let style = config.style;
    let bounds = config.bounds;
    let width = bounds.width;
    let right_aligned = style.halign == HAlign::Right;
    let avail_width = width - left_padding;

    let metrics = measure_truncated(
        gc,
        font,
        text,
        avail_width,
        style.truncation,
        !style.column_autosizing,
        right_aligned,
    );
    let min_width = if style.column_autosizing {
        metrics.width
    } else {
        0.0
    };
    let right_empty_width = avail_width - metrics.width;

    let halign_offset = match style.halign {
        HAlign::Left => left_padding,
        HAlign::Right => {
            if !hide_right_icon || right_empty_width > right_padding {
                (width - right_empty_width).max(width - right_padding)
            } else {
                width - style.cell_padding
            }
        }
        HAlign::Center => left_padding.max((width - metrics.width) / 2.0),
    };

    let shown = metrics.display(text);
    let x = bounds.x + halign_offset;
    let y = bounds.y + (bounds.height / 2.0).floor() + style.top_padding;
    let align = if right_aligned {
        TextAlign::Right
    } else {
        TextAlign::Left
    };

    gc.set_text_align(align);
    gc.set_text_baseline(TextBaseline::Middle);

    if config.is(CellState::USER_DATA_AREA) {
        let hovered = config.is(CellState::CELL_HOVERED);
        if style.link {
            if hovered || !style.link_on_hover {
                if let Some(link_color) = style.link_color {
                    gc.set_stroke_style(link_color);
                }
                gc.begin_path();
                underline(gc, &style.font, font, shown, x, y, align);
                gc.stroke();
                gc.close_path();
            }
            if let Some(link_color) = style.link_color {
                if hovered || !style.link_color_on_hover {
                    gc.set_fill_style(link_color);
                }
            }
        }

        if style.strike_through {
            gc.begin_path();
            strike_through(gc, font, shown, x, y, align);
            gc.stroke();
            gc.close_path();
        }
    }

    gc.fill_text(shown, x, y);

    (min_width, right_empty_width)
}

/// Word-wrapped, vertically centered, clipped text. Returns
/// `(width, width)`; a single resulting line falls back to single-line
/// rendering.
fn render_multi_line_text<D: DrawingDevice>(
    gc: &mut CachedContext<D>,
    config: &CellPaintConfig<'_>,
    text: &str,
    font: &str,
    left_padding: f64,
    right_padding: f64,
) -> (f64, f64) {
    let style = config.style;
    let bounds = config.bounds;
    let clean = normalize_whitespace(text);
    let words: Vec<&str> = clean.split(' ').collect();
    let lines = find_lines(gc, font, &words, bounds.width);

    if lines.len() <= 1 {
        return render_single_line_text(
            gc,
            config,
            &clean,
            font,
            left_padding,
            right_padding,
            false,
        );
    }

    let text_height = gc.text_height(&style.font);
    let (halign_offset, align) = match style.halign {
        HAlign::Left => (left_padding, TextAlign::Left),
        HAlign::Right => (bounds.width - right_padding, TextAlign::Right),
        HAlign::Center => (bounds.width / 2.0, TextAlign::Center),
    };
    let halign_offset = halign_offset.max(0.0);
    let line_count = lines.len() as f64;
    let valign_offset = (style.voffset
        + ((bounds.height - (line_count - 1.0) * text_height) / 2.0).ceil())
    .max((text_height / 2.0).ceil());

    let mut scope = gc.save_scope();
    scope.begin_path();
    scope.rect(bounds);
    scope.clip();
    scope.set_text_align(align);
    scope.set_text_baseline(TextBaseline::Middle);
    for (i, line) in lines.iter().enumerate() {
        scope.fill_text(
            line,
            bounds.x + halign_offset,
            bounds.y + valign_offset + i as f64 * text_height,
        );
    }
    drop(scope);

    (bounds.width, bounds.width)
}

fn aligned_start(x: f64, text_width: f64, align: TextAlign) -> f64 {
    match align {
        TextAlign::Center => x - text_width / 2.0,
        TextAlign::Right | TextAlign::End => x - text_width,
        TextAlign::Left | TextAlign::Start => x,
    }
}

/// Underline offset follows the base font even when selection or hover
/// swapped in another one; the width follows the font actually drawn.
fn underline<D: DrawingDevice>(
    gc: &mut CachedContext<D>,
    base_font: &str,
    font: &str,
    text: &str,
    x: f64,
    y: f64,
    align: TextAlign,
) {
    let text_height = gc.text_height(base_font);
    let text_width = gc.text_width(font, text);
    let x = aligned_start(x, text_width, align);
    let y = y.ceil() + (text_height / 2.0).round() - 0.5;
    gc.set_line_width(1.0);
    gc.move_to(x, y);
    gc.line_to(x + text_width, y);
}

fn strike_through<D: DrawingDevice>(
    gc: &mut CachedContext<D>,
    font: &str,
    text: &str,
    x: f64,
    y: f64,
    align: TextAlign,
) {
    let text_width = gc.text_width(font, text);
    let x = aligned_start(x, text_width, align);
    let y = y.round() + 0.5;
    gc.set_line_width(1.0);
    gc.move_to(x - 1.0, y);
    gc.line_to(x + text_width + 1.0, y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellStyle, ClickRects, DefaultBehavior, HoverHighlight};
    use crate::icon::IconRegistry;
    use crate::recording::{DrawOp, RecordingDevice};

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 100.0, 20.0);

    fn gc() -> CachedContext<RecordingDevice> {
        CachedContext::new(RecordingDevice::new(200, 100))
    }

    fn paint(
        gc: &mut CachedContext<RecordingDevice>,
        style: &CellStyle,
        icons: &IconRegistry,
        value: CellValue,
        state: CellState,
        retained: &mut Option<CellSnapshot>,
    ) -> (PaintOutcome, ClickRects) {
        let mut config =
            CellPaintConfig::new(value, BOUNDS, style, &DefaultBehavior, icons).with_state(state);
        let outcome = SimpleCell.paint(gc, &mut config, retained);
        (outcome, config.click_rects)
    }

    fn first_text(dev: &RecordingDevice) -> Option<(String, f64, f64)> {
        dev.ops().iter().find_map(|op| match op {
            DrawOp::FillText { text, x, y, .. } => Some((text.clone(), *x, *y)),
            _ => None,
        })
    }

    // ==========================================================================
    // Partial rendering
    // ==========================================================================

    #[test]
    fn unchanged_cell_is_skipped_without_device_calls() {
        let mut gc = gc();
        let style = CellStyle::default();
        let icons = IconRegistry::new();
        let mut retained = None;

        let (first, _) = paint(&mut gc, &style, &icons, CellValue::text("hello"), CellState::DATA, &mut retained);
        assert_eq!(first, PaintOutcome::Painted);
        assert!(retained.is_some());

        gc.device_mut().reset_counters();
        gc.device_mut().clear_ops();
        let (second, _) = paint(&mut gc, &style, &icons, CellValue::text("hello"), CellState::DATA, &mut retained);
        assert_eq!(second, PaintOutcome::Skipped);
        assert_eq!(gc.device().draw_calls(), 0);
        assert_eq!(gc.device().total_property_writes(), 0);
        assert!(gc.device().ops().is_empty());
    }

    #[test]
    fn changed_value_repaints() {
        let mut gc = gc();
        let style = CellStyle::default();
        let icons = IconRegistry::new();
        let mut retained = None;
        paint(&mut gc, &style, &icons, CellValue::text("a"), CellState::DATA, &mut retained);
        let (outcome, _) = paint(&mut gc, &style, &icons, CellValue::text("b"), CellState::DATA, &mut retained);
        assert_eq!(outcome, PaintOutcome::Painted);
        assert_eq!(retained.map(|s| s.value), Some("b".to_owned()));
    }

    #[test]
    fn prefill_disables_skipping() {
        let mut gc = gc();
        let style = CellStyle {
            prefill_color: Some(PackedRgba::WHITE),
            ..CellStyle::default()
        };
        let icons = IconRegistry::new();
        let mut retained = None;
        paint(&mut gc, &style, &icons, CellValue::text("x"), CellState::DATA, &mut retained);
        let (outcome, _) = paint(&mut gc, &style, &icons, CellValue::text("x"), CellState::DATA, &mut retained);
        assert_eq!(outcome, PaintOutcome::Painted);
    }

    #[test]
    fn skip_restores_click_rects() {
        let mut gc = gc();
        let mut icons = IconRegistry::new();
        icons.register("check", 16.0, 16.0);
        let style = CellStyle {
            left_icon: Some("check".to_owned()),
            hot_icon: Some(IconRole::Left),
            ..CellStyle::default()
        };
        let mut retained = None;
        let (_, first) = paint(&mut gc, &style, &icons, CellValue::text("x"), CellState::DATA, &mut retained);
        let expected = Some(Rect::new(3.0, 2.0, 16.0, 16.0));
        assert_eq!(first.get(IconRole::Left), expected);

        let (outcome, second) = paint(&mut gc, &style, &icons, CellValue::text("x"), CellState::DATA, &mut retained);
        assert_eq!(outcome, PaintOutcome::Skipped);
        assert_eq!(second.get(IconRole::Left), expected);
    }

    // ==========================================================================
    // Background layers
    // ==========================================================================

    #[test]
    fn opaque_base_is_cleared_then_filled() {
        let mut gc = gc();
        let style = CellStyle::default();
        let mut retained = None;
        paint(&mut gc, &style, &IconRegistry::new(), CellValue::text("x"), CellState::DATA, &mut retained);
        let ops = gc.device().ops();
        assert_eq!(ops.iter().filter(|op| matches!(op, DrawOp::ClearRect(_))).count(), 1);
        assert!(ops.contains(&DrawOp::FillRect {
            rect: BOUNDS,
            color: PackedRgba::WHITE
        }));
        let snapshot = retained.unwrap_or_default();
        assert!(snapshot.foundation_color);
        assert_eq!(snapshot.colors.as_slice(), &[PackedRgba::WHITE]);
    }

    #[test]
    fn opaque_hover_hides_lower_layers() {
        let hover = PackedRgba::rgb(0xee, 0xee, 0xee);
        let style = CellStyle {
            hover_cell: HoverHighlight {
                enabled: true,
                background_color: Some(hover),
                header_background_color: None,
            },
            ..CellStyle::default()
        };
        let mut gc = gc();
        let mut retained = None;
        paint(
            &mut gc,
            &style,
            &IconRegistry::new(),
            CellValue::text("x"),
            CellState::DATA | CellState::CELL_HOVERED | CellState::SELECTED,
            &mut retained,
        );
        let snapshot = retained.unwrap_or_default();
        assert!(!snapshot.foundation_color);
        assert_eq!(snapshot.colors.as_slice(), &[hover]);
        assert!(!gc.device().ops().iter().any(|op| matches!(op, DrawOp::ClearRect(_))));
    }

    #[test]
    fn translucent_selection_stacks_over_base() {
        let style = CellStyle::default();
        let select = style.background_selection_color.unwrap_or_default();
        let mut retained = None;
        paint(&mut gc(), &style, &IconRegistry::new(), CellValue::text("x"), CellState::DATA | CellState::SELECTED, &mut retained);
        let snapshot = retained.unwrap_or_default();
        assert_eq!(snapshot.colors.as_slice(), &[PackedRgba::WHITE, select]);
        assert_eq!(snapshot.text_font.as_deref(), Some("bold 13px Tahoma"));
    }

    #[test]
    fn base_matching_prefill_is_inherited() {
        let style = CellStyle {
            prefill_color: Some(PackedRgba::WHITE),
            ..CellStyle::default()
        };
        let select = style.background_selection_color.unwrap_or_default();
        let mut retained = None;
        paint(&mut gc(), &style, &IconRegistry::new(), CellValue::text("x"), CellState::DATA | CellState::SELECTED, &mut retained);
        let snapshot = retained.unwrap_or_default();
        assert!(!snapshot.foundation_color);
        assert_eq!(snapshot.colors.as_slice(), &[select]);
    }

    #[test]
    fn header_row_uses_header_hover_override() {
        let header = PackedRgba::rgb(1, 2, 3);
        let style = CellStyle {
            hover_row: HoverHighlight {
                enabled: true,
                background_color: Some(PackedRgba::rgb(9, 9, 9)),
                header_background_color: Some(header),
            },
            ..CellStyle::default()
        };
        let mut retained = None;
        paint(
            &mut gc(),
            &style,
            &IconRegistry::new(),
            CellValue::text("x"),
            CellState::DATA_ROW | CellState::ROW_HOVERED,
            &mut retained,
        );
        assert_eq!(retained.unwrap_or_default().colors.last(), Some(&header));
    }

    // ==========================================================================
    // Text and icons
    // ==========================================================================

    #[test]
    fn left_icon_sets_left_padding() {
        let mut icons = IconRegistry::new();
        icons.register("check", 16.0, 16.0);
        let style = CellStyle {
            left_icon: Some("check".to_owned()),
            icon_padding: 4.0,
            ..CellStyle::default()
        };
        let mut gc = gc();
        paint(&mut gc, &style, &icons, CellValue::text("hello"), CellState::DATA, &mut None);
        assert_eq!(first_text(gc.device()), Some(("hello".to_owned(), 24.0, 10.0)));

        let mut plain = self::gc();
        paint(&mut plain, &CellStyle::default(), &icons, CellValue::text("hello"), CellState::DATA, &mut None);
        assert_eq!(first_text(plain.device()).map(|t| t.1), Some(5.0));
    }

    #[test]
    fn falsy_values_need_render_falsy() {
        let mut gc = gc();
        let icons = IconRegistry::new();
        paint(&mut gc, &CellStyle::default(), &icons, CellValue::Int(0), CellState::DATA, &mut None);
        assert!(gc.device().texts().is_empty());

        let style = CellStyle {
            render_falsy: true,
            ..CellStyle::default()
        };
        let mut gc = self::gc();
        paint(&mut gc, &style, &icons, CellValue::Int(0), CellState::DATA, &mut None);
        assert_eq!(gc.device().texts(), vec!["0"]);
    }

    #[test]
    fn long_text_is_truncated_not_clipped() {
        let mut gc = gc();
        paint(
            &mut gc,
            &CellStyle::default(),
            &IconRegistry::new(),
            CellValue::text("a".repeat(30)),
            CellState::DATA,
            &mut None,
        );
        let texts = gc.device().texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].ends_with(hgrid_text::ELLIPSIS));
        assert!(!gc.device().ops().contains(&DrawOp::Clip));
    }

    #[test]
    fn right_icon_drawn_when_text_leaves_room() {
        let mut icons = IconRegistry::new();
        let arrow = icons.register("arrow", 16.0, 16.0);
        let style = CellStyle {
            right_icon: Some("arrow".to_owned()),
            ..CellStyle::default()
        };
        let mut gc = gc();
        paint(&mut gc, &style, &icons, CellValue::text("hi"), CellState::DATA, &mut None);
        assert!(gc.device().ops().contains(&DrawOp::DrawImage {
            icon: arrow.id,
            dest: Rect::new(81.0, 2.0, 16.0, 16.0)
        }));

        let mut crowded = self::gc();
        paint(&mut crowded, &style, &icons, CellValue::text("a".repeat(14)), CellState::DATA, &mut None);
        assert!(!crowded.device().ops().iter().any(|op| matches!(op, DrawOp::DrawImage { .. })));
    }

    #[test]
    fn right_aligned_text_anchors_at_right_padding() {
        let style = CellStyle {
            halign: HAlign::Right,
            ..CellStyle::default()
        };
        let mut gc = gc();
        paint(&mut gc, &style, &IconRegistry::new(), CellValue::text("hi"), CellState::DATA, &mut None);
        assert_eq!(first_text(gc.device()).map(|t| t.1), Some(95.0));
        assert_eq!(gc.text_align(), TextAlign::Right);
    }

    #[test]
    fn wrapped_header_draws_each_line_clipped() {
        let style = CellStyle {
            header_text_wrapping: true,
            ..CellStyle::default()
        };
        let icons = IconRegistry::new();
        let mut gc = gc();
        let mut config = CellPaintConfig::new(
            CellValue::text("alpha  beta\tgamma"),
            Rect::new(0.0, 0.0, 50.0, 60.0),
            &style,
            &DefaultBehavior,
            &icons,
        )
        .with_state(CellState::HEADER_ROW);
        SimpleCell.paint(&mut gc, &mut config, &mut None);
        assert_eq!(gc.device().texts(), vec!["alpha", "beta", "gamma"]);
        assert!(gc.device().ops().contains(&DrawOp::Clip));
        assert_eq!(gc.depth(), 0);
        assert_eq!(config.min_width, 60.0);
    }

    #[test]
    fn short_wrapped_header_falls_back_to_single_line() {
        let style = CellStyle {
            header_text_wrapping: true,
            ..CellStyle::default()
        };
        let mut gc = gc();
        paint(&mut gc, &style, &IconRegistry::new(), CellValue::text("id"), CellState::HEADER_ROW, &mut None);
        assert_eq!(gc.device().texts(), vec!["id"]);
        assert!(!gc.device().ops().contains(&DrawOp::Clip));
    }

    #[test]
    fn decorated_value_supplies_icons() {
        let mut icons = IconRegistry::new();
        let left = icons.register("l", 10.0, 10.0);
        let mut retained = None;
        paint(
            &mut gc(),
            &CellStyle::default(),
            &icons,
            CellValue::decorated(Some(left), CellValue::text("v"), None),
            CellState::DATA,
            &mut retained,
        );
        let snapshot = retained.unwrap_or_default();
        assert_eq!(snapshot.left_icon, Some(left.id));
        assert_eq!(snapshot.value, "v");
    }

    #[test]
    fn border_strokes_inset_rect() {
        let style = CellStyle {
            border_thickness: 2.0,
            ..CellStyle::default()
        };
        let mut gc = gc();
        paint(&mut gc, &style, &IconRegistry::new(), CellValue::text("x"), CellState::DATA, &mut None);
        let ops = gc.device().ops();
        assert!(ops.contains(&DrawOp::Rect(Rect::new(1.0, 1.0, 98.0, 18.0))));
        assert!(ops.contains(&DrawOp::Stroke {
            color: style.border_color,
            width: 2.0
        }));
    }

    #[test]
    fn link_underlines_in_data_area() {
        let style = CellStyle {
            link: true,
            link_color: Some(PackedRgba::rgb(0, 0, 0xee)),
            ..CellStyle::default()
        };
        let mut gc = gc();
        paint(&mut gc, &style, &IconRegistry::new(), CellValue::text("go"), CellState::DATA, &mut None);
        let ops = gc.device().ops();
        // 13px text is 14 high in the recording device: y = 10 + 7 - 0.5.
        assert!(ops.contains(&DrawOp::MoveTo { x: 5.0, y: 16.5 }));
        assert!(ops.contains(&DrawOp::LineTo { x: 19.0, y: 16.5 }));
        assert!(ops.iter().any(|op| matches!(
            op,
            DrawOp::FillText { color, .. } if *color == PackedRgba::rgb(0, 0, 0xee)
        )));
    }

    #[test]
    fn underline_offset_uses_base_font_height() {
        let style = CellStyle {
            link: true,
            ..CellStyle::default()
        };
        let mut gc = CachedContext::new(
            RecordingDevice::new(200, 100).with_font_height("bold 13px Tahoma", 30.0),
        );
        paint(
            &mut gc,
            &style,
            &IconRegistry::new(),
            CellValue::text("go"),
            CellState::DATA | CellState::SELECTED,
            &mut None,
        );
        let ops = gc.device().ops();
        assert!(ops.iter().any(|op| matches!(
            op,
            DrawOp::FillText { font, .. } if font == "bold 13px Tahoma"
        )));
        // Base font is 14 high: y = 10 + 7 - 0.5, not 10 + 15 - 0.5.
        assert!(ops.contains(&DrawOp::MoveTo { x: 5.0, y: 16.5 }));
    }

    #[test]
    fn wrapped_header_lines_are_vertically_centered() {
        let style = CellStyle {
            header_text_wrapping: true,
            ..CellStyle::default()
        };
        let icons = IconRegistry::new();
        let mut gc = gc();
        let bounds = Rect::new(0.0, 20.0, 80.0, 60.0);
        let mut config = CellPaintConfig::new(
            CellValue::text("Quarterly Revenue Summary"),
            bounds,
            &style,
            &DefaultBehavior,
            &icons,
        )
        .with_state(CellState::HEADER_ROW);
        SimpleCell.paint(&mut gc, &mut config, &mut None);

        let lines: Vec<(&str, f64)> = gc
            .device()
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, y, .. } => Some((text.as_str(), *y)),
                _ => None,
            })
            .collect();
        assert!(lines.len() >= 2);
        assert_eq!(
            lines,
            vec![("Quarterly", 36.0), ("Revenue", 50.0), ("Summary", 64.0)]
        );

        let mid = bounds.y + bounds.height / 2.0;
        let first = lines[0].1;
        let last = lines[lines.len() - 1].1;
        assert_eq!(mid - first, last - mid);
        for pair in lines.windows(2) {
            assert_eq!(pair[1].1 - pair[0].1, 14.0);
        }
    }

    #[test]
    fn any_appearance_change_forces_drawing() {
        let mut icons = IconRegistry::new();
        icons.register("l", 10.0, 10.0);
        icons.register("r", 10.0, 10.0);
        let base = CellStyle::default();
        let cases: [(&str, fn(&mut CellStyle), &str, CellState); 8] = [
            ("value", |_| {}, "b", CellState::DATA),
            ("font", |s| s.font = "16px Tahoma".to_owned(), "a", CellState::DATA),
            ("text color", |s| s.color = PackedRgba::rgb(0xcc, 0, 0), "a", CellState::DATA),
            (
                "background",
                |s| s.background_color = PackedRgba::rgb(0xee, 0xee, 0xee),
                "a",
                CellState::DATA,
            ),
            ("left icon", |s| s.left_icon = Some("l".to_owned()), "a", CellState::DATA),
            ("right icon", |s| s.right_icon = Some("r".to_owned()), "a", CellState::DATA),
            ("selection", |_| {}, "a", CellState::DATA | CellState::SELECTED),
            (
                "opaque hover",
                |s| s.hover_cell = HoverHighlight::color(PackedRgba::rgb(0xdd, 0xdd, 0xff)),
                "a",
                CellState::DATA | CellState::CELL_HOVERED,
            ),
        ];

        for (name, change, value, state) in cases {
            let mut gc = gc();
            let mut retained = None;
            paint(&mut gc, &base, &icons, CellValue::text("a"), CellState::DATA, &mut retained);

            let mut style = base.clone();
            change(&mut style);
            gc.device_mut().reset_counters();
            let (outcome, _) =
                paint(&mut gc, &style, &icons, CellValue::text(value), state, &mut retained);
            assert_eq!(outcome, PaintOutcome::Painted, "{name}");
            assert!(gc.device().draw_calls() > 0, "{name}");
        }
    }
}
