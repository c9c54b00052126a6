#![forbid(unsafe_code)]

//! Normalized surface events.
//!
//! Everything a surface emits to its observers. Positions are in logical
//! pixels relative to the surface origin, already corrected for zoom.
//! Events serialize to JSON for recording and replay.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Payload shared by pointer and drag events.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MouseDetail {
    /// Local pointer position.
    pub mouse: Point,
    /// Currently pressed key chars.
    pub keys: Vec<String>,
    pub is_right_click: bool,
    /// Drag origin, for drag-related events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drag_start: Option<Point>,
}

/// Payload for wheel events.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelDetail {
    pub mouse: Point,
    pub keys: Vec<String>,
    pub is_right_click: bool,
    pub delta_x: f64,
    pub delta_y: f64,
}

/// Payload for key events.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyDetail {
    /// Resolved key char (`"a"`, `"TAB"`, `"UPSHIFT"`).
    pub key_char: String,
    /// Host key identifier.
    pub identifier: String,
    pub key_code: u32,
    pub char_code: u32,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub repeat: bool,
    pub repeat_count: u32,
    pub repeat_start_ms: u64,
    pub current_keys: Vec<String>,
}

/// Payload for touch events.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TouchDetail {
    /// Changed touch points in local coordinates.
    pub touches: Vec<Point>,
}

/// Payload for the resize notification.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResizeDetail {
    pub width: f64,
    pub height: f64,
}

/// An event emitted by a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "kebab-case")]
pub enum SurfaceEvent {
    MouseDown(MouseDetail),
    MouseMove(MouseDetail),
    MouseUp(MouseDetail),
    MouseOut(MouseDetail),
    DragStart(MouseDetail),
    Drag(MouseDetail),
    DragEnd(MouseDetail),
    Click(MouseDetail),
    DblClick(MouseDetail),
    ContextMenu(MouseDetail),
    WheelMoved(WheelDetail),
    KeyDown(KeyDetail),
    KeyUp(KeyDetail),
    Drop(MouseDetail),
    DocumentDragStart(MouseDetail),
    DocumentDrag(MouseDetail),
    DocumentDragOver(MouseDetail),
    DocumentDragEnd(MouseDetail),
    TouchStart(TouchDetail),
    TouchMove(TouchDetail),
    TouchEnd(TouchDetail),
    FocusGained,
    FocusLost,
    Resized(ResizeDetail),
}

impl SurfaceEvent {
    /// Stable event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MouseDown(_) => "mousedown",
            Self::MouseMove(_) => "mousemove",
            Self::MouseUp(_) => "mouseup",
            Self::MouseOut(_) => "mouseout",
            Self::DragStart(_) => "dragstart",
            Self::Drag(_) => "drag",
            Self::DragEnd(_) => "dragend",
            Self::Click(_) => "click",
            Self::DblClick(_) => "dblclick",
            Self::ContextMenu(_) => "context-menu",
            Self::WheelMoved(_) => "wheelmoved",
            Self::KeyDown(_) => "keydown",
            Self::KeyUp(_) => "keyup",
            Self::Drop(_) => "drop",
            Self::DocumentDragStart(_) => "document-drag-start",
            Self::DocumentDrag(_) => "document-drag",
            Self::DocumentDragOver(_) => "document-drag-over",
            Self::DocumentDragEnd(_) => "document-drag-end",
            Self::TouchStart(_) => "touchstart",
            Self::TouchMove(_) => "touchmove",
            Self::TouchEnd(_) => "touchend",
            Self::FocusGained => "focus-gained",
            Self::FocusLost => "focus-lost",
            Self::Resized(_) => "canvas-resized",
        }
    }

    /// Pointer detail, for events that carry one.
    #[must_use]
    pub fn mouse(&self) -> Option<&MouseDetail> {
        match self {
            Self::MouseDown(d)
            | Self::MouseMove(d)
            | Self::MouseUp(d)
            | Self::MouseOut(d)
            | Self::DragStart(d)
            | Self::Drag(d)
            | Self::DragEnd(d)
            | Self::Click(d)
            | Self::DblClick(d)
            | Self::ContextMenu(d)
            | Self::Drop(d)
            | Self::DocumentDragStart(d)
            | Self::DocumentDrag(d)
            | Self::DocumentDragOver(d)
            | Self::DocumentDragEnd(d) => Some(d),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_distinct() {
        let events = [
            SurfaceEvent::MouseDown(MouseDetail::default()),
            SurfaceEvent::DragStart(MouseDetail::default()),
            SurfaceEvent::WheelMoved(WheelDetail::default()),
            SurfaceEvent::KeyDown(KeyDetail::default()),
            SurfaceEvent::TouchEnd(TouchDetail::default()),
            SurfaceEvent::FocusLost,
            SurfaceEvent::Resized(ResizeDetail::default()),
        ];
        let mut names: Vec<_> = events.iter().map(SurfaceEvent::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), events.len());
    }

    #[test]
    fn mouse_accessor() {
        let detail = MouseDetail {
            mouse: Point::new(3.0, 4.0),
            ..MouseDetail::default()
        };
        let ev = SurfaceEvent::Drag(detail.clone());
        assert_eq!(ev.mouse(), Some(&detail));
        assert_eq!(SurfaceEvent::FocusGained.mouse(), None);
    }

    #[test]
    fn serializes_with_type_tag() {
        let ev = SurfaceEvent::Resized(ResizeDetail {
            width: 400.0,
            height: 300.0,
        });
        let json = serde_json::to_string(&ev).unwrap();
        assert_eq!(
            json,
            r#"{"type":"resized","detail":{"width":400.0,"height":300.0}}"#
        );
        let back: SurfaceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ev);
    }

    #[test]
    fn drag_start_omitted_when_absent() {
        let json = serde_json::to_string(&MouseDetail::default()).unwrap();
        assert!(!json.contains("drag_start"));
    }
}
