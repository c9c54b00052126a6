#![forbid(unsafe_code)]

//! Raw host input records.
//!
//! A host (browser shim, native window, replay harness) translates its own
//! pointer, keyboard, touch and drag callbacks into these plain structs and
//! hands them to the surface controller, which turns them into
//! [`SurfaceEvent`](crate::event::SurfaceEvent)s in surface-local coordinates.
//!
//! Fields mirror what hosts commonly report, including the legacy ones
//! (`which`, numeric key codes) that some hosts still rely on.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const META  = 0b1000;
    }
}

impl Modifiers {
    #[must_use]
    pub const fn from_bits_truncate_u8(bits: u8) -> Self {
        Self::from_bits_truncate(bits)
    }
}

/// Pointer button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u8),
}

impl MouseButton {
    /// Map a host `button` index (0 = primary) to a button.
    #[must_use]
    pub const fn from_u8(n: u8) -> Self {
        match n {
            0 => Self::Left,
            1 => Self::Middle,
            2 => Self::Right,
            other => Self::Other(other),
        }
    }
}

/// A pointer event as reported by the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HostPointer {
    /// Position in host client coordinates (before zoom correction).
    pub client: Point,
    /// Legacy 1-based button number, when the host reports one.
    pub which: Option<u32>,
    /// 0-based button index, when the host reports one.
    pub button: Option<u8>,
    /// Bitmask of buttons held at the time of the event (bit 0 = primary).
    pub buttons: u8,
    /// Modifier flags, or `None` when the host event carries no modifier state.
    pub modifiers: Option<Modifiers>,
}

impl HostPointer {
    /// A pointer event at `client` with the primary button held.
    #[must_use]
    pub fn primary(client: Point) -> Self {
        Self {
            client,
            which: Some(1),
            button: Some(0),
            buttons: 1,
            modifiers: Some(Modifiers::empty()),
        }
    }

    /// A pointer event at `client` with no buttons held.
    #[must_use]
    pub fn hover(client: Point) -> Self {
        Self {
            client,
            which: None,
            button: None,
            buttons: 0,
            modifiers: Some(Modifiers::empty()),
        }
    }

    /// Builder: replace the modifier flags.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    /// Builder: mark as a secondary-button event.
    #[must_use]
    pub fn secondary(mut self) -> Self {
        self.which = Some(3);
        self.button = Some(2);
        self.buttons = 0b10;
        self
    }

    /// Right-click test. Prefers the legacy `which == 3` and falls back to
    /// `button == 2` when `which` is absent.
    #[must_use]
    pub fn is_right_click(&self) -> bool {
        match self.which {
            Some(which) => which == 3,
            None => self.button == Some(2),
        }
    }

    /// Whether any button is held.
    #[inline]
    #[must_use]
    pub const fn any_button_held(&self) -> bool {
        self.buttons != 0
    }

    /// The pressed button, if the host reported one.
    #[must_use]
    pub fn mouse_button(&self) -> Option<MouseButton> {
        self.button.map(MouseButton::from_u8)
    }
}

/// A keyboard event as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostKey {
    /// Modern key identifier (`"a"`, `"Tab"`, `"ArrowUp"`).
    pub key: String,
    /// Legacy numeric key code.
    pub key_code: u32,
    /// Legacy character code.
    pub char_code: u32,
    pub modifiers: Modifiers,
    /// Host auto-repeat flag.
    pub repeat: bool,
}

impl HostKey {
    #[must_use]
    pub fn new(key: impl Into<String>, key_code: u32) -> Self {
        Self {
            key: key.into(),
            key_code,
            char_code: 0,
            modifiers: Modifiers::empty(),
            repeat: false,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }
}

/// A wheel event as reported by the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HostWheel {
    pub pointer: HostPointer,
    pub delta_x: f64,
    pub delta_y: f64,
}

/// All raw host input the surface controller understands.
#[derive(Debug, Clone, PartialEq)]
pub enum HostInput {
    /// Pointer entered the surface.
    PointerOver(HostPointer),
    /// Pointer left the surface.
    PointerOut(HostPointer),
    /// Button pressed over the surface.
    PointerDown(HostPointer),
    /// Document-level pointer move.
    PointerMove(HostPointer),
    /// Document-level button release.
    PointerUp(HostPointer),
    Click(HostPointer),
    DoubleClick(HostPointer),
    ContextMenu(HostPointer),
    Wheel(HostWheel),
    KeyDown(HostKey),
    KeyUp(HostKey),
    /// Touch points that changed, in client coordinates.
    TouchStart(Vec<Point>),
    TouchMove(Vec<Point>),
    TouchEnd(Vec<Point>),
    Drop(HostPointer),
    DocumentDragStart(HostPointer),
    DocumentDrag(HostPointer),
    DocumentDragOver(HostPointer),
    DocumentDragEnd(HostPointer),
    FocusGained,
    FocusLost,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_click_prefers_which() {
        let mut p = HostPointer::primary(Point::default());
        p.which = Some(3);
        p.button = Some(0);
        assert!(p.is_right_click());

        p.which = Some(1);
        p.button = Some(2);
        assert!(!p.is_right_click());
    }

    #[test]
    fn right_click_falls_back_to_button() {
        let mut p = HostPointer::hover(Point::default());
        assert!(!p.is_right_click());
        p.button = Some(2);
        assert!(p.is_right_click());
    }

    #[test]
    fn secondary_builder_is_right_click() {
        let p = HostPointer::primary(Point::new(1.0, 2.0)).secondary();
        assert!(p.is_right_click());
        assert_eq!(p.mouse_button(), Some(MouseButton::Right));
    }

    #[test]
    fn mouse_button_from_u8() {
        assert_eq!(MouseButton::from_u8(0), MouseButton::Left);
        assert_eq!(MouseButton::from_u8(1), MouseButton::Middle);
        assert_eq!(MouseButton::from_u8(7), MouseButton::Other(7));
    }

    #[test]
    fn modifiers_truncate_unknown_bits() {
        let m = Modifiers::from_bits_truncate_u8(0xFF);
        assert_eq!(m, Modifiers::all());
    }
}
