#![forbid(unsafe_code)]

//! Pointer press/drag state machine.
//!
//! ```text
//!   Idle --down--> Pressed --move--> Dragging
//!    ^               |                  |
//!    +------up-------+--------up--------+
//! ```
//!
//! The tracker only decides transitions; emitting the corresponding events
//! is the surface controller's job.

use crate::geometry::Point;

/// Current phase of the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Pressed,
    Dragging,
}

/// What a pointer-move means for the drag lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveTransition {
    /// No press is active.
    Hover,
    /// A press just turned into a drag from `origin`.
    Started { origin: Point },
    /// An ongoing drag moved.
    Continued { origin: Point },
}

/// What a pointer-up means for the drag lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseTransition {
    /// No press was active; the release belongs to someone else.
    Ignored,
    /// A press ended without dragging.
    Released,
    /// A drag ended.
    DragEnded { origin: Point },
}

/// Tracks press and drag state for one surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragTracker {
    phase: DragPhase,
    origin: Point,
}

impl DragTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: DragPhase::Idle,
            origin: Point::new(0.0, 0.0),
        }
    }

    #[inline]
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// Origin of the current or most recent drag.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Pointer went down at `at`.
    pub fn press(&mut self, at: Point) {
        self.phase = DragPhase::Pressed;
        self.origin = at;
    }

    /// Pointer moved. `last` is the position before this move.
    pub fn on_move(&mut self, last: Point) -> MoveTransition {
        match self.phase {
            DragPhase::Idle => MoveTransition::Hover,
            DragPhase::Pressed => {
                self.phase = DragPhase::Dragging;
                self.origin = last;
                MoveTransition::Started {
                    origin: self.origin,
                }
            }
            DragPhase::Dragging => MoveTransition::Continued {
                origin: self.origin,
            },
        }
    }

    /// Pointer released.
    pub fn release(&mut self) -> ReleaseTransition {
        let transition = match self.phase {
            DragPhase::Idle => ReleaseTransition::Ignored,
            DragPhase::Pressed => ReleaseTransition::Released,
            DragPhase::Dragging => ReleaseTransition::DragEnded {
                origin: self.origin,
            },
        };
        self.phase = DragPhase::Idle;
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_move_is_hover() {
        let mut t = DragTracker::new();
        assert_eq!(t.on_move(Point::new(1.0, 1.0)), MoveTransition::Hover);
        assert_eq!(t.phase(), DragPhase::Idle);
    }

    #[test]
    fn press_move_starts_drag_at_last_position() {
        let mut t = DragTracker::new();
        t.press(Point::new(10.0, 10.0));
        let start = t.on_move(Point::new(10.0, 10.0));
        assert_eq!(
            start,
            MoveTransition::Started {
                origin: Point::new(10.0, 10.0)
            }
        );
        assert!(t.is_dragging());
        assert_eq!(
            t.on_move(Point::new(20.0, 15.0)),
            MoveTransition::Continued {
                origin: Point::new(10.0, 10.0)
            }
        );
    }

    #[test]
    fn release_transitions() {
        let mut t = DragTracker::new();
        assert_eq!(t.release(), ReleaseTransition::Ignored);

        t.press(Point::default());
        assert_eq!(t.release(), ReleaseTransition::Released);
        assert!(!t.is_pressed());

        t.press(Point::new(5.0, 5.0));
        t.on_move(Point::new(5.0, 5.0));
        assert_eq!(
            t.release(),
            ReleaseTransition::DragEnded {
                origin: Point::new(5.0, 5.0)
            }
        );
        assert_eq!(t.phase(), DragPhase::Idle);
    }
}
