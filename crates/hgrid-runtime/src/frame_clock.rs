#![forbid(unsafe_code)]

//! Frame clock and renderable registry.
//!
//! Two host-driven loops share one [`FrameRegistry`]:
//!
//! - the **paint loop**, ticked from the host's display-refresh callback via
//!   [`FrameRegistry::on_animation_frame`], calls every registered
//!   [`Renderable`] in registration order;
//! - the **resize loop**, ticked from a coarse periodic timer via
//!   [`FrameRegistry::on_timer`], calls every registered [`Resizable`].
//!
//! The registry holds weak references: a dropped surface is skipped and
//! pruned instead of being kept alive. Each tick iterates over a snapshot of
//! the list, so registrations made during a tick take effect on the next
//! one, and an entry deregistered mid-tick is not called.
//!
//! # Failure containment
//!
//! A renderable that returns an error or panics is logged and skipped; the
//! loop never halts. Re-entrant ticks (a renderable already borrowed) are
//! skipped.

use std::cell::RefCell;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::clock::Clock;
use crate::error::TickError;

/// Something ticked by the paint loop.
pub trait Renderable {
    /// Called once per display refresh while the paint loop runs.
    fn tick_paint(&mut self, now: Duration) -> Result<(), TickError>;

    /// Runs after every [`tick_paint`](Self::tick_paint), even a failed one.
    fn tick_notification(&mut self) {}
}

/// Something ticked by the resize loop.
pub trait Resizable {
    fn tick_resize(&mut self, now: Duration) -> Result<(), TickError>;
}

/// Opaque handle returned by registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

impl RegistrationId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Counts from one loop tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub ticked: usize,
    pub failed: usize,
    /// Entries skipped because they were busy (re-entrant tick).
    pub busy: usize,
}

type RenderableRef = Weak<RefCell<dyn Renderable>>;
type ResizableRef = Weak<RefCell<dyn Resizable>>;

struct Registry {
    next_id: u64,
    renderables: Vec<(RegistrationId, RenderableRef)>,
    resizables: Vec<(RegistrationId, ResizableRef)>,
    paint_running: bool,
    resize_running: bool,
}

impl Registry {
    fn next_id(&mut self) -> RegistrationId {
        self.next_id += 1;
        RegistrationId(self.next_id)
    }

    fn is_renderable(&self, id: RegistrationId) -> bool {
        self.renderables.iter().any(|(r, _)| *r == id)
    }

    fn is_resizable(&self, id: RegistrationId) -> bool {
        self.resizables.iter().any(|(r, _)| *r == id)
    }
}

/// Shared registry of renderables and resizables plus loop state.
///
/// Cloning yields another handle to the same registry. Not `Send`: all
/// ticking happens on the host's UI thread.
#[derive(Clone)]
pub struct FrameRegistry {
    inner: Rc<RefCell<Registry>>,
}

impl Default for FrameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FrameRegistry")
            .field("renderables", &inner.renderables.len())
            .field("resizables", &inner.resizables.len())
            .field("paint_running", &inner.paint_running)
            .field("resize_running", &inner.resize_running)
            .finish()
    }
}

impl FrameRegistry {
    /// An empty registry with both loops running.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                renderables: Vec::new(),
                resizables: Vec::new(),
                paint_running: true,
                resize_running: true,
            })),
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Add `target` to the paint loop. The registry keeps a weak reference.
    pub fn register_renderable<R>(&self, target: &Rc<RefCell<R>>) -> RegistrationId
    where
        R: Renderable + 'static,
    {
        let target: Rc<RefCell<dyn Renderable>> = target.clone();
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id();
        inner.renderables.push((id, Rc::downgrade(&target)));
        tracing::trace!(%id, count = inner.renderables.len(), "renderable registered");
        id
    }

    /// Add `target` to the resize loop. The registry keeps a weak reference.
    pub fn register_resizable<R>(&self, target: &Rc<RefCell<R>>) -> RegistrationId
    where
        R: Resizable + 'static,
    {
        let target: Rc<RefCell<dyn Resizable>> = target.clone();
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id();
        inner.resizables.push((id, Rc::downgrade(&target)));
        tracing::trace!(%id, count = inner.resizables.len(), "resizable registered");
        id
    }

    /// Remove a registration from whichever loop holds it.
    ///
    /// Returns whether anything was removed.
    pub fn deregister(&self, id: RegistrationId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.renderables.len() + inner.resizables.len();
        inner.renderables.retain(|(r, _)| *r != id);
        inner.resizables.retain(|(r, _)| *r != id);
        let removed = inner.renderables.len() + inner.resizables.len() != before;
        if removed {
            tracing::trace!(%id, "deregistered");
        }
        removed
    }

    #[must_use]
    pub fn is_registered(&self, id: RegistrationId) -> bool {
        let inner = self.inner.borrow();
        inner.is_renderable(id) || inner.is_resizable(id)
    }

    #[must_use]
    pub fn renderable_count(&self) -> usize {
        self.inner.borrow().renderables.len()
    }

    #[must_use]
    pub fn resizable_count(&self) -> usize {
        self.inner.borrow().resizables.len()
    }

    // ------------------------------------------------------------------
    // Loop control
    // ------------------------------------------------------------------

    /// Start the paint loop. Idempotent.
    pub fn restart_paint_loop(&self) {
        self.inner.borrow_mut().paint_running = true;
    }

    /// Stop the paint loop. No renderable is ticked until it restarts.
    pub fn stop_paint_loop(&self) {
        self.inner.borrow_mut().paint_running = false;
    }

    #[must_use]
    pub fn is_paint_loop_running(&self) -> bool {
        self.inner.borrow().paint_running
    }

    /// Start the resize loop. Idempotent.
    pub fn restart_resize_loop(&self) {
        self.inner.borrow_mut().resize_running = true;
    }

    /// Stop the resize loop. No resizable is ticked until it restarts.
    pub fn stop_resize_loop(&self) {
        self.inner.borrow_mut().resize_running = false;
    }

    #[must_use]
    pub fn is_resize_loop_running(&self) -> bool {
        self.inner.borrow().resize_running
    }

    // ------------------------------------------------------------------
    // Ticks
    // ------------------------------------------------------------------

    /// One display refresh: tick every renderable in registration order.
    pub fn on_animation_frame(&self, now: Duration) -> TickReport {
        let mut report = TickReport::default();
        let entries = {
            let inner = self.inner.borrow();
            if !inner.paint_running {
                return report;
            }
            inner.renderables.clone()
        };

        for (id, weak) in entries {
            {
                let inner = self.inner.borrow();
                if !inner.paint_running {
                    break;
                }
                if !inner.is_renderable(id) {
                    continue;
                }
            }
            let Some(target) = weak.upgrade() else {
                continue;
            };
            let Ok(mut target) = target.try_borrow_mut() else {
                report.busy += 1;
                tracing::trace!(%id, "renderable busy, skipped");
                continue;
            };

            match catch_unwind(AssertUnwindSafe(|| target.tick_paint(now))) {
                Ok(Ok(())) => report.ticked += 1,
                Ok(Err(error)) => {
                    report.failed += 1;
                    tracing::error!(%id, %error, "renderable tick failed");
                }
                Err(payload) => {
                    report.failed += 1;
                    let error = TickError::from_panic(payload.as_ref());
                    tracing::error!(%id, %error, "renderable tick failed");
                }
            }

            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| target.tick_notification())) {
                let error = TickError::from_panic(payload.as_ref());
                tracing::error!(%id, %error, "tick notification failed");
            }
        }

        self.prune();
        report
    }

    /// One resize-poll timer tick: tick every resizable in registration order.
    pub fn on_timer(&self, now: Duration) -> TickReport {
        let mut report = TickReport::default();
        let entries = {
            let inner = self.inner.borrow();
            if !inner.resize_running {
                return report;
            }
            inner.resizables.clone()
        };

        for (id, weak) in entries {
            {
                let inner = self.inner.borrow();
                if !inner.resize_running {
                    break;
                }
                if !inner.is_resizable(id) {
                    continue;
                }
            }
            let Some(target) = weak.upgrade() else {
                continue;
            };
            let Ok(mut target) = target.try_borrow_mut() else {
                report.busy += 1;
                continue;
            };

            match catch_unwind(AssertUnwindSafe(|| target.tick_resize(now))) {
                Ok(Ok(())) => report.ticked += 1,
                Ok(Err(error)) => {
                    report.failed += 1;
                    tracing::error!(%id, %error, "resizable tick failed");
                }
                Err(payload) => {
                    report.failed += 1;
                    let error = TickError::from_panic(payload.as_ref());
                    tracing::error!(%id, %error, "resizable tick failed");
                }
            }
        }

        self.prune();
        report
    }

    /// Drop entries whose target no longer exists.
    fn prune(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.renderables.retain(|(_, w)| w.strong_count() > 0);
        inner.resizables.retain(|(_, w)| w.strong_count() > 0);
    }
}

/// A [`FrameRegistry`] paired with the clock the host reads time from.
#[derive(Debug, Clone)]
pub struct FrameClock<C> {
    registry: FrameRegistry,
    clock: C,
}

impl<C: Clock> FrameClock<C> {
    #[must_use]
    pub fn new(registry: FrameRegistry, clock: C) -> Self {
        Self { registry, clock }
    }

    #[must_use]
    pub fn registry(&self) -> &FrameRegistry {
        &self.registry
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Display-refresh callback.
    pub fn animation_frame(&self) -> TickReport {
        self.registry.on_animation_frame(self.clock.now())
    }

    /// Resize-poll timer callback.
    pub fn timer(&self) -> TickReport {
        self.registry.on_timer(self.clock.now())
    }
}
