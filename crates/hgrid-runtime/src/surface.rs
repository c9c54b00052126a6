#![forbid(unsafe_code)]

//! Surface/viewport controller.
//!
//! A [`Surface`] owns one drawing device (through its [`CachedContext`]) and
//! one root [`Component`]. It keeps the backing store sized to the host
//! container at the right pixel ratio, paints the component when the frame
//! clock says so, and turns raw [`HostInput`] into [`SurfaceEvent`]s in
//! surface-local logical pixels for its observers.
//!
//! # Sizing
//!
//! ```text
//! ratio   = (use_hidpi ? host ratio : 1) * zoom
//! backing = round(logical * ratio)
//! bounds  = (0, 0, logical width, logical height)
//! ```
//!
//! A backing-store resize resets device state, so the facade cache is
//! invalidated and the component is told its retained pixels are gone.
//!
//! # Input
//!
//! Pointer positions are `client / zoom - origin`. Press, drag and release
//! go through a [`DragTracker`]; the pressed-keys list is kept in
//! [`CurrentKeys`] and reconciled with each event's live modifier flags.

use std::cell::RefCell;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use hgrid_core::config::{ConfigError, SurfaceConfig};
use hgrid_core::drag::{DragTracker, MoveTransition, ReleaseTransition};
use hgrid_core::event::{
    KeyDetail, MouseDetail, ResizeDetail, SurfaceEvent, TouchDetail, WheelDetail,
};
use hgrid_core::geometry::{ContainerBox, Point, Rect};
use hgrid_core::input::{HostInput, HostKey, HostPointer, HostWheel, Modifiers};
use hgrid_core::keys::{CurrentKeys, KeyRepeat, is_focus_traversal, key_char};
use hgrid_render::{CachedContext, Component, DrawingDevice, PaintError};

use crate::clock::{Clock, SystemClock};
use crate::error::TickError;
use crate::frame_clock::{FrameRegistry, RegistrationId, Renderable, Resizable};
use crate::host::Host;
use crate::pacing::{FramePacer, PaceDecision};

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique surface identifier, used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    fn next() -> Self {
        Self(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

/// Handle returned by [`Surface::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// What the host should do with the raw event after the surface saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[must_use]
pub struct InputDisposition {
    /// Suppress the host's default action (focus traversal, context menu,
    /// page scroll).
    pub prevent_default: bool,
}

impl InputDisposition {
    pub const PASS: Self = Self {
        prevent_default: false,
    };
    pub const PREVENT_DEFAULT: Self = Self {
        prevent_default: true,
    };
}

/// The info message shown over the surface, e.g. when there are no rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SurfaceInfo {
    /// Last non-empty message.
    pub message: String,
    /// Whether `message` should be rendered as markup.
    pub markup: bool,
    /// CSS width, when one was given.
    pub width: Option<String>,
    pub visible: bool,
}

/// Parse a host zoom property.
///
/// Accepts a factor (`"1.25"`) or a percentage (`"125%"`). Missing, empty,
/// unparsable and non-positive values give `1.0`.
#[must_use]
pub fn parse_zoom(raw: Option<&str>) -> f64 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 1.0;
    };
    let (number, divisor) = match raw.strip_suffix('%') {
        Some(number) => (number.trim(), 100.0),
        None => (raw, 1.0),
    };
    match number.parse::<f64>() {
        Ok(zoom) if zoom.is_finite() && zoom > 0.0 => zoom / divisor,
        _ => 1.0,
    }
}

fn backing_dimension(logical: f64, ratio: f64) -> u32 {
    let px = (logical * ratio).round();
    if px.is_finite() && px > 0.0 {
        px.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

fn info_width(width: &str) -> String {
    let width = width.trim();
    match width.parse::<f64>() {
        Ok(px) if px.is_finite() => format!("{width}px"),
        _ => width.to_owned(),
    }
}

type Observer = Box<dyn FnMut(&SurfaceEvent)>;

/// One drawable surface bound to a host container.
pub struct Surface<D, C, H> {
    id: SurfaceId,
    gc: CachedContext<D>,
    component: C,
    host: H,
    config: SurfaceConfig,
    clock: Box<dyn Clock>,

    zoom: f64,
    ratio: f64,
    size: Option<ContainerBox>,
    bounds: Rect,

    dirty: bool,
    pacer: FramePacer,
    last_size_check: Option<Duration>,

    mouse: Point,
    has_mouse: bool,
    drag: DragTracker,
    keys: CurrentKeys,
    repeat: KeyRepeat,
    focus_pending: bool,

    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
    info: SurfaceInfo,

    registry: Option<FrameRegistry>,
    registrations: Vec<RegistrationId>,
}

impl<D, C, H> Surface<D, C, H>
where
    D: DrawingDevice,
    C: Component<D>,
    H: Host,
{
    /// Create a surface, size it to the host container and paint once.
    pub fn new(device: D, component: C, host: H, config: SurfaceConfig) -> Self {
        let mut surface = Self {
            id: SurfaceId::next(),
            gc: CachedContext::new(device),
            component,
            host,
            config,
            clock: Box::new(SystemClock::new()),
            zoom: 1.0,
            ratio: 1.0,
            size: None,
            bounds: Rect::default(),
            dirty: false,
            pacer: FramePacer::new(),
            last_size_check: None,
            mouse: Point::OUTSIDE,
            has_mouse: false,
            drag: DragTracker::new(),
            keys: CurrentKeys::new(),
            repeat: KeyRepeat::default(),
            focus_pending: false,
            observers: Vec::new(),
            next_observer: 0,
            info: SurfaceInfo::default(),
            registry: None,
            registrations: Vec::new(),
        };
        surface.reset_zoom();
        surface
    }

    /// Builder: read key-repeat timestamps from `clock`.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // ------------------------------------------------------------------
    // Frame clock membership
    // ------------------------------------------------------------------

    /// Register `this` with both loops of `registry` and mark it dirty.
    pub fn attach(this: &Rc<RefCell<Self>>, registry: &FrameRegistry)
    where
        Self: 'static,
    {
        let paint = registry.register_renderable(this);
        let resize = registry.register_resizable(this);
        let mut surface = this.borrow_mut();
        surface.detach();
        surface.registrations = vec![paint, resize];
        surface.registry = Some(registry.clone());
        surface.request_repaint();
        tracing::trace!(surface = %surface.id, "surface attached");
    }

    /// Leave the frame clock. Later ticks never reach this surface.
    pub fn detach(&mut self) {
        if let Some(registry) = self.registry.take() {
            for id in self.registrations.drain(..) {
                registry.deregister(id);
            }
            tracing::trace!(surface = %self.id, "surface detached");
        }
    }

    fn is_loop_driven(&self) -> bool {
        !self.registrations.is_empty()
            && self
                .registry
                .as_ref()
                .is_some_and(FrameRegistry::is_paint_loop_running)
    }

    // ------------------------------------------------------------------
    // Sizing
    // ------------------------------------------------------------------

    fn measure(&self) -> ContainerBox {
        let raw = self.host.container_box();
        ContainerBox::measured(raw.left, raw.top, raw.width, raw.height)
    }

    fn pixel_ratio(&self) -> f64 {
        let host = if self.config.use_hidpi {
            self.host
                .device_pixel_ratio()
                .filter(|r| r.is_finite() && *r > 0.0)
                .unwrap_or(1.0)
        } else {
            1.0
        };
        host * self.zoom
    }

    /// Resize the backing store to `container` (or a fresh measurement),
    /// then paint synchronously.
    pub fn resize(&mut self, container: Option<ContainerBox>) {
        let container = container.unwrap_or_else(|| self.measure());
        let ratio = self.pixel_ratio();
        let backing = (
            backing_dimension(container.width, ratio),
            backing_dimension(container.height, ratio),
        );

        self.size = Some(container);
        self.ratio = ratio;
        self.gc.device_mut().set_backing_size(backing.0, backing.1);
        self.gc.invalidate();
        self.gc.scale(ratio, ratio);

        self.bounds = Rect::new(0.0, 0.0, container.width, container.height);
        self.component.set_bounds(self.bounds);
        self.component.shape_changed();

        tracing::debug!(
            surface = %self.id,
            width = container.width,
            height = container.height,
            ratio,
            backing_width = backing.0,
            backing_height = backing.1,
            "surface resized"
        );

        self.emit(SurfaceEvent::Resized(ResizeDetail {
            width: container.width,
            height: container.height,
        }));
        self.paint_inline("resize");
    }

    /// Re-read the host zoom property and resize.
    pub fn reset_zoom(&mut self) {
        self.zoom = parse_zoom(self.host.zoom_property().as_deref());
        self.resize(None);
    }

    /// Set the zoom factor explicitly and resize.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), ConfigError> {
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "zoom",
                value: zoom.to_string(),
                reason: "must be a positive number",
            });
        }
        self.zoom = zoom;
        self.resize(None);
        Ok(())
    }

    /// Measure the container and resize only if its size changed.
    ///
    /// Returns whether a resize happened.
    pub fn check_size(&mut self) -> bool {
        let measured = self.measure();
        if self.size.is_some_and(|size| size.same_size(&measured)) {
            return false;
        }
        self.resize(Some(measured));
        true
    }

    // ------------------------------------------------------------------
    // Painting
    // ------------------------------------------------------------------

    fn paint_contained(&mut self) -> Result<(), PaintError> {
        let Self { gc, component, .. } = self;
        let mut scope = gc.save_scope();
        match catch_unwind(AssertUnwindSafe(|| component.paint(&mut scope))) {
            Ok(result) => result,
            Err(payload) => Err(PaintError::from_panic(payload.as_ref())),
        }
    }

    /// Paint the component now, inside a save scope.
    ///
    /// Errors and panics from the component are logged and returned; the
    /// save stack is balanced either way.
    pub fn paint_now(&mut self) -> Result<(), PaintError> {
        self.dirty = false;
        let result = self.paint_contained();
        if let Err(error) = &result {
            tracing::error!(surface = %self.id, %error, "surface paint failed");
        }
        result
    }

    /// Mark dirty and paint immediately unless the paint loop will.
    pub fn repaint(&mut self) {
        self.request_repaint();
        if !self.is_loop_driven() || self.config.repaint_interval_rate == 0 {
            self.paint_inline("repaint");
        }
    }

    /// Synchronous paint with no caller to hand the error to. `paint_now`
    /// has already logged it at error level.
    fn paint_inline(&mut self, pass: &'static str) {
        if let Err(error) = self.paint_now() {
            tracing::debug!(surface = %self.id, pass, %error, "inline paint failed");
        }
    }

    /// Mark dirty; the next eligible frame paints.
    pub fn request_repaint(&mut self) {
        self.dirty = true;
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// Add an observer. Observers run synchronously in subscription order.
    pub fn subscribe(&mut self, observer: impl FnMut(&SurfaceEvent) + 'static) -> ObserverId {
        self.next_observer += 1;
        let id = ObserverId(self.next_observer);
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(o, _)| *o != id);
        self.observers.len() != before
    }

    fn emit(&mut self, event: SurfaceEvent) {
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    fn local(&self, client: Point) -> Point {
        let origin = self.host.surface_origin();
        Point::new(client.x / self.zoom - origin.x, client.y / self.zoom - origin.y)
    }

    fn mouse_detail(
        &mut self,
        modifiers: Option<Modifiers>,
        is_right_click: bool,
        drag_start: Option<Point>,
    ) -> MouseDetail {
        MouseDetail {
            mouse: self.mouse,
            keys: self.keys.snapshot(modifiers),
            is_right_click,
            drag_start,
        }
    }

    fn key_detail(&mut self, event: &HostKey, key_char: String) -> KeyDetail {
        let mods = event.modifiers;
        KeyDetail {
            key_char,
            identifier: event.key.clone(),
            key_code: event.key_code,
            char_code: event.char_code,
            alt: mods.contains(Modifiers::ALT),
            ctrl: mods.contains(Modifiers::CTRL),
            meta: mods.contains(Modifiers::META),
            shift: mods.contains(Modifiers::SHIFT),
            repeat: event.repeat,
            repeat_count: self.repeat.count(),
            repeat_start_ms: self.repeat.start_ms(),
            current_keys: self.keys.snapshot(Some(mods)),
        }
    }

    fn take_focus(&mut self) {
        if !self.host.has_focus() {
            self.focus_pending = true;
        }
    }

    /// Translate one raw host event into surface events.
    pub fn handle_input(&mut self, input: HostInput) -> InputDisposition {
        match input {
            HostInput::PointerOver(_) => {
                self.has_mouse = true;
                InputDisposition::PASS
            }
            HostInput::PointerOut(p) => self.on_pointer_out(&p),
            HostInput::PointerDown(p) => self.on_pointer_down(&p),
            HostInput::PointerMove(p) => self.on_pointer_move(&p),
            HostInput::PointerUp(p) => self.on_pointer_up(&p),
            HostInput::Click(p) => {
                self.mouse = self.local(p.client);
                let detail = self.mouse_detail(p.modifiers, p.is_right_click(), None);
                self.emit(SurfaceEvent::Click(detail));
                InputDisposition::PASS
            }
            HostInput::DoubleClick(p) => {
                self.mouse = self.local(p.client);
                let detail = self.mouse_detail(p.modifiers, p.is_right_click(), None);
                self.emit(SurfaceEvent::DblClick(detail));
                InputDisposition::PASS
            }
            HostInput::ContextMenu(p) => {
                if p.modifiers.is_some_and(|m| m.contains(Modifiers::CTRL)) {
                    self.keys.insert("CTRL");
                }
                let detail = self.mouse_detail(p.modifiers, p.is_right_click(), None);
                self.emit(SurfaceEvent::ContextMenu(detail));
                InputDisposition::PREVENT_DEFAULT
            }
            HostInput::Wheel(w) => self.on_wheel(&w),
            HostInput::KeyDown(k) => self.on_key(&k, true),
            HostInput::KeyUp(k) => self.on_key(&k, false),
            HostInput::TouchStart(points) => {
                let detail = self.touch_detail(&points);
                self.emit(SurfaceEvent::TouchStart(detail));
                InputDisposition::PASS
            }
            HostInput::TouchMove(points) => {
                let detail = self.touch_detail(&points);
                self.emit(SurfaceEvent::TouchMove(detail));
                InputDisposition::PASS
            }
            HostInput::TouchEnd(points) => {
                let detail = self.touch_detail(&points);
                self.emit(SurfaceEvent::TouchEnd(detail));
                InputDisposition::PASS
            }
            HostInput::Drop(p) => self.on_document_drag(&p, SurfaceEvent::Drop),
            HostInput::DocumentDragStart(p) => {
                self.on_document_drag(&p, SurfaceEvent::DocumentDragStart)
            }
            HostInput::DocumentDrag(p) => self.on_document_drag(&p, SurfaceEvent::DocumentDrag),
            HostInput::DocumentDragOver(p) => {
                self.on_document_drag(&p, SurfaceEvent::DocumentDragOver)
            }
            HostInput::DocumentDragEnd(p) => {
                self.on_document_drag(&p, SurfaceEvent::DocumentDragEnd)
            }
            HostInput::FocusGained => {
                self.emit(SurfaceEvent::FocusGained);
                InputDisposition::PASS
            }
            HostInput::FocusLost => {
                self.emit(SurfaceEvent::FocusLost);
                InputDisposition::PASS
            }
        }
    }

    fn on_pointer_down(&mut self, p: &HostPointer) -> InputDisposition {
        self.mouse = self.local(p.client);
        self.drag.press(self.mouse);
        let detail = self.mouse_detail(p.modifiers, p.is_right_click(), None);
        self.emit(SurfaceEvent::MouseDown(detail));
        self.take_focus();
        InputDisposition::PASS
    }

    fn on_pointer_move(&mut self, p: &HostPointer) -> InputDisposition {
        if !(self.has_mouse || self.drag.is_dragging()) {
            return InputDisposition::PASS;
        }
        if self.drag.is_pressed() && !p.any_button_held() {
            tracing::trace!(surface = %self.id, "synthesizing missed pointer up");
            let _ = self.on_pointer_up(p);
        }

        let transition = self.drag.on_move(self.mouse);
        let right = p.is_right_click();
        if let MoveTransition::Started { origin } = transition {
            let detail = self.mouse_detail(p.modifiers, right, Some(origin));
            self.emit(SurfaceEvent::DragStart(detail));
        }
        self.mouse = self.local(p.client);
        if let MoveTransition::Started { origin } | MoveTransition::Continued { origin } =
            transition
        {
            let detail = self.mouse_detail(p.modifiers, right, Some(origin));
            self.emit(SurfaceEvent::Drag(detail));
        }
        if self.bounds.contains(self.mouse) {
            let detail = self.mouse_detail(p.modifiers, right, None);
            self.emit(SurfaceEvent::MouseMove(detail));
        }
        InputDisposition::PASS
    }

    fn on_pointer_up(&mut self, p: &HostPointer) -> InputDisposition {
        let right = p.is_right_click();
        match self.drag.release() {
            ReleaseTransition::Ignored => return InputDisposition::PASS,
            ReleaseTransition::Released => {}
            ReleaseTransition::DragEnded { origin } => {
                let detail = self.mouse_detail(p.modifiers, right, Some(origin));
                self.emit(SurfaceEvent::DragEnd(detail));
            }
        }
        let origin = self.drag.origin();
        let detail = self.mouse_detail(p.modifiers, right, Some(origin));
        self.emit(SurfaceEvent::MouseUp(detail));
        InputDisposition::PASS
    }

    fn on_pointer_out(&mut self, p: &HostPointer) -> InputDisposition {
        self.has_mouse = false;
        if !self.drag.is_pressed() {
            self.mouse = Point::OUTSIDE;
        }
        self.repaint();
        let origin = self.drag.origin();
        let detail = self.mouse_detail(p.modifiers, false, Some(origin));
        self.emit(SurfaceEvent::MouseOut(detail));
        InputDisposition::PASS
    }

    fn on_wheel(&mut self, w: &HostWheel) -> InputDisposition {
        if self.drag.is_dragging() || !self.host.has_focus() {
            return InputDisposition::PASS;
        }
        let keys = self.keys.snapshot(w.pointer.modifiers);
        self.emit(SurfaceEvent::WheelMoved(WheelDetail {
            mouse: self.mouse,
            keys,
            is_right_click: w.pointer.is_right_click(),
            delta_x: w.delta_x,
            delta_y: w.delta_y,
        }));
        InputDisposition::PREVENT_DEFAULT
    }

    fn on_key(&mut self, event: &HostKey, down: bool) -> InputDisposition {
        if !self.host.has_focus() {
            return InputDisposition::PASS;
        }
        let key_char = key_char(event);
        let disposition = if is_focus_traversal(&key_char) {
            InputDisposition::PREVENT_DEFAULT
        } else {
            InputDisposition::PASS
        };
        self.keys.apply(&key_char, down);

        if down {
            let now_ms = self.clock.now_ms();
            self.repeat.on_key_down(&key_char, event.repeat, now_ms);
            let detail = self.key_detail(event, key_char);
            self.emit(SurfaceEvent::KeyDown(detail));
        } else {
            self.repeat.reset();
            let detail = self.key_detail(event, key_char);
            self.emit(SurfaceEvent::KeyUp(detail));
        }
        disposition
    }

    fn touch_detail(&self, points: &[Point]) -> TouchDetail {
        TouchDetail {
            touches: points.iter().map(|p| self.local(*p)).collect(),
        }
    }

    fn on_document_drag(
        &mut self,
        p: &HostPointer,
        wrap: fn(MouseDetail) -> SurfaceEvent,
    ) -> InputDisposition {
        self.mouse = self.local(p.client);
        let detail = self.mouse_detail(p.modifiers, p.is_right_click(), None);
        self.emit(wrap(detail));
        InputDisposition::PASS
    }

    // ------------------------------------------------------------------
    // Info message
    // ------------------------------------------------------------------

    /// Show `message` over the surface, or hide it when empty.
    ///
    /// A numeric `width` is taken as pixels; anything else is used as a CSS
    /// length. Width persists across calls that omit it.
    pub fn set_info(&mut self, message: &str, width: Option<&str>) {
        if !message.is_empty() {
            if let Some(width) = width.filter(|w| !w.trim().is_empty()) {
                self.info.width = Some(info_width(width));
            }
            self.info.markup = message.contains('<');
            message.clone_into(&mut self.info.message);
        }
        self.info.visible = !message.is_empty();
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn id(&self) -> SurfaceId {
        self.id
    }

    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Effective device pixels per logical pixel, zoom included.
    #[must_use]
    pub const fn pixel_ratio_in_use(&self) -> f64 {
        self.ratio
    }

    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub const fn container(&self) -> Option<ContainerBox> {
        self.size
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Last local pointer position, `(-1, -1)` when outside.
    #[must_use]
    pub const fn mouse_location(&self) -> Point {
        self.mouse
    }

    #[must_use]
    pub const fn has_mouse(&self) -> bool {
        self.has_mouse
    }

    #[must_use]
    pub fn current_keys(&self) -> &[String] {
        self.keys.as_slice()
    }

    #[must_use]
    pub const fn current_fps(&self) -> f64 {
        self.pacer.current_fps()
    }

    #[must_use]
    pub const fn info(&self) -> &SurfaceInfo {
        &self.info
    }

    #[must_use]
    pub const fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SurfaceConfig {
        &mut self.config
    }

    #[must_use]
    pub const fn component(&self) -> &C {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub const fn context(&self) -> &CachedContext<D> {
        &self.gc
    }

    pub fn context_mut(&mut self) -> &mut CachedContext<D> {
        &mut self.gc
    }
}

impl<D, C, H> Renderable for Surface<D, C, H>
where
    D: DrawingDevice,
    C: Component<D>,
    H: Host,
{
    fn tick_paint(&mut self, now: Duration) -> Result<(), TickError> {
        if std::mem::take(&mut self.focus_pending) && !self.host.has_focus() {
            self.host.request_focus();
        }
        match self.pacer.decide(now, self.dirty, &self.config) {
            PaceDecision::Paint => {
                self.pacer.record_paint(now, &self.config);
                self.dirty = false;
                self.paint_contained()?;
            }
            decision => tracing::trace!(surface = %self.id, ?decision, "paint skipped"),
        }
        Ok(())
    }

    fn tick_notification(&mut self) {
        self.component.tick_notification();
    }
}

impl<D, C, H> Resizable for Surface<D, C, H>
where
    D: DrawingDevice,
    C: Component<D>,
    H: Host,
{
    fn tick_resize(&mut self, now: Duration) -> Result<(), TickError> {
        if let Some(last) = self.last_size_check
            && now.saturating_sub(last) < self.config.resize_poll_interval
        {
            return Ok(());
        }
        self.last_size_check = Some(now);
        self.check_size();
        Ok(())
    }
}

impl<D, C, H> Drop for Surface<D, C, H> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.take() {
            for id in self.registrations.drain(..) {
                registry.deregister(id);
            }
        }
    }
}

impl<D, C, H> fmt::Debug for Surface<D, C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("bounds", &self.bounds)
            .field("ratio", &self.ratio)
            .field("zoom", &self.zoom)
            .field("dirty", &self.dirty)
            .field("mouse", &self.mouse)
            .field("observers", &self.observers.len())
            .field("attached", &self.registry.is_some())
            .finish_non_exhaustive()
    }
}
