#![forbid(unsafe_code)]

//! The host environment a surface lives in.
//!
//! The host owns the real window/element: it measures the container, knows
//! where the surface sits in client coordinates, reports the device-pixel
//! ratio and zoom, and owns keyboard focus. [`HeadlessHost`] is an
//! in-memory implementation for tests and tooling.

use hgrid_core::geometry::{ContainerBox, Point};

/// Host services consumed by a [`Surface`](crate::surface::Surface).
pub trait Host {
    /// The container's box in client coordinates, unrounded.
    fn container_box(&self) -> ContainerBox;

    /// Top-left of the drawing surface in client coordinates.
    fn surface_origin(&self) -> Point;

    /// Device pixels per logical pixel, if the host reports one.
    fn device_pixel_ratio(&self) -> Option<f64>;

    /// Whether the surface currently has keyboard focus.
    fn has_focus(&self) -> bool;

    /// Ask the host to move keyboard focus to the surface.
    fn request_focus(&mut self);

    /// Raw page zoom property (`"1.25"`, `"125%"`), if any.
    fn zoom_property(&self) -> Option<String> {
        None
    }
}

/// In-memory host.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessHost {
    pub container: ContainerBox,
    pub origin: Point,
    pub pixel_ratio: Option<f64>,
    pub focused: bool,
    /// Number of focus requests received.
    pub focus_requests: u32,
    /// Whether a focus request actually grants focus.
    pub grant_focus: bool,
    pub zoom: Option<String>,
}

impl HeadlessHost {
    /// A host with a `width` x `height` container at the client origin.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            container: ContainerBox {
                left: 0.0,
                top: 0.0,
                width,
                height,
            },
            origin: Point::default(),
            pixel_ratio: Some(1.0),
            focused: false,
            focus_requests: 0,
            grant_focus: true,
            zoom: None,
        }
    }

    #[must_use]
    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = Some(ratio);
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: impl Into<String>) -> Self {
        self.zoom = Some(zoom.into());
        self
    }

    #[must_use]
    pub fn focused(mut self) -> Self {
        self.focused = true;
        self
    }

    /// Change the container size.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.container.width = width;
        self.container.height = height;
    }
}

impl Host for HeadlessHost {
    fn container_box(&self) -> ContainerBox {
        self.container
    }

    fn surface_origin(&self) -> Point {
        self.origin
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        self.pixel_ratio
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn request_focus(&mut self) {
        self.focus_requests += 1;
        if self.grant_focus {
            self.focused = true;
        }
    }

    fn zoom_property(&self) -> Option<String> {
        self.zoom.clone()
    }
}
