//! Screen ↔ canvas coordinate transforms.
//!
//! The viewport (pan + zoom) is owned by whoever renders the canvas; this
//! module only reads it. Every controller that turns pointer input into
//! geometry goes through [`CanvasFrame::to_canvas`] so drops, strokes, and
//! anything else land in the same coordinate system.

use crate::model::Point;
use serde::{Deserialize, Serialize};

/// Smallest zoom accepted by [`Viewport::new`] and [`Viewport::clamped`]. Keeps the inverse transform finite.
pub const MIN_ZOOM: f32 = 0.05;

/// Pan offset and zoom scale mapping canvas space to screen space:
/// `screen = canvas * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Build a viewport, clamping a degenerate zoom (zero, negative, NaN)
    /// to [`MIN_ZOOM`].
    pub fn new(pan_x: f32, pan_y: f32, zoom: f32) -> Self {
        let zoom = if zoom.is_finite() && zoom >= MIN_ZOOM {
            zoom
        } else {
            MIN_ZOOM
        };
        Self { pan_x, pan_y, zoom }
    }

    /// Same viewport with the zoom clamp applied. Use on values built from
    /// public fields or deserialized from the host.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(self.pan_x, self.pan_y, self.zoom)
    }
}

/// Map a point relative to the canvas element into canvas space:
/// inverse pan-translate, then inverse zoom-scale.
#[inline]
pub fn to_canvas_space(screen: Point, viewport: &Viewport) -> Point {
    Point::new(
        (screen.x - viewport.pan_x) / viewport.zoom,
        (screen.y - viewport.pan_y) / viewport.zoom,
    )
}

/// Inverse of [`to_canvas_space`].
#[inline]
pub fn to_screen_space(canvas: Point, viewport: &Viewport) -> Point {
    Point::new(
        canvas.x * viewport.zoom + viewport.pan_x,
        canvas.y * viewport.zoom + viewport.pan_y,
    )
}

/// The viewport together with the canvas element's origin on screen.
///
/// Hosts report raw client coordinates; the frame subtracts the origin
/// before applying the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasFrame {
    pub origin_x: f32,
    pub origin_y: f32,
    pub viewport: Viewport,
}

impl CanvasFrame {
    pub fn new(origin_x: f32, origin_y: f32, viewport: Viewport) -> Self {
        Self {
            origin_x,
            origin_y,
            viewport: viewport.clamped(),
        }
    }

    /// Client (page) coordinates → canvas space.
    pub fn to_canvas(&self, client: Point) -> Point {
        let local = Point::new(client.x - self.origin_x, client.y - self.origin_y);
        to_canvas_space(local, &self.viewport)
    }

    /// Canvas space → client (page) coordinates.
    pub fn to_client(&self, canvas: Point) -> Point {
        let local = to_screen_space(canvas, &self.viewport);
        Point::new(local.x + self.origin_x, local.y + self.origin_y)
    }
}
