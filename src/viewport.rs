//! View state: center, zoom, and the map<->screen pixel transform.

use glam::{DVec2, Vec2};

use crate::options::ViewOptions;

/// Map units (degrees) per pixel at zoom level 0, for a 256px world tile.
const RESOLUTION_Z0: f64 = 360.0 / 256.0;

/// The current view over the map: geographic center, zoom level with
/// clamping bounds, and the screen size in pixels.
///
/// All pixel-distance semantics in the engine (cluster distance,
/// hit tolerance) are interpreted through this view's resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    center: DVec2,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    size: Vec2,
}

impl Viewport {
    /// Create a viewport centered on `center` (lon/lat) at `zoom`, with the
    /// default zoom bounds.
    #[must_use]
    pub fn new(center: DVec2, zoom: f64, size: Vec2) -> Self {
        let opts = ViewOptions::default();
        let mut vp = Self {
            center,
            zoom,
            min_zoom: opts.min_zoom,
            max_zoom: opts.max_zoom,
            size,
        };
        vp.set_zoom(zoom);
        vp
    }

    /// Build a viewport from view options.
    #[must_use]
    pub fn from_options(opts: &ViewOptions, size: Vec2) -> Self {
        let mut vp = Self {
            center: DVec2::new(opts.center[0], opts.center[1]),
            zoom: opts.zoom,
            min_zoom: opts.min_zoom,
            max_zoom: opts.max_zoom,
            size,
        };
        vp.set_zoom(opts.zoom);
        vp
    }

    /// Geographic center (lon/lat).
    #[must_use]
    pub fn center(&self) -> DVec2 {
        self.center
    }

    /// Recenter the view.
    pub fn set_center(&mut self, center: DVec2) {
        self.center = center;
    }

    /// Current zoom level.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom level, clamped to the configured bounds.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Adjust the zoom level by `delta` (positive zooms in), clamped.
    pub fn zoom_by(&mut self, delta: f64) {
        self.set_zoom(self.zoom + delta);
    }

    /// Screen size in pixels.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Resize the screen area the view projects onto.
    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Map units per pixel at the current zoom.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        RESOLUTION_Z0 / self.zoom.exp2()
    }

    /// Project a map coordinate to screen pixels. Screen y grows downward.
    #[must_use]
    pub fn map_to_screen(&self, coord: DVec2) -> Vec2 {
        let res = self.resolution();
        let dx = (coord.x - self.center.x) / res;
        let dy = (coord.y - self.center.y) / res;
        Vec2::new(
            self.size.x / 2.0 + dx as f32,
            self.size.y / 2.0 - dy as f32,
        )
    }

    /// Unproject a screen pixel to map coordinates.
    #[must_use]
    pub fn screen_to_map(&self, pixel: Vec2) -> DVec2 {
        let res = self.resolution();
        DVec2::new(
            self.center.x + f64::from(pixel.x - self.size.x / 2.0) * res,
            self.center.y - f64::from(pixel.y - self.size.y / 2.0) * res,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_options(&ViewOptions::default(), Vec2::new(1024.0, 768.0))
    }
}
