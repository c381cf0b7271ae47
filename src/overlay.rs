//! Positioned popup overlays.
//!
//! An overlay is the engine-side state of a host popup element: an anchor
//! coordinate and a visibility flag. The engine only ever positions and
//! toggles overlays; their content belongs to the host.

use glam::DVec2;

/// Identifier for an overlay registered on a [`Map`].
///
/// [`Map`]: crate::map::Map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub(crate) u32);

/// Popup overlay state: anchor position and visibility.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    position: Option<DVec2>,
    visible: bool,
}

impl Overlay {
    /// A hidden overlay with no position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor the overlay at `coord` and show it.
    pub fn show_at(&mut self, coord: DVec2) {
        self.position = Some(coord);
        self.visible = true;
    }

    /// Hide the overlay and clear its anchor.
    pub fn hide(&mut self) {
        self.position = None;
        self.visible = false;
    }

    /// Current anchor coordinate, if positioned.
    #[must_use]
    pub fn position(&self) -> Option<DVec2> {
        self.position
    }

    /// Whether the overlay is currently shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
