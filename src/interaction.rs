//! The click interaction state machine.
//!
//! A single pointer click runs one synchronous sequence: unconditionally
//! clear every selection flag, hit-test the layer stack, then either
//! select/popup/notify on a hit or hide/notify on a miss. Nothing here
//! suspends; clicks are processed strictly in delivery order and at most
//! one is in flight.

use glam::Vec2;

use crate::feature::{FeatureId, Properties};
use crate::map::Map;
use crate::options::InteractionOptions;
use crate::overlay::OverlayId;

/// Callback invoked after every click: the hit feature's properties, or
/// `None` on a miss.
pub type ClickCallback = Box<dyn FnMut(Option<&Properties>)>;

/// Controller state after the last click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// No selection, popup hidden.
    #[default]
    Idle,
    /// One feature selected; popup shown at it, if a popup is bound.
    Selected,
}

/// What a click resolved to, returned to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// A feature (or cluster, resolved to its primary member) was hit.
    Hit(FeatureId),
    /// Empty space: all state cleared.
    Miss,
}

/// Drives feature selection and popup state from pointer clicks.
///
/// A second click on an already-selected feature repeats the same
/// select/popup/notify outcome; it does not toggle the selection off,
/// because clearing happens unconditionally before every hit-test.
#[derive(Default)]
pub struct InteractionController {
    select_feature: bool,
    hit_tolerance: f32,
    popup: Option<OverlayId>,
    on_click: Option<ClickCallback>,
    state: InteractionState,
}

impl InteractionController {
    /// A controller configured from options, with no popup and no
    /// callback bound.
    #[must_use]
    pub fn new(opts: &InteractionOptions) -> Self {
        Self {
            select_feature: opts.select_feature,
            hit_tolerance: opts.hit_tolerance,
            popup: None,
            on_click: None,
            state: InteractionState::Idle,
        }
    }

    /// Bind a popup overlay (registered on the map) for the controller to
    /// position and toggle. Without one, popup steps are skipped.
    #[must_use]
    pub fn with_popup(mut self, overlay: OverlayId) -> Self {
        self.popup = Some(overlay);
        self
    }

    /// Bind the external click callback.
    #[must_use]
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Option<&Properties>) + 'static,
    {
        self.on_click = Some(Box::new(callback));
        self
    }

    /// Controller state after the last click.
    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Process one pointer click at `pixel`.
    ///
    /// The full sequence — clear, hit-test, mutate, notify — completes
    /// before this returns.
    pub fn handle_click(&mut self, map: &mut Map, pixel: Vec2) -> ClickOutcome {
        // Defensive full clear, regardless of current state.
        let _ = map.clear_selected_features();

        match map.hit_test(pixel, self.hit_tolerance) {
            Some(hit) => {
                if self.select_feature {
                    let _ = map.select_feature(hit.layer, hit.feature);
                }
                if let Some(id) = self.popup {
                    if let Some(overlay) = map.overlay_mut(id) {
                        overlay.show_at(hit.anchor);
                    }
                }
                log::debug!(
                    "click at ({}, {}) hit feature {:?} ({} members)",
                    pixel.x,
                    pixel.y,
                    hit.feature,
                    hit.member_count
                );
                if let Some(callback) = self.on_click.as_mut() {
                    let properties = map
                        .layer(hit.layer)
                        .and_then(|l| l.source().get(hit.feature))
                        .map(|f| &f.properties);
                    callback(properties);
                }
                self.state = InteractionState::Selected;
                ClickOutcome::Hit(hit.feature)
            }
            None => {
                if let Some(id) = self.popup {
                    if let Some(overlay) = map.overlay_mut(id) {
                        overlay.hide();
                    }
                }
                log::debug!("click at ({}, {}) hit nothing", pixel.x, pixel.y);
                if let Some(callback) = self.on_click.as_mut() {
                    callback(None);
                }
                self.state = InteractionState::Idle;
                ClickOutcome::Miss
            }
        }
    }
}
