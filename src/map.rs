//! The map: a layer stack, popup overlays, and the shared viewport.
//!
//! The map owns all mutable interaction state reachable from a click:
//! feature selection flags (via its layers) and overlay positions. It
//! answers cross-layer queries — clear-all-selection and ordered
//! hit-testing — on behalf of the interaction controller.

use glam::{DVec2, Vec2};
use rustc_hash::FxHashMap;

use crate::feature::FeatureId;
use crate::layer::{Hit, StyledNode, VectorLayer};
use crate::options::MapOptions;
use crate::overlay::{Overlay, OverlayId};
use crate::viewport::Viewport;

/// A successful cross-layer hit-test result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapHit {
    /// Index of the layer that produced the hit.
    pub layer: usize,
    /// The feature the hit resolves to.
    pub feature: FeatureId,
    /// The hit node's anchor in map coordinates.
    pub anchor: DVec2,
    /// Member count of the hit node.
    pub member_count: u32,
}

/// The engine-side map model.
#[derive(Default)]
pub struct Map {
    layers: Vec<VectorLayer>,
    overlays: FxHashMap<OverlayId, Overlay>,
    next_overlay_id: u32,
    viewport: Viewport,
}

impl Map {
    /// A map with no layers over `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// A map configured from options, projecting onto `size` pixels.
    #[must_use]
    pub fn from_options(opts: &MapOptions, size: Vec2) -> Self {
        Self::new(Viewport::from_options(&opts.view, size))
    }

    /// The shared view state.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable access to the view state.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Adjust the zoom level by `delta`, clamped to the view bounds.
    pub fn zoom_by(&mut self, delta: f64) {
        self.viewport.zoom_by(delta);
    }

    /// Recenter the view.
    pub fn set_center(&mut self, center: DVec2) {
        self.viewport.set_center(center);
    }

    /// Append a layer on top of the stack; returns its index.
    pub fn add_layer(&mut self, layer: VectorLayer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// Layer by index.
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&VectorLayer> {
        self.layers.get(index)
    }

    /// Mutable layer by index.
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut VectorLayer> {
        self.layers.get_mut(index)
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Register a new hidden overlay; returns its handle.
    pub fn add_overlay(&mut self) -> OverlayId {
        self.next_overlay_id += 1;
        let id = OverlayId(self.next_overlay_id);
        let _ = self.overlays.insert(id, Overlay::new());
        id
    }

    /// Overlay state by handle.
    #[must_use]
    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(&id)
    }

    /// Mutable overlay state by handle.
    pub fn overlay_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
        self.overlays.get_mut(&id)
    }

    /// Produce the styled nodes of every layer, bottom-up, for one render
    /// pass.
    pub fn render_pass(&mut self) -> Vec<Vec<StyledNode>> {
        let viewport = self.viewport;
        self.layers
            .iter_mut()
            .map(|layer| layer.styled_nodes(&viewport))
            .collect()
    }

    /// Clear the selection flag on every feature in every layer. Returns
    /// `true` if anything changed.
    pub fn clear_selected_features(&mut self) -> bool {
        let mut changed = false;
        for layer in &mut self.layers {
            changed |= layer.source_mut().clear_selected();
        }
        changed
    }

    /// Hit-test all layers top-down (last added first, matching render
    /// stacking); the first covering node wins.
    pub fn hit_test(&mut self, pixel: Vec2, tolerance: f32) -> Option<MapHit> {
        let viewport = self.viewport;
        let count = self.layers.len();
        for (rev_index, layer) in self.layers.iter_mut().rev().enumerate() {
            if let Some(Hit {
                feature,
                anchor,
                member_count,
            }) = layer.hit_test(pixel, &viewport, tolerance)
            {
                return Some(MapHit {
                    layer: count - 1 - rev_index,
                    feature,
                    anchor,
                    member_count,
                });
            }
        }
        None
    }

    /// Set one feature's selection flag within a layer. Returns `true` if
    /// the flag changed.
    pub(crate) fn select_feature(
        &mut self,
        layer: usize,
        feature: FeatureId,
    ) -> bool {
        self.layers
            .get_mut(layer)
            .is_some_and(|l| l.source_mut().set_selected(feature, true))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map as JsonMap;

    use super::*;
    use crate::feature::Feature;
    use crate::geometry::Geometry;
    use crate::source::VectorSource;
    use crate::style::default_style_table;

    fn point_layer(coords: &[(f64, f64)]) -> VectorLayer {
        let features = coords
            .iter()
            .map(|&(x, y)| {
                Feature::new(
                    Geometry::Point(DVec2::new(x, y)),
                    JsonMap::new(),
                )
            })
            .collect();
        VectorLayer::new(
            VectorSource::from_features(features),
            default_style_table(),
        )
    }

    fn test_map() -> Map {
        Map::new(Viewport::new(
            DVec2::ZERO,
            11.0,
            Vec2::new(800.0, 600.0),
        ))
    }

    #[test]
    fn hit_test_prefers_topmost_layer() {
        let mut map = test_map();
        let bottom = map.add_layer(point_layer(&[(0.0, 0.0)]));
        let top = map.add_layer(point_layer(&[(0.0, 0.0)]));

        let hit = map.hit_test(Vec2::new(400.0, 300.0), 5.0).unwrap();
        assert_eq!(hit.layer, top);
        assert_ne!(hit.layer, bottom);
    }

    #[test]
    fn hit_test_misses_empty_space() {
        let mut map = test_map();
        let _ = map.add_layer(point_layer(&[(0.0, 0.0)]));
        assert!(map.hit_test(Vec2::new(100.0, 100.0), 5.0).is_none());
    }

    #[test]
    fn clear_selected_spans_all_layers() {
        let mut map = test_map();
        let a = map.add_layer(point_layer(&[(0.0, 0.0)]));
        let b = map.add_layer(point_layer(&[(1.0, 1.0)]));
        let fa = map.layer(a).unwrap().source().features()[0].id();
        let fb = map.layer(b).unwrap().source().features()[0].id();
        assert!(map.select_feature(a, fa));
        assert!(map.select_feature(b, fb));

        assert!(map.clear_selected_features());
        assert!(!map.layer(a).unwrap().source().features()[0].selected());
        assert!(!map.layer(b).unwrap().source().features()[0].selected());
        // Second clear is a no-op
        assert!(!map.clear_selected_features());
    }

    #[test]
    fn overlays_are_registered_hidden() {
        let mut map = test_map();
        let id = map.add_overlay();
        assert!(!map.overlay(id).unwrap().is_visible());
    }

    #[test]
    fn render_pass_covers_every_layer_in_stack_order() {
        let mut map = test_map();
        let _ = map.add_layer(point_layer(&[(0.0, 0.0), (0.1, 0.1)]));
        let _ = map.add_layer(point_layer(&[(0.2, 0.2)]));
        let pass = map.render_pass();
        assert_eq!(pass.len(), 2);
        assert_eq!(pass[0].len(), 2);
        assert_eq!(pass[1].len(), 1);
    }
}
