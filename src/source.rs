//! Feature sources and the cluster partition.
//!
//! A [`VectorSource`] owns features and assigns their ids. A
//! [`ClusterSource`] wraps one and partitions its features into
//! [`RenderNode`]s at a pixel-distance threshold, recomputing whenever the
//! view resolution or the source revision changes.

use glam::DVec2;
use rustc_hash::FxHashMap;

use crate::feature::{Feature, FeatureId};
use crate::geometry::{Geometry, GeometryType};
use crate::options::ClusterOptions;

/// Default cluster distance in pixels.
pub const DEFAULT_CLUSTER_DISTANCE: f64 = 14.0;

/// A renderable unit produced by a source partition: a single feature or
/// a cluster of features, with the anchor coordinate it draws at.
///
/// Nodes hold no selection state of their own; selection is read live from
/// the member features at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    members: Vec<FeatureId>,
    anchor: DVec2,
    geometry_type: GeometryType,
}

impl RenderNode {
    /// A node wrapping a single feature.
    #[must_use]
    pub fn single(feature: &Feature) -> Self {
        Self {
            members: vec![feature.id()],
            anchor: feature.geometry.anchor(),
            geometry_type: feature.geometry.geometry_type(),
        }
    }

    /// A cluster node over point members, anchored at `anchor`.
    #[must_use]
    pub fn cluster(members: Vec<FeatureId>, anchor: DVec2) -> Self {
        Self {
            members,
            anchor,
            geometry_type: GeometryType::Point,
        }
    }

    /// Member feature ids, in source insertion order.
    #[must_use]
    pub fn members(&self) -> &[FeatureId] {
        &self.members
    }

    /// The first member: the feature a hit on this node resolves to.
    #[must_use]
    pub fn primary(&self) -> FeatureId {
        self.members.first().copied().unwrap_or(FeatureId(0))
    }

    /// Number of member features.
    #[must_use]
    pub fn member_count(&self) -> u32 {
        self.members.len() as u32
    }

    /// Whether this node represents more than one feature.
    #[must_use]
    pub fn is_cluster(&self) -> bool {
        self.members.len() > 1
    }

    /// The coordinate this node draws (and anchors popups) at.
    #[must_use]
    pub fn anchor(&self) -> DVec2 {
        self.anchor
    }

    /// Geometry type of the member feature(s). Clusters are always built
    /// over points.
    #[must_use]
    pub fn geometry_type(&self) -> GeometryType {
        self.geometry_type
    }
}

/// An owned collection of features with source-assigned ids.
///
/// The revision counter bumps on any structural change (add/replace) and
/// keys downstream partition caches. Selection flips do not bump it: they
/// never change the partition.
#[derive(Debug, Default)]
pub struct VectorSource {
    features: Vec<Feature>,
    index: FxHashMap<FeatureId, usize>,
    next_id: u32,
    revision: u64,
}

impl VectorSource {
    /// An empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A source owning `features`, assigning ids in order.
    #[must_use]
    pub fn from_features(features: Vec<Feature>) -> Self {
        let mut source = Self::new();
        for feature in features {
            let _ = source.add(feature);
        }
        source
    }

    /// Take ownership of a feature, assigning and returning its id.
    pub fn add(&mut self, mut feature: Feature) -> FeatureId {
        self.next_id += 1;
        let id = FeatureId(self.next_id);
        feature.id = id;
        let _ = self.index.insert(id, self.features.len());
        self.features.push(feature);
        self.revision += 1;
        id
    }

    /// Replace the entire feature set. Previous ids become invalid.
    pub fn replace(&mut self, features: Vec<Feature>) {
        self.features.clear();
        self.index.clear();
        for feature in features {
            let _ = self.add(feature);
        }
        self.revision += 1;
    }

    /// All features, in insertion order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Look up a feature by id.
    #[must_use]
    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.index.get(&id).map(|&i| &self.features[i])
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the source holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Structural revision counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The trivial partition: one node per feature.
    #[must_use]
    pub fn nodes(&self) -> Vec<RenderNode> {
        self.features.iter().map(RenderNode::single).collect()
    }

    /// Set one feature's selection flag. Returns `true` if the flag
    /// changed.
    pub(crate) fn set_selected(&mut self, id: FeatureId, selected: bool) -> bool {
        let Some(&i) = self.index.get(&id) else {
            return false;
        };
        let feature = &mut self.features[i];
        if feature.selected() == selected {
            false
        } else {
            feature.set_selected(selected);
            true
        }
    }

    /// Clear every feature's selection flag. Returns `true` if any flag
    /// changed.
    pub(crate) fn clear_selected(&mut self) -> bool {
        let mut changed = false;
        for feature in &mut self.features {
            if feature.selected() {
                feature.set_selected(false);
                changed = true;
            }
        }
        changed
    }

    /// Whether any member of `ids` is selected.
    #[must_use]
    pub fn any_selected(&self, ids: &[FeatureId]) -> bool {
        ids.iter()
            .any(|&id| self.get(id).is_some_and(Feature::selected))
    }
}

struct ClusterCache {
    resolution: f64,
    revision: u64,
    nodes: Vec<RenderNode>,
}

/// Groups nearby point features into cluster nodes at a pixel-distance
/// threshold.
///
/// The partition covers every feature exactly once and is deterministic
/// for a fixed feature set and resolution: features are visited in
/// insertion order, and every not-yet-claimed point within
/// `distance * resolution` map units (box query) of the seed joins the
/// seed's cluster. The cluster anchors at the member centroid, pulled
/// toward the seed by `min_distance / distance`. Non-point features pass
/// through as singleton nodes.
pub struct ClusterSource {
    source: VectorSource,
    distance: f64,
    min_distance: f64,
    cache: Option<ClusterCache>,
}

impl ClusterSource {
    /// Wrap `source` with the default distances.
    #[must_use]
    pub fn new(source: VectorSource) -> Self {
        Self {
            source,
            distance: DEFAULT_CLUSTER_DISTANCE,
            min_distance: DEFAULT_CLUSTER_DISTANCE,
            cache: None,
        }
    }

    /// Wrap `source` with distances from options.
    #[must_use]
    pub fn from_options(source: VectorSource, opts: &ClusterOptions) -> Self {
        Self {
            source,
            distance: opts.distance,
            min_distance: opts.min_distance,
            cache: None,
        }
    }

    /// Cluster distance in pixels.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// The wrapped source.
    #[must_use]
    pub fn source(&self) -> &VectorSource {
        &self.source
    }

    /// Mutable access to the wrapped source. Structural changes bump the
    /// source revision and invalidate the cached partition.
    pub fn source_mut(&mut self) -> &mut VectorSource {
        &mut self.source
    }

    /// The partition at `resolution` (map units per pixel). Recomputed
    /// only when the resolution or source revision changed since the last
    /// call.
    pub fn nodes(&mut self, resolution: f64) -> &[RenderNode] {
        let stale = self.cache.as_ref().is_none_or(|c| {
            c.resolution != resolution || c.revision != self.source.revision()
        });
        if stale {
            let nodes = self.partition(resolution);
            log::trace!(
                "reclustered {} features into {} nodes at resolution {resolution}",
                self.source.len(),
                nodes.len()
            );
            self.cache = Some(ClusterCache {
                resolution,
                revision: self.source.revision(),
                nodes,
            });
        }
        // The cache was just filled when stale.
        self.cache.as_ref().map_or(&[], |c| &c.nodes)
    }

    fn partition(&self, resolution: f64) -> Vec<RenderNode> {
        let features = self.source.features();
        let radius = self.distance.max(0.0) * resolution;
        let ratio = if self.distance > 0.0 {
            (self.min_distance / self.distance).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut claimed = vec![false; features.len()];
        let mut nodes = Vec::new();
        for i in 0..features.len() {
            if claimed[i] {
                continue;
            }
            claimed[i] = true;
            let Geometry::Point(seed) = features[i].geometry else {
                nodes.push(RenderNode::single(&features[i]));
                continue;
            };

            let mut members = vec![features[i].id()];
            let mut sum = seed;
            for (j, feature) in features.iter().enumerate().skip(i + 1) {
                if claimed[j] {
                    continue;
                }
                let Geometry::Point(p) = feature.geometry else {
                    continue;
                };
                if (p.x - seed.x).abs() <= radius
                    && (p.y - seed.y).abs() <= radius
                {
                    claimed[j] = true;
                    members.push(feature.id());
                    sum += p;
                }
            }

            let centroid = sum / members.len() as f64;
            let anchor = centroid + (seed - centroid) * ratio;
            nodes.push(RenderNode::cluster(members, anchor));
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;

    fn point(x: f64, y: f64) -> Feature {
        Feature::new(Geometry::Point(DVec2::new(x, y)), Map::new())
    }

    fn ids(nodes: &[RenderNode]) -> Vec<FeatureId> {
        let mut all: Vec<FeatureId> = nodes
            .iter()
            .flat_map(|n| n.members().iter().copied())
            .collect();
        all.sort_by_key(|id| id.0);
        all
    }

    #[test]
    fn ids_are_stable_and_lookups_work() {
        let mut source = VectorSource::new();
        let a = source.add(point(1.0, 1.0));
        let b = source.add(point(2.0, 2.0));
        assert_ne!(a, b);
        assert_eq!(
            source.get(a).map(|f| f.geometry.anchor()),
            Some(DVec2::new(1.0, 1.0))
        );
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn replace_bumps_revision_and_invalidates_ids() {
        let mut source = VectorSource::new();
        let a = source.add(point(1.0, 1.0));
        let before = source.revision();
        source.replace(vec![point(3.0, 3.0)]);
        assert!(source.revision() > before);
        assert!(source.get(a).is_none());
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn plain_partition_is_one_node_per_feature() {
        let source = VectorSource::from_features(vec![
            point(0.0, 0.0),
            point(1.0, 1.0),
        ]);
        let nodes = source.nodes();
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| !n.is_cluster()));
    }

    #[test]
    fn nearby_points_cluster_and_far_points_do_not() {
        // At resolution 1.0 and distance 14px, the grouping radius is 14
        // map units.
        let source = VectorSource::from_features(vec![
            point(0.0, 0.0),
            point(5.0, 5.0),
            point(100.0, 100.0),
        ]);
        let mut cluster = ClusterSource::new(source);
        let nodes: Vec<RenderNode> = cluster.nodes(1.0).to_vec();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].member_count(), 2);
        assert!(nodes[0].is_cluster());
        assert_eq!(nodes[1].member_count(), 1);
        assert!(!nodes[1].is_cluster());
    }

    #[test]
    fn partition_covers_every_feature_exactly_once() {
        let source = VectorSource::from_features(vec![
            point(0.0, 0.0),
            point(3.0, 0.0),
            point(6.0, 0.0),
            point(50.0, 50.0),
            point(52.0, 52.0),
            point(-80.0, 10.0),
        ]);
        let expected: Vec<FeatureId> =
            source.features().iter().map(Feature::id).collect();
        let mut cluster = ClusterSource::new(source);
        assert_eq!(ids(cluster.nodes(1.0)), expected);
    }

    #[test]
    fn partition_is_deterministic() {
        let make = || {
            ClusterSource::new(VectorSource::from_features(vec![
                point(0.0, 0.0),
                point(10.0, 0.0),
                point(20.0, 0.0),
                point(200.0, 0.0),
            ]))
        };
        let a: Vec<RenderNode> = make().nodes(1.0).to_vec();
        let b: Vec<RenderNode> = make().nodes(1.0).to_vec();
        assert_eq!(a, b);
    }

    #[test]
    fn resolution_change_regroups() {
        let source = VectorSource::from_features(vec![
            point(0.0, 0.0),
            point(50.0, 0.0),
        ]);
        let mut cluster = ClusterSource::new(source);
        // 14px * 1.0 = 14 map units: too far apart to merge.
        assert_eq!(cluster.nodes(1.0).len(), 2);
        // 14px * 10.0 = 140 map units: merged.
        assert_eq!(cluster.nodes(10.0).len(), 1);
        assert_eq!(cluster.nodes(10.0)[0].member_count(), 2);
    }

    #[test]
    fn structural_change_invalidates_cache() {
        let mut cluster = ClusterSource::new(VectorSource::from_features(
            vec![point(0.0, 0.0)],
        ));
        assert_eq!(cluster.nodes(1.0).len(), 1);
        let _ = cluster.source_mut().add(point(1000.0, 0.0));
        assert_eq!(cluster.nodes(1.0).len(), 2);
    }

    #[test]
    fn anchor_interpolates_between_centroid_and_seed() {
        // Two points 10 units apart; centroid at x=5, seed at x=0.
        let source = VectorSource::from_features(vec![
            point(0.0, 0.0),
            point(10.0, 0.0),
        ]);
        // min_distance == distance pulls the anchor fully onto the seed.
        let mut full = ClusterSource::new(source);
        assert_eq!(full.nodes(1.0)[0].anchor(), DVec2::new(0.0, 0.0));

        let source = VectorSource::from_features(vec![
            point(0.0, 0.0),
            point(10.0, 0.0),
        ]);
        let mut half = ClusterSource::from_options(
            source,
            &ClusterOptions {
                enabled: true,
                distance: 14.0,
                min_distance: 7.0,
            },
        );
        assert_eq!(half.nodes(1.0)[0].anchor(), DVec2::new(2.5, 0.0));

        let source = VectorSource::from_features(vec![
            point(0.0, 0.0),
            point(10.0, 0.0),
        ]);
        let mut centered = ClusterSource::from_options(
            source,
            &ClusterOptions {
                enabled: true,
                distance: 14.0,
                min_distance: 0.0,
            },
        );
        assert_eq!(centered.nodes(1.0)[0].anchor(), DVec2::new(5.0, 0.0));
    }

    #[test]
    fn non_point_features_pass_through_unclustered() {
        let line = Feature::new(
            Geometry::LineString(vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(1.0, 0.0),
            ]),
            Map::new(),
        );
        let source =
            VectorSource::from_features(vec![line, point(0.0, 0.0)]);
        let mut cluster = ClusterSource::new(source);
        let nodes = cluster.nodes(1.0);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].geometry_type(), GeometryType::LineString);
        assert!(!nodes[0].is_cluster());
    }

    #[test]
    fn selection_flip_does_not_bump_revision() {
        let mut source = VectorSource::from_features(vec![point(0.0, 0.0)]);
        let id = source.features()[0].id();
        let rev = source.revision();
        assert!(source.set_selected(id, true));
        assert_eq!(source.revision(), rev);
        assert!(source.any_selected(&[id]));
        assert!(source.clear_selected());
        assert!(!source.any_selected(&[id]));
    }
}
