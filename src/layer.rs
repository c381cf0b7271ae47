//! Vector layers: a source bound to a style table.
//!
//! Per render pass the layer partitions its source into render nodes,
//! reads each node's live selection state, and resolves its style. Nodes
//! whose style key has no table entry resolve to nothing and are not
//! emitted. The layer also answers ordered hit-test queries against the
//! same partition.

use glam::{DVec2, Vec2};

use crate::feature::FeatureId;
use crate::geometry::{
    point_in_ring, point_segment_distance, Geometry, GeometryType,
};
use crate::options::ClusterOptions;
use crate::source::{ClusterSource, RenderNode, VectorSource};
use crate::style::{resolve_style, ImageStyle, StyleTable, StyleValue};
use crate::viewport::Viewport;

/// A render node with its resolved style and screen anchor, ready for the
/// host renderer.
#[derive(Debug, Clone)]
pub struct StyledNode {
    /// The underlying partition node.
    pub node: RenderNode,
    /// Anchor position in screen pixels.
    pub screen: Vec2,
    /// Whether the node renders as selected.
    pub selected: bool,
    /// The resolved style value.
    pub style: StyleValue,
}

/// A successful hit-test result within one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// The feature the hit resolves to (a cluster's first member).
    pub feature: FeatureId,
    /// The hit node's anchor in map coordinates.
    pub anchor: DVec2,
    /// Member count of the hit node.
    pub member_count: u32,
}

enum LayerSource {
    Plain(VectorSource),
    Clustered(ClusterSource),
}

/// A feature source bound to a style table.
pub struct VectorLayer {
    source: LayerSource,
    style: StyleTable,
}

impl VectorLayer {
    /// A layer over a plain (unclustered) source.
    #[must_use]
    pub fn new(source: VectorSource, style: StyleTable) -> Self {
        Self {
            source: LayerSource::Plain(source),
            style,
        }
    }

    /// A layer over a clustered source.
    #[must_use]
    pub fn clustered(source: ClusterSource, style: StyleTable) -> Self {
        Self {
            source: LayerSource::Clustered(source),
            style,
        }
    }

    /// A layer configured from cluster options: clustered with the
    /// configured distances when `opts.enabled`, plain otherwise.
    #[must_use]
    pub fn from_options(
        source: VectorSource,
        opts: &ClusterOptions,
        style: StyleTable,
    ) -> Self {
        if opts.enabled {
            Self::clustered(ClusterSource::from_options(source, opts), style)
        } else {
            Self::new(source, style)
        }
    }

    /// The underlying feature source.
    #[must_use]
    pub fn source(&self) -> &VectorSource {
        match &self.source {
            LayerSource::Plain(s) => s,
            LayerSource::Clustered(c) => c.source(),
        }
    }

    /// Mutable access to the underlying feature source.
    pub fn source_mut(&mut self) -> &mut VectorSource {
        match &mut self.source {
            LayerSource::Plain(s) => s,
            LayerSource::Clustered(c) => c.source_mut(),
        }
    }

    /// The layer's style table.
    #[must_use]
    pub fn style_table(&self) -> &StyleTable {
        &self.style
    }

    /// Mutable access to the style table.
    pub fn style_table_mut(&mut self) -> &mut StyleTable {
        &mut self.style
    }

    /// The current render partition at the viewport's resolution.
    pub fn nodes(&mut self, viewport: &Viewport) -> Vec<RenderNode> {
        match &mut self.source {
            LayerSource::Plain(s) => s.nodes(),
            LayerSource::Clustered(c) => {
                c.nodes(viewport.resolution()).to_vec()
            }
        }
    }

    /// Whether a node renders as selected: any member's flag for clusters,
    /// the sole member's flag otherwise.
    #[must_use]
    pub fn node_selected(&self, node: &RenderNode) -> bool {
        self.source().any_selected(node.members())
    }

    /// Produce the styled nodes for one render pass. Nodes whose style key
    /// has no entry are omitted (drawn as nothing).
    pub fn styled_nodes(&mut self, viewport: &Viewport) -> Vec<StyledNode> {
        let nodes = self.nodes(viewport);
        let mut styled = Vec::with_capacity(nodes.len());
        for node in nodes {
            let selected = self.node_selected(&node);
            let Some(style) = resolve_style(&self.style, &node, selected)
            else {
                continue;
            };
            styled.push(StyledNode {
                screen: viewport.map_to_screen(node.anchor()),
                node,
                selected,
                style,
            });
        }
        styled
    }

    /// Find the first node whose rendered geometry covers `pixel`.
    ///
    /// Candidates are visited in partition order; the tie-break between
    /// overlapping nodes is that order and nothing else. Nodes that
    /// resolve to no style are invisible and never hit.
    pub fn hit_test(
        &mut self,
        pixel: Vec2,
        viewport: &Viewport,
        tolerance: f32,
    ) -> Option<Hit> {
        let nodes = self.nodes(viewport);
        for node in nodes {
            let selected = self.node_selected(&node);
            let Some(style) = resolve_style(&self.style, &node, selected)
            else {
                continue;
            };
            if self.node_covers(&node, &style, pixel, viewport, tolerance) {
                return Some(Hit {
                    feature: node.primary(),
                    anchor: node.anchor(),
                    member_count: node.member_count(),
                });
            }
        }
        None
    }

    fn node_covers(
        &self,
        node: &RenderNode,
        style: &StyleValue,
        pixel: Vec2,
        viewport: &Viewport,
        tolerance: f32,
    ) -> bool {
        match node.geometry_type() {
            GeometryType::Point => {
                let radius = marker_radius(style).unwrap_or(tolerance);
                let anchor = viewport.map_to_screen(node.anchor());
                pixel.distance(anchor) <= radius
            }
            GeometryType::LineString => {
                let Some(Geometry::LineString(pts)) = self
                    .source()
                    .get(node.primary())
                    .map(|f| &f.geometry)
                else {
                    return false;
                };
                let width = stroke_half_width(style);
                let screen: Vec<Vec2> = pts
                    .iter()
                    .map(|&p| viewport.map_to_screen(p))
                    .collect();
                screen.windows(2).any(|seg| {
                    point_segment_distance(pixel, seg[0], seg[1])
                        <= width + tolerance
                })
            }
            GeometryType::Polygon => {
                let Some(Geometry::Polygon(rings)) = self
                    .source()
                    .get(node.primary())
                    .map(|f| &f.geometry)
                else {
                    return false;
                };
                // Even-odd across all rings: holes punch out.
                let containing = rings
                    .iter()
                    .filter(|ring| {
                        let screen: Vec<Vec2> = ring
                            .iter()
                            .map(|&p| viewport.map_to_screen(p))
                            .collect();
                        point_in_ring(pixel, &screen)
                    })
                    .count();
                containing % 2 == 1
            }
        }
    }
}

/// The hit radius of the topmost circle marker in a style, if any.
fn marker_radius(style: &StyleValue) -> Option<f32> {
    style.styles().iter().rev().find_map(|s| match &s.image {
        Some(ImageStyle::Circle(c)) => Some(c.radius),
        _ => None,
    })
}

fn stroke_half_width(style: &StyleValue) -> f32 {
    style
        .styles()
        .iter()
        .find_map(|s| s.stroke.map(|st| st.width / 2.0))
        .unwrap_or(0.0)
}
