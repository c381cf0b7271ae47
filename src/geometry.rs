//! Feature geometry in map space, plus the screen-space containment
//! helpers used by hit-testing.
//!
//! Map space is lon/lat (`DVec2`, x = longitude). Screen space is pixels
//! (`Vec2`, y growing downward).

use glam::{DVec2, Vec2};

/// Geometry kind names, matching the GeoJSON vocabulary used for style
/// table keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    /// A single coordinate.
    Point,
    /// An open polyline.
    LineString,
    /// A closed shape with an exterior ring and optional holes.
    Polygon,
}

impl GeometryType {
    /// The style-key name for this geometry type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
        }
    }
}

/// A feature geometry in map coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single point.
    Point(DVec2),
    /// An open polyline with at least two vertices.
    LineString(Vec<DVec2>),
    /// Rings of vertices; the first ring is the exterior, the rest are
    /// holes. Rings are implicitly closed.
    Polygon(Vec<Vec<DVec2>>),
}

impl Geometry {
    /// The kind of this geometry.
    #[must_use]
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Self::Point(_) => GeometryType::Point,
            Self::LineString(_) => GeometryType::LineString,
            Self::Polygon(_) => GeometryType::Polygon,
        }
    }

    /// The coordinate a popup anchors to: the point itself, or the first
    /// vertex for line/polygon geometry.
    #[must_use]
    pub fn anchor(&self) -> DVec2 {
        match self {
            Self::Point(p) => *p,
            Self::LineString(pts) => pts.first().copied().unwrap_or_default(),
            Self::Polygon(rings) => rings
                .first()
                .and_then(|ring| ring.first())
                .copied()
                .unwrap_or_default(),
        }
    }
}

/// Distance from `p` to the segment `a`..`b`, all in screen pixels.
#[must_use]
pub(crate) fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Even-odd point-in-ring test in screen pixels. The ring is treated as
/// closed whether or not the last vertex repeats the first.
#[must_use]
pub(crate) fn point_in_ring(p: Vec2, ring: &[Vec2]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_uses_first_vertex() {
        let line = Geometry::LineString(vec![
            DVec2::new(1.0, 2.0),
            DVec2::new(3.0, 4.0),
        ]);
        assert_eq!(line.anchor(), DVec2::new(1.0, 2.0));

        let poly = Geometry::Polygon(vec![vec![
            DVec2::new(5.0, 6.0),
            DVec2::new(7.0, 6.0),
            DVec2::new(7.0, 8.0),
        ]]);
        assert_eq!(poly.anchor(), DVec2::new(5.0, 6.0));
    }

    #[test]
    fn segment_distance_handles_endpoints_and_interior() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        // Perpendicular from the middle
        assert!((point_segment_distance(Vec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-6);
        // Beyond an endpoint clamps to the endpoint
        assert!((point_segment_distance(Vec2::new(-4.0, 0.0), a, b) - 4.0).abs() < 1e-6);
        // Degenerate segment
        assert!((point_segment_distance(Vec2::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn point_in_ring_even_odd() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_ring(Vec2::new(5.0, 5.0), &square));
        assert!(!point_in_ring(Vec2::new(15.0, 5.0), &square));
        assert!(!point_in_ring(Vec2::new(-1.0, -1.0), &square));
    }
}
