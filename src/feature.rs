//! Atomic spatial records: geometry plus an arbitrary property bag plus a
//! selection flag.

use serde_json::{Map, Value};

use crate::geometry::Geometry;

/// Arbitrary named properties attached to a feature.
pub type Properties = Map<String, Value>;

/// Identifier for a feature within its owning [`VectorSource`].
///
/// Ids are source-assigned on insert and stay stable until the source is
/// replaced.
///
/// [`VectorSource`]: crate::source::VectorSource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureId(pub(crate) u32);

impl FeatureId {
    /// Sentinel for a feature not yet owned by a source.
    pub(crate) const UNASSIGNED: Self = Self(0);
}

/// One atomic unit of displayable spatial data.
///
/// `selected` is mutated only through the interaction entry points
/// ([`InteractionController`] via the owning map/layer); everything else is
/// immutable after load.
///
/// [`InteractionController`]: crate::interaction::InteractionController
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub(crate) id: FeatureId,
    /// The feature's geometry in map coordinates.
    pub geometry: Geometry,
    /// Arbitrary named properties carried through to click callbacks.
    pub properties: Properties,
    selected: bool,
}

impl Feature {
    /// Create a feature. The id is assigned by the source that takes
    /// ownership of it.
    #[must_use]
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self {
            id: FeatureId::UNASSIGNED,
            geometry,
            properties,
            selected: false,
        }
    }

    /// Source-assigned identifier.
    #[must_use]
    pub fn id(&self) -> FeatureId {
        self.id
    }

    /// Whether this feature is currently selected.
    #[must_use]
    pub fn selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
