//! Style lookup and resolution.
//!
//! A [`StyleTable`] maps style keys — a geometry type name, optionally
//! suffixed `_selected` — to entries that are either a fixed
//! [`StyleValue`] or a function producing one. [`resolve_style`] derives
//! the key for a render node and dispatches on the entry kind with an
//! explicit match; a missing key resolves to `None` (the node is simply
//! not drawn), never an error.

mod value;

use std::collections::HashMap;
use std::fmt;

pub use value::{
    circle_with_icon_style, cluster_point_style, line_string_style,
    point_style, polygon_style, CircleImage, CircleWithIconParams, Color,
    Fill, IconImage, ImageStyle, LineStringStyleParams, PointStyleParams,
    PolygonStyleParams, Stroke, Style, StyleValue, TextStyle,
    CLUSTER_BADGE_RADIUS,
};

use crate::source::RenderNode;

/// The geometry type name used for clustered render nodes regardless of
/// member geometry.
pub const CLUSTER_TYPE_NAME: &str = "Cluster";

/// Suffix appended to a geometry type name when the node is selected.
pub const SELECTED_SUFFIX: &str = "_selected";

/// Input handed to a dynamic style entry: the member count for clustered
/// nodes, the node itself otherwise.
#[derive(Debug, Clone, Copy)]
pub enum StyleInput<'a> {
    /// Member count of a clustered node.
    Count(u32),
    /// The render node being styled.
    Node(&'a RenderNode),
}

/// A style-producing function stored in a [`StyleTable`].
pub type StyleFn = Box<dyn Fn(StyleInput<'_>) -> StyleValue>;

/// A style table entry: either a fixed value or a producer function.
pub enum StyleEntry {
    /// A fixed style value returned as-is.
    Static(StyleValue),
    /// A function invoked per render node (or per cluster count).
    Dynamic(StyleFn),
}

impl fmt::Debug for StyleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Mapping from style keys to entries, consumed by [`resolve_style`].
#[derive(Debug, Default)]
pub struct StyleTable {
    entries: HashMap<String, StyleEntry>,
}

impl StyleTable {
    /// An empty table (every node resolves to no style).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixed single style under `key`.
    pub fn insert_style(&mut self, key: impl Into<String>, style: Style) {
        let _ = self.entries.insert(
            key.into(),
            StyleEntry::Static(StyleValue::Single(style)),
        );
    }

    /// Register a fixed style value (single or stack) under `key`.
    pub fn insert_static(&mut self, key: impl Into<String>, value: StyleValue) {
        let _ = self.entries.insert(key.into(), StyleEntry::Static(value));
    }

    /// Register a style-producing function under `key`.
    pub fn insert_dynamic<F>(&mut self, key: impl Into<String>, f: F)
    where
        F: Fn(StyleInput<'_>) -> StyleValue + 'static,
    {
        let _ = self
            .entries
            .insert(key.into(), StyleEntry::Dynamic(Box::new(f)));
    }

    /// Look up an entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StyleEntry> {
        self.entries.get(key)
    }
}

/// Derive the style key for a node: `Cluster` for clustered nodes, the
/// member geometry type name otherwise, suffixed `_selected` when selected.
#[must_use]
pub fn style_key(node: &RenderNode, selected: bool) -> String {
    let type_name = if node.is_cluster() {
        CLUSTER_TYPE_NAME
    } else {
        node.geometry_type().as_str()
    };
    if selected {
        format!("{type_name}{SELECTED_SUFFIX}")
    } else {
        type_name.to_owned()
    }
}

/// Resolve the style for a render node.
///
/// Pure function of its inputs and the table. Dynamic entries receive the
/// member count for clustered nodes and the node itself otherwise. A
/// missing key yields `None`: the node is not drawn and no error is
/// raised.
#[must_use]
pub fn resolve_style(
    table: &StyleTable,
    node: &RenderNode,
    selected: bool,
) -> Option<StyleValue> {
    let key = style_key(node, selected);
    match table.get(&key)? {
        StyleEntry::Static(value) => Some(value.clone()),
        StyleEntry::Dynamic(f) => {
            let input = if node.is_cluster() {
                StyleInput::Count(node.member_count())
            } else {
                StyleInput::Node(node)
            };
            Some(f(input))
        }
    }
}

/// The stock style table: default Point / LineString / Polygon statics and
/// a dynamic Cluster badge keyed on member count.
#[must_use]
pub fn default_style_table() -> StyleTable {
    let mut table = StyleTable::new();
    table.insert_style("Point", point_style(PointStyleParams::default()));
    table.insert_style(
        "LineString",
        line_string_style(LineStringStyleParams::default()),
    );
    table.insert_style(
        "Polygon",
        polygon_style(PolygonStyleParams::default()),
    );
    table.insert_dynamic(CLUSTER_TYPE_NAME, |input| {
        let count = match input {
            StyleInput::Count(n) => n,
            StyleInput::Node(_) => 1,
        };
        StyleValue::Single(cluster_point_style(count))
    });
    table
}
