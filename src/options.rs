//! Centralized engine options with TOML preset support.
//!
//! All tweakable settings (view, clustering, interaction) are consolidated
//! here. Options serialize to/from TOML so hosts can store named presets.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CartovisError;
use crate::source::DEFAULT_CLUSTER_DISTANCE;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[cluster]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct MapOptions {
    /// Initial view parameters.
    pub view: ViewOptions,
    /// Cluster grouping parameters.
    pub cluster: ClusterOptions,
    /// Click interaction parameters.
    pub interaction: InteractionOptions,
}

impl MapOptions {
    /// Generate JSON Schema describing the options surface.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(MapOptions)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CartovisError::Io`] when the file cannot be read and
    /// [`CartovisError::OptionsParse`] when it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, CartovisError> {
        let content =
            std::fs::read_to_string(path).map_err(CartovisError::Io)?;
        toml::from_str(&content)
            .map_err(|e| CartovisError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`CartovisError::OptionsParse`] on serialization failure and
    /// [`CartovisError::Io`] when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), CartovisError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CartovisError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(CartovisError::Io)?;
        }
        std::fs::write(path, content).map_err(CartovisError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

/// Initial view parameters.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema,
)]
#[schemars(title = "View", inline)]
#[serde(default)]
pub struct ViewOptions {
    /// Initial center as `[longitude, latitude]`.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            center: [43.984_506, 56.305_298],
            zoom: 11.0,
            min_zoom: 2.0,
            max_zoom: 15.0,
        }
    }
}

/// Cluster grouping parameters.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema,
)]
#[schemars(title = "Cluster", inline)]
#[serde(default)]
pub struct ClusterOptions {
    /// Whether point layers should be clustered at all.
    pub enabled: bool,
    /// Pixel distance within which points merge into one cluster.
    pub distance: f64,
    /// Minimum pixel distance kept between cluster anchors.
    pub min_distance: f64,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            distance: DEFAULT_CLUSTER_DISTANCE,
            min_distance: DEFAULT_CLUSTER_DISTANCE,
        }
    }
}

/// Click interaction parameters.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema,
)]
#[schemars(title = "Interaction", inline)]
#[serde(default)]
pub struct InteractionOptions {
    /// Whether clicking a feature marks it selected.
    pub select_feature: bool,
    /// Extra pixel slack applied when hit-testing strokes and markers
    /// without an explicit radius.
    pub hit_tolerance: f32,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            select_feature: false,
            hit_tolerance: 5.0,
        }
    }
}
