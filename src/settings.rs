//! Probe Settings
//!
//! Configuration consumed once when a [`Probe`](crate::probe::Probe) is
//! created. Settings are plain data and can be loaded from JSON.
//!
//! # Fields
//!
//! | Field                 | Description                                        | Default                              |
//! |-----------------------|----------------------------------------------------|--------------------------------------|
//! | `namespace`           | Name prefix of the host library namespace          | `"PIXI"`                             |
//! | `discovery_depth`     | Nested namespace levels visited by type discovery  | `2`                                  |
//! | `excluded_types`      | Structural / vector-drawing types never tracked    | `PIXI.Container`, `PIXI.Graphics`    |
//! | `alpha_policy`        | Whether `worldAlpha > 0` is required               | `require_positive`                   |
//! | `properties`          | Dotted property paths captured per tracked node    | see [`DEFAULT_PROPERTIES`]           |
//! | `max_serialize_depth` | Nesting depth beyond which graph dumps elide values | `512`                               |
//!
//! # Example
//!
//! ```rust,ignore
//! use stagehand::settings::ProbeSettings;
//!
//! let settings = ProbeSettings::from_json_str(r#"{ "namespace": "PIXI", "discovery_depth": 1 }"#)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::probe::filter::{AlphaPolicy, VisibilityFilter};
use crate::probe::serializer::GraphSerializer;
use crate::probe::snapshot::PropertyPath;

/// Property paths captured by default for every tracked node.
pub const DEFAULT_PROPERTIES: &[&str] = &[
    "name",
    "type",
    "x",
    "y",
    "zIndex",
    "width",
    "height",
    "alpha",
    "visible",
    "rotation",
    "angle",
    "texture.baseTexture.resource.url",
    "texture.frame.x",
    "texture.frame.y",
    "texture.frame.width",
    "texture.frame.height",
    "scale.x",
    "scale.y",
    "anchor.x",
    "anchor.y",
    "text",
    "_font",
];

/// Configuration for type discovery, visibility filtering and capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeSettings {
    pub namespace: String,
    pub discovery_depth: usize,
    pub excluded_types: Vec<String>,
    pub alpha_policy: AlphaPolicy,
    pub properties: Vec<String>,
    pub max_serialize_depth: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            namespace: "PIXI".to_owned(),
            discovery_depth: 2,
            excluded_types: vec!["PIXI.Container".to_owned(), "PIXI.Graphics".to_owned()],
            alpha_policy: AlphaPolicy::default(),
            properties: DEFAULT_PROPERTIES.iter().map(|&p| p.to_owned()).collect(),
            max_serialize_depth: GraphSerializer::DEFAULT_MAX_DEPTH,
        }
    }
}

impl ProbeSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parses [`properties`](Self::properties) into property paths.
    pub fn property_paths(&self) -> Result<Vec<PropertyPath>> {
        self.properties.iter().map(|p| p.parse()).collect()
    }

    #[must_use]
    pub fn visibility_filter(&self) -> VisibilityFilter {
        VisibilityFilter::new(self.excluded_types.iter().cloned(), self.alpha_policy)
    }

    #[must_use]
    pub fn graph_serializer(&self) -> GraphSerializer {
        GraphSerializer::with_max_depth(self.max_serialize_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let settings = ProbeSettings::from_json_str(r#"{ "discovery_depth": 1 }"#).unwrap();
        assert_eq!(settings.discovery_depth, 1);
        assert_eq!(settings.namespace, "PIXI");
        assert_eq!(settings.alpha_policy, AlphaPolicy::RequirePositive);
    }

    #[test]
    fn alpha_policy_is_snake_case() {
        let settings = ProbeSettings::from_json_str(r#"{ "alpha_policy": "ignore" }"#).unwrap();
        assert_eq!(settings.alpha_policy, AlphaPolicy::Ignore);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(ProbeSettings::from_json_str(r#"{ "namepsace": "PIXI" }"#).is_err());
    }

    #[test]
    fn default_properties_parse() {
        let paths = ProbeSettings::default().property_paths().unwrap();
        assert_eq!(paths.len(), DEFAULT_PROPERTIES.len());
    }
}
