//! Editor configuration.

use fs_core::model::{EdgeRoute, Marker};
use serde::Deserialize;

/// Knobs for the controllers. Hosts may pass it as JSON; missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Prefix for spawned node ids. Default: `node`.
    pub node_prefix: String,

    /// Prefix for connection edge ids. Default: `edge`.
    pub edge_prefix: String,

    /// Prefix for pen stroke ids and their placeholder endpoints. Default: `drawing`.
    pub stroke_prefix: String,

    /// Route given to new connections. Default: **step**.
    pub connection_route: EdgeRoute,

    /// Target-end marker for new connections. Default: **arrowClosed**.
    pub connection_marker: Marker,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            node_prefix: "node".to_string(),
            edge_prefix: "edge".to_string(),
            stroke_prefix: "drawing".to_string(),
            connection_route: EdgeRoute::Step,
            connection_marker: Marker::ArrowClosed,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config object.
    ///
    /// # Errors
    /// Returns the serde error message if the JSON is malformed or a field
    /// has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }
}
