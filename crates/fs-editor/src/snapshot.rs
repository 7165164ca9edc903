//! Read-only view of the diagram handed to renderers.

use crate::label::LabelEditors;
use fs_core::ElementId;
use fs_core::model::{DiagramGraph, Edge, Point};
use fs_core::shapes::Archetype;
use fs_core::viewport::Viewport;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub id: ElementId,
    pub position: Point,
    pub archetype: Archetype,
    /// Committed label from the store.
    pub label: String,
    /// Live buffer when the in-place editor is open.
    pub editing: Option<String>,
}

/// Everything a renderer needs for one frame, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSnapshot {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<Edge>,
    pub viewport: Viewport,
    pub pan_on_drag: bool,
}

impl DiagramSnapshot {
    pub fn capture(
        graph: &DiagramGraph,
        labels: &LabelEditors,
        viewport: Viewport,
        pan_on_drag: bool,
    ) -> Self {
        let nodes = graph
            .nodes()
            .map(|n| NodeView {
                id: n.id,
                position: n.position,
                archetype: n.archetype,
                label: n.label.clone(),
                editing: labels
                    .is_editing(n.id)
                    .then(|| labels.buffer(n.id).unwrap_or_default().to_string()),
            })
            .collect();
        Self {
            nodes,
            edges: graph.edges().cloned().collect(),
            viewport,
            pan_on_drag,
        }
    }

    /// Text the node should show: the live buffer while editing, else the label.
    pub fn display_text(&self, id: ElementId) -> Option<&str> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.editing.as_deref().unwrap_or(&n.label))
    }
}
