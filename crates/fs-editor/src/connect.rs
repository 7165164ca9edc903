//! Drag-to-connect: turns a finished connection gesture into a structural edge.
//!
//! The host has already checked that the gesture ended over a handle. The
//! only check here is structural: both endpoint nodes must exist. Self-loops
//! and repeated connections are accepted, each as its own edge.

use crate::sync::GraphMutation;
use fs_core::ElementId;
use fs_core::model::{DiagramGraph, Edge, EdgeRoute, Marker};

/// A completed connection gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source: ElementId,
    pub source_handle: Option<String>,
    pub target: ElementId,
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: ElementId, source_handle: &str, target: ElementId, target_handle: &str) -> Self {
        Self {
            source,
            source_handle: Some(source_handle.to_string()),
            target,
            target_handle: Some(target_handle.to_string()),
        }
    }
}

pub struct ConnectionController {
    prefix: String,
    route: EdgeRoute,
    marker: Marker,
}

impl Default for ConnectionController {
    fn default() -> Self {
        Self::new("edge", EdgeRoute::Step, Marker::ArrowClosed)
    }
}

impl ConnectionController {
    pub fn new(prefix: &str, route: EdgeRoute, marker: Marker) -> Self {
        Self {
            prefix: prefix.to_string(),
            route,
            marker,
        }
    }

    /// Mutations for a finished gesture: one `AddEdge`, or nothing if an
    /// endpoint node is missing.
    pub fn connect(&self, conn: &Connection, graph: &DiagramGraph) -> Vec<GraphMutation> {
        if !graph.contains_node(conn.source) || !graph.contains_node(conn.target) {
            log::debug!(
                "connect {} → {} ignored: endpoint missing",
                conn.source,
                conn.target
            );
            return vec![];
        }

        let id = ElementId::fresh(&self.prefix, |id| graph.contains(id));
        let mut edge = Edge::structural(
            id,
            conn.source,
            conn.source_handle.clone(),
            conn.target,
            conn.target_handle.clone(),
        );
        edge.route = self.route;
        edge.marker_end = Some(self.marker);

        log::debug!("connect {} → {} as {id}", conn.source, conn.target);
        vec![GraphMutation::AddEdge {
            edge: Box::new(edge),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_core::model::{EdgeKind, Node, Point};
    use fs_core::Archetype;

    fn graph_with(ids: &[&str]) -> DiagramGraph {
        let mut g = DiagramGraph::new();
        for s in ids {
            g.add_node(Node::new(ElementId::intern(s), Archetype::Rectangle, Point::default()));
        }
        g
    }

    #[test]
    fn produces_one_step_edge_with_closed_arrow() {
        let g = graph_with(&["cx", "cy"]);
        let conn = Connection::new(ElementId::intern("cx"), "bottom", ElementId::intern("cy"), "top");
        let muts = ConnectionController::default().connect(&conn, &g);
        assert_eq!(muts.len(), 1);
        match &muts[0] {
            GraphMutation::AddEdge { edge } => {
                assert_eq!(edge.kind, EdgeKind::Structural);
                assert_eq!(edge.route, EdgeRoute::Step);
                assert_eq!(edge.marker_end, Some(Marker::ArrowClosed));
                assert_eq!(edge.source_handle.as_deref(), Some("bottom"));
                assert_eq!(edge.target_handle.as_deref(), Some("top"));
            }
            other => panic!("expected AddEdge, got {other:?}"),
        }
    }

    #[test]
    fn missing_endpoint_is_noop() {
        let g = graph_with(&["cz"]);
        let conn = Connection::new(ElementId::intern("cz"), "bottom", ElementId::intern("c_gone"), "top");
        assert!(ConnectionController::default().connect(&conn, &g).is_empty());
    }

    #[test]
    fn self_loop_is_allowed() {
        let g = graph_with(&["c_self"]);
        let me = ElementId::intern("c_self");
        let conn = Connection::new(me, "bottom", me, "top");
        assert_eq!(ConnectionController::default().connect(&conn, &g).len(), 1);
    }
}
