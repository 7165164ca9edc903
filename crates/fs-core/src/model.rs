//! Core diagram data model.
//!
//! Nodes live in a `petgraph` stable graph; structural edges are mirrored as
//! graph edges so connectivity queries are cheap. Every edge (structural and
//! freehand) is also kept in an insertion-ordered list, which is the order
//! renderers draw them in.
//!
//! Controllers never hold references into the graph across events. They keep
//! `ElementId`s and resolve them again on every mutation.

use crate::id::ElementId;
use crate::shapes::Archetype;
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Geometry ────────────────────────────────────────────────────────────

/// A point in screen or canvas space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A diagram node. `position` is the top-left corner in canvas space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: ElementId,
    pub position: Point,
    pub archetype: Archetype,
    pub label: String,
}

impl Node {
    /// A node with the archetype's default label.
    pub fn new(id: ElementId, archetype: Archetype, position: Point) -> Self {
        Self {
            id,
            position,
            archetype,
            label: archetype.default_label(),
        }
    }
}

// ─── Edges ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Connects two real nodes through their handles.
    Structural,
    /// A captured pen stroke with placeholder endpoints.
    Freehand,
}

/// Terminal marker drawn at the target end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Marker {
    Arrow,
    ArrowClosed,
}

/// How a structural edge is routed between its handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeRoute {
    Straight,
    /// Orthogonal segments (vertical, horizontal, vertical).
    #[default]
    Step,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: ElementId,
    pub kind: EdgeKind,
    pub source: ElementId,
    pub target: ElementId,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
    /// Canvas-space polyline for freehand edges, empty for structural ones.
    pub points: Vec<Point>,
    pub marker_end: Option<Marker>,
    pub route: EdgeRoute,
    /// Takes part in hit testing and selection.
    pub interactive: bool,
    /// May be removed by the host's generic delete gesture.
    pub deletable: bool,
    /// Points can no longer be appended.
    pub frozen: bool,
}

impl Edge {
    /// A node-to-node edge ending in a closed arrow.
    pub fn structural(
        id: ElementId,
        source: ElementId,
        source_handle: Option<String>,
        target: ElementId,
        target_handle: Option<String>,
    ) -> Self {
        Self {
            id,
            kind: EdgeKind::Structural,
            source,
            target,
            source_handle,
            target_handle,
            points: Vec::new(),
            marker_end: Some(Marker::ArrowClosed),
            route: EdgeRoute::default(),
            interactive: true,
            deletable: true,
            frozen: true,
        }
    }

    /// A freehand stroke seeded with its first point. `source`/`target`
    /// are placeholders and are never resolved against the graph.
    pub fn freehand(id: ElementId, source: ElementId, target: ElementId, first: Point) -> Self {
        Self {
            id,
            kind: EdgeKind::Freehand,
            source,
            target,
            source_handle: None,
            target_handle: None,
            points: vec![first],
            marker_end: None,
            route: EdgeRoute::Straight,
            interactive: false,
            deletable: false,
            frozen: false,
        }
    }

    pub fn is_freehand(&self) -> bool {
        self.kind == EdgeKind::Freehand
    }
}

// ─── Graph store ─────────────────────────────────────────────────────────

/// The authoritative store of nodes and edges.
#[derive(Debug, Clone, Default)]
pub struct DiagramGraph {
    /// Nodes, with structural edges as graph edges weighted by edge id.
    pub graph: StableDiGraph<Node, ElementId>,
    node_index: HashMap<ElementId, NodeIndex>,
    /// Node insertion order (stable graph slots get reused after removal).
    node_order: Vec<NodeIndex>,
    /// All edges, in insertion order.
    edges: Vec<Edge>,
    /// Structural edge id → its graph edge.
    links: HashMap<ElementId, EdgeIndex>,
}

impl DiagramGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── nodes ──

    /// Insert a node. Returns `false` (and changes nothing) if the id is
    /// already used by a node or an edge.
    ///
    /// Structural edges left dangling by an earlier removal of this id are
    /// linked again once both of their endpoints exist.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.contains(node.id) {
            log::debug!("add_node: id {} already in use", node.id);
            return false;
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        self.node_order.push(idx);
        self.relink(id);
        true
    }

    fn relink(&mut self, node: ElementId) {
        for edge in &self.edges {
            if edge.kind != EdgeKind::Structural
                || (edge.source != node && edge.target != node)
                || self.links.contains_key(&edge.id)
            {
                continue;
            }
            let (Some(&from), Some(&to)) = (
                self.node_index.get(&edge.source),
                self.node_index.get(&edge.target),
            ) else {
                continue;
            };
            log::debug!("relinking edge {} to {node}", edge.id);
            let link = self.graph.add_edge(from, to, edge.id);
            self.links.insert(edge.id, link);
        }
    }

    pub fn node(&self, id: ElementId) -> Option<&Node> {
        self.node_index.get(&id).map(|idx| &self.graph[*idx])
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.node_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    /// Replace a node's label. Returns `false` if the node does not exist.
    pub fn set_label(&mut self, id: ElementId, label: &str) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.label.clear();
                node.label.push_str(label);
                true
            }
            None => false,
        }
    }

    /// Move a node. Returns `false` if the node does not exist.
    pub fn set_position(&mut self, id: ElementId, position: Point) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Remove a node. Incident structural edges stay in the edge list and
    /// show up in [`DiagramGraph::dangling_edges`].
    pub fn remove_node(&mut self, id: ElementId) -> Option<Node> {
        let idx = self.node_index.remove(&id)?;
        self.node_order.retain(|i| *i != idx);
        // petgraph drops the incident graph edges with the node.
        self.links
            .retain(|_, e| self.graph.edge_endpoints(*e).is_some_and(|(a, b)| a != idx && b != idx));
        self.graph.remove_node(idx)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.node_order.iter().map(|idx| &self.graph[*idx])
    }

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    pub fn contains_node(&self, id: ElementId) -> bool {
        self.node_index.contains_key(&id)
    }

    // ── edges ──

    /// Insert an edge. Rejects duplicate ids, freehand edges without
    /// points, and structural edges whose endpoints are not in the graph.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if self.contains(edge.id) {
            log::debug!("add_edge: id {} already in use", edge.id);
            return false;
        }
        match edge.kind {
            EdgeKind::Freehand => {
                if edge.points.is_empty() {
                    log::debug!("add_edge: freehand {} has no points", edge.id);
                    return false;
                }
            }
            EdgeKind::Structural => {
                let (Some(&from), Some(&to)) = (
                    self.node_index.get(&edge.source),
                    self.node_index.get(&edge.target),
                ) else {
                    log::debug!(
                        "add_edge: {} → {} references a missing node",
                        edge.source,
                        edge.target
                    );
                    return false;
                };
                let link = self.graph.add_edge(from, to, edge.id);
                self.links.insert(edge.id, link);
            }
        }
        self.edges.push(edge);
        true
    }

    pub fn edge(&self, id: ElementId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    fn edge_mut(&mut self, id: ElementId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.id == id)
    }

    /// Append a point to an unfrozen freehand edge.
    pub fn append_point(&mut self, id: ElementId, point: Point) -> bool {
        match self.edge_mut(id) {
            Some(edge) if edge.is_freehand() && !edge.frozen => {
                edge.points.push(point);
                true
            }
            _ => false,
        }
    }

    /// Stop accepting points on an edge. Returns `true` if it was open.
    pub fn freeze_edge(&mut self, id: ElementId) -> bool {
        match self.edge_mut(id) {
            Some(edge) if !edge.frozen => {
                edge.frozen = true;
                true
            }
            _ => false,
        }
    }

    pub fn remove_edge(&mut self, id: ElementId) -> Option<Edge> {
        let pos = self.edges.iter().position(|e| e.id == id)?;
        if let Some(link) = self.links.remove(&id)
            && self.graph.edge_weight(link) == Some(&id)
        {
            self.graph.remove_edge(link);
        }
        Some(self.edges.remove(pos))
    }

    /// Edges in insertion (= render) order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_edge(&self, id: ElementId) -> bool {
        self.edges.iter().any(|e| e.id == id)
    }

    /// True if the id is used by any node or edge.
    pub fn contains(&self, id: ElementId) -> bool {
        self.contains_node(id) || self.contains_edge(id)
    }

    // ── structural queries ──

    /// Ids of structural edges leaving `node`.
    pub fn outgoing(&self, node: ElementId) -> SmallVec<[ElementId; 4]> {
        self.incident(node, Direction::Outgoing)
    }

    /// Ids of structural edges entering `node`.
    pub fn incoming(&self, node: ElementId) -> SmallVec<[ElementId; 4]> {
        self.incident(node, Direction::Incoming)
    }

    fn incident(&self, node: ElementId, dir: Direction) -> SmallVec<[ElementId; 4]> {
        let Some(&idx) = self.node_index.get(&node) else {
            return SmallVec::new();
        };
        let mut ids: SmallVec<[ElementId; 4]> =
            self.graph.edges_directed(idx, dir).map(|e| *e.weight()).collect();
        // Report in insertion order rather than adjacency-list order.
        ids.sort_by_key(|id| self.edges.iter().position(|e| e.id == *id));
        ids
    }

    /// Nodes reachable through one outgoing structural edge.
    pub fn successors(&self, node: ElementId) -> SmallVec<[ElementId; 4]> {
        self.outgoing(node)
            .iter()
            .filter_map(|e| self.edge(*e).map(|e| e.target))
            .collect()
    }

    /// Structural edges whose source or target node no longer exists.
    pub fn dangling_edges(&self) -> Vec<ElementId> {
        self.edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Structural)
            .filter(|e| !self.contains_node(e.source) || !self.contains_node(e.target))
            .map(|e| e.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> ElementId {
        ElementId::intern(s)
    }

    fn two_nodes() -> DiagramGraph {
        let mut g = DiagramGraph::new();
        assert!(g.add_node(Node::new(id("m_a"), Archetype::Rectangle, Point::new(0.0, 0.0))));
        assert!(g.add_node(Node::new(id("m_b"), Archetype::Circle, Point::new(0.0, 200.0))));
        g
    }

    #[test]
    fn duplicate_node_id_is_rejected() {
        let mut g = two_nodes();
        let dup = Node::new(id("m_a"), Archetype::Diamond, Point::new(5.0, 5.0));
        assert!(!g.add_node(dup));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.node(id("m_a")).map(|n| n.archetype), Some(Archetype::Rectangle));
    }

    #[test]
    fn structural_edge_needs_both_nodes() {
        let mut g = two_nodes();
        let bad = Edge::structural(id("m_e0"), id("m_a"), None, id("m_ghost"), None);
        assert!(!g.add_edge(bad));
        let good = Edge::structural(
            id("m_e1"),
            id("m_a"),
            Some("bottom".into()),
            id("m_b"),
            Some("top".into()),
        );
        assert!(g.add_edge(good));
        assert_eq!(g.outgoing(id("m_a")).as_slice(), &[id("m_e1")]);
        assert_eq!(g.incoming(id("m_b")).as_slice(), &[id("m_e1")]);
        assert_eq!(g.successors(id("m_a")).as_slice(), &[id("m_b")]);
    }

    #[test]
    fn freehand_points_are_append_only_until_frozen() {
        let mut g = DiagramGraph::new();
        let e = Edge::freehand(id("m_s"), id("m_s_src"), id("m_s_dst"), Point::new(1.0, 1.0));
        assert!(g.add_edge(e));
        assert!(g.append_point(id("m_s"), Point::new(2.0, 2.0)));
        assert!(g.freeze_edge(id("m_s")));
        assert!(!g.freeze_edge(id("m_s")));
        assert!(!g.append_point(id("m_s"), Point::new(3.0, 3.0)));
        assert_eq!(
            g.edge(id("m_s")).map(|e| e.points.clone()),
            Some(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)])
        );
    }

    #[test]
    fn empty_freehand_is_rejected() {
        let mut g = DiagramGraph::new();
        let mut e = Edge::freehand(id("m_empty"), id("m_x"), id("m_y"), Point::default());
        e.points.clear();
        assert!(!g.add_edge(e));
    }

    #[test]
    fn structural_edges_do_not_accept_points() {
        let mut g = two_nodes();
        g.add_edge(Edge::structural(id("m_e2"), id("m_a"), None, id("m_b"), None));
        assert!(!g.append_point(id("m_e2"), Point::new(9.0, 9.0)));
    }

    #[test]
    fn removing_a_node_leaves_dangling_edges() {
        let mut g = two_nodes();
        g.add_edge(Edge::structural(id("m_e3"), id("m_a"), None, id("m_b"), None));
        assert!(g.remove_node(id("m_b")).is_some());
        assert_eq!(g.dangling_edges(), vec![id("m_e3")]);
        assert!(g.outgoing(id("m_a")).is_empty());
        assert!(g.remove_edge(id("m_e3")).is_some());
        assert!(g.dangling_edges().is_empty());
    }

    #[test]
    fn re_adding_a_removed_node_restores_its_edges() {
        let mut g = two_nodes();
        g.add_edge(Edge::structural(id("m_e4"), id("m_a"), None, id("m_b"), None));
        g.remove_node(id("m_b"));
        assert!(g.outgoing(id("m_a")).is_empty());

        assert!(g.add_node(Node::new(id("m_b"), Archetype::Circle, Point::new(0.0, 300.0))));
        assert!(g.dangling_edges().is_empty());
        assert_eq!(g.outgoing(id("m_a")).as_slice(), &[id("m_e4")]);
        assert_eq!(g.incoming(id("m_b")).as_slice(), &[id("m_e4")]);
        assert_eq!(g.successors(id("m_a")).as_slice(), &[id("m_b")]);

        // Removing the edge afterwards drops the restored link too.
        assert!(g.remove_edge(id("m_e4")).is_some());
        assert!(g.incoming(id("m_b")).is_empty());
    }

    #[test]
    fn edges_serialize_with_camel_case_fields() {
        let e = Edge::structural(
            id("m_wire"),
            id("m_a"),
            Some("bottom".into()),
            id("m_b"),
            Some("top".into()),
        );
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["id"], "m_wire");
        assert_eq!(json["sourceHandle"], "bottom");
        assert_eq!(json["markerEnd"], "arrowClosed");
        assert_eq!(json["route"], "step");
        assert_eq!(json["kind"], "structural");

        let back: Edge = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn nodes_iterate_in_insertion_order_after_removal() {
        let mut g = two_nodes();
        g.remove_node(id("m_a"));
        g.add_node(Node::new(id("m_c"), Archetype::Rounded, Point::default()));
        let order: Vec<&str> = g.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["m_b", "m_c"]);
    }

    #[test]
    fn set_label_and_position_resolve_by_id() {
        let mut g = two_nodes();
        assert!(g.set_label(id("m_a"), "Start"));
        assert!(g.set_position(id("m_a"), Point::new(7.0, 8.0)));
        assert!(!g.set_label(id("m_nope"), "x"));
        let n = g.node(id("m_a")).unwrap();
        assert_eq!(n.label, "Start");
        assert_eq!(n.position, Point::new(7.0, 8.0));
    }
}
