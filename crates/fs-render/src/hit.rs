//! Hit testing: canvas point → node, handle, or edge.
//!
//! Walks nodes and edges front-to-back (reverse insertion order). Freehand
//! strokes are never hit: their endpoints are placeholders, so they cannot
//! take part in selection or connection gestures.

use crate::path::{edge_path, kp, node_outline};
use fs_core::ElementId;
use fs_core::model::{DiagramGraph, Point};
use fs_core::shapes::{HandleSpec, handle_anchor};
use kurbo::{ParamCurveNearest, Shape};

/// Pick radius around a handle anchor, in canvas units.
pub const HANDLE_RADIUS: f32 = 6.0;

/// Topmost node whose outline contains `p`.
pub fn hit_test(graph: &DiagramGraph, p: Point) -> Option<ElementId> {
    let pt = kp(p);
    let nodes: Vec<_> = graph.nodes().collect();
    nodes
        .iter()
        .rev()
        .find(|n| node_outline(n).contains(pt))
        .map(|n| n.id)
}

/// Topmost handle within `HANDLE_RADIUS` of `p`.
pub fn hit_test_handle(graph: &DiagramGraph, p: Point) -> Option<(ElementId, &'static HandleSpec)> {
    let r2 = HANDLE_RADIUS * HANDLE_RADIUS;
    let nodes: Vec<_> = graph.nodes().collect();
    for node in nodes.iter().rev() {
        for spec in node.archetype.handles() {
            let a = handle_anchor(node.archetype, spec.side, node.position);
            let (dx, dy) = (a.x - p.x, a.y - p.y);
            if dx * dx + dy * dy <= r2 {
                return Some((node.id, spec));
            }
        }
    }
    None
}

/// Topmost interactive edge passing within `tolerance` of `p`.
pub fn hit_test_edge(graph: &DiagramGraph, p: Point, tolerance: f32) -> Option<ElementId> {
    let pt = kp(p);
    let tol2 = (tolerance as f64) * (tolerance as f64);
    let edges: Vec<_> = graph.edges().filter(|e| e.interactive).collect();
    edges
        .iter()
        .rev()
        .find(|e| {
            edge_path(e, graph).is_some_and(|path| {
                path.segments()
                    .any(|seg| seg.nearest(pt, 1e-3).distance_sq <= tol2)
            })
        })
        .map(|e| e.id)
}
