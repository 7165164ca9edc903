//! Diagram geometry → kurbo paths.
//!
//! Pure functions of the graph store: the same graph always yields the same
//! paths, so renderers can rebuild them every frame.

use fs_core::model::{DiagramGraph, Edge, EdgeKind, EdgeRoute, Node, Point};
use fs_core::shapes::{Archetype, HandleRole, handle_anchor};
use kurbo::{BezPath, Ellipse, ParamCurve, Rect, RoundedRect, Shape, Vec2};

/// Corner radius for the plain rectangle.
const RECT_RADIUS: f64 = 4.0;
/// Corner radius for the rounded rectangle.
const ROUNDED_RADIUS: f64 = 8.0;
/// Arrowhead length and half-width, in canvas units.
const ARROW_LEN: f64 = 10.0;
const ARROW_HALF_WIDTH: f64 = 5.0;
const TOLERANCE: f64 = 0.1;

pub(crate) fn kp(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x as f64, p.y as f64)
}

/// Box of a node in canvas space.
pub fn node_rect(node: &Node) -> Rect {
    let (w, h) = node.archetype.size();
    Rect::new(
        node.position.x as f64,
        node.position.y as f64,
        (node.position.x + w) as f64,
        (node.position.y + h) as f64,
    )
}

/// Outline of a node, by archetype.
pub fn node_outline(node: &Node) -> BezPath {
    let r = node_rect(node);
    match node.archetype {
        Archetype::Rectangle => RoundedRect::from_rect(r, RECT_RADIUS).to_path(TOLERANCE),
        Archetype::Rounded => RoundedRect::from_rect(r, ROUNDED_RADIUS).to_path(TOLERANCE),
        Archetype::Circle => Ellipse::from_rect(r).to_path(TOLERANCE),
        Archetype::Diamond => {
            let c = r.center();
            let mut p = BezPath::new();
            p.move_to((c.x, r.y0));
            p.line_to((r.x1, c.y));
            p.line_to((c.x, r.y1));
            p.line_to((r.x0, c.y));
            p.close_path();
            p
        }
    }
}

/// Canvas-space anchor for one end of an edge, if its node exists.
fn endpoint_anchor(
    graph: &DiagramGraph,
    node: fs_core::ElementId,
    handle: Option<&str>,
    role: HandleRole,
) -> Option<Point> {
    let node = graph.node(node)?;
    let spec = handle
        .and_then(|h| node.archetype.handle(h))
        .or_else(|| node.archetype.default_handle(role))?;
    Some(handle_anchor(node.archetype, spec.side, node.position))
}

/// Nominal source and target anchors. `None` when an endpoint does not
/// resolve (always the case for freehand placeholders).
pub fn edge_anchors(edge: &Edge, graph: &DiagramGraph) -> Option<(Point, Point)> {
    let from = endpoint_anchor(
        graph,
        edge.source,
        edge.source_handle.as_deref(),
        HandleRole::Source,
    )?;
    let to = endpoint_anchor(
        graph,
        edge.target,
        edge.target_handle.as_deref(),
        HandleRole::Target,
    )?;
    Some((from, to))
}

/// Polyline through every point, in order.
pub fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(kp(*first));
        for p in iter {
            path.line_to(kp(*p));
        }
    }
    path
}

fn straight(from: Point, to: Point) -> BezPath {
    polyline(&[from, to])
}

/// Flowchart elbow: down, across at the midpoint, down.
fn step(from: Point, to: Point) -> BezPath {
    let mid_y = (from.y + to.y) / 2.0;
    polyline(&[
        from,
        Point::new(from.x, mid_y),
        Point::new(to.x, mid_y),
        to,
    ])
}

/// Path for an edge, or `None` if there is nothing to draw.
///
/// Freehand edges with points render as a polyline. One without points falls
/// back to a straight line between its nominal anchors.
pub fn edge_path(edge: &Edge, graph: &DiagramGraph) -> Option<BezPath> {
    match edge.kind {
        EdgeKind::Freehand if !edge.points.is_empty() => Some(polyline(&edge.points)),
        EdgeKind::Freehand => edge_anchors(edge, graph).map(|(a, b)| straight(a, b)),
        EdgeKind::Structural => {
            let (a, b) = edge_anchors(edge, graph)?;
            Some(match edge.route {
                EdgeRoute::Straight => straight(a, b),
                EdgeRoute::Step => step(a, b),
            })
        }
    }
}

/// Closed arrowhead at the end of `path`, pointing along its last segment.
pub fn arrowhead(path: &BezPath) -> Option<BezPath> {
    let seg = path.segments().last()?;
    let tip = seg.end();
    let dir: Vec2 = tip - seg.start();
    let len = dir.hypot();
    if len < f64::EPSILON {
        return None;
    }
    let unit = dir / len;
    let normal = Vec2::new(-unit.y, unit.x);
    let base = tip - unit * ARROW_LEN;

    let mut head = BezPath::new();
    head.move_to(tip);
    head.line_to(base + normal * ARROW_HALF_WIDTH);
    head.line_to(base - normal * ARROW_HALF_WIDTH);
    head.close_path();
    Some(head)
}
