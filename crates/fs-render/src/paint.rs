//! Diagram → Vello drawing commands.
//!
//! Draws structural edges, freehand strokes, and nodes (in that order, so
//! nodes sit above the edges that attach to them) with the viewport applied
//! as a single transform.

use crate::path::{arrowhead, edge_path, node_outline};
use fs_core::model::{DiagramGraph, Edge, EdgeKind, Node};
use fs_core::shapes::Archetype;
use fs_core::viewport::Viewport;
use kurbo::{Affine, Cap, Join, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Fill and border colors for one archetype.
#[derive(Debug, Clone, Copy)]
pub struct ShapeColors {
    pub fill: Color,
    pub border: Color,
}

pub fn shape_colors(archetype: Archetype) -> ShapeColors {
    match archetype {
        Archetype::Rectangle => ShapeColors {
            fill: Color::from_rgb8(0xff, 0xff, 0xff),
            border: Color::from_rgb8(0x60, 0xa5, 0xfa),
        },
        Archetype::Circle => ShapeColors {
            fill: Color::from_rgb8(0xdc, 0xfc, 0xe7),
            border: Color::from_rgb8(0x4a, 0xde, 0x80),
        },
        Archetype::Diamond => ShapeColors {
            fill: Color::from_rgb8(0xf3, 0xe8, 0xff),
            border: Color::from_rgb8(0xc0, 0x84, 0xfc),
        },
        Archetype::Rounded => ShapeColors {
            fill: Color::from_rgb8(0xff, 0xed, 0xd5),
            border: Color::from_rgb8(0xfb, 0x92, 0x3c),
        },
    }
}

const CONNECTION_COLOR: Color = Color::from_rgb8(0xb1, 0xb1, 0xb7);
const STROKE_COLOR: Color = Color::from_rgb8(0x33, 0x33, 0x33);

/// Canvas → screen transform for a viewport.
pub fn viewport_transform(viewport: &Viewport) -> Affine {
    Affine::translate((viewport.pan_x as f64, viewport.pan_y as f64))
        * Affine::scale(viewport.zoom as f64)
}

/// Paint the whole diagram. Call once per frame with a freshly-reset `Scene`.
pub fn paint_diagram(scene: &mut Scene, graph: &DiagramGraph, viewport: &Viewport) {
    let xf = viewport_transform(viewport);
    for edge in graph.edges() {
        paint_edge(scene, xf, edge, graph);
    }
    for node in graph.nodes() {
        paint_node(scene, xf, node);
    }
}

fn paint_edge(scene: &mut Scene, xf: Affine, edge: &Edge, graph: &DiagramGraph) {
    let Some(path) = edge_path(edge, graph) else {
        log::trace!("edge {} has no drawable geometry", edge.id);
        return;
    };
    let (color, width) = match edge.kind {
        EdgeKind::Structural => (CONNECTION_COLOR, 1.0),
        EdgeKind::Freehand => (STROKE_COLOR, 2.0),
    };
    let stroke = Stroke::new(width)
        .with_join(Join::Round)
        .with_caps(Cap::Round);
    scene.stroke(&stroke, xf, color, None, &path);

    if edge.marker_end.is_some()
        && let Some(head) = arrowhead(&path)
    {
        scene.fill(Fill::NonZero, xf, color, None, &head);
    }
}

fn paint_node(scene: &mut Scene, xf: Affine, node: &Node) {
    let outline = node_outline(node);
    let colors = shape_colors(node.archetype);
    scene.fill(Fill::NonZero, xf, colors.fill, None, &outline);
    scene.stroke(&Stroke::new(2.0), xf, colors.border, None, &outline);
    // Label glyphs need a font context; hosts draw text on top.
}
