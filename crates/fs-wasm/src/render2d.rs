//! Canvas2D renderer.
//!
//! Draws the diagram to an HTML `<canvas>` via `CanvasRenderingContext2d`,
//! reusing the geometry from `fs-render` so the webview and native painters
//! agree on every path.

use fs_core::model::{DiagramGraph, EdgeKind};
use fs_core::shapes::Archetype;
use fs_editor::DiagramSnapshot;
use fs_render::path::{arrowhead, edge_path, node_outline, node_rect};
use kurbo::{BezPath, PathEl};
use web_sys::CanvasRenderingContext2d;

/// Theme-dependent colors for the canvas renderer.
pub struct CanvasTheme {
    pub bg: &'static str,
    pub grid: &'static str,
    pub label: &'static str,
    pub connection: &'static str,
    pub stroke: &'static str,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            bg: "#FFFFFF",
            grid: "rgba(0, 0, 0, 0.15)",
            label: "#1C1C1E",
            connection: "#B1B1B7",
            stroke: "#333333",
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: "#1C1C1E",
            grid: "rgba(255, 255, 255, 0.08)",
            label: "#1C1C1E",
            connection: "#8E8E93",
            stroke: "#E5E5EA",
        }
    }
}

fn shape_css(archetype: Archetype) -> (&'static str, &'static str) {
    match archetype {
        Archetype::Rectangle => ("#FFFFFF", "#60A5FA"),
        Archetype::Circle => ("#DCFCE7", "#4ADE80"),
        Archetype::Diamond => ("#F3E8FF", "#C084FC"),
        Archetype::Rounded => ("#FFEDD5", "#FB923C"),
    }
}

/// Render one frame.
pub fn render_diagram(
    ctx: &CanvasRenderingContext2d,
    graph: &DiagramGraph,
    snapshot: &DiagramSnapshot,
    canvas_width: f64,
    canvas_height: f64,
    theme: &CanvasTheme,
) {
    let vp = snapshot.viewport;

    let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    ctx.set_fill_style_str(theme.bg);
    ctx.fill_rect(0.0, 0.0, canvas_width, canvas_height);
    draw_grid(ctx, canvas_width, canvas_height, vp.pan_x as f64, vp.pan_y as f64, vp.zoom as f64, theme);

    let zoom = vp.zoom as f64;
    let _ = ctx.set_transform(zoom, 0.0, 0.0, zoom, vp.pan_x as f64, vp.pan_y as f64);

    for edge in &snapshot.edges {
        let Some(path) = edge_path(edge, graph) else {
            continue;
        };
        let (color, width) = match edge.kind {
            EdgeKind::Structural => (theme.connection, 1.0),
            EdgeKind::Freehand => (theme.stroke, 2.0),
        };
        ctx.save();
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(width);
        ctx.set_line_join("round");
        ctx.set_line_cap("round");
        trace_path(ctx, &path);
        ctx.stroke();
        if edge.marker_end.is_some()
            && let Some(head) = arrowhead(&path)
        {
            ctx.set_fill_style_str(color);
            trace_path(ctx, &head);
            ctx.fill();
        }
        ctx.restore();
    }

    for view in &snapshot.nodes {
        let Some(node) = graph.node(view.id) else {
            continue;
        };
        let (fill, border) = shape_css(node.archetype);
        ctx.save();
        trace_path(ctx, &node_outline(node));
        ctx.set_fill_style_str(fill);
        ctx.fill();
        ctx.set_stroke_style_str(border);
        ctx.set_line_width(2.0);
        ctx.stroke();

        let b = node_rect(node);
        let text = view.editing.as_deref().unwrap_or(&view.label);
        ctx.set_font("500 13px Inter, sans-serif");
        ctx.set_fill_style_str(theme.label);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(text, b.center().x, b.center().y);
        if view.editing.is_some() {
            // Caret-ish underline so the edit state is visible on canvas.
            ctx.set_stroke_style_str(border);
            ctx.set_line_width(1.0);
            ctx.begin_path();
            ctx.move_to(b.x0 + 8.0, b.center().y + 9.0);
            ctx.line_to(b.x1 - 8.0, b.center().y + 9.0);
            ctx.stroke();
        }
        ctx.restore();
    }

    let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
}

/// Replay a kurbo path on the context as a fresh sub-path list.
fn trace_path(ctx: &CanvasRenderingContext2d, path: &BezPath) {
    ctx.begin_path();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => ctx.move_to(p.x, p.y),
            PathEl::LineTo(p) => ctx.line_to(p.x, p.y),
            PathEl::QuadTo(c, p) => ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
            PathEl::CurveTo(c1, c2, p) => ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
            PathEl::ClosePath => ctx.close_path(),
        }
    }
}

/// Dot grid that follows pan and zoom.
fn draw_grid(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    pan_x: f64,
    pan_y: f64,
    zoom: f64,
    theme: &CanvasTheme,
) {
    let spacing = 20.0 * zoom;
    if spacing < 4.0 {
        return;
    }
    ctx.set_fill_style_str(theme.grid);
    let mut x = pan_x.rem_euclid(spacing);
    while x < width {
        let mut y = pan_y.rem_euclid(spacing);
        while y < height {
            ctx.fill_rect(x, y, 1.0, 1.0);
            y += spacing;
        }
        x += spacing;
    }
}
