//! WASM bridge for FlowSketch: exposes the diagram editor to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page forwards DOM
//! events here with client coordinates and reads back JSON snapshots.

mod render2d;

use fs_core::ElementId;
use fs_core::model::Point;
use fs_core::viewport::{CanvasFrame, Viewport};
use fs_editor::{Connection, DiagramEditor, Dispatch, EditorConfig, InputEvent};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// Edge pick tolerance in canvas units.
const EDGE_PICK_TOLERANCE: f32 = 4.0;

/// The main WASM-facing canvas controller.
///
/// All interaction from the host page goes through this struct.
#[wasm_bindgen]
pub struct DiagramCanvas {
    editor: DiagramEditor,
    width: f64,
    height: f64,
    /// Dark mode flag: `false` = light (default), `true` = dark.
    dark_mode: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DispatchReply {
    changed: bool,
    stop_propagation: bool,
}

impl From<Dispatch> for DispatchReply {
    fn from(d: Dispatch) -> Self {
        Self {
            changed: d.changed,
            stop_propagation: d.stop_propagation,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HandleHit {
    node: String,
    handle: &'static str,
    role: &'static str,
}

#[wasm_bindgen]
impl DiagramCanvas {
    /// Create a controller. `config_json` may be empty; an invalid config is
    /// logged and replaced with defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config_json: &str) -> Self {
        console_error_panic_hook_setup();

        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).unwrap_or_else(|e| {
                log::warn!("ignoring editor config: {e}");
                EditorConfig::default()
            })
        };

        Self {
            editor: DiagramEditor::with_config(&config),
            width,
            height,
            dark_mode: false,
        }
    }

    /// Supply the canvas frame once the canvas element is mounted. Until
    /// this is called, drops and pen strokes are ignored.
    pub fn init(&mut self, origin_x: f32, origin_y: f32, pan_x: f32, pan_y: f32, zoom: f32) {
        self.editor
            .init(CanvasFrame::new(origin_x, origin_y, Viewport::new(pan_x, pan_y, zoom)));
    }

    pub fn is_ready(&self) -> bool {
        self.editor.is_ready()
    }

    pub fn set_viewport(&mut self, pan_x: f32, pan_y: f32, zoom: f32) -> bool {
        self.editor.set_viewport(Viewport::new(pan_x, pan_y, zoom))
    }

    /// The canvas element moved within the page (scroll, layout).
    pub fn set_origin(&mut self, origin_x: f32, origin_y: f32) -> bool {
        self.editor.set_origin(origin_x, origin_y)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    // ─── Pen ─────────────────────────────────────────────────────────────

    /// Returns `true` if turning the pen off closed an open stroke.
    pub fn set_pen_active(&mut self, active: bool) -> bool {
        self.editor.set_pen_active(active)
    }

    /// Flip the pen toggle. Returns the new state, for the toolbar button.
    pub fn toggle_pen(&mut self) -> bool {
        self.editor.toggle_pen();
        self.editor.pen_active()
    }

    pub fn pen_active(&self) -> bool {
        self.editor.pen_active()
    }

    /// Whether a background drag should pan. `false` while the pen is on.
    pub fn pan_on_drag(&self) -> bool {
        self.editor.pan_on_drag()
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Returns JSON `{"changed":bool,"stopPropagation":bool}`.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32) -> String {
        self.dispatch_json(&InputEvent::pointer_down(x, y))
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> String {
        self.dispatch_json(&InputEvent::pointer_move(x, y))
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32) -> String {
        self.dispatch_json(&InputEvent::pointer_up(x, y))
    }

    // ─── Drag-and-drop ───────────────────────────────────────────────────

    /// Drop effect for `dataTransfer.dropEffect`.
    pub fn handle_drag_over(&self) -> String {
        self.editor.drag_over().as_str().to_string()
    }

    /// Drop a palette item. An empty payload means none was attached.
    pub fn handle_drop(&mut self, payload: &str, x: f32, y: f32) -> bool {
        let payload = (!payload.is_empty()).then_some(payload);
        self.editor.dispatch(&InputEvent::drop(payload, x, y)).changed
    }

    // ─── Labels ──────────────────────────────────────────────────────────

    pub fn handle_double_click(&mut self, node_id: &str) -> bool {
        self.editor
            .dispatch(&InputEvent::DoubleClick { node: ElementId::intern(node_id) })
            .changed
    }

    pub fn handle_text_input(&mut self, node_id: &str, text: &str) -> bool {
        self.editor
            .dispatch(&InputEvent::TextInput {
                node: ElementId::intern(node_id),
                text: text.to_string(),
            })
            .changed
    }

    pub fn handle_blur(&mut self, node_id: &str) -> bool {
        self.editor
            .dispatch(&InputEvent::Blur { node: ElementId::intern(node_id) })
            .changed
    }

    pub fn handle_key(&mut self, node_id: &str, key: &str) -> bool {
        self.editor
            .dispatch(&InputEvent::Key {
                node: ElementId::intern(node_id),
                key: key.to_string(),
            })
            .changed
    }

    pub fn is_editing(&self, node_id: &str) -> bool {
        self.editor.is_editing(ElementId::intern(node_id))
    }

    /// Live text of a label editor, or empty when the node is not known.
    pub fn label_buffer(&self, node_id: &str) -> String {
        self.editor
            .label_buffer(ElementId::intern(node_id))
            .unwrap_or_default()
            .to_string()
    }

    /// Programmatic relabel (e.g. from a properties panel).
    pub fn set_label(&mut self, node_id: &str, label: &str) -> bool {
        self.editor.set_label(ElementId::intern(node_id), label)
    }

    // ─── Graph edits ─────────────────────────────────────────────────────

    pub fn connect(
        &mut self,
        source: &str,
        source_handle: &str,
        target: &str,
        target_handle: &str,
    ) -> bool {
        self.editor.connect(&Connection::new(
            ElementId::intern(source),
            source_handle,
            ElementId::intern(target),
            target_handle,
        ))
    }

    /// Move a node to a canvas-space position.
    pub fn move_node(&mut self, node_id: &str, x: f32, y: f32) -> bool {
        self.editor
            .move_node(ElementId::intern(node_id), Point::new(x, y))
    }

    pub fn delete_node(&mut self, node_id: &str) -> bool {
        self.editor.delete_node(ElementId::intern(node_id))
    }

    pub fn delete_edge(&mut self, edge_id: &str) -> bool {
        self.editor.delete_edge(ElementId::intern(edge_id))
    }

    /// Remove edges left behind by node deletion. Returns how many went.
    pub fn prune_dangling(&mut self) -> usize {
        self.editor.prune_dangling()
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Node under a client point, or empty string.
    pub fn hit_test(&self, x: f32, y: f32) -> String {
        self.canvas_point(x, y)
            .and_then(|p| fs_render::hit_test(self.editor.graph(), p))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Edge under a client point, or empty string. Freehand strokes never hit.
    pub fn hit_test_edge(&self, x: f32, y: f32) -> String {
        self.canvas_point(x, y)
            .and_then(|p| fs_render::hit_test_edge(self.editor.graph(), p, EDGE_PICK_TOLERANCE))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Handle under a client point as JSON `{"node","handle","role"}`, or `null`.
    pub fn hit_test_handle(&self, x: f32, y: f32) -> String {
        let hit = self
            .canvas_point(x, y)
            .and_then(|p| fs_render::hit_test_handle(self.editor.graph(), p))
            .map(|(node, spec)| HandleHit {
                node: node.as_str().to_string(),
                handle: spec.id,
                role: spec.role.as_str(),
            });
        serde_json::to_string(&hit).unwrap_or_else(|_| "null".to_string())
    }

    /// Full render snapshot as JSON.
    pub fn get_snapshot_json(&self) -> String {
        serde_json::to_string(&self.editor.snapshot()).unwrap_or_else(|e| {
            log::error!("snapshot serialization failed: {e}");
            "{}".to_string()
        })
    }

    /// Render the current frame to a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let theme = if self.dark_mode {
            render2d::CanvasTheme::dark()
        } else {
            render2d::CanvasTheme::light()
        };
        let snapshot = self.editor.snapshot();
        render2d::render_diagram(
            ctx,
            self.editor.graph(),
            &snapshot,
            self.width,
            self.height,
            &theme,
        );
    }
}

impl DiagramCanvas {
    fn dispatch_json(&mut self, event: &InputEvent) -> String {
        let reply = DispatchReply::from(self.editor.dispatch(event));
        serde_json::to_string(&reply).unwrap_or_else(|_| {
            r#"{"changed":false,"stopPropagation":false}"#.to_string()
        })
    }

    fn canvas_point(&self, x: f32, y: f32) -> Option<Point> {
        self.editor.frame().map(|f| f.to_canvas(Point::new(x, y)))
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("FlowSketch WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
