//! The editor facade: routes host events to the controllers and applies the
//! resulting mutations.
//!
//! Hosts (the wasm bridge, tests, a native shell) talk to `DiagramEditor`
//! only. It owns the sync engine, the per-node label editors, and the pen
//! tool, and reports back whether a re-render is needed and whether the
//! event must be kept away from the host's pan handler.

use crate::config::EditorConfig;
use crate::connect::{Connection, ConnectionController};
use crate::input::InputEvent;
use crate::label::{LabelEditors, LabelEvent};
use crate::snapshot::DiagramSnapshot;
use crate::spawn::{DragSpawnController, DropEffect};
use crate::sync::{GraphMutation, SyncEngine};
use crate::tools::PenTool;
use fs_core::ElementId;
use fs_core::model::{DiagramGraph, Point};
use fs_core::viewport::{CanvasFrame, Viewport};

/// Result of dispatching one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Store or edit state changed; the host should re-render.
    pub changed: bool,
    /// The host must stop the event from reaching its pan handler.
    pub stop_propagation: bool,
}

pub struct DiagramEditor {
    engine: SyncEngine,
    labels: LabelEditors,
    pen: PenTool,
    connector: ConnectionController,
    spawner: DragSpawnController,
}

impl Default for DiagramEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramEditor {
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default())
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        Self {
            engine: SyncEngine::new(),
            labels: LabelEditors::new(),
            pen: PenTool::new(&config.stroke_prefix),
            connector: ConnectionController::new(
                &config.edge_prefix,
                config.connection_route,
                config.connection_marker,
            ),
            spawner: DragSpawnController::new(&config.node_prefix),
        }
    }

    pub fn graph(&self) -> &DiagramGraph {
        &self.engine.graph
    }

    // ─── Canvas lifecycle ────────────────────────────────────────────────

    /// The host finished initializing the canvas.
    pub fn init(&mut self, frame: CanvasFrame) {
        self.engine.init_frame(frame);
    }

    pub fn is_ready(&self) -> bool {
        self.engine.frame().is_some()
    }

    pub fn frame(&self) -> Option<&CanvasFrame> {
        self.engine.frame()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        self.engine.set_viewport(viewport)
    }

    pub fn set_origin(&mut self, origin_x: f32, origin_y: f32) -> bool {
        self.engine.set_origin(origin_x, origin_y)
    }

    // ─── Pen tool ────────────────────────────────────────────────────────

    pub fn pen_active(&self) -> bool {
        self.pen.is_active()
    }

    /// Returns `true` if an open stroke was frozen.
    pub fn set_pen_active(&mut self, active: bool) -> bool {
        let mutations = self.pen.set_active(active);
        self.engine.apply_all(mutations)
    }

    /// Flip the pen. Returns `true` if an open stroke was frozen; read
    /// [`DiagramEditor::pen_active`] for the new state.
    pub fn toggle_pen(&mut self) -> bool {
        let mutations = self.pen.toggle();
        self.engine.apply_all(mutations)
    }

    pub fn pen(&self) -> &PenTool {
        &self.pen
    }

    /// Whether background drag should pan the canvas.
    pub fn pan_on_drag(&self) -> bool {
        self.pen.pan_enabled()
    }

    // ─── Event dispatch ──────────────────────────────────────────────────

    pub fn dispatch(&mut self, event: &InputEvent) -> Dispatch {
        match event {
            InputEvent::PointerDown { .. }
            | InputEvent::PointerMove { .. }
            | InputEvent::PointerUp { .. } => {
                let response = self.pen.handle(event, self.engine.frame(), &self.engine.graph);
                Dispatch {
                    changed: self.engine.apply_all(response.mutations),
                    stop_propagation: response.stop_propagation,
                }
            }
            InputEvent::DragOver => Dispatch::default(),
            InputEvent::Drop { payload, x, y } => {
                let mutations = self.spawner.drop(
                    payload.as_deref(),
                    Point::new(*x, *y),
                    self.engine.frame(),
                    &self.engine.graph,
                );
                Dispatch {
                    changed: self.engine.apply_all(mutations),
                    stop_propagation: false,
                }
            }
            InputEvent::DoubleClick { node } => {
                let Some(current) = self.engine.graph.node(*node).map(|n| n.label.clone()) else {
                    return Dispatch::default();
                };
                self.label_event(*node, LabelEvent::DoubleClick { current: &current })
            }
            InputEvent::TextInput { node, text } => self.label_event(*node, LabelEvent::Input(text)),
            InputEvent::Blur { node } => self.label_event(*node, LabelEvent::Blur),
            InputEvent::Key { node, key } => self.label_event(*node, LabelEvent::Key(key)),
        }
    }

    fn label_event(&mut self, node: ElementId, event: LabelEvent<'_>) -> Dispatch {
        if !self.engine.graph.contains_node(node) {
            log::debug!("label event for unknown node {node}");
            return Dispatch::default();
        }
        Dispatch {
            changed: self.labels.handle(node, event, &mut self.engine),
            stop_propagation: false,
        }
    }

    /// Drop effect to advertise during drag-over.
    pub fn drag_over(&self) -> DropEffect {
        self.spawner.drag_over()
    }

    // ─── Collaborator gestures ───────────────────────────────────────────

    /// A drag-to-connect gesture ended over a handle.
    pub fn connect(&mut self, connection: &Connection) -> bool {
        let mutations = self.connector.connect(connection, &self.engine.graph);
        self.engine.apply_all(mutations)
    }

    /// The host finished dragging a node.
    pub fn move_node(&mut self, id: ElementId, position: Point) -> bool {
        self.engine.apply_mutation(GraphMutation::MoveNode { id, position })
    }

    /// Set a label from outside the in-place editor. The node's edit buffer
    /// follows, including an open one.
    pub fn set_label(&mut self, id: ElementId, label: &str) -> bool {
        let changed = self.engine.apply_mutation(GraphMutation::SetLabel {
            id,
            label: label.to_string(),
        });
        if changed {
            self.labels.handle(id, LabelEvent::External(label), &mut self.engine);
        }
        changed
    }

    /// Generic delete of a node. Incident edges are left to the host.
    pub fn delete_node(&mut self, id: ElementId) -> bool {
        self.labels.forget(id);
        self.engine.apply_mutation(GraphMutation::RemoveNode { id })
    }

    /// Generic delete of an edge. Non-deletable edges (pen strokes) stay.
    pub fn delete_edge(&mut self, id: ElementId) -> bool {
        match self.engine.graph.edge(id) {
            Some(edge) if edge.deletable => {
                self.engine.apply_mutation(GraphMutation::RemoveEdge { id })
            }
            Some(_) => {
                log::debug!("edge {id} is not deletable");
                false
            }
            None => false,
        }
    }

    /// Remove structural edges whose endpoints are gone.
    pub fn prune_dangling(&mut self) -> usize {
        let dangling = self.engine.graph.dangling_edges();
        let count = dangling.len();
        self.engine
            .apply_all(dangling.into_iter().map(|id| GraphMutation::RemoveEdge { id }));
        count
    }

    // ─── Read side ───────────────────────────────────────────────────────

    pub fn label_buffer(&self, id: ElementId) -> Option<&str> {
        self.labels.buffer(id)
    }

    pub fn is_editing(&self, id: ElementId) -> bool {
        self.labels.is_editing(id)
    }

    pub fn snapshot(&self) -> DiagramSnapshot {
        let viewport = self
            .engine
            .frame()
            .map(|f| f.viewport)
            .unwrap_or_default();
        DiagramSnapshot::capture(&self.engine.graph, &self.labels, viewport, self.pan_on_drag())
    }
}
