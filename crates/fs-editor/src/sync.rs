//! Mutation engine: the single place the graph store is written.
//!
//! Controllers never touch `DiagramGraph` directly. They return
//! `GraphMutation` values and the engine applies them in order, resolving
//! every target by id at apply time. Handlers run to completion one event at
//! a time, so a mutation always sees the store as left by the previous one.

use crate::label::LabelCommitSink;
use fs_core::ElementId;
use fs_core::model::{DiagramGraph, Edge, Node, Point};
use fs_core::viewport::{CanvasFrame, Viewport};

/// A single change to the graph store.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphMutation {
    AddNode { node: Box<Node> },
    MoveNode { id: ElementId, position: Point },
    SetLabel { id: ElementId, label: String },
    RemoveNode { id: ElementId },
    AddEdge { edge: Box<Edge> },
    AppendPoint { id: ElementId, point: Point },
    FreezeEdge { id: ElementId },
    RemoveEdge { id: ElementId },
}

/// Holds the authoritative graph and the canvas frame reported by the host.
pub struct SyncEngine {
    /// The diagram (single source of truth).
    pub graph: DiagramGraph,

    /// `None` until the host reports that the canvas is initialized.
    frame: Option<CanvasFrame>,
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncEngine {
    /// An empty diagram on an uninitialized canvas.
    pub fn new() -> Self {
        Self {
            graph: DiagramGraph::new(),
            frame: None,
        }
    }

    /// Mark the canvas ready with its origin and initial viewport.
    pub fn init_frame(&mut self, mut frame: CanvasFrame) {
        frame.viewport = frame.viewport.clamped();
        log::debug!("canvas ready: {frame:?}");
        self.frame = Some(frame);
    }

    /// The canvas frame, once the host has initialized it.
    pub fn frame(&self) -> Option<&CanvasFrame> {
        self.frame.as_ref()
    }

    /// Pan/zoom update from the host, zoom clamped. Ignored before
    /// initialization.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        match self.frame.as_mut() {
            Some(frame) => {
                frame.viewport = viewport.clamped();
                true
            }
            None => {
                log::debug!("viewport update before canvas init ignored");
                false
            }
        }
    }

    /// Canvas element moved on the page (layout change, scroll).
    pub fn set_origin(&mut self, origin_x: f32, origin_y: f32) -> bool {
        match self.frame.as_mut() {
            Some(frame) => {
                frame.origin_x = origin_x;
                frame.origin_y = origin_y;
                true
            }
            None => false,
        }
    }

    /// Apply one mutation. Returns `true` if the store changed.
    pub fn apply_mutation(&mut self, mutation: GraphMutation) -> bool {
        let changed = match mutation {
            GraphMutation::AddNode { node } => self.graph.add_node(*node),
            GraphMutation::MoveNode { id, position } => self.graph.set_position(id, position),
            GraphMutation::SetLabel { id, label } => self.graph.set_label(id, &label),
            GraphMutation::RemoveNode { id } => self.graph.remove_node(id).is_some(),
            GraphMutation::AddEdge { edge } => self.graph.add_edge(*edge),
            GraphMutation::AppendPoint { id, point } => {
                log::trace!("stroke {id} += ({}, {})", point.x, point.y);
                self.graph.append_point(id, point)
            }
            GraphMutation::FreezeEdge { id } => self.graph.freeze_edge(id),
            GraphMutation::RemoveEdge { id } => self.graph.remove_edge(id).is_some(),
        };
        if !changed {
            log::debug!("mutation had no effect");
        }
        changed
    }

    /// Apply mutations in order. Returns `true` if any changed the store.
    pub fn apply_all(&mut self, mutations: impl IntoIterator<Item = GraphMutation>) -> bool {
        mutations
            .into_iter()
            .fold(false, |changed, m| self.apply_mutation(m) || changed)
    }
}

impl LabelCommitSink for SyncEngine {
    fn label_committed(&mut self, id: ElementId, label: &str) {
        self.apply_mutation(GraphMutation::SetLabel {
            id,
            label: label.to_string(),
        });
    }
}
