//! Pen tool: freehand strokes captured as polyline edges.
//!
//! | State | Pointer down | Pointer move | Pointer up |
//! |-------|--------------|--------------|------------|
//! | **Idle** (pen off) | pass through | pass through | pass through |
//! | **Idle** (pen on) | start stroke → Capturing | pass through | pass through |
//! | **Capturing** | restart stroke | append point | freeze → Idle |
//!
//! While the pen is on, pan-on-drag is disabled and every pointer event the
//! tool consumes asks the host to stop propagation, so drawing and panning
//! never happen together.

use crate::input::InputEvent;
use crate::sync::GraphMutation;
use fs_core::ElementId;
use fs_core::model::{DiagramGraph, Edge, Point};
use fs_core::viewport::CanvasFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenState {
    Idle,
    /// A stroke is open; points go to this edge.
    Capturing { edge: ElementId },
}

/// What the pen tool wants done with an event.
#[derive(Debug, Default, PartialEq)]
pub struct PenResponse {
    pub mutations: Vec<GraphMutation>,
    /// The host must not let the event reach its pan handler.
    pub stop_propagation: bool,
}

impl PenResponse {
    fn pass() -> Self {
        Self::default()
    }

    fn consumed(mutations: Vec<GraphMutation>) -> Self {
        Self {
            mutations,
            stop_propagation: true,
        }
    }
}

pub struct PenTool {
    active: bool,
    state: PenState,
    prefix: String,
}

impl Default for PenTool {
    fn default() -> Self {
        Self::new("drawing")
    }
}

impl PenTool {
    pub fn new(prefix: &str) -> Self {
        Self {
            active: false,
            state: PenState::Idle,
            prefix: prefix.to_string(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> PenState {
        self.state
    }

    /// Whether the host should pan on background drag.
    pub fn pan_enabled(&self) -> bool {
        !self.active
    }

    /// Turn the pen on or off. Turning it off mid-stroke keeps the stroke
    /// as captured so far and freezes it.
    pub fn set_active(&mut self, active: bool) -> Vec<GraphMutation> {
        self.active = active;
        if active {
            return vec![];
        }
        self.finish()
    }

    pub fn toggle(&mut self) -> Vec<GraphMutation> {
        self.set_active(!self.active)
    }

    /// Handle a pointer event. `frame` is `None` until the canvas is ready.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        frame: Option<&CanvasFrame>,
        graph: &DiagramGraph,
    ) -> PenResponse {
        if !self.active {
            return PenResponse::pass();
        }
        let Some(frame) = frame else {
            log::debug!("pen event before canvas init ignored");
            return PenResponse::pass();
        };

        match *event {
            InputEvent::PointerDown { x, y } => {
                // A down while capturing means we never saw the matching up
                // (released outside the canvas). Close that stroke first.
                let mut mutations = self.finish();
                let point = frame.to_canvas(Point::new(x, y));
                mutations.push(self.begin(point, graph));
                PenResponse::consumed(mutations)
            }
            InputEvent::PointerMove { x, y } => match self.state {
                PenState::Capturing { edge } => {
                    let point = frame.to_canvas(Point::new(x, y));
                    PenResponse::consumed(vec![GraphMutation::AppendPoint { id: edge, point }])
                }
                PenState::Idle => PenResponse::pass(),
            },
            InputEvent::PointerUp { .. } => match self.state {
                PenState::Capturing { .. } => PenResponse::consumed(self.finish()),
                PenState::Idle => {
                    log::debug!("pointer up without an open stroke");
                    PenResponse::pass()
                }
            },
            _ => PenResponse::pass(),
        }
    }

    fn begin(&mut self, point: Point, graph: &DiagramGraph) -> GraphMutation {
        let id = ElementId::fresh(&self.prefix, |id| graph.contains(id));
        let source = ElementId::intern(&format!("{id}-source"));
        let target = ElementId::intern(&format!("{id}-target"));
        self.state = PenState::Capturing { edge: id };
        log::debug!("stroke {id} started at ({}, {})", point.x, point.y);
        GraphMutation::AddEdge {
            edge: Box::new(Edge::freehand(id, source, target, point)),
        }
    }

    /// Close the open stroke, if any.
    fn finish(&mut self) -> Vec<GraphMutation> {
        match std::mem::replace(&mut self.state, PenState::Idle) {
            PenState::Capturing { edge } => {
                log::debug!("stroke {edge} frozen");
                vec![GraphMutation::FreezeEdge { id: edge }]
            }
            PenState::Idle => vec![],
        }
    }
}
