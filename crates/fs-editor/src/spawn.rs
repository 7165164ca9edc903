//! Palette drag-and-drop: spawns a node where the item was dropped.

use crate::sync::GraphMutation;
use fs_core::ElementId;
use fs_core::model::{DiagramGraph, Node, Point};
use fs_core::shapes::Archetype;
use fs_core::viewport::CanvasFrame;

/// Drop effect advertised while a palette item hovers the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Move,
}

impl DropEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
        }
    }
}

pub struct DragSpawnController {
    prefix: String,
}

impl Default for DragSpawnController {
    fn default() -> Self {
        Self::new("node")
    }
}

impl DragSpawnController {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn drag_over(&self) -> DropEffect {
        DropEffect::Move
    }

    /// Mutations for a drop at client position `at`.
    ///
    /// Empty when the canvas is not initialized yet or the payload does not
    /// name a known archetype.
    pub fn drop(
        &self,
        payload: Option<&str>,
        at: Point,
        frame: Option<&CanvasFrame>,
        graph: &DiagramGraph,
    ) -> Vec<GraphMutation> {
        let Some(frame) = frame else {
            log::debug!("drop before canvas init ignored");
            return vec![];
        };
        let Some(archetype) = payload.and_then(Archetype::from_tag) else {
            log::debug!("drop with unknown payload {payload:?} ignored");
            return vec![];
        };

        let position = frame.to_canvas(at);
        let id = ElementId::fresh(&self.prefix, |id| graph.contains(id));
        log::debug!(
            "spawn {} {id} at ({}, {})",
            archetype.tag(),
            position.x,
            position.y
        );
        vec![GraphMutation::AddNode {
            node: Box::new(Node::new(id, archetype, position)),
        }]
    }
}
