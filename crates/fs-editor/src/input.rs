//! Input abstraction layer.
//!
//! Normalizes the host's pointer, drag-and-drop, and in-place editor events
//! into a single `InputEvent` enum consumed by the controllers. Pointer and
//! drop coordinates are client (page) coordinates; the editor maps them to
//! canvas space through its `CanvasFrame`.

use fs_core::ElementId;
use fs_core::model::Point;

/// A normalized input event from the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed on the canvas background.
    PointerDown { x: f32, y: f32 },

    /// Pointer moved over the canvas.
    PointerMove { x: f32, y: f32 },

    /// Pointer released.
    PointerUp { x: f32, y: f32 },

    /// A palette item is dragged over the canvas.
    DragOver,

    /// A palette item was dropped. `payload` is the archetype tag, if the
    /// drag carried one.
    Drop {
        payload: Option<String>,
        x: f32,
        y: f32,
    },

    /// Double-click on a node's body.
    DoubleClick { node: ElementId },

    /// The in-place editor's text changed.
    TextInput { node: ElementId, text: String },

    /// The in-place editor lost focus.
    Blur { node: ElementId },

    /// Key pressed inside the in-place editor.
    Key { node: ElementId, key: String },
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown { x, y }
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn drop(payload: Option<&str>, x: f32, y: f32) -> Self {
        Self::Drop {
            payload: payload.map(str::to_string),
            x,
            y,
        }
    }

    /// Client position if this is a pointer or drop event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::Drop { x, y, .. } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }
}
