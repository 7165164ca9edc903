pub mod id;
pub mod model;
pub mod shapes;
pub mod viewport;

pub use id::ElementId;
pub use model::*;
pub use shapes::{Archetype, HandleRole, HandleSpec, Side, handle_anchor};
pub use viewport::{CanvasFrame, Viewport, to_canvas_space, to_screen_space};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
