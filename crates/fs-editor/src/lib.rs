pub mod config;
pub mod connect;
pub mod editor;
pub mod input;
pub mod label;
pub mod snapshot;
pub mod spawn;
pub mod sync;
pub mod tools;

pub use config::EditorConfig;
pub use connect::Connection;
pub use editor::{DiagramEditor, Dispatch};
pub use input::InputEvent;
pub use snapshot::{DiagramSnapshot, NodeView};
