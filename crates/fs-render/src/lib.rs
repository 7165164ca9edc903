pub mod hit;
pub mod paint;
pub mod path;

pub use hit::{hit_test, hit_test_edge, hit_test_handle};
pub use paint::paint_diagram;
pub use path::{arrowhead, edge_anchors, edge_path, node_outline, polyline};
