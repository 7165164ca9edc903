//! Integration tests: end-to-end editor scenarios (fs-editor ↔ fs-core).
//!
//! Drives `DiagramEditor` with host events and checks the graph store.

use fs_core::model::{EdgeKind, Marker, Point};
use fs_core::{Archetype, CanvasFrame, ElementId, Viewport, to_canvas_space};
use fs_editor::{Connection, DiagramEditor, InputEvent};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ready_editor(viewport: Viewport) -> DiagramEditor {
    init_logging();
    let mut editor = DiagramEditor::new();
    editor.init(CanvasFrame::new(0.0, 0.0, viewport));
    editor
}

fn spawn(editor: &mut DiagramEditor, tag: &str, x: f32, y: f32) -> ElementId {
    let before: Vec<ElementId> = editor.graph().nodes().map(|n| n.id).collect();
    assert!(editor.dispatch(&InputEvent::drop(Some(tag), x, y)).changed);
    editor
        .graph()
        .nodes()
        .map(|n| n.id)
        .find(|id| !before.contains(id))
        .expect("drop did not add a node")
}

// ─── Freehand strokes ────────────────────────────────────────────────────

#[test]
fn scenario_a_pointer_down_starts_stroke() {
    let mut editor = ready_editor(Viewport::default());
    editor.set_pen_active(true);

    let d = editor.dispatch(&InputEvent::pointer_down(50.0, 50.0));
    assert!(d.changed);
    assert!(d.stop_propagation);

    let edges: Vec<_> = editor.graph().edges().collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].kind, EdgeKind::Freehand);
    assert_eq!(edges[0].points, vec![Point::new(50.0, 50.0)]);
}

#[test]
fn scenario_b_move_then_up_freezes_stroke() {
    let mut editor = ready_editor(Viewport::default());
    editor.set_pen_active(true);

    editor.dispatch(&InputEvent::pointer_down(50.0, 50.0));
    editor.dispatch(&InputEvent::pointer_move(60.0, 60.0));
    editor.dispatch(&InputEvent::pointer_up(60.0, 60.0));

    let edges: Vec<_> = editor.graph().edges().collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(
        edges[0].points,
        vec![Point::new(50.0, 50.0), Point::new(60.0, 60.0)]
    );
    assert!(edges[0].frozen);

    // Moves after the stroke closed do not touch it.
    let d = editor.dispatch(&InputEvent::pointer_move(70.0, 70.0));
    assert!(!d.changed);
    assert_eq!(editor.graph().edges().next().map(|e| e.points.len()), Some(2));
}

#[test]
fn strokes_are_not_deletable_by_generic_delete() {
    let mut editor = ready_editor(Viewport::default());
    editor.set_pen_active(true);
    editor.dispatch(&InputEvent::pointer_down(1.0, 1.0));
    editor.dispatch(&InputEvent::pointer_up(1.0, 1.0));
    let id = editor.graph().edges().next().map(|e| e.id).unwrap();
    assert!(!editor.delete_edge(id));
    assert_eq!(editor.graph().edge_count(), 1);
}

#[test]
fn pen_disables_pan_on_drag() {
    let mut editor = ready_editor(Viewport::default());
    assert!(editor.pan_on_drag());
    editor.toggle_pen();
    assert!(!editor.pan_on_drag());
    assert!(!editor.snapshot().pan_on_drag);
}

#[test]
fn pointer_events_pass_through_when_pen_is_off() {
    let mut editor = ready_editor(Viewport::default());
    let d = editor.dispatch(&InputEvent::pointer_down(5.0, 5.0));
    assert!(!d.changed);
    assert!(!d.stop_propagation);
    assert_eq!(editor.graph().edge_count(), 0);
}

#[test]
fn deactivating_pen_mid_stroke_keeps_points() {
    let mut editor = ready_editor(Viewport::default());
    editor.set_pen_active(true);
    editor.dispatch(&InputEvent::pointer_down(0.0, 0.0));
    editor.dispatch(&InputEvent::pointer_move(3.0, 4.0));
    assert!(editor.set_pen_active(false));

    let edge = editor.graph().edges().next().cloned().unwrap();
    assert_eq!(edge.points, vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)]);
    assert!(edge.frozen);

    // Subsequent pointer-up has nothing to close.
    let d = editor.dispatch(&InputEvent::pointer_up(3.0, 4.0));
    assert!(!d.changed);
}

// ─── Drag-spawn ──────────────────────────────────────────────────────────

#[test]
fn scenario_c_drop_circle_with_pan_and_zoom() {
    let mut editor = ready_editor(Viewport::new(10.0, 10.0, 2.0));
    let id = spawn(&mut editor, "circle", 100.0, 100.0);

    let node = editor.graph().node(id).cloned().unwrap();
    assert_eq!(node.position, Point::new(45.0, 45.0));
    assert_eq!(node.archetype, Archetype::Circle);
    assert_eq!(node.label, "circle Node");
}

#[test]
fn drop_before_init_is_ignored() {
    init_logging();
    let mut editor = DiagramEditor::new();
    let d = editor.dispatch(&InputEvent::drop(Some("circle"), 10.0, 10.0));
    assert!(!d.changed);
    assert_eq!(editor.graph().node_count(), 0);
}

#[test]
fn drop_respects_canvas_origin() {
    init_logging();
    let mut editor = DiagramEditor::new();
    editor.init(CanvasFrame::new(128.0, 0.0, Viewport::default()));
    let id = spawn(&mut editor, "diamond", 228.0, 40.0);
    assert_eq!(editor.graph().node(id).map(|n| n.position), Some(Point::new(100.0, 40.0)));
}

#[test]
fn rapid_drops_get_distinct_ids() {
    let mut editor = ready_editor(Viewport::default());
    let a = spawn(&mut editor, "default", 0.0, 0.0);
    let b = spawn(&mut editor, "default", 0.0, 0.0);
    assert_ne!(a, b);
    assert_eq!(editor.graph().node_count(), 2);
}

// ─── Label editing ───────────────────────────────────────────────────────

#[test]
fn scenario_d_rename_with_enter() {
    let mut editor = ready_editor(Viewport::default());
    let id = spawn(&mut editor, "default", 0.0, 0.0);
    editor.set_label(id, "Start");

    editor.dispatch(&InputEvent::DoubleClick { node: id });
    assert!(editor.is_editing(id));
    assert_eq!(editor.label_buffer(id), Some("Start"));

    editor.dispatch(&InputEvent::TextInput {
        node: id,
        text: "Begin".into(),
    });
    // Uncommitted: the store still has the old label, the edit surface the new one.
    assert_eq!(editor.graph().node(id).map(|n| n.label.as_str()), Some("Start"));
    assert_eq!(editor.snapshot().display_text(id), Some("Begin"));

    editor.dispatch(&InputEvent::Key {
        node: id,
        key: "Enter".into(),
    });
    assert_eq!(editor.graph().node(id).map(|n| n.label.as_str()), Some("Begin"));
    assert!(!editor.is_editing(id));

    editor.dispatch(&InputEvent::DoubleClick { node: id });
    assert_eq!(editor.label_buffer(id), Some("Begin"));
}

#[test]
fn blur_commits_like_enter() {
    let mut editor = ready_editor(Viewport::default());
    let id = spawn(&mut editor, "rounded", 0.0, 0.0);
    editor.dispatch(&InputEvent::DoubleClick { node: id });
    editor.dispatch(&InputEvent::TextInput {
        node: id,
        text: "Review".into(),
    });
    editor.dispatch(&InputEvent::Blur { node: id });
    assert_eq!(editor.graph().node(id).map(|n| n.label.as_str()), Some("Review"));
}

#[test]
fn external_label_change_resyncs_buffer() {
    let mut editor = ready_editor(Viewport::default());
    let id = spawn(&mut editor, "circle", 0.0, 0.0);
    editor.dispatch(&InputEvent::DoubleClick { node: id });
    editor.dispatch(&InputEvent::Blur { node: id });

    editor.set_label(id, "Programmatic");
    editor.dispatch(&InputEvent::DoubleClick { node: id });
    assert_eq!(editor.label_buffer(id), Some("Programmatic"));
}

#[test]
fn label_events_for_unknown_nodes_are_ignored() {
    let mut editor = ready_editor(Viewport::default());
    let ghost = ElementId::intern("scenario_ghost");
    let d = editor.dispatch(&InputEvent::DoubleClick { node: ghost });
    assert!(!d.changed);
    assert!(!editor.is_editing(ghost));
}

// ─── Connections ─────────────────────────────────────────────────────────

#[test]
fn scenario_e_connect_bottom_to_top() {
    let mut editor = ready_editor(Viewport::default());
    let x = spawn(&mut editor, "default", 0.0, 0.0);
    let y = spawn(&mut editor, "default", 0.0, 200.0);
    let nodes_before = editor.graph().node_count();

    assert!(editor.connect(&Connection::new(x, "bottom", y, "top")));

    assert_eq!(editor.graph().node_count(), nodes_before);
    let edges: Vec<_> = editor.graph().edges().collect();
    assert_eq!(edges.len(), 1);
    let e = edges[0];
    assert_eq!(e.kind, EdgeKind::Structural);
    assert_eq!((e.source, e.target), (x, y));
    assert_eq!(e.source_handle.as_deref(), Some("bottom"));
    assert_eq!(e.target_handle.as_deref(), Some("top"));
    assert_eq!(e.marker_end, Some(Marker::ArrowClosed));
}

#[test]
fn duplicate_connections_get_distinct_ids() {
    let mut editor = ready_editor(Viewport::default());
    let x = spawn(&mut editor, "diamond", 0.0, 0.0);
    let y = spawn(&mut editor, "circle", 0.0, 200.0);
    let conn = Connection::new(x, "right", y, "top");
    assert!(editor.connect(&conn));
    assert!(editor.connect(&conn));
    let ids: Vec<_> = editor.graph().edges().map(|e| e.id).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn deleting_a_node_leaves_edges_for_the_host() {
    let mut editor = ready_editor(Viewport::default());
    let x = spawn(&mut editor, "default", 0.0, 0.0);
    let y = spawn(&mut editor, "default", 0.0, 200.0);
    editor.connect(&Connection::new(x, "bottom", y, "top"));

    assert!(editor.delete_node(y));
    assert_eq!(editor.graph().edge_count(), 1);
    assert_eq!(editor.graph().dangling_edges().len(), 1);
    assert_eq!(editor.prune_dangling(), 1);
    assert_eq!(editor.graph().edge_count(), 0);
}

#[test]
fn moving_a_node_updates_position() {
    let mut editor = ready_editor(Viewport::default());
    let id = spawn(&mut editor, "default", 0.0, 0.0);
    assert!(editor.move_node(id, Point::new(30.0, 40.0)));
    assert_eq!(editor.graph().node(id).map(|n| n.position), Some(Point::new(30.0, 40.0)));
    assert!(!editor.move_node(ElementId::intern("scenario_missing"), Point::default()));
}

#[test]
fn snapshot_is_stable_without_mutation() {
    let mut editor = ready_editor(Viewport::new(3.0, 4.0, 1.5));
    let x = spawn(&mut editor, "default", 10.0, 10.0);
    let y = spawn(&mut editor, "circle", 10.0, 200.0);
    editor.connect(&Connection::new(x, "bottom", y, "top"));
    editor.set_pen_active(true);
    editor.dispatch(&InputEvent::pointer_down(5.0, 5.0));
    editor.dispatch(&InputEvent::pointer_up(5.0, 5.0));

    let first = editor.snapshot();
    let second = editor.snapshot();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn external_label_change_mid_edit_survives_commit() {
    let mut editor = ready_editor(Viewport::default());
    let id = spawn(&mut editor, "default", 0.0, 0.0);
    editor.dispatch(&InputEvent::DoubleClick { node: id });

    assert!(editor.set_label(id, "External"));
    assert!(editor.is_editing(id));
    assert_eq!(editor.label_buffer(id), Some("External"));

    editor.dispatch(&InputEvent::Key {
        node: id,
        key: "Enter".into(),
    });
    assert_eq!(editor.graph().node(id).map(|n| n.label.as_str()), Some("External"));
}

#[test]
fn deleting_a_node_drops_its_open_edit() {
    let mut editor = ready_editor(Viewport::default());
    let id = spawn(&mut editor, "rounded", 0.0, 0.0);
    editor.dispatch(&InputEvent::DoubleClick { node: id });
    editor.dispatch(&InputEvent::TextInput {
        node: id,
        text: "Orphan".into(),
    });

    assert!(editor.delete_node(id));
    assert!(!editor.is_editing(id));
    assert_eq!(editor.label_buffer(id), None);
    assert!(editor.snapshot().nodes.is_empty());

    let d = editor.dispatch(&InputEvent::Blur { node: id });
    assert!(!d.changed);
    assert!(editor.graph().node(id).is_none());
}

// ─── Viewport ────────────────────────────────────────────────────────────

#[test]
fn zero_zoom_from_host_keeps_drops_finite() {
    let mut editor = ready_editor(Viewport::default());
    assert!(editor.set_viewport(Viewport {
        pan_x: 0.0,
        pan_y: 0.0,
        zoom: 0.0,
    }));
    let id = spawn(&mut editor, "circle", 10.0, 10.0);
    let position = editor.graph().node(id).map(|n| n.position).unwrap();
    assert!(position.x.is_finite() && position.y.is_finite());
    assert_eq!(
        position,
        to_canvas_space(Point::new(10.0, 10.0), &Viewport::new(0.0, 0.0, 0.0))
    );
}

#[test]
fn pointer_down_mid_stroke_starts_a_second_one() {
    let mut editor = ready_editor(Viewport::default());
    editor.set_pen_active(true);

    editor.dispatch(&InputEvent::pointer_down(0.0, 0.0));
    editor.dispatch(&InputEvent::pointer_move(5.0, 5.0));
    // The up was lost (pointer left the window); the next down restarts.
    editor.dispatch(&InputEvent::pointer_down(50.0, 50.0));
    editor.dispatch(&InputEvent::pointer_move(55.0, 55.0));

    let edges: Vec<_> = editor.graph().edges().cloned().collect();
    assert_eq!(edges.len(), 2);
    assert!(edges[0].frozen);
    assert_eq!(edges[0].points, vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)]);
    assert!(!edges[1].frozen);
    assert_eq!(edges[1].points, vec![Point::new(50.0, 50.0), Point::new(55.0, 55.0)]);

    editor.dispatch(&InputEvent::pointer_up(55.0, 55.0));
    assert!(editor.graph().edges().all(|e| e.frozen));
}
