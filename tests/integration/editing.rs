//! Graph edits recorded in the session history
//!
//! Tests connect/disconnect/delete interacting with undo/redo and update.

use nodal::foundation::Value;
use nodal::graph::{MemberRef, NodeKind, RESULT};
use nodal::runtime::Session;

/// Session holding `a = 3`, `b = 4` and an instruction `0 + 0`; returns the
/// add node's free inputs and `a`/`b` value members.
fn setup() -> (Session, [MemberRef; 2], [MemberRef; 2]) {
    let mut session = Session::new().unwrap();
    session.eval("a = 3; b = 4").unwrap();
    session.eval("0 + 0").unwrap();
    let graph = session.graph();
    let add = graph.nodes().find(|n| n.label == "Add").unwrap().id;
    let inputs = [
        graph.member_ref(add, "lvalue").unwrap(),
        graph.member_ref(add, "rvalue").unwrap(),
    ];
    let vars = [
        graph.variable_member(graph.find_variable("a").unwrap()).unwrap(),
        graph.variable_member(graph.find_variable("b").unwrap()).unwrap(),
    ];
    (session, inputs, vars)
}

fn add_result(session: &Session) -> Value {
    let graph = session.graph();
    let add = graph.nodes().find(|n| n.label == "Add").unwrap().id;
    graph
        .member(graph.member_ref(add, RESULT).unwrap())
        .unwrap()
        .value
        .clone()
}

#[test]
fn connecting_feeds_values_on_update() {
    let (mut session, inputs, vars) = setup();
    session.connect(vars[0], inputs[0]).unwrap();
    session.connect(vars[1], inputs[1]).unwrap();
    session.update().unwrap();
    assert_eq!(add_result(&session), Value::Number(7.0));

    session.undo().unwrap();
    session.update().unwrap();
    assert_eq!(add_result(&session), Value::Number(3.0));

    session.redo().unwrap();
    session.update().unwrap();
    assert_eq!(add_result(&session), Value::Number(7.0));
}

#[test]
fn undo_redo_restores_wire_identity() {
    let (mut session, inputs, vars) = setup();
    let first = session.connect(vars[0], inputs[0]).unwrap();
    let second = session.connect(vars[1], inputs[1]).unwrap();

    assert!(session.undo().unwrap());
    assert!(session.undo().unwrap());
    assert!(session.graph().wire(first).is_none());
    assert!(session.redo().unwrap());
    assert!(session.redo().unwrap());
    assert_eq!(session.graph().incoming_wire(inputs[0]).unwrap().id, first);
    assert_eq!(session.graph().incoming_wire(inputs[1]).unwrap().id, second);
}

#[test]
fn new_edit_truncates_redo() {
    let (mut session, inputs, vars) = setup();
    session.connect(vars[0], inputs[0]).unwrap();
    session.undo().unwrap();
    session.connect(vars[1], inputs[0]).unwrap();
    assert!(!session.redo().unwrap());
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.graph().incoming_wire(inputs[0]).unwrap().source, vars[1]);
}

#[test]
fn disconnect_and_undo() {
    let (mut session, inputs, vars) = setup();
    let wire = session.connect(vars[0], inputs[0]).unwrap();
    session.disconnect(wire).unwrap();
    assert!(session.graph().incoming_wire(inputs[0]).is_none());
    session.undo().unwrap();
    assert_eq!(session.graph().incoming_wire(inputs[0]).unwrap().id, wire);
}

#[test]
fn rejected_connection_is_not_recorded() {
    let (mut session, inputs, vars) = setup();
    session.connect(vars[0], inputs[0]).unwrap();
    assert!(session.connect(vars[1], inputs[0]).is_err());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn deleting_a_variable_removes_its_wires() {
    let (mut session, inputs, vars) = setup();
    session.connect(vars[0], inputs[0]).unwrap();
    let a = vars[0].node;
    assert!(!session.graph().wires_of(a).is_empty());

    session.delete_node(a).unwrap();
    assert!(session.graph().node(a).is_none());
    assert!(session.graph().wires().all(|w| !w.touches(a)));
    assert!(session.graph().incoming_wire(inputs[0]).is_none());

    // the recorded connect can no longer be undone or redone cleanly
    assert!(session.undo().is_err());
}

#[test]
fn deleting_a_block_removes_its_instructions() {
    let mut session = Session::new().unwrap();
    let report = session.eval_report("1 + 1; 2 + 2").unwrap();
    session.delete_node(report.block).unwrap();
    for instruction in &report.instructions {
        assert!(session.graph().node(*instruction).is_none());
    }
    let root = session.graph().node(session.graph().root_scope()).unwrap();
    assert!(matches!(&root.kind, NodeKind::Scope { blocks, .. } if blocks.is_empty()));
}
