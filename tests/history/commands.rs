//! Integration tests for reversible commands
//!
//! Tests that connect and disconnect commands restore the exact wire they touched.

use nodal_graph::{GraphContainer, MemberRef};
use nodal_history::{Command, ConnectWire, DisconnectWire};
use nodal_language::Language;
use nodal_parser::Parser;
use std::sync::Arc;

/// `a = 1; b = a * 2` plus a free `lvalue` on a `1 - 0` node.
fn graph() -> (GraphContainer, MemberRef, MemberRef) {
    let mut parser = Parser::new(Arc::new(Language::standard().unwrap()));
    let mut graph = GraphContainer::new();
    parser
        .eval_code_into_container("a = 1; b = a * 2; 1 - 0", &mut graph)
        .unwrap();
    let a = graph.find_variable("a").unwrap();
    let source = graph.variable_member(a).unwrap();
    let subtract = graph.nodes().find(|n| n.label == "Subtract").unwrap().id;
    let target = graph.member_ref(subtract, "lvalue").unwrap();
    (graph, source, target)
}

#[test]
fn redo_restores_the_same_wire_id() {
    let (mut graph, source, target) = graph();
    let mut command = ConnectWire::new(source, target);
    command.execute(&mut graph).unwrap();
    let original = *command.wire().unwrap();

    command.undo(&mut graph).unwrap();
    assert!(graph.wire(original.id).is_none());

    // unrelated wire created in between takes a fresh id
    let other = graph
        .connect(source, graph.member_ref(target.node, "rvalue").unwrap())
        .unwrap();
    assert_ne!(other, original.id);

    command.execute(&mut graph).unwrap();
    assert_eq!(graph.wire(original.id), Some(&original));
}

#[test]
fn undo_after_update_resets_target() {
    let (mut graph, source, target) = graph();
    let mut command = ConnectWire::new(source, target);
    command.execute(&mut graph).unwrap();
    graph.update().unwrap();
    assert_eq!(
        graph.member(target).unwrap().value,
        nodal_foundation::Value::Number(1.0)
    );
    command.undo(&mut graph).unwrap();
    assert_eq!(
        graph.member(target).unwrap().value,
        nodal_foundation::Value::Number(0.0)
    );
}

#[test]
fn disconnecting_a_parsed_wire_is_reversible() {
    let (mut graph, source, _) = graph();
    let wire = graph
        .wires()
        .find(|w| w.source == source)
        .copied()
        .unwrap();
    let mut command = DisconnectWire::new(wire.id);
    command.execute(&mut graph).unwrap();
    assert!(graph.incoming_wire(wire.target).is_none());
    command.undo(&mut graph).unwrap();
    assert_eq!(graph.incoming_wire(wire.target), Some(&wire));
    assert!(command.description().contains(&wire.source.to_string()));
}

#[test]
fn failing_connect_reports_graph_error() {
    let (mut graph, source, target) = graph();
    graph.connect(source, target).unwrap();
    let mut command = ConnectWire::new(source, target);
    assert!(command.execute(&mut graph).is_err());
    assert!(command.wire().is_none());
}
