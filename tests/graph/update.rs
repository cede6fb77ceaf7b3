//! Integration tests for value propagation
//!
//! Tests update ordering, defaults for unconnected inputs, and cycle detection.

use std::sync::Arc;

use nodal_foundation::{ErrorKind, Value};
use nodal_graph::{GraphContainer, NodeId, RESULT};
use nodal_language::{Language, Signature, Type};

fn language() -> Language {
    Language::standard().unwrap()
}

fn value_of(graph: &GraphContainer, node: NodeId, member: &str) -> Value {
    graph
        .member(graph.member_ref(node, member).unwrap())
        .unwrap()
        .value
        .clone()
}

#[test]
fn chain_of_operators() {
    // (a + 1) * 3 with a = 4
    let language = language();
    let mut graph = GraphContainer::new();
    let mult = graph.new_binary_operator(Arc::clone(language.find_operator("*").unwrap()));
    let add = graph.new_binary_operator(Arc::clone(language.find_operator("+").unwrap()));
    let a = graph.new_variable("a").unwrap();

    let a_value = graph.variable_member(a).unwrap();
    graph.set_member_value(a_value, Value::Number(4.0)).unwrap();
    graph
        .set_member_value(graph.member_ref(add, "rvalue").unwrap(), Value::Number(1.0))
        .unwrap();
    graph
        .set_member_value(graph.member_ref(mult, "rvalue").unwrap(), Value::Number(3.0))
        .unwrap();
    graph
        .connect(a_value, graph.member_ref(add, "lvalue").unwrap())
        .unwrap();
    graph
        .connect(
            graph.member_ref(add, RESULT).unwrap(),
            graph.member_ref(mult, "lvalue").unwrap(),
        )
        .unwrap();

    let report = graph.update().unwrap();
    assert_eq!(report.evaluated, graph.node_count());
    assert_eq!(value_of(&graph, mult, RESULT), Value::Number(15.0));

    // re-running after an input changes picks up the new value
    graph.set_member_value(a_value, Value::Number(0.0)).unwrap();
    graph.update().unwrap();
    assert_eq!(value_of(&graph, mult, RESULT), Value::Number(3.0));
}

#[test]
fn function_node_evaluates() {
    let language = language();
    let mut graph = GraphContainer::new();
    let key = Signature::new("sqrt", Type::Any).with_param("x", Type::Number);
    let sqrt = graph.new_function(language.find_function(&key).unwrap());
    graph
        .set_member_value(graph.member_ref(sqrt, "arg0").unwrap(), Value::Number(81.0))
        .unwrap();
    graph.update().unwrap();
    assert_eq!(value_of(&graph, sqrt, RESULT), Value::Number(9.0));
}

#[test]
fn empty_graph_updates() {
    let mut graph = GraphContainer::new();
    assert_eq!(graph.update().unwrap().evaluated, 1);
}

#[test]
fn cycle_through_three_nodes() {
    let language = language();
    let mut graph = GraphContainer::new();
    let add = language.find_operator("+").unwrap();
    let nodes: Vec<NodeId> = (0..3)
        .map(|_| graph.new_binary_operator(Arc::clone(add)))
        .collect();
    for i in 0..3 {
        let next = nodes[(i + 1) % 3];
        graph
            .connect(
                graph.member_ref(nodes[i], RESULT).unwrap(),
                graph.member_ref(next, "lvalue").unwrap(),
            )
            .unwrap();
    }
    let err = graph.update().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CycleDetected { .. }));
}

#[test]
fn division_by_zero_is_ieee() {
    let language = language();
    let mut graph = GraphContainer::new();
    let div = graph.new_binary_operator(Arc::clone(language.find_operator("/").unwrap()));
    graph
        .set_member_value(graph.member_ref(div, "lvalue").unwrap(), Value::Number(1.0))
        .unwrap();
    graph.update().unwrap();
    assert_eq!(value_of(&graph, div, RESULT), Value::Number(f64::INFINITY));
}
