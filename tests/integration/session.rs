//! End-to-end evaluation through a session
//!
//! Tests source text flowing through tokenizer, parser, graph, and update.

use nodal::foundation::{ErrorKind, Value};
use nodal::runtime::{Session, SessionConfig};

fn session() -> Session {
    Session::new().unwrap()
}

#[test]
fn arithmetic_end_to_end() {
    let mut session = session();
    assert_eq!(session.eval("2+3").unwrap(), vec![Value::Number(5.0)]);
    assert_eq!(session.eval("2 * (3 + 4)").unwrap(), vec![Value::Number(14.0)]);
}

#[test]
fn variable_reuse_across_evaluations() {
    let mut session = session();
    session.eval("a = 5").unwrap();
    assert_eq!(session.eval("a + 1").unwrap(), vec![Value::Number(6.0)]);

    // reassigning updates every dependent on the next pass
    session.eval("a = 10").unwrap();
    let values = session.eval("a * 2").unwrap();
    assert_eq!(values, vec![Value::Number(20.0)]);
}

#[test]
fn syntax_failure_leaves_graph_untouched() {
    let mut session = session();
    session.eval("x = 1; y = x + 2").unwrap();
    let nodes = session.graph().node_count();
    let wires = session.graph().wire_count();

    for bad in ["x +", "(x", "x * * 2", "nosuch(1) + x", "1 + \"s\""] {
        assert!(session.eval(bad).is_err(), "{bad} should fail");
        assert_eq!(session.graph().node_count(), nodes, "{bad}");
        assert_eq!(session.graph().wire_count(), wires, "{bad}");
    }
    assert_eq!(session.eval("y").unwrap(), vec![Value::Number(3.0)]);
}

#[test]
fn self_reference_is_a_cycle() {
    let mut session = session();
    session.eval("a = 1").unwrap();
    let err = session.eval("a = a + 1").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CycleDetected { .. }));

    // the rejected cycle does not poison later evaluations
    assert_eq!(session.eval("2 + 3").unwrap(), vec![Value::Number(5.0)]);
    assert_eq!(session.eval("a * 10").unwrap(), vec![Value::Number(10.0)]);
}

#[test]
fn evaluation_error_carries_node_frame() {
    let mut session = session();
    let err = session.eval("mod(5, 0)").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DivisionByZero));
    let context = err.context.unwrap();
    assert!(context.stack.iter().any(|frame| frame.contains("mod")));
    assert!(session.graph().nodes().all(|n| n.label != "mod"));
}

#[test]
fn multi_line_program() {
    let mut session = session();
    let program = "\
radius = 2
area = 3.14 * pow(radius, 2) // circle
secondDegreePolynomial(1, radius, 2, area, 0)
";
    let values = session.eval(program).unwrap();
    assert_eq!(values.len(), 3);
    let area = values[1].as_number().unwrap();
    assert!((area - 12.56).abs() < 1e-9);
    let poly = values[2].as_number().unwrap();
    assert!((poly - (4.0 + 2.0 * area)).abs() < 1e-9);
}

#[test]
fn manual_update_mode() {
    let mut session = Session::with_config(SessionConfig::default().with_auto_update(false)).unwrap();
    let report = session.eval_report("b = 6 * 7").unwrap();
    assert_eq!(session.instruction_values(&report).unwrap(), vec![Value::Nil]);
    session.update().unwrap();
    assert_eq!(
        session.instruction_values(&report).unwrap(),
        vec![Value::Number(42.0)]
    );
}

#[test]
fn empty_and_comment_only_input() {
    let mut session = session();
    assert!(session.eval("").unwrap().is_empty());
    assert!(session.eval("// just a note").unwrap().is_empty());
}
