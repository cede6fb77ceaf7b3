//! Integration tests for parse failures
//!
//! A failed evaluation must leave the graph and the ribbon cursor as they were.

use std::sync::Arc;

use nodal_foundation::{ErrorKind, SyntaxError};
use nodal_graph::GraphContainer;
use nodal_language::Language;
use nodal_parser::{Parser, ParserConfig};

fn parser() -> Parser {
    Parser::new(Arc::new(Language::standard().unwrap()))
}

/// Evaluates `code` into a graph that already holds `a = 1`, checks that the
/// failure left it untouched, and returns the error kind.
fn failure(code: &str) -> ErrorKind {
    let mut parser = parser();
    let mut graph = GraphContainer::new();
    parser.eval_code_into_container("a = 1", &mut graph).unwrap();
    let nodes = graph.node_count();
    let wires = graph.wire_count();

    let err = parser
        .eval_code_into_container(code, &mut graph)
        .expect_err(code);
    assert_eq!(graph.node_count(), nodes, "{code}: nodes leaked");
    assert_eq!(graph.wire_count(), wires, "{code}: wires leaked");
    assert_eq!(parser.ribbon().depth(), 0, "{code}: open transaction");
    assert!(graph.find_variable("a").is_some());
    err.kind
}

#[test]
fn trailing_operator_is_a_syntax_error() {
    assert!(matches!(
        failure("a +"),
        ErrorKind::Syntax(SyntaxError::TrailingOperator { .. })
    ));
}

#[test]
fn bracket_errors() {
    assert!(matches!(
        failure("(1 + 2"),
        ErrorKind::Syntax(SyntaxError::UnbalancedBrackets { .. })
    ));
    assert!(matches!(
        failure("1 + 2)"),
        ErrorKind::Syntax(SyntaxError::UnexpectedCloseBracket { .. })
    ));
}

#[test]
fn operator_placement_errors() {
    assert!(matches!(
        failure("* 2"),
        ErrorKind::Syntax(SyntaxError::LeadingOperator { .. })
    ));
    assert!(matches!(
        failure("2 * / 3"),
        ErrorKind::Syntax(SyntaxError::AdjacentOperators { .. })
    ));
}

#[test]
fn unknown_character_is_a_tokenize_error() {
    assert!(matches!(failure("a # 2"), ErrorKind::Tokenize { offset: 2, .. }));
}

#[test]
fn unresolved_function_rolls_back_everything() {
    // the new variable `b` and both calls are discarded
    let kind = failure("b = sin(1) + nosuch(2)");
    assert!(matches!(kind, ErrorKind::Parse { .. }));
}

#[test]
fn mismatched_operand_types() {
    assert!(matches!(failure("1 + \"one\""), ErrorKind::Parse { .. }));
    assert!(matches!(failure("!3"), ErrorKind::Parse { .. }));
}

#[test]
fn parse_error_points_at_stuck_token() {
    let mut parser = parser();
    let mut graph = GraphContainer::new();
    let err = parser
        .eval_code_into_container("1 + \"x\"", &mut graph)
        .unwrap_err();
    match err.kind {
        ErrorKind::Parse { offset, message } => {
            assert_eq!(offset, 2);
            assert!(message.contains('+'));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn assignment_to_non_variable_fails() {
    assert!(matches!(failure("3 = 4"), ErrorKind::Parse { .. }));
}

#[test]
fn nesting_beyond_limit_is_terminal() {
    let mut parser = Parser::with_config(
        Arc::new(Language::standard().unwrap()),
        ParserConfig::default().with_max_depth(8),
    );
    let mut graph = GraphContainer::new();
    let code = format!("{}1{}", "(".repeat(20), ")".repeat(20));
    let err = parser.eval_code_into_container(&code, &mut graph).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DepthExceeded { limit: 8 }));
    assert_eq!(graph.node_count(), 1);

    // within the limit the same parser still works
    assert!(parser.eval_code_into_container("((1))", &mut graph).is_ok());
}

#[test]
fn default_limit_stops_deep_nesting() {
    for code in [
        format!("{}1{}", "(".repeat(1000), ")".repeat(1000)),
        format!("{}0{}", "sin(".repeat(1000), ")".repeat(1000)),
        format!("{}1{}", "-(".repeat(1000), ")".repeat(1000)),
    ] {
        assert!(matches!(failure(&code), ErrorKind::DepthExceeded { limit: 128 }));
    }
}

#[test]
fn operator_before_terminator_is_a_syntax_error() {
    for code in ["1 +;", "(1 +)", "add(1 *, 2)"] {
        assert!(matches!(
            failure(code),
            ErrorKind::Syntax(SyntaxError::TrailingOperator { .. })
        ));
    }
}
