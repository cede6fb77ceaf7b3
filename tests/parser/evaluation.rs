//! Integration tests for expression evaluation
//!
//! Tests values produced by parsing then updating source text.

use std::sync::Arc;

use nodal_foundation::Value;
use nodal_language::Language;
use nodal_parser::eval;
use proptest::prelude::*;

fn run(code: &str) -> Value {
    let language = Arc::new(Language::standard().unwrap());
    eval(language, code).unwrap_or_else(|e| panic!("{code}: {e}"))
}

fn number(code: &str) -> f64 {
    run(code)
        .as_number()
        .unwrap_or_else(|| panic!("{code} is not a number"))
}

// =============================================================================
// Arithmetic
// =============================================================================

#[test]
fn basic_arithmetic() {
    assert_eq!(number("2+3"), 5.0);
    assert_eq!(number("2 * 3 + 1"), 7.0);
    assert_eq!(number("1 + 2 * 3"), 7.0);
    assert_eq!(number("(1 + 2) * 3"), 9.0);
    assert_eq!(number("1 + 2 * 3 + 4"), 11.0);
}

#[test]
fn long_flat_chains() {
    let sum = vec!["1"; 1000].join(" + ");
    assert_eq!(number(&sum), 1000.0);

    let mixed = vec!["2 * 3 - 5"; 500].join(" + ");
    assert_eq!(number(&mixed), 500.0);
}

#[test]
fn deep_nesting_within_default_limit() {
    let code = format!("{}1{}", "(1 + ".repeat(60), ")".repeat(60));
    assert_eq!(number(&code), 61.0);
}

#[test]
fn left_associativity() {
    assert_eq!(number("10 - 4 - 3"), 3.0);
    assert_eq!(number("100 / 10 / 5"), 2.0);
}

#[test]
fn unary_operators() {
    assert_eq!(number("-2 + 3"), 1.0);
    assert_eq!(number("-(2 + 3)"), -5.0);
    assert_eq!(run("!false"), Value::Bool(true));
}

#[test]
fn decimals() {
    assert_eq!(number("1.5 * 4"), 6.0);
}

// =============================================================================
// Calls
// =============================================================================

#[test]
fn function_calls() {
    assert_eq!(number("sqrt(16)"), 4.0);
    assert_eq!(number("add(2, mult(3, 4))"), 14.0);
    assert_eq!(number("pow(2, 3) + 1"), 9.0);
    assert_eq!(number("returnNumber(7)"), 7.0);
    assert_eq!(run("and(true, not(false))"), Value::Bool(true));
    assert_eq!(run("bool(0)"), Value::Bool(false));
}

#[test]
fn operator_as_function() {
    assert_eq!(number("operator+(2, 3)"), 5.0);
    assert_eq!(number("operator*(4, 5) - 1"), 19.0);
}

#[test]
fn strings() {
    assert_eq!(run("\"Hello \" + \"World\""), Value::string("Hello World"));
    assert_eq!(run("DNAtoProtein(\"ATGGCC\")"), Value::string("MA"));
}

// =============================================================================
// Variables
// =============================================================================

#[test]
fn variables_across_instructions() {
    assert_eq!(number("a = 5; a + 1"), 6.0);
    assert_eq!(number("x = 2\ny = x * 10\ny + x"), 22.0);
}

#[test]
fn assignment_yields_value() {
    assert_eq!(number("b = 3 * 3"), 9.0);
}

#[test]
fn unassigned_variable_reads_as_default() {
    assert_eq!(number("z + 1"), 1.0);
}

#[test]
fn comments_are_ignored() {
    assert_eq!(number("1 + 1 // plus one\n"), 2.0);
}

#[test]
fn empty_input_is_nil() {
    assert_eq!(run(""), Value::Nil);
    assert_eq!(run("   // nothing"), Value::Nil);
}

// =============================================================================
// Properties
// =============================================================================

fn eval_left_to_right(first: i64, rest: &[(char, i64)]) -> f64 {
    // apply * and / before + and -
    let mut terms: Vec<f64> = vec![first as f64];
    let mut signs: Vec<char> = Vec::new();
    for (op, value) in rest {
        let value = *value as f64;
        match op {
            '*' => *terms.last_mut().unwrap() *= value,
            '/' => *terms.last_mut().unwrap() /= value,
            sign => {
                signs.push(*sign);
                terms.push(value);
            }
        }
    }
    let mut total = terms[0];
    for (sign, term) in signs.iter().zip(&terms[1..]) {
        if *sign == '+' {
            total += term;
        } else {
            total -= term;
        }
    }
    total
}

proptest! {
    #[test]
    fn precedence_matches_arithmetic(
        first in 1i64..50,
        rest in prop::collection::vec((prop::sample::select(vec!['+', '-', '*', '/']), 1i64..50), 0..6),
    ) {
        let mut code = first.to_string();
        for (op, value) in &rest {
            code.push_str(&format!(" {op} {value}"));
        }
        let expected = eval_left_to_right(first, &rest);
        let actual = number(&code);
        prop_assert!((actual - expected).abs() < 1e-9 * expected.abs().max(1.0), "{code}: {actual} != {expected}");
    }
}
