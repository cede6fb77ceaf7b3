//! Integration tests for the language registry
//!
//! Tests signature lookup, operator resolution, and standard function bodies.

use std::sync::Arc;

use nodal_foundation::{ErrorKind, Type, Value};
use nodal_language::{Arity, Callable, Language, Signature};

fn language() -> Language {
    Language::standard().unwrap()
}

fn key(name: &str, args: &[Type]) -> Signature {
    let mut key = Signature::new(name, Type::Any);
    for ty in args {
        key.push_arg(*ty);
    }
    key
}

fn call(name: &str, args: &[Value]) -> nodal_foundation::Result<Value> {
    let language = language();
    let types: Vec<Type> = args.iter().map(Value::value_type).collect();
    let function = language
        .find_function(&key(name, &types))
        .unwrap_or_else(|| panic!("no function {name}"));
    (function.body)(args)
}

#[test]
fn plus_resolves_by_operand_types() {
    let language = language();
    let add = language
        .find_operator_by_signature(&Language::create_binary_operator_signature(
            Type::Any,
            "+",
            Type::Number,
            Type::Number,
        ))
        .unwrap();
    assert_eq!(add.label, "Add");
    let concat = language
        .find_operator_by_signature(&Language::create_binary_operator_signature(
            Type::Any,
            "+",
            Type::String,
            Type::String,
        ))
        .unwrap();
    assert_eq!(concat.label, "Concat");
}

#[test]
fn mixed_types_do_not_resolve() {
    let language = language();
    let key = Language::create_binary_operator_signature(Type::Any, "*", Type::String, Type::Number);
    assert!(language.find_operator_by_signature(&key).is_none());
}

#[test]
fn minus_has_both_arities() {
    let language = language();
    assert!(language.find_operator_with_arity("-", Arity::Unary).is_some());
    assert!(language.find_operator_with_arity("-", Arity::Binary).is_some());
    assert!(language.has_unary_operator("!"));
    assert!(!language.has_unary_operator("*"));
}

#[test]
fn precedence_ordering() {
    let language = language();
    let prec = |op: &str| {
        language
            .find_operator_with_arity(op, Arity::Binary)
            .unwrap()
            .precedence
    };
    assert!(prec("=") < prec("+"));
    assert!(prec("+") < prec("*"));
    assert_eq!(prec("*"), prec("/"));
}

#[test]
fn operator_keyword_resolves_to_operator() {
    let language = language();
    let callable = language
        .resolve_call(&key("operator*", &[Type::Number, Type::Number]))
        .unwrap();
    assert!(matches!(callable, Callable::Operator(ref op) if op.label == "Multiply"));
    assert!(language.resolve_call(&key("operator%", &[Type::Number, Type::Number])).is_none());
}

#[test]
fn any_argument_matches_number_parameter() {
    let language = language();
    assert!(language.find_function(&key("sin", &[Type::Any])).is_some());
    assert!(language.find_function(&key("sin", &[Type::String])).is_none());
    assert!(language.find_function(&key("sin", &[Type::Number, Type::Number])).is_none());
}

#[test]
fn standard_functions() {
    assert_eq!(
        call("pow", &[Value::Number(2.0), Value::Number(10.0)]).unwrap(),
        Value::Number(1024.0)
    );
    assert_eq!(
        call("mod", &[Value::Number(7.0), Value::Number(3.0)]).unwrap(),
        Value::Number(1.0)
    );
    assert!(matches!(
        call("mod", &[Value::Number(7.0), Value::Number(0.0)]).unwrap_err().kind,
        ErrorKind::DivisionByZero
    ));
    assert_eq!(
        call("xor", &[Value::Bool(true), Value::Bool(false)]).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        call("xor", &[Value::Bool(true), Value::Bool(true)]).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        call(
            "secondDegreePolynomial",
            &[
                Value::Number(1.0),
                Value::Number(3.0),
                Value::Number(2.0),
                Value::Number(4.0),
                Value::Number(5.0),
            ]
        )
        .unwrap(),
        Value::Number(22.0)
    );
}

#[test]
fn dna_to_protein() {
    assert_eq!(
        call("DNAtoProtein", &[Value::string("ATGTAA")]).unwrap(),
        Value::string("M_")
    );
}

#[test]
fn serialize_call_format() {
    assert_eq!(
        Language::serialize_call("add", &["1".to_string(), "2".to_string()]),
        "add( 1, 2 )"
    );
}

#[test]
fn catalogs_are_shared() {
    let language = Arc::new(language());
    let first = Arc::clone(&language.functions()[0]);
    assert!(Arc::ptr_eq(&first, &language.functions()[0]));
    assert!(language.operators().len() >= 8);
}
