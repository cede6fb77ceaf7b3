//! The standard language: token rules, operators, and built-in functions.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use nodal_foundation::{Error, ErrorKind, Result, Type, Value};

use crate::registry::Language;
use crate::signature::{Arity, Function, NativeBody, Operator, Signature};
use crate::token::TokenKind;

impl Language {
    /// Builds the standard language with its full catalog.
    ///
    /// # Errors
    /// Returns an error if a built-in token rule fails to compile.
    pub fn standard() -> Result<Self> {
        let mut language = Language::new("Nodal");
        language.add_keyword("true", TokenKind::Boolean);
        language.add_keyword("false", TokenKind::Boolean);

        register_operators(&mut language);
        register_functions(&mut language);

        let booleans = language.keywords_of(TokenKind::Boolean).join("|");
        let identifier = language.identifier_pattern();
        let operators = language.operator_pattern();

        language.add_rule(TokenKind::Ignore, r"[ \t\r]+")?;
        language.add_rule(TokenKind::Ignore, r"//[^\n]*")?;
        language.add_rule(TokenKind::Boolean, &format!(r"(?:{booleans})\b"))?;
        language.add_rule(TokenKind::String, r#""[^"]*""#)?;
        language.add_rule(TokenKind::Number, r"[0-9]+(?:\.[0-9]+)?")?;
        language.add_rule(TokenKind::Symbol, &identifier)?;
        language.add_rule(TokenKind::Operator, &operators)?;
        language.add_rule(TokenKind::OpenBracket, r"\(")?;
        language.add_rule(TokenKind::CloseBracket, r"\)")?;
        language.add_rule(TokenKind::Separator, ",")?;
        language.add_rule(TokenKind::EndOfInstruction, ";")?;

        Ok(language)
    }
}

// =============================================================================
// Operators
// =============================================================================

fn register_operators(language: &mut Language) {
    let binary = |text: &str, ty: Type, precedence: u16, label: &str, body: NativeBody| Operator {
        signature: Language::create_binary_operator_signature(ty, text, ty, ty),
        precedence,
        arity: Arity::Binary,
        label: label.to_string(),
        assigns: false,
        body,
    };
    let unary = |text: &str, ty: Type, precedence: u16, label: &str, body: NativeBody| Operator {
        signature: Language::create_unary_operator_signature(ty, text, ty),
        precedence,
        arity: Arity::Unary,
        label: label.to_string(),
        assigns: false,
        body,
    };

    language.add_operator(Operator {
        assigns: true,
        ..binary("=", Type::Any, 1, "Assign", assign)
    });
    language.add_operator(unary("!", Type::Bool, 5, "Not", not));
    language.add_operator(unary("-", Type::Number, 5, "Negate", negate));
    language.add_operator(binary("+", Type::Number, 10, "Add", add));
    language.add_operator(binary("+", Type::String, 10, "Concat", concat));
    language.add_operator(binary("-", Type::Number, 10, "Subtract", subtract));
    language.add_operator(binary("*", Type::Number, 20, "Multiply", multiply));
    language.add_operator(binary("/", Type::Number, 20, "Divide", divide));
}

fn assign(args: &[Value]) -> Result<Value> {
    expect_arity(args, 2)?;
    Ok(args[1].clone())
}

fn not(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(!boolean(args, 0)?))
}

fn negate(args: &[Value]) -> Result<Value> {
    Ok(Value::Number(-number(args, 0)?))
}

fn add(args: &[Value]) -> Result<Value> {
    Ok(Value::Number(number(args, 0)? + number(args, 1)?))
}

fn concat(args: &[Value]) -> Result<Value> {
    Ok(Value::from(format!("{}{}", string(args, 0)?, string(args, 1)?)))
}

fn subtract(args: &[Value]) -> Result<Value> {
    Ok(Value::Number(number(args, 0)? - number(args, 1)?))
}

fn multiply(args: &[Value]) -> Result<Value> {
    Ok(Value::Number(number(args, 0)? * number(args, 1)?))
}

fn divide(args: &[Value]) -> Result<Value> {
    Ok(Value::Number(number(args, 0)? / number(args, 1)?))
}

// =============================================================================
// Functions
// =============================================================================

fn register_functions(language: &mut Language) {
    let mut function = |name: &str, ret: Type, params: &[Type], body: NativeBody| {
        let mut signature = Signature::new(name, ret);
        for ty in params {
            signature.push_arg(*ty);
        }
        language.add_function(Function { signature, body });
    };

    use Type::{Bool as B, Number as N, String as S};

    function("returnNumber", N, &[N], return_number);
    function("sin", N, &[N], sin);
    function("cos", N, &[N], cos);
    function("sqrt", N, &[N], sqrt);
    function("add", N, &[N, N], add);
    function("minus", N, &[N, N], subtract);
    function("mult", N, &[N, N], multiply);
    function("mod", N, &[N, N], modulo);
    function("pow", N, &[N, N], pow);
    function("not", B, &[B], not);
    function("and", B, &[B, B], and);
    function("or", B, &[B, B], or);
    function("xor", B, &[B, B], xor);
    function("bool", B, &[N], to_bool);
    function("secondDegreePolynomial", N, &[N, N, N, N, N], second_degree_polynomial);
    function("DNAtoProtein", S, &[S], dna_to_protein);
    function("time", N, &[], time);
}

fn return_number(args: &[Value]) -> Result<Value> {
    Ok(Value::Number(number(args, 0)?))
}

fn sin(args: &[Value]) -> Result<Value> {
    Ok(Value::Number(number(args, 0)?.sin()))
}

fn cos(args: &[Value]) -> Result<Value> {
    Ok(Value::Number(number(args, 0)?.cos()))
}

fn sqrt(args: &[Value]) -> Result<Value> {
    Ok(Value::Number(number(args, 0)?.sqrt()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn modulo(args: &[Value]) -> Result<Value> {
    let divisor = number(args, 1)? as i64;
    if divisor == 0 {
        return Err(Error::new(ErrorKind::DivisionByZero));
    }
    Ok(Value::Number(((number(args, 0)? as i64) % divisor) as f64))
}

fn pow(args: &[Value]) -> Result<Value> {
    Ok(Value::Number(number(args, 0)?.powf(number(args, 1)?)))
}

fn and(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(boolean(args, 0)? && boolean(args, 1)?))
}

fn or(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(boolean(args, 0)? || boolean(args, 1)?))
}

fn xor(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(boolean(args, 0)? != boolean(args, 1)?))
}

fn to_bool(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(number(args, 0)? != 0.0))
}

/// `a * x² + b * y + c`
fn second_degree_polynomial(args: &[Value]) -> Result<Value> {
    let (a, x, b, y, c) = (
        number(args, 0)?,
        number(args, 1)?,
        number(args, 2)?,
        number(args, 3)?,
        number(args, 4)?,
    );
    Ok(Value::Number(a * x.powi(2) + b * y + c))
}

fn dna_to_protein(args: &[Value]) -> Result<Value> {
    let table = codon_table();
    let bases = string(args, 0)?.as_bytes();
    let protein: String = bases
        .chunks_exact(3)
        .filter_map(|codon| std::str::from_utf8(codon).ok())
        .filter_map(|codon| table.get(codon).copied())
        .collect();
    Ok(Value::from(protein))
}

#[allow(clippy::cast_precision_loss)]
fn time(args: &[Value]) -> Result<Value> {
    expect_arity(args, 0)?;
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?
        .as_secs();
    Ok(Value::Number(seconds as f64))
}

/// Standard genetic code; stop codons map to `_`.
fn codon_table() -> HashMap<&'static str, char> {
    const GROUPS: &[(char, &[&str])] = &[
        ('I', &["ATA", "ATC", "ATT"]),
        ('M', &["ATG"]),
        ('T', &["ACA", "ACC", "ACG", "ACT"]),
        ('N', &["AAC", "AAT"]),
        ('K', &["AAA", "AAG"]),
        ('S', &["AGC", "AGT", "TCA", "TCC", "TCG", "TCT"]),
        ('R', &["AGA", "AGG", "CGA", "CGC", "CGG", "CGT"]),
        ('L', &["CTA", "CTC", "CTG", "CTT", "TTA", "TTG"]),
        ('P', &["CCA", "CCC", "CCG", "CCT"]),
        ('H', &["CAC", "CAT"]),
        ('Q', &["CAA", "CAG"]),
        ('V', &["GTA", "GTC", "GTG", "GTT"]),
        ('A', &["GCA", "GCC", "GCG", "GCT"]),
        ('D', &["GAC", "GAT"]),
        ('E', &["GAA", "GAG"]),
        ('G', &["GGA", "GGC", "GGG", "GGT"]),
        ('F', &["TTC", "TTT"]),
        ('Y', &["TAC", "TAT"]),
        ('C', &["TGC", "TGT"]),
        ('W', &["TGG"]),
        ('_', &["TAA", "TAG", "TGA"]),
    ];
    GROUPS
        .iter()
        .flat_map(|(amino, codons)| codons.iter().map(move |codon| (*codon, *amino)))
        .collect()
}

// =============================================================================
// Argument helpers
// =============================================================================

fn expect_arity(args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::arity_mismatch(expected, args.len()))
    }
}

fn arg(args: &[Value], index: usize) -> Result<&Value> {
    args.get(index)
        .ok_or_else(|| Error::arity_mismatch(index + 1, args.len()))
}

fn number(args: &[Value], index: usize) -> Result<f64> {
    let value = arg(args, index)?;
    value
        .as_number()
        .ok_or_else(|| Error::type_mismatch(Type::Number, value.value_type()))
}

fn boolean(args: &[Value], index: usize) -> Result<bool> {
    let value = arg(args, index)?;
    value
        .as_bool()
        .ok_or_else(|| Error::type_mismatch(Type::Bool, value.value_type()))
}

fn string(args: &[Value], index: usize) -> Result<&str> {
    let value = arg(args, index)?;
    value
        .as_str()
        .ok_or_else(|| Error::type_mismatch(Type::String, value.value_type()))
}
