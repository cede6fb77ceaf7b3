//! Operator and function signatures.
//!
//! A signature is an identifier, typed parameters, and a return type.
//! Registered signatures are immutable; lookup keys are built from the
//! concrete operand types seen by the parser and matched structurally.

use std::fmt;

use nodal_foundation::{Result, Type, Value};

/// Body of a native operator or function.
pub type NativeBody = fn(&[Value]) -> Result<Value>;

/// A named, typed parameter slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    /// Member name the argument is bound to.
    pub name: String,
    /// Accepted type.
    pub ty: Type,
}

/// Identifier plus typed parameter list and return type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    identifier: String,
    params: Vec<Param>,
    return_type: Type,
}

impl Signature {
    /// Creates a signature with no parameters.
    #[must_use]
    pub fn new(identifier: impl Into<String>, return_type: Type) -> Self {
        Self {
            identifier: identifier.into(),
            params: Vec::new(),
            return_type,
        }
    }

    /// Adds a named parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
        });
        self
    }

    /// Appends a positional argument named `arg<N>`.
    pub fn push_arg(&mut self, ty: Type) {
        let name = format!("arg{}", self.params.len());
        self.params.push(Param { name, ty });
    }

    /// Returns the identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the parameters in order.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Returns the return type.
    #[must_use]
    pub const fn return_type(&self) -> Type {
        self.return_type
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Scores how well a lookup key matches this registered signature.
    ///
    /// Identifiers and arity must be equal and every parameter must accept the
    /// key's argument type. Higher scores mean more exact matches.
    #[must_use]
    pub fn match_score(&self, key: &Signature) -> Option<u32> {
        if self.identifier != key.identifier || self.params.len() != key.params.len() {
            return None;
        }
        if !self.return_type.accepts(key.return_type) {
            return None;
        }
        self.params
            .iter()
            .zip(&key.params)
            .try_fold(0, |score, (param, arg)| {
                param.ty.match_score(arg.ty).map(|s| score + s)
            })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.identifier)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param.ty)?;
        }
        f.write_str(")")
    }
}

/// Operator arity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    /// One operand (`!x`, `-x`).
    Unary,
    /// Two operands (`a + b`).
    Binary,
}

impl Arity {
    /// Returns the number of operands.
    #[must_use]
    pub const fn operand_count(self) -> usize {
        match self {
            Self::Unary => 1,
            Self::Binary => 2,
        }
    }
}

/// A registered operator.
#[derive(Clone)]
pub struct Operator {
    /// The typed signature; its identifier is the operator text.
    pub signature: Signature,
    /// Binding strength; higher binds tighter.
    pub precedence: u16,
    /// Unary or binary.
    pub arity: Arity,
    /// Display label (e.g. "Add").
    pub label: String,
    /// True for the assignment operator, whose result drives its left operand.
    pub assigns: bool,
    /// Native implementation.
    pub body: NativeBody,
}

impl Operator {
    /// Returns the operator text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.signature.identifier()
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("signature", &self.signature.to_string())
            .field("precedence", &self.precedence)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A registered function.
#[derive(Clone)]
pub struct Function {
    /// The typed signature.
    pub signature: Signature,
    /// Native implementation.
    pub body: NativeBody,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("signature", &self.signature.to_string())
            .finish_non_exhaustive()
    }
}
