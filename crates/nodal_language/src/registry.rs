//! Language registry.
//!
//! A [`Language`] owns everything the tokenizer and parser need to know about
//! the grammar: character classes, keywords, the ordered token rules, and the
//! catalog of operator and function signatures.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use nodal_foundation::{Error, ErrorKind, Result, Type};
use regex::Regex;

use crate::signature::{Arity, Function, Operator, Signature};
use crate::token::TokenKind;

/// A token rule: a kind plus the anchored pattern recognizing it.
#[derive(Clone, Debug)]
pub struct TokenRule {
    /// Kind of token produced on match.
    pub kind: TokenKind,
    /// Pattern anchored at the current position.
    pub regex: Regex,
}

/// A resolved call target: either a function or an operator used as a function.
#[derive(Clone, Debug)]
pub enum Callable {
    /// A registered function.
    Function(Arc<Function>),
    /// A registered operator, reached through `operator<op>(...)`.
    Operator(Arc<Operator>),
}

impl Callable {
    /// Returns the registered signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        match self {
            Self::Function(function) => &function.signature,
            Self::Operator(operator) => &operator.signature,
        }
    }
}

/// Grammar, token rules, and signature catalog of a language.
#[derive(Clone)]
pub struct Language {
    name: String,
    letters: String,
    digits: String,
    keywords: HashMap<String, TokenKind>,
    operator_keyword: String,
    end_of_line: String,
    rules: Vec<TokenRule>,
    operators: Vec<Arc<Operator>>,
    functions: Vec<Arc<Function>>,
}

impl Language {
    /// Creates an empty language with default character classes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            letters: "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_".to_string(),
            digits: "0123456789.".to_string(),
            keywords: HashMap::new(),
            operator_keyword: "operator".to_string(),
            end_of_line: "\n".to_string(),
            rules: Vec::new(),
            operators: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Returns the language name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the characters an identifier may start with.
    #[must_use]
    pub fn letters(&self) -> &str {
        &self.letters
    }

    /// Returns the characters a number is made of.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Returns the text that separates lines.
    #[must_use]
    pub fn end_of_line(&self) -> &str {
        &self.end_of_line
    }

    /// Returns the keyword that turns an operator into a function name.
    #[must_use]
    pub fn operator_keyword(&self) -> &str {
        &self.operator_keyword
    }

    /// Registers a keyword.
    pub fn add_keyword(&mut self, word: impl Into<String>, kind: TokenKind) {
        self.keywords.insert(word.into(), kind);
    }

    /// Returns the token kind of a keyword.
    #[must_use]
    pub fn keyword(&self, word: &str) -> Option<TokenKind> {
        self.keywords.get(word).copied()
    }

    /// Returns all keywords of the given kind, sorted.
    #[must_use]
    pub fn keywords_of(&self, kind: TokenKind) -> Vec<&str> {
        let mut words: Vec<&str> = self
            .keywords
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(w, _)| w.as_str())
            .collect();
        words.sort_unstable();
        words
    }

    /// Appends a token rule. Rules are tried in registration order.
    ///
    /// The pattern is anchored at the current position automatically.
    ///
    /// # Errors
    /// Returns an error if the pattern does not compile.
    pub fn add_rule(&mut self, kind: TokenKind, pattern: &str) -> Result<()> {
        let anchored = if pattern.starts_with('^') {
            pattern.to_string()
        } else {
            format!("^(?:{pattern})")
        };
        let regex = Regex::new(&anchored)
            .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?;
        self.rules.push(TokenRule { kind, regex });
        Ok(())
    }

    /// Returns the ordered token rules.
    #[must_use]
    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }

    /// Builds a pattern matching every registered operator text, longest first.
    #[must_use]
    pub fn operator_pattern(&self) -> String {
        let mut texts: Vec<&str> = self.operators.iter().map(|op| op.text()).collect();
        texts.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        texts.dedup();
        texts
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Builds a pattern matching identifiers from the letter and digit classes.
    #[must_use]
    pub fn identifier_pattern(&self) -> String {
        let letters = regex::escape(&self.letters);
        let digits = regex::escape(&self.digits.replace('.', ""));
        format!("[{letters}][{letters}{digits}]*")
    }

    /// Registers an operator.
    pub fn add_operator(&mut self, operator: Operator) {
        self.operators.push(Arc::new(operator));
    }

    /// Registers a function.
    pub fn add_function(&mut self, function: Function) {
        self.functions.push(Arc::new(function));
    }

    /// Returns the registered operators in registration order.
    #[must_use]
    pub fn operators(&self) -> &[Arc<Operator>] {
        &self.operators
    }

    /// Returns the registered functions in registration order.
    #[must_use]
    pub fn functions(&self) -> &[Arc<Function>] {
        &self.functions
    }

    /// Finds the first operator registered under the given text.
    #[must_use]
    pub fn find_operator(&self, text: &str) -> Option<&Arc<Operator>> {
        self.operators.iter().find(|op| op.text() == text)
    }

    /// Finds the first operator registered under the given text and arity.
    #[must_use]
    pub fn find_operator_with_arity(&self, text: &str, arity: Arity) -> Option<&Arc<Operator>> {
        self.operators
            .iter()
            .find(|op| op.text() == text && op.arity == arity)
    }

    /// Finds the best operator matching a lookup signature.
    ///
    /// Ties keep the operator registered first.
    #[must_use]
    pub fn find_operator_by_signature(&self, key: &Signature) -> Option<Arc<Operator>> {
        best_match(self.operators.iter(), key, |op| &op.signature)
    }

    /// Finds the best function matching a lookup signature.
    #[must_use]
    pub fn find_function(&self, key: &Signature) -> Option<Arc<Function>> {
        best_match(self.functions.iter(), key, |f| &f.signature)
    }

    /// Resolves a call: a function, or `operator<op>(...)` as its operator.
    #[must_use]
    pub fn resolve_call(&self, key: &Signature) -> Option<Callable> {
        if let Some(function) = self.find_function(key) {
            return Some(Callable::Function(function));
        }
        let op_text = key.identifier().strip_prefix(self.operator_keyword.as_str())?;
        let arity = match key.arity() {
            1 => Arity::Unary,
            2 => Arity::Binary,
            _ => return None,
        };
        let args: Vec<Type> = key.params().iter().map(|p| p.ty).collect();
        let op_key = match arity {
            Arity::Unary => Self::create_unary_operator_signature(key.return_type(), op_text, args[0]),
            Arity::Binary => Self::create_binary_operator_signature(
                key.return_type(),
                op_text,
                args[0],
                args[1],
            ),
        };
        self.find_operator_by_signature(&op_key)
            .map(Callable::Operator)
    }

    /// Returns true if the operator text has a unary form.
    #[must_use]
    pub fn has_unary_operator(&self, text: &str) -> bool {
        self.find_operator_with_arity(text, Arity::Unary).is_some()
    }

    /// Builds the lookup key for a binary operator applied to concrete operand types.
    #[must_use]
    pub fn create_binary_operator_signature(
        return_type: Type,
        op: &str,
        left: Type,
        right: Type,
    ) -> Signature {
        Signature::new(op, return_type)
            .with_param("lvalue", left)
            .with_param("rvalue", right)
    }

    /// Builds the lookup key for a unary operator applied to a concrete operand type.
    #[must_use]
    pub fn create_unary_operator_signature(return_type: Type, op: &str, operand: Type) -> Signature {
        Signature::new(op, return_type).with_param("lvalue", operand)
    }

    /// Renders a call as `name( a, b )`.
    #[must_use]
    pub fn serialize_call(identifier: &str, args: &[String]) -> String {
        format!("{identifier}( {} )", args.join(", "))
    }
}

fn best_match<'a, T: 'a>(
    candidates: impl Iterator<Item = &'a Arc<T>>,
    key: &Signature,
    signature_of: impl Fn(&T) -> &Signature,
) -> Option<Arc<T>> {
    let mut best: Option<(u32, &Arc<T>)> = None;
    for candidate in candidates {
        if let Some(score) = signature_of(candidate.as_ref()).match_score(key) {
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, candidate));
            }
        }
    }
    best.map(|(_, candidate)| Arc::clone(candidate))
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.name)
            .field("rules", &self.rules.len())
            .field("operators", &self.operators.len())
            .field("functions", &self.functions.len())
            .finish_non_exhaustive()
    }
}
