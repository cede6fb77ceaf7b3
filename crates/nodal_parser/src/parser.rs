//! Precedence-climbing recursive descent parser that builds graph nodes.
//!
//! Every production runs inside a transaction that pairs a token ribbon
//! transaction with a graph snapshot. A production that does not match rolls
//! both back, so the graph looks as if it never ran. A "no match" is an
//! `Ok(None)`; only terminal failures are `Err`.

use std::sync::Arc;
use std::thread;

use nodal_foundation::{Error, ErrorKind, Result, Type, Value};
use nodal_graph::node::RESULT;
use nodal_graph::{GraphContainer, GraphSnapshot, Member, MemberRef, NodeId, NodeKind};
use nodal_language::{
    Arity, Callable, Language, Operator, Signature, Token, TokenKind, TokenRibbon, Tokenizer,
};
use tracing::{Dispatch, Span, debug, trace, warn};

use crate::config::ParserConfig;
use crate::syntax;

/// Result of a successful evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalReport {
    /// Code block holding the parsed instructions.
    pub block: NodeId,
    /// Instruction nodes in source order.
    pub instructions: Vec<NodeId>,
}

/// Parses source text into a [`GraphContainer`].
#[derive(Clone, Debug)]
pub struct Parser {
    language: Arc<Language>,
    ribbon: TokenRibbon,
    config: ParserConfig,
}

impl Parser {
    /// Creates a parser with the default configuration.
    #[must_use]
    pub fn new(language: Arc<Language>) -> Self {
        Self::with_config(language, ParserConfig::default())
    }

    /// Creates a parser with the given configuration.
    #[must_use]
    pub fn with_config(language: Arc<Language>, config: ParserConfig) -> Self {
        Self {
            language,
            ribbon: TokenRibbon::new(),
            config,
        }
    }

    /// Returns the language.
    #[must_use]
    pub fn language(&self) -> &Arc<Language> {
        &self.language
    }

    /// Returns the tokens of the last evaluation.
    #[must_use]
    pub fn ribbon(&self) -> &TokenRibbon {
        &self.ribbon
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Tokenizes, validates, and parses `code`, adding its nodes to `graph`.
    ///
    /// On failure the graph is left exactly as it was before the call.
    ///
    /// # Errors
    /// - `Tokenize` if no token rule matches at some offset
    /// - `Syntax` if the brackets or operator placement are invalid
    /// - `Parse` if the tokens do not form a sequence of instructions
    /// - `DepthExceeded` if expressions nest deeper than the configured limit
    pub fn eval_code_into_container(
        &mut self,
        code: &str,
        graph: &mut GraphContainer,
    ) -> Result<EvalReport> {
        self.ribbon.clear();
        Tokenizer::new(&self.language)
            .tokenize(code, &mut self.ribbon)
            .inspect_err(|e| warn!(error = %e, offset = ?e.offset(), "tokenization failed"))?;
        syntax::validate(&self.language, self.ribbon.tokens())
            .inspect_err(|e| warn!(error = %e, offset = ?e.offset(), "syntax check failed"))?;

        let before = graph.checkpoint();
        let max_depth = self.config.max_depth;
        let (outcome, stuck_at) = if syntax::nesting(self.ribbon.tokens()) < INLINE_NESTING {
            parse_tokens(&self.language, &mut self.ribbon, graph, max_depth)
        } else {
            parse_on_worker(&self.language, &mut self.ribbon, graph, max_depth)?
        };

        match outcome {
            Ok(Some(report)) => {
                debug!(
                    tokens = self.ribbon.len(),
                    instructions = report.instructions.len(),
                    "evaluated code"
                );
                Ok(report)
            }
            Ok(None) => {
                graph.restore(before);
                let (offset, text) = stuck_at.unwrap_or((0, String::new()));
                let error = Error::parse(offset, format!("unexpected token '{text}'"));
                warn!(error = %error, offset, "parse failed");
                Err(error)
            }
            Err(error) => {
                graph.restore(before);
                warn!(error = %error, offset = ?error.offset(), "parse failed");
                Err(error)
            }
        }
    }
}

/// Bracket nesting below which parsing runs on the caller's stack.
const INLINE_NESTING: usize = 8;

/// Stack reserved for each level of expression nesting on the parse worker.
const STACK_PER_LEVEL: usize = 64 * 1024;

/// Stack reserved on the parse worker beyond the per-level budget.
const STACK_BASE: usize = 1024 * 1024;

type ParseOutcome = (Result<Option<EvalReport>>, Option<(usize, String)>);

fn parse_tokens(
    language: &Language,
    ribbon: &mut TokenRibbon,
    graph: &mut GraphContainer,
    max_depth: usize,
) -> ParseOutcome {
    let mut session = ParseSession {
        language,
        ribbon,
        graph,
        snapshots: Vec::new(),
        depth: 0,
        max_depth,
        stuck_at: None,
    };
    let outcome = session.parse_scope();
    (outcome, session.stuck_at.take())
}

/// Runs [`parse_tokens`] on a thread whose stack holds `max_depth` levels, so
/// deep input ends in `DepthExceeded` rather than overflowing the caller.
fn parse_on_worker(
    language: &Language,
    ribbon: &mut TokenRibbon,
    graph: &mut GraphContainer,
    max_depth: usize,
) -> Result<ParseOutcome> {
    let stack = STACK_BASE.saturating_add(max_depth.saturating_mul(STACK_PER_LEVEL));
    let dispatch = tracing::dispatcher::get_default(Dispatch::clone);
    let span = Span::current();
    debug!(stack, max_depth, "parsing nested input on worker thread");

    thread::scope(|scope| -> Result<ParseOutcome> {
        let worker = thread::Builder::new()
            .name("nodal-parse".to_string())
            .stack_size(stack)
            .spawn_scoped(scope, move || {
                tracing::dispatcher::with_default(&dispatch, || {
                    span.in_scope(|| parse_tokens(language, ribbon, graph, max_depth))
                })
            })
            .map_err(|e| Error::new(ErrorKind::Internal(format!("parser thread: {e}"))))?;
        match worker.join() {
            Ok(outcome) => Ok(outcome),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}

/// An expression result: a standalone literal, or a member owned by a node.
#[derive(Clone, Debug)]
enum Operand {
    Literal(Member),
    Owned(MemberRef),
}

/// State of one parse over a ribbon and a graph.
struct ParseSession<'a> {
    language: &'a Language,
    ribbon: &'a mut TokenRibbon,
    graph: &'a mut GraphContainer,
    snapshots: Vec<GraphSnapshot>,
    depth: usize,
    max_depth: usize,
    stuck_at: Option<(usize, String)>,
}

impl ParseSession<'_> {
    // =========================================================================
    // Transactions
    // =========================================================================

    /// Runs a production inside a transaction, committing only on a match.
    fn attempt<T>(
        &mut self,
        production: &'static str,
        parse: impl FnOnce(&mut Self) -> Result<Option<T>>,
    ) -> Result<Option<T>> {
        trace!(production, cursor = self.ribbon.cursor(), "try");
        self.ribbon.start_transaction();
        self.snapshots.push(self.graph.checkpoint());

        let outcome = parse(self);
        match outcome {
            Ok(Some(value)) => {
                self.ribbon.commit_transaction()?;
                self.snapshots.pop();
                trace!(production, cursor = self.ribbon.cursor(), "matched");
                Ok(Some(value))
            }
            Ok(None) => {
                self.rollback()?;
                trace!(production, cursor = self.ribbon.cursor(), "no match");
                Ok(None)
            }
            Err(error) => {
                self.rollback()?;
                Err(error)
            }
        }
    }

    fn rollback(&mut self) -> Result<()> {
        self.ribbon.rollback_transaction()?;
        if let Some(snapshot) = self.snapshots.pop() {
            self.graph.restore(snapshot);
        }
        Ok(())
    }

    /// Eats the next token if it has the given kind.
    fn eat_kind(&mut self, kind: TokenKind) -> Option<Token> {
        if self.next_kind() != Some(kind) {
            return None;
        }
        self.ribbon.eat().ok().cloned()
    }

    fn next_kind(&self) -> Option<TokenKind> {
        self.ribbon.peek().ok().map(|t| t.kind)
    }

    // =========================================================================
    // Scope, block, instruction
    // =========================================================================

    fn parse_scope(&mut self) -> Result<Option<EvalReport>> {
        self.attempt("scope", |s| {
            let report = s.parse_code_block()?;
            if let Ok(token) = s.ribbon.peek() {
                s.stuck_at = Some((token.offset, token.text.clone()));
                return Ok(None);
            }
            Ok(Some(report))
        })
    }

    fn parse_code_block(&mut self) -> Result<EvalReport> {
        let block = self.graph.new_code_block();
        let mut instructions = Vec::new();
        while self.ribbon.can_eat(1) {
            match self.parse_instruction(block)? {
                Some(instruction) => instructions.push(instruction),
                None => break,
            }
        }
        Ok(EvalReport {
            block,
            instructions,
        })
    }

    fn parse_instruction(&mut self, block: NodeId) -> Result<Option<NodeId>> {
        self.attempt("instruction", |s| {
            let Some(expression) = s.parse_expression(0)? else {
                return Ok(None);
            };
            s.eat_kind(TokenKind::EndOfInstruction);
            s.eat_kind(TokenKind::EndOfLine);

            let instruction = s.graph.new_instruction(block)?;
            let result = s.graph.member_ref(instruction, RESULT)?;
            s.bind(&expression, result)?;
            Ok(Some(instruction))
        })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Parses an operand followed by any binary operators that bind tighter
    /// than `precedence`, combining left to right.
    fn parse_expression(&mut self, precedence: u16) -> Result<Option<Operand>> {
        self.depth += 1;
        if self.depth > self.max_depth {
            self.depth -= 1;
            return Err(Error::new(ErrorKind::DepthExceeded {
                limit: self.max_depth,
            }));
        }
        let outcome = self.attempt("expression", |s| {
            let Some(mut left) = s.parse_operand()? else {
                return Ok(None);
            };
            while s.ribbon.can_eat(1) {
                match s.parse_binary(precedence, &left)? {
                    Some(combined) => left = combined,
                    None => break,
                }
            }
            Ok(Some(left))
        });
        self.depth -= 1;
        outcome
    }

    /// Parenthesized expression, unary expression, function call, or atom.
    fn parse_operand(&mut self) -> Result<Option<Operand>> {
        if let Some(operand) = self.parse_parenthesis()? {
            return Ok(Some(operand));
        }
        if let Some(operand) = self.parse_unary()? {
            return Ok(Some(operand));
        }
        if let Some(operand) = self.parse_function_call()? {
            return Ok(Some(operand));
        }
        self.parse_atomic()
    }

    fn parse_parenthesis(&mut self) -> Result<Option<Operand>> {
        self.attempt("parenthesis", |s| {
            if s.eat_kind(TokenKind::OpenBracket).is_none() {
                return Ok(None);
            }
            let Some(inner) = s.parse_expression(0)? else {
                return Ok(None);
            };
            if s.eat_kind(TokenKind::CloseBracket).is_none() {
                return Ok(None);
            }
            Ok(Some(inner))
        })
    }

    fn parse_unary(&mut self) -> Result<Option<Operand>> {
        self.attempt("unary", |s| {
            let Some(token) = s.eat_kind(TokenKind::Operator) else {
                return Ok(None);
            };
            if !s.language.has_unary_operator(&token.text) {
                return Ok(None);
            }

            let operand = match s.parse_parenthesis()? {
                Some(operand) => Some(operand),
                None => match s.parse_function_call()? {
                    Some(operand) => Some(operand),
                    None => s.parse_atomic()?,
                },
            };
            let Some(operand) = operand else {
                return Ok(None);
            };

            let key = Language::create_unary_operator_signature(
                Type::Any,
                &token.text,
                s.operand_type(&operand)?,
            );
            match s.language.find_operator_by_signature(&key) {
                Some(operator) => s.build_operator(operator, &[operand]),
                None => Ok(None),
            }
        })
    }

    fn parse_binary(&mut self, precedence: u16, left: &Operand) -> Result<Option<Operand>> {
        self.attempt("binary", |s| {
            let Some(token) = s.eat_kind(TokenKind::Operator) else {
                return Ok(None);
            };
            if s.next_kind() == Some(TokenKind::Operator) {
                return Ok(None);
            }
            let Some(candidate) = s
                .language
                .find_operator_with_arity(&token.text, Arity::Binary)
            else {
                return Ok(None);
            };
            let operator_precedence = candidate.precedence;
            if operator_precedence <= precedence && precedence > 0 {
                return Ok(None);
            }

            let Some(right) = s.parse_expression(operator_precedence)? else {
                return Ok(None);
            };
            let key = Language::create_binary_operator_signature(
                Type::Any,
                &token.text,
                s.operand_type(left)?,
                s.operand_type(&right)?,
            );
            match s.language.find_operator_by_signature(&key) {
                Some(operator) => s.build_operator(operator, &[left.clone(), right]),
                None => Ok(None),
            }
        })
    }

    fn parse_function_call(&mut self) -> Result<Option<Operand>> {
        self.attempt("call", |s| {
            let Some(name) = s.eat_kind(TokenKind::Symbol) else {
                return Ok(None);
            };
            let mut identifier = name.text;
            if identifier == s.language.operator_keyword() {
                let Some(op) = s.eat_kind(TokenKind::Operator) else {
                    return Ok(None);
                };
                identifier.push_str(&op.text);
            }
            if s.eat_kind(TokenKind::OpenBracket).is_none() {
                return Ok(None);
            }

            let mut args = Vec::new();
            if s.eat_kind(TokenKind::CloseBracket).is_none() {
                loop {
                    let Some(arg) = s.parse_expression(0)? else {
                        return Ok(None);
                    };
                    args.push(arg);
                    if s.eat_kind(TokenKind::Separator).is_some() {
                        continue;
                    }
                    if s.eat_kind(TokenKind::CloseBracket).is_some() {
                        break;
                    }
                    return Ok(None);
                }
            }

            let mut key = Signature::new(identifier, Type::Any);
            for arg in &args {
                key.push_arg(s.operand_type(arg)?);
            }
            match s.language.resolve_call(&key) {
                Some(Callable::Function(function)) => {
                    let node = s.graph.new_function(Arc::clone(&function));
                    for (param, arg) in function.signature.params().iter().zip(&args) {
                        let slot = s.graph.member_ref(node, &param.name)?;
                        s.bind(arg, slot)?;
                    }
                    Ok(Some(Operand::Owned(s.graph.member_ref(node, RESULT)?)))
                }
                Some(Callable::Operator(operator)) => s.build_operator(operator, &args),
                None => Ok(None),
            }
        })
    }

    fn parse_atomic(&mut self) -> Result<Option<Operand>> {
        self.attempt("atomic", |s| {
            let Ok(token) = s.ribbon.eat().cloned() else {
                return Ok(None);
            };
            let operand = match token.kind {
                TokenKind::Number => match token.text.parse::<f64>() {
                    Ok(value) => Operand::Literal(GraphContainer::new_number(value)),
                    Err(_) => return Ok(None),
                },
                TokenKind::String => Operand::Literal(GraphContainer::new_string(&token.text)),
                TokenKind::Boolean => {
                    Operand::Literal(GraphContainer::new_boolean(token.text == "true"))
                }
                TokenKind::Symbol => {
                    let variable = match s.graph.find_variable(&token.text) {
                        Some(variable) => variable,
                        None => s.graph.new_variable(&token.text)?,
                    };
                    match s.graph.variable_member(variable) {
                        Some(member) => Operand::Owned(member),
                        None => return Ok(None),
                    }
                }
                _ => return Ok(None),
            };
            Ok(Some(operand))
        })
    }

    // =========================================================================
    // Node construction
    // =========================================================================

    /// Creates an operator node and binds its operands to `lvalue` / `rvalue`.
    fn build_operator(
        &mut self,
        operator: Arc<Operator>,
        operands: &[Operand],
    ) -> Result<Option<Operand>> {
        if operands.len() != operator.arity.operand_count() {
            return Ok(None);
        }
        if operator.assigns {
            return self.build_assignment(operator, operands);
        }

        let node = match operator.arity {
            Arity::Unary => self.graph.new_unary_operator(Arc::clone(&operator)),
            Arity::Binary => self.graph.new_binary_operator(Arc::clone(&operator)),
        };
        for (param, operand) in operator.signature.params().iter().zip(operands) {
            let slot = self.graph.member_ref(node, &param.name)?;
            self.bind(operand, slot)?;
        }
        Ok(Some(Operand::Owned(self.graph.member_ref(node, RESULT)?)))
    }

    /// `x = value`: the operator's result drives the variable `x`.
    fn build_assignment(
        &mut self,
        operator: Arc<Operator>,
        operands: &[Operand],
    ) -> Result<Option<Operand>> {
        let [Operand::Owned(target), value] = operands else {
            return Ok(None);
        };
        let is_variable = self
            .graph
            .node(target.node)
            .is_some_and(|n| matches!(n.kind, NodeKind::Variable { .. }));
        if !is_variable {
            return Ok(None);
        }

        let node = self.graph.new_binary_operator(operator);
        let rvalue = self.graph.member_ref(node, "rvalue")?;
        self.bind(value, rvalue)?;

        if let Some(previous) = self.graph.incoming_wire(*target).map(|w| w.id) {
            self.graph.disconnect(previous)?;
        }
        let result = self.graph.member_ref(node, RESULT)?;
        self.graph.connect(result, *target)?;
        Ok(Some(Operand::Owned(result)))
    }

    /// Copies a literal into a slot, or wires an owned member to it.
    fn bind(&mut self, operand: &Operand, slot: MemberRef) -> Result<()> {
        match operand {
            Operand::Literal(member) => self.graph.set_member_value(slot, member.value.clone()),
            Operand::Owned(source) => self.graph.connect(*source, slot).map(|_| ()),
        }
    }

    /// Type used for signature lookup: the declared type, or the current
    /// value's type for `any` members.
    fn operand_type(&self, operand: &Operand) -> Result<Type> {
        let member = match operand {
            Operand::Literal(member) => member,
            Operand::Owned(member) => self.graph.member(*member)?,
        };
        Ok(if member.ty.is_any() {
            member.value.value_type()
        } else {
            member.ty
        })
    }
}

/// Parses and updates `code` in a fresh graph, returning the last instruction's value.
///
/// Convenience for tests and one-shot evaluation.
///
/// # Errors
/// Returns any parse or update error.
pub fn eval(language: Arc<Language>, code: &str) -> Result<Value> {
    let mut graph = GraphContainer::new();
    let report = Parser::new(language).eval_code_into_container(code, &mut graph)?;
    graph.update()?;
    match report.instructions.last() {
        Some(last) => Ok(graph.member(graph.member_ref(*last, RESULT)?)?.value.clone()),
        None => Ok(Value::Nil),
    }
}
