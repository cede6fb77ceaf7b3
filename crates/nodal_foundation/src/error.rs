//! Error types for the Nodal system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::types::Type;

/// The main error type for Nodal operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a tokenization error at the given character offset.
    #[must_use]
    pub fn tokenize(offset: usize, fragment: impl Into<String>) -> Self {
        Self::new(ErrorKind::Tokenize {
            offset,
            fragment: fragment.into(),
        })
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(error: SyntaxError) -> Self {
        Self::new(ErrorKind::Syntax(error))
    }

    /// Creates a parse error at the given character offset.
    #[must_use]
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse {
            offset,
            message: message.into(),
        })
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates a node not found error.
    #[must_use]
    pub fn node_not_found(node: impl fmt::Display) -> Self {
        Self::new(ErrorKind::NodeNotFound(node.to_string()))
    }

    /// Creates a wire not found error.
    #[must_use]
    pub fn wire_not_found(wire: impl fmt::Display) -> Self {
        Self::new(ErrorKind::WireNotFound(wire.to_string()))
    }

    /// Creates a member not found error.
    #[must_use]
    pub fn member_not_found(member: impl fmt::Display) -> Self {
        Self::new(ErrorKind::MemberNotFound(member.to_string()))
    }

    /// Creates an invalid connection error.
    #[must_use]
    pub fn invalid_connection(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConnection(reason.into()))
    }

    /// Creates an invalid operation error.
    #[must_use]
    pub fn invalid_operation(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOperation(reason.into()))
    }

    /// Creates a cycle detected error.
    #[must_use]
    pub fn cycle_detected(node: impl fmt::Display) -> Self {
        Self::new(ErrorKind::CycleDetected {
            node: node.to_string(),
        })
    }

    /// Creates an arity mismatch error.
    #[must_use]
    pub fn arity_mismatch(expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch { expected, actual })
    }

    /// Returns the character offset carried by this error, if any.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match &self.kind {
            ErrorKind::Tokenize { offset, .. } | ErrorKind::Parse { offset, .. } => Some(*offset),
            ErrorKind::Syntax(syntax) => Some(syntax.offset()),
            _ => self.context.as_ref().and_then(|ctx| ctx.offset),
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// No token rule matched at some character offset.
    #[error("unrecognized token at offset {offset}: {fragment:?}")]
    Tokenize {
        /// Character offset in the source where tokenization failed.
        offset: usize,
        /// The text starting at the failing offset.
        fragment: String,
    },

    /// Structural syntax validation failed before any graph was built.
    #[error("syntax error: {0}")]
    Syntax(SyntaxError),

    /// The token stream could not be turned into a scope.
    #[error("parse error at offset {offset}: {message}")]
    Parse {
        /// Character offset of the first token that could not be consumed.
        offset: usize,
        /// Description of the failure.
        message: String,
    },

    /// A token was requested past the end of the ribbon.
    #[error("out of tokens")]
    OutOfTokens,

    /// A transaction was resolved while none was open.
    #[error("no open transaction")]
    TransactionUnderflow,

    /// Recursive descent went deeper than the configured limit.
    #[error("expression nesting exceeds depth limit ({limit})")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// Node is not registered in the graph.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Wire is not registered in the graph.
    #[error("wire not found: {0}")]
    WireNotFound(String),

    /// Member does not exist on its node.
    #[error("member not found: {0}")]
    MemberNotFound(String),

    /// Connection between two members was rejected.
    #[error("invalid connection: {0}")]
    InvalidConnection(String),

    /// The target member already has an incoming wire.
    #[error("target already connected: {0}")]
    TargetAlreadyConnected(String),

    /// The graph contains a dependency cycle.
    #[error("cycle detected at {node}")]
    CycleDetected {
        /// A node taking part in the cycle.
        node: String,
    },

    /// Type mismatch during evaluation.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: Type,
        /// The actual type encountered.
        actual: Type,
    },

    /// Wrong number of arguments to a function body.
    #[error("arity mismatch: expected {expected}, got {actual}")]
    ArityMismatch {
        /// Expected argument count.
        expected: usize,
        /// Actual argument count.
        actual: usize,
    },

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The operation is not allowed on its target.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Reasons the structural syntax check can reject a token sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxError {
    /// A close bracket appeared with no matching open bracket.
    UnexpectedCloseBracket {
        /// Offset of the close bracket.
        offset: usize,
    },
    /// Brackets were still open at the end of input.
    UnbalancedBrackets {
        /// Number of brackets left open.
        open: usize,
        /// Offset of the last token.
        offset: usize,
    },
    /// The input ended with an operator.
    TrailingOperator {
        /// The operator text.
        operator: String,
        /// Offset of the operator.
        offset: usize,
    },
    /// The input started with an operator that has no unary form.
    LeadingOperator {
        /// The operator text.
        operator: String,
        /// Offset of the operator.
        offset: usize,
    },
    /// Two operators followed each other.
    AdjacentOperators {
        /// The first operator.
        first: String,
        /// The second operator.
        second: String,
        /// Offset of the second operator.
        offset: usize,
    },
}

impl SyntaxError {
    /// Returns the offset the error points at.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::UnexpectedCloseBracket { offset }
            | Self::UnbalancedBrackets { offset, .. }
            | Self::TrailingOperator { offset, .. }
            | Self::LeadingOperator { offset, .. }
            | Self::AdjacentOperators { offset, .. } => *offset,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCloseBracket { offset } => {
                write!(f, "unexpected ')' at offset {offset}")
            }
            Self::UnbalancedBrackets { open, .. } => {
                write!(f, "bracket count mismatch, {open} still open")
            }
            Self::TrailingOperator { operator, .. } => {
                write!(f, "an expression can't end with '{operator}'")
            }
            Self::LeadingOperator { operator, .. } => {
                write!(f, "an expression can't start with '{operator}'")
            }
            Self::AdjacentOperators { first, second, .. } => {
                write!(f, "unexpected '{second}' after '{first}'")
            }
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source label (e.g. "repl" or a line of code).
    pub source: Option<String>,
    /// Character offset in source.
    pub offset: Option<usize>,
    /// Stack of productions or commands that were active.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source label.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the character offset.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let Some(offset) = self.offset {
                write!(f, ":{offset}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
