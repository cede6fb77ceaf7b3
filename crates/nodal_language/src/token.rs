//! Token types for the Nodal language.
//!
//! Tokens are the output of the tokenizer and input to the parser.

use std::fmt;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The category of this token.
    pub kind: TokenKind,
    /// The literal text (string literals have their quotes stripped).
    pub text: String,
    /// Character offset of the token in the source.
    pub offset: usize,
    /// Ignored text (whitespace, comments, line breaks) following the token.
    pub suffix: String,
}

impl Token {
    /// Creates a new token without suffix.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
            suffix: String::new(),
        }
    }

    /// Sets the suffix of this token.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Returns true if this token is an operator.
    #[must_use]
    pub fn is_operator(&self) -> bool {
        self.kind == TokenKind::Operator
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "\"{}\"", self.text),
            TokenKind::EndOfLine => f.write_str("<eol>"),
            _ => f.write_str(&self.text),
        }
    }
}

/// Token categories of the Nodal language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An operator like `+` or `=`.
    Operator,
    /// An identifier like `foo` or `sin`.
    Symbol,
    /// A numeric literal like `42` or `1.5`.
    Number,
    /// A string literal like `"hello"`.
    String,
    /// `true` or `false`.
    Boolean,
    /// `(`
    OpenBracket,
    /// `)`
    CloseBracket,
    /// `,`
    Separator,
    /// `;`
    EndOfInstruction,
    /// A line break ending an instruction.
    EndOfLine,
    /// Whitespace and comments; never pushed as a token.
    Ignore,
}

impl TokenKind {
    /// Returns true if a token of this kind is folded into the previous token's suffix.
    #[must_use]
    pub const fn is_ignorable(self) -> bool {
        matches!(self, Self::Ignore)
    }

    /// Returns true if this kind is a literal or an identifier.
    #[must_use]
    pub const fn is_atom(self) -> bool {
        matches!(
            self,
            Self::Symbol | Self::Number | Self::String | Self::Boolean
        )
    }

    /// Returns true if a line ending after a token of this kind terminates an instruction.
    #[must_use]
    pub const fn ends_operand(self) -> bool {
        self.is_atom() || matches!(self, Self::CloseBracket)
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Symbol => "symbol",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::OpenBracket => "'('",
            Self::CloseBracket => "')'",
            Self::Separator => "','",
            Self::EndOfInstruction => "';'",
            Self::EndOfLine => "end of line",
            Self::Ignore => "ignored",
        }
    }
}
