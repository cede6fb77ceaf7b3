//! Token ribbon with a transactional read cursor.
//!
//! The ribbon holds the tokens of one parse session. Speculative grammar
//! alternatives are tried inside transactions: a rollback puts the cursor back
//! where the transaction started, a commit keeps the progress.

use std::fmt;

use nodal_foundation::{Error, ErrorKind, Result};
use tracing::trace;

use crate::token::{Token, TokenKind};

/// Ordered tokens plus a cursor and a stack of saved cursor positions.
#[derive(Clone, Debug, Default)]
pub struct TokenRibbon {
    tokens: Vec<Token>,
    cursor: usize,
    transactions: Vec<usize>,
}

impl TokenRibbon {
    /// Creates an empty ribbon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a token.
    pub fn push(
        &mut self,
        kind: TokenKind,
        text: impl Into<String>,
        offset: usize,
        suffix: impl Into<String>,
    ) {
        self.tokens
            .push(Token::new(kind, text, offset).with_suffix(suffix));
    }

    /// Appends ignored text to the last token's suffix.
    ///
    /// Returns false (and drops the text) if the ribbon is empty.
    pub fn append_suffix(&mut self, text: &str) -> bool {
        match self.tokens.last_mut() {
            Some(last) => {
                last.suffix.push_str(text);
                true
            }
            None => false,
        }
    }

    /// Returns the token at the cursor without advancing.
    ///
    /// # Errors
    /// Returns `OutOfTokens` if the cursor is past the last token.
    pub fn peek(&self) -> Result<&Token> {
        self.tokens
            .get(self.cursor)
            .ok_or_else(|| Error::new(ErrorKind::OutOfTokens))
    }

    /// Returns the token at the cursor and advances past it.
    ///
    /// # Errors
    /// Returns `OutOfTokens` if the cursor is past the last token.
    pub fn eat(&mut self) -> Result<&Token> {
        let index = self.cursor;
        let token = self
            .tokens
            .get(index)
            .ok_or_else(|| Error::new(ErrorKind::OutOfTokens))?;
        trace!(index, token = %token, "eat token");
        self.cursor += 1;
        Ok(token)
    }

    /// Reports whether at least `count` tokens remain after the cursor.
    #[must_use]
    pub fn can_eat(&self, count: usize) -> bool {
        self.cursor + count <= self.tokens.len()
    }

    /// Saves the current cursor on the transaction stack.
    pub fn start_transaction(&mut self) {
        trace!(index = self.cursor, depth = self.transactions.len(), "start transaction");
        self.transactions.push(self.cursor);
    }

    /// Discards the innermost saved cursor, keeping the progress made since.
    ///
    /// # Errors
    /// Returns `TransactionUnderflow` if no transaction is open.
    pub fn commit_transaction(&mut self) -> Result<()> {
        self.transactions
            .pop()
            .ok_or_else(|| Error::new(ErrorKind::TransactionUnderflow))?;
        trace!(index = self.cursor, "commit transaction");
        Ok(())
    }

    /// Restores the cursor saved by the innermost transaction.
    ///
    /// # Errors
    /// Returns `TransactionUnderflow` if no transaction is open.
    pub fn rollback_transaction(&mut self) -> Result<()> {
        self.cursor = self
            .transactions
            .pop()
            .ok_or_else(|| Error::new(ErrorKind::TransactionUnderflow))?;
        trace!(index = self.cursor, "rollback transaction");
        Ok(())
    }

    /// Empties the ribbon and the transaction stack.
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.transactions.clear();
        self.cursor = 0;
    }

    /// Returns the cursor position.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of open transactions.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.transactions.len()
    }

    /// Returns the number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the ribbon holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns all tokens in order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns the last token, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Reassembles the source text from tokens and their suffixes.
    #[must_use]
    pub fn to_source(&self) -> String {
        let mut source = String::new();
        for token in &self.tokens {
            match token.kind {
                TokenKind::String => {
                    source.push('"');
                    source.push_str(&token.text);
                    source.push('"');
                }
                _ => source.push_str(&token.text),
            }
            source.push_str(&token.suffix);
        }
        source
    }
}

impl fmt::Display for TokenRibbon {
    /// Renders tokens with the cursor position shown as `>>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, token) in self.tokens.iter().enumerate() {
            if index == self.cursor {
                f.write_str(">>")?;
            }
            write!(f, "{token} ")?;
        }
        if self.cursor >= self.tokens.len() {
            f.write_str(">>")?;
        }
        f.write_str("<end>")
    }
}
