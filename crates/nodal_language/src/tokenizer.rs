//! Tokenizer driven by a language's ordered regex rules.
//!
//! At each position the rules are tried in registration order and the first
//! non-empty match wins. Ignorable matches are folded into the previous
//! token's suffix so the source can be reassembled from the ribbon.

use nodal_foundation::{Error, Result};
use tracing::debug;

use crate::registry::Language;
use crate::ribbon::TokenRibbon;
use crate::token::TokenKind;

/// Longest fragment quoted in a tokenize error.
const FRAGMENT_LEN: usize = 16;

/// Turns source text into tokens on a [`TokenRibbon`].
#[derive(Clone, Copy, Debug)]
pub struct Tokenizer<'a> {
    language: &'a Language,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer for the given language.
    #[must_use]
    pub const fn new(language: &'a Language) -> Self {
        Self { language }
    }

    /// Tokenizes a whole source text, line by line.
    ///
    /// A line break becomes an `EndOfLine` token only when the previous line
    /// ended on a complete operand; otherwise it is kept as suffix text.
    ///
    /// # Errors
    /// Returns a `Tokenize` error at the first unrecognized character.
    pub fn tokenize(&self, source: &str, ribbon: &mut TokenRibbon) -> Result<()> {
        let eol = self.language.end_of_line();
        let eol_chars = eol.chars().count();
        let mut offset = 0;
        for (index, line) in source.split(eol).enumerate() {
            if index > 0 {
                self.push_line_break(offset - eol_chars, ribbon);
            }
            self.tokenize_line(line, offset, ribbon)?;
            offset += line.chars().count() + eol_chars;
        }
        debug!(tokens = ribbon.len(), "tokenized source");
        Ok(())
    }

    /// Tokenizes a single line whose first character sits at `base_offset` in
    /// the source.
    ///
    /// Offsets count characters, not bytes.
    ///
    /// # Errors
    /// Returns a `Tokenize` error at the first unrecognized character.
    pub fn tokenize_line(
        &self,
        line: &str,
        base_offset: usize,
        ribbon: &mut TokenRibbon,
    ) -> Result<()> {
        let mut position = 0;
        let mut column = base_offset;
        while position < line.len() {
            let rest = &line[position..];
            let Some((kind, len)) = self.match_rule(rest) else {
                let fragment: String = rest.chars().take(FRAGMENT_LEN).collect();
                return Err(Error::tokenize(column, fragment));
            };
            let text = &rest[..len];
            match kind {
                TokenKind::Ignore => {
                    ribbon.append_suffix(text);
                }
                TokenKind::String => {
                    let inner = text
                        .strip_prefix('"')
                        .and_then(|t| t.strip_suffix('"'))
                        .unwrap_or(text);
                    ribbon.push(kind, inner, column, "");
                }
                _ => ribbon.push(kind, text, column, ""),
            }
            position += len;
            column += text.chars().count();
        }
        Ok(())
    }

    fn match_rule(&self, rest: &str) -> Option<(TokenKind, usize)> {
        self.language.rules().iter().find_map(|rule| {
            rule.regex
                .find(rest)
                .filter(|m| m.start() == 0 && !m.is_empty())
                .map(|m| (rule.kind, m.end()))
        })
    }

    fn push_line_break(&self, offset: usize, ribbon: &mut TokenRibbon) {
        let eol = self.language.end_of_line();
        let ends_instruction = ribbon
            .last()
            .is_some_and(|token| token.kind.ends_operand());
        if ends_instruction {
            ribbon.push(TokenKind::EndOfLine, eol, offset, "");
        } else {
            ribbon.append_suffix(eol);
        }
    }
}
