//! Structural checks on a token sequence.
//!
//! These run after tokenization and before any node is created, so rejected
//! input never touches the graph.

use nodal_foundation::{Error, Result, SyntaxError};
use nodal_language::{Language, Token, TokenKind};

/// Validates brackets and operator placement.
///
/// # Errors
/// Returns a `Syntax` error for:
/// - a close bracket without an open one
/// - brackets still open at the end
/// - an operator at the end of the input, or right before `;`, a line
///   break, `,`, or `)`
/// - an operator at the start that has no unary form
/// - two operators in a row
pub fn validate(language: &Language, tokens: &[Token]) -> Result<()> {
    let mut open = 0usize;

    if let Some(first) = tokens.first() {
        if first.is_operator() && !language.has_unary_operator(&first.text) {
            return Err(Error::syntax(SyntaxError::LeadingOperator {
                operator: first.text.clone(),
                offset: first.offset,
            }));
        }
    }

    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::OpenBracket => open += 1,
            TokenKind::CloseBracket => {
                if open == 0 {
                    return Err(Error::syntax(SyntaxError::UnexpectedCloseBracket {
                        offset: token.offset,
                    }));
                }
                open -= 1;
            }
            TokenKind::Operator => match tokens.get(index + 1) {
                None => {
                    return Err(Error::syntax(SyntaxError::TrailingOperator {
                        operator: token.text.clone(),
                        offset: token.offset,
                    }));
                }
                Some(next) if ends_operand_list(next.kind) => {
                    return Err(Error::syntax(SyntaxError::TrailingOperator {
                        operator: token.text.clone(),
                        offset: token.offset,
                    }));
                }
                Some(next) if next.is_operator() => {
                    return Err(Error::syntax(SyntaxError::AdjacentOperators {
                        first: token.text.clone(),
                        second: next.text.clone(),
                        offset: next.offset,
                    }));
                }
                Some(_) => {}
            },
            _ => {}
        }
    }

    if open > 0 {
        let offset = tokens.last().map_or(0, |t| t.offset);
        return Err(Error::syntax(SyntaxError::UnbalancedBrackets { open, offset }));
    }
    Ok(())
}

/// Deepest bracket nesting in `tokens`.
#[must_use]
pub fn nesting(tokens: &[Token]) -> usize {
    let mut open = 0usize;
    let mut deepest = 0;
    for token in tokens {
        match token.kind {
            TokenKind::OpenBracket => {
                open += 1;
                deepest = deepest.max(open);
            }
            TokenKind::CloseBracket => open = open.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

fn ends_operand_list(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::EndOfInstruction
            | TokenKind::EndOfLine
            | TokenKind::Separator
            | TokenKind::CloseBracket
    )
}
