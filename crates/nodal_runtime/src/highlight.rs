//! Syntax highlighting for the REPL.

use std::borrow::Cow;
use std::sync::Arc;

use nodal_language::{Language, TokenKind, TokenRibbon, Tokenizer};

/// Colors a line by running it through the language's tokenizer.
pub struct NodalHighlighter {
    language: Arc<Language>,
}

impl NodalHighlighter {
    /// Creates a highlighter for `language`.
    pub fn new(language: Arc<Language>) -> Self {
        Self { language }
    }

    /// Highlights a line of input. Lines that fail to tokenize, and meta
    /// commands, are returned unchanged.
    pub fn highlight<'l>(&self, line: &'l str) -> Cow<'l, str> {
        if line.trim_start().starts_with(':') {
            return Cow::Borrowed(line);
        }
        let mut ribbon = TokenRibbon::new();
        if Tokenizer::new(&self.language)
            .tokenize(line, &mut ribbon)
            .is_err()
        {
            return Cow::Borrowed(line);
        }

        let Some(first) = ribbon.tokens().first() else {
            return Cow::Borrowed(line);
        };

        let mut result = String::with_capacity(line.len() * 2);
        result.extend(line.chars().take(first.offset));
        for token in ribbon.tokens() {
            match color(token.kind) {
                Some(code) => {
                    result.push_str(code);
                    result.push_str(&token.to_string());
                    result.push_str("\x1b[0m");
                }
                None => result.push_str(&token.to_string()),
            }
            push_suffix(&mut result, &token.suffix);
        }
        Cow::Owned(result)
    }
}

fn color(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Number | TokenKind::Boolean => Some("\x1b[35m"), // magenta
        TokenKind::String => Some("\x1b[33m"),                      // yellow
        TokenKind::Operator => Some("\x1b[36m"),                    // cyan
        TokenKind::OpenBracket | TokenKind::CloseBracket => Some("\x1b[2m"),
        _ => None,
    }
}

/// Comments in a suffix are dimmed.
fn push_suffix(result: &mut String, suffix: &str) {
    match suffix.find("//") {
        Some(start) => {
            result.push_str(&suffix[..start]);
            result.push_str("\x1b[2;3m");
            result.push_str(&suffix[start..]);
            result.push_str("\x1b[0m");
        }
        None => result.push_str(suffix),
    }
}
