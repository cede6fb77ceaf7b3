//! Terminal input for the REPL.
//!
//! The REPL reads through the [`LineEditor`] trait. [`RustylineEditor`] backs
//! it with a real terminal; tests script it from memory.

use std::borrow::Cow;
use std::sync::Arc;

use nodal_foundation::{Error, ErrorKind, Result};
use nodal_language::Language;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Completer, Config, Context, Editor, Helper, Hinter, Validator as RLValidator};

use crate::highlight::NodalHighlighter;

const HISTORY_LIMIT: usize = 1000;

/// One read from the terminal.
#[derive(Debug)]
pub enum ReadResult {
    /// Text entered by the user.
    Line(String),
    /// Ctrl+C.
    Interrupted,
    /// Ctrl+D.
    Eof,
}

/// Source of REPL input.
pub trait LineEditor {
    /// Shows `prompt` and reads one line.
    ///
    /// # Errors
    ///
    /// Returns `Internal` when the terminal cannot be read.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Reads a line that continues an unfinished input.
    ///
    /// # Errors
    ///
    /// Returns `Internal` when the terminal cannot be read.
    fn read_continuation(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Records a submitted input.
    fn add_history(&mut self, line: &str);

    /// Replaces the words offered for tab completion.
    fn set_keywords(&mut self, keywords: Vec<String>);
}

#[derive(Helper, Completer, Hinter, RLValidator)]
struct NodalHelper {
    #[rustyline(Completer)]
    completer: WordCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
    #[rustyline(Validator)]
    validator: BracketValidator,
    highlighter: NodalHighlighter,
}

impl Highlighter for NodalHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if !default {
            return Cow::Borrowed(prompt);
        }
        Cow::Owned(format!("\x1b[1;34m{prompt}\x1b[0m"))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[90m{hint}\x1b[0m"))
    }
}

/// Offers function names, keywords, and meta commands for the word under the cursor.
struct WordCompleter {
    keywords: Vec<String>,
}

impl WordCompleter {
    fn word_start(line: &str) -> usize {
        line.char_indices()
            .rev()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_' || *c == ':'))
            .map_or(0, |(i, c)| i + c.len_utf8())
    }
}

impl Completer for WordCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let in_string = before.matches('"').count() % 2 == 1;
        let start = Self::word_start(before);
        let prefix = &before[start..];
        if prefix.is_empty() || in_string {
            return Ok((pos, Vec::new()));
        }

        let pairs = self
            .keywords
            .iter()
            .filter(|word| word.starts_with(prefix))
            .map(|word| Pair {
                display: word.clone(),
                replacement: word.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

/// Asks for another line while `(` is unbalanced.
struct BracketValidator;

impl Validator for BracketValidator {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        let result = match open_brackets(ctx.input()) {
            depth if depth > 0 => ValidationResult::Incomplete,
            _ => ValidationResult::Valid(None),
        };
        Ok(result)
    }
}

/// Net count of `(` over `)`, skipping string literals and `//` comments.
pub(crate) fn open_brackets(input: &str) -> i32 {
    let mut depth = 0;
    for line in input.lines() {
        let mut quoted = false;
        let mut previous = None;
        for c in line.chars() {
            match c {
                '"' => quoted = !quoted,
                '/' if !quoted && previous == Some('/') => break,
                '(' if !quoted => depth += 1,
                ')' if !quoted => depth -= 1,
                _ => {}
            }
            previous = Some(c);
        }
    }
    depth
}

fn terminal_error(err: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::Internal(err.to_string()))
}

/// [`LineEditor`] over a rustyline terminal.
pub struct RustylineEditor {
    editor: Editor<NodalHelper, DefaultHistory>,
}

impl RustylineEditor {
    /// Opens the terminal with highlighting for `language`.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the terminal cannot be set up.
    pub fn new(language: Arc<Language>) -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(HISTORY_LIMIT)
            .map_err(terminal_error)?
            .build();
        let mut editor = Editor::with_config(config).map_err(terminal_error)?;
        editor.set_helper(Some(NodalHelper {
            completer: WordCompleter {
                keywords: Vec::new(),
            },
            hinter: HistoryHinter::new(),
            validator: BracketValidator,
            highlighter: NodalHighlighter::new(language),
        }));
        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(text) => Ok(ReadResult::Line(text)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(other) => Err(terminal_error(other)),
        }
    }

    fn read_continuation(&mut self, prompt: &str) -> Result<ReadResult> {
        self.read_line(prompt)
    }

    fn add_history(&mut self, line: &str) {
        // a rejected entry (duplicate or blank) is not an error
        let _ = self.editor.add_history_entry(line);
    }

    fn set_keywords(&mut self, keywords: Vec<String>) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.completer.keywords = keywords;
        }
    }
}
