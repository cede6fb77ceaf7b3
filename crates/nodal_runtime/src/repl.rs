//! The interactive REPL.
//!
//! Lines starting with `:` are meta commands that inspect or edit the graph;
//! everything else is source code evaluated into the session.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Arc;

use nodal_foundation::{Error, ErrorKind, Result, Value};
use nodal_graph::{GraphContainer, MemberRef, NodeId, WireId};

use crate::editor::{LineEditor, ReadResult, RustylineEditor, open_brackets};
use crate::session::Session;

/// Meta commands with their argument synopsis and summary.
const COMMANDS: &[(&str, &str, &str)] = &[
    (":help", "", "Show this help"),
    (":nodes", "", "List nodes and their members"),
    (":wires", "", "List wires"),
    (":history", "", "List recorded edits (* = applied)"),
    (":undo", "", "Undo the last edit"),
    (":redo", "", "Redo the next edit"),
    (":update", "", "Propagate values through the graph"),
    (":clear", "", "Empty the graph and the history"),
    (":connect", "<node.member> <node.member>", "Wire a source to a target"),
    (":disconnect", "<wire>", "Remove a wire"),
    (":delete", "<node>", "Destroy a node and its wires"),
    (":quit", "", "Exit"),
];

/// What the REPL does after handling one input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Print these lines and keep reading.
    Output(Vec<String>),
    /// Leave the loop.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Language, graph, and history.
    session: Session,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,

    /// Continuation prompt (for multi-line input).
    continuation_prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL over a fresh session and the rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the language or the editor fails to initialize.
    pub fn new() -> Result<Self> {
        let session = Session::new()?;
        let editor = RustylineEditor::new(Arc::clone(session.language()))?;
        Ok(Self::with_editor(editor, session))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor and session.
    pub fn with_editor(mut editor: E, session: Session) -> Self {
        editor.set_keywords(completions(&session));
        Self {
            editor,
            session,
            show_banner: true,
            prompt: "nodal> ".to_string(),
            continuation_prompt: "  ...> ".to_string(),
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Runs the REPL loop until `:quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        while self.read_eval_print()? {}

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let Some(input) = self.read_input()? else {
            return Ok(false);
        };
        if input.trim().is_empty() {
            return Ok(true);
        }
        self.editor.add_history(&input);

        match self.execute(&input) {
            Ok(Outcome::Output(lines)) => {
                for line in lines {
                    println!("{line}");
                }
                Ok(true)
            }
            Ok(Outcome::Quit) => Ok(false),
            Err(e) => {
                print_error(&e);
                Ok(true)
            }
        }
    }

    /// Reads a potentially multi-line input.
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut input = String::new();
        let mut first_line = true;

        loop {
            let read = if first_line {
                self.editor.read_line(&self.prompt)?
            } else {
                self.editor.read_continuation(&self.continuation_prompt)?
            };

            match read {
                ReadResult::Line(line) => {
                    if !first_line {
                        input.push('\n');
                    }
                    input.push_str(&line);
                    if open_brackets(&input) <= 0 {
                        return Ok(Some(input));
                    }
                    first_line = false;
                }
                ReadResult::Interrupted => {
                    if !first_line {
                        println!("\nInput cancelled.");
                    }
                    return Ok(Some(String::new()));
                }
                ReadResult::Eof => {
                    if first_line {
                        return Ok(None);
                    }
                    return Err(Error::new(ErrorKind::Internal(
                        "unexpected EOF in multi-line input".to_string(),
                    )));
                }
            }
        }
    }

    /// Handles one complete input: a meta command or source code.
    ///
    /// # Errors
    ///
    /// Returns the evaluation or command error.
    pub fn execute(&mut self, input: &str) -> Result<Outcome> {
        let trimmed = input.trim();
        if trimmed.starts_with(':') {
            let mut words = trimmed.split_whitespace();
            let command = words.next().unwrap_or_default();
            let args: Vec<&str> = words.collect();
            return self.meta(command, &args);
        }

        let values = self.session.eval(input)?;
        Ok(Outcome::Output(values.iter().map(format_value).collect()))
    }

    fn meta(&mut self, command: &str, args: &[&str]) -> Result<Outcome> {
        let lines = match (command, args) {
            (":help", []) => help(),
            (":nodes", []) => list_nodes(self.session.graph()),
            (":wires", []) => self
                .session
                .graph()
                .wires()
                .map(ToString::to_string)
                .collect(),
            (":history", []) => self.history_lines(),
            (":undo", []) => vec![if self.session.undo()? {
                "undone".to_string()
            } else {
                "nothing to undo".to_string()
            }],
            (":redo", []) => vec![if self.session.redo()? {
                "redone".to_string()
            } else {
                "nothing to redo".to_string()
            }],
            (":update", []) => {
                let report = self.session.update()?;
                vec![format!("updated {} nodes", report.evaluated)]
            }
            (":clear", []) => {
                self.session.clear();
                vec!["cleared".to_string()]
            }
            (":connect", [source, target]) => {
                let graph = self.session.graph();
                let source = parse_member(graph, source)?;
                let target = parse_member(graph, target)?;
                let wire = self.session.connect(source, target)?;
                vec![format!("connected {wire}")]
            }
            (":disconnect", [wire]) => {
                let wire = parse_wire(wire)?;
                self.session.disconnect(wire)?;
                vec![format!("disconnected {wire}")]
            }
            (":delete", [node]) => {
                let node = parse_node(node)?;
                self.session.delete_node(node)?;
                vec![format!("deleted {node}")]
            }
            (":quit" | ":q", []) => return Ok(Outcome::Quit),
            _ => match COMMANDS.iter().find(|(name, ..)| *name == command) {
                Some((name, usage, _)) => {
                    return Err(Error::invalid_operation(format!("usage: {name} {usage}")));
                }
                None => {
                    return Err(Error::invalid_operation(format!(
                        "unknown command '{command}' (try :help)"
                    )));
                }
            },
        };
        Ok(Outcome::Output(lines))
    }

    fn history_lines(&self) -> Vec<String> {
        let history = self.session.history();
        (0..history.len())
            .filter_map(|index| {
                let marker = if index < history.cursor() { '*' } else { ' ' };
                let description = history.description_at(index)?;
                Some(format!("{marker} {index:>3}  {description}"))
            })
            .collect()
    }

    /// Prints the welcome banner.
    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!("\x1b[1;36mNodal\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
        println!("Type expressions to evaluate, :help for commands, Ctrl+D to exit.\n");

        let _ = io::stdout().flush();
    }
}

/// Function names, keywords, and meta commands offered for completion.
fn completions(session: &Session) -> Vec<String> {
    let language = session.language();
    let mut words: Vec<String> = language
        .functions()
        .iter()
        .map(|f| f.signature.identifier().to_string())
        .chain(
            language
                .keywords_of(nodal_language::TokenKind::Boolean)
                .into_iter()
                .map(str::to_string),
        )
        .chain(std::iter::once(language.operator_keyword().to_string()))
        .chain(COMMANDS.iter().map(|(name, ..)| (*name).to_string()))
        .collect();
    words.sort();
    words.dedup();
    words
}

fn help() -> Vec<String> {
    let mut lines = vec!["Commands:".to_string()];
    for (name, usage, summary) in COMMANDS {
        let mut line = format!("  {name}");
        if !usage.is_empty() {
            let _ = write!(line, " {usage}");
        }
        lines.push(format!("{line:<44}{summary}"));
    }
    lines.push("Anything else is evaluated as code, e.g. `a = 2 * 3; a + 1`.".to_string());
    lines
}

fn list_nodes(graph: &GraphContainer) -> Vec<String> {
    graph
        .nodes()
        .map(|node| {
            let members: Vec<String> = node.members.iter().map(ToString::to_string).collect();
            if members.is_empty() {
                node.to_string()
            } else {
                format!("{node} [{}]", members.join(", "))
            }
        })
        .collect()
}

/// Parses `#3`, or `3`, into a node id.
fn parse_node(text: &str) -> Result<NodeId> {
    text.trim_start_matches('#')
        .parse()
        .map(NodeId)
        .map_err(|_| Error::invalid_operation(format!("'{text}' is not a node id")))
}

/// Parses `w2`, or `2`, into a wire id.
fn parse_wire(text: &str) -> Result<WireId> {
    text.trim_start_matches('w')
        .parse()
        .map(WireId)
        .map_err(|_| Error::invalid_operation(format!("'{text}' is not a wire id")))
}

/// Parses `#3.result` or `#3.2` (slot index) into a member of `graph`.
fn parse_member(graph: &GraphContainer, text: &str) -> Result<MemberRef> {
    let (node, member) = text
        .split_once('.')
        .ok_or_else(|| Error::invalid_operation(format!("'{text}' is not node.member")))?;
    let node = parse_node(node)?;
    match member.parse::<usize>() {
        Ok(slot) => {
            let member = MemberRef::new(node, slot);
            graph.member(member)?;
            Ok(member)
        }
        Err(_) => graph.member_ref(node, member),
    }
}

fn format_value(value: &Value) -> String {
    format!("\x1b[1m{value}\x1b[0m")
}

fn print_error(error: &Error) {
    eprintln!("\x1b[31mError: {error}\x1b[0m");
}
