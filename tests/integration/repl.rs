//! REPL driven by a scripted editor
//!
//! Tests that the loop evaluates code and meta commands against one session.

use std::collections::VecDeque;

use nodal::foundation::Result;
use nodal::runtime::{LineEditor, Outcome, ReadResult, Repl, Session};

struct ScriptedEditor {
    lines: VecDeque<String>,
    history: Vec<String>,
}

impl ScriptedEditor {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| (*l).to_string()).collect(),
            history: Vec::new(),
        }
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        Ok(self.lines.pop_front().map_or(ReadResult::Eof, ReadResult::Line))
    }

    fn read_continuation(&mut self, prompt: &str) -> Result<ReadResult> {
        self.read_line(prompt)
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }

    fn set_keywords(&mut self, _keywords: Vec<String>) {}
}

#[test]
fn script_builds_graph() {
    let editor = ScriptedEditor::new(&["a = 2", "b = add(", "  a, 3)", ":update", ":quit"]);
    let mut repl = Repl::with_editor(editor, Session::new().unwrap()).without_banner();
    repl.run().unwrap();

    let graph = repl.session().graph();
    let b = graph.variable_member(graph.find_variable("b").unwrap()).unwrap();
    assert_eq!(graph.member(b).unwrap().value.as_number(), Some(5.0));
}

#[test]
fn execute_reports_values_and_commands() {
    let mut repl = Repl::with_editor(ScriptedEditor::new(&[]), Session::new().unwrap());
    match repl.execute("1; 2").unwrap() {
        Outcome::Output(lines) => assert_eq!(lines.len(), 2),
        Outcome::Quit => panic!("unexpected quit"),
    }
    assert_eq!(repl.execute(":quit").unwrap(), Outcome::Quit);
    assert!(repl.execute(":undo").is_ok());
}
