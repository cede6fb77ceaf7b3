//! Integration tests for the undo/redo log
//!
//! Tests cursor movement, future truncation, capacity, and seeking.

use std::sync::Arc;

use nodal_graph::{GraphContainer, MemberRef};
use nodal_history::{Command, ConnectWire, History, HistoryConfig};
use nodal_language::Language;
use proptest::prelude::*;

/// A variable and `count` free operator inputs it can drive.
fn setup(count: usize) -> (GraphContainer, MemberRef, Vec<MemberRef>) {
    let language = Language::standard().unwrap();
    let mult = language.find_operator("*").unwrap();
    let mut graph = GraphContainer::new();
    let a = graph.new_variable("a").unwrap();
    let source = graph.variable_member(a).unwrap();
    let targets = (0..count)
        .map(|_| {
            let op = graph.new_binary_operator(Arc::clone(mult));
            graph.member_ref(op, "rvalue").unwrap()
        })
        .collect();
    (graph, source, targets)
}

fn connect(source: MemberRef, target: MemberRef) -> Box<dyn Command> {
    Box::new(ConnectWire::new(source, target))
}

#[test]
fn three_connects_undo_redo() {
    let (mut graph, source, targets) = setup(3);
    let mut history = History::new();
    for target in &targets {
        history.add_and_execute(connect(source, *target), &mut graph).unwrap();
    }
    let ids: Vec<_> = graph.wires().map(|w| w.id).collect();

    for expected in (0..3).rev() {
        assert!(history.undo(&mut graph).unwrap());
        assert_eq!(graph.wire_count(), expected);
    }
    assert!(!history.can_undo());

    while history.redo(&mut graph).unwrap() {}
    let redone: Vec<_> = graph.wires().map(|w| w.id).collect();
    assert_eq!(redone, ids);
}

#[test]
fn new_edit_after_undo_drops_redo() {
    let (mut graph, source, targets) = setup(3);
    let mut history = History::new();
    history.add_and_execute(connect(source, targets[0]), &mut graph).unwrap();
    history.add_and_execute(connect(source, targets[1]), &mut graph).unwrap();
    history.undo(&mut graph).unwrap();
    history.undo(&mut graph).unwrap();
    history.add_and_execute(connect(source, targets[2]), &mut graph).unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history.cursor(), 1);
    assert!(!history.redo(&mut graph).unwrap());
    assert_eq!(graph.wire_count(), 1);
}

#[test]
fn capacity_keeps_newest() {
    let (mut graph, source, targets) = setup(4);
    let mut history = History::with_config(HistoryConfig::default().with_capacity(3));
    for target in &targets {
        history.add_and_execute(connect(source, *target), &mut graph).unwrap();
    }
    assert_eq!(history.len(), 3);
    history.seek(0, &mut graph).unwrap();
    // the oldest edit can no longer be undone
    assert_eq!(graph.wire_count(), 1);
    assert!(graph.incoming_wire(targets[0]).is_some());
}

#[test]
fn unbounded_capacity() {
    let (mut graph, source, targets) = setup(8);
    let mut history = History::with_config(HistoryConfig::default().with_capacity(0));
    for target in &targets {
        history.add_and_execute(connect(source, *target), &mut graph).unwrap();
    }
    assert_eq!(history.len(), 8);
}

#[test]
fn descriptions_and_timestamps() {
    let (mut graph, source, targets) = setup(1);
    let mut history = History::new();
    history.add_and_execute(connect(source, targets[0]), &mut graph).unwrap();
    let description = history.description_at(0).unwrap();
    assert!(description.starts_with("Connect"));
    assert!(history.timestamp_at(0).unwrap() <= std::time::SystemTime::now());
    assert!(history.description_at(1).is_none());
}

proptest! {
    /// After any walk of undos and redos, exactly the first `cursor` edits are applied.
    #[test]
    fn cursor_tracks_applied_edits(moves in prop::collection::vec(any::<bool>(), 0..24)) {
        let (mut graph, source, targets) = setup(5);
        let mut history = History::new();
        for target in &targets {
            history.add_and_execute(connect(source, *target), &mut graph).unwrap();
        }
        for undo in moves {
            if undo {
                history.undo(&mut graph).unwrap();
            } else {
                history.redo(&mut graph).unwrap();
            }
            prop_assert_eq!(graph.wire_count(), history.cursor());
            for (index, target) in targets.iter().enumerate() {
                prop_assert_eq!(graph.incoming_wire(*target).is_some(), index < history.cursor());
            }
        }
    }
}
