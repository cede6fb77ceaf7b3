//! Undo/redo for structural graph edits.
//!
//! This crate provides:
//! - [`Command`] - A reversible graph edit
//! - [`ConnectWire`] / [`DisconnectWire`] - The wire edits
//! - [`History`] - Linear, cursor-addressable command log

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod history;

pub use command::{Command, ConnectWire, DisconnectWire};
pub use history::{History, HistoryConfig};
