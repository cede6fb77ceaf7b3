//! Session facade, REPL, and CLI for Nodal.
//!
//! This crate provides:
//! - [`Session`] - One language, parser, graph, and undo history
//! - [`Repl`] - Interactive read-eval-print loop with meta commands
//! - [`LineEditor`] - Line editing abstraction, backed by rustyline
//!
//! # Example
//!
//! ```
//! use nodal_runtime::Session;
//! use nodal_foundation::Value;
//!
//! let mut session = Session::new().unwrap();
//! let values = session.eval("a = 5; a * 2").unwrap();
//! assert_eq!(values, vec![Value::Number(5.0), Value::Number(10.0)]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod editor;
mod highlight;
pub mod repl;
pub mod session;

pub use config::SessionConfig;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::{Outcome, Repl};
pub use session::Session;
