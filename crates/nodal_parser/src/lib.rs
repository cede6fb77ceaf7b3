//! Graph-building parser for Nodal.
//!
//! This crate provides:
//! - [`syntax::validate`] - Structural checks run before any graph is built
//! - [`Parser`] - Precedence-climbing recursive descent that emits graph nodes
//! - [`ParserConfig`] - Parser limits
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use nodal_graph::GraphContainer;
//! use nodal_language::Language;
//! use nodal_parser::Parser;
//!
//! let language = Arc::new(Language::standard().unwrap());
//! let mut parser = Parser::new(language);
//! let mut graph = GraphContainer::new();
//! let report = parser.eval_code_into_container("2 + 3 * 4", &mut graph).unwrap();
//! graph.update().unwrap();
//! assert_eq!(report.instructions.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod parser;
pub mod syntax;

pub use config::ParserConfig;
pub use parser::{EvalReport, Parser, eval};
