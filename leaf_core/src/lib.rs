//! `leaf_core` is the parsing core of the leaf template engine. It turns
//! markup and text templates into a stream of structural events with exact
//! line and column positions, and compares two documents structurally.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Character stream (string slice or any io::Read)
//!   → CharReader (rolling buffer, lookahead, line/column tracking)
//!   → Tokenizer (text, elements, attributes, comments, doctype, CDATA)
//!   → CommentDirectives (promotes `/*[#name]*/` style directives)
//!   → InlineExpressions (splits `[[...]]` and `[(...)]` out of text)
//!   → ElementBalancer (strict matching or auto-closing)
//!   → EventHandler (TraceBuilder, or any streaming consumer)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Parse and compare options, loaded from `leaf.toml`.
//! - [`reader`]: Character sources and the buffered reader.
//! - [`pipeline`]: Event handler trait and post-processing stages.
//!
//! ## Key Types
//!
//! - [`Event`]: A structural event with its position.
//! - [`Trace`]: The ordered events of one document, rendering to the
//!   canonical trace format such as `[OES(p){1,1}OEE(p){1,3}]`.
//! - [`Comparator`]: Strict or lenient structural comparison.
//! - [`ParseConfig`]: Mode, comment processing, balancing and buffer size.
//!
//! ## Quick Start
//!
//! ```rust
//! use leaf_core::ParseConfig;
//! use leaf_core::compare;
//! use leaf_core::parse_trace;
//!
//! let trace = parse_trace("[#hello/]", &ParseConfig::text()).unwrap();
//! assert_eq!(trace.to_string(), "[SES(hello){1,1}SEE(hello){1,8}]");
//!
//! let result = compare("<p a=\"1\" b=\"2\">x</p>", "<p b=\"2\" a=\"1\">x</p>", true).unwrap();
//! assert!(result.is_match());
//! ```

pub use compare::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use parser::*;
pub use pipeline::*;
pub use position::*;
pub use reader::*;
pub use tokenizer::*;
pub use trace::*;

mod compare;
pub mod config;
#[allow(unused_assignments)]
mod error;
mod event;
mod parser;
pub mod pipeline;
mod position;
pub mod reader;
mod tokenizer;
mod trace;

#[cfg(test)]
mod __fixtures;
