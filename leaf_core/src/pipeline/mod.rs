//! Event post-processing stages.
//!
//! Every stage implements [`EventHandler`] and forwards zero, one or more
//! events to the handler it wraps. The stage order is fixed:
//!
//! ```text
//! Tokenizer
//!   → CommentDirectives (only when comments are processed)
//!   → InlineExpressions
//!   → ElementBalancer
//!   → caller handler (TraceBuilder or a live consumer)
//! ```
//!
//! Directive promotion runs before inline expression detection so bracket
//! syntax inside directive attribute values is never read as an inline
//! expression.

pub use balance::*;
pub use comments::*;
pub use inline::*;

mod balance;
mod comments;
mod inline;

use crate::Event;
use crate::ParseResult;

/// Receives events one at a time. Both pipeline stages and final consumers
/// implement this.
pub trait EventHandler {
	fn handle(&mut self, event: Event) -> ParseResult<()>;
}

impl<H: EventHandler + ?Sized> EventHandler for &mut H {
	fn handle(&mut self, event: Event) -> ParseResult<()> {
		(**self).handle(event)
	}
}

/// An [`EventHandler`] backed by a closure. See [`from_fn`].
pub struct FromFn<F>(F);

/// Handle events with a closure.
///
/// ```rust
/// use leaf_core::Event;
/// use leaf_core::ParseConfig;
/// use leaf_core::from_fn;
/// use leaf_core::parse;
///
/// let mut names = Vec::new();
/// let mut handler = from_fn(|event: Event| {
/// 	if let Event::OpenElementStart { name, .. } = event {
/// 		names.push(name);
/// 	}
/// 	Ok(())
/// });
///
/// parse("<p><b>hi</b></p>", &ParseConfig::markup(), &mut handler).unwrap();
/// assert_eq!(names, ["p", "b"]);
/// ```
pub fn from_fn<F>(handler: F) -> FromFn<F>
where
	F: FnMut(Event) -> ParseResult<()>,
{
	FromFn(handler)
}

impl<F> EventHandler for FromFn<F>
where
	F: FnMut(Event) -> ParseResult<()>,
{
	fn handle(&mut self, event: Event) -> ParseResult<()> {
		(self.0)(event)
	}
}
