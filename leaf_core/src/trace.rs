use std::fmt::Display;

use derive_more::Deref;
use serde::Serialize;

use crate::Event;
use crate::EventHandler;
use crate::ParseError;
use crate::ParseResult;

/// The complete, ordered list of events produced by parsing one document.
///
/// Renders to the canonical trace string, e.g. `[OES(p){1,1}OEE(p){1,3}]`.
/// Document start and end events are part of the trace but not of its
/// rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deref)]
#[serde(transparent)]
pub struct Trace(Vec<Event>);

impl Trace {
	pub fn events(&self) -> &[Event] {
		&self.0
	}

	pub fn into_events(self) -> Vec<Event> {
		self.0
	}
}

impl Display for Trace {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "[")?;

		for event in self.0.iter().filter(|event| !event.is_document_boundary()) {
			write!(f, "{event}")?;
		}

		write!(f, "]")
	}
}

/// Collects events into a [`Trace`].
#[derive(Debug, Default)]
pub struct TraceBuilder {
	events: Vec<Event>,
	finished: bool,
}

impl TraceBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// The finished trace. Fails if the document end was never received.
	pub fn finish(self) -> ParseResult<Trace> {
		if !self.finished {
			return Err(ParseError::Incomplete);
		}

		Ok(Trace(self.events))
	}
}

impl EventHandler for TraceBuilder {
	fn handle(&mut self, event: Event) -> ParseResult<()> {
		if matches!(event, Event::DocumentEnd { .. }) {
			self.finished = true;
		}

		self.events.push(event);
		Ok(())
	}
}
