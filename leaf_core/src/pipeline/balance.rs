use crate::Event;
use crate::EventHandler;
use crate::ParseError;
use crate::ParseMode;
use crate::ParseResult;
use crate::Position;

/// What to do with elements that are closed out of order or never closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balancing {
	/// Forward events as written.
	PassThrough,
	/// Mismatched or missing close elements are parse errors.
	Strict,
	/// Close elements the document forgot to close, drop close elements that
	/// match nothing.
	AutoClose,
}

impl Balancing {
	pub fn new(mode: ParseMode, balance_unmatched_tags: bool) -> Self {
		match (mode, balance_unmatched_tags) {
			(_, true) => Self::AutoClose,
			(ParseMode::Text, false) => Self::Strict,
			(ParseMode::Markup, false) => Self::PassThrough,
		}
	}
}

#[derive(Debug)]
struct OpenElement {
	name: String,
	position: Position,
}

/// Tracks open elements and enforces the configured [`Balancing`].
///
/// A close element with an empty name (`[/]`) closes the innermost open
/// element, whatever its name.
pub struct ElementBalancer<H> {
	next: H,
	balancing: Balancing,
	stack: Vec<OpenElement>,
	/// Set between a close element start and end that were dropped.
	dropping: bool,
}

impl<H: EventHandler> ElementBalancer<H> {
	pub fn new(next: H, balancing: Balancing) -> Self {
		Self {
			next,
			balancing,
			stack: Vec::new(),
			dropping: false,
		}
	}

	pub fn into_inner(self) -> H {
		self.next
	}

	fn matches(open: &OpenElement, name: &str) -> bool {
		name.is_empty() || open.name == name
	}

	fn close_synthetic(&mut self, element: OpenElement, position: Position) -> ParseResult<()> {
		tracing::debug!(name = %element.name, %position, "auto-closing element");

		self.next.handle(Event::CloseElementStart {
			name: element.name.clone(),
			position,
		})?;
		self.next.handle(Event::CloseElementEnd {
			name: element.name,
			position,
		})
	}

	fn close_start(&mut self, name: String, position: Position) -> ParseResult<()> {
		match self.balancing {
			Balancing::PassThrough => {}
			Balancing::Strict => {
				match self.stack.pop() {
					Some(open) if Self::matches(&open, &name) => {}
					Some(open) => {
						return Err(ParseError::MismatchedElement {
							expected: open.name,
							found: name,
							position,
						});
					}
					None => {
						return Err(ParseError::syntax(
							format!("closing element `{name}` has no matching open element"),
							position,
						));
					}
				}
			}
			Balancing::AutoClose => {
				let Some(index) = self
					.stack
					.iter()
					.rposition(|open| Self::matches(open, &name))
				else {
					tracing::debug!(%name, %position, "dropping unmatched closing element");
					self.dropping = true;
					return Ok(());
				};

				while self.stack.len() > index + 1 {
					if let Some(open) = self.stack.pop() {
						self.close_synthetic(open, position)?;
					}
				}
				self.stack.pop();
			}
		}

		self.next.handle(Event::CloseElementStart { name, position })
	}

	fn document_end(&mut self, position: Position) -> ParseResult<()> {
		match self.balancing {
			Balancing::PassThrough => {}
			Balancing::Strict => {
				if let Some(open) = self.stack.last() {
					return Err(ParseError::syntax(
						format!(
							"element `{}` opened at {} is never closed",
							open.name, open.position
						),
						None,
					));
				}
			}
			Balancing::AutoClose => {
				while let Some(open) = self.stack.pop() {
					self.close_synthetic(open, position)?;
				}
			}
		}

		self.next.handle(Event::DocumentEnd { position })
	}
}

impl<H: EventHandler> EventHandler for ElementBalancer<H> {
	fn handle(&mut self, event: Event) -> ParseResult<()> {
		if self.dropping {
			if matches!(event, Event::CloseElementEnd { .. }) {
				self.dropping = false;
			}
			return Ok(());
		}

		match event {
			Event::OpenElementStart { name, position } => {
				if !matches!(self.balancing, Balancing::PassThrough) {
					self.stack.push(OpenElement {
						name: name.clone(),
						position,
					});
				}
				self.next.handle(Event::OpenElementStart { name, position })
			}
			Event::CloseElementStart { name, position } => self.close_start(name, position),
			Event::DocumentEnd { position } => self.document_end(position),
			other => self.next.handle(other),
		}
	}
}
