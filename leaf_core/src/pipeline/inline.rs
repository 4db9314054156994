use crate::Event;
use crate::EventHandler;
use crate::InlineKind;
use crate::ParseResult;
use crate::Position;

/// Splits text events around inline output expressions, `[[...]]` and
/// `[(...)]`.
///
/// Only text is scanned. An opening marker without its closing marker is
/// left as text.
pub struct InlineExpressions<H> {
	next: H,
}

impl<H: EventHandler> InlineExpressions<H> {
	pub fn new(next: H) -> Self {
		Self { next }
	}

	pub fn into_inner(self) -> H {
		self.next
	}

	fn split(&mut self, content: &str, position: Position) -> ParseResult<()> {
		let mut rest = content;
		let mut position = position;
		let mut text = String::new();
		let mut text_position = position;

		while !rest.is_empty() {
			if let Some((kind, expression)) = inline_at(rest) {
				if !text.is_empty() {
					self.next.handle(Event::Text {
						content: std::mem::take(&mut text),
						position: text_position,
					})?;
				}

				let consumed = kind.open().len() + expression.len() + kind.close().len();
				self.next.handle(Event::InlineExpression {
					kind,
					expression: expression.to_string(),
					position,
				})?;

				position.advance_str(&rest[..consumed]);
				rest = &rest[consumed..];
				continue;
			}

			let Some(ch) = rest.chars().next() else {
				break;
			};

			if text.is_empty() {
				text_position = position;
			}
			text.push(ch);
			position.advance(ch);
			rest = &rest[ch.len_utf8()..];
		}

		if text.is_empty() {
			return Ok(());
		}

		self.next.handle(Event::Text {
			content: text,
			position: text_position,
		})
	}
}

/// The inline expression starting at the beginning of `value`, if any.
fn inline_at(value: &str) -> Option<(InlineKind, &str)> {
	[InlineKind::Escaped, InlineKind::Unescaped]
		.into_iter()
		.find_map(|kind| {
			let body = value.strip_prefix(kind.open())?;
			let end = body.find(kind.close())?;
			Some((kind, &body[..end]))
		})
}

impl<H: EventHandler> EventHandler for InlineExpressions<H> {
	fn handle(&mut self, event: Event) -> ParseResult<()> {
		match event {
			Event::Text { content, position }
				if content.contains(InlineKind::Escaped.open())
					|| content.contains(InlineKind::Unescaped.open()) =>
			{
				self.split(&content, position)
			}
			other => self.next.handle(other),
		}
	}
}
