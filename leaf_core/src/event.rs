use std::fmt::Display;

use serde::Serialize;

use crate::Position;

/// Which inline output syntax produced an [`Event::InlineExpression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InlineKind {
	/// `[[expression]]`, output is escaped.
	Escaped,
	/// `[(expression)]`, output is written as is.
	Unescaped,
}

impl InlineKind {
	pub fn open(self) -> &'static str {
		match self {
			Self::Escaped => "[[",
			Self::Unescaped => "[(",
		}
	}

	pub fn close(self) -> &'static str {
		match self {
			Self::Escaped => "]]",
			Self::Unescaped => ")]",
		}
	}
}

/// A single structural event produced by the tokenizer or a pipeline stage.
///
/// Every variant carries the position of its first significant character.
/// Events are never mutated once they have been emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
#[non_exhaustive]
pub enum Event {
	DocumentStart {
		position: Position,
	},
	DocumentEnd {
		position: Position,
	},
	Text {
		content: String,
		position: Position,
	},
	OpenElementStart {
		name: String,
		position: Position,
	},
	OpenElementEnd {
		name: String,
		position: Position,
	},
	CloseElementStart {
		name: String,
		position: Position,
	},
	CloseElementEnd {
		name: String,
		position: Position,
	},
	StandaloneElementStart {
		name: String,
		/// `true` when written with the `/` marker rather than implied by the
		/// element name.
		minimized: bool,
		position: Position,
	},
	StandaloneElementEnd {
		name: String,
		minimized: bool,
		position: Position,
	},
	Attribute {
		name: String,
		/// The `=` with its surrounding whitespace, empty for value-less
		/// attributes.
		operator: String,
		/// The value including its quotes, if it had any.
		value: String,
		position: Position,
		operator_position: Position,
		value_position: Position,
	},
	InnerWhitespace {
		content: String,
		position: Position,
	},
	Comment {
		content: String,
		/// Position of the opening delimiter.
		position: Position,
		/// Position of the first content character.
		inner: Position,
		/// The full comment including delimiters.
		outer: String,
	},
	DocType {
		content: String,
		position: Position,
	},
	XmlDeclaration {
		content: String,
		position: Position,
	},
	ProcessingInstruction {
		target: String,
		content: String,
		position: Position,
	},
	CData {
		content: String,
		position: Position,
	},
	InlineExpression {
		kind: InlineKind,
		expression: String,
		position: Position,
	},
}

impl Event {
	/// The position of the first character of this event.
	pub fn position(&self) -> Position {
		match self {
			Self::DocumentStart { position }
			| Self::DocumentEnd { position }
			| Self::Text { position, .. }
			| Self::OpenElementStart { position, .. }
			| Self::OpenElementEnd { position, .. }
			| Self::CloseElementStart { position, .. }
			| Self::CloseElementEnd { position, .. }
			| Self::StandaloneElementStart { position, .. }
			| Self::StandaloneElementEnd { position, .. }
			| Self::Attribute { position, .. }
			| Self::InnerWhitespace { position, .. }
			| Self::Comment { position, .. }
			| Self::DocType { position, .. }
			| Self::XmlDeclaration { position, .. }
			| Self::ProcessingInstruction { position, .. }
			| Self::CData { position, .. }
			| Self::InlineExpression { position, .. } => *position,
		}
	}

	/// The short code used in the canonical trace format.
	pub fn code(&self) -> &'static str {
		match self {
			Self::DocumentStart { .. } => "DS",
			Self::DocumentEnd { .. } => "DE",
			Self::Text { .. } => "T",
			Self::OpenElementStart { .. } => "OES",
			Self::OpenElementEnd { .. } => "OEE",
			Self::CloseElementStart { .. } => "CES",
			Self::CloseElementEnd { .. } => "CEE",
			Self::StandaloneElementStart { .. } => "SES",
			Self::StandaloneElementEnd { .. } => "SEE",
			Self::Attribute { .. } => "A",
			Self::InnerWhitespace { .. } => "IWS",
			Self::Comment { .. } => "C",
			Self::DocType { .. } => "DT",
			Self::XmlDeclaration { .. } => "XD",
			Self::ProcessingInstruction { .. } => "PI",
			Self::CData { .. } => "CD",
			Self::InlineExpression {
				kind: InlineKind::Escaped,
				..
			} => "IE",
			Self::InlineExpression {
				kind: InlineKind::Unescaped,
				..
			} => "IU",
		}
	}

	/// The element name for element events.
	pub fn element_name(&self) -> Option<&str> {
		match self {
			Self::OpenElementStart { name, .. }
			| Self::OpenElementEnd { name, .. }
			| Self::CloseElementStart { name, .. }
			| Self::CloseElementEnd { name, .. }
			| Self::StandaloneElementStart { name, .. }
			| Self::StandaloneElementEnd { name, .. } => Some(name.as_str()),
			_ => None,
		}
	}

	pub fn is_document_boundary(&self) -> bool {
		matches!(self, Self::DocumentStart { .. } | Self::DocumentEnd { .. })
	}

	/// `true` for text made only of whitespace (including empty text).
	pub fn is_whitespace_text(&self) -> bool {
		matches!(self, Self::Text { content, .. } if content.chars().all(char::is_whitespace))
	}

	/// The parenthesised content parts, in rendering order.
	pub fn parts(&self) -> Vec<&str> {
		match self {
			Self::DocumentStart { .. } | Self::DocumentEnd { .. } => vec![],
			Self::Text { content, .. }
			| Self::InnerWhitespace { content, .. }
			| Self::Comment { content, .. }
			| Self::DocType { content, .. }
			| Self::XmlDeclaration { content, .. }
			| Self::CData { content, .. } => vec![content.as_str()],
			Self::OpenElementStart { name, .. }
			| Self::OpenElementEnd { name, .. }
			| Self::CloseElementStart { name, .. }
			| Self::CloseElementEnd { name, .. }
			| Self::StandaloneElementStart { name, .. }
			| Self::StandaloneElementEnd { name, .. } => vec![name.as_str()],
			Self::Attribute {
				name,
				operator,
				value,
				..
			} => vec![name.as_str(), operator.as_str(), value.as_str()],
			Self::ProcessingInstruction {
				target, content, ..
			} => vec![target.as_str(), content.as_str()],
			Self::InlineExpression { expression, .. } => vec![expression.as_str()],
		}
	}

	/// Approximate number of source characters this event was read from.
	/// Synthetic events report the length of their rendered content.
	pub fn source_len(&self) -> usize {
		let chars = |value: &str| value.chars().count();

		match self {
			Self::DocumentStart { .. } | Self::DocumentEnd { .. } => 0,
			Self::Text { content, .. } | Self::InnerWhitespace { content, .. } => chars(content),
			Self::OpenElementStart { name, .. }
			| Self::CloseElementStart { name, .. }
			| Self::StandaloneElementStart { name, .. } => chars(name) + 2,
			Self::OpenElementEnd { .. } | Self::CloseElementEnd { .. } => 1,
			Self::StandaloneElementEnd { minimized, .. } => {
				if *minimized {
					2
				} else {
					1
				}
			}
			Self::Attribute {
				name,
				operator,
				value,
				..
			} => chars(name) + chars(operator) + chars(value),
			Self::Comment { outer, .. } => chars(outer),
			Self::DocType { content, .. } => chars(content) + 3,
			Self::XmlDeclaration { content, .. } => chars(content) + 4,
			Self::ProcessingInstruction {
				target, content, ..
			} => chars(target) + chars(content) + 4,
			Self::CData { content, .. } => chars(content) + 12,
			Self::InlineExpression { expression, .. } => chars(expression) + 4,
		}
	}
}

impl Display for Event {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.code())?;

		for part in self.parts() {
			write!(f, "({part})")?;
		}

		write!(f, "{}", self.position())
	}
}
