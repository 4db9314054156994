//! Structural comparison of two documents.
//!
//! Both documents are parsed into traces and walked in lock-step. In strict
//! mode every event must match exactly. In lenient mode each trace is first
//! normalized (on a copy) so formatting-only differences disappear:
//!
//! - whitespace runs inside text compare as a single space;
//! - whitespace-only text is dropped at the start of the document, at its
//!   end, and between two block element boundaries;
//! - attributes of one element are sorted by name;
//! - whitespace between attributes is ignored;
//! - the first text after the prolog has its leading whitespace trimmed.
//!
//! Normalization treats both documents the same way, so a document always
//! matches itself. Mismatch positions are still taken from the actual
//! document.

use std::fmt::Display;

use serde::Serialize;

use crate::CompareConfig;
use crate::CompareError;
use crate::Event;
use crate::ParseConfig;
use crate::Position;
use crate::Trace;
use crate::parse_trace;

/// Elements whose surrounding whitespace is not significant.
pub const BLOCK_ELEMENTS: &[&str] = &[
	"address", "article", "aside", "base", "blockquote", "body", "caption", "col", "colgroup",
	"dd", "details", "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer",
	"form", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "li",
	"link", "main", "meta", "nav", "ol", "option", "p", "pre", "section", "table", "tbody", "td",
	"tfoot", "th", "thead", "title", "tr", "ul",
];

/// Returns `true` when `name` is one of the [`BLOCK_ELEMENTS`], ignoring
/// ASCII case.
pub fn is_block_element(name: &str) -> bool {
	BLOCK_ELEMENTS
		.iter()
		.any(|block| block.eq_ignore_ascii_case(name))
}

/// Replace every run of whitespace with a single space.
pub fn collapse_whitespace(value: &str) -> String {
	let mut collapsed = String::with_capacity(value.len());
	let mut in_whitespace = false;

	for ch in value.chars() {
		if ch.is_whitespace() {
			if !in_whitespace {
				collapsed.push(' ');
			}
			in_whitespace = true;
		} else {
			collapsed.push(ch);
			in_whitespace = false;
		}
	}

	collapsed
}

/// The outcome of a comparison. A difference is a normal result, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum Comparison {
	Match,
	Mismatch(Mismatch),
}

impl Comparison {
	pub fn is_match(&self) -> bool {
		matches!(self, Self::Match)
	}

	pub fn mismatch(&self) -> Option<&Mismatch> {
		match self {
			Self::Match => None,
			Self::Mismatch(mismatch) => Some(mismatch),
		}
	}
}

/// Where two documents first differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mismatch {
	/// Text of the expected input around the offending event.
	pub expected_fragment: String,
	/// Text of the actual input around the offending event.
	pub actual_fragment: String,
	/// 1-indexed line of the mismatch in the actual input.
	pub line: usize,
	/// 1-indexed column of the mismatch in the actual input.
	pub column: usize,
	/// The expected event, `None` when the expected trace ended first.
	pub expected_event: Option<Event>,
	/// The actual event, `None` when the actual trace ended first.
	pub actual_event: Option<Event>,
}

impl Display for Mismatch {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let describe = |event: &Option<Event>| {
			event
				.as_ref()
				.map_or_else(|| "end of document".to_string(), ToString::to_string)
		};

		write!(
			f,
			"documents differ at line {}, column {}: expected {} in `{}` but found {} in `{}`",
			self.line,
			self.column,
			describe(&self.expected_event),
			self.expected_fragment,
			describe(&self.actual_event),
			self.actual_fragment,
		)
	}
}

/// Compares documents structurally.
#[derive(Debug, Clone, Default)]
pub struct Comparator {
	config: CompareConfig,
	parse: ParseConfig,
}

impl Comparator {
	pub fn new(config: CompareConfig) -> Self {
		Self {
			config,
			parse: ParseConfig::markup(),
		}
	}

	pub fn strict() -> Self {
		Self::new(CompareConfig {
			lenient: false,
			..CompareConfig::default()
		})
	}

	pub fn lenient() -> Self {
		Self::new(CompareConfig {
			lenient: true,
			..CompareConfig::default()
		})
	}

	/// Parse both documents with `parse` instead of plain markup.
	#[must_use]
	pub fn with_parse_config(mut self, parse: ParseConfig) -> Self {
		self.parse = parse;
		self
	}

	/// Compare two documents. Fails only when one of them cannot be parsed.
	pub fn compare(&self, expected: &str, actual: &str) -> Result<Comparison, CompareError> {
		let expected_trace = parse_trace(expected, &self.parse).map_err(CompareError::Expected)?;
		let actual_trace = parse_trace(actual, &self.parse).map_err(CompareError::Actual)?;

		Ok(self.compare_traces(expected, &expected_trace, actual, &actual_trace))
	}

	/// Compare already parsed traces. `expected` and `actual` are the inputs
	/// the traces were parsed from, used for the mismatch fragments.
	pub fn compare_traces(
		&self,
		expected: &str,
		expected_trace: &Trace,
		actual: &str,
		actual_trace: &Trace,
	) -> Comparison {
		let lenient = self.config.lenient;
		let (expected_events, actual_events) = if lenient {
			(
				normalize(expected_trace),
				normalize(actual_trace),
			)
		} else {
			(expected_trace.to_vec(), actual_trace.to_vec())
		};

		let length = expected_events.len().max(actual_events.len());

		for index in 0..length {
			let expected_event = expected_events.get(index);
			let actual_event = actual_events.get(index);

			if let (Some(left), Some(right)) = (expected_event, actual_event) {
				if events_match(left, right, lenient) {
					continue;
				}
			}

			let position = actual_event
				.or(expected_event)
				.map_or(Position::START, Event::position);
			tracing::debug!(index, %position, lenient, "documents differ");

			return Comparison::Mismatch(Mismatch {
				expected_fragment: fragment(expected, expected_event, self.config.context),
				actual_fragment: fragment(actual, actual_event, self.config.context),
				line: position.line,
				column: position.column,
				expected_event: expected_event.cloned(),
				actual_event: actual_event.cloned(),
			});
		}

		Comparison::Match
	}
}

/// Compare two markup documents with the default context size.
pub fn compare(expected: &str, actual: &str, lenient: bool) -> Result<Comparison, CompareError> {
	Comparator::new(CompareConfig {
		lenient,
		..CompareConfig::default()
	})
	.compare(expected, actual)
}

/// A window of `source` covering `event` and `context` characters on each
/// side.
fn fragment(source: &str, event: Option<&Event>, context: usize) -> String {
	let Some(event) = event else {
		return String::new();
	};
	let total = source.chars().count();
	let offset = event.position().to_offset(source).unwrap_or(total);
	let start = offset.saturating_sub(context);
	let end = offset
		.saturating_add(event.source_len())
		.saturating_add(context)
		.min(total);

	source
		.chars()
		.skip(start)
		.take(end.saturating_sub(start))
		.collect()
}

fn ends_block_boundary(event: Option<&Event>) -> bool {
	matches!(
		event,
		Some(
			Event::OpenElementEnd { name, .. }
				| Event::CloseElementEnd { name, .. }
				| Event::StandaloneElementEnd { name, .. }
		) if is_block_element(name)
	)
}

fn starts_block_boundary(event: Option<&Event>) -> bool {
	matches!(
		event,
		Some(
			Event::OpenElementStart { name, .. }
				| Event::CloseElementStart { name, .. }
				| Event::StandaloneElementStart { name, .. }
		) if is_block_element(name)
	)
}

fn is_prolog(event: &Event) -> bool {
	matches!(
		event,
		Event::DocumentStart { .. } | Event::DocType { .. } | Event::XmlDeclaration { .. }
	)
}

/// Build the lenient view of a trace. The input trace is not modified.
fn normalize(trace: &Trace) -> Vec<Event> {
	let events = trace.events();
	let mut normalized: Vec<Event> = Vec::with_capacity(events.len());
	// Every retained event so far is part of the prolog.
	let mut in_prolog = true;
	let mut index = 0;

	while index < events.len() {
		let event = &events[index];
		index += 1;

		match event {
			Event::InnerWhitespace { .. } => {}
			Event::OpenElementStart { .. } | Event::StandaloneElementStart { .. } => {
				let mut attributes = Vec::new();
				normalized.push(event.clone());

				while let Some(inner) = events.get(index) {
					match inner {
						Event::Attribute { .. } => attributes.push(inner.clone()),
						Event::InnerWhitespace { .. } => {}
						_ => break,
					}
					index += 1;
				}

				attributes.sort_by(|left, right| attribute_name(left).cmp(attribute_name(right)));
				normalized.extend(attributes);
				in_prolog = false;
			}
			Event::Text { content, position } if event.is_whitespace_text() => {
				let next = events[index..]
					.iter()
					.find(|next| !matches!(next, Event::InnerWhitespace { .. }));
				let trailing = matches!(next, Some(Event::DocumentEnd { .. }));
				let between_blocks =
					ends_block_boundary(normalized.last()) && starts_block_boundary(next);

				if in_prolog || trailing || between_blocks {
					continue;
				}

				normalized.push(Event::Text {
					content: content.clone(),
					position: *position,
				});
				in_prolog = false;
			}
			Event::Text { content, position } => {
				let content = if in_prolog {
					content.trim_start().to_string()
				} else {
					content.clone()
				};

				normalized.push(Event::Text {
					content,
					position: *position,
				});
				in_prolog = false;
			}
			_ => {
				in_prolog = in_prolog && is_prolog(event);
				normalized.push(event.clone());
			}
		}
	}

	normalized
}

fn attribute_name(event: &Event) -> &str {
	match event {
		Event::Attribute { name, .. } => name,
		_ => "",
	}
}

fn unquote(value: &str) -> &str {
	for quote in ['"', '\''] {
		if let Some(inner) = value
			.strip_prefix(quote)
			.and_then(|rest| rest.strip_suffix(quote))
		{
			return inner;
		}
	}

	value
}

fn events_match(expected: &Event, actual: &Event, lenient: bool) -> bool {
	match (expected, actual) {
		(Event::DocumentStart { .. }, Event::DocumentStart { .. })
		| (Event::DocumentEnd { .. }, Event::DocumentEnd { .. }) => true,
		(
			Event::StandaloneElementStart {
				name, minimized, ..
			},
			Event::StandaloneElementStart {
				name: other_name,
				minimized: other_minimized,
				..
			},
		)
		| (
			Event::StandaloneElementEnd {
				name, minimized, ..
			},
			Event::StandaloneElementEnd {
				name: other_name,
				minimized: other_minimized,
				..
			},
		) => {
			if lenient {
				name.eq_ignore_ascii_case(other_name)
			} else {
				name == other_name && minimized == other_minimized
			}
		}
		(
			Event::Attribute {
				name,
				operator,
				value,
				..
			},
			Event::Attribute {
				name: other_name,
				operator: other_operator,
				value: other_value,
				..
			},
		) if lenient => {
			name == other_name
				&& operator.is_empty() == other_operator.is_empty()
				&& unquote(value) == unquote(other_value)
		}
		(Event::Text { content, .. }, Event::Text {
			content: other, ..
		})
		| (Event::Comment { content, .. }, Event::Comment {
			content: other, ..
		}) if lenient => collapse_whitespace(content) == collapse_whitespace(other),
		_ if lenient && expected.element_name().is_some() => {
			expected.code() == actual.code()
				&& expected
					.element_name()
					.zip(actual.element_name())
					.is_some_and(|(left, right)| left.eq_ignore_ascii_case(right))
		}
		_ => expected.code() == actual.code() && expected.parts() == actual.parts(),
	}
}
