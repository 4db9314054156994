use miette::Diagnostic;
use thiserror::Error;

use crate::Position;

/// Errors that abort a parse. No partial result is returned.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ParseError {
	#[error("failed to read template input: {0}")]
	#[diagnostic(code(leaf::io_error))]
	Io(#[from] std::io::Error),

	#[error("{message}{}", format_position(.position))]
	#[diagnostic(code(leaf::syntax))]
	Syntax {
		message: String,
		/// Best known anchor. `None` when the problem is only detected at the
		/// end of the stream and nothing in the input marks it.
		position: Option<Position>,
	},

	#[error("closing element `{found}` does not match open element `{expected}` at {position}")]
	#[diagnostic(
		code(leaf::mismatched_element),
		help("close `{expected}` before closing `{found}`, or enable tag balancing")
	)]
	MismatchedElement {
		expected: String,
		found: String,
		position: Position,
	},

	#[error("event stream ended before the end of the document")]
	#[diagnostic(code(leaf::incomplete_trace))]
	Incomplete,
}

impl ParseError {
	pub(crate) fn syntax(message: impl Into<String>, position: impl Into<Option<Position>>) -> Self {
		Self::Syntax {
			message: message.into(),
			position: position.into(),
		}
	}

	/// The line and column the error is anchored at, if any.
	pub fn position(&self) -> Option<Position> {
		match self {
			Self::Syntax { position, .. } => *position,
			Self::MismatchedElement { position, .. } => Some(*position),
			Self::Io(_) | Self::Incomplete => None,
		}
	}
}

fn format_position(position: &Option<Position>) -> String {
	position.map_or_else(String::new, |position| format!(" at {position}"))
}

/// Errors raised while comparing two documents. A structural difference is
/// not an error, only a failure to parse one of the inputs.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum CompareError {
	#[error("failed to parse the expected document")]
	#[diagnostic(code(leaf::compare_expected))]
	Expected(#[source] ParseError),

	#[error("failed to parse the actual document")]
	#[diagnostic(code(leaf::compare_actual))]
	Actual(#[source] ParseError),
}

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum LeafError {
	#[error(transparent)]
	#[diagnostic(code(leaf::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(leaf::config_parse),
		help("check that leaf.toml is valid TOML with [parse] and/or [compare] sections")
	)]
	ConfigParse(String),

	#[error("buffer size must be at least 1")]
	#[diagnostic(code(leaf::invalid_buffer_size))]
	InvalidBufferSize,

	#[error(transparent)]
	#[diagnostic(transparent)]
	Parse(#[from] ParseError),

	#[error(transparent)]
	#[diagnostic(transparent)]
	Compare(#[from] CompareError),
}

pub type ParseResult<T> = Result<T, ParseError>;
pub type LeafResult<T> = Result<T, LeafError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
