use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

/// A 1-indexed line and column inside the logical input.
///
/// Positions are always relative to the start of the parsed range, never to
/// the physical array the range was sliced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
	/// 1-indexed line number.
	pub line: usize,
	/// 1-indexed column number.
	pub column: usize,
}

impl Default for Position {
	fn default() -> Self {
		Self::START
	}
}

impl Position {
	/// The position of the first character of a document.
	pub const START: Self = Self { line: 1, column: 1 };

	pub const fn new(line: usize, column: usize) -> Self {
		Self { line, column }
	}

	/// Move past a single character. Only `\n` starts a new line.
	pub fn advance(&mut self, ch: char) {
		if ch == '\n' {
			self.line += 1;
			self.column = 1;
		} else {
			self.column += 1;
		}
	}

	/// Move past every character of `value`.
	pub fn advance_str(&mut self, value: &str) {
		for ch in value.chars() {
			self.advance(ch);
		}
	}

	/// A copy of this position moved past `value`.
	#[must_use]
	pub fn after(mut self, value: &str) -> Self {
		self.advance_str(value);
		self
	}

	/// Convert to a char offset inside `source`, if the position exists.
	pub fn to_offset(self, source: &str) -> Option<usize> {
		let mut current = Self::START;

		for (offset, ch) in source.chars().enumerate() {
			if current == self {
				return Some(offset);
			}
			current.advance(ch);
		}

		(current == self).then(|| source.chars().count())
	}
}

impl Display for Position {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{{{},{}}}", self.line, self.column)
	}
}
