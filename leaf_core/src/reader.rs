//! Buffered character reading with lookahead and position tracking.
//!
//! A [`CharReader`] pulls characters from a [`CharSource`] into a fixed-size
//! buffer. The buffer size only controls how often the source is asked for
//! more characters: scanning through a reader produces the same characters and
//! positions for every buffer size, down to a single character.

use std::io;
use std::io::Read;

use crate::Position;

/// Default buffer size, in characters.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// A stream of characters that can be pulled in chunks.
pub trait CharSource {
	/// Fill `buf` with up to `buf.len()` characters and return how many were
	/// written. `Ok(0)` signals the end of the stream.
	fn fill(&mut self, buf: &mut [char]) -> io::Result<usize>;
}

/// A logical sub-range of a string, measured in characters.
///
/// Slicing does not copy the underlying text.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
	chars: std::iter::Take<std::iter::Skip<std::str::Chars<'a>>>,
}

impl<'a> StrSource<'a> {
	pub fn new(text: &'a str) -> Self {
		Self::range(text, 0, usize::MAX)
	}

	/// Read only the `len` characters starting at char `offset` of `text`.
	pub fn range(text: &'a str, offset: usize, len: usize) -> Self {
		Self {
			chars: text.chars().skip(offset).take(len),
		}
	}
}

impl CharSource for StrSource<'_> {
	fn fill(&mut self, buf: &mut [char]) -> io::Result<usize> {
		let mut written = 0;

		for slot in buf.iter_mut() {
			let Some(ch) = self.chars.next() else {
				break;
			};
			*slot = ch;
			written += 1;
		}

		Ok(written)
	}
}

/// Decodes UTF-8 from any [`Read`] implementation, including readers that
/// split multi-byte sequences across reads.
#[derive(Debug)]
pub struct Utf8Source<R> {
	inner: R,
	bytes: Vec<u8>,
	/// Number of undecoded bytes at the start of `bytes`.
	pending: usize,
	eof: bool,
}

const UTF8_CHUNK: usize = 1024;

impl<R: Read> Utf8Source<R> {
	pub fn new(inner: R) -> Self {
		Self {
			inner,
			bytes: vec![0; UTF8_CHUNK],
			pending: 0,
			eof: false,
		}
	}

	fn invalid(message: &str) -> io::Error {
		io::Error::new(io::ErrorKind::InvalidData, message.to_string())
	}
}

impl<R: Read> CharSource for Utf8Source<R> {
	fn fill(&mut self, buf: &mut [char]) -> io::Result<usize> {
		if buf.is_empty() {
			return Ok(0);
		}

		loop {
			// Decode what is already buffered before asking for more bytes.
			let valid = match std::str::from_utf8(&self.bytes[..self.pending]) {
				Ok(text) => text.len(),
				Err(error) if error.error_len().is_some() => {
					return Err(Self::invalid("input is not valid UTF-8"));
				}
				Err(error) => error.valid_up_to(),
			};

			if valid > 0 {
				let text = std::str::from_utf8(&self.bytes[..valid])
					.map_err(|_| Self::invalid("input is not valid UTF-8"))?;
				let mut written = 0;
				let mut used = 0;

				for ch in text.chars() {
					if written == buf.len() {
						break;
					}
					buf[written] = ch;
					written += 1;
					used += ch.len_utf8();
				}

				self.bytes.copy_within(used..self.pending, 0);
				self.pending -= used;
				return Ok(written);
			}

			if self.eof {
				return if self.pending == 0 {
					Ok(0)
				} else {
					Err(Self::invalid("input ends inside a UTF-8 sequence"))
				};
			}

			let read = self.inner.read(&mut self.bytes[self.pending..])?;
			if read == 0 {
				self.eof = true;
			}
			self.pending += read;
		}
	}
}

/// A rolling character buffer with lookahead and line/column tracking.
///
/// The content between `cursor` and `limit` is valid unconsumed input, and
/// `cursor <= limit <= buffer.len()` holds at all times.
#[derive(Debug)]
pub struct CharReader<S> {
	source: S,
	buffer: Vec<char>,
	cursor: usize,
	limit: usize,
	eof: bool,
	position: Position,
}

impl<S: CharSource> CharReader<S> {
	pub fn new(source: S, buffer_size: usize) -> Self {
		Self::with_origin(source, buffer_size, Position::START)
	}

	/// Create a reader whose first character is reported at `origin`.
	pub fn with_origin(source: S, buffer_size: usize, origin: Position) -> Self {
		Self {
			source,
			buffer: vec!['\0'; buffer_size.max(1)],
			cursor: 0,
			limit: 0,
			eof: false,
			position: origin,
		}
	}

	/// Position of the next unconsumed character.
	pub fn position(&self) -> Position {
		self.position
	}

	/// Pull more characters from the source. Returns `false` once the source
	/// is exhausted, `true` when at least one more character is buffered.
	pub fn refill(&mut self) -> io::Result<bool> {
		if self.eof {
			return Ok(false);
		}

		if self.cursor > 0 {
			self.buffer.copy_within(self.cursor..self.limit, 0);
			self.limit -= self.cursor;
			self.cursor = 0;
		}

		if self.limit == self.buffer.len() {
			// Only reachable when a lookahead needs more room than the buffer.
			let grown = self.buffer.len() * 2;
			self.buffer.resize(grown, '\0');
		}

		let read = self.source.fill(&mut self.buffer[self.limit..])?;
		tracing::trace!(read, buffered = self.limit, "refilled character buffer");

		if read == 0 {
			self.eof = true;
			return Ok(false);
		}

		self.limit += read;
		Ok(true)
	}

	/// Look at the character `offset` places ahead of the cursor without
	/// consuming anything.
	pub fn peek(&mut self, offset: usize) -> io::Result<Option<char>> {
		while self.cursor + offset >= self.limit {
			if !self.refill()? {
				return Ok(None);
			}
		}

		Ok(Some(self.buffer[self.cursor + offset]))
	}

	/// Consume the next character, advancing the position.
	pub fn consume(&mut self) -> io::Result<Option<char>> {
		let Some(ch) = self.peek(0)? else {
			return Ok(None);
		};

		self.cursor += 1;
		self.position.advance(ch);
		Ok(Some(ch))
	}

	/// Consume `count` characters and return them.
	pub fn consume_str(&mut self, count: usize) -> io::Result<String> {
		let mut value = String::new();

		for _ in 0..count {
			match self.consume()? {
				Some(ch) => value.push(ch),
				None => break,
			}
		}

		Ok(value)
	}

	/// `true` when the upcoming characters are exactly `expected`.
	pub fn starts_with(&mut self, expected: &str) -> io::Result<bool> {
		for (offset, ch) in expected.chars().enumerate() {
			if self.peek(offset)? != Some(ch) {
				return Ok(false);
			}
		}

		Ok(true)
	}

	/// Like [`CharReader::starts_with`] but ignoring ASCII case.
	pub fn starts_with_ignore_case(&mut self, expected: &str) -> io::Result<bool> {
		for (offset, ch) in expected.chars().enumerate() {
			match self.peek(offset)? {
				Some(found) if found.eq_ignore_ascii_case(&ch) => {}
				_ => return Ok(false),
			}
		}

		Ok(true)
	}

	pub fn is_eof(&mut self) -> io::Result<bool> {
		Ok(self.peek(0)?.is_none())
	}
}
