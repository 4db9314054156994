use crate::CharReader;
use crate::CharSource;
use crate::Event;
use crate::EventHandler;
use crate::ParseError;
use crate::ParseMode;
use crate::ParseResult;
use crate::Position;

/// HTML elements that never have content and so never have a close tag.
pub const VOID_ELEMENTS: [&str; 14] = [
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
	"track", "wbr",
];

/// Elements whose content is raw text in markup mode.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// The delimiters that make up elements and comments for one parse mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syntax {
	pub mode: ParseMode,
	/// Whether comment delimiters are recognized. Markup comments always are;
	/// text mode only has comments when comment processing is enabled.
	pub comments: bool,
}

impl Syntax {
	pub fn new(mode: ParseMode, process_comments: bool) -> Self {
		Self {
			mode,
			comments: matches!(mode, ParseMode::Markup) || process_comments,
		}
	}

	fn open_prefix(self) -> &'static str {
		match self.mode {
			ParseMode::Markup => "<",
			ParseMode::Text => "[#",
		}
	}

	fn close_prefix(self) -> &'static str {
		match self.mode {
			ParseMode::Markup => "</",
			ParseMode::Text => "[/",
		}
	}

	fn end(self) -> char {
		match self.mode {
			ParseMode::Markup => '>',
			ParseMode::Text => ']',
		}
	}

	fn comment_delimiters(self) -> (&'static str, &'static str) {
		match self.mode {
			ParseMode::Markup => ("<!--", "-->"),
			ParseMode::Text => ("/*", "*/"),
		}
	}
}

/// What the upcoming characters start.
enum Structure {
	OpenElement,
	CloseElement,
	Comment,
	DocType,
	CData,
	Instruction,
	Text,
}

/// Element start events are buffered until the element end is found, since
/// only then is it known whether the element is standalone.
struct PendingElement {
	name: String,
	position: Position,
	inner: Vec<Event>,
}

/// Single pass tokenizer over a [`CharReader`].
pub struct Tokenizer<S> {
	reader: CharReader<S>,
	syntax: Syntax,
	text: String,
	text_start: Position,
	/// Set while inside a raw text element, holding its lowercase name.
	raw_text: Option<String>,
}

impl<S: CharSource> Tokenizer<S> {
	pub fn new(reader: CharReader<S>, syntax: Syntax) -> Self {
		let text_start = reader.position();

		Self {
			reader,
			syntax,
			text: String::new(),
			text_start,
			raw_text: None,
		}
	}

	/// Tokenize a whole document, wrapping the content in document start and
	/// end events.
	pub fn run(mut self, handler: &mut impl EventHandler) -> ParseResult<()> {
		handler.handle(Event::DocumentStart {
			position: self.reader.position(),
		})?;
		self.run_content(handler)?;
		handler.handle(Event::DocumentEnd {
			position: self.reader.position(),
		})
	}

	/// Tokenize without document events. Used for content nested inside an
	/// already running document.
	pub fn run_content(&mut self, handler: &mut impl EventHandler) -> ParseResult<()> {
		while let Some(ch) = self.reader.peek(0)? {
			if let Some(name) = self.raw_text.take() {
				if ch == '<' && self.at_raw_text_end(&name)? {
					self.close_element(handler)?;
				} else {
					self.raw_text = Some(name);
					self.push_text()?;
				}
				continue;
			}

			match self.structure_at(ch)? {
				Structure::OpenElement => self.open_element(handler)?,
				Structure::CloseElement => self.close_element(handler)?,
				Structure::Comment => self.comment(handler)?,
				Structure::DocType => self.doctype(handler)?,
				Structure::CData => self.cdata(handler)?,
				Structure::Instruction => self.instruction(handler)?,
				Structure::Text => self.push_text()?,
			}
		}

		self.flush_text(handler)
	}

	fn structure_at(&mut self, ch: char) -> ParseResult<Structure> {
		let reader = &mut self.reader;

		let structure = match (self.syntax.mode, ch) {
			(ParseMode::Markup, '<') => {
				match reader.peek(1)? {
					Some('/') if reader.peek(2)?.is_some_and(is_name_start) => {
						Structure::CloseElement
					}
					Some('!') if reader.starts_with("<!--")? => Structure::Comment,
					Some('!') if reader.starts_with("<![CDATA[")? => Structure::CData,
					Some('!') if reader.starts_with_ignore_case("<!DOCTYPE")? => Structure::DocType,
					Some('?') if reader.peek(2)?.is_some_and(is_name_start) => Structure::Instruction,
					Some(next) if is_name_start(next) => Structure::OpenElement,
					_ => Structure::Text,
				}
			}
			(ParseMode::Text, '[') => {
				match reader.peek(1)? {
					Some('#') => Structure::OpenElement,
					Some('/') => Structure::CloseElement,
					_ => Structure::Text,
				}
			}
			(ParseMode::Text, '/') if self.syntax.comments && reader.peek(1)? == Some('*') => {
				Structure::Comment
			}
			_ => Structure::Text,
		};

		Ok(structure)
	}

	fn at_raw_text_end(&mut self, name: &str) -> ParseResult<bool> {
		if !self.reader.starts_with("</")? {
			return Ok(false);
		}

		for (offset, expected) in name.chars().enumerate() {
			match self.reader.peek(offset + 2)? {
				Some(found) if found.eq_ignore_ascii_case(&expected) => {}
				_ => return Ok(false),
			}
		}

		let after = self.reader.peek(name.chars().count() + 2)?;
		Ok(matches!(after, Some('>') | None) || after.is_some_and(char::is_whitespace))
	}

	fn push_text(&mut self) -> ParseResult<()> {
		if self.text.is_empty() {
			self.text_start = self.reader.position();
		}

		if let Some(ch) = self.reader.consume()? {
			self.text.push(ch);
		}

		Ok(())
	}

	fn flush_text(&mut self, handler: &mut impl EventHandler) -> ParseResult<()> {
		if self.text.is_empty() {
			return Ok(());
		}

		handler.handle(Event::Text {
			content: std::mem::take(&mut self.text),
			position: self.text_start,
		})
	}

	fn unterminated(what: &str, position: Position) -> ParseError {
		ParseError::syntax(format!("unterminated {what}"), position)
	}

	/// `true` when the upcoming characters close the element, either with the
	/// end delimiter or with the minimized marker.
	fn at_element_end(&mut self) -> ParseResult<bool> {
		let end = self.syntax.end();

		Ok(match self.reader.peek(0)? {
			Some(ch) if ch == end => true,
			Some('/') => self.reader.peek(1)? == Some(end),
			_ => false,
		})
	}

	/// Read a name up to whitespace, the element end, or any of `stops`.
	fn read_name(&mut self, stops: &[char]) -> ParseResult<String> {
		let mut name = String::new();

		while let Some(ch) = self.reader.peek(0)? {
			if ch.is_whitespace() || stops.contains(&ch) || self.at_element_end()? {
				break;
			}
			self.reader.consume()?;
			name.push(ch);
		}

		Ok(name)
	}

	fn read_whitespace(&mut self) -> ParseResult<String> {
		let mut whitespace = String::new();

		while let Some(ch) = self.reader.peek(0)? {
			if !ch.is_whitespace() {
				break;
			}
			self.reader.consume()?;
			whitespace.push(ch);
		}

		Ok(whitespace)
	}

	/// Consume characters up to and including `delimiter`. Returns `None`
	/// when the input ends first.
	fn read_until(&mut self, delimiter: &str) -> ParseResult<Option<String>> {
		let mut content = String::new();

		loop {
			if self.reader.starts_with(delimiter)? {
				self.reader.consume_str(delimiter.chars().count())?;
				return Ok(Some(content));
			}

			match self.reader.consume()? {
				Some(ch) => content.push(ch),
				None => return Ok(None),
			}
		}
	}

	fn open_element(&mut self, handler: &mut impl EventHandler) -> ParseResult<()> {
		self.flush_text(handler)?;

		let position = self.reader.position();
		self.reader
			.consume_str(self.syntax.open_prefix().chars().count())?;
		let name = self.read_name(&[])?;

		let mut element = PendingElement {
			name,
			position,
			inner: Vec::new(),
		};

		loop {
			let Some(ch) = self.reader.peek(0)? else {
				return Err(Self::unterminated("element", position));
			};

			if ch.is_whitespace() {
				let whitespace_start = self.reader.position();
				let content = self.read_whitespace()?;
				element.inner.push(Event::InnerWhitespace {
					content,
					position: whitespace_start,
				});
			} else if self.at_element_end()? {
				return self.finish_open_element(element, handler);
			} else {
				self.attribute(&mut element.inner)?;
			}
		}
	}

	fn finish_open_element(
		&mut self,
		element: PendingElement,
		handler: &mut impl EventHandler,
	) -> ParseResult<()> {
		let end_position = self.reader.position();
		let minimized = self.reader.peek(0)? == Some('/');
		self.reader.consume_str(if minimized { 2 } else { 1 })?;

		let PendingElement {
			name,
			position,
			inner,
		} = element;
		let is_void = matches!(self.syntax.mode, ParseMode::Markup)
			&& VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str());

		if minimized || is_void {
			handler.handle(Event::StandaloneElementStart {
				name: name.clone(),
				minimized,
				position,
			})?;
			for event in inner {
				handler.handle(event)?;
			}
			return handler.handle(Event::StandaloneElementEnd {
				name,
				minimized,
				position: end_position,
			});
		}

		if matches!(self.syntax.mode, ParseMode::Markup) {
			let lower = name.to_ascii_lowercase();
			if RAW_TEXT_ELEMENTS.contains(&lower.as_str()) {
				self.raw_text = Some(lower);
			}
		}

		handler.handle(Event::OpenElementStart {
			name: name.clone(),
			position,
		})?;
		for event in inner {
			handler.handle(event)?;
		}
		handler.handle(Event::OpenElementEnd {
			name,
			position: end_position,
		})
	}

	fn attribute(&mut self, events: &mut Vec<Event>) -> ParseResult<()> {
		let position = self.reader.position();
		let name = self.read_name(&['=', '"', '\''])?;

		if name.is_empty() {
			return Err(ParseError::syntax("attribute without a name", position));
		}

		let whitespace_start = self.reader.position();
		let whitespace = self.read_whitespace()?;

		if self.reader.peek(0)? != Some('=') {
			events.push(Event::Attribute {
				name,
				operator: String::new(),
				value: String::new(),
				position,
				operator_position: whitespace_start,
				value_position: whitespace_start,
			});
			if !whitespace.is_empty() {
				events.push(Event::InnerWhitespace {
					content: whitespace,
					position: whitespace_start,
				});
			}
			return Ok(());
		}

		let mut operator = whitespace;
		self.reader.consume()?;
		operator.push('=');
		operator.push_str(&self.read_whitespace()?);

		let value_position = self.reader.position();
		let value = self.attribute_value()?;

		events.push(Event::Attribute {
			name,
			operator,
			value,
			position,
			operator_position: whitespace_start,
			value_position,
		});

		Ok(())
	}

	fn attribute_value(&mut self) -> ParseResult<String> {
		let position = self.reader.position();

		match self.reader.peek(0)? {
			Some(quote @ ('"' | '\'')) => {
				let mut value = String::new();
				self.reader.consume()?;
				value.push(quote);

				loop {
					match self.reader.consume()? {
						Some(ch) => {
							value.push(ch);
							if ch == quote {
								return Ok(value);
							}
						}
						None => return Err(Self::unterminated("attribute value", position)),
					}
				}
			}
			_ => self.read_name(&[]),
		}
	}

	fn close_element(&mut self, handler: &mut impl EventHandler) -> ParseResult<()> {
		self.flush_text(handler)?;

		let position = self.reader.position();
		self.reader
			.consume_str(self.syntax.close_prefix().chars().count())?;
		let name = self.read_name(&[])?;
		let mut inner = Vec::new();

		loop {
			let Some(ch) = self.reader.peek(0)? else {
				return Err(Self::unterminated("closing element", position));
			};

			if ch == self.syntax.end() {
				break;
			}

			if !ch.is_whitespace() {
				return Err(ParseError::syntax(
					format!("unexpected `{ch}` in closing element `{name}`"),
					self.reader.position(),
				));
			}

			let whitespace_start = self.reader.position();
			let content = self.read_whitespace()?;
			inner.push(Event::InnerWhitespace {
				content,
				position: whitespace_start,
			});
		}

		let end_position = self.reader.position();
		self.reader.consume()?;

		handler.handle(Event::CloseElementStart {
			name: name.clone(),
			position,
		})?;
		for event in inner {
			handler.handle(event)?;
		}
		handler.handle(Event::CloseElementEnd {
			name,
			position: end_position,
		})
	}

	fn comment(&mut self, handler: &mut impl EventHandler) -> ParseResult<()> {
		self.flush_text(handler)?;

		let (open, close) = self.syntax.comment_delimiters();
		let position = self.reader.position();
		self.reader.consume_str(open.chars().count())?;
		let inner = self.reader.position();

		let Some(content) = self.read_until(close)? else {
			return Err(Self::unterminated("comment", position));
		};

		handler.handle(Event::Comment {
			outer: format!("{open}{content}{close}"),
			content,
			position,
			inner,
		})
	}

	fn doctype(&mut self, handler: &mut impl EventHandler) -> ParseResult<()> {
		self.flush_text(handler)?;

		let position = self.reader.position();
		self.reader.consume_str(2)?;

		let Some(content) = self.read_until(">")? else {
			return Err(Self::unterminated("doctype", position));
		};

		handler.handle(Event::DocType { content, position })
	}

	fn cdata(&mut self, handler: &mut impl EventHandler) -> ParseResult<()> {
		self.flush_text(handler)?;

		let position = self.reader.position();
		self.reader.consume_str("<![CDATA[".len())?;

		let Some(content) = self.read_until("]]>")? else {
			return Err(Self::unterminated("CDATA section", position));
		};

		handler.handle(Event::CData { content, position })
	}

	fn instruction(&mut self, handler: &mut impl EventHandler) -> ParseResult<()> {
		self.flush_text(handler)?;

		let position = self.reader.position();
		self.reader.consume_str(2)?;
		let target = self.read_name(&['?'])?;

		let Some(content) = self.read_until("?>")? else {
			return Err(Self::unterminated("processing instruction", position));
		};

		let event = if target.eq_ignore_ascii_case("xml") {
			Event::XmlDeclaration {
				content: format!("{target}{content}"),
				position,
			}
		} else {
			Event::ProcessingInstruction {
				target,
				content,
				position,
			}
		};

		handler.handle(event)
	}
}

fn is_name_start(ch: char) -> bool {
	ch.is_ascii_alphabetic() || ch == '_' || ch == ':'
}
