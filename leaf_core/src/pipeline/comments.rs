use crate::CharReader;
use crate::Event;
use crate::EventHandler;
use crate::ParseMode;
use crate::ParseResult;
use crate::Position;
use crate::StrSource;
use crate::Syntax;
use crate::Tokenizer;

/// How a comment's content is treated when comment processing is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentDirective<'a> {
	/// `[#name ...]`, `[/name]` and friends. The whole content is element
	/// syntax.
	Element(&'a str),
	/// `[- ... -]`, removed from the output entirely.
	ParserLevel,
	/// `[+ ... +]`, the content between the markers is parsed with the
	/// document's own syntax, as if it were never commented.
	Prototype(&'a str),
}

impl<'a> CommentDirective<'a> {
	/// Classify comment content, returning `None` for an ordinary comment.
	pub fn classify(content: &'a str) -> Option<Self> {
		if content.len() >= 4 && content.starts_with("[-") && content.ends_with("-]") {
			return Some(Self::ParserLevel);
		}

		if content.len() >= 4 && content.starts_with("[+") && content.ends_with("+]") {
			return Some(Self::Prototype(&content[2..content.len() - 2]));
		}

		if (content.starts_with("[#") || content.starts_with("[/")) && content.ends_with(']') {
			return Some(Self::Element(content));
		}

		None
	}
}

/// Promotes directives written inside comments to element events.
///
/// The comment itself is dropped and its content is tokenized from the
/// position of the first content character. Directives always use text-mode
/// element syntax; prototype blocks use the syntax of the document.
/// Text events on either side of a promoted comment are merged so the next
/// stage sees a single text run.
pub struct CommentDirectives<H> {
	next: H,
	mode: ParseMode,
	enabled: bool,
	buffer_size: usize,
	pending_text: Option<(String, Position)>,
}

impl<H: EventHandler> CommentDirectives<H> {
	pub fn new(next: H, mode: ParseMode, enabled: bool, buffer_size: usize) -> Self {
		Self {
			next,
			mode,
			enabled,
			buffer_size,
			pending_text: None,
		}
	}

	pub fn into_inner(self) -> H {
		self.next
	}

	fn push_text(&mut self, content: &str, position: Position) {
		match &mut self.pending_text {
			Some((text, _)) => text.push_str(content),
			None => self.pending_text = Some((content.to_string(), position)),
		}
	}

	fn flush_text(&mut self) -> ParseResult<()> {
		let Some((content, position)) = self.pending_text.take() else {
			return Ok(());
		};

		self.next.handle(Event::Text { content, position })
	}

	fn promote(&mut self, body: &str, origin: Position, mode: ParseMode) -> ParseResult<()> {
		let reader = CharReader::with_origin(StrSource::new(body), self.buffer_size, origin);
		let mut tokenizer = Tokenizer::new(reader, Syntax::new(mode, false));
		tokenizer.run_content(self)
	}
}

impl<H: EventHandler> EventHandler for CommentDirectives<H> {
	fn handle(&mut self, event: Event) -> ParseResult<()> {
		if !self.enabled {
			return self.next.handle(event);
		}

		match event {
			Event::Text { content, position } => {
				self.push_text(&content, position);
				Ok(())
			}
			Event::Comment {
				content,
				position,
				inner,
				outer,
			} => {
				match CommentDirective::classify(&content) {
					Some(CommentDirective::Element(body)) => {
						tracing::debug!(%position, "promoting comment directive");
						self.promote(body, inner, ParseMode::Text)
					}
					Some(CommentDirective::Prototype(body)) => {
						tracing::debug!(%position, "uncommenting prototype block");
						self.promote(body, inner.after("[+"), self.mode)
					}
					Some(CommentDirective::ParserLevel) => {
						tracing::debug!(%position, "removing parser-level comment");
						Ok(())
					}
					None => {
						self.flush_text()?;
						self.next.handle(Event::Comment {
							content,
							position,
							inner,
							outer,
						})
					}
				}
			}
			other => {
				self.flush_text()?;
				self.next.handle(other)
			}
		}
	}
}
