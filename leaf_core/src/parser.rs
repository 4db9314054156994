use std::io::Read;

use crate::Balancing;
use crate::CharReader;
use crate::CharSource;
use crate::CommentDirectives;
use crate::ElementBalancer;
use crate::EventHandler;
use crate::InlineExpressions;
use crate::ParseConfig;
use crate::ParseError;
use crate::ParseResult;
use crate::StrSource;
use crate::Syntax;
use crate::Tokenizer;
use crate::Trace;
use crate::TraceBuilder;
use crate::Utf8Source;

/// Parse `input` and stream the resulting events into `handler`.
pub fn parse(
	input: impl AsRef<str>,
	config: &ParseConfig,
	handler: &mut impl EventHandler,
) -> ParseResult<()> {
	parse_source(StrSource::new(input.as_ref()), config, handler)
}

/// Parse `input` into a [`Trace`].
pub fn parse_trace(input: impl AsRef<str>, config: &ParseConfig) -> ParseResult<Trace> {
	let mut builder = TraceBuilder::new();
	parse(input, config, &mut builder)?;
	builder.finish()
}

/// Parse only the `len` characters starting at char `offset` of `input`.
/// Positions in the trace are relative to `offset`.
pub fn parse_trace_range(
	input: impl AsRef<str>,
	offset: usize,
	len: usize,
	config: &ParseConfig,
) -> ParseResult<Trace> {
	let mut builder = TraceBuilder::new();
	parse_source(
		StrSource::range(input.as_ref(), offset, len),
		config,
		&mut builder,
	)?;
	builder.finish()
}

/// Parse UTF-8 from any reader, streaming events into `handler`.
pub fn parse_reader(
	reader: impl Read,
	config: &ParseConfig,
	handler: &mut impl EventHandler,
) -> ParseResult<()> {
	parse_source(Utf8Source::new(reader), config, handler)
}

/// Run the full pipeline over any character source.
#[tracing::instrument(level = "debug", skip_all, fields(mode = ?config.mode))]
pub fn parse_source(
	source: impl CharSource,
	config: &ParseConfig,
	handler: &mut impl EventHandler,
) -> ParseResult<()> {
	if config.buffer_size == 0 {
		return Err(ParseError::syntax("buffer size must be at least 1", None));
	}

	let balancer = ElementBalancer::new(
		handler,
		Balancing::new(config.mode, config.balance_unmatched_tags),
	);
	let inline = InlineExpressions::new(balancer);
	let mut comments = CommentDirectives::new(
		inline,
		config.mode,
		config.process_comments,
		config.buffer_size,
	);

	let reader = CharReader::new(source, config.buffer_size);
	let syntax = Syntax::new(config.mode, config.process_comments);
	Tokenizer::new(reader, syntax).run(&mut comments)
}
