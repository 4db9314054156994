use std::io;
use std::io::Read;

use crate::ParseConfig;

/// Markup documents exercising every construct the tokenizer knows.
pub const MARKUP_DOCUMENTS: &[&str] = &[
	"",
	"plain text only",
	"<p>hello</p>",
	"<!DOCTYPE html>\n<html lang=\"en\">\n\t<head><title>Home</title></head>\n\t<body \
	 class='main'>\n\t\t<p>Hi [[${user.name}]]!</p>\n\t\t<br>\n\t\t<img src=\"a.png\" />\n\t</body>\n</html>\n",
	"<?xml version=\"1.0\"?>\n<root><![CDATA[ <raw> ]]><?target some data?></root>",
	"<div\n   id = \"multi\nline\"\n   hidden\n>text</div>",
	"<!-- a comment --><script>if (a < b) { return \"</p>\"; }</script><style>p > b {}</style>",
	"<ul>\n  <li>one</li>\n  <li>two [(${raw})]</li>\n</ul>",
	"éàü <b>日本語</b> 😀",
];

/// Text-mode documents.
pub const TEXT_DOCUMENTS: &[&str] = &[
	"",
	"[#hello/]",
	"Dear [#th:block th:text=\"${name}\"]friend[/th:block],\n[#each items]\n  - [[${item}]]\n[/each]\n",
	"[#a x='1' y=2 z][#b/][/a]",
	"[# th:text=\"${x}\"]value[/]",
	"multi\nline\n\n[#p]\n\ttext [(${x})]\n[/p]\n",
];

/// Text-mode documents that use comment directives.
pub const TEXT_COMMENT_DOCUMENTS: &[&str] = &[
	"/*[#hello/]*/",
	"before /*[#if ok]*/ yes /*[/if]*/ after",
	"a/*[- removed -]*/b",
	"x /*[+[#p]kept[/p]+]*/ y",
	"/* ordinary comment */ text",
];

/// A reader that hands out a single byte per read call, splitting multi-byte
/// characters across reads.
pub struct OneByteReader<'a> {
	bytes: &'a [u8],
}

impl<'a> OneByteReader<'a> {
	pub fn new(text: &'a str) -> Self {
		Self {
			bytes: text.as_bytes(),
		}
	}
}

impl Read for OneByteReader<'_> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let Some((first, rest)) = self.bytes.split_first() else {
			return Ok(0);
		};

		if buf.is_empty() {
			return Ok(0);
		}

		buf[0] = *first;
		self.bytes = rest;
		Ok(1)
	}
}

/// Buffer sizes used to check that refill granularity never changes output.
pub fn buffer_sizes() -> impl Iterator<Item = usize> {
	(1..=64).chain([16_384])
}

/// Every document paired with the config it should be parsed with.
pub fn all_documents() -> Vec<(&'static str, ParseConfig)> {
	let markup = MARKUP_DOCUMENTS
		.iter()
		.map(|document| (*document, ParseConfig::markup()));
	let text = TEXT_DOCUMENTS
		.iter()
		.map(|document| (*document, ParseConfig::text()));
	let comments = TEXT_COMMENT_DOCUMENTS
		.iter()
		.map(|document| (*document, ParseConfig::text().with_process_comments(true)));

	markup.chain(text).chain(comments).collect()
}
