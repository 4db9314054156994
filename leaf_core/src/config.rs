use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::DEFAULT_BUFFER_SIZE;
use crate::LeafError;
use crate::LeafResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["leaf.toml", ".leaf.toml", ".config/leaf.toml"];

/// Default number of characters shown on each side of a mismatch.
pub const DEFAULT_COMPARE_CONTEXT: usize = 10;

/// The template syntax a document is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseMode {
	/// `<name attr="value">`, `</name>`, `<name/>` and `<!-- comments -->`.
	#[default]
	Markup,
	/// `[#name attr="value"]`, `[/name]`, `[#name/]` and, when comments are
	/// processed, `/* comments */`.
	Text,
}

/// Options recognized by the tokenizer and the event pipeline.
///
/// ```toml
/// [parse]
/// mode = "text"
/// process_comments = true
/// balance_unmatched_tags = false
/// buffer_size = 4096
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
	pub mode: ParseMode,
	/// Promote directives found inside comments to element events. When
	/// disabled, comments are inert.
	pub process_comments: bool,
	/// Close unclosed elements and drop unmatched close elements instead of
	/// failing or passing them through.
	pub balance_unmatched_tags: bool,
	/// Refill granularity of the character buffer. Has no effect on the
	/// events produced.
	pub buffer_size: usize,
}

impl Default for ParseConfig {
	fn default() -> Self {
		Self {
			mode: ParseMode::Markup,
			process_comments: false,
			balance_unmatched_tags: false,
			buffer_size: DEFAULT_BUFFER_SIZE,
		}
	}
}

impl ParseConfig {
	pub fn markup() -> Self {
		Self::default()
	}

	pub fn text() -> Self {
		Self {
			mode: ParseMode::Text,
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_process_comments(mut self, process_comments: bool) -> Self {
		self.process_comments = process_comments;
		self
	}

	#[must_use]
	pub fn with_balance_unmatched_tags(mut self, balance: bool) -> Self {
		self.balance_unmatched_tags = balance;
		self
	}

	#[must_use]
	pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
		self.buffer_size = buffer_size;
		self
	}

	pub fn validate(&self) -> LeafResult<()> {
		if self.buffer_size == 0 {
			return Err(LeafError::InvalidBufferSize);
		}

		Ok(())
	}
}

/// Options for structural comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
	/// Ignore formatting-only differences.
	pub lenient: bool,
	/// Characters of surrounding input shown on each side of a mismatch.
	pub context: usize,
}

impl Default for CompareConfig {
	fn default() -> Self {
		Self {
			lenient: true,
			context: DEFAULT_COMPARE_CONTEXT,
		}
	}
}

/// Configuration loaded from a `leaf.toml` file.
///
/// ```toml
/// [parse]
/// mode = "markup"
///
/// [compare]
/// lenient = true
/// context = 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LeafConfig {
	#[serde(default)]
	pub parse: ParseConfig,
	#[serde(default)]
	pub compare: CompareConfig,
}

impl LeafConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> LeafResult<Option<LeafConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;

		Ok(Some(config))
	}

	pub fn from_toml(content: &str) -> LeafResult<LeafConfig> {
		let config: LeafConfig =
			toml::from_str(content).map_err(|e| LeafError::ConfigParse(e.to_string()))?;
		config.parse.validate()?;

		Ok(config)
	}
}
