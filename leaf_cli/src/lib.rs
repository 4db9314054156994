use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use leaf_core::CompareConfig;
use leaf_core::ParseConfig;
use leaf_core::ParseMode;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Tokenize, check and structurally compare leaf templates.",
	long_about = "leaf reads markup (`<p>`) and text (`[#p]`) templates, reports the \
	              structural events they are made of, and compares documents structurally \
	              so formatting-only differences can be ignored.\n\nQuick start:\n  leaf trace \
	              page.html      Print the canonical event trace\n  leaf check *.txt \
	              --mode text  Verify templates parse\n  leaf compare a.html b.html  Compare \
	              two documents"
)]
pub struct LeafCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Directory searched for `leaf.toml`, `.leaf.toml` or
	/// `.config/leaf.toml`. Defaults to the current directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output. `RUST_LOG` takes precedence when set.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Print the event trace of one or more templates.
	///
	/// The trace lists every structural event with its line and column,
	/// for example `[OES(p){1,1}OEE(p){1,3}T(hi){1,4}]`. Use `-` to read
	/// the template from standard input.
	Trace {
		/// Template files to trace.
		#[arg(required = true)]
		files: Vec<PathBuf>,

		#[command(flatten)]
		parse: ParseArgs,

		/// Output format. `json` lists every event with its fields.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Check that templates parse without errors.
	///
	/// Reports every file that fails with the position of the failure and
	/// exits with a non-zero status code when any file fails.
	Check {
		/// Template files to check.
		#[arg(required = true)]
		files: Vec<PathBuf>,

		#[command(flatten)]
		parse: ParseArgs,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Compare two documents structurally.
	///
	/// Lenient by default: whitespace between block elements, whitespace
	/// runs inside text, attribute order and attribute quoting are ignored.
	/// Exits with status 1 when the documents differ.
	Compare {
		/// The expected document.
		expected: PathBuf,

		/// The actual document.
		actual: PathBuf,

		/// Compare every event exactly, including whitespace and attribute
		/// order.
		#[arg(long, default_value_t = false)]
		strict: bool,

		/// Characters of surrounding input shown on each side of a mismatch.
		#[arg(long)]
		context: Option<usize>,

		/// Show a unified diff of the two documents when they differ.
		#[arg(long, default_value_t = false)]
		diff: bool,

		#[command(flatten)]
		parse: ParseArgs,

		/// Output format for the comparison result.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

/// Parse options shared by every command. Flags override `leaf.toml`.
#[derive(Debug, Clone, Default, Args)]
pub struct ParseArgs {
	/// Template syntax.
	#[arg(long, value_enum)]
	pub mode: Option<ModeArg>,

	/// Promote directives written inside comments.
	#[arg(long, default_value_t = false)]
	pub process_comments: bool,

	/// Auto-close unclosed elements and drop unmatched close elements.
	#[arg(long, default_value_t = false)]
	pub balance: bool,

	/// Character buffer size.
	#[arg(long)]
	pub buffer_size: Option<usize>,
}

impl ParseArgs {
	/// Layer the flags on top of `config`.
	#[must_use]
	pub fn apply(&self, mut config: ParseConfig) -> ParseConfig {
		if let Some(mode) = self.mode {
			config.mode = mode.into();
		}
		if self.process_comments {
			config.process_comments = true;
		}
		if self.balance {
			config.balance_unmatched_tags = true;
		}
		if let Some(buffer_size) = self.buffer_size {
			config.buffer_size = buffer_size;
		}

		config
	}
}

/// Apply the `compare` flags on top of `config`.
#[must_use]
pub fn compare_config(strict: bool, context: Option<usize>, mut config: CompareConfig) -> CompareConfig {
	if strict {
		config.lenient = false;
	}
	if let Some(context) = context {
		config.context = context;
	}

	config
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
	/// `<name attr="value">` elements and `<!-- -->` comments.
	Markup,
	/// `[#name attr="value"]` elements and `/* */` comments.
	Text,
}

impl From<ModeArg> for ParseMode {
	fn from(mode: ModeArg) -> Self {
		match mode {
			ModeArg::Markup => Self::Markup,
			ModeArg::Text => Self::Text,
		}
	}
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
