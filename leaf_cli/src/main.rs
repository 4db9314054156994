use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use leaf_cli::Commands;
use leaf_cli::LeafCli;
use leaf_cli::OutputFormat;
use leaf_cli::ParseArgs;
use leaf_cli::compare_config;
use leaf_core::AnyResult;
use leaf_core::Comparator;
use leaf_core::Comparison;
use leaf_core::Event;
use leaf_core::LeafConfig;
use leaf_core::LeafError;
use leaf_core::Mismatch;
use leaf_core::ParseConfig;
use leaf_core::Trace;
use leaf_core::TraceBuilder;
use leaf_core::parse_reader;
use leaf_core::parse_trace;
use owo_colors::OwoColorize;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Path that reads the template from standard input.
const STDIN_PATH: &str = "-";

/// Terminal styles used by the report output.
#[derive(Clone, Copy)]
enum Tone {
	Failure,
	Success,
	Heading,
}

/// Render `text` in `tone`, or unchanged when colors are disabled.
fn paint(text: impl std::fmt::Display, tone: Tone) -> String {
	if !USE_COLOR.load(std::sync::atomic::Ordering::Relaxed) {
		return text.to_string();
	}

	match tone {
		Tone::Failure => text.red().to_string(),
		Tone::Success => text.green().to_string(),
		Tone::Heading => text.bold().to_string(),
	}
}

fn main() {
	let args = LeafCli::parse();

	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	USE_COLOR.store(use_color, std::sync::atomic::Ordering::Relaxed);
	init_reports(use_color);
	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Trace {
			files,
			parse,
			format,
		}) => run_trace(&args, files, parse, *format),
		Some(Commands::Check {
			files,
			parse,
			format,
		}) => run_check(&args, files, parse, *format),
		Some(Commands::Compare {
			expected,
			actual,
			strict,
			context,
			diff,
			parse,
			format,
		}) => {
			run_compare(
				&args,
				CompareArgs {
					expected,
					actual,
					strict: *strict,
					context: *context,
					diff: *diff,
					parse,
					format: *format,
				},
			)
		}
		None => {
			eprintln!("No subcommand specified. Run `leaf --help` for usage.");
			process::exit(1);
		}
	};

	match result {
		Ok(true) => process::exit(1),
		Ok(false) => {}
		Err(error) => {
			// Parse and config errors carry codes and positions.
			match error.downcast::<LeafError>() {
				Ok(error) => eprintln!("{:?}", miette::Report::from(*error)),
				Err(error) => eprintln!("{} {error}", paint("error:", Tone::Failure)),
			}
			process::exit(2);
		}
	}
}

/// Errors are rendered as miette reports. Colors and unicode framing follow
/// the color setting so piped output stays plain.
fn init_reports(use_color: bool) {
	let installed = miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}));

	if installed.is_err() {
		tracing::debug!("report handler already installed");
	}
}

fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "leaf_core=debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.try_init()
		.ok();
}

fn resolve_root(args: &LeafCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(args: &LeafCli) -> Result<LeafConfig, LeafError> {
	let root = resolve_root(args);
	tracing::debug!(root = %root.display(), "resolving config");

	Ok(LeafConfig::load(&root)?.unwrap_or_default())
}

fn parse_config(args: &LeafCli, parse: &ParseArgs) -> Result<ParseConfig, LeafError> {
	let config = parse.apply(load_config(args)?.parse);
	config.validate()?;

	Ok(config)
}

fn display_path(path: &Path) -> String {
	if path.as_os_str() == STDIN_PATH {
		"<stdin>".to_string()
	} else {
		path.display().to_string()
	}
}

fn read_file(path: &Path) -> Result<String, LeafError> {
	if path.as_os_str() == STDIN_PATH {
		let mut content = String::new();
		std::io::stdin().read_to_string(&mut content)?;
		return Ok(content);
	}

	Ok(std::fs::read_to_string(path)?)
}

/// Parse a template. Standard input is streamed through the reader instead
/// of being collected first.
fn trace_file(path: &Path, config: &ParseConfig) -> Result<Trace, LeafError> {
	if path.as_os_str() == STDIN_PATH {
		let mut builder = TraceBuilder::new();
		parse_reader(std::io::stdin().lock(), config, &mut builder)?;
		return Ok(builder.finish()?);
	}

	let content = std::fs::read_to_string(path)?;
	Ok(parse_trace(&content, config)?)
}

fn run_trace(
	args: &LeafCli,
	files: &[PathBuf],
	parse: &ParseArgs,
	format: OutputFormat,
) -> AnyResult<bool> {
	let config = parse_config(args, parse)?;
	let mut entries = Vec::new();

	for file in files {
		let trace = match trace_file(file, &config) {
			Ok(trace) => trace,
			Err(error) => {
				eprintln!(
					"{} {}",
					paint("failed to parse", Tone::Failure),
					display_path(file)
				);
				return Err(error.into());
			}
		};

		match format {
			OutputFormat::Json => {
				entries.push(serde_json::json!({
					"file": display_path(file),
					"trace": trace.to_string(),
					"events": trace,
				}));
			}
			OutputFormat::Text if files.len() > 1 => {
				println!("{} {trace}", paint(format!("{}:", display_path(file)), Tone::Heading));
			}
			OutputFormat::Text => println!("{trace}"),
		}
	}

	if matches!(format, OutputFormat::Json) {
		println!("{}", serde_json::Value::Array(entries));
	}

	Ok(false)
}

fn run_check(
	args: &LeafCli,
	files: &[PathBuf],
	parse: &ParseArgs,
	format: OutputFormat,
) -> AnyResult<bool> {
	let config = parse_config(args, parse)?;
	let mut failures: Vec<(String, LeafError)> = Vec::new();

	for file in files {
		match trace_file(file, &config) {
			Ok(trace) => {
				tracing::debug!(file = %display_path(file), events = trace.len(), "template parsed");
			}
			Err(error) => failures.push((display_path(file), error)),
		}
	}

	match format {
		OutputFormat::Json => {
			let errors: Vec<serde_json::Value> = failures
				.iter()
				.map(|(file, error)| {
					let position = error_position(error);
					serde_json::json!({
						"file": file,
						"line": position.map(|position| position.line),
						"column": position.map(|position| position.column),
						"message": error.to_string(),
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": failures.is_empty(),
				"checked": files.len(),
				"errors": errors,
			});
			println!("{output}");
		}
		OutputFormat::Text if failures.is_empty() => {
			println!(
				"{} {} template(s) parsed without errors.",
				paint("Check passed:", Tone::Success),
				files.len()
			);
		}
		OutputFormat::Text => {
			eprintln!("{}", paint("Check failed.", Tone::Failure));
			for (file, error) in &failures {
				match error_position(error) {
					Some(position) => {
						eprintln!("  {file}:{}:{}: {error}", position.line, position.column);
					}
					None => eprintln!("  {file}: {error}"),
				}
			}
			eprintln!();
			eprintln!(
				"{} of {} template(s) failed to parse.",
				failures.len(),
				files.len()
			);
		}
	}

	Ok(!failures.is_empty())
}

fn error_position(error: &LeafError) -> Option<leaf_core::Position> {
	match error {
		LeafError::Parse(error) => error.position(),
		_ => None,
	}
}

struct CompareArgs<'a> {
	expected: &'a Path,
	actual: &'a Path,
	strict: bool,
	context: Option<usize>,
	diff: bool,
	parse: &'a ParseArgs,
	format: OutputFormat,
}

fn run_compare(args: &LeafCli, compare: CompareArgs<'_>) -> AnyResult<bool> {
	let config = load_config(args)?;
	let parse = compare.parse.apply(config.parse);
	parse.validate()?;
	let compare_settings = compare_config(compare.strict, compare.context, config.compare);

	let expected = read_file(compare.expected)?;
	let actual = read_file(compare.actual)?;

	let comparator = Comparator::new(compare_settings).with_parse_config(parse);
	let comparison = comparator
		.compare(&expected, &actual)
		.map_err(LeafError::from)?;

	print_comparison(&comparison, compare.format);
	if compare.diff && !comparison.is_match() && matches!(compare.format, OutputFormat::Text) {
		eprintln!();
		print_diff(&compare, &expected, &actual);
	}

	Ok(!comparison.is_match())
}

fn print_comparison(comparison: &Comparison, format: OutputFormat) {
	if matches!(format, OutputFormat::Json) {
		println!("{}", serde_json::json!(comparison));
		return;
	}

	let Some(mismatch) = comparison.mismatch() else {
		println!("{}", paint("Documents match.", Tone::Success));
		return;
	};

	print_mismatch(mismatch);
}

fn print_mismatch(mismatch: &Mismatch) {
	eprintln!(
		"{} at line {}, column {}.",
		paint("Documents differ", Tone::Failure),
		mismatch.line,
		mismatch.column
	);
	eprintln!(
		"  expected: {} in `{}`",
		describe(mismatch.expected_event.as_ref()),
		mismatch.expected_fragment
	);
	eprintln!(
		"  actual:   {} in `{}`",
		describe(mismatch.actual_event.as_ref()),
		mismatch.actual_fragment
	);
}

fn describe(event: Option<&Event>) -> String {
	event.map_or_else(|| "end of document".to_string(), ToString::to_string)
}

/// Unified diff of the two documents, labelled with their paths.
fn print_diff(compare: &CompareArgs<'_>, expected: &str, actual: &str) {
	let diff = TextDiff::from_lines(expected, actual)
		.unified_diff()
		.context_radius(2)
		.header(&display_path(compare.expected), &display_path(compare.actual))
		.to_string();

	for line in diff.lines() {
		let line = match line.chars().next() {
			Some('@') => paint(line, Tone::Heading),
			Some('-') => paint(line, Tone::Failure),
			Some('+') => paint(line, Tone::Success),
			_ => line.to_string(),
		};
		eprintln!("  {line}");
	}
}
