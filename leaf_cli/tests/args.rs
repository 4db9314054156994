use clap::Parser;
use leaf_cli::Commands;
use leaf_cli::LeafCli;
use leaf_cli::compare_config;
use leaf_core::AnyEmptyResult;
use leaf_core::CompareConfig;
use leaf_core::ParseConfig;
use leaf_core::ParseMode;
use similar_asserts::assert_eq;

#[test]
fn parse_flags_override_config() -> AnyEmptyResult {
	let cli = LeafCli::try_parse_from([
		"leaf",
		"trace",
		"--mode",
		"text",
		"--process-comments",
		"--buffer-size",
		"8",
		"page.txt",
	])?;

	let Some(Commands::Trace { files, parse, .. }) = cli.command else {
		panic!("expected the trace command");
	};
	assert_eq!(files.len(), 1);

	let config = parse.apply(ParseConfig::markup().with_balance_unmatched_tags(true));
	assert_eq!(config.mode, ParseMode::Text);
	assert!(config.process_comments);
	assert!(config.balance_unmatched_tags);
	assert_eq!(config.buffer_size, 8);

	Ok(())
}

#[test]
fn missing_flags_keep_config_values() -> AnyEmptyResult {
	let cli = LeafCli::try_parse_from(["leaf", "check", "page.txt"])?;

	let Some(Commands::Check { parse, .. }) = cli.command else {
		panic!("expected the check command");
	};
	let loaded = ParseConfig::text().with_process_comments(true);
	assert_eq!(parse.apply(loaded), loaded);

	Ok(())
}

#[test]
fn compare_flags_override_config() {
	let loaded = CompareConfig::default();

	assert_eq!(compare_config(false, None, loaded), loaded);
	assert_eq!(compare_config(true, Some(3), loaded), CompareConfig {
		lenient: false,
		context: 3,
	});
}

#[test]
fn trace_requires_a_file() {
	assert!(LeafCli::try_parse_from(["leaf", "trace"]).is_err());
}
