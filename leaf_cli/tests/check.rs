mod common;

use leaf_core::AnyEmptyResult;
use serde_json::Value;
use similar_asserts::assert_eq;

#[test]
fn check_passes_for_valid_templates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let first = common::write_file(tmp.path(), "first.txt", "[#p]a[/p]");
	let second = common::write_file(tmp.path(), "second.txt", "[#br/]");

	common::leaf_cmd()
		.arg("check")
		.arg("--mode")
		.arg("text")
		.arg(&first)
		.arg(&second)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("2 template(s) parsed without errors"));

	Ok(())
}

#[test]
fn check_reports_failure_positions() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let good = common::write_file(tmp.path(), "good.txt", "[#p]a[/p]");
	let bad = common::write_file(tmp.path(), "bad.txt", "[#hello]x[/bye]");
	let unclosed = common::write_file(tmp.path(), "unclosed.txt", "[#hello]x");

	common::leaf_cmd()
		.arg("check")
		.arg("--mode")
		.arg("text")
		.arg(&good)
		.arg(&bad)
		.arg(&unclosed)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("bad.txt:1:10:"))
		.stderr(predicates::str::contains("unclosed.txt: element `hello`"))
		.stderr(predicates::str::contains("2 of 3 template(s) failed to parse"));

	Ok(())
}

#[test]
fn check_balance_flag_accepts_unclosed_elements() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let unclosed = common::write_file(tmp.path(), "unclosed.txt", "[#hello]x");

	common::leaf_cmd()
		.arg("check")
		.arg("--mode")
		.arg("text")
		.arg("--balance")
		.arg(&unclosed)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	Ok(())
}

#[test]
fn check_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let bad = common::write_file(tmp.path(), "bad.html", "<p class=\"a>");

	let output = common::leaf_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg(&bad)
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let value: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(value["ok"], false);
	assert_eq!(value["checked"], 1);
	assert_eq!(value["errors"][0]["line"], 1);
	assert_eq!(value["errors"][0]["column"], 10);

	Ok(())
}
