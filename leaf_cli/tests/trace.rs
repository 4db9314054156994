mod common;

use leaf_core::AnyEmptyResult;
use rstest::rstest;
use serde_json::Value;
use similar_asserts::assert_eq;

#[rstest]
#[case::text_element(&["--mode", "text"], "[#hello/]", "[SES(hello){1,1}SEE(hello){1,8}]\n")]
#[case::comments_as_text(
	&["--mode", "text"],
	"/*[#hello/]*/",
	"[T(/*){1,1}SES(hello){1,3}SEE(hello){1,10}T(*/){1,12}]\n"
)]
#[case::comment_directive(
	&["--mode", "text", "--process-comments"],
	"/*[#hello/]*/",
	"[SES(hello){1,3}SEE(hello){1,10}]\n"
)]
#[case::balanced(
	&["--mode", "text", "--balance"],
	"[#a]x",
	"[OES(a){1,1}OEE(a){1,4}T(x){1,5}CES(a){1,6}CEE(a){1,6}]\n"
)]
#[case::tiny_buffer(&["--buffer-size", "1"], "<p>hi</p>", "[OES(p){1,1}OEE(p){1,3}T(hi){1,4}CES(p){1,6}CEE(p){1,9}]\n")]
fn trace_prints_canonical_trace(
	#[case] flags: &[&str],
	#[case] content: &str,
	#[case] expected: &str,
) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = common::write_file(tmp.path(), "template.txt", content);

	let output = common::leaf_cmd()
		.arg("trace")
		.args(flags)
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	assert_eq!(String::from_utf8(output.stdout)?, expected);

	Ok(())
}

#[test]
fn trace_reads_standard_input() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::leaf_cmd()
		.arg("trace")
		.arg("-")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("<p>hi</p>")
		.assert()
		.success()
		.stdout("[OES(p){1,1}OEE(p){1,3}T(hi){1,4}CES(p){1,6}CEE(p){1,9}]\n");

	Ok(())
}

#[test]
fn trace_uses_mode_from_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "leaf.toml", "[parse]\nmode = \"text\"\n");
	let file = common::write_file(tmp.path(), "template.txt", "[#hello/]");

	common::leaf_cmd()
		.arg("trace")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("[SES(hello){1,1}SEE(hello){1,8}]\n");

	Ok(())
}

#[test]
fn trace_json_lists_events() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = common::write_file(tmp.path(), "template.txt", "[#hello/]");

	let output = common::leaf_cmd()
		.arg("trace")
		.arg("--mode")
		.arg("text")
		.arg("--format")
		.arg("json")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let value: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(value[0]["trace"], "[SES(hello){1,1}SEE(hello){1,8}]");
	assert_eq!(value[0]["events"][0]["type"], "documentStart");
	assert_eq!(value[0]["events"][1]["type"], "standaloneElementStart");
	assert_eq!(value[0]["events"][1]["minimized"], true);
	assert_eq!(value[0]["events"][2]["position"]["column"], 8);

	Ok(())
}

#[test]
fn trace_multiple_files_prefixes_names() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let first = common::write_file(tmp.path(), "first.html", "<br>");
	let second = common::write_file(tmp.path(), "second.html", "x");

	common::leaf_cmd()
		.arg("trace")
		.arg(&first)
		.arg(&second)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("first.html: [SES(br){1,1}SEE(br){1,4}]"))
		.stdout(predicates::str::contains("second.html: [T(x){1,1}]"));

	Ok(())
}

#[test]
fn trace_fails_on_mismatched_element() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = common::write_file(tmp.path(), "bad.txt", "[#hello]x[/bye]");

	common::leaf_cmd()
		.arg("trace")
		.arg("--mode")
		.arg("text")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse"))
		.stderr(predicates::str::contains("leaf::mismatched_element"));

	Ok(())
}

#[test]
fn trace_rejects_zero_buffer_size() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = common::write_file(tmp.path(), "template.txt", "x");

	common::leaf_cmd()
		.arg("trace")
		.arg("--buffer-size")
		.arg("0")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("buffer size must be at least 1"));

	Ok(())
}
