use assert_cmd::Command;

pub fn leaf_cmd() -> Command {
	let mut cmd = Command::cargo_bin("leaf").unwrap_or_else(|e| panic!("leaf binary: {e}"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

/// Write `content` to `name` inside `dir`, returning the full path.
pub fn write_file(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
	let path = dir.join(name);
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {name}: {e}"));
	path
}
