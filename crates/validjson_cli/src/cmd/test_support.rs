use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use validjson_testkit::{fixture_path as shared_fixture_path, target_dir as workspace_target_dir};

static VALIDJSON_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_path(name: &str) -> PathBuf {
	shared_fixture_path(name)
}

pub(crate) fn run_validjson(args: &[&str]) -> Output {
	Command::new(validjson_bin())
		.args(args)
		.env_remove("RUST_LOG")
		.env_remove("VALIDJSON_LOG_LEVEL")
		.env_remove("VALIDJSON_LOG_FORMAT")
		.output()
		.expect("validjson command executes")
}

/// Run and parse stdout as JSON, requiring the given exit code.
pub(crate) fn run_validjson_json(args: &[&str], code: i32) -> serde_json::Value {
	let output = run_validjson(args);
	assert_eq!(
		output.status.code(),
		Some(code),
		"validjson exited with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn validjson_bin() -> &'static PathBuf {
	VALIDJSON_BIN.get_or_init(resolve_validjson_bin)
}

fn resolve_validjson_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_validjson") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "validjson.exe" } else { "validjson" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "validjson"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build validjson binary at {}", bin.display());

	bin
}
