//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Expected diagnostic taken from a `// want "..."` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Want {
	/// 1-based line the comment sits on.
	pub line: u32,
	/// Text the diagnostic message must contain.
	pub pattern: String,
}

/// Collect every `// want "..."` expectation in `source`.
///
/// A comment may list several quoted patterns; each one expects its own
/// diagnostic on that line. Only `\"` and `\\` escapes are understood.
pub fn wants(source: &str) -> Vec<Want> {
	let mut out = Vec::new();
	for (idx, text) in source.lines().enumerate() {
		let Some(at) = text.find("// want ") else {
			continue;
		};
		let mut rest = &text[at + "// want ".len()..];
		while let Some((pattern, tail)) = quoted(rest.trim_start()) {
			out.push(Want {
				line: idx as u32 + 1,
				pattern,
			});
			rest = tail;
		}
	}
	out
}

/// Leading double-quoted string of `text` and the text after it.
fn quoted(text: &str) -> Option<(String, &str)> {
	let body = text.strip_prefix('"')?;
	let mut pattern = String::new();
	let mut chars = body.char_indices();
	while let Some((idx, ch)) = chars.next() {
		match ch {
			'"' => return Some((pattern, &body[idx + 1..])),
			'\\' => pattern.push(chars.next()?.1),
			_ => pattern.push(ch),
		}
	}
	None
}
