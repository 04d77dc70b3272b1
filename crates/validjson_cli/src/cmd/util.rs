use std::io::{self, Write};
use std::path::Path;

use validjson::analysis::Result;

/// Print `payload` as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	write_json(&mut io::stdout().lock(), payload)
}

fn write_json<W: Write, T: serde::Serialize>(out: &mut W, payload: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(payload).map_err(io::Error::from)?;
	writeln!(out, "{text}")?;
	Ok(())
}

/// Render a path the way it is printed in diagnostics.
pub(crate) fn path_label(path: &Path) -> String {
	path.display().to_string()
}
