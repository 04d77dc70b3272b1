//! Declaration front end for Go source files.
//!
//! Only what the checker needs is understood: type declarations, method
//! signatures, and struct type expressions. Function bodies are skipped.

mod ast;
mod lexer;
mod parser;
mod resolve;
mod token;

use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::{CheckError, Pos, Result, Unit};

/// Fatal front-end error before it is tied to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SyntaxError {
	pub pos: Pos,
	pub message: String,
}

impl SyntaxError {
	fn into_check_error(self, file: &Path) -> CheckError {
		CheckError::Syntax {
			file: file.to_path_buf(),
			line: self.pos.line,
			column: self.pos.column,
			message: self.message,
		}
	}
}

/// Parse `src` as a unit whose import path is its package name.
pub fn parse_source(file: impl Into<PathBuf>, src: &str) -> Result<Unit> {
	parse_unit(None, file.into(), src)
}

/// Parse `src` as the package imported under `import_path`.
pub fn parse_package(import_path: &str, file: impl Into<PathBuf>, src: &str) -> Result<Unit> {
	parse_unit(Some(import_path), file.into(), src)
}

/// Read and parse one source file.
pub fn parse_file(path: &Path) -> Result<Unit> {
	let src = fs::read_to_string(path)?;
	parse_source(path, &src)
}

fn parse_unit(import_path: Option<&str>, file: PathBuf, src: &str) -> Result<Unit> {
	let tokens = lexer::tokenize(src).map_err(|err| err.into_check_error(&file))?;
	let ast = parser::parse(tokens).map_err(|err| err.into_check_error(&file))?;
	let import_path = import_path.unwrap_or(ast.package).to_owned();
	let unit = resolve::build_unit(ast, file, &import_path);

	for issue in &unit.issues {
		tracing::warn!(file = %unit.file.display(), pos = %issue.pos, "{}", issue.message);
	}
	tracing::debug!(
		file = %unit.file.display(),
		package = %unit.path,
		types = unit.types.len(),
		structs = unit.structs.len(),
		"parsed unit"
	);
	Ok(unit)
}
