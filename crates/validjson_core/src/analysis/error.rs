use std::path::PathBuf;

use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, CheckError>;

/// Errors produced while loading sources, importing packages, and preparing a check run.
#[derive(Debug, Error)]
pub enum CheckError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// The package providing the text capability descriptors could not be loaded.
	#[error("unable to import '{package}' for analysis: {detail}")]
	DependencyUnavailable {
		/// Import path of the package that failed to load.
		package: String,
		/// Missing or malformed member, when the package itself loaded.
		name: Option<String>,
		/// Human readable cause.
		detail: String,
	},
	/// Fatal lexical error or missing package clause.
	#[error("{}:{line}:{column}: {message}", .file.display())]
	Syntax {
		/// Source file being read.
		file: PathBuf,
		/// 1-based line.
		line: u32,
		/// 1-based byte column.
		column: u32,
		/// Description of the problem.
		message: String,
	},
	/// Requested type name is not declared in the unit.
	#[error("type not found: {name}")]
	UnknownType {
		/// Requested type name.
		name: String,
	},
}
