use std::fmt;
use std::path::PathBuf;

use crate::analysis::{TypeId, TypeTable};

/// 1-based source position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
	/// Line number.
	pub line: u32,
	/// Byte column within the line.
	pub column: u32,
}

impl Pos {
	/// Build a position from line and column.
	pub fn new(line: u32, column: u32) -> Self {
		Self { line, column }
	}
}

impl fmt::Display for Pos {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

/// One struct type expression occurring in the source, in pre-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructNode {
	/// Position of the `struct` keyword.
	pub pos: Pos,
	/// Resolved struct type; `None` when type information is incomplete.
	pub ty: Option<TypeId>,
}

/// Non-fatal problem recorded by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
	/// Where the problem was found.
	pub pos: Pos,
	/// Description of the problem.
	pub message: Box<str>,
}

/// Package-level type name binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeEntry {
	/// Declared name.
	pub name: Box<str>,
	/// Bound type.
	pub ty: TypeId,
	/// Whether the declaration was an alias (`type A = B`).
	pub alias: bool,
}

/// One compilation unit: a source file with its types and struct occurrences.
#[derive(Debug)]
pub struct Unit {
	/// Source file the unit was read from.
	pub file: PathBuf,
	/// Package name from the package clause.
	pub package: Box<str>,
	/// Import path used to qualify named types.
	pub path: Box<str>,
	/// Type arena.
	pub types: TypeTable,
	/// Package-level type names in declaration order.
	pub scope: Vec<ScopeEntry>,
	/// Struct type expressions in source pre-order.
	pub structs: Vec<StructNode>,
	/// Front-end problems that did not stop parsing.
	pub issues: Vec<Issue>,
}

impl Unit {
	/// Create an empty unit.
	pub fn new(file: impl Into<PathBuf>, package: impl Into<Box<str>>, path: impl Into<Box<str>>) -> Self {
		Self {
			file: file.into(),
			package: package.into(),
			path: path.into(),
			types: TypeTable::new(),
			scope: Vec::new(),
			structs: Vec::new(),
			issues: Vec::new(),
		}
	}

	/// Look up a package-level type name.
	pub fn lookup(&self, name: &str) -> Option<TypeId> {
		self.scope.iter().find(|entry| entry.name.as_ref() == name).map(|entry| entry.ty)
	}

	/// Bind a package-level type name.
	pub fn declare(&mut self, name: impl Into<Box<str>>, ty: TypeId, alias: bool) {
		self.scope.push(ScopeEntry {
			name: name.into(),
			ty,
			alias,
		});
	}
}
