use std::fs;
use std::io;
use std::path::PathBuf;

use crate::analysis::{CheckError, MethodSet, Result, Type, Unit, interface_method_set, parse_package};

/// Package holding the text capability interfaces.
pub const ENCODING_PACKAGE: &str = "encoding";
/// Interface implemented by values that render themselves as text.
pub const TEXT_MARSHALER: &str = "TextMarshaler";
/// Interface implemented by pointers that parse themselves from text.
pub const TEXT_UNMARSHALER: &str = "TextUnmarshaler";

const ENCODING_SOURCE: &str = r#"package encoding

type BinaryMarshaler interface {
	MarshalBinary() (data []byte, err error)
}

type BinaryUnmarshaler interface {
	UnmarshalBinary(data []byte) error
}

type TextMarshaler interface {
	MarshalText() (text []byte, err error)
}

type TextUnmarshaler interface {
	UnmarshalText(text []byte) error
}
"#;

/// Source of imported packages.
pub trait Importer {
	/// Load the package with the given import path.
	fn import(&self, path: &str) -> Result<Unit>;
}

/// Built-in standard packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdImporter;

impl Importer for StdImporter {
	fn import(&self, path: &str) -> Result<Unit> {
		match path {
			ENCODING_PACKAGE => parse_package(ENCODING_PACKAGE, "$builtin/encoding.go", ENCODING_SOURCE),
			other => Err(CheckError::DependencyUnavailable {
				package: other.to_owned(),
				name: None,
				detail: "package is not built in".to_owned(),
			}),
		}
	}
}

/// Packages read from `<root>/<path>.go`.
#[derive(Debug, Clone)]
pub struct DirImporter {
	/// Directory holding one source file per package.
	pub root: PathBuf,
}

impl DirImporter {
	/// Create an importer rooted at `root`.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}
}

impl Importer for DirImporter {
	fn import(&self, path: &str) -> Result<Unit> {
		let file = self.root.join(format!("{path}.go"));
		let source = match fs::read_to_string(&file) {
			Ok(source) => source,
			Err(err) if err.kind() == io::ErrorKind::NotFound => {
				return Err(CheckError::DependencyUnavailable {
					package: path.to_owned(),
					name: None,
					detail: format!("{} not found", file.display()),
				});
			}
			Err(err) => return Err(err.into()),
		};
		parse_package(path, file, &source)
	}
}

/// Required method set of one capability interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
	name: Box<str>,
	methods: MethodSet,
}

impl Capability {
	/// Build a capability from its qualified name and required methods.
	pub fn new(name: impl Into<Box<str>>, methods: MethodSet) -> Self {
		Self {
			name: name.into(),
			methods,
		}
	}

	/// Qualified interface name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Required methods.
	pub fn methods(&self) -> &MethodSet {
		&self.methods
	}

	/// Whether `set` contains every required method.
	pub fn is_satisfied_by(&self, set: &MethodSet) -> bool {
		set.includes(&self.methods)
	}
}

/// The text conversion capability pair used by the map-key rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
	/// Value receiver renders itself as text.
	pub text_marshaler: Capability,
	/// Pointer receiver parses itself from text.
	pub text_unmarshaler: Capability,
}

impl Capabilities {
	/// Import the `encoding` package and read both capability interfaces.
	pub fn resolve(importer: &dyn Importer) -> Result<Self> {
		let unit = importer.import(ENCODING_PACKAGE).map_err(|err| match err {
			CheckError::DependencyUnavailable { .. } => err,
			other => CheckError::DependencyUnavailable {
				package: ENCODING_PACKAGE.to_owned(),
				name: None,
				detail: other.to_string(),
			},
		})?;

		let caps = Self {
			text_marshaler: capability_from(&unit, TEXT_MARSHALER)?,
			text_unmarshaler: capability_from(&unit, TEXT_UNMARSHALER)?,
		};
		tracing::debug!(
			marshaler = caps.text_marshaler.methods().len(),
			unmarshaler = caps.text_unmarshaler.methods().len(),
			"resolved text capabilities"
		);
		Ok(caps)
	}

	/// Build the pair from explicit method sets.
	pub fn from_method_sets(marshaler: MethodSet, unmarshaler: MethodSet) -> Self {
		Self {
			text_marshaler: Capability::new(format!("{ENCODING_PACKAGE}.{TEXT_MARSHALER}"), marshaler),
			text_unmarshaler: Capability::new(format!("{ENCODING_PACKAGE}.{TEXT_UNMARSHALER}"), unmarshaler),
		}
	}
}

fn capability_from(unit: &Unit, name: &str) -> Result<Capability> {
	let missing = |detail: &str| CheckError::DependencyUnavailable {
		package: unit.path.to_string(),
		name: Some(name.to_owned()),
		detail: format!("{name} {detail}"),
	};

	let id = unit.lookup(name).ok_or_else(|| missing("is not declared"))?;
	let underlying = unit.types.underlying(id).ok_or_else(|| missing("has no underlying type"))?;
	if !matches!(unit.types.get(underlying), Type::Interface(_)) {
		return Err(missing("is not an interface"));
	}

	Ok(Capability::new(
		format!("{}.{name}", unit.path),
		interface_method_set(&unit.types, id),
	))
}

#[cfg(test)]
mod tests;
