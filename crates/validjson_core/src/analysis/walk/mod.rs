use std::fmt;
use std::sync::Arc;

use crate::analysis::{Capabilities, Checker, Pos, Type, Unit, is_active};

/// Walker configuration.
#[derive(Debug, Clone)]
pub struct CheckOptions {
	/// Struct tag key holding the serialization directive.
	pub tag_key: Arc<str>,
}

impl Default for CheckOptions {
	fn default() -> Self {
		Self {
			tag_key: Arc::<str>::from("json"),
		}
	}
}

/// One reported field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	/// Position of the offending field.
	pub pos: Pos,
	/// Field name.
	pub field: Arc<str>,
	/// Go-style string of the field type.
	pub type_name: Arc<str>,
	/// Rendered message.
	pub message: String,
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.pos, self.message)
	}
}

/// Check every struct type of `unit` in pre-order.
///
/// Struct nodes without type information are skipped, as are fields whose
/// tag has no active directive. Each remaining field with a type JSON
/// cannot represent yields one diagnostic.
pub fn check_unit(unit: &Unit, caps: &Capabilities, options: &CheckOptions) -> Vec<Diagnostic> {
	let checker = Checker::new(&unit.types, caps);
	let mut out = Vec::new();

	for node in &unit.structs {
		let fields = match node.ty.map(|id| unit.types.get(id)) {
			Some(Type::Struct(fields)) => fields,
			_ => {
				tracing::debug!(file = %unit.file.display(), pos = %node.pos, "struct type information unavailable; skipped");
				continue;
			}
		};

		for field in fields {
			if !is_active(&field.tag, &options.tag_key) {
				continue;
			}
			if checker.is_serializable(field.ty) {
				continue;
			}

			let type_name = unit.types.display(field.ty).to_string();
			out.push(Diagnostic {
				pos: field.pos,
				field: Arc::<str>::from(field.name.as_ref()),
				message: format!("struct field has {} tag but non-serializable type {type_name}", options.tag_key),
				type_name: Arc::<str>::from(type_name),
			});
		}
	}

	tracing::debug!(
		file = %unit.file.display(),
		structs = unit.structs.len(),
		diagnostics = out.len(),
		"checked unit"
	);
	out
}
