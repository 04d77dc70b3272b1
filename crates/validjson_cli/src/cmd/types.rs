use std::path::PathBuf;

use validjson::analysis::{CheckError, MethodSet, Result, ScopeEntry, Unit, parse_file, pointer_method_set, value_method_set};

use crate::cmd::util::{emit_json, path_label};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	/// Show a single declared type.
	#[arg(long)]
	pub name: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Print declared type names with their underlying types and method sets.
pub fn run(args: Args) -> Result<()> {
	let Args { file: path, name, json } = args;

	let unit = parse_file(&path)?;
	let entries: Vec<&ScopeEntry> = match &name {
		Some(name) => {
			let entry = unit
				.scope
				.iter()
				.find(|entry| entry.name.as_ref() == name.as_str())
				.ok_or_else(|| CheckError::UnknownType { name: name.clone() })?;
			vec![entry]
		}
		None => unit.scope.iter().collect(),
	};
	let types: Vec<TypeJson> = entries.into_iter().map(|entry| type_json(&unit, entry)).collect();

	if json {
		emit_json(&TypesJson {
			path: path_label(&path),
			package: unit.package.to_string(),
			types,
		})?;
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("package: {}", unit.package);
	println!("types: {}", types.len());
	println!();
	println!("name\talias\tunderlying\tvalue_methods\tpointer_methods");
	for item in &types {
		println!(
			"{}\t{}\t{}\t{}\t{}",
			item.name,
			item.alias,
			item.underlying.as_deref().unwrap_or("-"),
			join_or_dash(&item.value_methods),
			join_or_dash(&item.pointer_methods)
		);
	}

	Ok(())
}

fn type_json(unit: &Unit, entry: &ScopeEntry) -> TypeJson {
	let types = &unit.types;
	TypeJson {
		name: entry.name.to_string(),
		alias: entry.alias,
		type_name: types.display(entry.ty).to_string(),
		underlying: types.underlying(entry.ty).map(|id| types.display(id).to_string()),
		value_methods: method_lines(&value_method_set(types, entry.ty)),
		pointer_methods: method_lines(&pointer_method_set(types, entry.ty)),
	}
}

fn method_lines(set: &MethodSet) -> Vec<String> {
	set.iter().map(|key| format!("{} {}", key.name, key.signature)).collect()
}

fn join_or_dash(items: &[String]) -> String {
	if items.is_empty() {
		return "-".to_owned();
	}
	items.join(", ")
}

#[derive(serde::Serialize)]
struct TypesJson {
	path: String,
	package: String,
	types: Vec<TypeJson>,
}

#[derive(serde::Serialize)]
struct TypeJson {
	name: String,
	alias: bool,
	#[serde(rename = "type")]
	type_name: String,
	/// `None` when the declaration could not be resolved.
	underlying: Option<String>,
	value_methods: Vec<String>,
	pointer_methods: Vec<String>,
}
