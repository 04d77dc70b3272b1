use validjson_testkit::fixture_path;

use super::{Capabilities, DirImporter, ENCODING_PACKAGE, Importer, StdImporter};
use crate::analysis::{CheckError, MethodKey, Result, Unit, parse_package};

/// Serves one package from inline source.
struct InlineImporter(&'static str);

impl Importer for InlineImporter {
	fn import(&self, path: &str) -> Result<Unit> {
		parse_package(path, format!("{path}.go"), self.0)
	}
}

#[test]
fn built_in_encoding_package_provides_the_text_pair() {
	let caps = Capabilities::resolve(&StdImporter).expect("built-in package resolves");

	assert_eq!(caps.text_marshaler.name(), "encoding.TextMarshaler");
	assert_eq!(caps.text_unmarshaler.name(), "encoding.TextUnmarshaler");
	let marshal: Vec<_> = caps.text_marshaler.methods().iter().cloned().collect();
	assert_eq!(marshal, vec![MethodKey::new("MarshalText", "func() ([]uint8, error)")]);
	let unmarshal: Vec<_> = caps.text_unmarshaler.methods().iter().cloned().collect();
	assert_eq!(unmarshal, vec![MethodKey::new("UnmarshalText", "func([]uint8) error")]);
}

#[test]
fn std_importer_only_knows_encoding() {
	let err = StdImporter.import("fmt").expect_err("fmt is not built in");
	assert!(matches!(err, CheckError::DependencyUnavailable { ref package, .. } if package == "fmt"));
	assert!(StdImporter.import(ENCODING_PACKAGE).is_ok());
}

#[test]
fn directory_importer_reads_package_files() {
	let importer = DirImporter::new(fixture_path("stdlib"));
	let caps = Capabilities::resolve(&importer).expect("fixture package resolves");
	let builtin = Capabilities::resolve(&StdImporter).expect("built-in package resolves");
	assert_eq!(caps, builtin);
}

#[test]
fn missing_package_file_is_a_dependency_error() {
	let importer = DirImporter::new(fixture_path("no-such-dir"));
	let err = Capabilities::resolve(&importer).expect_err("package file is missing");
	let CheckError::DependencyUnavailable { package, name, .. } = &err else {
		panic!("unexpected error: {err}");
	};
	assert_eq!(package, "encoding");
	assert_eq!(name, &None);
	assert!(err.to_string().starts_with("unable to import 'encoding' for analysis"));
}

#[test]
fn missing_interface_names_the_lookup() {
	let importer = InlineImporter("package encoding\n\ntype TextMarshaler interface {\n\tMarshalText() (text []byte, err error)\n}\n");
	let err = Capabilities::resolve(&importer).expect_err("TextUnmarshaler is missing");
	let CheckError::DependencyUnavailable { name, detail, .. } = &err else {
		panic!("unexpected error: {err}");
	};
	assert_eq!(name.as_deref(), Some("TextUnmarshaler"));
	assert!(detail.contains("not declared"), "{detail}");
}

#[test]
fn non_interface_capability_is_rejected() {
	let importer = InlineImporter("package encoding\n\ntype TextMarshaler struct{}\ntype TextUnmarshaler interface{ UnmarshalText([]byte) error }\n");
	let err = Capabilities::resolve(&importer).expect_err("TextMarshaler is a struct");
	assert!(err.to_string().contains("TextMarshaler is not an interface"), "{err}");
}

#[test]
fn syntax_errors_in_the_package_are_wrapped() {
	let importer = InlineImporter("type TextMarshaler interface{}\n");
	let err = Capabilities::resolve(&importer).expect_err("package clause is missing");
	let CheckError::DependencyUnavailable { package, detail, .. } = &err else {
		panic!("unexpected error: {err}");
	};
	assert_eq!(package, "encoding");
	assert!(detail.contains("package clause"), "{detail}");
}

#[test]
fn embedded_interfaces_contribute_methods() {
	let importer = InlineImporter(
		"package encoding\n\ntype base interface{ MarshalText() ([]byte, error) }\ntype TextMarshaler interface{ base }\ntype TextUnmarshaler interface{ UnmarshalText([]byte) error }\n",
	);
	let caps = Capabilities::resolve(&importer).expect("package resolves");
	assert_eq!(caps.text_marshaler.methods().len(), 1);
}
