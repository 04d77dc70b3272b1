use crate::analysis::syntax::parse_source;
use crate::analysis::{BasicKind, Pos, Receiver, Type, Unit};

fn unit(src: &str) -> Unit {
	parse_source("a.go", src).expect("source parses")
}

#[test]
fn forward_references_bind_to_the_same_named_type() {
	let unit = unit("package a\ntype A struct{ B B }\ntype B int\n");
	let a = unit.lookup("A").expect("A declared");
	let b = unit.lookup("B").expect("B declared");

	let Some(Type::Struct(fields)) = unit.types.underlying(a).map(|id| unit.types.get(id)) else {
		panic!("A is a struct");
	};
	assert_eq!(fields[0].ty, b);
	assert_eq!(unit.types.display(b).to_string(), "a.B");
	assert_eq!(unit.types.display(fields[0].ty).to_string(), "a.B");
}

#[test]
fn struct_nodes_are_recorded_in_pre_order() {
	let unit = unit("package a\ntype Outer struct {\n\tIn struct {\n\t\tDeep struct{}\n\t}\n}\ntype Next struct{}\n");
	let positions: Vec<_> = unit.structs.iter().map(|node| node.pos).collect();
	assert_eq!(positions, vec![Pos::new(2, 12), Pos::new(3, 5), Pos::new(4, 8), Pos::new(7, 11)]);
	assert!(unit.structs.iter().all(|node| node.ty.is_some()));
}

#[test]
fn aliases_share_the_aliased_type() {
	let unit = unit("package a\ntype Old = New\ntype New struct{ X int }\nfunc (n New) M() {}\n");
	assert_eq!(unit.lookup("Old"), unit.lookup("New"));
	assert_eq!(unit.structs.len(), 1);
	assert!(unit.scope.iter().any(|entry| entry.name.as_ref() == "Old" && entry.alias));
}

#[test]
fn methods_attach_with_their_receiver_form() {
	let unit = unit(
		"package a\nfunc (k Key) MarshalText() ([]byte, error) { return nil, nil }\nfunc (k *Key) UnmarshalText(b []byte) error { return nil }\ntype Key string\n",
	);
	let key = unit.lookup("Key").expect("Key declared");
	let named = unit.types.named(key).expect("Key is named");
	let forms: Vec<_> = named.methods.iter().map(|method| (method.name.as_ref(), method.recv)).collect();
	assert_eq!(forms, vec![("MarshalText", Receiver::Value), ("UnmarshalText", Receiver::Pointer)]);
	assert_eq!(unit.types.signature_identity(&named.methods[1].sig), "func([]uint8) error");
}

#[test]
fn undefined_names_become_invalid_with_an_issue() {
	let unit = unit("package a\ntype T struct{ X Missing; Y time.Duration }\n");
	let t = unit.lookup("T").expect("T declared");
	let Some(Type::Struct(fields)) = unit.types.underlying(t).map(|id| unit.types.get(id)) else {
		panic!("T is a struct");
	};
	assert_eq!(unit.types.get(fields[0].ty), &Type::Basic(BasicKind::Invalid));
	assert_eq!(unit.types.get(fields[1].ty), &Type::Basic(BasicKind::Invalid));
	assert_eq!(unit.issues.len(), 1);
	assert!(unit.issues[0].message.contains("Missing"));
}

#[test]
fn broken_declarations_leave_incomplete_struct_nodes() {
	let unit = unit("package a\ntype Bad struct {\n\tX map[int]\n}\ntype Good struct{ A int }\n");
	assert_eq!(unit.structs.len(), 2);
	assert_eq!(unit.structs[0].ty, None);
	assert!(unit.structs[1].ty.is_some());

	let bad = unit.lookup("Bad").expect("Bad still declared");
	assert_eq!(unit.types.named(bad).and_then(|named| named.underlying), None);
}

#[test]
fn variadic_parameters_become_slices() {
	let unit = unit("package a\ntype F func(format string, args ...any)\n");
	let f = unit.lookup("F").expect("F declared");
	let underlying = unit.types.underlying(f).expect("F resolved");
	assert_eq!(unit.types.display(underlying).to_string(), "func(format string, args ...interface{})");
}

#[test]
fn embedded_fields_are_named_after_their_type() {
	let unit = unit("package a\ntype Base struct{}\ntype T struct {\n\tBase\n\t*Other `json:\"other\"`\n}\ntype Other int\n");
	let t = unit.lookup("T").expect("T declared");
	let Some(Type::Struct(fields)) = unit.types.underlying(t).map(|id| unit.types.get(id)) else {
		panic!("T is a struct");
	};
	let names: Vec<_> = fields.iter().map(|field| (field.name.as_ref(), field.embedded)).collect();
	assert_eq!(names, vec![("Base", true), ("Other", true)]);
	assert_eq!(fields[1].tag.as_ref(), "json:\"other\"");
}

#[test]
fn self_referential_declarations_terminate() {
	let unit = unit("package a\ntype A B\ntype B A\n");
	let a = unit.lookup("A").expect("A declared");
	assert_eq!(unit.types.underlying(a), None);
}

#[test]
fn local_types_resolve_but_stay_out_of_package_scope() {
	let unit = unit("package a\ntype Name string\nfunc f() {\n\ttype L struct{ N Name }\n\ttype A = L\n\tvar _ A\n}\nvar V []struct{ X L }\n");

	assert!(unit.lookup("L").is_none());
	assert!(unit.lookup("A").is_none());
	assert_eq!(unit.structs.len(), 2);
	assert!(unit.structs.iter().all(|node| node.ty.is_some()));
	// Outside the body `L` is undefined again.
	assert_eq!(unit.issues.len(), 1, "{:?}", unit.issues);
	assert_eq!(unit.issues[0].pos, Pos::new(8, 19));
}
