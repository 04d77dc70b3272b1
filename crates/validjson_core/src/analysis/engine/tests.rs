use crate::analysis::{
	BasicKind, Capabilities, Checker, MethodKey, MethodSet, NamedType, StdImporter, Type, TypeId, TypeTable, Unit, parse_source,
};

fn std_caps() -> Capabilities {
	Capabilities::resolve(&StdImporter).expect("built-in encoding package resolves")
}

fn unit(src: &str) -> Unit {
	parse_source("a.go", &format!("package a\n{src}\n")).expect("source parses")
}

fn declared(unit: &Unit, name: &str) -> TypeId {
	unit.lookup(name).unwrap_or_else(|| panic!("{name} declared"))
}

#[test]
fn basic_kinds_are_serializable_except_complex() {
	let caps = std_caps();
	let mut table = TypeTable::new();
	let kinds = [BasicKind::Bool, BasicKind::Int, BasicKind::Uint8, BasicKind::Float64, BasicKind::String, BasicKind::UnsafePointer];
	let ids: Vec<_> = kinds.iter().map(|kind| table.basic(*kind)).collect();
	let complex64 = table.basic(BasicKind::Complex64);
	let complex128 = table.basic(BasicKind::Complex128);

	let checker = Checker::new(&table, &caps);
	for (kind, id) in kinds.iter().zip(ids) {
		assert!(checker.is_serializable(id), "{kind:?}");
	}
	assert!(!checker.is_serializable(complex64));
	assert!(!checker.is_serializable(complex128));
}

#[test]
fn channels_and_functions_are_rejected_but_only_at_the_outer_level() {
	let unit = unit(
		"type C chan int\ntype R <-chan string\ntype F func(int) error\ntype PC *chan int\ntype SF []func()\ntype S struct{ C chan int }\ntype I interface{ M() }",
	);
	let caps = std_caps();
	let checker = Checker::new(&unit.types, &caps);

	for name in ["C", "R", "F"] {
		assert!(!checker.is_serializable(declared(&unit, name)), "{name}");
	}
	for name in ["PC", "SF", "S", "I"] {
		assert!(checker.is_serializable(declared(&unit, name)), "{name}");
	}
}

#[test]
fn map_keys_follow_the_key_rule() {
	let unit = unit(
		"type MS map[string]int\ntype MI map[int8]bool\ntype MB map[byte]int\ntype MR map[rune]int\ntype MU map[uintptr]int\ntype MF map[float64]int\ntype MBool map[bool]int\ntype MA map[[2]int]int\ntype MSt map[struct{}]int\ntype MP map[*int]int\ntype MAny map[any]int",
	);
	let caps = std_caps();
	let checker = Checker::new(&unit.types, &caps);

	for name in ["MS", "MI", "MB", "MR", "MU"] {
		assert!(checker.is_serializable(declared(&unit, name)), "{name}");
	}
	for name in ["MF", "MBool", "MA", "MSt", "MP", "MAny"] {
		assert!(!checker.is_serializable(declared(&unit, name)), "{name}");
	}
}

#[test]
fn named_keys_use_their_underlying_type_or_the_text_pair() {
	let unit = unit(
		r#"type Name string
type ID uint64
type Point struct{ X, Y int }
type Text struct{}
func (Text) MarshalText() ([]byte, error) { return nil, nil }
func (*Text) UnmarshalText([]byte) error { return nil }
type OnlyMarshal struct{}
func (OnlyMarshal) MarshalText() ([]byte, error) { return nil, nil }
type ValueBoth struct{}
func (ValueBoth) MarshalText() ([]byte, error) { return nil, nil }
func (ValueBoth) UnmarshalText([]byte) error { return nil }
type PointerMarshal struct{}
func (*PointerMarshal) MarshalText() ([]byte, error) { return nil, nil }
func (*PointerMarshal) UnmarshalText([]byte) error { return nil }
type WrongSig struct{}
func (WrongSig) MarshalText() (string, error) { return "", nil }
func (*WrongSig) UnmarshalText([]byte) error { return nil }"#,
	);
	let caps = std_caps();
	let checker = Checker::new(&unit.types, &caps);

	for name in ["Name", "ID", "Text", "ValueBoth"] {
		assert!(checker.is_valid_key(declared(&unit, name)), "{name}");
	}
	for name in ["Point", "OnlyMarshal", "PointerMarshal", "WrongSig"] {
		assert!(!checker.is_valid_key(declared(&unit, name)), "{name}");
	}
}

#[test]
fn interface_keys_have_no_pointer_methods() {
	let unit = unit("type K interface {\n\tMarshalText() ([]byte, error)\n\tUnmarshalText(text []byte) error\n}\ntype M map[K]int");
	let caps = std_caps();
	let checker = Checker::new(&unit.types, &caps);

	assert!(!checker.is_valid_key(declared(&unit, "K")));
	assert!(!checker.is_serializable(declared(&unit, "M")));
}

#[test]
fn named_layers_are_unwrapped() {
	let unit = unit("type F func()\ntype G F\ntype Key string\ntype Key2 Key\ntype M map[Key2]G");
	let caps = std_caps();
	let checker = Checker::new(&unit.types, &caps);

	assert!(!checker.is_serializable(declared(&unit, "G")));
	assert!(checker.is_valid_key(declared(&unit, "Key2")));
	assert!(checker.is_serializable(declared(&unit, "M")));
}

#[test]
fn named_types_do_not_inherit_methods_of_their_source_type() {
	let unit = unit(
		r#"type Textable [2]byte
func (Textable) MarshalText() ([]byte, error) { return nil, nil }
func (*Textable) UnmarshalText([]byte) error { return nil }
type Copy Textable
type CopyOfCopy Copy
type Label string
type Renamed Label
type M map[Copy]int"#,
	);
	let caps = std_caps();
	let checker = Checker::new(&unit.types, &caps);

	assert!(checker.is_valid_key(declared(&unit, "Textable")));
	assert!(!checker.is_valid_key(declared(&unit, "Copy")));
	assert!(!checker.is_valid_key(declared(&unit, "CopyOfCopy")));
	assert!(!checker.is_serializable(declared(&unit, "M")));
	assert!(checker.is_valid_key(declared(&unit, "Renamed")));
}

#[test]
fn self_referential_named_types_terminate() {
	let unit = unit("type A B\ntype B A\ntype M map[A]int");
	let caps = std_caps();
	let checker = Checker::new(&unit.types, &caps);

	assert!(!checker.is_serializable(declared(&unit, "A")));
	assert!(!checker.is_valid_key(declared(&unit, "A")));
	assert!(!checker.is_serializable(declared(&unit, "M")));
}

#[test]
fn self_referential_key_with_text_pair_is_still_valid() {
	let unit = unit(
		"type A B\ntype B A\nfunc (A) MarshalText() ([]byte, error) { return nil, nil }\nfunc (*A) UnmarshalText([]byte) error { return nil }",
	);
	let caps = std_caps();
	let checker = Checker::new(&unit.types, &caps);

	assert!(checker.is_valid_key(declared(&unit, "A")));
	assert!(!checker.is_valid_key(declared(&unit, "B")));
}

#[test]
fn embedded_fields_promote_text_methods() {
	let unit = unit(
		r#"type Textable [2]byte
func (Textable) MarshalText() ([]byte, error) { return nil, nil }
func (*Textable) UnmarshalText([]byte) error { return nil }
type ByValue struct{ Textable }
type ByPointer struct{ *Textable }
type Deep struct{ ByValue }
type M map[ByValue]int"#,
	);
	let caps = std_caps();
	let checker = Checker::new(&unit.types, &caps);

	for name in ["ByValue", "ByPointer", "Deep"] {
		assert!(checker.is_valid_key(declared(&unit, name)), "{name}");
	}
	assert!(checker.is_serializable(declared(&unit, "M")));
}

#[test]
fn promotion_respects_receivers_shadowing_and_ambiguity() {
	let unit = unit(
		r#"type Textable [2]byte
func (Textable) MarshalText() ([]byte, error) { return nil, nil }
func (*Textable) UnmarshalText([]byte) error { return nil }
type Other struct{}
func (Other) MarshalText() ([]byte, error) { return nil, nil }
type Ambiguous struct {
	Textable
	Other
}
type Shadowed struct {
	Textable
	MarshalText int
}
type PointerShadow struct{ Textable }
func (*PointerShadow) MarshalText() ([]byte, error) { return nil, nil }
type Outer struct {
	Textable
	Inner
}
type Inner struct{ Other }"#,
	);
	let caps = std_caps();
	let checker = Checker::new(&unit.types, &caps);

	for name in ["Ambiguous", "Shadowed", "PointerShadow"] {
		assert!(!checker.is_valid_key(declared(&unit, name)), "{name}");
	}
	// The shallower Textable wins over Other two levels down.
	assert!(checker.is_valid_key(declared(&unit, "Outer")));
}

#[test]
fn embedding_an_unresolved_type_is_never_rejected() {
	let unit = unit("type Stamp struct{ time.Time }
type Missing struct{ *Unknown }
type Plain struct{ X int }");
	let caps = std_caps();
	let checker = Checker::new(&unit.types, &caps);

	assert!(checker.is_valid_key(declared(&unit, "Stamp")));
	assert!(checker.is_valid_key(declared(&unit, "Missing")));
	assert!(!checker.is_valid_key(declared(&unit, "Plain")));
}

#[test]
fn incomplete_information_is_never_rejected() {
	let caps = std_caps();
	let mut table = TypeTable::new();
	let unknown = table.push(Type::Named(NamedType {
		pkg: Some("a".into()),
		name: "Unknown".into(),
		underlying: None,
		methods: Vec::new(),
	}));
	let invalid = table.basic(BasicKind::Invalid);
	let by_unknown = table.push(Type::Map { key: unknown, value: invalid });
	let by_invalid = table.push(Type::Map { key: invalid, value: invalid });

	let checker = Checker::new(&table, &caps);
	assert!(checker.is_serializable(unknown));
	assert!(checker.is_valid_key(unknown));
	assert!(checker.is_serializable(invalid));
	assert!(checker.is_serializable(by_unknown));
	assert!(checker.is_serializable(by_invalid));
}

#[test]
fn capabilities_can_be_supplied_directly() {
	let marshal: MethodSet = [MethodKey::new("Render", "func() string")].into_iter().collect();
	let unmarshal: MethodSet = [MethodKey::new("Parse", "func(string)")].into_iter().collect();
	let caps = Capabilities::from_method_sets(marshal, unmarshal);

	let unit = unit("type K struct{}\nfunc (K) Render() string { return \"\" }\nfunc (*K) Parse(s string) {}");
	let checker = Checker::new(&unit.types, &caps);
	assert!(checker.is_valid_key(declared(&unit, "K")));
}
