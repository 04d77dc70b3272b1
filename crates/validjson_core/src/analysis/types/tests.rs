use super::{BasicKind, ChanDir, Field, NamedType, Param, Signature, Type, TypeTable, Underlying};
use crate::analysis::Pos;

fn named(table: &mut TypeTable, pkg: &str, name: &str, underlying: Option<super::TypeId>) -> super::TypeId {
	table.push(Type::Named(NamedType {
		pkg: Some(pkg.into()),
		name: name.into(),
		underlying,
		methods: Vec::new(),
	}))
}

#[test]
fn channel_directions_render_like_source() {
	let mut table = TypeTable::new();
	let int = table.basic(BasicKind::Int);
	let send = table.push(Type::Chan { dir: ChanDir::Send, elem: int });
	let recv = table.push(Type::Chan { dir: ChanDir::Recv, elem: int });
	let nested = table.push(Type::Chan { dir: ChanDir::Both, elem: recv });

	assert_eq!(table.display(send).to_string(), "chan<- int");
	assert_eq!(table.display(recv).to_string(), "<-chan int");
	assert_eq!(table.display(nested).to_string(), "chan (<-chan int)");
}

#[test]
fn struct_and_named_types_render_with_package_and_tags() {
	let mut table = TypeTable::new();
	let string = table.basic(BasicKind::String);
	let fields = vec![
		Field {
			name: "A".into(),
			ty: string,
			tag: "json:\"a\"".into(),
			embedded: false,
			pos: Pos::new(1, 1),
		},
		Field {
			name: "B".into(),
			ty: string,
			tag: "".into(),
			embedded: false,
			pos: Pos::new(1, 1),
		},
	];
	let structure = table.push(Type::Struct(fields));
	let key = named(&mut table, "a", "Key", Some(structure));
	let map = table.push(Type::Map { key, value: string });

	assert_eq!(table.display(structure).to_string(), "struct{A string \"json:\\\"a\\\"\"; B string}");
	assert_eq!(table.display(map).to_string(), "map[a.Key]string");
}

#[test]
fn signatures_keep_names_for_display_but_not_identity() {
	let mut table = TypeTable::new();
	let byte = table.basic(BasicKind::Byte);
	let bytes = table.push(Type::Slice(byte));
	let error = table.error_type();
	let sig = Signature {
		params: Vec::new(),
		results: vec![
			Param {
				name: Some("text".into()),
				ty: bytes,
			},
			Param {
				name: Some("err".into()),
				ty: error,
			},
		],
		variadic: false,
	};
	let func = table.push(Type::Signature(sig.clone()));

	assert_eq!(table.display(func).to_string(), "func() (text []byte, err error)");
	assert_eq!(table.signature_identity(&sig), "func() ([]uint8, error)");
}

#[test]
fn variadic_parameter_prints_ellipsis() {
	let mut table = TypeTable::new();
	let int = table.basic(BasicKind::Int);
	let ints = table.push(Type::Slice(int));
	let func = table.push(Type::Signature(Signature {
		params: vec![Param { name: None, ty: ints }],
		results: Vec::new(),
		variadic: true,
	}));

	assert_eq!(table.display(func).to_string(), "func(...int)");
}

#[test]
fn underlying_follows_named_chain_and_detects_loops() {
	let mut table = TypeTable::new();
	let int = table.basic(BasicKind::Int);
	let inner = named(&mut table, "a", "Inner", Some(int));
	let outer = named(&mut table, "a", "Outer", Some(inner));
	assert_eq!(table.underlying(outer), Some(int));

	let left = named(&mut table, "a", "Left", None);
	let right = named(&mut table, "a", "Right", Some(left));
	if let Type::Named(item) = table.get_mut(left) {
		item.underlying = Some(right);
	}
	assert_eq!(table.underlying(left), None);
	assert_eq!(table.resolve_underlying(left), Underlying::Cycle);

	let unknown = named(&mut table, "a", "Unknown", None);
	let over_unknown = named(&mut table, "a", "OverUnknown", Some(unknown));
	assert_eq!(table.underlying(over_unknown), None);
	assert_eq!(table.resolve_underlying(over_unknown), Underlying::Unknown);
	assert_eq!(table.resolve_underlying(outer), Underlying::Type(int));
	assert_eq!(table.resolve_underlying(int), Underlying::Type(int));
}

#[test]
fn basic_types_are_interned_and_aliases_fold() {
	let mut table = TypeTable::new();
	let first = table.basic(BasicKind::Int);
	let second = table.basic(BasicKind::Int);
	assert_eq!(first, second);

	assert!(BasicKind::Byte.is_integer());
	assert!(BasicKind::Uintptr.is_integer());
	assert!(!BasicKind::Float64.is_integer());
	assert_eq!(BasicKind::from_name("rune"), Some(BasicKind::Rune));
	assert_eq!(BasicKind::from_name("complex"), None);
}
