use std::collections::HashMap;

use crate::analysis::Pos;

mod display;

pub use display::TypeDisplay;

/// Index of a type inside a [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(u32);

impl TypeId {
	/// Position of the type in its table.
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// Predeclared scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
	/// A type the front end could not resolve.
	Invalid,
	/// `bool`
	Bool,
	/// `int`
	Int,
	/// `int8`
	Int8,
	/// `int16`
	Int16,
	/// `int32`
	Int32,
	/// `int64`
	Int64,
	/// `uint`
	Uint,
	/// `uint8`
	Uint8,
	/// `uint16`
	Uint16,
	/// `uint32`
	Uint32,
	/// `uint64`
	Uint64,
	/// `uintptr`
	Uintptr,
	/// `float32`
	Float32,
	/// `float64`
	Float64,
	/// `complex64`
	Complex64,
	/// `complex128`
	Complex128,
	/// `string`
	String,
	/// `unsafe.Pointer`
	UnsafePointer,
	/// `byte`, an alias of `uint8`.
	Byte,
	/// `rune`, an alias of `int32`.
	Rune,
}

impl BasicKind {
	/// Every kind with a predeclared identifier.
	pub const PREDECLARED: [BasicKind; 19] = [
		Self::Bool,
		Self::Int,
		Self::Int8,
		Self::Int16,
		Self::Int32,
		Self::Int64,
		Self::Uint,
		Self::Uint8,
		Self::Uint16,
		Self::Uint32,
		Self::Uint64,
		Self::Uintptr,
		Self::Float32,
		Self::Float64,
		Self::Complex64,
		Self::Complex128,
		Self::String,
		Self::Byte,
		Self::Rune,
	];

	/// Source spelling.
	pub fn name(self) -> &'static str {
		match self {
			Self::Invalid => "invalid type",
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Int8 => "int8",
			Self::Int16 => "int16",
			Self::Int32 => "int32",
			Self::Int64 => "int64",
			Self::Uint => "uint",
			Self::Uint8 => "uint8",
			Self::Uint16 => "uint16",
			Self::Uint32 => "uint32",
			Self::Uint64 => "uint64",
			Self::Uintptr => "uintptr",
			Self::Float32 => "float32",
			Self::Float64 => "float64",
			Self::Complex64 => "complex64",
			Self::Complex128 => "complex128",
			Self::String => "string",
			Self::UnsafePointer => "unsafe.Pointer",
			Self::Byte => "byte",
			Self::Rune => "rune",
		}
	}

	/// Resolve a predeclared identifier.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::PREDECLARED.into_iter().find(|kind| kind.name() == name)
	}

	/// Fold aliases onto the kind they stand for.
	pub fn canonical(self) -> Self {
		match self {
			Self::Byte => Self::Uint8,
			Self::Rune => Self::Int32,
			other => other,
		}
	}

	/// Whether the kind belongs to the integer family.
	pub fn is_integer(self) -> bool {
		matches!(
			self.canonical(),
			Self::Int | Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 | Self::Uint | Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64 | Self::Uintptr
		)
	}

	/// Whether the kind is `complex64` or `complex128`.
	pub fn is_complex(self) -> bool {
		matches!(self, Self::Complex64 | Self::Complex128)
	}
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
	/// `chan T`
	Both,
	/// `chan<- T`
	Send,
	/// `<-chan T`
	Recv,
}

/// Struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
	/// Field name; for embedded fields the type name.
	pub name: Box<str>,
	/// Declared type.
	pub ty: TypeId,
	/// Raw tag text with quotes already removed.
	pub tag: Box<str>,
	/// Whether the field is embedded.
	pub embedded: bool,
	/// Position of the field name (or type, when embedded).
	pub pos: Pos,
}

/// Parameter or result of a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
	/// Declared name, if any.
	pub name: Option<Box<str>>,
	/// Declared type.
	pub ty: TypeId,
}

/// Function signature without receiver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
	/// Parameters in order.
	pub params: Vec<Param>,
	/// Results in order.
	pub results: Vec<Param>,
	/// Whether the last parameter is `...T`; its type is then `[]T`.
	pub variadic: bool,
}

/// Method declared by an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
	/// Method name.
	pub name: Box<str>,
	/// Method signature.
	pub sig: Signature,
}

/// Interface body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceType {
	/// Explicitly declared methods.
	pub methods: Vec<Method>,
	/// Embedded interfaces.
	pub embeds: Vec<TypeId>,
}

/// Receiver form of a concrete method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
	/// `func (t T) M()`
	Value,
	/// `func (t *T) M()`
	Pointer,
}

/// Method declared on a named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedMethod {
	/// Method name.
	pub name: Box<str>,
	/// Receiver form.
	pub recv: Receiver,
	/// Method signature.
	pub sig: Signature,
}

/// Named (defined) type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
	/// Qualifying package path; `None` for predeclared names.
	pub pkg: Option<Box<str>>,
	/// Type name.
	pub name: Box<str>,
	/// Underlying type; `None` when it could not be determined.
	pub underlying: Option<TypeId>,
	/// Methods declared with this type as receiver base.
	pub methods: Vec<NamedMethod>,
}

/// Type shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
	/// Predeclared scalar.
	Basic(BasicKind),
	/// `*T`
	Pointer(TypeId),
	/// `[]T`
	Slice(TypeId),
	/// `[N]T`; `len` is `None` when the length expression was not a literal.
	Array {
		/// Element count.
		len: Option<u64>,
		/// Element type.
		elem: TypeId,
	},
	/// `map[K]V`
	Map {
		/// Key type.
		key: TypeId,
		/// Value type.
		value: TypeId,
	},
	/// Channel type.
	Chan {
		/// Direction.
		dir: ChanDir,
		/// Element type.
		elem: TypeId,
	},
	/// Function type.
	Signature(Signature),
	/// Struct type.
	Struct(Vec<Field>),
	/// Interface type.
	Interface(InterfaceType),
	/// Named type.
	Named(NamedType),
}

/// End of a chain of named types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Underlying {
	/// The structural type the chain ends in.
	Type(TypeId),
	/// Some layer has no known underlying type.
	Unknown,
	/// The chain loops back on itself, as in `type A B; type B A`.
	Cycle,
}

/// Arena of types addressed by [`TypeId`].
#[derive(Debug, Default)]
pub struct TypeTable {
	types: Vec<Type>,
	basics: HashMap<BasicKind, TypeId>,
	error: Option<TypeId>,
}

impl TypeTable {
	/// Create an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a type and return its id.
	pub fn push(&mut self, ty: Type) -> TypeId {
		let id = TypeId(self.types.len() as u32);
		self.types.push(ty);
		id
	}

	/// Return the type stored under `id`.
	pub fn get(&self, id: TypeId) -> &Type {
		&self.types[id.index()]
	}

	/// Mutable access, used while resolving declarations.
	pub fn get_mut(&mut self, id: TypeId) -> &mut Type {
		&mut self.types[id.index()]
	}

	/// Number of stored types.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	/// Whether the table holds no types.
	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	/// Interned basic type.
	pub fn basic(&mut self, kind: BasicKind) -> TypeId {
		if let Some(id) = self.basics.get(&kind) {
			return *id;
		}
		let id = self.push(Type::Basic(kind));
		self.basics.insert(kind, id);
		id
	}

	/// Interned predeclared `error` interface.
	pub fn error_type(&mut self) -> TypeId {
		if let Some(id) = self.error {
			return id;
		}
		let string = self.basic(BasicKind::String);
		let underlying = self.push(Type::Interface(InterfaceType {
			methods: vec![Method {
				name: "Error".into(),
				sig: Signature {
					params: Vec::new(),
					results: vec![Param { name: None, ty: string }],
					variadic: false,
				},
			}],
			embeds: Vec::new(),
		}));
		let id = self.push(Type::Named(NamedType {
			pkg: None,
			name: "error".into(),
			underlying: Some(underlying),
			methods: Vec::new(),
		}));
		self.error = Some(id);
		id
	}

	/// Named type stored under `id`, if it is one.
	pub fn named(&self, id: TypeId) -> Option<&NamedType> {
		match self.get(id) {
			Type::Named(named) => Some(named),
			_ => None,
		}
	}

	/// Follow named layers down to a structural type.
	///
	/// Returns `None` when a named layer has no known underlying type or the
	/// chain of named types loops back on itself.
	pub fn underlying(&self, id: TypeId) -> Option<TypeId> {
		match self.resolve_underlying(id) {
			Underlying::Type(structural) => Some(structural),
			Underlying::Unknown | Underlying::Cycle => None,
		}
	}

	/// Like [`TypeTable::underlying`], but tells the two failure cases apart.
	pub fn resolve_underlying(&self, id: TypeId) -> Underlying {
		let mut current = id;
		let mut seen = Vec::new();
		while let Some(named) = self.named(current) {
			if seen.contains(&current) {
				return Underlying::Cycle;
			}
			seen.push(current);
			let Some(next) = named.underlying else {
				return Underlying::Unknown;
			};
			current = next;
		}
		Underlying::Type(current)
	}

	/// Go-style type string.
	pub fn display(&self, id: TypeId) -> TypeDisplay<'_> {
		TypeDisplay::new(self, id)
	}

	/// Canonical identity string: two types with equal identity are identical.
	///
	/// Parameter names are dropped, aliases fold to the kind they stand for,
	/// and interface methods are sorted by name.
	pub fn identity(&self, id: TypeId) -> String {
		display::identity(self, id)
	}

	/// Canonical identity string of a signature.
	pub fn signature_identity(&self, sig: &Signature) -> String {
		display::signature_identity(self, sig)
	}
}

#[cfg(test)]
mod tests;
