use crate::analysis::{ChanDir, Pos};

/// Parsed declarations of one file, in source order.
#[derive(Debug)]
pub(crate) struct File<'a> {
	pub package: &'a str,
	pub decls: Vec<Decl<'a>>,
	pub issues: Vec<(Pos, String)>,
}

#[derive(Debug)]
pub(crate) enum Decl<'a> {
	Type(TypeSpec<'a>),
	Method(MethodDecl<'a>),
	Func(FuncDecl<'a>),
	/// One `var` spec; only the type expressions it contains are kept.
	Var(Vec<Local<'a>>),
	/// Declaration that failed to parse; struct literals it opened are kept
	/// so they can be reported as incomplete.
	Broken(BrokenDecl<'a>),
}

#[derive(Debug)]
pub(crate) struct TypeSpec<'a> {
	pub name: &'a str,
	pub pos: Pos,
	pub alias: bool,
	pub ty: TypeExpr<'a>,
}

#[derive(Debug)]
pub(crate) struct MethodDecl<'a> {
	pub recv: &'a str,
	pub pointer: bool,
	pub name: &'a str,
	pub pos: Pos,
	pub sig: FuncExpr<'a>,
	pub body: Vec<Local<'a>>,
}

#[derive(Debug)]
pub(crate) struct FuncDecl<'a> {
	pub sig: FuncExpr<'a>,
	pub body: Vec<Local<'a>>,
}

/// Type syntax found inside a function body or a `var` declaration.
#[derive(Debug)]
pub(crate) enum Local<'a> {
	/// `type` declaration local to a function.
	Decl(TypeSpec<'a>),
	/// Declared variable type, or a struct type met in an expression.
	Expr(TypeExpr<'a>),
}

#[derive(Debug)]
pub(crate) struct BrokenDecl<'a> {
	pub name: Option<&'a str>,
	pub structs: Vec<Pos>,
}

#[derive(Debug)]
pub(crate) enum TypeExpr<'a> {
	Name {
		pkg: Option<&'a str>,
		name: &'a str,
		pos: Pos,
		/// Generic instantiation such as `List[int]`.
		instantiated: bool,
	},
	Pointer(Box<TypeExpr<'a>>),
	Slice(Box<TypeExpr<'a>>),
	Array {
		len: Option<u64>,
		elem: Box<TypeExpr<'a>>,
	},
	Map {
		key: Box<TypeExpr<'a>>,
		value: Box<TypeExpr<'a>>,
	},
	Chan {
		dir: ChanDir,
		elem: Box<TypeExpr<'a>>,
	},
	Func(FuncExpr<'a>),
	Struct(StructExpr<'a>),
	Interface(Vec<InterfaceElem<'a>>),
}

#[derive(Debug, Default)]
pub(crate) struct FuncExpr<'a> {
	pub params: Vec<ParamExpr<'a>>,
	pub results: Vec<ParamExpr<'a>>,
	pub variadic: bool,
}

/// Parameters sharing one type, e.g. `a, b int`; unnamed when `names` is empty.
#[derive(Debug)]
pub(crate) struct ParamExpr<'a> {
	pub names: Vec<&'a str>,
	pub ty: TypeExpr<'a>,
}

#[derive(Debug)]
pub(crate) struct StructExpr<'a> {
	pub pos: Pos,
	pub fields: Vec<FieldExpr<'a>>,
}

/// Fields sharing one type and tag; embedded when `names` is empty.
#[derive(Debug)]
pub(crate) struct FieldExpr<'a> {
	pub names: Vec<(&'a str, Pos)>,
	/// Position of the embedded type.
	pub pos: Pos,
	pub ty: TypeExpr<'a>,
	/// Tag contents with quotes removed and escapes decoded.
	pub tag: String,
}

#[derive(Debug)]
pub(crate) enum InterfaceElem<'a> {
	Method { name: &'a str, sig: FuncExpr<'a> },
	Embed(TypeExpr<'a>),
	/// Type-set terms (`~int | string`); they add no methods.
	Terms,
}
