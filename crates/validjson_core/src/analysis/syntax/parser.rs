use crate::analysis::syntax::SyntaxError;
use crate::analysis::syntax::ast::{
	BrokenDecl, Decl, FieldExpr, File, FuncDecl, FuncExpr, InterfaceElem, Local, MethodDecl, ParamExpr, StructExpr, TypeExpr, TypeSpec,
};
use crate::analysis::syntax::token::{Tok, Token};
use crate::analysis::{ChanDir, Pos, tag};

type PResult<T> = Result<T, SyntaxError>;

/// Parse the declarations of one file.
///
/// Only the package clause is fatal. A declaration that fails to parse is
/// recorded as [`Decl::Broken`] together with an issue and parsing resumes
/// at the next declaration. Statements and expressions are not parsed:
/// function bodies and `var` initializers are only scanned for local `type`
/// declarations and struct types. `const` and `import` declarations are
/// skipped.
pub(crate) fn parse(tokens: Vec<Token<'_>>) -> PResult<File<'_>> {
	Parser::new(tokens).file()
}

struct Parser<'a> {
	tokens: Vec<Token<'a>>,
	idx: usize,
	/// `struct` keywords opened by the declaration being parsed.
	opened: Vec<Pos>,
	issues: Vec<(Pos, String)>,
}

/// One entry of a parameter list before grouping.
enum Entry<'a> {
	/// Lone identifier: a parameter name or a type name, decided later.
	Bare(&'a str, Pos),
	Named(&'a str, TypeExpr<'a>),
	Type(TypeExpr<'a>),
}

impl<'a> Parser<'a> {
	fn new(mut tokens: Vec<Token<'a>>) -> Self {
		if tokens.last().is_none_or(|token| token.kind != Tok::Eof) {
			let pos = tokens.last().map(|token| token.pos).unwrap_or_default();
			tokens.push(Token { kind: Tok::Eof, text: "", pos });
		}
		Self {
			tokens,
			idx: 0,
			opened: Vec::new(),
			issues: Vec::new(),
		}
	}

	fn peek(&self) -> Token<'a> {
		self.peek_at(0)
	}

	fn peek_at(&self, ahead: usize) -> Token<'a> {
		let last = self.tokens.len() - 1;
		self.tokens[(self.idx + ahead).min(last)]
	}

	fn bump(&mut self) -> Token<'a> {
		let token = self.peek();
		if token.kind != Tok::Eof {
			self.idx += 1;
		}
		token
	}

	fn eat_op(&mut self, op: &str) -> bool {
		if self.peek().is_op(op) {
			self.bump();
			return true;
		}
		false
	}

	fn eat_semi(&mut self) -> bool {
		if self.peek().kind == Tok::Semi {
			self.bump();
			return true;
		}
		false
	}

	fn skip_semis(&mut self) {
		while self.eat_semi() {}
	}

	fn expect_op(&mut self, op: &str) -> PResult<Token<'a>> {
		let token = self.peek();
		if !token.is_op(op) {
			return Err(unexpected(token, &format!("`{op}`")));
		}
		Ok(self.bump())
	}

	fn expect_name(&mut self) -> PResult<Token<'a>> {
		let token = self.peek();
		if !token.is_name() {
			return Err(unexpected(token, "name"));
		}
		Ok(self.bump())
	}

	fn file(mut self) -> PResult<File<'a>> {
		self.skip_semis();
		let clause = self.peek();
		if !clause.is_keyword("package") {
			return Err(unexpected(clause, "package clause"));
		}
		self.bump();
		let package = self.expect_name()?.text;
		self.end_of_spec()?;

		let mut decls = Vec::new();
		loop {
			self.skip_semis();
			let token = self.peek();
			if token.kind == Tok::Eof {
				break;
			}

			if token.is_keyword("type") {
				self.spec_group(token, Self::type_spec, &mut decls);
			} else if token.is_keyword("var") {
				let start = decls.len();
				self.spec_group(token, Self::var_spec, &mut decls);
				// Variables never name a type.
				for decl in &mut decls[start..] {
					if let Decl::Broken(broken) = decl {
						broken.name = None;
					}
				}
			} else if token.is_keyword("func") {
				decls.push(self.recover(Self::func_decl));
			} else if token.is_keyword("import") || token.is_keyword("const") {
				self.bump();
				if self.eat_op("(") {
					self.skip_group();
				}
				self.skip_to_semi();
			} else {
				self.issues.push((token.pos, format!("unexpected {} at top level", describe(token))));
				self.bump();
				self.skip_to_semi();
			}
		}

		Ok(File {
			package,
			decls,
			issues: self.issues,
		})
	}

	/// One spec after `keyword`, or a parenthesized group of them.
	fn spec_group(&mut self, keyword: Token<'a>, spec: fn(&mut Self) -> PResult<Decl<'a>>, decls: &mut Vec<Decl<'a>>) {
		self.bump();
		if !self.eat_op("(") {
			decls.push(self.recover(spec));
			return;
		}
		loop {
			self.skip_semis();
			if self.eat_op(")") {
				break;
			}
			if self.peek().kind == Tok::Eof {
				self.issues.push((keyword.pos, format!("{} declaration group not closed", keyword.text)));
				break;
			}
			decls.push(self.recover(spec));
		}
	}

	/// Run `parse`; on failure rewind and skip the declaration.
	fn recover(&mut self, parse: fn(&mut Self) -> PResult<Decl<'a>>) -> Decl<'a> {
		let start = self.idx;
		self.opened.clear();
		match parse(self) {
			Ok(decl) => decl,
			Err(err) => {
				let head = self.tokens[start];
				self.issues.push((err.pos, err.message));
				self.idx = start;
				self.skip_to_semi();
				Decl::Broken(BrokenDecl {
					name: head.is_name().then_some(head.text),
					structs: std::mem::take(&mut self.opened),
				})
			}
		}
	}

	/// Skip to the end of the current declaration: a `;` at bracket depth
	/// zero (consumed) or a closing bracket of an enclosing group (kept).
	fn skip_to_semi(&mut self) {
		let mut depth = 0usize;
		loop {
			let token = self.peek();
			match token.kind {
				Tok::Eof => return,
				Tok::Semi if depth == 0 => {
					self.bump();
					return;
				}
				Tok::Op if matches!(token.text, "(" | "[" | "{") => depth += 1,
				Tok::Op if matches!(token.text, ")" | "]" | "}") => {
					if depth == 0 {
						return;
					}
					depth -= 1;
				}
				_ => {}
			}
			self.bump();
		}
	}

	/// Skip past the `)` closing a group whose `(` was consumed.
	fn skip_group(&mut self) {
		let mut depth = 1usize;
		loop {
			let token = self.bump();
			match token.kind {
				Tok::Eof => return,
				Tok::Op if matches!(token.text, "(" | "[" | "{") => depth += 1,
				Tok::Op if matches!(token.text, ")" | "]" | "}") => {
					depth -= 1;
					if depth == 0 {
						return;
					}
				}
				_ => {}
			}
		}
	}

	fn end_of_spec(&mut self) -> PResult<()> {
		let token = self.peek();
		match token.kind {
			Tok::Semi => {
				self.bump();
				Ok(())
			}
			Tok::Eof => Ok(()),
			_ if token.is_op(")") => Ok(()),
			_ => Err(unexpected(token, "end of declaration")),
		}
	}

	fn type_spec(&mut self) -> PResult<Decl<'a>> {
		let spec = self.local_type_spec()?;
		self.end_of_spec()?;
		Ok(Decl::Type(spec))
	}

	fn var_spec(&mut self) -> PResult<Decl<'a>> {
		self.expect_name()?;
		while self.eat_op(",") {
			self.expect_name()?;
		}
		let mut locals = Vec::new();
		if !self.peek().is_op("=") {
			locals.push(Local::Expr(self.type_expr()?));
		}
		if self.eat_op("=") {
			self.scan_locals(false, &mut locals)?;
		}
		self.end_of_spec()?;
		Ok(Decl::Var(locals))
	}

	fn func_decl(&mut self) -> PResult<Decl<'a>> {
		self.bump();
		if self.eat_op("(") {
			let (mut recv, _) = self.params()?;
			let group = match recv.pop() {
				Some(group) if recv.is_empty() && group.names.len() <= 1 => group,
				_ => return Err(unexpected(self.peek(), "single receiver")),
			};
			let (base, pointer) = match group.ty {
				TypeExpr::Pointer(inner) => (*inner, true),
				other => (other, false),
			};
			let TypeExpr::Name {
				pkg: None,
				name: recv,
				instantiated: false,
				..
			} = base
			else {
				return Err(unexpected(self.peek(), "receiver type name"));
			};

			let name = self.expect_name()?;
			let sig = self.signature()?;
			let body = self.body()?;
			return Ok(Decl::Method(MethodDecl {
				recv,
				pointer,
				name: name.text,
				pos: name.pos,
				sig,
				body,
			}));
		}

		let name = self.expect_name()?;
		if self.peek().is_op("[") {
			return Err(SyntaxError {
				pos: name.pos,
				message: format!("generic function {} is not supported", name.text),
			});
		}
		let sig = self.signature()?;
		let body = self.body()?;
		Ok(Decl::Func(FuncDecl { sig, body }))
	}

	/// Optional function body through the end of the declaration.
	fn body(&mut self) -> PResult<Vec<Local<'a>>> {
		let mut locals = Vec::new();
		if self.eat_op("{") {
			self.scan_locals(true, &mut locals)?;
		}
		self.end_of_spec()?;
		Ok(locals)
	}

	/// Walk statement or expression tokens, parsing only `type`
	/// declarations and `struct` types.
	///
	/// In a body the scan ends after the `}` closing it. Otherwise it stops
	/// before a `;` or closing bracket at depth zero.
	fn scan_locals(&mut self, in_body: bool, locals: &mut Vec<Local<'a>>) -> PResult<()> {
		let mut depth = 0usize;
		loop {
			let token = self.peek();
			match token.kind {
				Tok::Eof if in_body => return Err(unexpected(token, "`}`")),
				Tok::Eof => return Ok(()),
				Tok::Semi if depth == 0 && !in_body => return Ok(()),
				Tok::Op if matches!(token.text, "(" | "[" | "{") => depth += 1,
				Tok::Op if matches!(token.text, ")" | "]" | "}") => {
					if depth == 0 {
						if in_body {
							self.bump();
						}
						return Ok(());
					}
					depth -= 1;
				}
				Tok::Ident if token.text == "struct" => {
					locals.push(Local::Expr(self.struct_type()?));
					continue;
				}
				// `x.(type)` in a type switch is followed by `)`.
				Tok::Ident if token.text == "type" && (self.peek_at(1).is_name() || self.peek_at(1).is_op("(")) => {
					self.local_types(locals)?;
					continue;
				}
				_ => {}
			}
			self.bump();
		}
	}

	fn local_types(&mut self, locals: &mut Vec<Local<'a>>) -> PResult<()> {
		self.bump();
		if !self.eat_op("(") {
			locals.push(Local::Decl(self.local_type_spec()?));
			return Ok(());
		}
		loop {
			self.skip_semis();
			if self.eat_op(")") {
				return Ok(());
			}
			locals.push(Local::Decl(self.local_type_spec()?));
		}
	}

	/// A type spec whose end is left to the enclosing scan.
	fn local_type_spec(&mut self) -> PResult<TypeSpec<'a>> {
		let name = self.expect_name()?;
		if self.peek().is_op("[") && self.peek_at(1).is_name() && !self.peek_at(2).is_op("]") {
			return Err(SyntaxError {
				pos: name.pos,
				message: format!("generic type {} is not supported", name.text),
			});
		}
		let alias = self.eat_op("=");
		let ty = self.type_expr()?;
		Ok(TypeSpec {
			name: name.text,
			pos: name.pos,
			alias,
			ty,
		})
	}

	fn starts_type(&self) -> bool {
		let token = self.peek();
		match token.kind {
			Tok::Ident => token.is_name() || matches!(token.text, "map" | "chan" | "func" | "struct" | "interface"),
			Tok::Op => matches!(token.text, "*" | "[" | "<-" | "("),
			_ => false,
		}
	}

	fn type_expr(&mut self) -> PResult<TypeExpr<'a>> {
		let token = self.peek();
		match token.kind {
			Tok::Ident => match token.text {
				"map" => {
					self.bump();
					self.expect_op("[")?;
					let key = self.type_expr()?;
					self.expect_op("]")?;
					let value = self.type_expr()?;
					Ok(TypeExpr::Map {
						key: Box::new(key),
						value: Box::new(value),
					})
				}
				"chan" => {
					self.bump();
					let dir = if self.eat_op("<-") { ChanDir::Send } else { ChanDir::Both };
					let elem = self.type_expr()?;
					Ok(TypeExpr::Chan { dir, elem: Box::new(elem) })
				}
				"func" => {
					self.bump();
					Ok(TypeExpr::Func(self.signature()?))
				}
				"struct" => self.struct_type(),
				"interface" => self.interface_type(),
				_ if token.is_name() => self.type_name(),
				_ => Err(unexpected(token, "type")),
			},
			Tok::Op => match token.text {
				"*" => {
					self.bump();
					Ok(TypeExpr::Pointer(Box::new(self.type_expr()?)))
				}
				"[" => {
					self.bump();
					if self.eat_op("]") {
						return Ok(TypeExpr::Slice(Box::new(self.type_expr()?)));
					}
					let len = if self.eat_op("...") { None } else { self.array_len() };
					self.expect_op("]")?;
					let elem = self.type_expr()?;
					Ok(TypeExpr::Array { len, elem: Box::new(elem) })
				}
				"<-" => {
					self.bump();
					let chan = self.peek();
					if !chan.is_keyword("chan") {
						return Err(unexpected(chan, "`chan`"));
					}
					self.bump();
					let elem = self.type_expr()?;
					Ok(TypeExpr::Chan {
						dir: ChanDir::Recv,
						elem: Box::new(elem),
					})
				}
				"(" => {
					self.bump();
					let inner = self.type_expr()?;
					self.expect_op(")")?;
					Ok(inner)
				}
				_ => Err(unexpected(token, "type")),
			},
			_ => Err(unexpected(token, "type")),
		}
	}

	/// Literal array length, or `None` for constant expressions. Stops
	/// before the closing `]`.
	fn array_len(&mut self) -> Option<u64> {
		let token = self.peek();
		if token.kind == Tok::Int && self.peek_at(1).is_op("]") {
			self.bump();
			return parse_int(token.text);
		}

		let mut depth = 0usize;
		loop {
			let token = self.peek();
			match token.kind {
				Tok::Eof | Tok::Semi => return None,
				Tok::Op if matches!(token.text, "(" | "[" | "{") => depth += 1,
				Tok::Op if matches!(token.text, ")" | "]" | "}") => {
					if depth == 0 {
						return None;
					}
					depth -= 1;
				}
				_ => {}
			}
			self.bump();
		}
	}

	fn type_name(&mut self) -> PResult<TypeExpr<'a>> {
		let first = self.expect_name()?;
		let (pkg, name) = if self.eat_op(".") {
			(Some(first.text), self.expect_name()?.text)
		} else {
			(None, first.text)
		};

		let instantiated = self.eat_op("[");
		if instantiated {
			loop {
				self.type_expr()?;
				if !self.eat_op(",") {
					break;
				}
				if self.peek().is_op("]") {
					break;
				}
			}
			self.expect_op("]")?;
		}

		Ok(TypeExpr::Name {
			pkg,
			name,
			pos: first.pos,
			instantiated,
		})
	}

	fn signature(&mut self) -> PResult<FuncExpr<'a>> {
		self.expect_op("(")?;
		let (params, variadic) = self.params()?;
		let results = if self.eat_op("(") {
			let (results, variadic) = self.params()?;
			if variadic {
				return Err(unexpected(self.peek(), "result type without `...`"));
			}
			results
		} else if self.starts_type() {
			vec![ParamExpr {
				names: Vec::new(),
				ty: self.type_expr()?,
			}]
		} else {
			Vec::new()
		};
		Ok(FuncExpr { params, results, variadic })
	}

	/// Parameter list after its opening `(`, through the closing `)`.
	///
	/// Either every entry is named (`a, b int, c string`) or none is
	/// (`int, string`); lone identifiers are type names in the latter case.
	fn params(&mut self) -> PResult<(Vec<ParamExpr<'a>>, bool)> {
		let mut entries = Vec::new();
		let mut variadic_at = None;

		loop {
			if self.eat_op(")") {
				break;
			}
			let token = self.peek();
			if token.is_op("...") {
				self.bump();
				variadic_at = Some(entries.len());
				entries.push(Entry::Type(self.type_expr()?));
			} else if token.is_name() {
				let next = self.peek_at(1);
				if next.is_op(",") || next.is_op(")") {
					self.bump();
					entries.push(Entry::Bare(token.text, token.pos));
				} else if next.is_op(".") {
					entries.push(Entry::Type(self.type_expr()?));
				} else if next.is_op("...") {
					self.bump();
					self.bump();
					variadic_at = Some(entries.len());
					entries.push(Entry::Named(token.text, self.type_expr()?));
				} else {
					self.bump();
					entries.push(Entry::Named(token.text, self.type_expr()?));
				}
			} else {
				entries.push(Entry::Type(self.type_expr()?));
			}

			if !self.eat_op(",") {
				self.expect_op(")")?;
				break;
			}
		}

		let variadic = match variadic_at {
			Some(at) if at + 1 != entries.len() => {
				return Err(unexpected(self.peek(), "`...` only on the final parameter"));
			}
			Some(_) => true,
			None => false,
		};

		let named = entries.iter().any(|entry| matches!(entry, Entry::Named(..)));
		let mut out = Vec::new();
		if named {
			let mut pending = Vec::new();
			for entry in entries {
				match entry {
					Entry::Bare(name, _) => pending.push(name),
					Entry::Named(name, ty) => {
						pending.push(name);
						out.push(ParamExpr {
							names: std::mem::take(&mut pending),
							ty,
						});
					}
					Entry::Type(_) => return Err(unexpected(self.peek(), "named parameter (mixed named and unnamed)")),
				}
			}
			if !pending.is_empty() {
				return Err(unexpected(self.peek(), "parameter type"));
			}
		} else {
			for entry in entries {
				let ty = match entry {
					Entry::Bare(name, pos) => TypeExpr::Name {
						pkg: None,
						name,
						pos,
						instantiated: false,
					},
					Entry::Named(_, ty) | Entry::Type(ty) => ty,
				};
				out.push(ParamExpr { names: Vec::new(), ty });
			}
		}
		Ok((out, variadic))
	}

	fn struct_type(&mut self) -> PResult<TypeExpr<'a>> {
		let keyword = self.bump();
		self.opened.push(keyword.pos);
		self.expect_op("{")?;

		let mut fields = Vec::new();
		loop {
			self.skip_semis();
			if self.eat_op("}") {
				break;
			}
			fields.push(self.field_decl()?);
			if !self.eat_semi() {
				self.expect_op("}")?;
				break;
			}
		}

		Ok(TypeExpr::Struct(StructExpr { pos: keyword.pos, fields }))
	}

	fn field_decl(&mut self) -> PResult<FieldExpr<'a>> {
		let token = self.peek();
		let (names, ty) = if token.is_op("*") {
			(Vec::new(), self.type_expr()?)
		} else if token.is_name() {
			let next = self.peek_at(1);
			let embedded = next.is_op(".") || next.is_string() || next.is_op("}") || next.kind == Tok::Semi;
			if embedded {
				(Vec::new(), self.type_name()?)
			} else {
				self.bump();
				let mut names = vec![(token.text, token.pos)];
				while self.eat_op(",") {
					let name = self.expect_name()?;
					names.push((name.text, name.pos));
				}
				(names, self.type_expr()?)
			}
		} else {
			return Err(unexpected(token, "field name or embedded type"));
		};

		let tag = if self.peek().is_string() {
			let literal = self.bump();
			string_value(literal)?
		} else {
			String::new()
		};

		Ok(FieldExpr {
			names,
			pos: token.pos,
			ty,
			tag,
		})
	}

	fn interface_type(&mut self) -> PResult<TypeExpr<'a>> {
		self.bump();
		self.expect_op("{")?;

		let mut elems = Vec::new();
		loop {
			self.skip_semis();
			if self.eat_op("}") {
				break;
			}

			let token = self.peek();
			if token.is_name() && self.peek_at(1).is_op("(") {
				self.bump();
				let sig = self.signature()?;
				elems.push(InterfaceElem::Method { name: token.text, sig });
			} else {
				let mut terms = Vec::new();
				let mut union = false;
				loop {
					union |= self.eat_op("~");
					terms.push(self.type_expr()?);
					if !self.eat_op("|") {
						break;
					}
					union = true;
				}
				match terms.pop() {
					Some(ty) if !union && terms.is_empty() => elems.push(InterfaceElem::Embed(ty)),
					_ => elems.push(InterfaceElem::Terms),
				}
			}

			if !self.eat_semi() {
				self.expect_op("}")?;
				break;
			}
		}

		Ok(TypeExpr::Interface(elems))
	}
}

fn describe(token: Token<'_>) -> String {
	match token.kind {
		Tok::Eof => "end of file".to_owned(),
		Tok::Semi if token.text == "\n" => "newline".to_owned(),
		_ => format!("`{}`", token.text),
	}
}

fn unexpected(token: Token<'_>, expected: &str) -> SyntaxError {
	SyntaxError {
		pos: token.pos,
		message: format!("expected {expected}, found {}", describe(token)),
	}
}

/// Decoded contents of a string literal token.
fn string_value(token: Token<'_>) -> PResult<String> {
	let text = token.text;
	match token.kind {
		Tok::RawStr => Ok(text[1..text.len() - 1].replace('\r', "")),
		_ => tag::unquote(&text[1..text.len() - 1]).map(|value| value.into_owned()).ok_or_else(|| SyntaxError {
			pos: token.pos,
			message: format!("invalid string literal {text}"),
		}),
	}
}

/// Value of an integer literal, `None` when it overflows.
fn parse_int(text: &str) -> Option<u64> {
	let digits: String = text.chars().filter(|ch| *ch != '_').collect();
	let (radix, body) = match digits.get(..2) {
		Some("0x" | "0X") => (16, &digits[2..]),
		Some("0b" | "0B") => (2, &digits[2..]),
		Some("0o" | "0O") => (8, &digits[2..]),
		_ if digits.len() > 1 && digits.starts_with('0') => (8, &digits[1..]),
		_ => (10, digits.as_str()),
	};
	u64::from_str_radix(body, radix).ok()
}
