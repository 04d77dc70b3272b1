use std::collections::HashMap;
use std::path::PathBuf;

use crate::analysis::syntax::ast::{Decl, FieldExpr, File, FuncExpr, InterfaceElem, Local, ParamExpr, StructExpr, TypeExpr, TypeSpec};
use crate::analysis::{
	BasicKind, Field, InterfaceType, Issue, Method, NamedMethod, NamedType, Param, Pos, Receiver, Signature, StructNode, Type, TypeId, Unit,
};

/// Build a [`Unit`] from a parsed file.
///
/// Package-level names are bound before any type expression is resolved,
/// so declarations may refer to each other in any order.
pub(crate) fn build_unit(file: File<'_>, path: PathBuf, import_path: &str) -> Unit {
	let mut unit = Unit::new(path, file.package, import_path);
	unit.issues.extend(file.issues.iter().map(|(pos, message)| Issue {
		pos: *pos,
		message: message.as_str().into(),
	}));

	let mut resolver = Resolver {
		unit,
		bindings: HashMap::new(),
	};
	let owners = resolver.bind(&file.decls);
	resolver.resolve_decls(&file.decls, &owners);

	// Nested structs start after their parent, so source order is pre-order.
	let mut unit = resolver.unit;
	unit.structs.sort_by_key(|node| node.pos);
	unit
}

/// What a declaration binds at package level.
#[derive(Clone, Copy)]
enum Owner {
	Named(TypeId),
	Alias,
	Nothing,
}

#[derive(Clone, Copy)]
enum Binding<'f, 'a> {
	Named(TypeId),
	Alias(&'f TypeExpr<'a>),
	/// Alias whose right-hand side is being resolved.
	Resolving,
	Resolved(TypeId),
}

struct Resolver<'f, 'a> {
	unit: Unit,
	bindings: HashMap<&'a str, Binding<'f, 'a>>,
}

impl<'f, 'a> Resolver<'f, 'a> {
	fn issue(&mut self, pos: Pos, message: String) {
		self.unit.issues.push(Issue {
			pos,
			message: message.into(),
		});
	}

	fn invalid(&mut self) -> TypeId {
		self.unit.types.basic(BasicKind::Invalid)
	}

	/// First pass: one placeholder per defined type name. Returns, per
	/// declaration, the binding it owns.
	fn bind(&mut self, decls: &'f [Decl<'a>]) -> Vec<Owner> {
		let mut owners = Vec::with_capacity(decls.len());
		for decl in decls {
			let (name, pos, alias) = match decl {
				Decl::Type(spec) => (spec.name, spec.pos, spec.alias),
				Decl::Broken(broken) => match broken.name {
					Some(name) => (name, Pos::default(), false),
					None => {
						owners.push(Owner::Nothing);
						continue;
					}
				},
				_ => {
					owners.push(Owner::Nothing);
					continue;
				}
			};

			if name == "_" {
				owners.push(Owner::Nothing);
				continue;
			}
			if self.bindings.contains_key(name) {
				if let Decl::Type(_) = decl {
					self.issue(pos, format!("{name} redeclared in this block"));
				}
				owners.push(Owner::Nothing);
				continue;
			}

			if alias {
				let Decl::Type(spec) = decl else {
					owners.push(Owner::Nothing);
					continue;
				};
				self.bindings.insert(name, Binding::Alias(&spec.ty));
				owners.push(Owner::Alias);
				continue;
			}

			let id = self.unit.types.push(Type::Named(NamedType {
				pkg: Some(self.unit.path.clone()),
				name: name.into(),
				underlying: None,
				methods: Vec::new(),
			}));
			self.bindings.insert(name, Binding::Named(id));
			self.unit.declare(name, id, false);
			owners.push(Owner::Named(id));
		}
		owners
	}

	/// Second pass: resolve every declaration in source order so struct
	/// nodes are recorded in pre-order.
	fn resolve_decls(&mut self, decls: &'f [Decl<'a>], owners: &[Owner]) {
		for (decl, owner) in decls.iter().zip(owners) {
			match decl {
				Decl::Type(spec) => match *owner {
					// Earlier references may already have resolved the alias.
					Owner::Alias => {
						let id = self.lookup(spec.name, spec.pos);
						self.unit.declare(spec.name, id, true);
					}
					Owner::Named(id) => {
						let underlying = self.resolve(&spec.ty);
						if let Type::Named(named) = self.unit.types.get_mut(id) {
							named.underlying = Some(underlying);
						}
					}
					// Redeclared or blank: resolved for its struct nodes only.
					Owner::Nothing => {
						self.resolve(&spec.ty);
					}
				},
				Decl::Method(method) => {
					let sig = self.signature(&method.sig);
					let recv = if method.pointer { Receiver::Pointer } else { Receiver::Value };
					match self.bindings.get(method.recv).copied() {
						Some(Binding::Named(id)) => self.attach(id, method.name, recv, sig, method.pos),
						Some(Binding::Alias(_) | Binding::Resolving | Binding::Resolved(_)) => {
							let id = self.lookup(method.recv, method.pos);
							self.attach(id, method.name, recv, sig, method.pos);
						}
						None => {
							tracing::debug!(recv = method.recv, method = method.name, "method on undeclared receiver ignored");
						}
					}
					self.locals(&method.body);
				}
				Decl::Func(func) => {
					self.signature(&func.sig);
					self.locals(&func.body);
				}
				Decl::Var(locals) => self.locals(locals),
				Decl::Broken(broken) => {
					for pos in &broken.structs {
						self.unit.structs.push(StructNode { pos: *pos, ty: None });
					}
				}
			}
		}
	}

	/// Resolve the type syntax of a function body or `var` spec. Local type
	/// names shadow package-level ones until the body is done.
	fn locals(&mut self, locals: &'f [Local<'a>]) {
		let mut shadowed = Vec::new();
		let mut owners = Vec::with_capacity(locals.len());
		for local in locals {
			let owner = match local {
				Local::Decl(spec) if spec.name != "_" => {
					let (binding, owner) = if spec.alias {
						(Binding::Alias(&spec.ty), Owner::Alias)
					} else {
						let id = self.unit.types.push(Type::Named(NamedType {
							pkg: Some(self.unit.path.clone()),
							name: spec.name.into(),
							underlying: None,
							methods: Vec::new(),
						}));
						(Binding::Named(id), Owner::Named(id))
					};
					shadowed.push((spec.name, self.bindings.insert(spec.name, binding)));
					owner
				}
				_ => Owner::Nothing,
			};
			owners.push(owner);
		}

		for (local, owner) in locals.iter().zip(owners) {
			match (local, owner) {
				(Local::Decl(spec), Owner::Named(id)) => {
					let underlying = self.resolve(&spec.ty);
					if let Type::Named(named) = self.unit.types.get_mut(id) {
						named.underlying = Some(underlying);
					}
				}
				(Local::Decl(spec), Owner::Alias) => {
					self.lookup(spec.name, spec.pos);
				}
				(Local::Decl(TypeSpec { ty, .. }) | Local::Expr(ty), _) => {
					self.resolve(ty);
				}
			}
		}

		for (name, previous) in shadowed.into_iter().rev() {
			match previous {
				Some(binding) => self.bindings.insert(name, binding),
				None => self.bindings.remove(name),
			};
		}
	}

	fn attach(&mut self, id: TypeId, name: &str, recv: Receiver, sig: Signature, pos: Pos) {
		let path = self.unit.path.clone();
		let duplicate = match self.unit.types.get_mut(id) {
			Type::Named(named) if named.pkg.as_deref() == Some(&*path) => {
				if named.methods.iter().any(|method| method.name.as_ref() == name) {
					true
				} else {
					named.methods.push(NamedMethod {
						name: name.into(),
						recv,
						sig,
					});
					false
				}
			}
			_ => {
				self.issue(pos, format!("invalid receiver type for method {name}"));
				return;
			}
		};
		if duplicate {
			self.issue(pos, format!("method {name} already declared"));
		}
	}

	fn lookup(&mut self, name: &'a str, pos: Pos) -> TypeId {
		match self.bindings.get(name).copied() {
			Some(Binding::Named(id) | Binding::Resolved(id)) => id,
			Some(Binding::Alias(expr)) => {
				self.bindings.insert(name, Binding::Resolving);
				let id = self.resolve(expr);
				self.bindings.insert(name, Binding::Resolved(id));
				id
			}
			Some(Binding::Resolving) => {
				self.issue(pos, format!("invalid recursive type alias {name}"));
				self.invalid()
			}
			None => self.predeclared(name, pos),
		}
	}

	fn predeclared(&mut self, name: &str, pos: Pos) -> TypeId {
		if let Some(kind) = BasicKind::from_name(name) {
			return self.unit.types.basic(kind);
		}
		match name {
			"error" => self.unit.types.error_type(),
			"any" => self.unit.types.push(Type::Interface(InterfaceType::default())),
			"comparable" => self.invalid(),
			_ => {
				self.issue(pos, format!("undefined: {name}"));
				self.invalid()
			}
		}
	}

	fn resolve(&mut self, expr: &'f TypeExpr<'a>) -> TypeId {
		match expr {
			TypeExpr::Name {
				pkg: None,
				name,
				pos,
				instantiated,
			} => {
				if *instantiated {
					self.issue(*pos, format!("instantiation of generic type {name} is not supported"));
					return self.invalid();
				}
				self.lookup(*name, *pos)
			}
			TypeExpr::Name { pkg: Some(pkg), name, .. } => {
				if *pkg == "unsafe" && *name == "Pointer" {
					return self.unit.types.basic(BasicKind::UnsafePointer);
				}
				tracing::debug!(package = *pkg, name = *name, "imported type left unresolved");
				self.invalid()
			}
			TypeExpr::Pointer(elem) => {
				let elem = self.resolve(elem);
				self.unit.types.push(Type::Pointer(elem))
			}
			TypeExpr::Slice(elem) => {
				let elem = self.resolve(elem);
				self.unit.types.push(Type::Slice(elem))
			}
			TypeExpr::Array { len, elem } => {
				let elem = self.resolve(elem);
				self.unit.types.push(Type::Array { len: *len, elem })
			}
			TypeExpr::Map { key, value } => {
				let key = self.resolve(key);
				let value = self.resolve(value);
				self.unit.types.push(Type::Map { key, value })
			}
			TypeExpr::Chan { dir, elem } => {
				let elem = self.resolve(elem);
				self.unit.types.push(Type::Chan { dir: *dir, elem })
			}
			TypeExpr::Func(func) => {
				let sig = self.signature(func);
				self.unit.types.push(Type::Signature(sig))
			}
			TypeExpr::Struct(structure) => self.structure(structure),
			TypeExpr::Interface(elems) => {
				let mut body = InterfaceType::default();
				for elem in elems {
					match elem {
						InterfaceElem::Method { name, sig } => {
							let sig = self.signature(sig);
							body.methods.push(Method { name: (*name).into(), sig });
						}
						InterfaceElem::Embed(embed) => {
							let id = self.resolve(embed);
							body.embeds.push(id);
						}
						InterfaceElem::Terms => {}
					}
				}
				self.unit.types.push(Type::Interface(body))
			}
		}
	}

	/// The node is recorded before its fields so nested structs follow it.
	fn structure(&mut self, structure: &'f StructExpr<'a>) -> TypeId {
		let node = self.unit.structs.len();
		self.unit.structs.push(StructNode {
			pos: structure.pos,
			ty: None,
		});

		let mut fields = Vec::new();
		for group in &structure.fields {
			let ty = self.resolve(&group.ty);
			if group.names.is_empty() {
				fields.push(Field {
					name: embedded_name(group).into(),
					ty,
					tag: group.tag.as_str().into(),
					embedded: true,
					pos: group.pos,
				});
			}
			for (name, pos) in &group.names {
				fields.push(Field {
					name: (*name).into(),
					ty,
					tag: group.tag.as_str().into(),
					embedded: false,
					pos: *pos,
				});
			}
		}

		let id = self.unit.types.push(Type::Struct(fields));
		self.unit.structs[node].ty = Some(id);
		id
	}

	fn signature(&mut self, func: &'f FuncExpr<'a>) -> Signature {
		let mut params = self.params(&func.params);
		if func.variadic
			&& let Some(last) = func.params.last()
		{
			// Every name of the final group shares the variadic slice.
			let count = last.names.len().max(1);
			let elem = params[params.len() - 1].ty;
			let slice = self.unit.types.push(Type::Slice(elem));
			let start = params.len() - count;
			for param in &mut params[start..] {
				param.ty = slice;
			}
		}
		Signature {
			params,
			results: self.params(&func.results),
			variadic: func.variadic,
		}
	}

	fn params(&mut self, groups: &'f [ParamExpr<'a>]) -> Vec<Param> {
		let mut out = Vec::new();
		for group in groups {
			let ty = self.resolve(&group.ty);
			if group.names.is_empty() {
				out.push(Param { name: None, ty });
			}
			for name in &group.names {
				out.push(Param {
					name: Some((*name).into()),
					ty,
				});
			}
		}
		out
	}
}

fn embedded_name<'a>(field: &FieldExpr<'a>) -> &'a str {
	let mut ty = &field.ty;
	while let TypeExpr::Pointer(inner) = ty {
		ty = &**inner;
	}
	match ty {
		TypeExpr::Name { name, .. } => *name,
		_ => "_",
	}
}

#[cfg(test)]
mod tests;
