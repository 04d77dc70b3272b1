use std::fmt::{self, Write};

use crate::analysis::{ChanDir, Param, Signature, Type, TypeId, TypeTable};

/// Nesting ceiling for hand-built tables containing unnamed cycles.
const MAX_DEPTH: u32 = 64;

/// Lazily rendered Go-style type string.
pub struct TypeDisplay<'a> {
	table: &'a TypeTable,
	id: TypeId,
}

impl<'a> TypeDisplay<'a> {
	pub(super) fn new(table: &'a TypeTable, id: TypeId) -> Self {
		Self { table, id }
	}
}

impl fmt::Display for TypeDisplay<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Printer::new(self.table, Mode::Display, f).ty(self.id, 0)
	}
}

pub(super) fn identity(table: &TypeTable, id: TypeId) -> String {
	let mut out = String::new();
	// Writing into a String cannot fail.
	let _ = Printer::new(table, Mode::Identity, &mut out).ty(id, 0);
	out
}

pub(super) fn signature_identity(table: &TypeTable, sig: &Signature) -> String {
	let mut out = String::new();
	let mut printer = Printer::new(table, Mode::Identity, &mut out);
	let _ = printer.out.write_str("func").and_then(|_| printer.signature(sig, 0));
	out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
	Display,
	Identity,
}

struct Printer<'a, W> {
	table: &'a TypeTable,
	mode: Mode,
	out: W,
}

impl<'a, W: Write> Printer<'a, W> {
	fn new(table: &'a TypeTable, mode: Mode, out: W) -> Self {
		Self { table, mode, out }
	}

	fn ty(&mut self, id: TypeId, depth: u32) -> fmt::Result {
		if depth > MAX_DEPTH {
			return self.out.write_str("...");
		}
		match self.table.get(id) {
			Type::Basic(kind) => {
				let kind = if self.mode == Mode::Identity { kind.canonical() } else { *kind };
				self.out.write_str(kind.name())
			}
			Type::Pointer(elem) => {
				self.out.write_char('*')?;
				self.ty(*elem, depth + 1)
			}
			Type::Slice(elem) => {
				self.out.write_str("[]")?;
				self.ty(*elem, depth + 1)
			}
			Type::Array { len, elem } => {
				match len {
					Some(len) => write!(self.out, "[{len}]")?,
					None => self.out.write_str("[?]")?,
				}
				self.ty(*elem, depth + 1)
			}
			Type::Map { key, value } => {
				self.out.write_str("map[")?;
				self.ty(*key, depth + 1)?;
				self.out.write_char(']')?;
				self.ty(*value, depth + 1)
			}
			Type::Chan { dir, elem } => {
				let prefix = match dir {
					ChanDir::Both => "chan ",
					ChanDir::Send => "chan<- ",
					ChanDir::Recv => "<-chan ",
				};
				self.out.write_str(prefix)?;
				let paren = *dir == ChanDir::Both && matches!(self.table.get(*elem), Type::Chan { dir: ChanDir::Recv, .. });
				if paren {
					self.out.write_char('(')?;
				}
				self.ty(*elem, depth + 1)?;
				if paren {
					self.out.write_char(')')?;
				}
				Ok(())
			}
			Type::Signature(sig) => {
				self.out.write_str("func")?;
				self.signature(sig, depth + 1)
			}
			Type::Struct(fields) => {
				self.out.write_str("struct{")?;
				for (idx, field) in fields.iter().enumerate() {
					if idx > 0 {
						self.out.write_str("; ")?;
					}
					if !field.embedded {
						self.out.write_str(&field.name)?;
						self.out.write_char(' ')?;
					}
					self.ty(field.ty, depth + 1)?;
					if !field.tag.is_empty() {
						write!(self.out, " {}", quote(&field.tag))?;
					}
				}
				self.out.write_char('}')
			}
			Type::Interface(iface) => {
				self.out.write_str("interface{")?;
				let mut methods: Vec<_> = iface.methods.iter().collect();
				if self.mode == Mode::Identity {
					methods.sort_by(|left, right| left.name.cmp(&right.name));
				}
				let mut first = true;
				for method in methods {
					if !first {
						self.out.write_str("; ")?;
					}
					first = false;
					self.out.write_str(&method.name)?;
					self.signature(&method.sig, depth + 1)?;
				}
				for embed in &iface.embeds {
					if !first {
						self.out.write_str("; ")?;
					}
					first = false;
					self.ty(*embed, depth + 1)?;
				}
				self.out.write_char('}')
			}
			Type::Named(named) => {
				if let Some(pkg) = &named.pkg {
					self.out.write_str(pkg)?;
					self.out.write_char('.')?;
				}
				self.out.write_str(&named.name)
			}
		}
	}

	fn signature(&mut self, sig: &Signature, depth: u32) -> fmt::Result {
		self.tuple(&sig.params, sig.variadic, depth)?;
		match sig.results.as_slice() {
			[] => Ok(()),
			[single] if single.name.is_none() || self.mode == Mode::Identity => {
				self.out.write_char(' ')?;
				self.ty(single.ty, depth + 1)
			}
			results => {
				self.out.write_char(' ')?;
				self.tuple(results, false, depth)
			}
		}
	}

	fn tuple(&mut self, params: &[Param], variadic: bool, depth: u32) -> fmt::Result {
		self.out.write_char('(')?;
		for (idx, param) in params.iter().enumerate() {
			if idx > 0 {
				self.out.write_str(", ")?;
			}
			if self.mode == Mode::Display
				&& let Some(name) = &param.name
			{
				self.out.write_str(name)?;
				self.out.write_char(' ')?;
			}
			let last = idx + 1 == params.len();
			match self.table.get(param.ty) {
				Type::Slice(elem) if variadic && last => {
					self.out.write_str("...")?;
					self.ty(*elem, depth + 1)?;
				}
				_ => self.ty(param.ty, depth + 1)?,
			}
		}
		self.out.write_char(')')
	}
}

/// Double-quote text the way struct tags are printed inside type strings.
fn quote(text: &str) -> String {
	let mut out = String::with_capacity(text.len() + 2);
	out.push('"');
	for ch in text.chars() {
		match ch {
			'"' => out.push_str("\\\""),
			'\\' => out.push_str("\\\\"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			c if c.is_control() => {
				let _ = write!(out, "\\x{:02x}", c as u32);
			}
			c => out.push(c),
		}
	}
	out.push('"');
	out
}
