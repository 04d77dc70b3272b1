use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::analysis::methods::embeds_unresolved;
use crate::analysis::{BasicKind, Capabilities, MethodSet, Type, TypeId, TypeTable, Underlying, pointer_method_set, value_method_set};

/// Serializability decisions over one type table.
///
/// Method sets are computed on first use and cached for the lifetime of the
/// checker, so one checker should be built per unit.
pub struct Checker<'a> {
	types: &'a TypeTable,
	caps: &'a Capabilities,
	value_sets: RefCell<HashMap<TypeId, Rc<MethodSet>>>,
	pointer_sets: RefCell<HashMap<TypeId, Rc<MethodSet>>>,
}

impl<'a> Checker<'a> {
	/// Create a checker over `types` using the resolved text capabilities.
	pub fn new(types: &'a TypeTable, caps: &'a Capabilities) -> Self {
		Self {
			types,
			caps,
			value_sets: RefCell::new(HashMap::new()),
			pointer_sets: RefCell::new(HashMap::new()),
		}
	}

	/// Whether values of `ty` have a well-defined JSON encoding.
	///
	/// Only the outer shape is judged: struct, slice, array, pointer, and
	/// interface members are not inspected. A named type is judged by the
	/// structural type its chain of named layers ends in; a chain that loops
	/// back on itself is rejected.
	pub fn is_serializable(&self, ty: TypeId) -> bool {
		match self.types.get(ty) {
			Type::Basic(kind) => !kind.is_complex(),
			Type::Chan { .. } | Type::Signature(_) => false,
			Type::Map { key, .. } => self.is_valid_key(*key),
			Type::Named(_) => match self.types.resolve_underlying(ty) {
				Underlying::Type(structural) => self.is_serializable(structural),
				// Incomplete information, never reported.
				Underlying::Unknown => true,
				Underlying::Cycle => false,
			},
			_ => true,
		}
	}

	/// Whether `ty` may be used as the key of a serialized map.
	///
	/// Methods are never inherited from the named type a declaration is
	/// built from: `type Copy Text` is judged by `Text`'s structure and by
	/// the methods declared on `Copy` alone.
	pub fn is_valid_key(&self, ty: TypeId) -> bool {
		match self.types.get(ty) {
			// Invalid kinds are unresolved types: never reported.
			Type::Basic(kind) => kind.is_integer() || matches!(kind.canonical(), BasicKind::String | BasicKind::Invalid),
			Type::Named(_) => match self.types.resolve_underlying(ty) {
				Underlying::Type(structural) => {
					// Methods promoted from an unresolved embedded type are unknown.
					self.is_valid_key(structural) || self.has_text_pair(ty) || embeds_unresolved(self.types, ty)
				}
				Underlying::Unknown => true,
				Underlying::Cycle => self.has_text_pair(ty),
			},
			_ => false,
		}
	}

	/// Value form renders to text and pointer form parses from text.
	fn has_text_pair(&self, ty: TypeId) -> bool {
		self.caps.text_marshaler.is_satisfied_by(&self.value_methods(ty)) && self.caps.text_unmarshaler.is_satisfied_by(&self.pointer_methods(ty))
	}

	fn value_methods(&self, ty: TypeId) -> Rc<MethodSet> {
		self.value_sets
			.borrow_mut()
			.entry(ty)
			.or_insert_with(|| Rc::new(value_method_set(self.types, ty)))
			.clone()
	}

	fn pointer_methods(&self, ty: TypeId) -> Rc<MethodSet> {
		self.pointer_sets
			.borrow_mut()
			.entry(ty)
			.or_insert_with(|| Rc::new(pointer_method_set(self.types, ty)))
			.clone()
	}
}

#[cfg(test)]
mod tests;
