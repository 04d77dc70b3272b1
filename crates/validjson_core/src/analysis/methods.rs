use std::collections::{BTreeMap, BTreeSet};

use crate::analysis::{BasicKind, Field, Receiver, Type, TypeId, TypeTable};

/// One `(name, signature identity)` entry of a method set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodKey {
	/// Method name.
	pub name: Box<str>,
	/// Canonical signature identity, e.g. `func() ([]uint8, error)`.
	pub signature: Box<str>,
}

impl MethodKey {
	/// Build a key from name and signature identity.
	pub fn new(name: impl Into<Box<str>>, signature: impl Into<Box<str>>) -> Self {
		Self {
			name: name.into(),
			signature: signature.into(),
		}
	}
}

/// Set of method keys, compared structurally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSet {
	keys: BTreeSet<MethodKey>,
}

impl MethodSet {
	/// Create an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add one method key.
	pub fn insert(&mut self, key: MethodKey) {
		self.keys.insert(key);
	}

	/// Whether `key` is present.
	pub fn contains(&self, key: &MethodKey) -> bool {
		self.keys.contains(key)
	}

	/// Whether every key of `required` is present here.
	pub fn includes(&self, required: &MethodSet) -> bool {
		required.keys.is_subset(&self.keys)
	}

	/// Keys in name order.
	pub fn iter(&self) -> impl Iterator<Item = &MethodKey> {
		self.keys.iter()
	}

	/// Number of methods.
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	/// Whether the set has no methods.
	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}
}

impl FromIterator<MethodKey> for MethodSet {
	fn from_iter<I: IntoIterator<Item = MethodKey>>(iter: I) -> Self {
		Self {
			keys: iter.into_iter().collect(),
		}
	}
}

/// Method set of a value of type `id`.
///
/// Named non-interface types contribute their value-receiver methods plus
/// the methods promoted from embedded fields; interfaces (named or not)
/// contribute their flattened method list.
pub fn value_method_set(table: &TypeTable, id: TypeId) -> MethodSet {
	if let Some(iface) = interface_of(table, id) {
		return interface_method_set(table, iface);
	}
	promoted_method_set(table, id, false)
}

/// Method set of `*T` for `T = id`.
///
/// A pointer to a non-interface type carries both value and pointer
/// receiver methods, promoted ones included; a pointer to an interface
/// carries none.
pub fn pointer_method_set(table: &TypeTable, id: TypeId) -> MethodSet {
	if interface_of(table, id).is_some() {
		return MethodSet::new();
	}
	promoted_method_set(table, id, true)
}

/// Type reached at one embedding depth.
struct Embedded {
	ty: TypeId,
	/// Reached through a pointer, so pointer-receiver methods apply.
	addressable: bool,
	/// Reached along more than one path at this depth.
	repeated: bool,
}

/// Breadth-first selector lookup over the embedding tree.
///
/// A name found at a shallower depth shadows deeper ones, and a name found
/// twice at the same depth selects nothing. Field names take part in both
/// rules. Pointer-receiver methods that do not apply still shadow.
fn promoted_method_set(table: &TypeTable, id: TypeId, addressable: bool) -> MethodSet {
	let mut selected: BTreeMap<Box<str>, Option<MethodKey>> = BTreeMap::new();
	let mut seen = Vec::new();
	let mut level = vec![Embedded {
		ty: id,
		addressable,
		repeated: false,
	}];

	while !level.is_empty() {
		let mut found: BTreeMap<Box<str>, (usize, Option<MethodKey>)> = BTreeMap::new();
		let mut next: Vec<Embedded> = Vec::new();

		for item in &level {
			if seen.contains(&item.ty) {
				continue;
			}
			seen.push(item.ty);

			let mut names: Vec<(Box<str>, Option<MethodKey>)> = Vec::new();
			if let Some(iface) = interface_of(table, item.ty) {
				names.extend(interface_method_set(table, iface).iter().map(|key| (key.name.clone(), Some(key.clone()))));
			} else {
				if let Some(named) = table.named(item.ty) {
					for method in &named.methods {
						let applies = method.recv == Receiver::Value || item.addressable;
						let key = applies.then(|| MethodKey::new(method.name.clone(), table.signature_identity(&method.sig)));
						names.push((method.name.clone(), key));
					}
				}
				for field in struct_fields(table, item.ty) {
					names.push((field.name.clone(), None));
					if field.embedded {
						let (base, via_pointer) = match table.get(field.ty) {
							Type::Pointer(base) => (*base, true),
							_ => (field.ty, false),
						};
						enqueue(&mut next, base, item.addressable || via_pointer, item.repeated);
					}
				}
			}

			let weight = if item.repeated { 2 } else { 1 };
			for (name, key) in names {
				if selected.contains_key(&name) {
					continue;
				}
				let entry = found.entry(name).or_insert((0, None));
				entry.0 += weight;
				entry.1 = key;
			}
		}

		for (name, (count, key)) in found {
			selected.insert(name, if count == 1 { key } else { None });
		}
		level = next;
	}

	selected.into_values().flatten().collect()
}

/// Add `ty` to the next depth, merging repeats of the same type.
fn enqueue(next: &mut Vec<Embedded>, ty: TypeId, addressable: bool, repeated: bool) {
	match next.iter_mut().find(|item| item.ty == ty) {
		Some(item) => {
			item.repeated = true;
			item.addressable |= addressable;
		}
		None => next.push(Embedded { ty, addressable, repeated }),
	}
}

/// Whether some embedded field, at any depth, has a type whose methods are
/// unknown: an unresolved name or a named type without underlying type.
pub(crate) fn embeds_unresolved(table: &TypeTable, id: TypeId) -> bool {
	let mut seen = Vec::new();
	let mut pending = vec![id];
	while let Some(current) = pending.pop() {
		if seen.contains(&current) {
			continue;
		}
		seen.push(current);
		for field in struct_fields(table, current).iter().filter(|field| field.embedded) {
			let base = match table.get(field.ty) {
				Type::Pointer(base) => *base,
				_ => field.ty,
			};
			let unknown = match table.get(base) {
				Type::Basic(kind) => *kind == BasicKind::Invalid,
				Type::Named(_) => table.underlying(base).is_none(),
				_ => false,
			};
			if unknown {
				return true;
			}
			pending.push(base);
		}
	}
	false
}

fn struct_fields(table: &TypeTable, id: TypeId) -> &[Field] {
	match table.underlying(id).map(|underlying| table.get(underlying)) {
		Some(Type::Struct(fields)) => fields,
		_ => &[],
	}
}

/// Flattened method set of an interface type, following embeddings.
pub fn interface_method_set(table: &TypeTable, id: TypeId) -> MethodSet {
	let mut set = MethodSet::new();
	let mut visiting = Vec::new();
	collect_interface(table, id, &mut set, &mut visiting);
	set
}

fn collect_interface(table: &TypeTable, id: TypeId, set: &mut MethodSet, visiting: &mut Vec<TypeId>) {
	let Some(iface) = interface_of(table, id) else {
		return;
	};
	if visiting.contains(&iface) {
		return;
	}
	visiting.push(iface);
	if let Type::Interface(body) = table.get(iface) {
		for method in &body.methods {
			set.insert(MethodKey::new(method.name.clone(), table.signature_identity(&method.sig)));
		}
		for embed in &body.embeds {
			collect_interface(table, *embed, set, visiting);
		}
	}
	visiting.pop();
}

/// Interface body behind `id`, looking through named layers.
fn interface_of(table: &TypeTable, id: TypeId) -> Option<TypeId> {
	let underlying = table.underlying(id)?;
	matches!(table.get(underlying), Type::Interface(_)).then_some(underlying)
}
