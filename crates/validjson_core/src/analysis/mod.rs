mod engine;
mod error;
mod methods;
mod registry;
mod syntax;
mod tag;
mod types;
mod unit;
mod walk;

/// Serializability and map-key decisions.
pub use engine::Checker;
/// Error and result aliases.
pub use error::{CheckError, Result};
/// Method sets compared by name and signature identity.
pub use methods::{MethodKey, MethodSet, interface_method_set, pointer_method_set, value_method_set};
/// Capability descriptors and the packages they are read from.
pub use registry::{Capabilities, Capability, DirImporter, ENCODING_PACKAGE, Importer, StdImporter, TEXT_MARSHALER, TEXT_UNMARSHALER};
/// Front-end entry points.
pub use syntax::{parse_file, parse_package, parse_source};
/// Struct tag directive lookup.
pub use tag::{SKIP_SENTINEL, is_active, lookup as lookup_tag};
/// Type arena and type shapes.
pub use types::{
	BasicKind, ChanDir, Field, InterfaceType, Method, NamedMethod, NamedType, Param, Receiver, Signature, Type, TypeDisplay, TypeId, TypeTable, Underlying,
};
/// Compilation units and source positions.
pub use unit::{Issue, Pos, ScopeEntry, StructNode, Unit};
/// Struct walker and its diagnostics.
pub use walk::{CheckOptions, Diagnostic, check_unit};
