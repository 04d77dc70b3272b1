//! Static checker for struct fields whose `json` tags sit on types JSON cannot represent.

/// Type model, capability registry, serializability engine, and declaration front end.
pub mod analysis;
