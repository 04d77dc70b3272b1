/// Struct tag check command.
pub mod check;
/// Declared type listing command.
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod util;
