use std::borrow::Cow;

/// Tag value meaning "never serialize this field".
pub const SKIP_SENTINEL: &str = "-";

/// Find the value stored under `key` in a conventional struct tag.
///
/// The tag is a sequence of space separated `key:"value"` pairs. Values are
/// double-quoted with backslash escapes. Scanning stops at the first
/// malformed pair, so keys after it are reported absent.
pub fn lookup<'a>(tag: &'a str, key: &str) -> Option<Cow<'a, str>> {
	let mut rest = tag;
	loop {
		rest = rest.trim_start_matches(' ');
		if rest.is_empty() {
			return None;
		}

		let name_len = rest
			.char_indices()
			.find(|(_, ch)| *ch <= ' ' || *ch == ':' || *ch == '"' || *ch == '\u{7f}')
			.map_or(rest.len(), |(idx, _)| idx);
		if name_len == 0 {
			return None;
		}
		let name = &rest[..name_len];
		let after = &rest[name_len..];
		let quoted = after.strip_prefix(":\"")?;

		let end = closing_quote(quoted)?;
		let raw = &quoted[..end];
		rest = &quoted[end + 1..];

		if name == key {
			return unquote(raw);
		}
	}
}

/// Whether `tag` carries an active directive for `key`.
///
/// Only the exact value `-` turns the directive off; `-,` names a field
/// literally called `-` and stays active.
pub fn is_active(tag: &str, key: &str) -> bool {
	match lookup(tag, key) {
		Some(value) => value != SKIP_SENTINEL,
		None => false,
	}
}

/// Byte offset of the first unescaped `"` in `text`.
fn closing_quote(text: &str) -> Option<usize> {
	let bytes = text.as_bytes();
	let mut idx = 0;
	while idx < bytes.len() {
		match bytes[idx] {
			b'\\' => idx += 2,
			b'"' => return Some(idx),
			_ => idx += 1,
		}
	}
	None
}

/// Decode the body of a double-quoted literal (quotes already stripped).
///
/// Returns `None` for invalid escapes or raw newlines.
pub(crate) fn unquote(body: &str) -> Option<Cow<'_, str>> {
	if !body.contains(['\\', '\n']) {
		return Some(Cow::Borrowed(body));
	}

	let mut out = String::with_capacity(body.len());
	let mut chars = body.chars();
	while let Some(ch) = chars.next() {
		match ch {
			'\n' => return None,
			'\\' => {
				let esc = chars.next()?;
				match esc {
					'a' => out.push('\u{07}'),
					'b' => out.push('\u{08}'),
					'f' => out.push('\u{0c}'),
					'n' => out.push('\n'),
					'r' => out.push('\r'),
					't' => out.push('\t'),
					'v' => out.push('\u{0b}'),
					'\\' => out.push('\\'),
					'"' => out.push('"'),
					'x' => out.push(char::from(read_hex(&mut chars, 2)? as u8)),
					'u' => out.push(char::from_u32(read_hex(&mut chars, 4)?)?),
					'U' => out.push(char::from_u32(read_hex(&mut chars, 8)?)?),
					'0'..='7' => {
						let mut value = esc.to_digit(8)?;
						for _ in 0..2 {
							value = value * 8 + chars.next()?.to_digit(8)?;
						}
						out.push(char::from(u8::try_from(value).ok()?));
					}
					_ => return None,
				}
			}
			other => out.push(other),
		}
	}
	Some(Cow::Owned(out))
}

fn read_hex(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<u32> {
	let mut value = 0_u32;
	for _ in 0..digits {
		value = value * 16 + chars.next()?.to_digit(16)?;
	}
	Some(value)
}

#[cfg(test)]
mod tests {
	use super::{is_active, lookup};

	#[test]
	fn skip_sentinel_disables_directive() {
		assert!(!is_active(r#"json:"-""#, "json"));
	}

	#[test]
	fn dash_comma_names_a_field_called_dash() {
		assert!(is_active(r#"json:"-,""#, "json"));
		assert_eq!(lookup(r#"json:"-,""#, "json").as_deref(), Some("-,"));
	}

	#[test]
	fn options_keep_directive_active() {
		assert!(is_active(r#"json:"field_name,omitempty""#, "json"));
		assert!(is_active(r#"json:",omitempty""#, "json"));
		assert!(is_active(r#"json:"""#, "json"));
	}

	#[test]
	fn missing_key_is_inactive() {
		assert!(!is_active("", "json"));
		assert!(!is_active(r#"xml:"a""#, "json"));
		assert!(!is_active(r#"jsonx:"a""#, "json"));
	}

	#[test]
	fn later_pairs_are_found() {
		let tag = r#"xml:"item" json:"id,string" yaml:"-""#;
		assert_eq!(lookup(tag, "json").as_deref(), Some("id,string"));
		assert_eq!(lookup(tag, "yaml").as_deref(), Some("-"));
	}

	#[test]
	fn escapes_are_decoded() {
		assert_eq!(lookup(r#"json:"a\"b""#, "json").as_deref(), Some("a\"b"));
		assert_eq!(lookup(r#"json:"\x2d""#, "json").as_deref(), Some("-"));
		assert_eq!(lookup(r#"json:"\055""#, "json").as_deref(), Some("-"));
	}

	#[test]
	fn malformed_pairs_stop_the_scan() {
		assert_eq!(lookup(r#"json:a"#, "json"), None);
		assert_eq!(lookup(r#"json:"unterminated"#, "json"), None);
		assert_eq!(lookup(r#"bad json:"x""#, "json"), None);
		assert_eq!(lookup(r#"json:"\q""#, "json"), None);
		assert_eq!(lookup(r#"xml:"\q" json:"x""#, "json").as_deref(), Some("x"));
	}
}
