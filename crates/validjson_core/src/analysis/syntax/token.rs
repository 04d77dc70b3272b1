use crate::analysis::Pos;

/// Token classes produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tok {
	/// Identifier or keyword.
	Ident,
	Int,
	Float,
	Imag,
	Char,
	/// Interpreted string literal, quotes included.
	Str,
	/// Raw string literal, backquotes included.
	RawStr,
	/// Operator or delimiter.
	Op,
	/// Explicit `;` or one inserted at a line end.
	Semi,
	Eof,
}

/// One lexed token borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
	pub kind: Tok,
	pub text: &'a str,
	pub pos: Pos,
}

impl Token<'_> {
	pub fn is_op(&self, op: &str) -> bool {
		self.kind == Tok::Op && self.text == op
	}

	pub fn is_keyword(&self, keyword: &str) -> bool {
		self.kind == Tok::Ident && self.text == keyword
	}

	/// Identifier that is not a reserved word.
	pub fn is_name(&self) -> bool {
		self.kind == Tok::Ident && !is_keyword(self.text)
	}

	pub fn is_string(&self) -> bool {
		matches!(self.kind, Tok::Str | Tok::RawStr)
	}
}

const KEYWORDS: [&str; 25] = [
	"break",
	"case",
	"chan",
	"const",
	"continue",
	"default",
	"defer",
	"else",
	"fallthrough",
	"for",
	"func",
	"go",
	"goto",
	"if",
	"import",
	"interface",
	"map",
	"package",
	"range",
	"return",
	"select",
	"struct",
	"switch",
	"type",
	"var",
];

pub(crate) fn is_keyword(text: &str) -> bool {
	KEYWORDS.contains(&text)
}

/// Keywords after which a line end terminates the statement.
pub(crate) fn ends_statement(text: &str) -> bool {
	matches!(text, "break" | "continue" | "fallthrough" | "return")
}
