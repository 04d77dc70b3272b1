use crate::analysis::Pos;
use crate::analysis::syntax::SyntaxError;
use crate::analysis::syntax::token::{Tok, Token, ends_statement, is_keyword};

const OPERATORS: [&str; 47] = [
	"<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>",
	"&^", "+", "-", "*", "/", "%", "&", "|", "^", "<", ">", "=", "!", "(", ")", "[", "]", "{", "}", ",", ".", ":", "~",
];

/// Split `src` into tokens, inserting semicolons at line ends the way the
/// language grammar expects.
pub(crate) fn tokenize(src: &str) -> Result<Vec<Token<'_>>, SyntaxError> {
	let mut lexer = Lexer::new(src);
	let mut out = Vec::new();
	loop {
		let token = lexer.next_token()?;
		let done = token.kind == Tok::Eof;
		out.push(token);
		if done {
			return Ok(out);
		}
	}
}

struct Lexer<'a> {
	src: &'a str,
	pos: usize,
	line: u32,
	line_start: usize,
	insert_semi: bool,
}

impl<'a> Lexer<'a> {
	fn new(src: &'a str) -> Self {
		Self {
			src,
			pos: 0,
			line: 1,
			line_start: 0,
			insert_semi: false,
		}
	}

	fn here(&self) -> Pos {
		Pos::new(self.line, (self.pos - self.line_start + 1) as u32)
	}

	fn rest(&self) -> &'a str {
		&self.src[self.pos..]
	}

	fn peek(&self) -> Option<char> {
		self.rest().chars().next()
	}

	fn peek_second(&self) -> Option<char> {
		self.rest().chars().nth(1)
	}

	fn bump(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.pos += ch.len_utf8();
		if ch == '\n' {
			self.line += 1;
			self.line_start = self.pos;
		}
		Some(ch)
	}

	fn error(&self, pos: Pos, message: impl Into<String>) -> SyntaxError {
		SyntaxError {
			pos,
			message: message.into(),
		}
	}

	fn token(&self, kind: Tok, start: usize, pos: Pos) -> Token<'a> {
		Token {
			kind,
			text: &self.src[start..self.pos],
			pos,
		}
	}

	fn semi(&mut self, text: &'static str, pos: Pos) -> Token<'a> {
		self.insert_semi = false;
		Token { kind: Tok::Semi, text, pos }
	}

	fn next_token(&mut self) -> Result<Token<'a>, SyntaxError> {
		loop {
			let pos = self.here();
			let Some(ch) = self.peek() else {
				if self.insert_semi {
					return Ok(self.semi("\n", pos));
				}
				return Ok(Token { kind: Tok::Eof, text: "", pos });
			};

			match ch {
				' ' | '\t' | '\r' => {
					self.bump();
				}
				'\n' => {
					self.bump();
					if self.insert_semi {
						return Ok(self.semi("\n", pos));
					}
				}
				'/' if self.peek_second() == Some('/') => {
					while let Some(ch) = self.peek() {
						if ch == '\n' {
							break;
						}
						self.bump();
					}
				}
				'/' if self.peek_second() == Some('*') => {
					let Some(end) = self.rest()[2..].find("*/") else {
						return Err(self.error(pos, "comment not terminated"));
					};
					let body_end = self.pos + 2 + end + 2;
					let spans_lines = self.src[self.pos..body_end].contains('\n');
					while self.pos < body_end {
						self.bump();
					}
					if spans_lines && self.insert_semi {
						return Ok(self.semi("\n", pos));
					}
				}
				_ => return self.scan_token(ch, pos),
			}
		}
	}

	fn scan_token(&mut self, ch: char, pos: Pos) -> Result<Token<'a>, SyntaxError> {
		let start = self.pos;

		if ch == '_' || ch.is_alphabetic() {
			while self.peek().is_some_and(|ch| ch == '_' || ch.is_alphanumeric()) {
				self.bump();
			}
			let token = self.token(Tok::Ident, start, pos);
			self.insert_semi = !is_keyword(token.text) || ends_statement(token.text);
			return Ok(token);
		}

		if ch.is_ascii_digit() || (ch == '.' && self.peek_second().is_some_and(|next| next.is_ascii_digit())) {
			let kind = self.scan_number();
			self.insert_semi = true;
			return Ok(self.token(kind, start, pos));
		}

		match ch {
			'"' => {
				self.bump();
				loop {
					match self.bump() {
						Some('"') => break,
						Some('\\') => {
							if self.bump().is_none_or(|ch| ch == '\n') {
								return Err(self.error(pos, "string literal not terminated"));
							}
						}
						Some('\n') | None => return Err(self.error(pos, "string literal not terminated")),
						Some(_) => {}
					}
				}
				self.insert_semi = true;
				Ok(self.token(Tok::Str, start, pos))
			}
			'`' => {
				self.bump();
				loop {
					match self.bump() {
						Some('`') => break,
						None => return Err(self.error(pos, "raw string literal not terminated")),
						Some(_) => {}
					}
				}
				self.insert_semi = true;
				Ok(self.token(Tok::RawStr, start, pos))
			}
			'\'' => {
				self.bump();
				loop {
					match self.bump() {
						Some('\'') => break,
						Some('\\') => {
							if self.bump().is_none_or(|ch| ch == '\n') {
								return Err(self.error(pos, "rune literal not terminated"));
							}
						}
						Some('\n') | None => return Err(self.error(pos, "rune literal not terminated")),
						Some(_) => {}
					}
				}
				self.insert_semi = true;
				Ok(self.token(Tok::Char, start, pos))
			}
			';' => {
				self.bump();
				Ok(self.semi(";", pos))
			}
			_ => {
				let rest = self.rest();
				let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) else {
					return Err(self.error(pos, format!("invalid character {ch:?}")));
				};
				for _ in 0..op.len() {
					self.bump();
				}
				self.insert_semi = matches!(*op, ")" | "]" | "}" | "++" | "--");
				Ok(self.token(Tok::Op, start, pos))
			}
		}
	}

	fn scan_number(&mut self) -> Tok {
		let start = self.pos;
		let hex = self.rest().starts_with("0x") || self.rest().starts_with("0X");
		let mut prev = '\0';
		while let Some(ch) = self.peek() {
			let exponent_sign = (ch == '+' || ch == '-') && (if hex { matches!(prev, 'p' | 'P') } else { matches!(prev, 'e' | 'E') });
			if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' || exponent_sign {
				prev = ch;
				self.bump();
			} else {
				break;
			}
		}

		let text = &self.src[start..self.pos];
		if text.ends_with('i') {
			Tok::Imag
		} else if text.contains('.') || (hex && text.contains(['p', 'P'])) || (!hex && text.contains(['e', 'E'])) {
			Tok::Float
		} else {
			Tok::Int
		}
	}
}
