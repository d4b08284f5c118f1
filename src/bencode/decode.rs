use log::debug;
use num_bigint::BigInt;

use super::error::BencodeError;
use super::{BDict, BValue};

pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
	/// Deepest allowed nesting of lists and dictionaries.
	pub max_depth: usize,
}

impl Default for DecoderConfig {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct Decoder {
	config: DecoderConfig,
}

impl Decoder {
	pub fn new(config: DecoderConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &DecoderConfig {
		&self.config
	}

	/// Decodes exactly one value; any bytes left over are an error.
	pub fn decode(&self, input: &[u8]) -> Result<BValue, BencodeError> {
		let (consumed, value) = self.decode_prefix(input)?;
		if consumed != input.len() {
			return Err(BencodeError::malformed(
				consumed,
				format!("{} trailing bytes after value", input.len() - consumed),
			));
		}
		Ok(value)
	}

	/// Decodes one value from the front of `input` and reports how many
	/// bytes it took.
	pub fn decode_prefix(&self, input: &[u8]) -> Result<(usize, BValue), BencodeError> {
		let mut cursor = Cursor {
			data: input,
			pos: 0,
			max_depth: self.config.max_depth,
		};
		let value = cursor.value(0)?;
		debug!("decoded {} from {} bytes", value.kind(), cursor.pos);
		Ok((cursor.pos, value))
	}
}

/// Decode a complete bencoded buffer.
pub fn decode(input: &[u8]) -> Result<BValue, BencodeError> {
	Decoder::default().decode(input)
}

/// Decode the first value in `input`, returning `(consumed, value)`.
pub fn decode_prefix(input: &[u8]) -> Result<(usize, BValue), BencodeError> {
	Decoder::default().decode_prefix(input)
}

struct Cursor<'a> {
	data: &'a [u8],
	pos: usize,
	max_depth: usize,
}

impl Cursor<'_> {
	fn peek(&self) -> Option<u8> {
		self.data.get(self.pos).copied()
	}

	fn end_of_input(&self, what: &str) -> BencodeError {
		BencodeError::malformed(self.data.len(), format!("unexpected end of input {}", what))
	}

	fn value(&mut self, depth: usize) -> Result<BValue, BencodeError> {
		let tag = self
			.peek()
			.ok_or_else(|| self.end_of_input("while expecting a value"))?;

		match tag {
			b'n' => {
				self.pos += 1;
				Ok(BValue::Null)
			}
			b't' | b'f' => {
				self.pos += 1;
				Ok(BValue::Boolean(tag == b't'))
			}
			b'0'..=b'9' => Ok(BValue::ByteString(self.byte_string()?)),
			b'i' => self.integer(),
			b'l' => self.list(depth),
			b'd' => self.dict(depth),
			c => Err(BencodeError::malformed(
				self.pos,
				format!("unknown type tag '{}'", [c].escape_ascii()),
			)),
		}
	}

	/// `<length>:<bytes>`, cursor on the first length digit.
	fn byte_string(&mut self) -> Result<Vec<u8>, BencodeError> {
		let start = self.pos;
		let mut length: usize = 0;
		while let Some(b @ b'0'..=b'9') = self.peek() {
			length = length
				.checked_mul(10)
				.and_then(|l| l.checked_add(usize::from(b - b'0')))
				.ok_or_else(|| BencodeError::malformed(start, "string length overflows"))?;
			self.pos += 1;
		}

		if self.pos == start {
			return Err(match self.peek() {
				None => self.end_of_input("while reading string length"),
				Some(c) => BencodeError::malformed(
					self.pos,
					format!("expected a digit, found '{}'", [c].escape_ascii()),
				),
			});
		}
		if self.pos - start > 1 && self.data[start] == b'0' {
			return Err(BencodeError::malformed(start, "string length has a leading zero"));
		}

		match self.peek() {
			Some(b':') => self.pos += 1,
			Some(c) => {
				return Err(BencodeError::malformed(
					self.pos,
					format!("expected ':' after string length, found '{}'", [c].escape_ascii()),
				))
			}
			None => return Err(self.end_of_input("while reading string length")),
		}

		let remaining = self.data.len() - self.pos;
		if length > remaining {
			return Err(BencodeError::malformed(
				self.pos,
				format!(
					"string of length {} runs past end of input ({} bytes left)",
					length, remaining
				),
			));
		}

		let bytes = self.data[self.pos..self.pos + length].to_vec();
		self.pos += length;
		Ok(bytes)
	}

	/// `i[-]<digits>e`, cursor on the `i`.
	fn integer(&mut self) -> Result<BValue, BencodeError> {
		self.pos += 1;
		let sign_pos = self.pos;
		let negative = self.peek() == Some(b'-');
		if negative {
			self.pos += 1;
		}

		let digits_start = self.pos;
		while let Some(b'0'..=b'9') = self.peek() {
			self.pos += 1;
		}
		let digits = &self.data[digits_start..self.pos];

		match self.peek() {
			Some(b'e') => {}
			Some(c) => {
				return Err(BencodeError::malformed(
					self.pos,
					format!("unexpected '{}' in integer", [c].escape_ascii()),
				))
			}
			None => return Err(self.end_of_input("while reading integer")),
		}

		if digits.is_empty() {
			let reason = if negative {
				"integer has a sign but no digits"
			} else {
				"integer has no digits"
			};
			return Err(BencodeError::malformed(digits_start, reason));
		}
		if digits.len() > 1 && digits[0] == b'0' {
			return Err(BencodeError::malformed(digits_start, "integer has a leading zero"));
		}
		if negative && digits == b"0" {
			return Err(BencodeError::malformed(sign_pos, "negative zero is not allowed"));
		}

		let parsed = BigInt::parse_bytes(&self.data[sign_pos..self.pos], 10)
			.ok_or_else(|| BencodeError::malformed(sign_pos, "unparseable integer"))?;

		// skip 'e'
		self.pos += 1;
		Ok(BValue::Integer(parsed))
	}

	fn enter(&self, depth: usize) -> Result<(), BencodeError> {
		if depth >= self.max_depth {
			return Err(BencodeError::malformed(
				self.pos,
				format!("nesting too deep (limit {})", self.max_depth),
			));
		}
		Ok(())
	}

	/// `l<values>e`, cursor on the `l`.
	fn list(&mut self, depth: usize) -> Result<BValue, BencodeError> {
		self.enter(depth)?;
		self.pos += 1;

		let mut items = Vec::new();
		loop {
			match self.peek() {
				Some(b'e') => break,
				Some(_) => items.push(self.value(depth + 1)?),
				None => return Err(self.end_of_input("in unterminated list")),
			}
		}

		self.pos += 1;
		Ok(BValue::List(items))
	}

	/// `d(<string><value>)*e`, cursor on the `d`.
	fn dict(&mut self, depth: usize) -> Result<BValue, BencodeError> {
		self.enter(depth)?;
		self.pos += 1;

		let mut map = BDict::new();
		loop {
			match self.peek() {
				Some(b'e') => break,
				Some(b'0'..=b'9') => {}
				Some(c) => {
					return Err(BencodeError::malformed(
						self.pos,
						format!("dictionary key must be a byte string, found '{}'", [c].escape_ascii()),
					))
				}
				None => return Err(self.end_of_input("in unterminated dictionary")),
			}

			let key_pos = self.pos;
			let key = self.byte_string()?;
			if map.contains_key(&key) {
				return Err(BencodeError::malformed(
					key_pos,
					format!("duplicate dictionary key \"{}\"", key.escape_ascii()),
				));
			}

			let value = self.value(depth + 1)?;
			map.insert(key, value);
		}

		self.pos += 1;
		Ok(BValue::Dict(map))
	}
}
