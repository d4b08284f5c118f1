use indexmap::IndexMap;
use num_bigint::BigInt;

use super::error::BencodeError;

/// Dictionary payload. Iteration order is insertion order.
pub type BDict = IndexMap<Vec<u8>, BValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BValue {
	Null,
	Boolean(bool),
	ByteString(Vec<u8>), // raw bytes, not necessarily UTF-8
	Integer(BigInt),
	List(Vec<BValue>),
	Dict(BDict),
}

impl BValue {
	pub fn string(s: &str) -> Self {
		BValue::ByteString(s.as_bytes().to_vec())
	}

	pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
		BValue::ByteString(b.into())
	}

	pub fn integer(i: impl Into<BigInt>) -> Self {
		BValue::Integer(i.into())
	}

	/// Builds a dictionary from `(key, value)` pairs, keeping their order.
	///
	/// A repeated key keeps its first position and takes the last value,
	/// matching `IndexMap::insert`.
	pub fn dict<K, I>(pairs: I) -> Self
	where
		K: Into<Vec<u8>>,
		I: IntoIterator<Item = (K, BValue)>,
	{
		BValue::Dict(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}

	/// Short name of the variant, used in error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			BValue::Null => "null",
			BValue::Boolean(_) => "boolean",
			BValue::ByteString(_) => "byte string",
			BValue::Integer(_) => "integer",
			BValue::List(_) => "list",
			BValue::Dict(_) => "dictionary",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, BValue::Null)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			BValue::Boolean(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			BValue::ByteString(b) => Some(b),
			_ => None,
		}
	}

	/// Returns the byte string as UTF-8 text if it is valid UTF-8.
	pub fn as_str(&self) -> Option<&str> {
		self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
	}

	pub fn as_integer(&self) -> Option<&BigInt> {
		match self {
			BValue::Integer(i) => Some(i),
			_ => None,
		}
	}

	/// Returns the integer if it fits in an `i64`.
	pub fn as_i64(&self) -> Option<i64> {
		self.as_integer().and_then(|i| i64::try_from(i).ok())
	}

	pub fn as_list(&self) -> Option<&[BValue]> {
		match self {
			BValue::List(l) => Some(l),
			_ => None,
		}
	}

	pub fn as_dict(&self) -> Option<&BDict> {
		match self {
			BValue::Dict(d) => Some(d),
			_ => None,
		}
	}

	/// Looks up `key` if this value is a dictionary.
	pub fn get(&self, key: &[u8]) -> Option<&BValue> {
		self.as_dict()?.get(key)
	}
}

impl From<bool> for BValue {
	fn from(b: bool) -> Self {
		BValue::Boolean(b)
	}
}

impl From<i64> for BValue {
	fn from(i: i64) -> Self {
		BValue::Integer(i.into())
	}
}

impl From<u64> for BValue {
	fn from(i: u64) -> Self {
		BValue::Integer(i.into())
	}
}

impl From<BigInt> for BValue {
	fn from(i: BigInt) -> Self {
		BValue::Integer(i)
	}
}

impl From<&str> for BValue {
	fn from(s: &str) -> Self {
		BValue::string(s)
	}
}

impl From<String> for BValue {
	fn from(s: String) -> Self {
		BValue::ByteString(s.into_bytes())
	}
}

impl From<&[u8]> for BValue {
	fn from(b: &[u8]) -> Self {
		BValue::ByteString(b.to_vec())
	}
}

impl From<Vec<u8>> for BValue {
	fn from(b: Vec<u8>) -> Self {
		BValue::ByteString(b)
	}
}

impl From<Vec<BValue>> for BValue {
	fn from(l: Vec<BValue>) -> Self {
		BValue::List(l)
	}
}

impl From<BDict> for BValue {
	fn from(d: BDict) -> Self {
		BValue::Dict(d)
	}
}

/// Bencode has no floating point type, so this conversion always fails.
impl TryFrom<f64> for BValue {
	type Error = BencodeError;

	fn try_from(f: f64) -> Result<Self, Self::Error> {
		Err(BencodeError::UnsupportedType(format!(
			"floating point value {} cannot be bencoded",
			f
		)))
	}
}
