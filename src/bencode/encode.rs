use std::io::Write;
use std::num::NonZeroUsize;

use log::debug;

use super::decode::DEFAULT_MAX_DEPTH;
use super::error::BencodeError;
use super::sink::{ChunkedSink, DEFAULT_CHUNK_SIZE};
use super::BValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
	/// Largest single write handed to the caller's sink.
	pub chunk_size: NonZeroUsize,
	/// Emit dictionary keys in lexicographic byte order instead of
	/// insertion order.
	pub sort_keys: bool,
	/// Deepest allowed nesting of lists and dictionaries. Matches the
	/// decoder's default so anything encoded can be decoded again.
	pub max_depth: usize,
}

impl Default for EncoderConfig {
	fn default() -> Self {
		Self {
			chunk_size: NonZeroUsize::new(DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN),
			sort_keys: false,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct Encoder {
	config: EncoderConfig,
}

impl Encoder {
	pub fn new(config: EncoderConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &EncoderConfig {
		&self.config
	}

	/// Encodes `value` into `sink` in chunks of at most `chunk_size` bytes
	/// and returns the complete encoding.
	///
	/// Values nested deeper than `max_depth` containers fail with
	/// `UnsupportedType`; bytes already forwarded to `sink` stay written.
	pub fn encode<W: Write>(&self, value: &BValue, sink: W) -> Result<Vec<u8>, BencodeError> {
		let mut out = ChunkedSink::new(sink, self.config.chunk_size);
		self.encode_value(value, &mut out, 0)?;
		let chunks = out.chunks();
		let bytes = out.finish()?;
		debug!(
			"encoded {} {} into {} bytes ({} full chunks of {})",
			value.kind(),
			if self.config.sort_keys { "with sorted keys" } else { "in insertion order" },
			bytes.len(),
			chunks,
			self.config.chunk_size
		);
		Ok(bytes)
	}

	fn enter(&self, depth: usize) -> Result<(), BencodeError> {
		if depth >= self.config.max_depth {
			return Err(BencodeError::UnsupportedType(format!(
				"value nests deeper than {} lists or dictionaries",
				self.config.max_depth
			)));
		}
		Ok(())
	}

	fn encode_value<W: Write>(
		&self,
		value: &BValue,
		out: &mut ChunkedSink<W>,
		depth: usize,
	) -> Result<(), BencodeError> {
		match value {
			BValue::Null => out.push(b'n')?,
			BValue::Boolean(true) => out.push(b't')?,
			BValue::Boolean(false) => out.push(b'f')?,
			BValue::ByteString(bytes) => encode_bytes(bytes, out)?,
			BValue::Integer(i) => {
				// BigInt's Display is already canonical: no leading zeros, no "-0".
				out.push(b'i')?;
				out.extend(i.to_string().as_bytes())?;
				out.push(b'e')?;
			}
			BValue::List(items) => {
				self.enter(depth)?;
				out.push(b'l')?;
				for item in items {
					self.encode_value(item, out, depth + 1)?;
				}
				out.push(b'e')?;
			}
			BValue::Dict(dict) => {
				self.enter(depth)?;
				out.push(b'd')?;
				if self.config.sort_keys {
					let mut entries: Vec<(&Vec<u8>, &BValue)> = dict.iter().collect();
					entries.sort_by(|a, b| a.0.cmp(b.0));
					for (key, val) in entries {
						encode_bytes(key, out)?;
						self.encode_value(val, out, depth + 1)?;
					}
				} else {
					for (key, val) in dict {
						encode_bytes(key, out)?;
						self.encode_value(val, out, depth + 1)?;
					}
				}
				out.push(b'e')?;
			}
		}
		Ok(())
	}
}

fn encode_bytes<W: Write>(bytes: &[u8], out: &mut ChunkedSink<W>) -> std::io::Result<()> {
	out.extend(bytes.len().to_string().as_bytes())?;
	out.push(b':')?;
	out.extend(bytes)
}

/// Encode a `BValue` into `sink` with the default configuration, returning
/// the full encoding as well.
pub fn encode<W: Write>(value: &BValue, sink: W) -> Result<Vec<u8>, BencodeError> {
	Encoder::default().encode(value, sink)
}

/// Encode a `BValue` into a `Vec<u8>` without any external sink.
pub fn to_bytes(value: &BValue) -> Result<Vec<u8>, BencodeError> {
	encode(value, std::io::sink())
}

/// Exact number of bytes `value` encodes to. Recurses once per nesting
/// level, like the encoder, but without a depth limit.
pub fn encoded_len(value: &BValue) -> usize {
	match value {
		BValue::Null | BValue::Boolean(_) => 1,
		BValue::ByteString(bytes) => bytes_len(bytes),
		BValue::Integer(i) => i.to_string().len() + 2,
		BValue::List(items) => 2 + items.iter().map(encoded_len).sum::<usize>(),
		BValue::Dict(dict) => {
			2 + dict
				.iter()
				.map(|(k, v)| bytes_len(k) + encoded_len(v))
				.sum::<usize>()
		}
	}
}

fn bytes_len(bytes: &[u8]) -> usize {
	bytes.len().to_string().len() + 1 + bytes.len()
}
