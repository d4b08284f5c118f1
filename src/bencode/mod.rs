//! Bencode encoding and decoding.
//!
//! Besides the four classic bencode types this codec understands three
//! single-byte literals: `n` (null), `t` (true) and `f` (false).
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Null / booleans | `n`, `t`, `f` | `t` → true |
//! | Integer | `i<number>e` | `i-42e` → -42 |
//! | Byte string | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! Dictionaries keep their insertion order through a round trip. Set
//! [`EncoderConfig::sort_keys`] to emit keys in canonical sorted order.
//!
//! ```
//! use cbencode::bencode::{decode, to_bytes, BValue};
//!
//! let value = BValue::dict([("foo", BValue::from(5i64)), ("bar", BValue::Null)]);
//! let bytes = to_bytes(&value).unwrap();
//! assert_eq!(bytes, b"d3:fooi5e3:barne");
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```

pub mod bvalue;
pub mod decode;
pub mod encode;
pub mod error;
pub mod json;
pub mod sink;

pub use bvalue::{BDict, BValue};   // re-export
pub use decode::{decode, decode_prefix, Decoder, DecoderConfig};   // re-export
pub use encode::{encode, encoded_len, to_bytes, Encoder, EncoderConfig};   // re-export
pub use error::BencodeError;
pub use json::{bvalue_to_json, json_to_bvalue};
pub use sink::ChunkedSink;
