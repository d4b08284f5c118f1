use num_bigint::BigInt;
use serde_json::{json, Map, Value};

use super::error::BencodeError;
use super::{BDict, BValue};

const BYTES_HEX: &str = "_bytes_hex";
const BIGINT: &str = "_bigint";
const HEX_KEY_PREFIX: &str = "hex:";

/// Convert a `BValue` into JSON (using Serde JSON `Value`).
///
/// - `Null` / `Boolean(b)` => JSON null / bool
/// - `Integer(i)` => JSON number, or `{"_bigint": "<digits>"}` outside `i64`
/// - `ByteString(bytes)` => Attempt UTF-8; if invalid, store hex in `"_bytes_hex"`.
/// - `List(...)` => JSON array
/// - `Dict(...)` => JSON object. Keys that are not UTF-8, that start with
///   `"hex:"`, or that are one of the two marker names are written as
///   `"hex:<hex>"`, so distinct keys never share a JSON key and a real
///   dictionary never looks like a marker object.
pub fn bvalue_to_json(bv: &BValue) -> Value {
	match bv {
		BValue::Null => Value::Null,
		BValue::Boolean(b) => Value::Bool(*b),
		BValue::Integer(i) => match i64::try_from(i) {
			Ok(small) => json!(small),
			Err(_) => json!({ BIGINT: i.to_string() }),
		},
		BValue::ByteString(bytes) => match std::str::from_utf8(bytes) {
			Ok(utf8_str) => Value::String(utf8_str.to_string()),
			Err(_) => json!({ BYTES_HEX: hex::encode(bytes) }),
		},
		BValue::List(list_items) => Value::Array(list_items.iter().map(bvalue_to_json).collect()),
		BValue::Dict(map) => {
			let mut json_map = Map::new();
			for (k, v) in map {
				json_map.insert(json_key_for(k), bvalue_to_json(v));
			}
			Value::Object(json_map)
		}
	}
}

/// Build a `BValue` from JSON, reversing [`bvalue_to_json`].
///
/// Fractional and exponent numbers have no bencode form and are rejected
/// with `UnsupportedType`. Two JSON keys naming the same byte key, or a
/// marker object with a bad payload, are `InvalidJson`.
pub fn json_to_bvalue(value: &Value) -> Result<BValue, BencodeError> {
	match value {
		Value::Null => Ok(BValue::Null),
		Value::Bool(b) => Ok(BValue::Boolean(*b)),
		Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				Ok(BValue::from(i))
			} else if let Some(u) = n.as_u64() {
				Ok(BValue::from(u))
			} else {
				Err(BencodeError::UnsupportedType(format!(
					"floating point number {} cannot be bencoded",
					n
				)))
			}
		}
		Value::String(s) => Ok(BValue::string(s)),
		Value::Array(items) => items
			.iter()
			.map(json_to_bvalue)
			.collect::<Result<Vec<_>, _>>()
			.map(BValue::List),
		Value::Object(map) => {
			if let Some(marked) = marker(map)? {
				return Ok(marked);
			}
			let mut dict = BDict::with_capacity(map.len());
			for (k, v) in map {
				let key = byte_key_for(k);
				if dict.contains_key(&key) {
					return Err(BencodeError::InvalidJson(format!(
						"key \"{}\" repeats dictionary key \"{}\"",
						k,
						key.escape_ascii()
					)));
				}
				dict.insert(key, json_to_bvalue(v)?);
			}
			Ok(BValue::Dict(dict))
		}
	}
}

/// Recognises the single-key marker objects written by [`bvalue_to_json`].
fn marker(map: &Map<String, Value>) -> Result<Option<BValue>, BencodeError> {
	if map.len() != 1 {
		return Ok(None);
	}
	if let Some(payload) = map.get(BYTES_HEX) {
		return payload
			.as_str()
			.and_then(|h| hex::decode(h).ok())
			.map(|bytes| Some(BValue::ByteString(bytes)))
			.ok_or_else(|| BencodeError::InvalidJson(format!("{} needs a hex string, got {}", BYTES_HEX, payload)));
	}
	if let Some(payload) = map.get(BIGINT) {
		return payload
			.as_str()
			.and_then(|digits| digits.parse::<BigInt>().ok())
			.map(|i| Some(BValue::Integer(i)))
			.ok_or_else(|| BencodeError::InvalidJson(format!("{} needs a decimal string, got {}", BIGINT, payload)));
	}
	Ok(None)
}

fn json_key_for(key: &[u8]) -> String {
	match std::str::from_utf8(key) {
		Ok(s) if !s.starts_with(HEX_KEY_PREFIX) && s != BYTES_HEX && s != BIGINT => s.to_string(),
		_ => format!("{}{}", HEX_KEY_PREFIX, hex::encode(key)),
	}
}

/// `"hex:<hex>"` decodes to raw bytes; anything else, including a `hex:`
/// prefix that is not followed by valid hex, is taken literally.
fn byte_key_for(key: &str) -> Vec<u8> {
	key.strip_prefix(HEX_KEY_PREFIX)
		.and_then(|h| hex::decode(h).ok())
		.unwrap_or_else(|| key.as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn roundtrip(value: &BValue) -> BValue {
		json_to_bvalue(&bvalue_to_json(value)).unwrap()
	}

	#[test]
	fn test_to_json_simple() {
		assert_eq!(bvalue_to_json(&BValue::from(42i64)), json!(42));
		assert_eq!(bvalue_to_json(&BValue::string("test")), json!("test"));
		assert_eq!(bvalue_to_json(&BValue::Null), json!(null));
		assert_eq!(
			bvalue_to_json(&BValue::List(vec![BValue::from(1i64), BValue::from(true)])),
			json!([1, true])
		);
	}

	#[test]
	fn test_to_json_binary_and_big() {
		assert_eq!(
			bvalue_to_json(&BValue::bytes(vec![0xff, 0x00])),
			json!({ "_bytes_hex": "ff00" })
		);
		let big: BigInt = "123456789012345678901234567890".parse().unwrap();
		assert_eq!(
			bvalue_to_json(&BValue::Integer(big)),
			json!({ "_bigint": "123456789012345678901234567890" })
		);
	}

	#[test]
	fn test_to_json_keeps_key_order() {
		let value = BValue::dict([("foo", BValue::from(1i64)), ("bar", BValue::from(2i64))]);
		assert_eq!(serde_json::to_string(&bvalue_to_json(&value)).unwrap(), r#"{"foo":1,"bar":2}"#);
	}

	#[test]
	fn test_to_json_keeps_keys_that_look_alike() {
		// raw 0xab and the text "hex:ab" must stay two separate entries
		let mut dict = BDict::new();
		dict.insert(vec![0xab], BValue::from(1i64));
		dict.insert(b"hex:ab".to_vec(), BValue::from(2i64));
		let value = BValue::Dict(dict);

		let json = bvalue_to_json(&value);
		assert_eq!(json.as_object().unwrap().len(), 2);
		assert_eq!(json["hex:ab"], json!(1));
		assert_eq!(json["hex:6865783a6162"], json!(2));
		assert_eq!(roundtrip(&value), value);
	}

	#[test]
	fn test_from_json_rejects_clashing_keys() {
		let result = json_to_bvalue(&json!({ "a": 1, "hex:61": 2 }));
		assert!(matches!(result, Err(BencodeError::InvalidJson(_))), "{:?}", result);
	}

	#[test]
	fn test_from_json_plain_hex_prefixed_key() {
		let value = json_to_bvalue(&json!({ "hex:notes": 1 })).unwrap();
		assert_eq!(value.get(b"hex:notes"), Some(&BValue::from(1i64)));
	}

	#[test]
	fn test_dict_shaped_like_marker_roundtrips() {
		let bytes_like = BValue::dict([("_bytes_hex", BValue::string("ff"))]);
		assert_eq!(roundtrip(&bytes_like), bytes_like);

		let bigint_like = BValue::dict([("_bigint", BValue::string("12"))]);
		assert_eq!(roundtrip(&bigint_like), bigint_like);
	}

	#[test]
	fn test_from_json_rejects_floats() {
		let result = json_to_bvalue(&json!({ "ratio": 0.5 }));
		assert!(matches!(result, Err(BencodeError::UnsupportedType(_))));
	}

	#[test]
	fn test_json_roundtrip() {
		let value = BValue::dict([
			("name", BValue::string("file")),
			("raw", BValue::bytes(vec![0x80, 0x81])),
			("big", BValue::Integer("-99999999999999999999999".parse().unwrap())),
			("max", BValue::from(u64::MAX)),
			("none", BValue::Null),
			("", BValue::from(true)),
		]);
		let mut dict = BDict::new();
		dict.insert(vec![0xde, 0xad], BValue::from(false));
		dict.insert(b"hex:".to_vec(), BValue::Null);
		let value = BValue::List(vec![value, BValue::Dict(dict)]);

		assert_eq!(roundtrip(&value), value);
	}

	#[test]
	fn test_from_json_invalid_marker() {
		let result = json_to_bvalue(&json!({ "_bytes_hex": "zz" }));
		assert!(matches!(result, Err(BencodeError::InvalidJson(_))));
		let result = json_to_bvalue(&json!({ "_bigint": 5 }));
		assert!(matches!(result, Err(BencodeError::InvalidJson(_))));
	}
}
