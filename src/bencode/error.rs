use thiserror::Error;

#[derive(Debug, Error)]
pub enum BencodeError {
	#[error("Unsupported type: {0}")]
	UnsupportedType(String),

	#[error("Malformed input at byte {offset}: {reason}")]
	MalformedInput { offset: usize, reason: String },

	#[error("Invalid JSON input: {0}")]
	InvalidJson(String),

	#[error("Sink error: {0}")]
	Io(#[from] std::io::Error),
}

impl BencodeError {
	pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
		BencodeError::MalformedInput {
			offset,
			reason: reason.into(),
		}
	}

	/// Byte offset of a decode failure, if this is one.
	pub fn offset(&self) -> Option<usize> {
		match self {
			BencodeError::MalformedInput { offset, .. } => Some(*offset),
			_ => None,
		}
	}

	pub fn is_malformed(&self) -> bool {
		matches!(self, BencodeError::MalformedInput { .. })
	}

	pub fn is_unsupported(&self) -> bool {
		matches!(self, BencodeError::UnsupportedType(_))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_malformed_display() {
		let err = BencodeError::malformed(4, "integer has a leading zero");
		assert!(err.is_malformed());
		assert_eq!(err.offset(), Some(4));
		assert_eq!(err.to_string(), "Malformed input at byte 4: integer has a leading zero");
	}

	#[test]
	fn test_unsupported_has_no_offset() {
		let err = BencodeError::UnsupportedType("float".to_string());
		assert!(err.is_unsupported());
		assert!(!err.is_malformed());
		assert_eq!(err.offset(), None);
	}
}
