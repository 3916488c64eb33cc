//! Error types for packing, unpacking and type registration.

use fastpack_buffers::BufferError;
use thiserror::Error;

/// Failure while turning a [`Value`](crate::Value) into bytes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    #[error("unsupported type `{type_name}`: not registered")]
    UnsupportedType { type_name: &'static str },
    #[error("recursion limit of {limit} nested containers exceeded")]
    RecursionLimit { limit: usize },
    #[error("length {len} does not fit a 32-bit MessagePack length field")]
    LengthOverflow { len: usize },
}

/// Failure while reading bytes back into a [`Value`](crate::Value).
///
/// Every variant carries the byte offset the violation was detected at.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    #[error("truncated input at offset {offset}: need {needed} bytes, {remaining} remain")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("invalid header byte 0x{byte:02x} at offset {offset}")]
    InvalidHeader { offset: usize, byte: u8 },
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("{count} trailing bytes after the root value at offset {offset}")]
    TrailingData { offset: usize, count: usize },
    #[error("depth limit of {limit} nested containers exceeded at offset {offset}")]
    DepthLimit { offset: usize, limit: usize },
    #[error("extension `{tag}` at offset {offset} could not be rebuilt: {source}")]
    Extension {
        offset: usize,
        tag: String,
        source: FieldError,
    },
}

impl DecodeError {
    /// Byte offset into the input where decoding failed.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::Truncated { offset, .. }
            | DecodeError::InvalidHeader { offset, .. }
            | DecodeError::InvalidUtf8 { offset }
            | DecodeError::TrailingData { offset, .. }
            | DecodeError::DepthLimit { offset, .. }
            | DecodeError::Extension { offset, .. } => *offset,
        }
    }
}

impl From<BufferError> for DecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer {
                offset,
                needed,
                remaining,
            } => DecodeError::Truncated {
                offset,
                needed,
                remaining,
            },
            BufferError::InvalidUtf8 { offset } => DecodeError::InvalidUtf8 { offset },
        }
    }
}

/// Rejected type registration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("tag `{tag}` is already registered to `{existing}`")]
    DuplicateTag { tag: String, existing: &'static str },
    #[error("type `{type_name}` is already registered under tag `{existing}`")]
    DuplicateType {
        type_name: &'static str,
        existing: String,
    },
    #[error("invalid tag {0:?}: tags must be non-empty")]
    InvalidTag(String),
}

/// Failure reported by a field-mapping decode function.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("missing field `{0}`")]
    Missing(String),
    #[error("field `{field}` must be {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("field `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl FieldError {
    pub fn invalid(field: &str, reason: impl std::fmt::Display) -> Self {
        FieldError::Invalid {
            field: field.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// A [`Value`](crate::Value) with no JSON counterpart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToJsonError {
    #[error("map key must be a string, found {0}")]
    NonStringKey(&'static str),
    #[error("`{0}` has no JSON form")]
    Unsupported(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display_carries_offset() {
        let err = DecodeError::InvalidHeader {
            offset: 7,
            byte: 0xc1,
        };
        assert_eq!(err.to_string(), "invalid header byte 0xc1 at offset 7");
        assert_eq!(err.offset(), 7);
    }

    #[test]
    fn buffer_errors_map_to_decode_errors() {
        let err: DecodeError = BufferError::EndOfBuffer {
            offset: 3,
            needed: 4,
            remaining: 1,
        }
        .into();
        assert_eq!(
            err,
            DecodeError::Truncated {
                offset: 3,
                needed: 4,
                remaining: 1
            }
        );
        let err: DecodeError = BufferError::InvalidUtf8 { offset: 9 }.into();
        assert_eq!(err, DecodeError::InvalidUtf8 { offset: 9 });
    }

    #[test]
    fn extension_error_names_tag_and_cause() {
        let err = DecodeError::Extension {
            offset: 0,
            tag: "Money".into(),
            source: FieldError::Missing("amount".into()),
        };
        assert_eq!(
            err.to_string(),
            "extension `Money` at offset 0 could not be rebuilt: missing field `amount`"
        );
    }
}
