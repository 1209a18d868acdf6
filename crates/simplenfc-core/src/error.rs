//! Error types for tag reads and writes
//!
//! `NfcError` is the closed taxonomy a read or write can end in. Each
//! variant carries only the context a caller needs to react.

use std::fmt;

use thiserror::Error;

/// Failure reported by the tag transport (connect, write, format)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(detail: impl Into<String>) -> Self {
        TransportError(detail.into())
    }

    pub fn detail(&self) -> &str {
        &self.0
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        TransportError(e.to_string())
    }
}

/// Raw record set could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed record set at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },
}

impl DecodeError {
    pub fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        DecodeError::Malformed {
            offset,
            reason: reason.into(),
        }
    }

    /// Byte offset where parsing stopped
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::Malformed { offset, .. } => *offset,
        }
    }
}

/// A record or message that cannot be built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Message must contain at least one record")]
    EmptyMessage,

    #[error("TNF {0:?} cannot be used for a standalone record")]
    IllegalTnf(crate::Tnf),

    #[error("Empty record must not carry type, id or payload")]
    NonEmptyEmptyRecord,

    #[error("TNF {0:?} must not carry a type")]
    UnexpectedType(crate::Tnf),

    #[error("TNF {0:?} requires a type")]
    MissingType(crate::Tnf),

    #[error("{field} is {len} bytes, limit is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Read/write failure taxonomy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NfcError {
    #[error("NFC radio is disabled")]
    RadioDisabled,

    #[error("Tag is read-only")]
    ReadOnly,

    #[error("Insufficient capacity: message needs {required} bytes, tag holds {available}")]
    InsufficientCapacity { required: usize, available: usize },

    #[error("Tag is neither NDEF nor NDEF-formatable")]
    UnsupportedMedium,

    #[error("Transport failure: {0}")]
    TransportFailure(#[from] TransportError),

    #[error("Decode failure: {0}")]
    DecodeFailure(#[from] DecodeError),
}

/// Result type for tag operations
pub type NfcResult<T> = Result<T, NfcError>;

/// Flat discriminant of [`NfcError`] with stable codes
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RadioDisabled = -1,
    ReadOnly = -2,
    InsufficientCapacity = -3,
    UnsupportedMedium = -4,
    TransportFailure = -5,
    DecodeFailure = -6,
}

impl ErrorKind {
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl NfcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NfcError::RadioDisabled => ErrorKind::RadioDisabled,
            NfcError::ReadOnly => ErrorKind::ReadOnly,
            NfcError::InsufficientCapacity { .. } => ErrorKind::InsufficientCapacity,
            NfcError::UnsupportedMedium => ErrorKind::UnsupportedMedium,
            NfcError::TransportFailure(_) => ErrorKind::TransportFailure,
            NfcError::DecodeFailure(_) => ErrorKind::DecodeFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = NfcError::InsufficientCapacity {
            required: 49,
            available: 48,
        };
        assert_eq!(err.kind(), ErrorKind::InsufficientCapacity);
        assert_eq!(err.kind().code(), -3);

        let err: NfcError = TransportError::new("tag lost").into();
        assert_eq!(err.kind(), ErrorKind::TransportFailure);

        let err: NfcError = DecodeError::malformed(3, "truncated payload").into();
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }

    #[test]
    fn test_error_messages() {
        let err = NfcError::InsufficientCapacity {
            required: 200,
            available: 137,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient capacity: message needs 200 bytes, tag holds 137"
        );

        let err = DecodeError::malformed(7, "missing ME");
        assert_eq!(err.offset(), 7);
        assert_eq!(err.to_string(), "Malformed record set at byte 7: missing ME");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "tag moved away");
        let err = TransportError::from(io);
        assert_eq!(err.detail(), "tag moved away");
    }
}
