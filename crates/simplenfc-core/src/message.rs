//! NDEF messages and raw record sets

use std::fmt;

use bytes::Bytes;

use crate::{Record, RecordError};

/// An ordered, non-empty sequence of records
///
/// Immutable once built. `byte_len` is exactly what the codec produces.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Message {
    records: Vec<Record>,
}

impl Message {
    pub fn new(records: Vec<Record>) -> Result<Self, RecordError> {
        if records.is_empty() {
            return Err(RecordError::EmptyMessage);
        }
        Ok(Message { records })
    }

    /// Message with a single record
    pub fn single(record: Record) -> Self {
        Message {
            records: vec![record],
        }
    }

    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// First record; decides the message type for dispatch
    #[inline]
    pub fn first(&self) -> &Record {
        &self.records[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Encoded size in bytes
    pub fn byte_len(&self) -> usize {
        self.records.iter().map(Record::encoded_len).sum()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl From<Record> for Message {
    fn from(record: Record) -> Self {
        Message::single(record)
    }
}

impl<'a> IntoIterator for &'a Message {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Encoded record set exactly as delivered by the platform
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct RawRecordSet(Bytes);

impl RawRecordSet {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        RawRecordSet(bytes.into())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl From<Bytes> for RawRecordSet {
    fn from(bytes: Bytes) -> Self {
        RawRecordSet(bytes)
    }
}

impl From<Vec<u8>> for RawRecordSet {
    fn from(bytes: Vec<u8>) -> Self {
        RawRecordSet(Bytes::from(bytes))
    }
}

impl fmt::Debug for RawRecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawRecordSet({} bytes)", self.0.len())
    }
}
