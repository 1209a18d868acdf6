//! NDEF record header
//!
//! Layout (lengths big-endian):
//! - Byte 0: Flags + TNF
//! - Byte 1: Type length
//! - Payload length: 1 byte if SR, else 4 bytes
//! - ID length: 1 byte, only if IL
//! - Type, ID, Payload follow in that order

use bytes::BufMut;
use simplenfc_core::{DecodeError, Record, Tnf};

use crate::RecordFlags;

/// Smallest possible header (flags, type length, short payload length)
pub const MIN_HEADER_SIZE: usize = 3;

/// Largest possible header (long payload length plus id length)
pub const MAX_HEADER_SIZE: usize = 7;

/// Parsed record header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    pub flags: RecordFlags,
    pub type_len: u8,
    pub payload_len: u32,
    /// Zero when the IL flag is clear
    pub id_len: u8,
}

impl RecordHeader {
    /// Header for an unchunked record at the given position in a message
    pub fn for_record(record: &Record, first: bool, last: bool) -> Self {
        let mut flags = RecordFlags::NONE;
        flags.set_message_begin(first);
        flags.set_message_end(last);
        flags.set_short_record(record.is_short());
        flags.set_id_length(!record.id().is_empty());
        flags.set_tnf(record.tnf());

        RecordHeader {
            flags,
            type_len: record.record_type().len() as u8,
            payload_len: record.payload().len() as u32,
            id_len: record.id().len() as u8,
        }
    }

    #[inline]
    pub fn tnf(&self) -> Tnf {
        self.flags.tnf()
    }

    /// Bytes occupied by the header itself
    pub fn header_len(&self) -> usize {
        let payload_len_field = if self.flags.is_short_record() { 1 } else { 4 };
        let id_len_field = if self.flags.has_id_length() { 1 } else { 0 };
        2 + payload_len_field + id_len_field
    }

    /// Bytes occupied by type, id and payload
    pub fn body_len(&self) -> usize {
        self.type_len as usize + self.id_len as usize + self.payload_len as usize
    }

    /// Parse a header starting at `offset` in `buf`
    ///
    /// Errors report absolute offsets into `buf`.
    pub fn parse(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let truncated = || DecodeError::malformed(offset, "truncated record header");

        let rest = buf.get(offset..).ok_or_else(truncated)?;
        if rest.len() < MIN_HEADER_SIZE {
            return Err(truncated());
        }

        let flags = RecordFlags::new(rest[0]);
        let type_len = rest[1];
        let mut cursor = 2;

        let payload_len = if flags.is_short_record() {
            let len = rest[cursor] as u32;
            cursor += 1;
            len
        } else {
            let field = rest.get(cursor..cursor + 4).ok_or_else(truncated)?;
            cursor += 4;
            u32::from_be_bytes([field[0], field[1], field[2], field[3]])
        };

        let id_len = if flags.has_id_length() {
            let len = *rest.get(cursor).ok_or_else(truncated)?;
            cursor += 1;
            len
        } else {
            0
        };

        let header = RecordHeader {
            flags,
            type_len,
            payload_len,
            id_len,
        };
        debug_assert_eq!(header.header_len(), cursor);

        Ok(header)
    }

    /// Serialize header into a buffer
    pub fn serialize<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.flags.0);
        buf.put_u8(self.type_len);

        if self.flags.is_short_record() {
            buf.put_u8(self.payload_len as u8);
        } else {
            buf.put_u32(self.payload_len);
        }

        if self.flags.has_id_length() {
            buf.put_u8(self.id_len);
        }
    }

    /// Serialize header to a new Vec
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.header_len());
        self.serialize(&mut buf);
        buf
    }
}
