//! Record set codec
//!
//! `decode` turns a raw record set into a `Message`, reassembling chunked
//! records. `encode` never chunks, so `decode(encode(m)) == m` holds for
//! every constructible message.

use bytes::{BufMut, Bytes, BytesMut};
use simplenfc_core::{DecodeError, Message, RawRecordSet, Record, Tnf, MAX_PAYLOAD_SIZE};

use crate::RecordHeader;

/// Chunked record being reassembled
struct PendingChunk {
    start: usize,
    tnf: Tnf,
    record_type: Bytes,
    id: Bytes,
    payload: BytesMut,
}

/// Encode a message into a record set
pub fn encode(message: &Message) -> Bytes {
    let mut buf = BytesMut::with_capacity(message.byte_len());
    let last = message.len() - 1;

    for (i, record) in message.records().iter().enumerate() {
        RecordHeader::for_record(record, i == 0, i == last).serialize(&mut buf);
        buf.put_slice(record.record_type());
        buf.put_slice(record.id());
        buf.put_slice(record.payload());
    }

    debug_assert_eq!(buf.len(), message.byte_len());
    buf.freeze()
}

/// Encode a message into an owned raw record set
pub fn encode_raw(message: &Message) -> RawRecordSet {
    RawRecordSet::from(encode(message))
}

/// Decode a record set from a byte slice
pub fn decode(buf: &[u8]) -> Result<Message, DecodeError> {
    decode_bytes(&Bytes::copy_from_slice(buf))
}

/// Decode a raw record set; fields share the raw buffer
pub fn decode_raw(raw: &RawRecordSet) -> Result<Message, DecodeError> {
    decode_bytes(&raw.clone().into_bytes())
}

/// Decode a record set without copying unchunked fields
pub fn decode_bytes(buf: &Bytes) -> Result<Message, DecodeError> {
    if buf.is_empty() {
        return Err(DecodeError::malformed(0, "empty record set"));
    }

    let mut records = Vec::new();
    let mut pending: Option<PendingChunk> = None;
    let mut offset = 0;

    loop {
        if offset >= buf.len() {
            return Err(DecodeError::malformed(offset, "record set ended before ME"));
        }

        let start = offset;
        let header = RecordHeader::parse(buf, start)?;
        let flags = header.flags;
        let tnf = header.tnf();

        if start == 0 && !flags.is_message_begin() {
            return Err(DecodeError::malformed(start, "first record lacks MB"));
        }
        if start != 0 && flags.is_message_begin() {
            return Err(DecodeError::malformed(start, "MB set on a later record"));
        }
        if tnf == Tnf::Reserved {
            return Err(DecodeError::malformed(start, "reserved TNF"));
        }
        if header.payload_len as usize > MAX_PAYLOAD_SIZE {
            return Err(DecodeError::malformed(start, "payload length exceeds limit"));
        }

        offset += header.header_len();
        if buf.len() - offset < header.body_len() {
            return Err(DecodeError::malformed(offset, "truncated record body"));
        }

        let record_type = buf.slice(offset..offset + header.type_len as usize);
        offset += header.type_len as usize;
        let id = buf.slice(offset..offset + header.id_len as usize);
        offset += header.id_len as usize;
        let payload = buf.slice(offset..offset + header.payload_len as usize);
        offset += header.payload_len as usize;

        match pending.as_mut() {
            None => {
                if tnf == Tnf::Unchanged {
                    return Err(DecodeError::malformed(
                        start,
                        "TNF Unchanged outside a chunked record",
                    ));
                }

                if flags.is_chunk() {
                    pending = Some(PendingChunk {
                        start,
                        tnf,
                        record_type,
                        id,
                        payload: BytesMut::from(payload.as_ref()),
                    });
                } else {
                    records.push(build_record(start, tnf, record_type, id, payload)?);
                }
            }
            Some(chunk) => {
                if tnf != Tnf::Unchanged {
                    return Err(DecodeError::malformed(
                        start,
                        "continuation chunk must use TNF Unchanged",
                    ));
                }
                if header.type_len != 0 {
                    return Err(DecodeError::malformed(start, "continuation chunk carries a type"));
                }
                if flags.has_id_length() {
                    return Err(DecodeError::malformed(start, "continuation chunk carries an id"));
                }
                if chunk.payload.len() + payload.len() > MAX_PAYLOAD_SIZE {
                    return Err(DecodeError::malformed(start, "chunked payload exceeds limit"));
                }

                chunk.payload.put_slice(&payload);

                if !flags.is_chunk() {
                    if let Some(done) = pending.take() {
                        records.push(build_record(
                            done.start,
                            done.tnf,
                            done.record_type,
                            done.id,
                            done.payload.freeze(),
                        )?);
                    }
                }
            }
        }

        if flags.is_message_end() {
            if pending.is_some() {
                return Err(DecodeError::malformed(start, "ME set inside a chunked record"));
            }
            if offset != buf.len() {
                return Err(DecodeError::malformed(offset, "trailing bytes after ME"));
            }
            break;
        }
    }

    Message::new(records).map_err(|e| DecodeError::malformed(0, e.to_string()))
}

fn build_record(
    start: usize,
    tnf: Tnf,
    record_type: Bytes,
    id: Bytes,
    payload: Bytes,
) -> Result<Record, DecodeError> {
    Record::new(tnf, record_type, id, payload)
        .map_err(|e| DecodeError::malformed(start, e.to_string()))
}
