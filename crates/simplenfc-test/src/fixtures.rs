//! Fixture builders

use simplenfc_core::{Message, RawRecordSet, Record, Tnf};
use simplenfc_wire::encode_raw;

/// Single text record message
pub fn text_message(body: &str) -> Option<Message> {
    Record::text("en", body).ok().map(Message::single)
}

/// Single-record message whose encoding is exactly `size` bytes
///
/// Uses an Unknown-TNF record, padding with an id where the short and
/// long payload forms leave a gap. `None` below the 3-byte minimum.
pub fn message_of_size(size: usize) -> Option<Message> {
    let (id_len, payload_len) = match size {
        0..=2 => return None,
        3..=258 => (0, size - 3),
        259..=261 => {
            let payload_len = 255usize.min(size - 5);
            (size - 4 - payload_len, payload_len)
        }
        _ => (0, size - 6),
    };

    let record = Record::new(
        Tnf::Unknown,
        Vec::<u8>::new(),
        vec![b'i'; id_len],
        vec![0xA5u8; payload_len],
    )
    .ok()?;
    let message = Message::single(record);
    debug_assert_eq!(message.byte_len(), size);
    Some(message)
}

/// Encoded text message
pub fn text_set(body: &str) -> Option<RawRecordSet> {
    text_message(body).map(|m| encode_raw(&m))
}

/// Record set cut inside its payload
pub fn truncated_set() -> RawRecordSet {
    RawRecordSet::from(vec![0xD1, 0x01, 0x08, b'T', 0x02, b'e', b'n'])
}

/// Record set using the reserved TNF
pub fn reserved_tnf_set() -> RawRecordSet {
    RawRecordSet::from(vec![0xD7, 0x00, 0x00])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use simplenfc_wire::{decode, encode};

    #[test]
    fn test_size_gaps_covered() {
        for size in 3..600 {
            let message = message_of_size(size).unwrap();
            assert_eq!(message.byte_len(), size, "size {}", size);
            assert_eq!(encode(&message).len(), size, "size {}", size);
        }
        assert!(message_of_size(2).is_none());
    }

    #[test]
    fn test_broken_sets_fail() {
        assert!(decode(truncated_set().as_bytes()).is_err());
        assert!(decode(reserved_tnf_set().as_bytes()).is_err());
    }

    proptest! {
        #[test]
        fn prop_sized_message_roundtrip(size in 3usize..4096) {
            let message = message_of_size(size).unwrap();
            prop_assert_eq!(decode(&encode(&message)).unwrap(), message);
        }
    }
}
