#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use simplenfc_core::MAX_PAYLOAD_SIZE;
use simplenfc_wire::{decode, decode_bytes, encode};

fuzz_target!(|data: &[u8]| {
    let Ok(message) = decode(data) else {
        return;
    };

    // zero-copy decoding must agree with the copying path
    let shared = decode_bytes(&Bytes::copy_from_slice(data)).ok();
    assert_eq!(shared.as_ref(), Some(&message));

    for record in message.records() {
        assert!(record.payload().len() <= MAX_PAYLOAD_SIZE);
    }

    // re-encoding normalises chunks and length forms but never the content
    let again = decode(&encode(&message)).ok();
    assert_eq!(again, Some(message));
});
