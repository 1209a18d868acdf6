//! Write scenarios over emulated tags
//!
//! Every scenario records whether the tag was left connected, so the
//! release guarantee is checked on every outcome, not just success.

use bytes::Bytes;
use simplenfc_core::Message;
use simplenfc_tag::{MemoryTag, MemoryTagStats, TagWriter, WriteOutcome};

/// What happened to one tag during one write
#[derive(Clone, Debug)]
pub struct WriteReport {
    pub outcome: WriteOutcome,
    /// Tag was not left connected
    pub released: bool,
    pub stats: MemoryTagStats,
    pub content: Option<Bytes>,
}

/// Write `message` to `tag` with the radio in the given state
pub fn run_write(tag: &MemoryTag, radio_enabled: bool, message: &Message) -> WriteReport {
    let outcome = TagWriter::new(radio_enabled).write(tag, message);
    WriteReport {
        outcome,
        released: !tag.is_connected(),
        stats: tag.stats(),
        content: tag.content(),
    }
}

/// Standard tag line-up for a message
///
/// Covers roomy, exact-fit, one-byte-short, read-only, blank,
/// unsupported, unreachable and flaky tags.
pub fn standard_tags(message: &Message) -> Vec<(&'static str, MemoryTag)> {
    let size = message.byte_len();
    vec![
        ("roomy", MemoryTag::ndef(size * 2, true)),
        ("exact", MemoryTag::ndef(size, true)),
        ("short", MemoryTag::ndef(size - 1, true)),
        ("read-only", MemoryTag::ndef(size * 2, false)),
        ("blank", MemoryTag::formatable(size * 2)),
        ("dual", MemoryTag::dual(size * 2)),
        ("unsupported", MemoryTag::unsupported()),
        (
            "unreachable",
            MemoryTag::ndef(size * 2, true).with_connect_failure("no answer from tag"),
        ),
        ("flaky", MemoryTag::ndef(size * 2, true).with_io_failure("tag lost")),
    ]
}

/// Run `message` against every standard tag
pub fn write_matrix(radio_enabled: bool, message: &Message) -> Vec<(&'static str, WriteReport)> {
    standard_tags(message)
        .into_iter()
        .map(|(name, tag)| (name, run_write(&tag, radio_enabled, message)))
        .collect()
}
