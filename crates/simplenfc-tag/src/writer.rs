//! Tag write state machine
//!
//! One call, one attempt:
//! 1. Radio check (before the tag is touched)
//! 2. Capability probe
//! 3. Structured: writability, then capacity, then write
//!    Formattable: format with content
//!    Unsupported: fail
//! 4. Session released on every path (guard drop)

use simplenfc_core::{ErrorKind, Message, NfcError, NfcResult, RawRecordSet};
use simplenfc_wire::{decode_raw, encode};

use crate::probe::hex_id;
use crate::{CapabilityProbe, ProbedTag, Radio, Tag, TagCapabilityProbe};

/// Result of one write request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Success,
    Failure(NfcError),
}

impl WriteOutcome {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, WriteOutcome::Success)
    }

    pub fn error(&self) -> Option<&NfcError> {
        match self {
            WriteOutcome::Success => None,
            WriteOutcome::Failure(e) => Some(e),
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.error().map(NfcError::kind)
    }

    pub fn into_result(self) -> NfcResult<()> {
        match self {
            WriteOutcome::Success => Ok(()),
            WriteOutcome::Failure(e) => Err(e),
        }
    }
}

impl From<NfcResult<()>> for WriteOutcome {
    fn from(result: NfcResult<()>) -> Self {
        match result {
            Ok(()) => WriteOutcome::Success,
            Err(e) => WriteOutcome::Failure(e),
        }
    }
}

/// Writes messages to tags
pub struct TagWriter<R, P = TagCapabilityProbe> {
    radio: R,
    probe: P,
    log_records: bool,
}

impl<R: Radio> TagWriter<R> {
    pub fn new(radio: R) -> Self {
        Self::with_probe(radio, TagCapabilityProbe)
    }
}

impl<R: Radio, P: CapabilityProbe> TagWriter<R, P> {
    pub fn with_probe(radio: R, probe: P) -> Self {
        TagWriter {
            radio,
            probe,
            log_records: false,
        }
    }

    /// Emit per-record diagnostics after each successful write
    pub fn log_record_contents(mut self, enabled: bool) -> Self {
        self.log_records = enabled;
        self
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Write `message` to `tag`
    pub fn write<T: Tag + ?Sized>(&self, tag: &T, message: &Message) -> WriteOutcome {
        let result = self
            .check_radio()
            .and_then(|()| self.write_message(tag, message));
        self.finish(tag, result)
    }

    /// Write an already encoded record set, decoding it first
    pub fn write_raw<T: Tag + ?Sized>(&self, tag: &T, raw: &RawRecordSet) -> WriteOutcome {
        let result = self.check_radio().and_then(|()| {
            let message = decode_raw(raw)?;
            self.write_message(tag, &message)
        });
        self.finish(tag, result)
    }

    fn check_radio(&self) -> NfcResult<()> {
        if self.radio.is_enabled() {
            Ok(())
        } else {
            Err(NfcError::RadioDisabled)
        }
    }

    fn write_message<T: Tag + ?Sized>(&self, tag: &T, message: &Message) -> NfcResult<()> {
        let raw = encode(message);

        match self.probe.probe(tag)? {
            ProbedTag::Structured {
                mut session,
                max_size,
                writable,
            } => {
                if !writable {
                    return Err(NfcError::ReadOnly);
                }
                if raw.len() > max_size {
                    return Err(NfcError::InsufficientCapacity {
                        required: raw.len(),
                        available: max_size,
                    });
                }
                session.write_message(&raw)?;
            }
            ProbedTag::Formattable { mut session } => {
                session.format(&raw)?;
            }
            ProbedTag::Unsupported => return Err(NfcError::UnsupportedMedium),
        }

        if self.log_records {
            log_records(message);
        }
        Ok(())
    }

    fn finish<T: Tag + ?Sized>(&self, tag: &T, result: NfcResult<()>) -> WriteOutcome {
        match &result {
            Ok(()) => tracing::info!("record set written to tag {}", hex_id(tag.id())),
            Err(e) => tracing::warn!("write to tag {} failed: {}", hex_id(tag.id()), e),
        }
        result.into()
    }
}

fn log_records(message: &Message) {
    for (i, record) in message.records().iter().enumerate() {
        tracing::debug!(
            "[{}] tnf: {:?}, type: {}, id: {}, payloadlength: {}, payload: {}",
            i,
            record.tnf(),
            String::from_utf8_lossy(record.record_type()),
            String::from_utf8_lossy(record.id()),
            record.payload().len(),
            String::from_utf8_lossy(record.payload()),
        );
    }
}
