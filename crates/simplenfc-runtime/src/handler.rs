//! Message handlers and their registration
//!
//! A registration pairs a `RecordMatcher` with a handler. Matchers look
//! at the first record of a message, which carries the message type.
//! Lookup walks registrations in insertion order; the first match wins.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use simplenfc_core::{Message, Record, Tnf};

/// Record id pattern
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdPattern {
    Exact(Bytes),
    Prefix(Bytes),
}

impl IdPattern {
    pub fn matches(&self, id: &[u8]) -> bool {
        match self {
            IdPattern::Exact(expected) => id == expected.as_ref(),
            IdPattern::Prefix(prefix) => id.starts_with(prefix),
        }
    }
}

/// Predicate over the first record of a message
///
/// Unset fields match anything, so `RecordMatcher::any()` matches every
/// message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordMatcher {
    tnf: Option<Tnf>,
    record_type: Option<Bytes>,
    id: Option<IdPattern>,
}

impl RecordMatcher {
    pub fn any() -> Self {
        RecordMatcher::default()
    }

    /// Well-known type such as `RTD_TEXT`
    pub fn well_known(rtd: &'static [u8]) -> Self {
        RecordMatcher::any().tnf(Tnf::WellKnown).record_type(rtd)
    }

    pub fn mime(mime_type: &str) -> Self {
        RecordMatcher::any()
            .tnf(Tnf::MimeMedia)
            .record_type(mime_type.trim().to_ascii_lowercase().into_bytes())
    }

    pub fn external(domain_type: &str) -> Self {
        RecordMatcher::any()
            .tnf(Tnf::External)
            .record_type(domain_type.trim().to_ascii_lowercase().into_bytes())
    }

    pub fn tnf(mut self, tnf: Tnf) -> Self {
        self.tnf = Some(tnf);
        self
    }

    pub fn record_type(mut self, record_type: impl Into<Bytes>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    pub fn id(mut self, id: impl Into<Bytes>) -> Self {
        self.id = Some(IdPattern::Exact(id.into()));
        self
    }

    pub fn id_prefix(mut self, prefix: impl Into<Bytes>) -> Self {
        self.id = Some(IdPattern::Prefix(prefix.into()));
        self
    }

    pub fn matches_record(&self, record: &Record) -> bool {
        self.tnf.map_or(true, |tnf| record.tnf() == tnf)
            && self
                .record_type
                .as_ref()
                .map_or(true, |t| record.record_type() == t.as_ref())
            && self.id.as_ref().map_or(true, |p| p.matches(record.id()))
    }

    pub fn matches(&self, message: &Message) -> bool {
        self.matches_record(message.first())
    }
}

/// Receives decoded messages
pub trait MessageHandler: Send + Sync {
    fn handle(&self, message: &Message);
}

impl<F> MessageHandler for F
where
    F: Fn(&Message) + Send + Sync,
{
    fn handle(&self, message: &Message) {
        self(message)
    }
}

/// Registration handle, used to unregister
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{}", self.0)
    }
}

struct Registration {
    id: HandlerId,
    matcher: RecordMatcher,
    handler: Arc<dyn MessageHandler>,
}

/// Ordered handler registrations
#[derive(Default)]
pub struct HandlerRegistry {
    entries: Vec<Registration>,
    next_id: u64,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        HandlerRegistry::default()
    }

    pub fn register<H>(&mut self, matcher: RecordMatcher, handler: H) -> HandlerId
    where
        H: MessageHandler + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Registration {
            id,
            matcher,
            handler: Arc::new(handler),
        });
        id
    }

    /// Returns false if `id` was not registered
    pub fn unregister(&mut self, id: HandlerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| r.id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First registered handler whose matcher accepts `message`
    pub fn find(&self, message: &Message) -> Option<(HandlerId, Arc<dyn MessageHandler>)> {
        self.entries
            .iter()
            .find(|r| r.matcher.matches(message))
            .map(|r| (r.id, Arc::clone(&r.handler)))
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|r| (r.id, &r.matcher)))
            .finish()
    }
}
