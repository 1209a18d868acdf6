//! Read-side message routing
//!
//! Undecodable input is never an error here: a tag or peer may
//! legitimately carry content we do not understand. Handler dispatch
//! drops such events; foreground mode hands back the raw sets.

use parking_lot::RwLock;
use simplenfc_core::{DecodeError, Message, RawRecordSet};
use simplenfc_wire::decode_raw;

use crate::{HandlerId, HandlerRegistry, MessageHandler, RecordMatcher};

/// Handler dispatch report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadDispatch {
    /// At least one message reached a handler; when false the host should
    /// fall back to its default presentation
    pub matched: bool,
}

/// Foreground batch result
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForegroundResult {
    /// Every record set decoded
    Decoded(Vec<Message>),
    /// At least one set failed; all original sets, untouched
    RawFallback(Vec<RawRecordSet>),
}

impl ForegroundResult {
    pub fn is_decoded(&self) -> bool {
        matches!(self, ForegroundResult::Decoded(_))
    }
}

/// Routes decoded messages to registered handlers
#[derive(Debug, Default)]
pub struct MessageRouter {
    registry: RwLock<HandlerRegistry>,
}

impl MessageRouter {
    pub fn new() -> Self {
        MessageRouter::default()
    }

    pub fn register<H>(&self, matcher: RecordMatcher, handler: H) -> HandlerId
    where
        H: MessageHandler + 'static,
    {
        self.registry.write().register(matcher, handler)
    }

    pub fn unregister(&self, id: HandlerId) -> bool {
        self.registry.write().unregister(id)
    }

    /// Handler-dispatch mode
    ///
    /// All sets are decoded first; one failure drops the whole event.
    /// Each message goes to its first matching handler, invoked
    /// synchronously and outside the registry lock.
    pub fn handle_read_event(&self, record_sets: &[RawRecordSet]) -> ReadDispatch {
        let messages = match decode_all(record_sets) {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("dropping read event: {}", e);
                return ReadDispatch { matched: false };
            }
        };

        let mut matched = false;
        for message in &messages {
            let found = self.registry.read().find(message);
            match found {
                Some((id, handler)) => {
                    tracing::debug!("message with {} record(s) handled by {}", message.len(), id);
                    handler.handle(message);
                    matched = true;
                }
                None => {
                    tracing::debug!("no handler for message with {} record(s)", message.len());
                }
            }
        }

        ReadDispatch { matched }
    }

    /// Foreground mode: all decoded, or all raw
    pub fn handle_foreground_event(&self, record_sets: Vec<RawRecordSet>) -> ForegroundResult {
        match decode_all(&record_sets) {
            Ok(messages) => ForegroundResult::Decoded(messages),
            Err(e) => {
                tracing::warn!("foreground batch falls back to raw record sets: {}", e);
                ForegroundResult::RawFallback(record_sets)
            }
        }
    }
}

fn decode_all(record_sets: &[RawRecordSet]) -> Result<Vec<Message>, DecodeError> {
    record_sets.iter().map(decode_raw).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use simplenfc_core::{Record, RTD_TEXT, RTD_URI};
    use simplenfc_wire::encode_raw;

    fn text_set(body: &str) -> RawRecordSet {
        encode_raw(&Message::single(Record::text("en", body).unwrap()))
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&Message) + Send + Sync) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (count, move |_: &Message| {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_first_registered_handler_wins() {
        let router = MessageRouter::new();
        let (first, first_handler) = counter();
        let (second, second_handler) = counter();
        router.register(RecordMatcher::well_known(RTD_TEXT), first_handler);
        router.register(RecordMatcher::any(), second_handler);

        let report = router.handle_read_event(&[text_set("hello")]);

        assert!(report.matched);
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_handler_matches() {
        let router = MessageRouter::new();
        let (count, handler) = counter();
        router.register(RecordMatcher::well_known(RTD_URI), handler);

        let report = router.handle_read_event(&[text_set("hello")]);

        assert!(!report.matched);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_undecodable_event_dropped() {
        let router = MessageRouter::new();
        let (count, handler) = counter();
        router.register(RecordMatcher::any(), handler);

        let broken = RawRecordSet::from(vec![0x91, 0x01]);
        let report = router.handle_read_event(&[text_set("ok"), broken]);

        assert_eq!(report, ReadDispatch { matched: false });
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_each_message_dispatched() {
        let router = MessageRouter::new();
        let (count, handler) = counter();
        router.register(RecordMatcher::any(), handler);

        let report = router.handle_read_event(&[text_set("a"), text_set("b")]);

        assert!(report.matched);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handler_may_register_during_dispatch() {
        let router = Arc::new(MessageRouter::new());
        let inner = Arc::clone(&router);
        router.register(RecordMatcher::any(), move |_: &Message| {
            inner.register(RecordMatcher::any(), |_: &Message| {});
        });

        assert!(router.handle_read_event(&[text_set("x")]).matched);
    }

    #[test]
    fn test_foreground_decoded() {
        let router = MessageRouter::new();
        let result = router.handle_foreground_event(vec![text_set("a"), text_set("b")]);

        match result {
            ForegroundResult::Decoded(messages) => {
                assert_eq!(messages.len(), 2);
                assert_eq!(messages[1].first().as_text().unwrap().1, "b");
            }
            other => panic!("expected decoded batch, got {:?}", other),
        }
    }

    #[test]
    fn test_foreground_all_or_nothing() {
        let router = MessageRouter::new();
        let sets = vec![
            text_set("a"),
            RawRecordSet::from(vec![0xD7, 0x00, 0x00]),
            text_set("c"),
        ];

        let result = router.handle_foreground_event(sets.clone());

        assert_eq!(result, ForegroundResult::RawFallback(sets));
        assert!(!result.is_decoded());
    }
}
