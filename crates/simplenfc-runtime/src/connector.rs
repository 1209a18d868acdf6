//! NFC connector - inbound tag events to router and writer

use std::sync::Arc;

use simplenfc_core::{Message, NfcError, RawRecordSet, TransportError};
use simplenfc_tag::{Radio, Tag, TagWriter, WriteOutcome};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::{ConnectorConfig, ForegroundResult, MessageRouter, ReadDispatch};

/// Kind of platform notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagAction {
    /// A tag entered the field; the event carries its handle
    TagDiscovered,
    /// NDEF record sets were read from a tag or peer
    NdefDiscovered,
}

/// Inbound notification from the platform's tag dispatch
#[derive(Debug)]
pub struct TagEvent<T> {
    pub action: TagAction,
    pub tag: Option<T>,
    pub record_sets: Vec<RawRecordSet>,
}

impl<T> TagEvent<T> {
    pub fn ndef_discovered(record_sets: Vec<RawRecordSet>) -> Self {
        TagEvent {
            action: TagAction::NdefDiscovered,
            tag: None,
            record_sets,
        }
    }

    pub fn tag_discovered(tag: T) -> Self {
        TagEvent {
            action: TagAction::TagDiscovered,
            tag: Some(tag),
            record_sets: Vec::new(),
        }
    }
}

/// Item published on the result channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectorResult {
    Foreground(ForegroundResult),
    Write(WriteOutcome),
}

/// Result channel receiver
pub type ResultReceiver = mpsc::Receiver<ConnectorResult>;

/// Dispatches tag events to the router and the writer
pub struct NfcConnector<R> {
    router: Arc<MessageRouter>,
    writer: Arc<TagWriter<R>>,
    results: mpsc::Sender<ConnectorResult>,
}

impl<R> NfcConnector<R>
where
    R: Radio + Send + Sync + 'static,
{
    pub fn new(radio: R) -> (Self, ResultReceiver) {
        Self::with_config(radio, ConnectorConfig::default())
    }

    pub fn with_config(radio: R, config: ConnectorConfig) -> (Self, ResultReceiver) {
        let (tx, rx) = mpsc::channel(config.result_capacity.max(1));
        let writer = TagWriter::new(radio).log_record_contents(config.log_record_contents);

        let connector = NfcConnector {
            router: Arc::new(MessageRouter::new()),
            writer: Arc::new(writer),
            results: tx,
        };
        (connector, rx)
    }

    pub fn router(&self) -> &MessageRouter {
        &self.router
    }

    /// Shared handle to the router, e.g. for handlers that re-register
    pub fn router_handle(&self) -> Arc<MessageRouter> {
        Arc::clone(&self.router)
    }

    /// Handler-dispatch entry point
    pub fn on_read<T>(&self, event: &TagEvent<T>) -> ReadDispatch {
        if event.action != TagAction::NdefDiscovered {
            return ReadDispatch::default();
        }
        self.router.handle_read_event(&event.record_sets)
    }

    /// Foreground entry point; the result is also published
    pub async fn on_foreground<T>(&self, event: TagEvent<T>) -> Option<ForegroundResult> {
        if event.action != TagAction::NdefDiscovered || event.record_sets.is_empty() {
            return None;
        }

        let result = self.router.handle_foreground_event(event.record_sets);
        self.publish(ConnectorResult::Foreground(result.clone()));
        Some(result)
    }

    /// Write entry point; needs a tag handle in the event
    pub async fn on_write<T>(&self, event: TagEvent<T>, message: Message) -> Option<WriteOutcome>
    where
        T: Tag + 'static,
    {
        let tag = event.tag?;
        let writer = Arc::clone(&self.writer);
        let outcome = run_blocking(move || writer.write(&tag, &message)).await;
        self.publish(ConnectorResult::Write(outcome.clone()));
        Some(outcome)
    }

    /// Write entry point for a request carrying an encoded message
    pub async fn on_write_raw<T>(
        &self,
        event: TagEvent<T>,
        raw: RawRecordSet,
    ) -> Option<WriteOutcome>
    where
        T: Tag + 'static,
    {
        let tag = event.tag?;
        let writer = Arc::clone(&self.writer);
        let outcome = run_blocking(move || writer.write_raw(&tag, &raw)).await;
        self.publish(ConnectorResult::Write(outcome.clone()));
        Some(outcome)
    }

    /// Never waits for the receiver; the caller always gets the result back
    fn publish(&self, result: ConnectorResult) {
        match self.results.try_send(result) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!("result channel full, result dropped");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("result channel closed, result dropped");
            }
        }
    }
}

/// Run blocking tag I/O off the event task
///
/// A panic in the writer is re-raised here; it is never turned into an
/// outcome.
async fn run_blocking<F>(f: F) -> WriteOutcome
where
    F: FnOnce() -> WriteOutcome + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => WriteOutcome::Failure(NfcError::TransportFailure(TransportError::new(format!(
            "write task did not complete: {}",
            e
        )))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::RecordMatcher;
    use simplenfc_core::{ErrorKind, Record};
    use simplenfc_tag::MemoryTag;
    use simplenfc_wire::{decode, encode_raw};

    fn text_message(body: &str) -> Message {
        Message::single(Record::text("en", body).unwrap())
    }

    #[tokio::test]
    async fn test_write_publishes_outcome() {
        let (connector, mut results) = NfcConnector::new(true);
        let tag = MemoryTag::ndef(137, true);
        let message = text_message("door 17");

        let outcome = connector
            .on_write(TagEvent::tag_discovered(tag.clone()), message.clone())
            .await;

        assert_eq!(outcome, Some(WriteOutcome::Success));
        assert_eq!(
            results.recv().await,
            Some(ConnectorResult::Write(WriteOutcome::Success))
        );
        assert_eq!(decode(&tag.content().unwrap()).unwrap(), message);
        assert!(!tag.is_connected());
    }

    #[tokio::test]
    async fn test_write_without_tag_is_ignored() {
        let (connector, mut results) = NfcConnector::new(true);
        let event: TagEvent<MemoryTag> = TagEvent::ndef_discovered(Vec::new());

        assert_eq!(connector.on_write(event, text_message("x")).await, None);
        assert!(results.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_radio_toggle_observed() {
        let radio = Arc::new(AtomicBool::new(false));
        let (connector, _results) = NfcConnector::new(Arc::clone(&radio));
        let tag = MemoryTag::ndef(137, true);

        let outcome = connector
            .on_write(TagEvent::tag_discovered(tag.clone()), text_message("x"))
            .await
            .unwrap();
        assert_eq!(outcome.kind(), Some(ErrorKind::RadioDisabled));

        radio.store(true, Ordering::Release);
        let outcome = connector
            .on_write(TagEvent::tag_discovered(tag), text_message("x"))
            .await
            .unwrap();
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_write_raw_request() {
        let (connector, _results) = NfcConnector::new(true);
        let tag = MemoryTag::formatable(64);
        let raw = encode_raw(&text_message("fresh"));

        let outcome = connector
            .on_write_raw(TagEvent::tag_discovered(tag.clone()), raw.clone())
            .await;

        assert_eq!(outcome, Some(WriteOutcome::Success));
        assert_eq!(tag.content(), Some(raw.into_bytes()));
    }

    #[tokio::test]
    async fn test_foreground_publishes_result() {
        let (connector, mut results) = NfcConnector::new(true);
        let event: TagEvent<MemoryTag> =
            TagEvent::ndef_discovered(vec![encode_raw(&text_message("peer"))]);

        let result = connector.on_foreground(event).await.unwrap();

        assert!(result.is_decoded());
        assert_eq!(
            results.recv().await,
            Some(ConnectorResult::Foreground(result))
        );
    }

    #[tokio::test]
    async fn test_foreground_ignores_tag_discovered() {
        let (connector, _results) = NfcConnector::new(true);
        let event = TagEvent::tag_discovered(MemoryTag::ndef(16, true));
        assert_eq!(connector.on_foreground(event).await, None);
    }

    #[test]
    fn test_read_routes_to_handler() {
        let (connector, _results) = NfcConnector::new(true);
        let hits = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&hits);
        connector.router().register(RecordMatcher::any(), move |_: &Message| {
            inner.fetch_add(1, Ordering::SeqCst);
        });

        let event: TagEvent<MemoryTag> =
            TagEvent::ndef_discovered(vec![encode_raw(&text_message("read"))]);
        assert!(connector.on_read(&event).matched);

        let event = TagEvent::tag_discovered(MemoryTag::ndef(16, true));
        assert!(!connector.on_read(&event).matched);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_full_channel_does_not_block_write() {
        let config = ConnectorConfig {
            result_capacity: 1,
            ..Default::default()
        };
        let (connector, mut results) = NfcConnector::with_config(true, config);

        for i in 0..3 {
            let tag = MemoryTag::ndef(137, true);
            let outcome = tokio::time::timeout(
                Duration::from_secs(2),
                connector.on_write(TagEvent::tag_discovered(tag.clone()), text_message("x")),
            )
            .await
            .unwrap_or_else(|_| panic!("write {} did not return", i));

            assert_eq!(outcome, Some(WriteOutcome::Success));
            assert!(tag.content().is_some());
        }

        let event: TagEvent<MemoryTag> =
            TagEvent::ndef_discovered(vec![encode_raw(&text_message("peer"))]);
        let result = tokio::time::timeout(Duration::from_secs(2), connector.on_foreground(event))
            .await
            .unwrap();
        assert!(result.unwrap().is_decoded());

        // only the first result fit
        assert_eq!(
            results.recv().await,
            Some(ConnectorResult::Write(WriteOutcome::Success))
        );
        assert!(results.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_channel_does_not_fail_write() {
        let (connector, results) = NfcConnector::new(true);
        drop(results);

        let outcome = connector
            .on_write(
                TagEvent::tag_discovered(MemoryTag::ndef(137, true)),
                text_message("x"),
            )
            .await;
        assert_eq!(outcome, Some(WriteOutcome::Success));
    }
}
