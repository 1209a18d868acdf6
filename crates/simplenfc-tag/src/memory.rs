//! In-memory emulated tag
//!
//! Behaves like a physical tag: one technology connected at a time,
//! capacity and write protection enforced by the "hardware", and a
//! formatted blank tag turns into an NDEF tag. Failures can be injected
//! and every call is counted, which makes it the test double for the
//! whole stack.

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use simplenfc_core::TransportError;

use crate::{FormatableTech, NdefTech, Tag, TagTechnology};

const DEFAULT_UID: [u8; 7] = [0x04, 0x5A, 0x11, 0x2B, 0x3C, 0x80, 0x00];

/// Call counters of an emulated tag
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryTagStats {
    pub ndef_lookups: usize,
    pub formatable_lookups: usize,
    pub connects: usize,
    pub closes: usize,
    pub writes: usize,
    pub formats: usize,
}

#[derive(Clone, Copy, Debug)]
struct NdefArea {
    max_size: usize,
    writable: bool,
}

#[derive(Debug, Default)]
struct TagState {
    ndef: Option<NdefArea>,
    blank_capacity: Option<usize>,
    content: Option<Bytes>,
    connected: bool,
    connect_failure: Option<String>,
    io_failure: Option<String>,
    stats: MemoryTagStats,
}

/// Emulated tag; clones share the same state
#[derive(Clone, Debug)]
pub struct MemoryTag {
    uid: Vec<u8>,
    state: Arc<Mutex<TagState>>,
}

impl MemoryTag {
    fn with_state(state: TagState) -> Self {
        MemoryTag {
            uid: DEFAULT_UID.to_vec(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// NDEF tag with the given capacity
    pub fn ndef(max_size: usize, writable: bool) -> Self {
        Self::with_state(TagState {
            ndef: Some(NdefArea { max_size, writable }),
            ..Default::default()
        })
    }

    /// Blank tag that can be formatted
    pub fn formatable(capacity: usize) -> Self {
        Self::with_state(TagState {
            blank_capacity: Some(capacity),
            ..Default::default()
        })
    }

    /// Tag exposing both NDEF and formatable access
    pub fn dual(max_size: usize) -> Self {
        Self::with_state(TagState {
            ndef: Some(NdefArea {
                max_size,
                writable: true,
            }),
            blank_capacity: Some(max_size),
            ..Default::default()
        })
    }

    /// Tag with no NDEF support at all
    pub fn unsupported() -> Self {
        Self::with_state(TagState::default())
    }

    pub fn with_uid(mut self, uid: impl Into<Vec<u8>>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Preload a record set
    pub fn with_content(self, raw: impl Into<Bytes>) -> Self {
        self.state.lock().content = Some(raw.into());
        self
    }

    /// Every connect fails with `detail`
    pub fn with_connect_failure(self, detail: &str) -> Self {
        self.state.lock().connect_failure = Some(detail.to_string());
        self
    }

    /// Every write or format fails with `detail`
    pub fn with_io_failure(self, detail: &str) -> Self {
        self.state.lock().io_failure = Some(detail.to_string());
        self
    }

    /// Current record set stored on the tag
    pub fn content(&self) -> Option<Bytes> {
        self.state.lock().content.clone()
    }

    /// Is any technology currently connected?
    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    pub fn stats(&self) -> MemoryTagStats {
        self.state.lock().stats
    }
}

impl Tag for MemoryTag {
    fn id(&self) -> &[u8] {
        &self.uid
    }

    fn ndef(&self) -> Option<Box<dyn NdefTech>> {
        let mut state = self.state.lock();
        state.stats.ndef_lookups += 1;
        state.ndef?;
        Some(Box::new(MemoryTech::new(&self.state)))
    }

    fn formatable(&self) -> Option<Box<dyn FormatableTech>> {
        let mut state = self.state.lock();
        state.stats.formatable_lookups += 1;
        state.blank_capacity?;
        Some(Box::new(MemoryTech::new(&self.state)))
    }
}

/// Technology handle onto a `MemoryTag`
struct MemoryTech {
    state: Arc<Mutex<TagState>>,
    connected: bool,
}

impl MemoryTech {
    fn new(state: &Arc<Mutex<TagState>>) -> Self {
        MemoryTech {
            state: Arc::clone(state),
            connected: false,
        }
    }

    fn ensure_ready(&self, state: &TagState) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::new("technology not connected"));
        }
        if let Some(detail) = &state.io_failure {
            return Err(TransportError::new(detail.clone()));
        }
        Ok(())
    }
}

impl TagTechnology for MemoryTech {
    fn connect(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.stats.connects += 1;

        if let Some(detail) = &state.connect_failure {
            return Err(TransportError::new(detail.clone()));
        }
        if state.connected {
            return Err(TransportError::new("another technology is connected"));
        }

        state.connected = true;
        self.connected = true;
        Ok(())
    }

    fn close(&mut self) {
        let mut state = self.state.lock();
        state.stats.closes += 1;

        if self.connected {
            state.connected = false;
            self.connected = false;
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

impl NdefTech for MemoryTech {
    fn is_writable(&self) -> bool {
        self.state.lock().ndef.is_some_and(|area| area.writable)
    }

    fn max_size(&self) -> usize {
        self.state.lock().ndef.map_or(0, |area| area.max_size)
    }

    fn write_message(&mut self, raw: &[u8]) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        self.ensure_ready(&state)?;

        let area = state
            .ndef
            .ok_or_else(|| TransportError::new("tag is not NDEF"))?;
        if !area.writable {
            return Err(TransportError::new("tag is read-only"));
        }
        if raw.len() > area.max_size {
            return Err(TransportError::new("record set exceeds tag memory"));
        }

        state.content = Some(Bytes::copy_from_slice(raw));
        state.stats.writes += 1;
        Ok(())
    }
}

impl FormatableTech for MemoryTech {
    fn format(&mut self, raw: &[u8]) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        self.ensure_ready(&state)?;

        let capacity = state
            .blank_capacity
            .ok_or_else(|| TransportError::new("tag is not formatable"))?;
        if raw.len() > capacity {
            return Err(TransportError::new("record set exceeds tag memory"));
        }

        state.ndef = Some(NdefArea {
            max_size: capacity,
            writable: true,
        });
        state.blank_capacity = None;
        state.content = Some(Bytes::copy_from_slice(raw));
        state.stats.formats += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_connection() {
        let tag = MemoryTag::dual(64);
        let mut ndef = tag.ndef().unwrap();
        let mut formatable = tag.formatable().unwrap();

        ndef.connect().unwrap();
        assert!(formatable.connect().is_err());

        ndef.close();
        assert!(!tag.is_connected());
        formatable.connect().unwrap();
        assert!(tag.is_connected());
    }

    #[test]
    fn test_write_requires_connection() {
        let tag = MemoryTag::ndef(64, true);
        let mut ndef = tag.ndef().unwrap();
        assert!(ndef.write_message(&[0xD0, 0x00, 0x00]).is_err());

        ndef.connect().unwrap();
        ndef.write_message(&[0xD0, 0x00, 0x00]).unwrap();
        assert_eq!(tag.content().as_deref(), Some(&[0xD0, 0x00, 0x00][..]));
        assert_eq!(tag.stats().writes, 1);
    }

    #[test]
    fn test_format_turns_blank_into_ndef() {
        let tag = MemoryTag::formatable(32);
        assert!(tag.ndef().is_none());

        let mut formatable = tag.formatable().unwrap();
        formatable.connect().unwrap();
        formatable.format(&[0xD0, 0x00, 0x00]).unwrap();
        formatable.close();

        let ndef = tag.ndef().unwrap();
        assert_eq!(ndef.max_size(), 32);
        assert!(ndef.is_writable());
        assert!(tag.formatable().is_none());
    }

    #[test]
    fn test_hardware_enforces_capacity() {
        let tag = MemoryTag::ndef(2, true);
        let mut ndef = tag.ndef().unwrap();
        ndef.connect().unwrap();
        assert!(ndef.write_message(&[0xD0, 0x00, 0x00]).is_err());
        assert!(tag.content().is_none());
    }

    #[test]
    fn test_uid() {
        let tag = MemoryTag::unsupported().with_uid(vec![1, 2, 3, 4]);
        assert_eq!(tag.id(), &[1, 2, 3, 4]);
        assert!(tag.ndef().is_none());
        assert!(tag.formatable().is_none());
        assert_eq!(tag.stats().ndef_lookups, 1);
    }
}
