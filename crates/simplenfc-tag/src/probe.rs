//! Tag capability probing
//!
//! NDEF access is tried before NDEF-formatable access. A tag exposing
//! both is treated as structured so existing content is never formatted
//! away.

use simplenfc_core::TransportError;

use crate::{FormatableTech, NdefTech, SessionGuard, Tag};

/// What a tag can do for a write
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagCapability {
    /// Already holds NDEF data
    Structured { max_size: usize, writable: bool },
    /// Blank, can be formatted with content
    Formattable,
    Unsupported,
}

/// Probe result holding the connected session, if any
pub enum ProbedTag {
    Structured {
        session: SessionGuard<dyn NdefTech>,
        max_size: usize,
        writable: bool,
    },
    Formattable {
        session: SessionGuard<dyn FormatableTech>,
    },
    Unsupported,
}

impl ProbedTag {
    pub fn capability(&self) -> TagCapability {
        match self {
            ProbedTag::Structured {
                max_size, writable, ..
            } => TagCapability::Structured {
                max_size: *max_size,
                writable: *writable,
            },
            ProbedTag::Formattable { .. } => TagCapability::Formattable,
            ProbedTag::Unsupported => TagCapability::Unsupported,
        }
    }
}

impl std::fmt::Debug for ProbedTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProbedTag({:?})", self.capability())
    }
}

/// Classifies a tag for the write path
pub trait CapabilityProbe {
    /// Connect to the preferred technology of `tag`
    ///
    /// A connect failure on the selected technology is a transport error,
    /// not a reason to fall back to the next one.
    fn probe<T: Tag + ?Sized>(&self, tag: &T) -> Result<ProbedTag, TransportError>;
}

/// Default probe: NDEF first, then NDEF-formatable
#[derive(Clone, Copy, Debug, Default)]
pub struct TagCapabilityProbe;

impl CapabilityProbe for TagCapabilityProbe {
    fn probe<T: Tag + ?Sized>(&self, tag: &T) -> Result<ProbedTag, TransportError> {
        if let Some(ndef) = tag.ndef() {
            let session = SessionGuard::connect(ndef)?;
            let max_size = session.max_size();
            let writable = session.is_writable();
            tracing::debug!(
                "tag {} is NDEF: max_size={} writable={}",
                hex_id(tag.id()),
                max_size,
                writable
            );
            return Ok(ProbedTag::Structured {
                session,
                max_size,
                writable,
            });
        }

        if let Some(formatable) = tag.formatable() {
            let session = SessionGuard::connect(formatable)?;
            tracing::debug!("tag {} is NDEF-formatable", hex_id(tag.id()));
            return Ok(ProbedTag::Formattable { session });
        }

        tracing::debug!("tag {} exposes no NDEF technology", hex_id(tag.id()));
        Ok(ProbedTag::Unsupported)
    }
}

pub(crate) fn hex_id(id: &[u8]) -> String {
    id.iter().map(|b| format!("{:02x}", b)).collect()
}
