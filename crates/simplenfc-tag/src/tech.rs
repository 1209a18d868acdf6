//! Tag technology contract
//!
//! A `Tag` is one discovered physical tag. It hands out technology
//! objects; each must be connected before use and closed afterwards.
//! Every call blocks until the tag answers or the transport gives up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use simplenfc_core::TransportError;

/// Connection lifecycle shared by all technologies
pub trait TagTechnology: Send {
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Release the tag; must be safe to call when not connected
    fn close(&mut self);

    fn is_connected(&self) -> bool;
}

/// Access to a tag that already holds NDEF data
pub trait NdefTech: TagTechnology {
    fn is_writable(&self) -> bool;

    /// Largest record set the tag can hold, in bytes
    fn max_size(&self) -> usize;

    fn write_message(&mut self, raw: &[u8]) -> Result<(), TransportError>;
}

/// Access to a blank tag that can be formatted for NDEF
pub trait FormatableTech: TagTechnology {
    /// Format the tag and write the initial record set in one operation
    fn format(&mut self, raw: &[u8]) -> Result<(), TransportError>;
}

/// A discovered tag
pub trait Tag: Send {
    /// Hardware identifier (UID)
    fn id(&self) -> &[u8];

    fn ndef(&self) -> Option<Box<dyn NdefTech>>;

    fn formatable(&self) -> Option<Box<dyn FormatableTech>>;
}

impl<T: Tag + ?Sized> Tag for Box<T> {
    fn id(&self) -> &[u8] {
        (**self).id()
    }

    fn ndef(&self) -> Option<Box<dyn NdefTech>> {
        (**self).ndef()
    }

    fn formatable(&self) -> Option<Box<dyn FormatableTech>> {
        (**self).formatable()
    }
}

/// NFC adapter power state
pub trait Radio {
    fn is_enabled(&self) -> bool;
}

impl Radio for bool {
    fn is_enabled(&self) -> bool {
        *self
    }
}

impl Radio for AtomicBool {
    fn is_enabled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<R: Radio + ?Sized> Radio for Arc<R> {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}

impl<R: Radio + ?Sized> Radio for &R {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}
