//! Scoped tag sessions
//!
//! A `SessionGuard` owns a connected technology and closes it on drop,
//! so every exit path of an operation releases the tag.

use std::ops::{Deref, DerefMut};

use simplenfc_core::TransportError;

use crate::TagTechnology;

/// Connected technology, closed when dropped
pub struct SessionGuard<T: TagTechnology + ?Sized> {
    tech: Box<T>,
}

impl<T: TagTechnology + ?Sized> SessionGuard<T> {
    /// Connect and take ownership of the session
    ///
    /// A failed connect still closes the technology before returning.
    pub fn connect(mut tech: Box<T>) -> Result<Self, TransportError> {
        if let Err(e) = tech.connect() {
            tech.close();
            return Err(e);
        }
        Ok(SessionGuard { tech })
    }
}

impl<T: TagTechnology + ?Sized> Deref for SessionGuard<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.tech
    }
}

impl<T: TagTechnology + ?Sized> DerefMut for SessionGuard<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.tech
    }
}

impl<T: TagTechnology + ?Sized> Drop for SessionGuard<T> {
    fn drop(&mut self) {
        self.tech.close();
        tracing::trace!("tag session released");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Default)]
    struct FakeTech {
        fail: bool,
        connected: bool,
        closes: Arc<AtomicUsize>,
    }

    impl TagTechnology for FakeTech {
        fn connect(&mut self) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::new("no answer"));
            }
            self.connected = true;
            Ok(())
        }

        fn close(&mut self) {
            self.connected = false;
            self.closes.fetch_add(1, Ordering::SeqCst);
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }

    #[test]
    fn test_guard_closes_on_drop() {
        let closes = Arc::new(AtomicUsize::new(0));
        let guard = SessionGuard::connect(Box::new(FakeTech {
            closes: Arc::clone(&closes),
            ..Default::default()
        }))
        .unwrap();
        assert!(guard.is_connected());
        assert_eq!(closes.load(Ordering::SeqCst), 0);

        drop(guard);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_connect_still_closes() {
        let closes = Arc::new(AtomicUsize::new(0));
        let result = SessionGuard::connect(Box::new(FakeTech {
            fail: true,
            closes: Arc::clone(&closes),
            ..Default::default()
        }));
        assert_eq!(result.err(), Some(TransportError::new("no answer")));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
