//! SimpleNFC Core - Record model and error taxonomy
//!
//! This crate defines the types shared by every layer of the stack:
//! - Type name format (TNF) of a record
//! - Records and messages (immutable once built)
//! - Raw record sets as handed over by the platform
//! - The closed set of read/write failure kinds

pub mod tnf;
pub mod record;
pub mod message;
pub mod error;

pub use tnf::*;
pub use record::*;
pub use message::*;
pub use error::*;
