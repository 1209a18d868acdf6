//! SimpleNFC Tag Layer - Tag sessions and writes
//!
//! This crate provides:
//! - The tag technology contract (NDEF and NDEF-formatable access)
//! - Scoped session guards that always release the tag
//! - Capability probing (structured before formatable)
//! - The write state machine
//! - An in-memory emulated tag

pub mod tech;
pub mod guard;
pub mod probe;
pub mod writer;
pub mod memory;

pub use tech::*;
pub use guard::*;
pub use probe::*;
pub use writer::*;
pub use memory::{MemoryTag, MemoryTagStats};
