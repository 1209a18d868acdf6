//! SimpleNFC Test Harness - Scenario-driven validation
//!
//! This crate provides:
//! - Fixture builders (messages of an exact encoded size, broken sets)
//! - Write scenarios over emulated tags
//! - End-to-end checks of the read, foreground and write paths

pub mod fixtures;
pub mod scenario;

pub use fixtures::*;
pub use scenario::*;
