//! SimpleNFC Runtime - Read dispatch and write orchestration
//!
//! Three entry points, one per inbound situation:
//! 1. Read event: decode, route to the first matching handler
//! 2. Foreground event: decode the whole batch or fall back to raw sets
//! 3. Write request: run the tag writer off the event task
//!
//! Foreground and write results are also published on a result channel.

pub mod config;
pub mod handler;
pub mod router;
pub mod connector;
pub mod telemetry;

pub use config::*;
pub use handler::*;
pub use router::*;
pub use connector::*;
pub use telemetry::init_tracing;
