//! SimpleNFC Wire Format - NDEF record set codec
//!
//! This crate implements the NDEF binary layout:
//! - Record header flags (MB, ME, CF, SR, IL, TNF)
//! - Length-prefixed type, id and payload fields
//! - Chunked record reassembly on decode

pub mod codec;
pub mod flags;
pub mod header;

pub use codec::*;
pub use flags::*;
pub use header::*;
