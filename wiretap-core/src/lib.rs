//! Wiretap Core Library
//!
//! This crate provides the shared types and error handling for the
//! wiretap packet-capture layer: the error taxonomy, the captured
//! packet type, and small value types such as MAC addresses.

pub mod error;
pub mod packet;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use packet::Packet;
pub use types::MacAddr;
