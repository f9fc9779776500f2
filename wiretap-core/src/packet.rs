//! Captured packet type

use std::time::SystemTime;

/// A single captured packet
///
/// Packets are handed to the caller by value and never retained by the
/// session that produced them. `data` holds the captured bytes, which may
/// be fewer than `wire_len` when the snapshot length truncated the packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// When the packet was seen on the wire (from the capture header)
    pub timestamp: SystemTime,
    /// Captured bytes, at most the session's snapshot length
    pub data: Vec<u8>,
    /// Original length of the packet on the wire
    pub wire_len: usize,
}

impl Packet {
    /// Create a new packet
    pub fn new(timestamp: SystemTime, data: Vec<u8>, wire_len: usize) -> Self {
        Self {
            timestamp,
            data,
            wire_len,
        }
    }

    /// Captured bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes captured
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if no bytes were captured
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True when the snapshot length cut the packet short
    pub fn is_truncated(&self) -> bool {
        self.data.len() < self.wire_len
    }

    /// Consume the packet and take ownership of its bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
