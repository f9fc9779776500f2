//! Packet capture sessions over libpcap
//!
//! This crate is a thin, strongly-typed layer over the system packet-capture
//! facility. The hard parts (BPF compilation, kernel capture buffers,
//! link-layer framing) stay inside libpcap; this layer marshals
//! configuration into capture calls and converts results into Rust
//! structures with a closed error taxonomy.
//!
//! ## Features
//!
//! - **Staged sessions**: a builder for the created state, a session type
//!   for the activated state; misconfiguration after activation is
//!   unrepresentable.
//! - **Interface introspection**: enumerate devices and their link-layer,
//!   IPv4 and IPv6 address records.
//! - **BPF filters**: compile and install filter expressions, with helper
//!   builders for common protocols.
//! - **Pull-based reader**: packets are read on the caller's thread with
//!   cooperative timeouts; no background threads, no internal locking.
//!
//! ## Example
//!
//! ```no_run
//! use wiretap_capture::{default_device, Session};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let device = default_device()?;
//! let mut session = Session::open_live(&device.name, 65535, true, 100)?;
//! session.set_filter("udp port 53")?;
//!
//! while let Some(packet) = session.next_packet()? {
//!     println!("{} bytes on the wire", packet.wire_len);
//! }
//! # Ok(())
//! # }
//! ```

pub mod filters;
pub mod interface;
pub mod session;
pub mod stats;

// Re-export main types
pub use interface::{
    default_device, get_interface, list_addresses, list_capture_interfaces, list_interfaces,
    lookup_network, AddressFamily, InterfaceAddress, InterfaceInfo,
};
pub use session::{monitor_mode_supported, CaptureConfig, PacketIter, Session, SessionBuilder};
pub use stats::{CaptureStats, DeliveryStats};

// The link-layer type codes come straight from libpcap
pub use pcap::Linktype;

/// Version of the capture layer itself
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
