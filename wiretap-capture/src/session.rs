//! Capture session lifecycle: create, configure, activate, read, close

use std::path::Path;
use std::time::{Duration, SystemTime};

use pcap::{Active, Capture, Linktype, Offline};
use tracing::{debug, info, warn};
use wiretap_core::{Error, Packet, Result};

use crate::interface;
use crate::stats::{CaptureStats, DeliveryStats};

/// Default snapshot length (maximum bytes captured per packet)
pub const DEFAULT_SNAPLEN: i32 = 65535;

/// Default read timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: i32 = 1000;

/// Configuration accumulated before a session is activated
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Maximum bytes to capture per packet
    pub snaplen: i32,
    /// Read timeout in milliseconds; 0 waits indefinitely
    pub timeout_ms: i32,
    /// Receive all link traffic, not just traffic addressed to us
    pub promiscuous: bool,
    /// Wireless monitor mode (802.11 frames without association)
    pub monitor: bool,
    /// Deliver packets as they arrive instead of batching
    pub immediate_mode: bool,
    /// Kernel buffer size in bytes; 0 keeps the OS default
    pub buffer_size: i32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            snaplen: DEFAULT_SNAPLEN,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            promiscuous: false,
            monitor: false,
            immediate_mode: false,
            buffer_size: 0,
        }
    }
}

/// A capture session in the created state
///
/// Built by [`Session::builder`]. Setters that validate their input are
/// chainable through `Result`; activation consumes the builder and yields
/// a [`Session`]. There is no way to reconfigure an activated session.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    device: String,
    config: CaptureConfig,
}

impl SessionBuilder {
    fn new(device: &str) -> Result<Self> {
        if device.is_empty() {
            return Err(Error::invalid_parameter("device", "name is empty"));
        }
        // Resolve the name now so a typo fails at create time rather than
        // at activation.
        interface::get_interface(device)?;
        Ok(Self {
            device: device.to_string(),
            config: CaptureConfig::default(),
        })
    }

    /// Set the snapshot length; must be positive
    pub fn snaplen(mut self, snaplen: i32) -> Result<Self> {
        if snaplen <= 0 {
            return Err(Error::invalid_parameter("snaplen", "must be positive"));
        }
        self.config.snaplen = snaplen;
        Ok(self)
    }

    /// Set the read timeout in milliseconds; must be non-negative
    pub fn timeout_ms(mut self, timeout_ms: i32) -> Result<Self> {
        if timeout_ms < 0 {
            return Err(Error::invalid_parameter(
                "timeout_ms",
                "must be non-negative",
            ));
        }
        self.config.timeout_ms = timeout_ms;
        Ok(self)
    }

    /// Enable or disable promiscuous mode
    pub fn promiscuous(mut self, enabled: bool) -> Self {
        self.config.promiscuous = enabled;
        self
    }

    /// Request wireless monitor mode
    ///
    /// Support is a property of the device and driver; an unsupported
    /// request surfaces as [`Error::MonitorUnsupported`] at activation.
    /// See [`monitor_mode_supported`] for a capability probe.
    pub fn monitor(mut self, enabled: bool) -> Self {
        self.config.monitor = enabled;
        self
    }

    /// Deliver packets as they arrive instead of waiting for a buffer
    pub fn immediate_mode(mut self, enabled: bool) -> Self {
        self.config.immediate_mode = enabled;
        self
    }

    /// Set the kernel buffer size in bytes
    pub fn buffer_size(mut self, bytes: i32) -> Self {
        self.config.buffer_size = bytes;
        self
    }

    /// Device this builder will open
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Accumulated configuration
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Open the OS capture handle with the accumulated configuration
    pub fn activate(self) -> Result<Session> {
        debug!("activating capture session on {}", self.device);

        let mut inactive = Capture::from_device(self.device.as_str())
            .map_err(|e| open_error(&self.device, e))?
            .snaplen(self.config.snaplen)
            .timeout(self.config.timeout_ms)
            .promisc(self.config.promiscuous);

        if self.config.monitor {
            inactive = inactive.rfmon(true);
        }
        if self.config.immediate_mode {
            inactive = inactive.immediate_mode(true);
        }
        if self.config.buffer_size > 0 {
            inactive = inactive.buffer_size(self.config.buffer_size);
        }

        let active = inactive.open().map_err(|e| {
            if self.config.monitor && is_rfmon_rejection(&e) {
                Error::MonitorUnsupported(self.device.clone())
            } else {
                open_error(&self.device, e)
            }
        })?;

        info!(
            "capture session activated on {} (snaplen {}, timeout {}ms)",
            self.device, self.config.snaplen, self.config.timeout_ms
        );

        Ok(Session {
            device: self.device,
            snaplen: self.config.snaplen,
            timeout_ms: self.config.timeout_ms,
            handle: Some(CaptureHandle::Live(active)),
            delivered: DeliveryStats::new(),
        })
    }
}

/// Best-effort probe for monitor mode support on a device
///
/// libpcap only reveals rfmon support through an activation attempt at
/// this layer, so the probe opens and immediately closes a monitor-mode
/// session. Privilege failures report as unsupported.
pub fn monitor_mode_supported(device: &str) -> bool {
    let builder = match Session::builder(device) {
        Ok(b) => b,
        Err(_) => return false,
    };
    match builder.monitor(true).activate() {
        Ok(mut session) => {
            session.close();
            true
        }
        Err(_) => false,
    }
}

enum CaptureHandle {
    Live(Capture<Active>),
    Offline(Capture<Offline>),
}

/// An activated capture session
///
/// Owns the underlying OS capture handle exclusively. Reads run on the
/// calling thread; the session spawns no background work and holds no
/// internal locks. [`Session::close`] releases the handle and is
/// idempotent; most operations on a closed session answer
/// [`Error::State`].
pub struct Session {
    device: String,
    snaplen: i32,
    timeout_ms: i32,
    handle: Option<CaptureHandle>,
    delivered: DeliveryStats,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handle = match self.handle {
            Some(CaptureHandle::Live(_)) => "Some(Live)",
            Some(CaptureHandle::Offline(_)) => "Some(Offline)",
            None => "None",
        };
        f.debug_struct("Session")
            .field("device", &self.device)
            .field("snaplen", &self.snaplen)
            .field("timeout_ms", &self.timeout_ms)
            .field("handle", &format_args!("{}", handle))
            .field("delivered", &self.delivered)
            .finish()
    }
}

impl Session {
    /// Start building a live session in the created state
    pub fn builder(device: &str) -> Result<SessionBuilder> {
        SessionBuilder::new(device)
    }

    /// Create, configure and activate a live session in one call
    pub fn open_live(
        device: &str,
        snaplen: i32,
        promiscuous: bool,
        timeout_ms: i32,
    ) -> Result<Self> {
        Self::builder(device)?
            .snaplen(snaplen)?
            .timeout_ms(timeout_ms)?
            .promiscuous(promiscuous)
            .activate()
    }

    /// Open a savefile for offline replay
    ///
    /// The reader and filter work as on a live session; statistics and
    /// injection are live-only and answer [`Error::State`].
    pub fn open_offline<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let capture = Capture::from_file(path).map_err(|e| match e {
            pcap::Error::IoError(kind) => Error::Io(std::io::Error::from(kind)),
            other => Error::device(format!("{}: {}", path.display(), other)),
        })?;

        debug!("opened offline session from {}", path.display());

        Ok(Session {
            device: path.display().to_string(),
            snaplen: DEFAULT_SNAPLEN,
            timeout_ms: 0,
            handle: Some(CaptureHandle::Offline(capture)),
            delivered: DeliveryStats::new(),
        })
    }

    /// Device name (or savefile path) this session reads from
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Effective snapshot length
    pub fn snapshot(&self) -> i32 {
        self.snaplen
    }

    /// Configured read timeout in milliseconds
    pub fn timeout_ms(&self) -> i32 {
        self.timeout_ms
    }

    /// True until [`Session::close`] releases the handle
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// True for live captures, false for offline replay (or once closed)
    pub fn is_live(&self) -> bool {
        matches!(self.handle, Some(CaptureHandle::Live(_)))
    }

    /// Link-layer type of the capture
    pub fn datalink(&self) -> Result<Linktype> {
        match &self.handle {
            Some(CaptureHandle::Live(cap)) => Ok(cap.get_datalink()),
            Some(CaptureHandle::Offline(cap)) => Ok(cap.get_datalink()),
            None => Err(Error::state("cannot query datalink on a closed session")),
        }
    }

    /// Compile a BPF expression and install it on this session
    ///
    /// Compilation runs against the session's link-layer type and snapshot
    /// length. Installation replaces any previously installed filter; on
    /// failure the previous filter stays in effect.
    pub fn set_filter(&mut self, expression: &str) -> Result<()> {
        let handle = self
            .handle
            .as_mut()
            .ok_or_else(|| Error::filter("cannot compile a filter: session is not active"))?;
        let compiled = match handle {
            CaptureHandle::Live(cap) => cap.filter(expression, true),
            CaptureHandle::Offline(cap) => cap.filter(expression, true),
        };
        compiled.map_err(|e| Error::filter(format!("{:?}: {}", expression, e)))?;
        debug!("installed filter {:?} on {}", expression, self.device);
        Ok(())
    }

    /// Current kernel capture counters
    pub fn stats(&mut self) -> Result<CaptureStats> {
        match self.handle.as_mut() {
            Some(CaptureHandle::Live(cap)) => cap
                .stats()
                .map(CaptureStats::from_pcap)
                .map_err(|e| Error::device(format!("failed to read capture counters: {}", e))),
            Some(CaptureHandle::Offline(_)) => Err(Error::state(
                "statistics are only available on live sessions",
            )),
            None => Err(Error::state("cannot read statistics on a closed session")),
        }
    }

    /// Write raw bytes to the wire
    ///
    /// Returns the number of bytes written, or `-1` when the interface
    /// does not support injection. The sentinel is a recognized outcome,
    /// not an error; callers must check for it explicitly.
    pub fn inject(&mut self, bytes: &[u8]) -> Result<i32> {
        match self.handle.as_mut() {
            Some(CaptureHandle::Live(cap)) => match cap.sendpacket(bytes) {
                Ok(()) => Ok(bytes.len() as i32),
                Err(pcap::Error::PcapError(msg)) if injection_unsupported(&msg) => {
                    warn!("{} does not support packet injection", self.device);
                    Ok(-1)
                }
                Err(e) => Err(inject_error(&self.device, e)),
            },
            Some(CaptureHandle::Offline(_)) => {
                Err(Error::state("cannot inject packets on an offline session"))
            }
            None => Err(Error::state("cannot inject packets on a closed session")),
        }
    }

    /// Read the next packet
    ///
    /// Blocks the calling thread until a packet arrives or the configured
    /// timeout elapses. `Ok(None)` means a timeout tick on a live session
    /// (call again to keep waiting) or end-of-file on an offline one.
    pub fn next_packet(&mut self) -> Result<Option<Packet>> {
        let handle = self
            .handle
            .as_mut()
            .ok_or_else(|| Error::state("cannot read packets on a closed session"))?;
        let grabbed = match handle {
            CaptureHandle::Live(cap) => cap.next_packet(),
            CaptureHandle::Offline(cap) => cap.next_packet(),
        };
        let converted = match grabbed {
            Ok(raw) => Some(convert_packet(&raw)),
            Err(pcap::Error::TimeoutExpired) | Err(pcap::Error::NoMorePackets) => None,
            Err(e) => return Err(Error::device(format!("capture read failed: {}", e))),
        };
        if let Some(packet) = &converted {
            self.delivered.record(packet.len());
        }
        Ok(converted)
    }

    /// Lazy sequence of packets from this session
    ///
    /// Live timeout ticks are absorbed, so the iterator is unbounded over
    /// live traffic; callers needing bounded execution impose an external
    /// deadline around [`Session::next_packet`] instead. Offline sessions
    /// end at end-of-file. The iterator fuses after a fatal error.
    pub fn packets(&mut self) -> PacketIter<'_> {
        PacketIter {
            session: self,
            done: false,
        }
    }

    /// Counters for packets this session has handed to the caller
    pub fn delivery_stats(&self) -> &DeliveryStats {
        &self.delivered
    }

    /// Release the OS capture handle
    ///
    /// Closing an already-closed session is a no-op.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            debug!("closed capture session on {}", self.device);
        }
    }
}

/// Iterator over captured packets, created by [`Session::packets`]
pub struct PacketIter<'a> {
    session: &'a mut Session,
    done: bool,
}

impl Iterator for PacketIter<'_> {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.session.next_packet() {
                Ok(Some(packet)) => return Some(Ok(packet)),
                Ok(None) => {
                    if self.session.is_live() {
                        // timeout tick, keep waiting
                        continue;
                    }
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

fn convert_packet(raw: &pcap::Packet<'_>) -> Packet {
    let secs = raw.header.ts.tv_sec.max(0) as u64;
    let micros = raw.header.ts.tv_usec.max(0) as u64;
    let timestamp =
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs) + Duration::from_micros(micros);
    Packet::new(timestamp, raw.data.to_vec(), raw.header.len as usize)
}

fn open_error(device: &str, e: pcap::Error) -> Error {
    match e {
        pcap::Error::IoError(kind) if kind == std::io::ErrorKind::PermissionDenied => {
            Error::permission(format!("cannot open {}", device))
        }
        pcap::Error::PcapError(msg) => {
            let lower = msg.to_ascii_lowercase();
            if lower.contains("permission denied") || lower.contains("not permitted") {
                Error::permission(format!("cannot open {}: {}", device, msg))
            } else if lower.contains("no such device") || lower.contains("doesn't exist") {
                Error::DeviceNotFound(device.to_string())
            } else {
                Error::device(format!("{}: {}", device, msg))
            }
        }
        other => Error::device(format!("{}: {}", device, other)),
    }
}

fn inject_error(device: &str, e: pcap::Error) -> Error {
    match e {
        pcap::Error::PcapError(msg)
            if msg.to_ascii_lowercase().contains("permission")
                || msg.to_ascii_lowercase().contains("not permitted") =>
        {
            Error::permission(format!("cannot inject on {}: {}", device, msg))
        }
        other => Error::device(format!("injection on {} failed: {}", device, other)),
    }
}

fn is_rfmon_rejection(e: &pcap::Error) -> bool {
    match e {
        pcap::Error::PcapError(msg) => {
            let lower = msg.to_ascii_lowercase();
            lower.contains("rfmon") || lower.contains("monitor mode")
        }
        _ => false,
    }
}

fn injection_unsupported(msg: &str) -> bool {
    let lower = msg.to_ascii_lowercase();
    lower.contains("not supported") || lower.contains("isn't supported")
}
