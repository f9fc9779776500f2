//! Capture statistics

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Kernel capture counters, valid at the moment of the call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    /// Packets received by the filter
    pub received: u64,
    /// Packets dropped because the kernel buffer was full
    pub dropped: u64,
    /// Packets dropped by the interface or its driver
    pub if_dropped: u64,
}

impl CaptureStats {
    /// Build from the raw libpcap counters
    pub fn from_pcap(stat: pcap::Stat) -> Self {
        Self {
            received: stat.received as u64,
            dropped: stat.dropped as u64,
            if_dropped: stat.if_dropped as u64,
        }
    }

    /// Drop rate as a percentage of everything the filter saw
    pub fn drop_rate(&self) -> f64 {
        if self.received == 0 {
            return 0.0;
        }
        (self.dropped as f64 / self.received as f64) * 100.0
    }

    /// Received plus kernel-dropped packets
    pub fn total_packets(&self) -> u64 {
        self.received + self.dropped
    }
}

impl fmt::Display for CaptureStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} received, {} dropped ({:.2}%), {} dropped by interface",
            self.received,
            self.dropped,
            self.drop_rate(),
            self.if_dropped
        )
    }
}

/// Counters for packets a session has handed to its caller
///
/// Updated by the reader as packets are delivered; distinct from
/// [`CaptureStats`], which counts what the kernel saw.
#[derive(Debug)]
pub struct DeliveryStats {
    packets: AtomicU64,
    bytes: AtomicU64,
    started: Instant,
}

impl DeliveryStats {
    pub fn new() -> Self {
        Self {
            packets: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Record one delivered packet of `size` captured bytes
    pub fn record(&self, size: usize) {
        self.packets.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(size as u64, Ordering::Relaxed);
    }

    /// Packets delivered so far
    pub fn packets(&self) -> u64 {
        self.packets.load(Ordering::Relaxed)
    }

    /// Captured bytes delivered so far
    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    /// Time since the session was opened
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Average delivery rate in packets per second
    pub fn packets_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.packets() as f64 / secs
        } else {
            0.0
        }
    }
}

impl Default for DeliveryStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_rate() {
        let stats = CaptureStats {
            received: 100,
            dropped: 10,
            if_dropped: 0,
        };
        assert_eq!(stats.drop_rate(), 10.0);
        assert_eq!(stats.total_packets(), 110);
    }

    #[test]
    fn test_drop_rate_with_no_traffic() {
        let stats = CaptureStats::default();
        assert_eq!(stats.drop_rate(), 0.0);
        assert_eq!(stats.total_packets(), 0);
    }

    #[test]
    fn test_stats_display() {
        let stats = CaptureStats {
            received: 1000,
            dropped: 50,
            if_dropped: 10,
        };
        let text = stats.to_string();
        assert!(text.contains("1000 received"));
        assert!(text.contains("50 dropped"));
    }

    #[test]
    fn test_delivery_counters() {
        let delivered = DeliveryStats::new();
        delivered.record(64);
        delivered.record(128);
        delivered.record(256);

        assert_eq!(delivered.packets(), 3);
        assert_eq!(delivered.bytes(), 448);
    }

    #[test]
    fn test_delivery_rate() {
        let delivered = DeliveryStats::new();
        std::thread::sleep(Duration::from_millis(10));
        delivered.record(100);
        assert!(delivered.packets_per_second() > 0.0);
        assert!(delivered.elapsed() >= Duration::from_millis(10));
    }
}
