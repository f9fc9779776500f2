//! Network interface and address enumeration

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnetwork::IpNetwork;
use pcap::Device;
use pnet_datalink::NetworkInterface;
use wiretap_core::{Error, MacAddr, Result};

/// Address family of an interface address record
///
/// A closed set instead of raw OS family codes; `code` recovers the
/// numeric constant where interop needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressFamily {
    /// Link-layer (MAC) addresses
    LinkLayer,
    /// IPv4 addresses
    Ipv4,
    /// IPv6 addresses
    Ipv6,
    /// A family this layer does not model
    Other(i32),
}

#[cfg(any(target_os = "linux", target_os = "android"))]
const LINK_FAMILY_CODE: i32 = libc::AF_PACKET;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const LINK_FAMILY_CODE: i32 = libc::AF_LINK;

impl AddressFamily {
    /// Numeric OS family code
    pub fn code(&self) -> i32 {
        match self {
            AddressFamily::LinkLayer => LINK_FAMILY_CODE,
            AddressFamily::Ipv4 => libc::AF_INET,
            AddressFamily::Ipv6 => libc::AF_INET6,
            AddressFamily::Other(code) => *code,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::LinkLayer => write!(f, "link"),
            AddressFamily::Ipv4 => write!(f, "inet"),
            AddressFamily::Ipv6 => write!(f, "inet6"),
            AddressFamily::Other(code) => write!(f, "af{}", code),
        }
    }
}

/// One address record on an interface
///
/// The shape is per-family: link-layer records carry a MAC, IPv4 records
/// may carry netmask and broadcast, IPv6 records may carry a netmask.
/// Fields the OS does not report are absent, never present-but-invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceAddress {
    /// Link-layer address
    Link { addr: MacAddr },
    /// IPv4 address with optional mask and broadcast
    Ipv4 {
        addr: Ipv4Addr,
        netmask: Option<Ipv4Addr>,
        broadcast: Option<Ipv4Addr>,
    },
    /// IPv6 address with optional mask
    Ipv6 {
        addr: Ipv6Addr,
        netmask: Option<Ipv6Addr>,
    },
}

impl InterfaceAddress {
    /// Family this record belongs to
    pub fn family(&self) -> AddressFamily {
        match self {
            InterfaceAddress::Link { .. } => AddressFamily::LinkLayer,
            InterfaceAddress::Ipv4 { .. } => AddressFamily::Ipv4,
            InterfaceAddress::Ipv6 { .. } => AddressFamily::Ipv6,
        }
    }

    /// Textual form of the address itself
    pub fn addr_string(&self) -> String {
        match self {
            InterfaceAddress::Link { addr } => addr.to_string(),
            InterfaceAddress::Ipv4 { addr, .. } => addr.to_string(),
            InterfaceAddress::Ipv6 { addr, .. } => addr.to_string(),
        }
    }
}

impl fmt::Display for InterfaceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceAddress::Link { addr } => write!(f, "link {}", addr),
            InterfaceAddress::Ipv4 {
                addr,
                netmask,
                broadcast,
            } => {
                write!(f, "inet {}", addr)?;
                if let Some(mask) = netmask {
                    write!(f, " netmask {}", mask)?;
                }
                if let Some(bcast) = broadcast {
                    write!(f, " broadcast {}", bcast)?;
                }
                Ok(())
            }
            InterfaceAddress::Ipv6 { addr, netmask } => {
                write!(f, "inet6 {}", addr)?;
                if let Some(mask) = netmask {
                    write!(f, " netmask {}", mask)?;
                }
                Ok(())
            }
        }
    }
}

/// Information about a network interface
#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    /// Interface name (e.g., "eth0", "en0")
    pub name: String,
    /// Human-readable description, if the OS provides one
    pub description: Option<String>,
    /// Interface index, 0 when unknown
    pub index: u32,
    /// Link-layer address, if any
    pub mac: Option<MacAddr>,
    /// Address records, link-layer first
    pub addresses: Vec<InterfaceAddress>,
    /// Whether the interface is up
    pub is_up: bool,
    /// Whether the interface is a loopback
    pub is_loopback: bool,
    /// Whether the interface supports multicast
    pub is_multicast: bool,
}

impl InterfaceInfo {
    /// Check if the interface is suitable for live capture
    pub fn is_capture_capable(&self) -> bool {
        self.is_up && !self.is_loopback
    }

    /// First IPv4 address, if any
    pub fn primary_ipv4(&self) -> Option<Ipv4Addr> {
        self.addresses.iter().find_map(|a| match a {
            InterfaceAddress::Ipv4 { addr, .. } => Some(*addr),
            _ => None,
        })
    }

    /// First IPv6 address, if any
    pub fn primary_ipv6(&self) -> Option<Ipv6Addr> {
        self.addresses.iter().find_map(|a| match a {
            InterfaceAddress::Ipv6 { addr, .. } => Some(*addr),
            _ => None,
        })
    }
}

fn build_info(name: &str, device: Option<&Device>, iface: Option<&NetworkInterface>) -> InterfaceInfo {
    let mac = iface
        .and_then(|i| i.mac)
        .map(|m| MacAddr::new([m.0, m.1, m.2, m.3, m.4, m.5]));

    let mut addresses = Vec::new();
    if let Some(mac) = mac {
        addresses.push(InterfaceAddress::Link { addr: mac });
    }

    // libpcap reports addresses with the OS's own netmask/broadcast; fall
    // back to prefix math from the routing layer when it has none.
    let pcap_addrs = device.map(|d| d.addresses.as_slice()).unwrap_or(&[]);
    if !pcap_addrs.is_empty() {
        for address in pcap_addrs {
            push_pcap_address(&mut addresses, address);
        }
    } else if let Some(iface) = iface {
        for network in &iface.ips {
            push_pnet_network(&mut addresses, network, iface.is_loopback());
        }
    }

    InterfaceInfo {
        name: name.to_string(),
        description: device.and_then(|d| d.desc.clone()),
        index: iface.map(|i| i.index).unwrap_or(0),
        mac,
        addresses,
        is_up: iface.map(|i| i.is_up()).unwrap_or(false),
        is_loopback: iface.map(|i| i.is_loopback()).unwrap_or(false),
        is_multicast: iface.map(|i| i.is_multicast()).unwrap_or(false),
    }
}

fn push_pcap_address(out: &mut Vec<InterfaceAddress>, address: &pcap::Address) {
    match address.addr {
        IpAddr::V4(addr) => out.push(InterfaceAddress::Ipv4 {
            addr,
            netmask: match address.netmask {
                Some(IpAddr::V4(mask)) => Some(mask),
                _ => None,
            },
            broadcast: match address.broadcast_addr {
                Some(IpAddr::V4(bcast)) => Some(bcast),
                _ => None,
            },
        }),
        IpAddr::V6(addr) => out.push(InterfaceAddress::Ipv6 {
            addr,
            netmask: match address.netmask {
                Some(IpAddr::V6(mask)) => Some(mask),
                _ => None,
            },
        }),
    }
}

fn push_pnet_network(out: &mut Vec<InterfaceAddress>, network: &IpNetwork, loopback: bool) {
    match network {
        IpNetwork::V4(n) => out.push(InterfaceAddress::Ipv4 {
            addr: n.ip(),
            netmask: Some(n.mask()),
            broadcast: if loopback { None } else { Some(n.broadcast()) },
        }),
        IpNetwork::V6(n) => out.push(InterfaceAddress::Ipv6 {
            addr: n.ip(),
            netmask: Some(n.mask()),
        }),
    }
}

fn list_devices() -> Result<Vec<Device>> {
    Device::list().map_err(|e| Error::device(format!("failed to enumerate devices: {}", e)))
}

/// List all interfaces visible to the capture library, in OS-reported order
///
/// The order is not guaranteed stable across calls; sort by name when
/// determinism matters.
pub fn list_interfaces() -> Result<Vec<InterfaceInfo>> {
    let devices = list_devices()?;
    if devices.is_empty() {
        return Err(Error::device(
            "no network interfaces found; capture privileges may be required",
        ));
    }

    let ifaces = pnet_datalink::interfaces();
    Ok(devices
        .iter()
        .map(|device| {
            let iface = ifaces.iter().find(|i| i.name == device.name);
            build_info(&device.name, Some(device), iface)
        })
        .collect())
}

/// Interfaces that are up and not loopbacks
pub fn list_capture_interfaces() -> Result<Vec<InterfaceInfo>> {
    Ok(list_interfaces()?
        .into_iter()
        .filter(|iface| iface.is_capture_capable())
        .collect())
}

/// Look up a single interface by name
pub fn get_interface(name: &str) -> Result<InterfaceInfo> {
    if name.is_empty() {
        return Err(Error::invalid_parameter("device", "name is empty"));
    }

    // the routing layer is a fallback source, so a failed pcap
    // enumeration does not hide interfaces it knows about
    let devices = Device::list().unwrap_or_default();
    let device = devices.iter().find(|d| d.name == name);
    let ifaces = pnet_datalink::interfaces();
    let iface = ifaces.iter().find(|i| i.name == name);

    if device.is_none() && iface.is_none() {
        return Err(Error::DeviceNotFound(name.to_string()));
    }
    Ok(build_info(name, device, iface))
}

/// Address records of a single interface
pub fn list_addresses(name: &str) -> Result<Vec<InterfaceAddress>> {
    Ok(get_interface(name)?.addresses)
}

/// The OS-default capture device
pub fn default_device() -> Result<InterfaceInfo> {
    if let Ok(Some(device)) = Device::lookup() {
        return get_interface(&device.name);
    }
    // no lookup hint from libpcap; take the first usable interface
    list_interfaces()
        .unwrap_or_default()
        .into_iter()
        .find(|iface| iface.is_capture_capable())
        .ok_or(Error::NoDevice)
}

/// IPv4 network and netmask of a device
///
/// Returns the network address in dotted-quad form and the netmask as a
/// host-order integer, from the device's first IPv4 record.
pub fn lookup_network(name: &str) -> Result<(String, u32)> {
    let info = get_interface(name)?;
    for address in &info.addresses {
        if let InterfaceAddress::Ipv4 {
            addr,
            netmask: Some(mask),
            ..
        } = address
        {
            let mask_bits = u32::from(*mask);
            let network = Ipv4Addr::from(u32::from(*addr) & mask_bits);
            return Ok((network.to_string(), mask_bits));
        }
    }
    Err(Error::device(format!("{} has no IPv4 configuration", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_list_interfaces() {
        match list_interfaces() {
            Ok(interfaces) => assert!(!interfaces.is_empty()),
            Err(e) => println!("cannot enumerate interfaces here: {}", e),
        }
    }

    #[test]
    fn test_loopback_is_present_and_not_capture_capable() {
        let Ok(interfaces) = list_interfaces() else {
            println!("cannot enumerate interfaces here");
            return;
        };
        if let Some(lo) = interfaces.iter().find(|i| i.is_loopback) {
            assert!(!lo.is_capture_capable());
        }
    }

    #[test]
    fn test_get_unknown_interface() {
        let err = get_interface("definitely-not-a-device-0").unwrap_err();
        assert!(matches!(err, Error::DeviceNotFound(_)));
    }

    #[test]
    fn test_get_empty_name() {
        let err = get_interface("").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_address_records_reparse() {
        let Ok(interfaces) = list_interfaces() else {
            println!("cannot enumerate interfaces here");
            return;
        };
        for iface in &interfaces {
            for address in &iface.addresses {
                match address {
                    InterfaceAddress::Link { .. } => {
                        assert!(MacAddr::from_str(&address.addr_string()).is_ok());
                    }
                    InterfaceAddress::Ipv4 {
                        netmask, broadcast, ..
                    } => {
                        assert!(address.addr_string().parse::<Ipv4Addr>().is_ok());
                        if let Some(mask) = netmask {
                            assert!(mask.to_string().parse::<Ipv4Addr>().is_ok());
                        }
                        if let Some(bcast) = broadcast {
                            assert!(bcast.to_string().parse::<Ipv4Addr>().is_ok());
                        }
                    }
                    InterfaceAddress::Ipv6 { .. } => {
                        assert!(address.addr_string().parse::<Ipv6Addr>().is_ok());
                    }
                }
            }
        }
    }

    #[test]
    fn test_family_codes_are_distinct() {
        assert_eq!(AddressFamily::Ipv4.code(), libc::AF_INET);
        assert_eq!(AddressFamily::Ipv6.code(), libc::AF_INET6);
        assert!(AddressFamily::LinkLayer.code() > 0);
        assert_ne!(AddressFamily::Ipv4.code(), AddressFamily::Ipv6.code());
        assert_eq!(AddressFamily::Other(123).code(), 123);
    }

    #[test]
    fn test_family_display() {
        assert_eq!(AddressFamily::LinkLayer.to_string(), "link");
        assert_eq!(AddressFamily::Ipv4.to_string(), "inet");
        assert_eq!(AddressFamily::Ipv6.to_string(), "inet6");
        assert_eq!(AddressFamily::Other(42).to_string(), "af42");
    }

    #[test]
    fn test_lookup_network_on_ipv4_interface() {
        let Ok(interfaces) = list_interfaces() else {
            println!("cannot enumerate interfaces here");
            return;
        };
        let Some(iface) = interfaces.iter().find(|i| {
            i.addresses.iter().any(|a| {
                matches!(
                    a,
                    InterfaceAddress::Ipv4 {
                        netmask: Some(_),
                        ..
                    }
                )
            })
        }) else {
            println!("no IPv4 interface, skipping");
            return;
        };

        let (network, netmask) = lookup_network(&iface.name).expect("lookup_network");
        let network: Ipv4Addr = network.parse().expect("network parses");
        // the network address is invariant under its own mask
        assert_eq!(u32::from(network) & netmask, u32::from(network));
    }

    #[test]
    fn test_lookup_network_unknown_device() {
        let err = lookup_network("definitely-not-a-device-0").unwrap_err();
        assert!(matches!(err, Error::DeviceNotFound(_)));
    }

    #[test]
    fn test_default_device() {
        match default_device() {
            Ok(iface) => assert!(!iface.name.is_empty()),
            Err(e) => println!("no default device here: {}", e),
        }
    }

    #[test]
    fn test_capture_interfaces_exclude_loopback() {
        let Ok(interfaces) = list_capture_interfaces() else {
            println!("cannot enumerate interfaces here");
            return;
        };
        assert!(interfaces.iter().all(|i| i.is_capture_capable()));
    }
}
