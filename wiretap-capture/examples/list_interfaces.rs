//! Example: List all network interfaces
//!
//! Run with: cargo run --example list_interfaces

use wiretap_capture::{default_device, list_capture_interfaces, list_interfaces};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== All Network Interfaces ===\n");

    for iface in list_interfaces()? {
        println!("Interface: {}", iface.name);
        if let Some(ref desc) = iface.description {
            println!("  Description: {}", desc);
        }
        for address in &iface.addresses {
            println!("  {}", address);
        }
        println!("  Up: {}", iface.is_up);
        println!("  Loopback: {}", iface.is_loopback);
        println!("  Capture capable: {}", iface.is_capture_capable());
        println!();
    }

    println!("=== Capture-Capable Interfaces ===\n");
    for iface in list_capture_interfaces()? {
        println!("  {}", iface.name);
    }

    println!("\n=== Default Device ===\n");
    match default_device() {
        Ok(iface) => {
            println!("Default: {}", iface.name);
            if let Some(ipv4) = iface.primary_ipv4() {
                println!("Primary IPv4: {}", ipv4);
            }
        }
        Err(e) => println!("No default device found: {}", e),
    }

    Ok(())
}
