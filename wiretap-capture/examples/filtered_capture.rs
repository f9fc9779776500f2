//! Example: Filtered packet capture
//!
//! Captures DNS and ARP traffic using a composed BPF filter.
//! Requires root/administrator privileges to run.
//!
//! Run with: sudo cargo run --example filtered_capture

use std::time::{Duration, Instant};
use wiretap_capture::{default_device, filters, Session};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let iface = default_device()?;
    println!("Capturing on: {}", iface.name);

    let dns = filters::all_of(&[&filters::udp(), &filters::port(53)]);
    let filter = filters::any_of(&[&dns, &filters::arp()]);
    println!("BPF filter: {}", filter);
    println!();

    let mut session = Session::open_live(&iface.name, 65535, true, 100)?;
    session.set_filter(&filter)?;

    let deadline = Instant::now() + Duration::from_secs(30);
    let mut count = 0;
    while count < 10 && Instant::now() < deadline {
        let Some(packet) = session.next_packet()? else {
            continue;
        };
        count += 1;

        let preview = packet
            .data()
            .iter()
            .take(32)
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ");
        println!("[{}] {} bytes: {}", count, packet.len(), preview);
    }

    println!("\n=== Capture Complete ===");
    println!("{}", session.stats()?);

    session.close();
    Ok(())
}
