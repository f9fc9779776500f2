//! Example: Basic packet capture
//!
//! Reads packets from the default device until 20 packets arrive or
//! 10 seconds pass. Requires root/administrator privileges to run.
//!
//! Run with: sudo cargo run --example basic_capture

use std::time::{Duration, Instant};
use wiretap_capture::{default_device, Session};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let iface = default_device()?;
    println!("Capturing on: {}", iface.name);

    let mut session = Session::open_live(&iface.name, 65535, true, 100)?;
    println!("Link type: {:?}", session.datalink()?);
    println!();

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut count = 0;
    while count < 20 && Instant::now() < deadline {
        match session.next_packet()? {
            Some(packet) => {
                count += 1;
                println!(
                    "[{}] {} bytes captured ({} on the wire)",
                    count,
                    packet.len(),
                    packet.wire_len
                );
            }
            None => continue, // timeout tick
        }
    }

    let stats = session.stats()?;
    println!("\n=== Final Statistics ===");
    println!("{}", stats);
    println!(
        "delivered {} packets ({} bytes)",
        session.delivery_stats().packets(),
        session.delivery_stats().bytes()
    );

    session.close();
    Ok(())
}
