//! Subcommand implementations

use tracing::info;
use wiretap_capture::{default_device, list_interfaces, lookup_network, Session};
use wiretap_core::Result;

pub fn list(addresses: bool) -> Result<()> {
    for iface in list_interfaces()? {
        let status = if iface.is_up { "up" } else { "down" };
        match iface.description {
            Some(ref desc) => println!("{:<16} {:<5} {}", iface.name, status, desc),
            None => println!("{:<16} {}", iface.name, status),
        }
        if addresses {
            for address in &iface.addresses {
                println!("    {}", address);
            }
        }
    }
    Ok(())
}

pub fn capture(
    interface: Option<String>,
    filter: Option<String>,
    count: usize,
    snaplen: i32,
    timeout: i32,
    promiscuous: bool,
    monitor: bool,
) -> Result<()> {
    let device = resolve_device(interface)?;
    info!("opening capture on {}", device);

    let mut builder = Session::builder(&device)?
        .snaplen(snaplen)?
        .timeout_ms(timeout)?
        .promiscuous(promiscuous);
    if monitor {
        builder = builder.monitor(true);
    }
    let mut session = builder.activate()?;

    if let Some(ref expression) = filter {
        session.set_filter(expression)?;
        println!("filter: {}", expression);
    }
    println!("listening on {} ({:?})", device, session.datalink()?);

    let mut seen = 0;
    while seen < count {
        let Some(packet) = session.next_packet()? else {
            continue;
        };
        seen += 1;

        let preview = packet
            .data()
            .iter()
            .take(16)
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "[{:>4}] {:>5} bytes  {}{}",
            seen,
            packet.wire_len,
            preview,
            if packet.len() > 16 { " ..." } else { "" }
        );
    }

    println!("\n{}", session.stats()?);
    session.close();
    Ok(())
}

pub fn inject(interface: Option<String>, size: usize) -> Result<()> {
    let device = resolve_device(interface)?;
    let mut session = Session::open_live(&device, 65535, false, 100)?;

    let payload = vec![0x58u8; size];
    match session.inject(&payload)? {
        -1 => println!("{} does not support packet injection", device),
        written => println!("wrote {} bytes to {}", written, device),
    }

    session.close();
    Ok(())
}

pub fn net(interface: String) -> Result<()> {
    let (network, netmask) = lookup_network(&interface)?;
    println!(
        "{}: network {} netmask 0x{:08x}",
        interface, network, netmask
    );
    Ok(())
}

fn resolve_device(interface: Option<String>) -> Result<String> {
    match interface {
        Some(name) => Ok(name),
        None => Ok(default_device()?.name),
    }
}
