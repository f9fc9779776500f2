//! CLI argument parsing

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wiretap")]
#[command(version, about = "Packet capture and interface inspection", long_about = None)]
pub struct Cli {
    /// Verbose output (-v, -vv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List network interfaces
    List {
        /// Show per-interface address records
        #[arg(short, long)]
        addresses: bool,
    },

    /// Capture packets from an interface
    Capture {
        /// Interface to capture on (defaults to the OS default device)
        #[arg(short = 'I', long)]
        interface: Option<String>,

        /// BPF filter expression
        #[arg(short, long)]
        filter: Option<String>,

        /// Stop after this many packets
        #[arg(short = 'c', long, default_value = "10")]
        count: usize,

        /// Snapshot length in bytes
        #[arg(long, default_value = "65535")]
        snaplen: i32,

        /// Read timeout in milliseconds
        #[arg(long, default_value = "1000")]
        timeout: i32,

        /// Enable promiscuous mode
        #[arg(short, long)]
        promiscuous: bool,

        /// Enable wireless monitor mode
        #[arg(long)]
        monitor: bool,
    },

    /// Inject a filler-pattern packet onto an interface
    Inject {
        /// Interface to inject on (defaults to the OS default device)
        #[arg(short = 'I', long)]
        interface: Option<String>,

        /// Payload size in bytes
        #[arg(short, long, default_value = "64")]
        size: usize,
    },

    /// Show the IPv4 network and netmask of an interface
    Net {
        /// Interface to inspect
        interface: String,
    },
}
