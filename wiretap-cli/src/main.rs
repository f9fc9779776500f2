//! wiretap command-line frontend

mod args;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let result = match cli.command {
        Commands::List { addresses } => commands::list(addresses),
        Commands::Capture {
            interface,
            filter,
            count,
            snaplen,
            timeout,
            promiscuous,
            monitor,
        } => commands::capture(
            interface,
            filter,
            count,
            snaplen,
            timeout,
            promiscuous,
            monitor,
        ),
        Commands::Inject { interface, size } => commands::inject(interface, size),
        Commands::Net { interface } => commands::net(interface),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
