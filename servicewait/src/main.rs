//! servicewait: blocks until a set of service dependencies are reachable,
//! then exits with a status an orchestration step can gate on.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use reachability::wait_for;
use servicewait_core::{format_duration, Service};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const AFTER_HELP: &str = "\
Descriptor format: name:host[:port][:protocol][:endpoint]
  protocol: tcp (default), http, https, unix

Examples:
  servicewait db:localhost:5432:tcp
  servicewait api:localhost:8080:http:/health";

#[derive(Debug, Parser)]
#[command(
    name = "servicewait",
    version,
    about = "Smart service dependency waiter",
    after_help = AFTER_HELP
)]
struct Cli {
    /// Service descriptors, checked in the order given
    services: Vec<String>,
}

fn main() -> Result<()> {
    // Diagnostics go to stderr so the report on stdout stays clean.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if cli.services.is_empty() {
        Cli::command().print_help()?;
        std::process::exit(1);
    }

    let services: Vec<Service> = cli.services.iter().map(|s| Service::parse(s)).collect();

    let rt = tokio::runtime::Runtime::new()?;

    println!("\n=== SERVICE DEPENDENCY WAITER ===\n");

    let mut unavailable: Vec<&Service> = Vec::new();
    for service in &services {
        println!("Waiting for {} ({})...", service.name, service.target());
        let outcome = rt.block_on(wait_for(service));
        if outcome.available {
            println!(
                "  ✓ {} is ready ({})",
                service.name,
                format_duration(outcome.elapsed)
            );
        } else {
            println!(
                "  ✗ {} failed to start ({})",
                service.name,
                format_duration(outcome.elapsed)
            );
            unavailable.push(service);
        }
    }

    println!();
    println!(
        "Summary: {} services ready, {} services unavailable",
        services.len() - unavailable.len(),
        unavailable.len()
    );

    if !unavailable.is_empty() {
        println!("\nFailed services:");
        for s in &unavailable {
            println!("  - {} ({})", s.name, s.target());
        }
        std::process::exit(1);
    }

    Ok(())
}
