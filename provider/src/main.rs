use std::io;

use anyhow::Context;
use clap::Parser;
use terraform_provider_todo::framework::protocol;
use terraform_provider_todo::framework::ProviderServer;
use terraform_provider_todo::{TodoProvider, DEFAULT_ADDRESS};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Serves the todo provider to a host over stdin/stdout.
#[derive(Debug, Parser)]
#[command(name = "terraform-provider-todo", version)]
struct Args {
    /// Registry address announced in the handshake line.
    #[arg(long, default_value = DEFAULT_ADDRESS)]
    address: String,

    /// Log filter, e.g. `debug` or `terraform_provider_todo=trace`.
    #[arg(long, env = "TF_LOG", default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr),
        )
        .with(EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .context("failed to install log subscriber")?;

    info!(address = %args.address, "starting provider");
    let mut server = ProviderServer::new(TodoProvider::new());
    let stdin = io::stdin();
    let stdout = io::stdout();
    protocol::serve(&mut server, &args.address, stdin.lock(), stdout.lock())
        .context("provider session failed")?;
    info!("provider stopped");
    Ok(())
}
