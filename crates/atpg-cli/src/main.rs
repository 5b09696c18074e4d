//! atpg - CLI tool for the ATP Global API.
//!
//! This is a thin wrapper over `atpg-http`, intended for manual exploration
//! and debugging of the backend with the same credential handling the portal
//! uses.

mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{auth, request};
use context::Context;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    if let Err(err) = run(cli).await {
        report(&err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::new(&cli);

    match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd, &ctx).await,
        Commands::Get(args) => request::get(args, &ctx).await,
        Commands::Delete(args) => request::delete(args, &ctx).await,
        Commands::Post(args) => request::post(args, &ctx).await,
        Commands::Put(args) => request::put(args, &ctx).await,
        Commands::Patch(args) => request::patch(args, &ctx).await,
        Commands::Upload(args) => request::upload(args, &ctx).await,
    }
}

/// Print API failures as `status: message`, anything else with its context.
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<atpg_core::Error>() {
        Some(api) => output::error(&format!("{}: {}", api.status(), api.message())),
        None => output::error(&format!("{:#}", err)),
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
