//! Refresh command implementation.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    if !client.is_authenticated()? {
        anyhow::bail!("No stored token. Run 'atpg auth login' first.");
    }

    eprintln!("{}", "Refreshing token...".dimmed());

    client.refresh().await.context("Failed to refresh token")?;

    output::success("Token refreshed successfully");
    Ok(())
}
