//! Set-token command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use atpg_core::Credential;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct SetTokenArgs {
    /// Bearer token from the OAuth callback
    #[arg(long)]
    pub token: String,

    /// Refresh token from the OAuth callback
    #[arg(long)]
    pub refresh_token: Option<String>,
}

pub async fn run(args: SetTokenArgs, ctx: &Context) -> Result<()> {
    ctx.credentials()?
        .save(&Credential::new(args.token, args.refresh_token))
        .context("Failed to store token")?;

    output::success("Token stored");
    Ok(())
}
