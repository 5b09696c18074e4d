//! Login command implementation.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use atpg_core::Api;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: LoginArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    eprintln!("{}", "Logging in...".dimmed());

    let credential = client
        .login(&args.email, &args.password)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("API", client.base_url().as_str());
    output::field(
        "Refresh token",
        if credential.refresh_token.is_some() {
            "stored"
        } else {
            "none"
        },
    );

    Ok(())
}
