//! Credential subcommand implementations.

mod login;
mod logout;
mod refresh;
mod set_token;
mod status;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::context::Context;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in with email and password
    Login(login::LoginArgs),

    /// Store a token obtained from the OAuth callback
    SetToken(set_token::SetTokenArgs),

    /// Forget the stored credential
    Logout(logout::LogoutArgs),

    /// Display the stored credential state
    Status(status::StatusArgs),

    /// Exchange the stored token for a new one
    Refresh(refresh::RefreshArgs),
}

pub async fn handle(cmd: AuthCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(args, ctx).await,
        AuthSubcommand::SetToken(args) => set_token::run(args, ctx).await,
        AuthSubcommand::Logout(args) => logout::run(args, ctx).await,
        AuthSubcommand::Status(args) => status::run(args, ctx).await,
        AuthSubcommand::Refresh(args) => refresh::run(args, ctx).await,
    }
}
