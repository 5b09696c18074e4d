//! Status command implementation.

use anyhow::Result;
use clap::Args;

use atpg_core::CredentialStore;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct StatusArgs {}

pub async fn run(_args: StatusArgs, ctx: &Context) -> Result<()> {
    let file = ctx.file_store()?;
    let credential = CredentialStore::new(file.clone()).credential()?;

    if let Some(api_url) = ctx.api_url() {
        output::field("API", api_url);
    }
    output::field("Store", &file.path().display().to_string());

    match credential {
        Some(credential) => {
            output::field("Authenticated", "yes");
            output::field(
                "Token",
                &format!("[REDACTED] ({} chars)", credential.token.as_str().len()),
            );
            output::field(
                "Refresh token",
                if credential.refresh_token.is_some() {
                    "present"
                } else {
                    "absent"
                },
            );
        }
        None => output::field("Authenticated", "no"),
    }

    if let Some(updated) = file.updated_at()? {
        let local = updated.with_timezone(&chrono::Local);
        output::field("Updated", &local.format("%Y-%m-%d %H:%M:%S").to_string());
    }

    Ok(())
}
