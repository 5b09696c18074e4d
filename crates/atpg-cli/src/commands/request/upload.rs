//! Multipart upload command.

use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use clap::Args;

use atpg_http::multipart::{Form, Part};

use crate::context::Context;

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Request path, starting with '/'
    pub path: String,

    /// File to upload
    #[arg(short, long)]
    pub file: PathBuf,

    /// Form field name for the file
    #[arg(long, default_value = "file")]
    pub field: String,

    /// Extra text fields as key=value (repeatable)
    #[arg(long = "text", value_name = "KEY=VALUE")]
    pub text: Vec<String>,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

pub async fn upload(args: UploadArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let mut form = Form::new().part(args.field.clone(), Part::bytes(bytes).file_name(file_name));
    for pair in &args.text {
        let (key, value) = split_field(pair)?;
        form = form.text(key.to_string(), value.to_string());
    }

    let value = client.upload_file(&args.path, form).await?;
    super::print(&value, args.compact)
}

fn split_field(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Invalid --text '{}', expected KEY=VALUE", pair),
    }
}
