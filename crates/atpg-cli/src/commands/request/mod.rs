//! Raw request commands.

mod upload;

use anyhow::{Context as _, Result};
use clap::Args;
use serde_json::Value;

use atpg_core::Api;

use crate::context::Context;
use crate::output;

pub use upload::{UploadArgs, upload};

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Request path, starting with '/'
    pub path: String,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct BodyArgs {
    /// Request path, starting with '/'
    pub path: String,

    /// JSON request body
    #[arg(short, long)]
    pub data: Option<String>,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

impl BodyArgs {
    fn body(&self) -> Result<Option<Value>> {
        self.data
            .as_deref()
            .map(|data| serde_json::from_str(data).context("Invalid JSON in --data"))
            .transpose()
    }
}

pub async fn get(args: PathArgs, ctx: &Context) -> Result<()> {
    let value = ctx.client()?.get(&args.path).await?;
    print(&value, args.compact)
}

pub async fn delete(args: PathArgs, ctx: &Context) -> Result<()> {
    let value = ctx.client()?.delete(&args.path).await?;
    print(&value, args.compact)
}

pub async fn post(args: BodyArgs, ctx: &Context) -> Result<()> {
    let body = args.body()?;
    let value = ctx.client()?.post(&args.path, body).await?;
    print(&value, args.compact)
}

pub async fn put(args: BodyArgs, ctx: &Context) -> Result<()> {
    let body = args.body()?;
    let value = ctx.client()?.put(&args.path, body).await?;
    print(&value, args.compact)
}

pub async fn patch(args: BodyArgs, ctx: &Context) -> Result<()> {
    let body = args.body()?;
    let value = ctx.client()?.patch(&args.path, body).await?;
    print(&value, args.compact)
}

pub(crate) fn print(value: &Value, compact: bool) -> Result<()> {
    if compact {
        output::json(value)
    } else {
        output::json_pretty(value)
    }
}
