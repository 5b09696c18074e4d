//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::auth::AuthCommand;
use crate::commands::request::{BodyArgs, PathArgs, UploadArgs};

/// ATP Global API CLI tool.
#[derive(Parser, Debug)]
#[command(name = "atpg")]
#[command(author, version = env!("ATPG_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL
    #[arg(long, env = "ATPG_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Credential store file (defaults to the per-user data directory)
    #[arg(long, env = "ATPG_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Deadline for each call in seconds, including refresh and retry
    #[arg(long, env = "ATPG_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Let concurrent calls share one token refresh
    #[arg(long, global = true)]
    pub share_refresh: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the stored credential
    Auth(AuthCommand),

    /// Send a GET request
    Get(PathArgs),

    /// Send a DELETE request
    Delete(PathArgs),

    /// Send a POST request with an optional JSON body
    Post(BodyArgs),

    /// Send a PUT request with an optional JSON body
    Put(BodyArgs),

    /// Send a PATCH request with an optional JSON body
    Patch(BodyArgs),

    /// Upload a file as multipart form data
    Upload(UploadArgs),
}
