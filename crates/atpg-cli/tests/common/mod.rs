use std::path::{Path, PathBuf};
use std::process::Output;

use tempfile::TempDir;
use tokio::process::Command;

/// An isolated credential store and home directory for one test.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("credentials.json")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run the CLI binary against `api_url` with this sandbox's store.
    pub async fn run(&self, api_url: &str, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_atpg"));
        cmd.args(args);
        cmd.env("ATPG_API_URL", api_url);
        cmd.env("ATPG_STORE", self.store_path());
        cmd.env_remove("ATPG_TIMEOUT");
        cmd.env_remove("RUST_LOG");
        cmd.env("NO_COLOR", "1");
        cmd.env("HOME", self.path());
        cmd.env("XDG_DATA_HOME", self.path().join("data"));
        cmd.output().await.expect("Failed to execute CLI")
    }

    /// Run the CLI with this sandbox's store and no API URL configured.
    pub async fn run_offline(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_atpg"));
        cmd.args(args);
        cmd.env_remove("ATPG_API_URL");
        cmd.env("ATPG_STORE", self.store_path());
        cmd.env_remove("ATPG_TIMEOUT");
        cmd.env_remove("RUST_LOG");
        cmd.env("NO_COLOR", "1");
        cmd.env("HOME", self.path());
        cmd.env("XDG_DATA_HOME", self.path().join("data"));
        cmd.output().await.expect("Failed to execute CLI")
    }

    /// Run the CLI and expect success, returning stdout.
    pub async fn run_success(&self, api_url: &str, args: &[&str]) -> String {
        let output = self.run(api_url, args).await;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run the CLI and expect failure, returning stderr.
    pub async fn run_failure(&self, api_url: &str, args: &[&str]) -> String {
        let output = self.run(api_url, args).await;
        if output.status.success() {
            panic!("CLI command should have failed: {:?}", args);
        }
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}
