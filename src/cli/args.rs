//! CLI argument definitions using clap derive

use crate::config::DEFAULT_CONFIG_PATH;
use crate::error::Result;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::io::Write;

/// Batch reminder for open merge requests and feed items
///
/// Scans the configured integrations once and posts a digest to chat.
#[derive(Parser, Debug)]
#[command(name = "remind-us")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, env = "REMIND_US_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config_file: String,

    /// Print version and exit
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Render and log messages without delivering them
    #[arg(long)]
    pub dry_run: bool,

    /// GitLab access token, overrides the config file
    #[arg(long, env = "REMIND_US_GITLAB_TOKEN", hide_env_values = true)]
    pub gitlab_token: Option<String>,

    /// Slack webhook URL, overrides the config file
    #[arg(long, env = "REMIND_US_SLACK_WEBHOOK", hide_env_values = true)]
    pub slack_webhook: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// `remind-us <version> (<os>, <arch>)`
pub fn version_string() -> String {
    format!(
        "remind-us {} ({}, {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Render the completion script for a shell
pub fn completions_script(shell: Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    let mut script = Vec::new();
    clap_complete::generate(shell, &mut cmd, name, &mut script);
    script
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) -> Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(&completions_script(shell))?;
    out.flush()?;
    Ok(())
}
