//! Command-line interface.

pub mod completions;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::constants::{DEFAULT_POLL_INTERVAL, DEFAULT_STACK_TIMEOUT};
use crate::error::{ConfigError, Result};

use self::context::Context;

/// Tubes - ephemeral AWS environments for bootstrapping BOSH.
#[derive(Parser, Debug)]
#[command(
    name = "tubes",
    about = "Provision and tear down ephemeral AWS environments for bootstrapping BOSH",
    version,
    after_help = "Commands: up, down, show"
)]
pub struct Cli {
    /// Environment name, used for the stack, the keypair and the state directory
    #[arg(short, long, global = true, env = "TUBES_NAME")]
    pub name: Option<String>,

    /// State directory (default: ./environments/<name>)
    #[arg(long, global = true, env = "TUBES_STATE_DIR", value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(flatten)]
    pub aws: AwsArgs,

    #[command(flatten)]
    pub wait: WaitArgs,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// AWS credentials and endpoints.
#[derive(Args, Debug)]
pub struct AwsArgs {
    /// AWS region
    #[arg(long, global = true, env = "AWS_DEFAULT_REGION", hide_env_values = true)]
    pub region: Option<String>,

    /// AWS access key id
    #[arg(long, global = true, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, global = true, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// JSON object of per-service endpoint overrides, e.g. {"ec2": "http://..."}
    #[arg(long, global = true, env = "TUBES_AWS_ENDPOINTS", value_name = "JSON")]
    pub aws_endpoints: Option<String>,
}

/// Stack wait tuning.
#[derive(Args, Debug)]
pub struct WaitArgs {
    /// Seconds to wait for a stack to settle
    #[arg(
        long,
        global = true,
        env = "TUBES_STACK_TIMEOUT",
        value_name = "SECS",
        default_value_t = DEFAULT_STACK_TIMEOUT.as_secs()
    )]
    pub stack_timeout: u64,

    /// Seconds between stack status checks
    #[arg(
        long,
        global = true,
        env = "TUBES_POLL_INTERVAL",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..),
        default_value_t = DEFAULT_POLL_INTERVAL.as_secs()
    )]
    pub poll_interval: u64,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Boot a fresh environment
    Up,

    /// Tear the environment down
    Down,

    /// Print the environment's SSH private key
    Show,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute the parsed command line.
pub fn execute(cli: &Cli) -> Result<()> {
    match cli.command {
        None => Err(ConfigError::NoCommand.into()),
        Some(Command::Completions { shell }) => completions::execute(shell),
        Some(Command::Up) => Context::from_cli(cli)?.up(),
        Some(Command::Down) => Context::from_cli(cli)?.down(),
        Some(Command::Show) => Context::from_cli(cli)?.show(),
    }
}
