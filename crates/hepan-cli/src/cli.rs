//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::commands::Commands;

/// Command line tool for the Qingshuihepan forum.
#[derive(Parser, Debug)]
#[command(name = "hepan")]
#[command(author, version = env!("HEPAN_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub account: AccountArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to connect and as whom. Overrides the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct AccountArgs {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "HEPAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Forum base URL
    #[arg(long, global = true, env = "HEPAN_FORUM")]
    pub forum: Option<String>,

    /// Account to log in with
    #[arg(short, long, global = true, env = "HEPAN_USERNAME")]
    pub username: Option<String>,

    /// Password for the account
    #[arg(long, global = true, env = "HEPAN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}
