//! Direct Payments CLI
//!
//! Command-line interface for submitting, reviewing and spending direct
//! payment charges.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "directpay")]
#[command(about = "Direct payments CLI", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(
        long,
        env = "DIRECTPAY_SERVER_URL",
        default_value = "http://localhost:8080"
    )]
    server_url: String,

    /// API token used as the bearer credential
    #[arg(long, env = "DIRECTPAY_TOKEN", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
        token: cli.token,
    };

    handle_command(cli.command, &config).await
}
