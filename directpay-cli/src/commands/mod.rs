//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod charge;
mod order;

pub use charge::ChargeCommands;
pub use order::OrderCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Charge submission and review
    Charge {
        #[command(subcommand)]
        command: ChargeCommands,
    },
    /// Show the available balance
    Balance,
    /// Pay for orders with the balance
    Order {
        #[command(subcommand)]
        command: OrderCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Charge { command } => charge::handle_charge_command(command, config).await,
        Commands::Balance => charge::show_balance(config).await,
        Commands::Order { command } => order::handle_order_command(command, config).await,
    }
}
