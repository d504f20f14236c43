//! Order command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use directpay_client::SettlementResult;

use crate::config::Config;

/// Order subcommands
#[derive(Subcommand)]
pub enum OrderCommands {
    /// Pay for an order with the available balance
    Settle {
        /// Order reference number
        order_id: i64,
    },
}

/// Handle order commands
pub async fn handle_order_command(command: OrderCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        OrderCommands::Settle { order_id } => {
            let result = client
                .settle_order(order_id)
                .await
                .with_context(|| format!("Failed to settle order {}", order_id))?;

            match result {
                SettlementResult::Receipt(location) => {
                    println!("{}", format!("Order {} purchased.", order_id).green().bold());
                    println!("  Receipt: {}", location.cyan());
                }
                SettlementResult::Message(msg) => {
                    println!("{} {}", format!("Order {}:", order_id).bold(), msg.yellow());
                }
            }

            Ok(())
        }
    }
}
