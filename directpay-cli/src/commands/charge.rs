//! Charge command handlers
//!
//! Handles submitting, listing and reviewing charges, and showing the
//! balance they add up to.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use directpay_core::domain::charge::{Charge, ChargeStatus};

use crate::config::Config;

/// Charge subcommands
#[derive(Subcommand)]
pub enum ChargeCommands {
    /// List your charges
    List,
    /// Show a charge and its comments
    Show {
        /// Charge ID
        id: i64,
    },
    /// Submit a new charge
    New {
        /// Proof-of-payment file to attach
        attachment: PathBuf,

        /// Amount paid, in minor units
        #[arg(short, long, default_value = "0")]
        amount: i64,

        /// Notes for the reviewer
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// Hide a charge from your listing
    Remove {
        /// Charge ID
        id: i64,
    },
    /// Change the amount of a charge
    Amount {
        /// Charge ID
        id: i64,

        /// New amount, in minor units
        amount: i64,
    },
    /// Set the status of a charge (pending, rejected, canceled, approved)
    Status {
        /// Charge ID
        id: i64,

        /// New status
        status: ChargeStatus,
    },
    /// Comment on a charge
    Comment {
        /// Charge ID
        id: i64,

        /// Comment text
        content: String,
    },
}

/// Handle charge commands
///
/// Routes charge subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The charge command to execute
/// * `config` - The CLI configuration
pub async fn handle_charge_command(command: ChargeCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        ChargeCommands::List => {
            let charges = client.list_charges().await.context("Failed to list charges")?;

            if charges.is_empty() {
                println!("{}", "No charges submitted.".yellow());
            } else {
                println!("{}", format!("Found {} charge(s):", charges.len()).bold());
                println!();
                for charge in &charges {
                    print_charge_summary(charge);
                }
            }
            Ok(())
        }
        ChargeCommands::Show { id } => {
            let detail = client
                .get_charge(id)
                .await
                .with_context(|| format!("Failed to get charge {}", id))?;

            print_charge_summary(&detail.charge);
            println!("    Attachment:   {}", detail.charge.attachment.dimmed());
            if !detail.charge.is_shown {
                println!("    {}", "(removed)".dimmed());
            }

            if detail.comments.is_empty() {
                println!("    {}", "No comments.".dimmed());
            } else {
                println!("    {}", "Comments:".bold());
                for comment in &detail.comments {
                    println!(
                        "      {} user {}: {}",
                        comment
                            .created_at
                            .format("%Y-%m-%d %H:%M:%S")
                            .to_string()
                            .dimmed(),
                        comment.author_id,
                        comment.content
                    );
                }
            }
            Ok(())
        }
        ChargeCommands::New {
            attachment,
            amount,
            notes,
        } => {
            client
                .new_charge(amount, &notes, &attachment)
                .await
                .context("Failed to submit charge")?;

            println!("{}", "Charge submitted for review.".green().bold());
            Ok(())
        }
        ChargeCommands::Remove { id } => {
            let msg = client
                .remove_charge(id)
                .await
                .with_context(|| format!("Failed to remove charge {}", id))?;
            print_done(id, &msg);
            Ok(())
        }
        ChargeCommands::Amount { id, amount } => {
            let msg = client
                .update_charge_amount(id, amount)
                .await
                .with_context(|| format!("Failed to update amount of charge {}", id))?;
            print_done(id, &msg);
            Ok(())
        }
        ChargeCommands::Status { id, status } => {
            let msg = client
                .update_charge_status(id, status)
                .await
                .with_context(|| format!("Failed to update status of charge {}", id))?;
            print_done(id, &msg);
            Ok(())
        }
        ChargeCommands::Comment { id, content } => {
            let msg = client
                .add_charge_comment(id, &content)
                .await
                .with_context(|| format!("Failed to comment on charge {}", id))?;
            print_done(id, &msg);
            Ok(())
        }
    }
}

/// Show the caller's balance
pub async fn show_balance(config: &Config) -> Result<()> {
    let client = config.client()?;
    let balance = client.get_balance().await.context("Failed to get balance")?;

    println!("{}", "Balance".bold());
    println!("    Approved:     {}", balance.approved_total);
    println!("    Spent:        {}", balance.spent_total);
    println!(
        "    Available:    {}",
        balance.current_balance().to_string().green().bold()
    );
    Ok(())
}

fn print_done(id: i64, msg: &str) {
    println!("{} {}", format!("Charge {}:", id).bold(), msg.green());
}

/// Print a charge summary
fn print_charge_summary(charge: &Charge) {
    println!("  {} Charge {}", "▸".cyan(), charge.id.to_string().bold());
    println!("    Status:       {}", colorize_status(charge.status));
    println!("    Amount:       {}", charge.amount);
    println!(
        "    Submitted:    {}",
        charge
            .created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    if !charge.user_notes.is_empty() {
        println!("    Notes:        {}", charge.user_notes);
    }
    println!();
}

/// Colorize charge status for display
fn colorize_status(status: ChargeStatus) -> ColoredString {
    let status_str = status.as_str();
    match status {
        ChargeStatus::Approved => status_str.green(),
        ChargeStatus::Pending => status_str.yellow(),
        ChargeStatus::Rejected => status_str.red(),
        ChargeStatus::Canceled => status_str.dimmed(),
    }
}
