//! Command-line surface for the budget tracker.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use shared::{BudgetCommand, CurrencyKind};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Track dining dollars, tiger bucks and cash against a daily allowance
#[derive(Parser)]
#[command(name = "budget-tracker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Data directory (defaults to BUDGET_TRACKER_DATA_DIR or ~/Documents/Budget Tracker)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// User to act for (defaults to the active user)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Print the response as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up a budget with starting balances and an end date
    Setup {
        /// End date (YYYY-MM-DD), must be in the future
        end_date: NaiveDate,
        #[arg(long, default_value_t = 0.0)]
        dining: f64,
        #[arg(long, default_value_t = 0.0)]
        tiger: f64,
        #[arg(long, default_value_t = 0.0)]
        usd: f64,
    },
    /// Show balances, today's allowance and upcoming breaks
    Report,
    /// List transactions, optionally between two dates
    Transactions {
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
    },
    /// Record money spent
    Spend {
        amount: f64,
        description: String,
        /// dining, tiger or usd
        #[arg(short, long)]
        currency: CurrencyKind,
    },
    /// Record money added
    Credit {
        amount: f64,
        description: String,
        #[arg(short, long)]
        currency: CurrencyKind,
    },
    /// Spread what is left over the remaining days
    Respread,
    /// Move the budget end date
    SetEndDate { end_date: NaiveDate },
    /// Minimum daily budget a respread may set
    SetFloor { floor: f64 },
    /// Overwrite a balance without recording a transaction
    SetBalance {
        currency: CurrencyKind,
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
    /// List scheduled breaks
    ListBreaks,
    /// Schedule a break (inclusive dates)
    AddBreak { start: NaiveDate, end: NaiveDate },
    /// Remove a break by its list index
    RemoveBreak { index: usize },
    /// Make a user the default for later commands
    UseUser { name: String },
}

impl Commands {
    /// The backend command, or `None` for commands handled by the CLI itself
    pub fn into_budget_command(self) -> Option<BudgetCommand> {
        let command = match self {
            Commands::Setup {
                end_date,
                dining,
                tiger,
                usd,
            } => {
                let mut starting_balances = BTreeMap::new();
                starting_balances.insert(CurrencyKind::DiningDollars, dining);
                starting_balances.insert(CurrencyKind::TigerBucks, tiger);
                starting_balances.insert(CurrencyKind::Usd, usd);
                BudgetCommand::Setup {
                    starting_balances,
                    end_date,
                }
            }
            Commands::Report => BudgetCommand::Report,
            Commands::Transactions { start, end } => BudgetCommand::Transactions {
                start_date: start,
                end_date: end,
            },
            Commands::Spend {
                amount,
                description,
                currency,
            } => BudgetCommand::Spend {
                amount,
                description,
                currency,
            },
            Commands::Credit {
                amount,
                description,
                currency,
            } => BudgetCommand::Credit {
                amount,
                description,
                currency,
            },
            Commands::Respread => BudgetCommand::Respread,
            Commands::SetEndDate { end_date } => BudgetCommand::SetEndDate { end_date },
            Commands::SetFloor { floor } => BudgetCommand::SetFloor { floor },
            Commands::SetBalance { currency, amount } => {
                BudgetCommand::SetBalance { currency, amount }
            }
            Commands::ListBreaks => BudgetCommand::ListBreaks,
            Commands::AddBreak { start, end } => BudgetCommand::AddBreak { start, end },
            Commands::RemoveBreak { index } => BudgetCommand::RemoveBreak { index },
            Commands::UseUser { .. } => return None,
        };
        Some(command)
    }
}
