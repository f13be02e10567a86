//! Config command - show or change default account limits

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use rust_decimal::Decimal;

use bankline_core::config::Config;

use super::get_bankline_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change the defaults used for new checking accounts
    Set {
        /// Ceiling of a single withdrawal
        #[arg(long)]
        withdrawal_limit: Option<Decimal>,
        /// Withdrawals allowed per calendar day
        #[arg(long)]
        daily_withdrawals: Option<u32>,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let bankline_dir = get_bankline_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&bankline_dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
                return Ok(());
            }

            println!("\n{}", "Settings".bold());
            println!("  Directory:          {}", bankline_dir.display());
            println!("  Withdrawal limit:   {}", output::format_money(config.withdrawal_limit));
            println!("  Daily withdrawals:  {}", config.daily_withdrawals);
            println!("  Log entries kept:   {}\n", config.max_log_entries);
        }
        ConfigCommands::Set {
            withdrawal_limit,
            daily_withdrawals,
        } => {
            if withdrawal_limit.is_none() && daily_withdrawals.is_none() {
                output::warning("Nothing to change. Pass --withdrawal-limit or --daily-withdrawals.");
                return Ok(());
            }

            let mut config = Config::load(&bankline_dir)?;
            if let Some(limit) = withdrawal_limit {
                config.withdrawal_limit = limit;
            }
            if let Some(count) = daily_withdrawals {
                config.daily_withdrawals = count;
            }
            config.save(&bankline_dir)?;

            output::success("Settings saved");
            output::info("New checking accounts will use these limits.");
        }
    }

    Ok(())
}
