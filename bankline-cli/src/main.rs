//! Bankline CLI - a small bank in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{config, demo, session};

/// Bankline - clients, accounts, deposits and withdrawals in your terminal
#[derive(Parser)]
#[command(name = "bl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive banking session (default)
    Session,

    /// Run a scripted session and print the resulting statement
    Demo {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change default account limits
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None | Some(Commands::Session) => session::run(),
        Some(Commands::Demo { json }) => demo::run(json),
        Some(Commands::Config { command }) => config::run(command),
    }
}
