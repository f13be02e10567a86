//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_decimal::{Decimal, RoundingStrategy};

use bankline_core::services::{AccountSummary, Statement};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format an amount rounded half away from zero to two decimal places
pub fn format_money(amount: Decimal) -> String {
    let cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("$ {:.2}", cents)
}

/// Print a table of accounts
pub fn print_accounts(accounts: &[AccountSummary]) {
    let mut table = create_table();
    table.set_header(vec!["Branch", "Account", "Holder", "Type", "Balance"]);
    for account in accounts {
        table.add_row(vec![
            account.branch.clone(),
            account.number.to_string(),
            account.holder.clone(),
            account.kind.clone(),
            format_money(account.balance),
        ]);
    }
    println!("{}", table);
}

/// Print a statement: one row per transaction, then the balance
pub fn print_statement(statement: &Statement) {
    println!(
        "{}",
        format!(
            "Statement - branch {} account {} ({})",
            statement.account.branch, statement.account.number, statement.account.holder
        )
        .bold()
    );

    if statement.is_empty() {
        println!("{}", "No transactions recorded.".dimmed());
    } else {
        let mut table = create_table();
        table.set_header(vec!["Time", "Type", "Amount"]);
        for line in &statement.lines {
            table.add_row(vec![
                line.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                line.kind.to_string(),
                format_money(line.amount),
            ]);
        }
        println!("{}", table);
    }

    println!("Balance: {}", format_money(statement.balance).bold());
    if let Some(left) = statement.account.withdrawals_left_today {
        println!("{}", format!("Withdrawals left today: {}", left).dimmed());
    }
}
