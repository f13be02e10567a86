//! Session command - interactive banking menu

use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use dialoguer::{Input, Select};

use bankline_core::services::{NewClient, TransactionReceipt};
use bankline_core::{AccountNumber, BankContext, OperationResult, TransactionKind};

use super::{get_context, parse_amount};
use crate::output;

const BIRTH_DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Deposit,
    Withdraw,
    Statement,
    NewAccount,
    ListAccounts,
    NewClient,
    Logs,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 8] = [
        MenuItem::Deposit,
        MenuItem::Withdraw,
        MenuItem::Statement,
        MenuItem::NewAccount,
        MenuItem::ListAccounts,
        MenuItem::NewClient,
        MenuItem::Logs,
        MenuItem::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuItem::Deposit => "Deposit",
            MenuItem::Withdraw => "Withdraw",
            MenuItem::Statement => "Statement",
            MenuItem::NewAccount => "New account",
            MenuItem::ListAccounts => "List accounts",
            MenuItem::NewClient => "New client",
            MenuItem::Logs => "Logs",
            MenuItem::Quit => "Quit",
        }
    }

    fn command(self) -> &'static str {
        match self {
            MenuItem::Deposit => "deposit",
            MenuItem::Withdraw => "withdraw",
            MenuItem::Statement => "statement",
            MenuItem::NewAccount => "new_account",
            MenuItem::ListAccounts => "list_accounts",
            MenuItem::NewClient => "new_client",
            MenuItem::Logs => "logs",
            MenuItem::Quit => "quit",
        }
    }
}

/// Interactive state: the context plus the last client the user worked with
struct Session {
    ctx: BankContext,
    current_tax_id: Option<String>,
}

pub fn run() -> Result<()> {
    let mut session = Session {
        ctx: get_context()?,
        current_tax_id: None,
    };
    let _ = session.ctx.logger.log_event("session_started");

    println!("\n{}", "Bankline".bold());
    println!("{}\n", "Start with \"New client\" and \"New account\".".dimmed());

    let labels: Vec<&str> = MenuItem::ALL.iter().map(|item| item.label()).collect();
    loop {
        let choice = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;
        let item = MenuItem::ALL[choice];
        let _ = session.ctx.logger.log_command(item.command());

        if item == MenuItem::Quit {
            break;
        }
        if let Err(e) = session.handle(item) {
            output::error(&format!("{:#}", e));
        }
        println!();
    }

    let _ = session.ctx.logger.log_event("session_ended");
    println!("{}", "Goodbye.".dimmed());
    Ok(())
}

impl Session {
    fn handle(&mut self, item: MenuItem) -> Result<()> {
        match item {
            MenuItem::Deposit => self.transact(TransactionKind::Deposit),
            MenuItem::Withdraw => self.transact(TransactionKind::Withdrawal),
            MenuItem::Statement => self.statement(),
            MenuItem::NewAccount => self.new_account(),
            MenuItem::ListAccounts => self.list_accounts(),
            MenuItem::NewClient => self.new_client(),
            MenuItem::Logs => self.logs(),
            MenuItem::Quit => Ok(()),
        }
    }

    fn ask_tax_id(&mut self) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt("Client tax id");
        if let Some(current) = &self.current_tax_id {
            input = input.default(current.clone());
        }
        let tax_id = input.interact_text()?.trim().to_string();
        self.current_tax_id = Some(tax_id.clone());
        Ok(tax_id)
    }

    /// The first account of the client the user names
    fn select_account(&mut self) -> Result<AccountNumber> {
        let tax_id = self.ask_tax_id()?;
        let accounts = self.ctx.account_service.accounts_of(&tax_id)?;
        accounts
            .first()
            .map(|account| account.number)
            .with_context(|| format!("Client {} has no account yet", tax_id))
    }

    fn transact(&mut self, kind: TransactionKind) -> Result<()> {
        let number = self.select_account()?;
        let raw: String = Input::new().with_prompt("Amount").interact_text()?;
        let amount = parse_amount(&raw)?;

        let result = match kind {
            TransactionKind::Deposit => self.ctx.account_service.deposit(number, amount)?,
            TransactionKind::Withdrawal => self.ctx.account_service.withdraw(number, amount)?,
        };
        report_transaction(&result);
        Ok(())
    }

    fn statement(&mut self) -> Result<()> {
        let number = self.select_account()?;
        let statement = self.ctx.statement_service.statement(number)?;
        println!();
        output::print_statement(&statement);
        Ok(())
    }

    fn new_account(&mut self) -> Result<()> {
        let tax_id = self.ask_tax_id()?;
        let account = self.ctx.account_service.open_checking(&tax_id, None)?;

        output::success(&format!(
            "Checking account {} opened at branch {} for {}",
            account.number, account.branch, account.holder
        ));
        if let Some(limits) = account.limits {
            output::info(&format!(
                "Limit {} per withdrawal, {} withdrawals per day",
                output::format_money(limits.per_withdrawal),
                limits.daily_withdrawals
            ));
        }
        Ok(())
    }

    fn list_accounts(&mut self) -> Result<()> {
        let accounts = self.ctx.statement_service.list_accounts()?;
        if accounts.is_empty() {
            output::warning("No accounts yet.");
            return Ok(());
        }
        output::print_accounts(&accounts);
        Ok(())
    }

    fn new_client(&mut self) -> Result<()> {
        let tax_id: String = Input::new().with_prompt("Tax id (digits only)").interact_text()?;
        let full_name: String = Input::new().with_prompt("Full name").interact_text()?;
        let birth_raw: String = Input::new()
            .with_prompt("Birth date (dd-mm-yyyy)")
            .interact_text()?;
        let birth_date = NaiveDate::parse_from_str(birth_raw.trim(), BIRTH_DATE_FORMAT)
            .map_err(|_| anyhow::anyhow!("Invalid date format. Use dd-mm-yyyy"))?;
        let address: String = Input::new()
            .with_prompt("Address (street, number - district - city/state)")
            .interact_text()?;

        let client = self.ctx.client_service.create_individual(NewClient {
            tax_id,
            full_name,
            birth_date,
            address,
        })?;
        self.current_tax_id = Some(client.tax_id.clone());

        output::success(&format!("Client {} registered", client.full_name));
        Ok(())
    }

    fn logs(&mut self) -> Result<()> {
        let entries = self.ctx.logger.get_recent(15)?;
        if entries.is_empty() {
            output::warning("No log entries yet.");
            return Ok(());
        }

        let mut table = output::create_table();
        table.set_header(vec!["Event", "Command", "Error"]);
        for entry in entries {
            table.add_row(vec![
                entry.event,
                entry.command.unwrap_or_default(),
                entry.error_message.unwrap_or_default(),
            ]);
        }
        println!("{}", table);

        let stats = self.ctx.logger.stats()?;
        println!(
            "{}",
            format!(
                "{} entries ({} errors, {} dropped, keeping {})",
                stats.total, stats.errors, stats.dropped, stats.max_entries
            )
            .dimmed()
        );
        Ok(())
    }
}

fn report_transaction(result: &OperationResult<TransactionReceipt>) {
    match (&result.data, result.reason()) {
        (Some(receipt), _) => output::success(&format!(
            "{} of {} done. Balance: {}",
            receipt.kind,
            output::format_money(receipt.amount),
            output::format_money(receipt.balance)
        )),
        (None, Some(reason)) => output::error(&format!("Operation refused: {}", reason)),
        (None, None) => output::error("Operation refused"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_labels_unique() {
        let mut labels: Vec<_> = MenuItem::ALL.iter().map(|item| item.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), MenuItem::ALL.len());
        assert_eq!(MenuItem::ALL.last(), Some(&MenuItem::Quit));
    }

    #[test]
    fn test_birth_date_format() {
        let date = NaiveDate::parse_from_str("02-04-1990", BIRTH_DATE_FORMAT).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1990, 4, 2).unwrap());
        assert!(NaiveDate::parse_from_str("1990-04-02", BIRTH_DATE_FORMAT).is_err());
    }
}
