//! Demo command - a scripted session against a throwaway bank

use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;

use bankline_core::adapters::FixedClock;
use bankline_core::config::Config;
use bankline_core::services::{NewClient, Statement};
use bankline_core::{AccountNumber, BankContext, EntryPoint, TransactionKind};

use crate::output;

/// One scripted step and what the bank answered
#[derive(Debug, Serialize)]
struct DemoStep {
    operation: TransactionKind,
    amount: Decimal,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    balance: Decimal,
}

#[derive(Debug, Serialize)]
struct DemoReport {
    steps: Vec<DemoStep>,
    statement: Statement,
}

const SCRIPT: &[(TransactionKind, i64)] = &[
    (TransactionKind::Deposit, 100),
    (TransactionKind::Withdrawal, 50),
    (TransactionKind::Withdrawal, 600),
    (TransactionKind::Withdrawal, 100),
    (TransactionKind::Deposit, -5),
    (TransactionKind::Withdrawal, 10),
    (TransactionKind::Withdrawal, 10),
    (TransactionKind::Withdrawal, 10),
];

pub fn run(json: bool) -> Result<()> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 15)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .ok_or_else(|| anyhow::anyhow!("Invalid demo start time"))?;
    let clock = Arc::new(FixedClock::new(start));
    let ctx = BankContext::with_clock(Config::default(), clock.clone(), EntryPoint::Cli);

    ctx.client_service.create_individual(NewClient {
        tax_id: "12345678900".to_string(),
        full_name: "Ana Souza".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 4, 2)
            .ok_or_else(|| anyhow::anyhow!("Invalid demo birth date"))?,
        address: "Rua A, 10 - Centro - Recife/PE".to_string(),
    })?;
    let number = ctx.account_service.open_checking("12345678900", None)?.number;

    let mut steps = Vec::with_capacity(SCRIPT.len());
    for &(kind, amount) in SCRIPT {
        clock.advance(Duration::minutes(5));
        steps.push(run_step(&ctx, number, kind, Decimal::new(amount, 0))?);
    }

    let report = DemoReport {
        steps,
        statement: ctx.statement_service.statement(number)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n{}\n", "Bankline demo".bold());
    for step in &report.steps {
        let line = format!(
            "{:<10} {:>10}",
            step.operation.to_string(),
            output::format_money(step.amount)
        );
        match &step.reason {
            None => println!("  {} {}  balance {}", "✓".green(), line, output::format_money(step.balance)),
            Some(reason) => println!("  {} {}  {}", "✗".red(), line, reason.dimmed()),
        }
    }
    println!();
    output::print_statement(&report.statement);
    println!();

    Ok(())
}

fn run_step(
    ctx: &BankContext,
    number: AccountNumber,
    kind: TransactionKind,
    amount: Decimal,
) -> Result<DemoStep> {
    let result = match kind {
        TransactionKind::Deposit => ctx.account_service.deposit(number, amount)?,
        TransactionKind::Withdrawal => ctx.account_service.withdraw(number, amount)?,
    };
    let balance = ctx.statement_service.statement(number)?.balance;

    Ok(DemoStep {
        operation: kind,
        amount,
        accepted: result.success,
        reason: result.reason().map(str::to_string),
        balance,
    })
}
