//! Statement service - balances and transaction listings

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::memory::{lock_client, MemoryRegistry};
use crate::domain::result::Error;
use crate::domain::{AccountNumber, TransactionKind};
use crate::ports::Clock;

use super::account::AccountSummary;

#[derive(Debug, Clone, Serialize)]
pub struct StatementLine {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub timestamp: NaiveDateTime,
}

/// Account summary plus every recorded transaction, oldest first
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub account: AccountSummary,
    pub lines: Vec<StatementLine>,
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    pub balance: Decimal,
}

impl Statement {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Statement service for read-only views
pub struct StatementService {
    registry: Arc<MemoryRegistry>,
    clock: Arc<dyn Clock>,
}

impl StatementService {
    pub fn new(registry: Arc<MemoryRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// Statement for account `number`
    pub fn statement(&self, number: AccountNumber) -> Result<Statement> {
        let owner = self
            .registry
            .client_for_account(number)?
            .ok_or_else(|| Error::not_found(format!("account {}", number)))?;
        let client = lock_client(&owner)?;
        let account = client
            .account(number)
            .ok_or_else(|| Error::not_found(format!("account {}", number)))?;

        let mut total_deposits = Decimal::ZERO;
        let mut total_withdrawals = Decimal::ZERO;
        let lines: Vec<StatementLine> = account
            .history()
            .iter()
            .map(|tx| {
                match tx.kind() {
                    TransactionKind::Deposit => total_deposits += tx.amount(),
                    TransactionKind::Withdrawal => total_withdrawals += tx.amount(),
                }
                StatementLine {
                    id: tx.id(),
                    kind: tx.kind(),
                    amount: tx.amount(),
                    timestamp: tx.timestamp(),
                }
            })
            .collect();

        Ok(Statement {
            account: AccountSummary::from_account(account, &client, self.clock.today()),
            lines,
            total_deposits,
            total_withdrawals,
            balance: account.balance(),
        })
    }

    /// Every account in the registry, ordered by account number
    pub fn list_accounts(&self) -> Result<Vec<AccountSummary>> {
        let today = self.clock.today();
        let mut summaries = Vec::new();
        for shared in self.registry.clients()? {
            let client = lock_client(&shared)?;
            summaries.extend(
                client
                    .accounts()
                    .iter()
                    .map(|account| AccountSummary::from_account(account, &client, today)),
            );
        }
        summaries.sort_by_key(|s| s.number);
        Ok(summaries)
    }
}
