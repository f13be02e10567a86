//! Transaction domain model

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::Account;
use super::result::Result;

/// What a transaction does to the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => write!(f, "Deposit"),
            TransactionKind::Withdrawal => write!(f, "Withdrawal"),
        }
    }
}

/// A single deposit or withdrawal
///
/// Immutable once created. The amount is not validated here: it is checked
/// against the target account when the transaction is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: Uuid,
    kind: TransactionKind,
    amount: Decimal,
    /// When the transaction was created (naive datetime, local time)
    timestamp: NaiveDateTime,
}

impl Transaction {
    /// Create a transaction of the given kind stamped at `timestamp`
    pub fn new(kind: TransactionKind, amount: Decimal, timestamp: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            timestamp,
        }
    }

    pub fn deposit(amount: Decimal, timestamp: NaiveDateTime) -> Self {
        Self::new(TransactionKind::Deposit, amount, timestamp)
    }

    pub fn withdrawal(amount: Decimal, timestamp: NaiveDateTime) -> Self {
        Self::new(TransactionKind::Withdrawal, amount, timestamp)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Calendar date the transaction belongs to
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Apply this transaction to `account`
    ///
    /// On success the transaction is appended to the account's history. On
    /// failure the account is left untouched and nothing is recorded, so the
    /// history only ever holds successful operations.
    pub fn apply(self, account: &mut Account) -> Result<()> {
        match self.kind {
            TransactionKind::Deposit => account.deposit(self.amount)?,
            TransactionKind::Withdrawal => account.withdraw(self.amount, self.date())?,
        }
        account.history_mut().record(self);
        Ok(())
    }
}
