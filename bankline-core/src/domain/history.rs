//! Per-account transaction history

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transaction::{Transaction, TransactionKind};

/// Append-only, insertion-ordered log of an account's successful transactions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<Transaction>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transaction. Only reachable through `Transaction::apply`.
    pub(crate) fn record(&mut self, transaction: Transaction) {
        self.entries.push(transaction);
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded transactions of `kind` dated `date`
    pub fn count_on(&self, kind: TransactionKind, date: NaiveDate) -> usize {
        self.entries
            .iter()
            .filter(|tx| tx.kind() == kind && tx.date() == date)
            .count()
    }

    /// Number of withdrawals recorded on `date`
    pub fn withdrawals_on(&self, date: NaiveDate) -> usize {
        self.count_on(TransactionKind::Withdrawal, date)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
