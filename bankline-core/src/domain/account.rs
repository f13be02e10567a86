//! Account domain model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::client::ClientId;
use super::history::History;
use super::result::{Error, Result};

/// Account numbers are assigned monotonically by the registry
pub type AccountNumber = u64;

/// Every account belongs to the single branch
pub const BRANCH_CODE: &str = "0001";

/// Ceilings applied to checking account withdrawals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckingLimits {
    /// Largest amount a single withdrawal may take
    pub per_withdrawal: Decimal,
    /// Withdrawals allowed per calendar day
    pub daily_withdrawals: u32,
}

impl CheckingLimits {
    pub fn new(per_withdrawal: Decimal, daily_withdrawals: u32) -> Self {
        Self {
            per_withdrawal,
            daily_withdrawals,
        }
    }
}

impl Default for CheckingLimits {
    fn default() -> Self {
        Self {
            per_withdrawal: Decimal::new(50000, 2),
            daily_withdrawals: 3,
        }
    }
}

/// Rules consulted before the balance check of a withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WithdrawalPolicy {
    /// Only positivity and sufficient balance
    Unrestricted,
    /// Per-withdrawal ceiling and daily withdrawal count
    Checking(CheckingLimits),
}

impl WithdrawalPolicy {
    /// Reject `amount` if the policy forbids it given what `history` holds for `on`
    ///
    /// The daily count is always derived from the history; no separate counter
    /// is kept.
    fn check(&self, amount: Decimal, history: &History, on: NaiveDate) -> Result<()> {
        let WithdrawalPolicy::Checking(limits) = self else {
            return Ok(());
        };

        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount { amount });
        }
        if amount > limits.per_withdrawal {
            return Err(Error::LimitExceeded {
                amount,
                limit: limits.per_withdrawal,
            });
        }
        if history.withdrawals_on(on) >= limits.daily_withdrawals as usize {
            return Err(Error::DailyQuotaExceeded {
                limit: limits.daily_withdrawals,
            });
        }
        Ok(())
    }

    pub fn label(&self) -> &'static str {
        match self {
            WithdrawalPolicy::Unrestricted => "Account",
            WithdrawalPolicy::Checking(_) => "Checking",
        }
    }
}

/// A balance-holding account belonging to exactly one client
///
/// The owner is referenced by id only; the client owns the account, never the
/// other way round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    number: AccountNumber,
    branch: String,
    owner: ClientId,
    balance: Decimal,
    policy: WithdrawalPolicy,
    history: History,
}

impl Account {
    /// Create an account with no withdrawal limits and a zero balance
    pub fn new(number: AccountNumber, owner: ClientId) -> Self {
        Self::with_policy(number, owner, WithdrawalPolicy::Unrestricted)
    }

    /// Create a checking account
    pub fn checking(number: AccountNumber, owner: ClientId, limits: CheckingLimits) -> Self {
        Self::with_policy(number, owner, WithdrawalPolicy::Checking(limits))
    }

    pub fn with_policy(number: AccountNumber, owner: ClientId, policy: WithdrawalPolicy) -> Self {
        Self {
            number,
            branch: BRANCH_CODE.to_string(),
            owner,
            balance: Decimal::ZERO,
            policy,
            history: History::new(),
        }
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn owner(&self) -> ClientId {
        self.owner
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn policy(&self) -> &WithdrawalPolicy {
        &self.policy
    }

    /// Limits in force, if this is a checking account
    pub fn limits(&self) -> Option<&CheckingLimits> {
        match &self.policy {
            WithdrawalPolicy::Checking(limits) => Some(limits),
            WithdrawalPolicy::Unrestricted => None,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Withdrawals still allowed on `on`, if the policy caps them
    pub fn withdrawals_left(&self, on: NaiveDate) -> Option<u32> {
        self.limits().map(|limits| {
            let used = self.history.withdrawals_on(on) as u32;
            limits.daily_withdrawals.saturating_sub(used)
        })
    }

    /// Take `amount` out of the account
    ///
    /// `on` is the current calendar date, used by the daily withdrawal quota.
    /// The balance is unchanged on any error.
    pub fn withdraw(&mut self, amount: Decimal, on: NaiveDate) -> Result<()> {
        self.policy.check(amount, &self.history, on)?;

        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount { amount });
        }
        if amount > self.balance {
            return Err(Error::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        self.balance -= amount;
        Ok(())
    }

    /// Put `amount` into the account. The balance is unchanged on error.
    pub fn deposit(&mut self, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount { amount });
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| Error::validation("deposit would overflow the balance"))?;
        Ok(())
    }
}
