//! Account service - opening accounts and moving money

use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::memory::{lock_client, MemoryRegistry};
use crate::domain::result::{Error, OperationResult};
use crate::domain::{
    Account, AccountNumber, CheckingLimits, Client, Transaction, TransactionKind,
};
use crate::ports::Clock;

use super::logging::{LogEvent, LoggingService};

/// Read-only view of an account for listings and statements
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub number: AccountNumber,
    pub branch: String,
    pub kind: String,
    pub holder: String,
    pub holder_tax_id: String,
    pub balance: Decimal,
    pub limits: Option<CheckingLimits>,
    /// Withdrawals still allowed today, for accounts with a daily cap
    pub withdrawals_left_today: Option<u32>,
}

impl AccountSummary {
    pub(crate) fn from_account(account: &Account, owner: &Client, today: NaiveDate) -> Self {
        Self {
            number: account.number(),
            branch: account.branch().to_string(),
            kind: account.policy().label().to_string(),
            holder: owner.display_name().to_string(),
            holder_tax_id: owner.tax_id().to_string(),
            balance: account.balance(),
            limits: account.limits().copied(),
            withdrawals_left_today: account.withdrawals_left(today),
        }
    }
}

/// Outcome of a successful deposit or withdrawal
#[derive(Debug, Clone, Serialize)]
pub struct TransactionReceipt {
    pub account_number: AccountNumber,
    pub transaction_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub timestamp: NaiveDateTime,
    pub balance: Decimal,
}

/// Account service for opening accounts and applying transactions
pub struct AccountService {
    registry: Arc<MemoryRegistry>,
    clock: Arc<dyn Clock>,
    logger: Arc<LoggingService>,
    default_limits: CheckingLimits,
}

impl AccountService {
    pub fn new(
        registry: Arc<MemoryRegistry>,
        clock: Arc<dyn Clock>,
        logger: Arc<LoggingService>,
        default_limits: CheckingLimits,
    ) -> Self {
        Self {
            registry,
            clock,
            logger,
            default_limits,
        }
    }

    /// Open a checking account for the client with `tax_id`
    ///
    /// Uses the configured default limits unless `limits` overrides them.
    pub fn open_checking(
        &self,
        tax_id: &str,
        limits: Option<CheckingLimits>,
    ) -> Result<AccountSummary> {
        let limits = limits.unwrap_or(self.default_limits);
        if limits.per_withdrawal <= Decimal::ZERO {
            return Err(Error::validation("per-withdrawal limit must be positive").into());
        }

        let owner = self
            .registry
            .find_client_by_tax_id(tax_id.trim())?
            .ok_or_else(|| Error::not_found(format!("client with tax id {}", tax_id.trim())))?;
        let owner_id = lock_client(&owner)?.id();

        let number = self.registry.next_account_number();
        self.registry
            .add_account(Account::checking(number, owner_id, limits))?;
        let _ = self.logger.log(LogEvent::new("account_opened"));

        let client = lock_client(&owner)?;
        let account = client
            .account(number)
            .ok_or_else(|| Error::not_found(format!("account {}", number)))?;
        Ok(AccountSummary::from_account(account, &client, self.clock.today()))
    }

    /// Accounts of the client with `tax_id`, in the order they were opened
    pub fn accounts_of(&self, tax_id: &str) -> Result<Vec<AccountSummary>> {
        let owner = self
            .registry
            .find_client_by_tax_id(tax_id.trim())?
            .ok_or_else(|| Error::not_found(format!("client with tax id {}", tax_id.trim())))?;
        let client = lock_client(&owner)?;
        let today = self.clock.today();
        Ok(client
            .accounts()
            .iter()
            .map(|account| AccountSummary::from_account(account, &client, today))
            .collect())
    }

    pub fn deposit(
        &self,
        number: AccountNumber,
        amount: Decimal,
    ) -> Result<OperationResult<TransactionReceipt>> {
        self.transact(number, TransactionKind::Deposit, amount)
    }

    pub fn withdraw(
        &self,
        number: AccountNumber,
        amount: Decimal,
    ) -> Result<OperationResult<TransactionReceipt>> {
        self.transact(number, TransactionKind::Withdrawal, amount)
    }

    /// Route a new transaction through the owning client
    ///
    /// The transaction is stamped while the client is locked, so history
    /// order and timestamp order agree. Business rejections come back as a
    /// failed `OperationResult` with the reason; an unknown account number
    /// is an error.
    fn transact(
        &self,
        number: AccountNumber,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<OperationResult<TransactionReceipt>> {
        let owner = self
            .registry
            .client_for_account(number)?
            .ok_or_else(|| Error::not_found(format!("account {}", number)))?;

        let (transaction, outcome) = {
            let mut client = lock_client(&owner)?;
            let transaction = Transaction::new(kind, amount, self.clock.now());
            let outcome = client
                .request_transaction(number, transaction)
                .map(|()| {
                    let balance = client.account(number).map(|a| a.balance()).unwrap_or_default();
                    TransactionReceipt {
                        account_number: number,
                        transaction_id: transaction.id(),
                        kind: transaction.kind(),
                        amount: transaction.amount(),
                        timestamp: transaction.timestamp(),
                        balance,
                    }
                });
            (transaction, outcome)
        };

        let kind = transaction.kind().as_str();
        match outcome {
            Ok(receipt) => {
                let _ = self.logger.log(LogEvent::new(format!("{}_completed", kind)));
                Ok(OperationResult::ok(receipt))
            }
            Err(e) if e.is_rejection() => {
                let _ = self
                    .logger
                    .log(LogEvent::new(format!("{}_rejected", kind)).with_error(e.code()));
                Ok(OperationResult::rejected(&e))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::services::logging::{EntryPoint, DEFAULT_MAX_ENTRIES};

    struct Fixture {
        service: AccountService,
        logger: Arc<LoggingService>,
        registry: Arc<MemoryRegistry>,
        clock: Arc<FixedClock>,
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(MemoryRegistry::new());
        let clock = Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2025, 2, 10)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
        ));
        let logger = Arc::new(LoggingService::new(
            EntryPoint::Library,
            "test",
            DEFAULT_MAX_ENTRIES,
        ));
        registry
            .add_client(Client::individual(
                "999",
                "Joao Silva",
                NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
                "Rua C, 30",
            ))
            .unwrap();
        let service = AccountService::new(
            Arc::clone(&registry),
            clock.clone(),
            Arc::clone(&logger),
            CheckingLimits::default(),
        );
        Fixture {
            service,
            logger,
            registry,
            clock,
        }
    }

    #[test]
    fn test_open_checking_uses_defaults() {
        let f = fixture();
        let summary = f.service.open_checking("999", None).unwrap();
        assert_eq!(summary.number, 1);
        assert_eq!(summary.branch, "0001");
        assert_eq!(summary.kind, "Checking");
        assert_eq!(summary.holder, "Joao Silva");
        assert_eq!(summary.limits, Some(CheckingLimits::default()));
        assert_eq!(summary.withdrawals_left_today, Some(3));

        let second = f
            .service
            .open_checking("999", Some(CheckingLimits::new(Decimal::new(1000, 0), 5)))
            .unwrap();
        assert_eq!(second.number, 2);
        assert_eq!(f.service.accounts_of("999").unwrap().len(), 2);
        assert_eq!(f.registry.account_count().unwrap(), 2);
    }

    #[test]
    fn test_open_for_unknown_client() {
        let f = fixture();
        assert!(f.service.open_checking("123", None).is_err());
    }

    #[test]
    fn test_open_with_non_positive_limit() {
        let f = fixture();
        let err = f
            .service
            .open_checking("999", Some(CheckingLimits::new(Decimal::ZERO, 3)))
            .unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn test_receipt_and_rejection() {
        let f = fixture();
        let number = f.service.open_checking("999", None).unwrap().number;

        let ok = f.service.deposit(number, Decimal::new(100, 0)).unwrap();
        assert!(ok.success);
        let receipt = ok.data.unwrap();
        assert_eq!(receipt.balance, Decimal::new(100, 0));
        assert_eq!(receipt.kind, TransactionKind::Deposit);

        let rejected = f.service.withdraw(number, Decimal::new(600, 0)).unwrap();
        assert!(!rejected.success);
        assert!(rejected.reason().unwrap().contains("per-withdrawal limit"));

        let errors = f.logger.get_errors(10).unwrap();
        assert_eq!(errors[0].event, "withdrawal_rejected");
        assert_eq!(errors[0].error_message.as_deref(), Some("limit_exceeded"));
    }

    #[test]
    fn test_overflowing_deposit_keeps_client_usable() {
        let f = fixture();
        let number = f.service.open_checking("999", None).unwrap().number;

        assert!(f.service.deposit(number, Decimal::MAX).unwrap().success);
        let err = f.service.deposit(number, Decimal::MAX).unwrap_err();
        assert!(err.to_string().contains("overflow"));

        let withdrawn = f.service.withdraw(number, Decimal::ONE).unwrap();
        assert!(withdrawn.success);
        assert_eq!(withdrawn.data.unwrap().balance, Decimal::MAX - Decimal::ONE);
        assert_eq!(f.service.accounts_of("999").unwrap()[0].balance, Decimal::MAX - Decimal::ONE);
    }

    #[test]
    fn test_receipt_stamped_with_clock() {
        let f = fixture();
        let number = f.service.open_checking("999", None).unwrap().number;

        let receipt = f.service.deposit(number, Decimal::ONE).unwrap().data.unwrap();
        assert_eq!(receipt.timestamp, f.clock.now());
    }

    #[test]
    fn test_unknown_account_is_error() {
        let f = fixture();
        assert!(f.service.deposit(77, Decimal::ONE).is_err());
    }
}
