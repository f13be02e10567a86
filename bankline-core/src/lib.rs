//! Bankline Core - ledger logic for clients, accounts and transactions
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Client, Account, Transaction, History)
//! - **ports**: Trait definitions for external dependencies (Clock)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (clocks, in-memory registry)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::{MemoryRegistry, SystemClock};
use config::Config;
use ports::Clock;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    Account, AccountNumber, CheckingLimits, Client, ClientId, History, Transaction,
    TransactionKind, WithdrawalPolicy, BRANCH_CODE,
};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for a banking session
///
/// Owns everything a session needs: the registry of clients and accounts,
/// the clock, configuration and the services. Nothing is global, so several
/// independent contexts can live in one process.
pub struct BankContext {
    pub config: Config,
    pub registry: Arc<MemoryRegistry>,
    pub clock: Arc<dyn Clock>,
    pub logger: Arc<LoggingService>,
    pub client_service: ClientService,
    pub account_service: AccountService,
    pub statement_service: StatementService,
}

impl BankContext {
    /// Create a context from the settings in `bankline_dir`, using the wall clock
    pub fn new(bankline_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        let config = Config::load(bankline_dir)?;
        Ok(Self::with_clock(config, Arc::new(SystemClock), entry_point))
    }

    /// Create a context from explicit configuration and clock
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>, entry_point: EntryPoint) -> Self {
        let registry = Arc::new(MemoryRegistry::new());
        let logger = Arc::new(LoggingService::new(
            entry_point,
            env!("CARGO_PKG_VERSION"),
            config.max_log_entries,
        ));

        let client_service = ClientService::new(Arc::clone(&registry));
        let account_service = AccountService::new(
            Arc::clone(&registry),
            Arc::clone(&clock),
            Arc::clone(&logger),
            config.checking_limits(),
        );
        let statement_service = StatementService::new(Arc::clone(&registry), Arc::clone(&clock));

        Self {
            config,
            registry,
            clock,
            logger,
            client_service,
            account_service,
            statement_service,
        }
    }
}
