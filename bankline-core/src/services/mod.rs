//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic with the registry and the clock. Each
//! service focuses on a specific use case.

mod account;
mod client;
pub mod logging;
mod statement;

pub use account::{AccountService, AccountSummary, TransactionReceipt};
pub use client::{ClientService, ClientSummary, NewClient};
pub use logging::{EntryPoint, LogEntry, LogEvent, LogStats, LoggingService};
pub use statement::{Statement, StatementLine, StatementService};
