//! Core domain entities
//!
//! Pure data structures with their validation rules - no I/O and no clock.
//! Callers pass the current date in where a rule depends on it.

mod account;
mod client;
mod history;
pub mod result;
mod transaction;

pub use account::{Account, AccountNumber, CheckingLimits, WithdrawalPolicy, BRANCH_CODE};
pub use client::{Client, ClientId, ClientProfile, Individual};
pub use history::History;
pub use transaction::{Transaction, TransactionKind};
