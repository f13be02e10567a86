//! Client domain model

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::{Account, AccountNumber};
use super::result::{Error, Result};
use super::transaction::Transaction;

/// Identifier accounts use to refer back to their owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity data of a natural person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Individual {
    /// National tax id, unique across clients (enforced by the registry)
    pub tax_id: String,
    pub full_name: String,
    pub birth_date: NaiveDate,
}

/// Who the client is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientProfile {
    Individual(Individual),
}

/// A bank client: identity, address and the accounts it owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    address: String,
    profile: ClientProfile,
    accounts: Vec<Account>,
}

impl Client {
    pub fn new(address: impl Into<String>, profile: ClientProfile) -> Self {
        Self {
            id: ClientId::new(),
            address: address.into(),
            profile,
            accounts: Vec::new(),
        }
    }

    /// Create a client for a natural person
    pub fn individual(
        tax_id: impl Into<String>,
        full_name: impl Into<String>,
        birth_date: NaiveDate,
        address: impl Into<String>,
    ) -> Self {
        Self::new(
            address,
            ClientProfile::Individual(Individual {
                tax_id: tax_id.into(),
                full_name: full_name.into(),
                birth_date,
            }),
        )
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn profile(&self) -> &ClientProfile {
        &self.profile
    }

    pub fn tax_id(&self) -> &str {
        match &self.profile {
            ClientProfile::Individual(person) => &person.tax_id,
        }
    }

    /// Name shown on statements and account listings
    pub fn display_name(&self) -> &str {
        match &self.profile {
            ClientProfile::Individual(person) => &person.full_name,
        }
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        match &self.profile {
            ClientProfile::Individual(person) => Some(person.birth_date),
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account(&self, number: AccountNumber) -> Option<&Account> {
        self.accounts.iter().find(|a| a.number() == number)
    }

    /// Append an account. Number uniqueness is the registry's job.
    pub fn add_account(&mut self, account: Account) {
        self.accounts.push(account);
    }

    /// Apply `transaction` to one of this client's accounts
    ///
    /// Asking for an account the client does not own is a caller bug and is
    /// reported as `NotFound`, distinct from the business rejections.
    pub fn request_transaction(
        &mut self,
        number: AccountNumber,
        transaction: Transaction,
    ) -> Result<()> {
        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.number() == number)
            .ok_or_else(|| Error::not_found(format!("account {} for client {}", number, self.id)))?;
        transaction.apply(account)
    }
}
