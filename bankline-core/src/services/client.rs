//! Client service - client registration and lookup

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::adapters::memory::{lock_client, MemoryRegistry};
use crate::domain::result::Error;
use crate::domain::{AccountNumber, Client};

/// Identity fields for a new individual client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub tax_id: String,
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientSummary {
    pub id: String,
    pub tax_id: String,
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub address: String,
    pub account_numbers: Vec<AccountNumber>,
}

impl ClientSummary {
    pub(crate) fn from_client(client: &Client) -> Self {
        Self {
            id: client.id().to_string(),
            tax_id: client.tax_id().to_string(),
            full_name: client.display_name().to_string(),
            birth_date: client.birth_date(),
            address: client.address().to_string(),
            account_numbers: client.accounts().iter().map(|a| a.number()).collect(),
        }
    }
}

/// Client service for registration and lookup
pub struct ClientService {
    registry: Arc<MemoryRegistry>,
}

impl ClientService {
    pub fn new(registry: Arc<MemoryRegistry>) -> Self {
        Self { registry }
    }

    /// Register a natural person
    ///
    /// The tax id must be digits only and not already registered.
    pub fn create_individual(&self, new_client: NewClient) -> Result<ClientSummary> {
        let tax_id = normalize_tax_id(&new_client.tax_id)?;
        let full_name = new_client.full_name.trim();
        if full_name.is_empty() {
            return Err(Error::validation("full name cannot be empty").into());
        }

        let client = Client::individual(
            tax_id,
            full_name,
            new_client.birth_date,
            new_client.address.trim(),
        );
        let shared = self.registry.add_client(client)?;
        let client = lock_client(&shared)?;
        Ok(ClientSummary::from_client(&client))
    }

    pub fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<ClientSummary>> {
        let Some(shared) = self.registry.find_client_by_tax_id(tax_id.trim())? else {
            return Ok(None);
        };
        let client = lock_client(&shared)?;
        Ok(Some(ClientSummary::from_client(&client)))
    }

    /// All clients in registration order
    pub fn list(&self) -> Result<Vec<ClientSummary>> {
        let mut summaries = Vec::new();
        for shared in self.registry.clients()? {
            let client = lock_client(&shared)?;
            summaries.push(ClientSummary::from_client(&client));
        }
        Ok(summaries)
    }
}

/// Trim and check that a tax id is made of digits only
fn normalize_tax_id(raw: &str) -> Result<String, Error> {
    let tax_id = raw.trim();
    if tax_id.is_empty() {
        return Err(Error::validation("tax id cannot be empty"));
    }
    if !tax_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation("tax id must contain digits only"));
    }
    Ok(tax_id.to_string())
}
