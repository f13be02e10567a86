//! In-memory client registry
//!
//! Stores every client for the lifetime of the process, enforces tax id
//! uniqueness and hands out account numbers. Nothing is written to disk.
//!
//! Each client sits behind its own mutex, and that mutex guards the client's
//! accounts: a balance check and the mutation that follows always happen under
//! one lock. The registry-wide lock only protects the lookup indexes and is
//! never held while a client is locked.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::result::{Error, Result};
use crate::domain::{Account, AccountNumber, Client, ClientId};

/// A registered client, lockable independently of every other client
pub type SharedClient = Arc<Mutex<Client>>;

/// Lock a registered client
pub fn lock_client(client: &SharedClient) -> Result<MutexGuard<'_, Client>> {
    client
        .lock()
        .map_err(|e| Error::Other(format!("Lock poisoned: {}", e)))
}

#[derive(Default)]
struct Index {
    /// Registration order
    clients: Vec<(ClientId, SharedClient)>,
    by_id: HashMap<ClientId, usize>,
    by_tax_id: HashMap<String, usize>,
    by_account: HashMap<AccountNumber, usize>,
}

/// Registry of clients and account numbers
pub struct MemoryRegistry {
    index: RwLock<Index>,
    next_account_number: AtomicU64,
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self {
            index: RwLock::new(Index::default()),
            next_account_number: AtomicU64::new(1),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Index>> {
        self.index
            .read()
            .map_err(|e| Error::Other(format!("Lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Index>> {
        self.index
            .write()
            .map_err(|e| Error::Other(format!("Lock poisoned: {}", e)))
    }

    /// Hand out the next account number (1, 2, 3, ...)
    pub fn next_account_number(&self) -> AccountNumber {
        self.next_account_number.fetch_add(1, Ordering::SeqCst)
    }

    /// Register a client, rejecting a tax id that is already taken
    pub fn add_client(&self, client: Client) -> Result<SharedClient> {
        let id = client.id();
        let tax_id = client.tax_id().to_string();
        let mut index = self.write()?;

        if index.by_tax_id.contains_key(&tax_id) {
            return Err(Error::validation(format!(
                "a client with tax id {} already exists",
                tax_id
            )));
        }

        let shared = Arc::new(Mutex::new(client));
        let position = index.clients.len();
        index.clients.push((id, Arc::clone(&shared)));
        index.by_id.insert(id, position);
        index.by_tax_id.insert(tax_id, position);
        Ok(shared)
    }

    /// Attach `account` to its owner and make it reachable by number
    ///
    /// The number is reserved under the write lock before the owner is
    /// touched, so two callers can never both attach the same number.
    pub fn add_account(&self, account: Account) -> Result<()> {
        let number = account.number();
        let owner = {
            let mut index = self.write()?;
            if index.by_account.contains_key(&number) {
                return Err(Error::validation(format!(
                    "account number {} is already in use",
                    number
                )));
            }
            let position = *index
                .by_id
                .get(&account.owner())
                .ok_or_else(|| Error::not_found(format!("client {}", account.owner())))?;
            index.by_account.insert(number, position);
            Arc::clone(&index.clients[position].1)
        };

        let result = match lock_client(&owner) {
            Ok(mut client) => {
                client.add_account(account);
                Ok(())
            }
            Err(e) => {
                self.write()?.by_account.remove(&number);
                Err(e)
            }
        };
        result
    }

    pub fn find_client_by_tax_id(&self, tax_id: &str) -> Result<Option<SharedClient>> {
        let index = self.read()?;
        Ok(index
            .by_tax_id
            .get(tax_id)
            .map(|&position| Arc::clone(&index.clients[position].1)))
    }

    pub fn client(&self, id: ClientId) -> Result<Option<SharedClient>> {
        let index = self.read()?;
        Ok(index
            .by_id
            .get(&id)
            .map(|&position| Arc::clone(&index.clients[position].1)))
    }

    /// The client owning account `number`
    pub fn client_for_account(&self, number: AccountNumber) -> Result<Option<SharedClient>> {
        let index = self.read()?;
        Ok(index
            .by_account
            .get(&number)
            .map(|&position| Arc::clone(&index.clients[position].1)))
    }

    /// All clients in registration order
    pub fn clients(&self) -> Result<Vec<SharedClient>> {
        let index = self.read()?;
        Ok(index
            .clients
            .iter()
            .map(|(_, client)| Arc::clone(client))
            .collect())
    }

    pub fn client_count(&self) -> Result<usize> {
        Ok(self.read()?.clients.len())
    }

    pub fn account_count(&self) -> Result<usize> {
        Ok(self.read()?.by_account.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CheckingLimits;
    use chrono::NaiveDate;

    fn client(tax_id: &str) -> Client {
        Client::individual(
            tax_id,
            format!("Client {}", tax_id),
            NaiveDate::from_ymd_opt(1985, 7, 20).unwrap(),
            "Av. Central, 100",
        )
    }

    #[test]
    fn test_account_numbers_are_monotonic() {
        let registry = MemoryRegistry::new();
        assert_eq!(registry.next_account_number(), 1);
        assert_eq!(registry.next_account_number(), 2);
        assert_eq!(registry.next_account_number(), 3);
    }

    #[test]
    fn test_duplicate_tax_id_rejected() {
        let registry = MemoryRegistry::new();
        registry.add_client(client("111")).unwrap();

        let err = registry.add_client(client("111")).err().unwrap();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(registry.client_count().unwrap(), 1);
    }

    #[test]
    fn test_lookup_by_tax_id_and_account() {
        let registry = MemoryRegistry::new();
        let shared = registry.add_client(client("222")).unwrap();
        let id = lock_client(&shared).unwrap().id();

        let number = registry.next_account_number();
        registry
            .add_account(Account::checking(number, id, CheckingLimits::default()))
            .unwrap();

        let found = registry.find_client_by_tax_id("222").unwrap().unwrap();
        assert!(Arc::ptr_eq(&found, &shared));
        let owner = registry.client_for_account(number).unwrap().unwrap();
        assert!(Arc::ptr_eq(&owner, &shared));
        let by_id = registry.client(id).unwrap().unwrap();
        assert!(Arc::ptr_eq(&by_id, &shared));
        assert_eq!(lock_client(&owner).unwrap().accounts().len(), 1);
        assert!(registry.client(ClientId::new()).unwrap().is_none());
        assert!(registry.find_client_by_tax_id("999").unwrap().is_none());
        assert!(registry.client_for_account(99).unwrap().is_none());
    }

    #[test]
    fn test_account_for_unknown_owner() {
        let registry = MemoryRegistry::new();
        let err = registry
            .add_account(Account::new(1, ClientId::new()))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(registry.account_count().unwrap(), 0);
    }

    #[test]
    fn test_reused_account_number_rejected() {
        let registry = MemoryRegistry::new();
        let shared = registry.add_client(client("333")).unwrap();
        let id = lock_client(&shared).unwrap().id();

        registry.add_account(Account::new(5, id)).unwrap();
        let err = registry.add_account(Account::new(5, id)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(lock_client(&shared).unwrap().accounts().len(), 1);
    }

    #[test]
    fn test_racing_reuse_of_number_attaches_once() {
        use std::sync::Barrier;
        use std::thread;

        for _ in 0..200 {
            let registry = Arc::new(MemoryRegistry::new());
            let shared = registry.add_client(client("444")).unwrap();
            let id = lock_client(&shared).unwrap().id();
            let barrier = Arc::new(Barrier::new(2));

            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let registry = Arc::clone(&registry);
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        registry.add_account(Account::new(5, id)).is_ok()
                    })
                })
                .collect();
            let accepted = handles
                .into_iter()
                .map(|h| h.join().expect("Thread panicked"))
                .filter(|ok| *ok)
                .count();

            assert_eq!(accepted, 1);
            assert_eq!(lock_client(&shared).unwrap().accounts().len(), 1);
            assert_eq!(registry.account_count().unwrap(), 1);
        }
    }

    #[test]
    fn test_clients_in_registration_order() {
        let registry = MemoryRegistry::new();
        for tax_id in ["3", "1", "2"] {
            registry.add_client(client(tax_id)).unwrap();
        }
        let tax_ids: Vec<String> = registry
            .clients()
            .unwrap()
            .iter()
            .map(|c| lock_client(c).unwrap().tax_id().to_string())
            .collect();
        assert_eq!(tax_ids, vec!["3", "1", "2"]);
    }
}
