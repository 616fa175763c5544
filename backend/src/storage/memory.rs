//! In-memory record store.
//!
//! Used as the working set between `load_all` and `save_all` of a durable
//! store, and directly in tests.

use anyhow::{anyhow, Result};
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{BudgetStorage, RecordMap};
use crate::domain::models::UserBudgetRecord;

#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<RecordMap>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: RecordMap) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    /// Copy of every record currently held
    pub fn snapshot(&self) -> Result<RecordMap> {
        Ok(self.lock()?.clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, RecordMap>> {
        self.records
            .lock()
            .map_err(|_| anyhow!("Record store lock was poisoned"))
    }
}

impl BudgetStorage for MemoryStore {
    fn get(&self, user_key: &str) -> Result<Option<UserBudgetRecord>> {
        Ok(self.lock()?.get(user_key).cloned())
    }

    fn put(&self, user_key: &str, record: &UserBudgetRecord) -> Result<()> {
        debug!("Storing record for user '{}' in memory", user_key);
        self.lock()?.insert(user_key.to_string(), record.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<RecordMap> {
        self.snapshot()
    }

    fn save_all(&self, records: &RecordMap) -> Result<()> {
        let mut guard = self.lock()?;
        for (user_key, record) in records {
            guard.insert(user_key.clone(), record.clone());
        }
        Ok(())
    }
}
