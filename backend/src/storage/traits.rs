//! # Storage Traits
//!
//! The store interface the domain layer and front ends work against. Any
//! backend (in-memory, CSV/YAML files) can be swapped in as long as a record
//! round-trips losslessly, ledger and break order included.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::domain::models::UserBudgetRecord;

/// All records keyed by user
pub type RecordMap = BTreeMap<String, UserBudgetRecord>;

/// Key-value storage of user budget records
pub trait BudgetStorage: Send + Sync {
    /// Fetch one user's record
    fn get(&self, user_key: &str) -> Result<Option<UserBudgetRecord>>;

    /// Insert or replace one user's record
    fn put(&self, user_key: &str, record: &UserBudgetRecord) -> Result<()>;

    /// Load every stored record
    fn load_all(&self) -> Result<RecordMap>;

    /// Persist every record in `records`
    fn save_all(&self, records: &RecordMap) -> Result<()>;

    /// Name the store files `user_key` under. Two user keys with the same
    /// storage key cannot both be stored.
    fn storage_key(&self, user_key: &str) -> String {
        user_key.to_string()
    }
}
