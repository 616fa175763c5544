use anyhow::{bail, Result};
use log::{debug, error, info, warn};

use super::break_repository::BreakRepository;
use super::budget_repository::BudgetRepository;
use super::connection::CsvConnection;
use super::transaction_repository::TransactionRepository;
use crate::domain::models::UserBudgetRecord;
use crate::storage::traits::{BudgetStorage, RecordMap};

/// File-backed `BudgetStorage`: one directory per user under the data directory
#[derive(Clone)]
pub struct CsvStore {
    connection: CsvConnection,
    budget_repository: BudgetRepository,
    transaction_repository: TransactionRepository,
    break_repository: BreakRepository,
}

impl CsvStore {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            budget_repository: BudgetRepository::new(connection.clone()),
            transaction_repository: TransactionRepository::new(connection.clone()),
            break_repository: BreakRepository::new(connection.clone()),
            connection,
        }
    }

    pub fn connection(&self) -> &CsvConnection {
        &self.connection
    }

    /// Load the full record stored in `directory`
    fn load_directory(&self, directory: &str) -> Result<Option<(String, UserBudgetRecord)>> {
        let Some((user_key, mut record)) = self.budget_repository.load(directory)? else {
            return Ok(None);
        };
        record.ledger = self.transaction_repository.read_transactions(directory)?;
        record.breaks = self.break_repository.read_breaks(directory)?;
        Ok(Some((user_key, record)))
    }
}

impl BudgetStorage for CsvStore {
    fn get(&self, user_key: &str) -> Result<Option<UserBudgetRecord>> {
        let directory = CsvConnection::generate_safe_directory_name(user_key);
        match self.load_directory(&directory)? {
            Some((stored_key, record)) if stored_key == user_key => Ok(Some(record)),
            Some((stored_key, _)) => bail!(
                "Directory '{}' belongs to user '{}', not '{}'",
                directory,
                stored_key,
                user_key
            ),
            None => Ok(None),
        }
    }

    fn put(&self, user_key: &str, record: &UserBudgetRecord) -> Result<()> {
        let directory = CsvConnection::generate_safe_directory_name(user_key);
        if let Some((stored_key, _)) = self.budget_repository.load(&directory)? {
            if stored_key != user_key {
                bail!(
                    "Directory '{}' belongs to user '{}', not '{}'",
                    directory,
                    stored_key,
                    user_key
                );
            }
        }

        self.connection.ensure_user_directory(user_key)?;
        // budget.yaml marks the directory as a user, so it goes last
        self.transaction_repository
            .write_transactions(&directory, &record.ledger)?;
        self.break_repository.write_breaks(&directory, &record.breaks)?;
        self.budget_repository.save(&directory, user_key, record)?;

        debug!(
            "Stored '{}' ({} transactions, {} breaks)",
            user_key,
            record.ledger.len(),
            record.breaks.len()
        );
        Ok(())
    }

    fn load_all(&self) -> Result<RecordMap> {
        let mut records = RecordMap::new();

        for directory in self.connection.list_user_directories()? {
            match self.load_directory(&directory) {
                Ok(Some((user_key, record))) => {
                    records.insert(user_key, record);
                }
                Ok(None) => {}
                Err(e) => warn!("Skipping unreadable user directory '{}': {:#}", directory, e),
            }
        }

        info!(
            "Loaded {} budget records from {}",
            records.len(),
            self.connection.base_directory().display()
        );
        Ok(records)
    }

    fn save_all(&self, records: &RecordMap) -> Result<()> {
        let mut failed = Vec::new();
        for (user_key, record) in records {
            if let Err(e) = self.put(user_key, record) {
                error!("Failed to save '{}': {:#}", user_key, e);
                failed.push(format!("{} ({:#})", user_key, e));
            }
        }

        if !failed.is_empty() {
            bail!(
                "Saved {} of {} budget records; failed: {}",
                records.len() - failed.len(),
                records.len(),
                failed.join(", ")
            );
        }
        info!("Saved {} budget records", records.len());
        Ok(())
    }

    fn storage_key(&self, user_key: &str) -> String {
        CsvConnection::generate_safe_directory_name(user_key)
    }
}
