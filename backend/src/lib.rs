//! # Budget Tracker Backend
//!
//! Tracks dining dollars, tiger bucks and cash for each user and turns the
//! money left into a daily allowance that skips scheduled breaks.
//!
//! `Backend` owns the lifecycle: `init` loads every record from a durable
//! store into memory, commands run against the in-memory copy, and
//! `teardown` writes everything back.
//!
//! Users whose keys the durable store would file under the same name (see
//! `BudgetStorage::storage_key`) are rejected before any command runs.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, FixedOffset};
use log::{info, warn};
use shared::{BudgetCommand, CommandResponse};
use std::collections::BTreeMap;
use std::sync::Mutex;

pub mod domain;
pub mod storage;

pub use domain::models::{BudgetError, UserBudgetRecord};
pub use storage::{BudgetStorage, CsvConnection, CsvStore, MemoryStore};

use domain::{clock, CommandService};

pub struct Backend<S: BudgetStorage> {
    durable: S,
    live: MemoryStore,
    command_service: CommandService,
    /// storage key -> user key that owns it
    owners: Mutex<BTreeMap<String, String>>,
}

impl<S: BudgetStorage> Backend<S> {
    /// Load every record from `durable` and start serving commands
    pub fn init(durable: S) -> Result<Self> {
        Self::with_command_service(durable, CommandService::default())
    }

    /// Like `init`, with a custom service stack (for example a different report format)
    pub fn with_command_service(durable: S, command_service: CommandService) -> Result<Self> {
        let records = durable
            .load_all()
            .context("Failed to load budget records")?;
        info!("Backend initialized with {} users", records.len());

        let owners = records
            .keys()
            .map(|user_key| (durable.storage_key(user_key), user_key.clone()))
            .collect();

        Ok(Self {
            durable,
            live: MemoryStore::from_records(records),
            command_service,
            owners: Mutex::new(owners),
        })
    }

    /// Run a command stamped with the current local time
    pub fn execute(&self, user_key: &str, command: BudgetCommand) -> Result<CommandResponse> {
        self.execute_at(user_key, command, clock::now())
    }

    pub fn execute_at(
        &self,
        user_key: &str,
        command: BudgetCommand,
        now: DateTime<FixedOffset>,
    ) -> Result<CommandResponse> {
        let storage_key = self.durable.storage_key(user_key);
        let mut owners = self
            .owners
            .lock()
            .map_err(|_| anyhow!("User index lock was poisoned"))?;

        if let Some(owner) = owners.get(&storage_key) {
            if owner != user_key {
                warn!(
                    "Rejected '{}': storage name '{}' belongs to '{}'",
                    user_key, storage_key, owner
                );
                bail!(
                    "User '{}' cannot be stored: the name '{}' is already used by '{}'",
                    user_key,
                    storage_key,
                    owner
                );
            }
        }

        let response = self
            .command_service
            .execute(&self.live, user_key, command, now)?;
        if self.live.get(user_key)?.is_some() {
            owners
                .entry(storage_key)
                .or_insert_with(|| user_key.to_string());
        }
        Ok(response)
    }

    /// Current in-memory record for a user
    pub fn record(&self, user_key: &str) -> Result<Option<UserBudgetRecord>> {
        self.live.get(user_key)
    }

    /// Persist every record and hand the durable store back
    pub fn teardown(self) -> Result<S> {
        let records = self.live.snapshot()?;
        self.durable
            .save_all(&records)
            .context("Failed to save budget records")?;
        info!("Backend saved {} users", records.len());
        Ok(self.durable)
    }
}
