//! # Budget Repository
//!
//! Reads and writes `{user}/budget.yaml`: balances, the starting snapshot,
//! end date, daily allowance and floor. The ledger and breaks live in their
//! own CSV files.
//!
//! ```yaml
//! user_key: "123456789"
//! balances:
//!   diningDollars: 35.0
//!   tigerBucks: 30.0
//!   USD: 20.0
//! starting_balances:
//!   diningDollars: 50.0
//!   tigerBucks: 30.0
//!   USD: 20.0
//! budget_end_date: 2026-12-18
//! daily_budget: 10.0
//! budget_floor: 0.0
//! updated_at: "2026-10-19T09:30:00-04:00"
//! ```

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::connection::{CsvConnection, BUDGET_FILE};
use crate::domain::models::{Balances, UserBudgetRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlBudget {
    user_key: String,
    balances: Balances,
    starting_balances: Balances,
    budget_end_date: Option<NaiveDate>,
    daily_budget: f64,
    budget_floor: f64,
    updated_at: String,
}

#[derive(Clone)]
pub struct BudgetRepository {
    connection: CsvConnection,
}

impl BudgetRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn budget_path(&self, directory: &str) -> PathBuf {
        self.connection.base_directory().join(directory).join(BUDGET_FILE)
    }

    /// Load the budget file in `directory`.
    ///
    /// Returns the stored user key with a record whose ledger and breaks are
    /// still empty, or `None` when the directory has no budget file.
    pub fn load(&self, directory: &str) -> Result<Option<(String, UserBudgetRecord)>> {
        let path = self.budget_path(directory);
        if !path.exists() {
            return Ok(None);
        }

        let yaml_content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let budget: YamlBudget = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Malformed budget file {}", path.display()))?;
        debug!("Loaded budget for '{}' from {}", budget.user_key, path.display());

        let record = UserBudgetRecord {
            balances: budget.balances,
            starting_balances: budget.starting_balances,
            budget_end_date: budget.budget_end_date,
            daily_budget: budget.daily_budget,
            budget_floor: budget.budget_floor,
            ledger: Vec::new(),
            breaks: Vec::new(),
        };
        Ok(Some((budget.user_key, record)))
    }

    /// Write the scalar part of `record` to `directory`'s budget file
    pub fn save(&self, directory: &str, user_key: &str, record: &UserBudgetRecord) -> Result<()> {
        let budget = YamlBudget {
            user_key: user_key.to_string(),
            balances: record.balances.clone(),
            starting_balances: record.starting_balances.clone(),
            budget_end_date: record.budget_end_date,
            daily_budget: record.daily_budget,
            budget_floor: record.budget_floor,
            updated_at: Local::now().to_rfc3339(),
        };

        let yaml_content = serde_yaml::to_string(&budget)?;
        CsvConnection::write_atomic(&self.budget_path(directory), yaml_content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use shared::CurrencyKind;

    #[test]
    fn test_missing_budget_file_loads_none() -> Result<()> {
        let env = TestEnvironment::new()?;
        let repo = BudgetRepository::new(env.connection.clone());

        assert!(repo.load("nobody")?.is_none());
        Ok(())
    }

    #[test]
    fn test_save_and_load_budget() -> Result<()> {
        let env = TestEnvironment::new()?;
        let repo = BudgetRepository::new(env.connection.clone());
        env.connection.ensure_user_directory("alice")?;

        let mut starting = Balances::new();
        starting.insert(CurrencyKind::DiningDollars, 50.0);
        starting.insert(CurrencyKind::TigerBucks, 30.0);
        starting.insert(CurrencyKind::Usd, 20.0);
        let mut record =
            UserBudgetRecord::new(&starting, NaiveDate::from_ymd_opt(2026, 12, 18).unwrap());
        record.daily_budget = 100.0 / 3.0;
        record.budget_floor = 2.5;
        record.balances.insert(CurrencyKind::DiningDollars, 35.25);

        repo.save("alice", "alice", &record)?;
        let (user_key, loaded) = repo.load("alice")?.unwrap();

        assert_eq!(user_key, "alice");
        assert_eq!(loaded, record);
        Ok(())
    }
}
