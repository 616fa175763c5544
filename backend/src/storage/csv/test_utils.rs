//! Temporary data directories for storage tests.
//!
//! The directory is removed when the environment drops, even if a test panics.

use anyhow::Result;
use chrono::NaiveDate;
use shared::CurrencyKind;
use tempfile::TempDir;

use super::connection::CsvConnection;
use crate::domain::models::{Balances, UserBudgetRecord};

pub struct TestEnvironment {
    pub connection: CsvConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }
}

/// A configured record: 50/30/20 ending 2026-10-29, allowance 10.0
pub fn create_test_record() -> UserBudgetRecord {
    let mut starting = Balances::new();
    starting.insert(CurrencyKind::DiningDollars, 50.0);
    starting.insert(CurrencyKind::TigerBucks, 30.0);
    starting.insert(CurrencyKind::Usd, 20.0);

    let end = NaiveDate::from_ymd_opt(2026, 10, 29).unwrap();
    let mut record = UserBudgetRecord::new(&starting, end);
    record.daily_budget = 10.0;
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleans_up_on_drop() -> Result<()> {
        let path = {
            let env = TestEnvironment::new()?;
            env.base_path.clone()
        };
        assert!(!path.exists());
        Ok(())
    }
}
