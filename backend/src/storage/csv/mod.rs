//! # CSV Storage
//!
//! File-based persistence: YAML for per-user settings and the global config,
//! CSV for the ledger and break list.
//!
//! ```text
//! data/
//! ├── global_config.yaml
//! └── {user}/
//!     ├── budget.yaml
//!     ├── transactions.csv
//!     └── breaks.csv
//! ```

pub mod break_repository;
pub mod budget_repository;
pub mod connection;
pub mod global_config_repository;
pub mod store;
pub mod transaction_repository;
#[cfg(test)]
pub mod test_utils;

pub use break_repository::BreakRepository;
pub use budget_repository::BudgetRepository;
pub use connection::{CsvConnection, DATA_DIR_ENV};
pub use global_config_repository::{GlobalConfig, GlobalConfigRepository, DATA_FORMAT_VERSION};
pub use store::CsvStore;
pub use transaction_repository::TransactionRepository;
