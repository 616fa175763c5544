pub mod budget;
pub mod date_interval;
pub mod error;
pub mod transaction;

pub use budget::{Balances, UserBudgetRecord};
pub use date_interval::DateInterval;
pub use error::BudgetError;
pub use transaction::{Transaction, TransactionDirection};
