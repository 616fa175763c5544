//! Domain errors for budget operations.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BudgetError {
    #[error("You need to set up your budget first")]
    NotConfigured,
    #[error("You have already set up your budget")]
    AlreadyConfigured,
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),
    #[error("No break at index {index} (there are {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Budget floor cannot be negative: {0}")]
    InvalidFloorValue(f64),
    #[error("Amount must be a positive number: {0}")]
    InvalidAmount(f64),
    #[error("Description must be between 1 and {max} characters")]
    InvalidDescription { max: usize },
}
