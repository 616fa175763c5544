pub mod csv;
pub mod memory;
pub mod traits;

pub use csv::{CsvConnection, CsvStore, GlobalConfig, GlobalConfigRepository};
pub use memory::MemoryStore;
pub use traits::{BudgetStorage, RecordMap};
