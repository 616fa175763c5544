//! # Domain Layer
//!
//! Budget rules for one user's record: the ledger, the break calendar, the
//! allowance allocator, report text and the command dispatcher that front
//! ends call. Services are plain `Clone` structs that take the record by
//! reference; only `CommandService` talks to storage.

pub mod allowance_service;
pub mod break_calendar;
pub mod clock;
pub mod command_service;
pub mod ledger_service;
pub mod models;
pub mod report_service;

pub use allowance_service::AllowanceService;
pub use break_calendar::BreakCalendar;
pub use command_service::CommandService;
pub use ledger_service::LedgerService;
pub use report_service::{DateFormat, ReportConfig, ReportService};
