//! Command dispatch for front ends.
//!
//! `CommandService::execute` loads a user's record, runs exactly one core
//! operation for the given `BudgetCommand`, and writes the record back when
//! the command changed it. Input checks that belong to the caller side
//! (future end dates, both-or-neither ranges, positive amounts) happen here
//! before any core operation runs, so a rejected command never touches the
//! store.

use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate};
use log::{debug, info};
use shared::{BudgetCommand, CommandResponse, CurrencyKind};

use crate::domain::allowance_service::AllowanceService;
use crate::domain::break_calendar::BreakCalendar;
use crate::domain::ledger_service::LedgerService;
use crate::domain::models::{Balances, BudgetError, TransactionDirection, UserBudgetRecord};
use crate::domain::report_service::ReportService;
use crate::storage::BudgetStorage;

/// Longest accepted transaction description, in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 256;

#[derive(Clone)]
pub struct CommandService {
    ledger_service: LedgerService,
    break_calendar: BreakCalendar,
    allowance_service: AllowanceService,
    report_service: ReportService,
}

impl Default for CommandService {
    fn default() -> Self {
        let ledger_service = LedgerService::new();
        let break_calendar = BreakCalendar::new();
        let allowance_service =
            AllowanceService::new(break_calendar.clone(), ledger_service.clone());
        let report_service = ReportService::new(
            allowance_service.clone(),
            break_calendar.clone(),
            ledger_service.clone(),
        );
        Self::new(ledger_service, break_calendar, allowance_service, report_service)
    }
}

impl CommandService {
    pub fn new(
        ledger_service: LedgerService,
        break_calendar: BreakCalendar,
        allowance_service: AllowanceService,
        report_service: ReportService,
    ) -> Self {
        Self {
            ledger_service,
            break_calendar,
            allowance_service,
            report_service,
        }
    }

    /// Run one command for `user_key` as of `now`
    pub fn execute<S: BudgetStorage + ?Sized>(
        &self,
        store: &S,
        user_key: &str,
        command: BudgetCommand,
        now: DateTime<FixedOffset>,
    ) -> Result<CommandResponse> {
        let today = now.date_naive();
        let existing = store.get(user_key)?;
        debug!("Executing '{}' for user {}", command.name(), user_key);

        if let BudgetCommand::Setup {
            starting_balances,
            end_date,
        } = &command
        {
            let record = self.setup(existing.as_ref(), starting_balances, *end_date, today)?;
            store.put(user_key, &record)?;
            info!("User {} set up a budget ending {}", user_key, end_date);
            return Ok(self.setup_response(&record, *end_date));
        }

        let mut record = match existing {
            Some(record) if record.is_configured() => record,
            _ => return Err(BudgetError::NotConfigured.into()),
        };
        let mutating = command.is_mutating();
        let message = self.apply(&mut record, command, now)?;

        if mutating {
            store.put(user_key, &record)?;
        }

        Ok(CommandResponse::new(message).with_figures(
            self.allowance_service.daily_allowance(&record),
            self.allowance_service.total_balance(&record),
        ))
    }

    fn setup(
        &self,
        existing: Option<&UserBudgetRecord>,
        starting_balances: &Balances,
        end_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<UserBudgetRecord, BudgetError> {
        if self.allowance_service.is_budget_setup(existing) {
            return Err(BudgetError::AlreadyConfigured);
        }
        ensure_future_end_date(end_date, today)?;
        for amount in starting_balances.values() {
            if !amount.is_finite() {
                return Err(BudgetError::InvalidAmount(*amount));
            }
        }
        self.allowance_service
            .setup_budget(existing, starting_balances, end_date, today)
    }

    fn setup_response(&self, record: &UserBudgetRecord, end_date: NaiveDate) -> CommandResponse {
        let daily_budget = self.allowance_service.daily_allowance(record);
        let total = self.allowance_service.total_balance(record);
        let message = format!(
            "Setup complete! Your budget will end on {}.\n\n\
             Your current balance: {}\nYour daily budget: {}",
            end_date.format("%A, %B %d, %Y"),
            self.report_service.format_balance(total),
            self.report_service.format_balance(daily_budget),
        );
        CommandResponse::new(message).with_figures(daily_budget, total)
    }

    /// Apply a command to a configured record and return the reply text
    fn apply(
        &self,
        record: &mut UserBudgetRecord,
        command: BudgetCommand,
        now: DateTime<FixedOffset>,
    ) -> Result<String, BudgetError> {
        let today = now.date_naive();
        let money = |amount: f64| self.report_service.format_balance(amount);

        match command {
            BudgetCommand::Setup { .. } => Err(BudgetError::AlreadyConfigured),
            BudgetCommand::Report => Ok(self.report_service.build_daily_report(record, today)),
            BudgetCommand::Transactions {
                start_date,
                end_date,
            } => {
                if start_date.is_some() != end_date.is_some() {
                    return Err(BudgetError::InvalidDateRange(
                        "Please provide both date ranges (start and end)".to_string(),
                    ));
                }
                Ok(self
                    .report_service
                    .build_ledger_report(record, start_date, end_date))
            }
            BudgetCommand::Spend {
                amount,
                description,
                currency,
            } => {
                let description = validate_transaction(amount, &description)?;
                self.ledger_service.record_transaction_at(
                    record,
                    amount,
                    description,
                    currency,
                    TransactionDirection::Debit,
                    now,
                )?;
                Ok(format!(
                    "Spent {} from {} ({}).\n{}",
                    money(amount),
                    currency.display_name(),
                    description,
                    self.balance_line(record, currency, today),
                ))
            }
            BudgetCommand::Credit {
                amount,
                description,
                currency,
            } => {
                let description = validate_transaction(amount, &description)?;
                self.ledger_service.record_transaction_at(
                    record,
                    amount,
                    description,
                    currency,
                    TransactionDirection::Credit,
                    now,
                )?;
                Ok(format!(
                    "Added {} to {} ({}).\n{}",
                    money(amount),
                    currency.display_name(),
                    description,
                    self.balance_line(record, currency, today),
                ))
            }
            BudgetCommand::Respread => {
                if self.allowance_service.respread(record, today)? {
                    Ok(format!(
                        "Your remaining budget has been respread over the remaining days.\n\
                         Your daily budget is now {}.",
                        money(record.daily_budget)
                    ))
                } else {
                    Ok(format!(
                        "Respreading would drop your daily budget below your floor of {}.\n\
                         Your daily budget stays at {}.",
                        money(record.budget_floor),
                        money(record.daily_budget)
                    ))
                }
            }
            BudgetCommand::SetEndDate { end_date } => {
                ensure_future_end_date(end_date, today)?;
                let daily_budget = self
                    .allowance_service
                    .set_budget_end_date(record, end_date, today)?;
                Ok(format!(
                    "Your budget end date has been set to {}.\nYour daily budget is now {}.",
                    end_date.format("%A, %B %d, %Y"),
                    money(daily_budget)
                ))
            }
            BudgetCommand::SetFloor { floor } => {
                self.allowance_service.set_budget_floor(record, floor)?;
                Ok(format!("Your budget floor is now {} per day.", money(floor)))
            }
            BudgetCommand::SetBalance { currency, amount } => {
                self.ledger_service.set_balance(record, currency, amount)?;
                Ok(format!(
                    "Your {} balance is now {}.",
                    currency.display_name(),
                    money(amount)
                ))
            }
            BudgetCommand::ListBreaks => Ok(self.describe_breaks(record, today)),
            BudgetCommand::AddBreak { start, end } => {
                if start > end {
                    return Err(BudgetError::InvalidDateRange(format!(
                        "Break starts {} after it ends {}",
                        start, end
                    )));
                }
                let interval = self.break_calendar.add_break(record, start, end);
                let index = record.breaks.len() - 1;
                let mut message = format!("Added break [{}] {}.", index, interval);

                let overlaps: Vec<String> = self
                    .break_calendar
                    .overlapping_pairs(record)
                    .into_iter()
                    .filter(|(_, second)| *second == index)
                    .map(|(first, _)| format!("[{}]", first))
                    .collect();
                if !overlaps.is_empty() {
                    message.push_str(&format!("\nIt overlaps {}.", overlaps.join(", ")));
                }
                Ok(message)
            }
            BudgetCommand::RemoveBreak { index } => {
                let removed = self.break_calendar.remove_break(record, index)?;
                Ok(format!("Removed break {}.", removed))
            }
        }
    }

    fn balance_line(
        &self,
        record: &UserBudgetRecord,
        currency: CurrencyKind,
        today: NaiveDate,
    ) -> String {
        format!(
            "{} balance: {}\nRemaining today: {}",
            currency.display_name(),
            self.report_service.format_balance(record.balance(currency)),
            self.report_service
                .format_balance(self.allowance_service.remaining_today(record, today)),
        )
    }

    fn describe_breaks(&self, record: &UserBudgetRecord, today: NaiveDate) -> String {
        let breaks = self.break_calendar.list_breaks(record);
        if breaks.is_empty() {
            return "No breaks scheduled".to_string();
        }

        let mut text = String::from("Breaks:");
        for (index, interval) in breaks {
            text.push_str(&format!(
                "\n  [{}] {} ({} chargeable days left)",
                index,
                interval,
                interval.chargeable_days_from(today),
            ));
        }
        text
    }
}

fn ensure_future_end_date(end_date: NaiveDate, today: NaiveDate) -> Result<(), BudgetError> {
    if end_date <= today {
        return Err(BudgetError::InvalidDateRange(
            "The budget end date must be in the future".to_string(),
        ));
    }
    Ok(())
}

/// Check a spend/credit request and return the trimmed description
fn validate_transaction(amount: f64, description: &str) -> Result<&str, BudgetError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BudgetError::InvalidAmount(amount));
    }
    let description = description.trim();
    if description.is_empty() || description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(BudgetError::InvalidDescription {
            max: MAX_DESCRIPTION_LENGTH,
        });
    }
    Ok(description)
}
