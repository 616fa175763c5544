//! # Transaction Repository
//!
//! Stores a user's ledger in `{user}/transactions.csv`, oldest first:
//!
//! ```csv
//! timestamp,currency,description,amount
//! 2026-10-19T12:30:00-04:00,diningDollars,Lunch,-15
//! ```

use anyhow::{anyhow, Context, Result};
use chrono::DateTime;
use csv::{Reader, StringRecord, Writer};
use log::debug;
use std::path::PathBuf;

use super::connection::CsvConnection;
use crate::domain::models::Transaction;
use shared::CurrencyKind;

const TRANSACTIONS_FILE: &str = "transactions.csv";
const HEADER: [&str; 4] = ["timestamp", "currency", "description", "amount"];

#[derive(Clone)]
pub struct TransactionRepository {
    connection: CsvConnection,
}

impl TransactionRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn transactions_path(&self, directory: &str) -> PathBuf {
        self.connection.base_directory().join(directory).join(TRANSACTIONS_FILE)
    }

    /// Read every transaction in file order. A missing file is an empty ledger.
    pub fn read_transactions(&self, directory: &str) -> Result<Vec<Transaction>> {
        let path = self.transactions_path(directory);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut csv_reader = Reader::from_path(&path)
            .with_context(|| format!("Could not open {}", path.display()))?;
        let mut transactions = Vec::new();

        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;
            let transaction = parse_transaction(&record)
                .with_context(|| format!("{} row {}", path.display(), row + 1))?;
            transactions.push(transaction);
        }

        debug!("Read {} transactions from {}", transactions.len(), path.display());
        Ok(transactions)
    }

    /// Replace the ledger file with `transactions`
    pub fn write_transactions(&self, directory: &str, transactions: &[Transaction]) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        csv_writer.write_record(HEADER)?;

        for transaction in transactions {
            csv_writer.write_record([
                transaction.timestamp.to_rfc3339(),
                transaction.currency.key().to_string(),
                transaction.description.clone(),
                transaction.amount.to_string(),
            ])?;
        }

        let contents = csv_writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush transactions: {}", e.error()))?;
        CsvConnection::write_atomic(&self.transactions_path(directory), &contents)
    }
}

fn field<'a>(record: &'a StringRecord, index: usize) -> Result<&'a str> {
    record
        .get(index)
        .ok_or_else(|| anyhow!("Missing '{}' column", HEADER[index]))
}

fn parse_transaction(record: &StringRecord) -> Result<Transaction> {
    let timestamp = DateTime::parse_from_rfc3339(field(record, 0)?)
        .context("Invalid timestamp")?;
    let currency: CurrencyKind = field(record, 1)?.parse()?;
    let description = field(record, 2)?.to_string();
    let amount: f64 = field(record, 3)?.parse().context("Invalid amount")?;

    Ok(Transaction {
        amount,
        description,
        currency,
        timestamp,
    })
}
