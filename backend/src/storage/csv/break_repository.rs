//! Stores a user's breaks in `{user}/breaks.csv` as `start,end` rows of ISO dates.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::{Reader, Writer};
use log::debug;
use std::path::PathBuf;

use super::connection::CsvConnection;
use crate::domain::models::DateInterval;

const BREAKS_FILE: &str = "breaks.csv";

#[derive(Clone)]
pub struct BreakRepository {
    connection: CsvConnection,
}

impl BreakRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn breaks_path(&self, directory: &str) -> PathBuf {
        self.connection.base_directory().join(directory).join(BREAKS_FILE)
    }

    pub fn read_breaks(&self, directory: &str) -> Result<Vec<DateInterval>> {
        let path = self.breaks_path(directory);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut csv_reader = Reader::from_path(&path)
            .with_context(|| format!("Could not open {}", path.display()))?;
        let mut breaks = Vec::new();

        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;
            let parse = |index: usize| -> Result<NaiveDate> {
                let value = record
                    .get(index)
                    .ok_or_else(|| anyhow!("{} row {}: missing column", path.display(), row + 1))?;
                NaiveDate::parse_from_str(value, "%Y-%m-%d").with_context(|| {
                    format!("{} row {}: invalid date '{}'", path.display(), row + 1, value)
                })
            };
            breaks.push(DateInterval::new(parse(0)?, parse(1)?));
        }

        debug!("Read {} breaks from {}", breaks.len(), path.display());
        Ok(breaks)
    }

    pub fn write_breaks(&self, directory: &str, breaks: &[DateInterval]) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        csv_writer.write_record(["start", "end"])?;
        for interval in breaks {
            csv_writer.write_record([
                interval.start.format("%Y-%m-%d").to_string(),
                interval.end.format("%Y-%m-%d").to_string(),
            ])?;
        }

        let contents = csv_writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush breaks: {}", e.error()))?;
        CsvConnection::write_atomic(&self.breaks_path(directory), &contents)
    }
}
