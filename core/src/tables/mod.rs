//! CSV table store.
//!
//! RULE: Only the tables module reads or writes CSV.
//! Stages work on typed records and never see a file.
//!
//! Loading is header-driven: columns are looked up by name, so column
//! order in the source file does not matter. Unparseable required
//! numerics and undecodable records drop the row (recorded as a
//! `DroppedRow`); unparseable dates become `None`. A missing file is
//! `MissingTable`, a missing column `MissingData`; either one takes out
//! only that table.

use crate::{
    config::TableNames,
    error::{ReportError, ReportResult},
    records::{DroppedRow, InputTables},
};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

mod crm;
mod finance;
mod marketing;
mod reports;

pub use crm::read_deals;
pub use finance::read_payments;
pub use marketing::{read_ad_spend, read_touches};

/// Rows loaded from one table plus the rows that were left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub rows:    Vec<T>,
    pub dropped: Vec<DroppedRow>,
}

impl<T> Loaded<T> {
    fn new() -> Self {
        Self {
            rows:    Vec::new(),
            dropped: Vec::new(),
        }
    }

    fn drop_row(&mut self, table: &'static str, row: usize, reason: String) {
        log::warn!("tables: dropped {table} line {row}: {reason}");
        self.dropped.push(DroppedRow { table, row, reason });
    }
}

pub struct TableStore {
    input_dir:  PathBuf,
    output_dir: PathBuf,
    names:      TableNames,
}

impl TableStore {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>, names: TableNames) -> Self {
        Self {
            input_dir:  input_dir.into(),
            output_dir: output_dir.into(),
            names,
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Load all four input tables. A table that is missing or lacks a
    /// required column comes back as `None`; any other failure aborts.
    pub fn load_inputs(&self) -> ReportResult<InputTables> {
        let mut inputs = InputTables::default();

        inputs.deals = keep_if_present(self.load_deals(), &mut inputs.dropped)?;
        inputs.payments = keep_if_present(self.load_payments(), &mut inputs.dropped)?;
        inputs.touches = keep_if_present(self.load_touches(), &mut inputs.dropped)?;
        inputs.ad_spend = keep_if_present(self.load_ad_spend(), &mut inputs.dropped)?;

        log::info!(
            "tables: loaded {} deals, {} payments, {} touches, {} ad spend rows ({} rows dropped)",
            inputs.deals.as_ref().map_or(0, Vec::len),
            inputs.payments.as_ref().map_or(0, Vec::len),
            inputs.touches.as_ref().map_or(0, Vec::len),
            inputs.ad_spend.as_ref().map_or(0, Vec::len),
            inputs.dropped.len()
        );
        Ok(inputs)
    }

    fn open_input(&self, file_name: &str, table: &'static str) -> ReportResult<File> {
        let path = self.input_dir.join(file_name);
        match File::open(&path) {
            Ok(f) => Ok(f),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::error!("tables: {} not found", path.display());
                Err(ReportError::MissingTable { table })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn input_path(&self, file_name: &str) -> PathBuf {
        self.input_dir.join(file_name)
    }

    fn output_path(&self, file_name: &str) -> ReportResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(self.output_dir.join(file_name))
    }
}

fn keep_if_present<T>(
    loaded: ReportResult<Loaded<T>>,
    dropped: &mut Vec<DroppedRow>,
) -> ReportResult<Option<Vec<T>>> {
    match loaded {
        Ok(table) => {
            dropped.extend(table.dropped);
            Ok(Some(table.rows))
        }
        Err(e) if e.is_missing_input() => {
            log::error!("tables: {e}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

// ── Header lookup ───────────────────────────────────────────────────

struct Columns {
    table:   &'static str,
    headers: Vec<String>,
}

impl Columns {
    fn from_reader<R: io::Read>(table: &'static str, reader: &mut csv::Reader<R>) -> ReportResult<Self> {
        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        Ok(Self { table, headers })
    }

    fn index(&self, name: &str) -> ReportResult<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReportError::MissingData {
                table:  self.table,
                column: name.to_string(),
            })
    }
}

fn csv_reader<R: io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

fn cell(record: &csv::StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("").trim()
}

/// Source line of the `i`-th data record (header is line 1).
fn line_of(i: usize) -> usize {
    i + 2
}

/// Turn one raw record into text. A record that cannot be parsed or has a
/// field that is not UTF-8 is dropped; only an I/O failure aborts the table.
fn decode_record<T>(
    raw: csv::Result<csv::ByteRecord>,
    table: &'static str,
    line: usize,
    loaded: &mut Loaded<T>,
) -> ReportResult<Option<csv::StringRecord>> {
    let bytes = match raw {
        Ok(bytes) => bytes,
        Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
        Err(e) => {
            loaded.drop_row(table, line, format!("malformed record: {e}"));
            return Ok(None);
        }
    };
    match csv::StringRecord::from_byte_record(bytes) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            let field = e.utf8_error().field();
            loaded.drop_row(table, line, format!("field {} is not valid UTF-8", field + 1));
            Ok(None)
        }
    }
}

// ── Coercion ────────────────────────────────────────────────────────

fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Non-negative whole count; accepts `120` and `120.0`.
fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<u64>() {
        return Some(v);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as u64)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date()))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn non_empty(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}
