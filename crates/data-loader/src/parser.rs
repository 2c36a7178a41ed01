//! Parser for transaction CSV files.
//!
//! Expected layout: a header row naming exactly `customer_id`, `trans_date`
//! and `tran_amount` (in any order), then one row per purchase:
//!
//! ```text
//! customer_id,trans_date,tran_amount
//! CS5295,2013-02-11,35
//! CS4768,2015-03-15,39
//! ```
//!
//! The date format is never guessed: it is an explicit chrono format string
//! carried in [`ParseOptions`].

use crate::error::{DataLoadError, Result};
use crate::types::Transaction;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

pub const CUSTOMER_ID_COLUMN: &str = "customer_id";
pub const DATE_COLUMN: &str = "trans_date";
pub const AMOUNT_COLUMN: &str = "tran_amount";

/// The only accepted set of header names
pub const EXPECTED_COLUMNS: [&str; 3] = [CUSTOMER_ID_COLUMN, DATE_COLUMN, AMOUNT_COLUMN];

/// ISO-8601 calendar date, e.g. `2019-10-16`
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Day-abbreviated-month-short-year, e.g. `16-Oct-19`, as used by the public
/// retail transactions dataset
pub const RETAIL_DATE_FORMAT: &str = "%d-%b-%y";

/// How to read the delimited input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// chrono `strftime`-style format of the `trans_date` column
    pub date_format: String,
    /// Field delimiter byte
    pub delimiter: u8,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            date_format: ISO_DATE_FORMAT.to_string(),
            delimiter: b',',
        }
    }
}

impl ParseOptions {
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    customer_id: usize,
    trans_date: usize,
    amount: usize,
}

/// Parse a transaction file from disk
pub fn parse_transactions_file(path: &Path, options: &ParseOptions) -> Result<Vec<Transaction>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    parse_transactions(file, options)
}

/// Parse transactions from any reader.
///
/// Fails on the first malformed row; nothing is returned for a partially
/// valid file.
pub fn parse_transactions<R: Read>(reader: R, options: &ParseOptions) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(Trim::All)
        // Rows of the wrong width are reported as MalformedRecord, not a csv error
        .flexible(true)
        .from_reader(reader);

    let layout = resolve_columns(rdr.headers()?)?;

    let mut transactions = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        transactions.push(parse_record(&record, layout, line, options)?);
    }

    Ok(transactions)
}

fn resolve_columns(headers: &StringRecord) -> Result<ColumnLayout> {
    let found: Vec<&str> = headers.iter().collect();
    let invalid = || DataLoadError::InvalidHeader {
        expected: EXPECTED_COLUMNS.join(", "),
        found: found.join(", "),
    };

    if found.len() != EXPECTED_COLUMNS.len() {
        return Err(invalid());
    }

    let position = |name: &str| found.iter().position(|header| *header == name);
    match (
        position(CUSTOMER_ID_COLUMN),
        position(DATE_COLUMN),
        position(AMOUNT_COLUMN),
    ) {
        (Some(customer_id), Some(trans_date), Some(amount)) => Ok(ColumnLayout {
            customer_id,
            trans_date,
            amount,
        }),
        _ => Err(invalid()),
    }
}

fn parse_record(
    record: &StringRecord,
    layout: ColumnLayout,
    line: u64,
    options: &ParseOptions,
) -> Result<Transaction> {
    if record.len() != EXPECTED_COLUMNS.len() {
        return Err(DataLoadError::MalformedRecord {
            line,
            reason: format!(
                "Expected {} fields ({}), found {}",
                EXPECTED_COLUMNS.len(),
                EXPECTED_COLUMNS.join(", "),
                record.len()
            ),
        });
    }

    let customer_id = required_field(record, layout.customer_id, CUSTOMER_ID_COLUMN, line)?;
    let raw_date = required_field(record, layout.trans_date, DATE_COLUMN, line)?;
    let raw_amount = required_field(record, layout.amount, AMOUNT_COLUMN, line)?;

    let trans_date = NaiveDate::parse_from_str(raw_date, &options.date_format).map_err(|e| {
        DataLoadError::MalformedRecord {
            line,
            reason: format!(
                "Invalid {DATE_COLUMN} '{raw_date}' for format '{}': {e}",
                options.date_format
            ),
        }
    })?;

    let amount = parse_amount(raw_amount).map_err(|reason| DataLoadError::MalformedRecord {
        line,
        reason,
    })?;

    Ok(Transaction::new(customer_id, trans_date, amount))
}

fn required_field<'r>(
    record: &'r StringRecord,
    index: usize,
    column: &str,
    line: u64,
) -> Result<&'r str> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(DataLoadError::MalformedRecord {
            line,
            reason: format!("Missing {column}"),
        }),
    }
}

/// Amounts must be finite and non-negative
fn parse_amount(raw: &str) -> std::result::Result<f64, String> {
    let amount: f64 = raw
        .parse()
        .map_err(|e| format!("Invalid {AMOUNT_COLUMN} '{raw}': {e}"))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!(
            "Invalid {AMOUNT_COLUMN} '{raw}': must be a finite non-negative number"
        ));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Vec<Transaction>> {
        parse_transactions(input.as_bytes(), &ParseOptions::default())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_rows() {
        let rows = parse("customer_id,trans_date,tran_amount\nCS5295,2013-02-11,35\nCS4768,2015-03-15,39.5\n")
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Transaction::new("CS5295", date(2013, 2, 11), 35.0));
        assert_eq!(rows[1].amount, 39.5);
    }

    #[test]
    fn test_columns_in_any_order_and_trimmed() {
        let rows = parse("tran_amount, customer_id ,trans_date\n 12 ,CS1, 2019-10-16\n").unwrap();

        assert_eq!(rows, vec![Transaction::new("CS1", date(2019, 10, 16), 12.0)]);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let rows = parse("customer_id,trans_date,tran_amount\n\nCS1,2019-01-01,1\n\n").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_header_only_is_empty() {
        let rows = parse("customer_id,trans_date,tran_amount\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_rejects_wrong_header() {
        let err = parse("customer,trans_date,tran_amount\nCS1,2019-01-01,1\n").unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidHeader { .. }));

        let err = parse("customer_id,trans_date,tran_amount,store\nCS1,2019-01-01,1,A\n").unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidHeader { .. }));

        let err = parse("").unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidHeader { .. }));
    }

    #[test]
    fn test_missing_field_reports_line() {
        let err = parse("customer_id,trans_date,tran_amount\nCS1,2019-01-01,1\nCS2,2019-01-02\n")
            .unwrap_err();

        match err {
            DataLoadError::MalformedRecord { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("tran_amount"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_rows_of_wrong_width() {
        // Unquoted thousands separator splits the amount into two fields
        let err = parse("customer_id,trans_date,tran_amount\nCS1,2019-10-16,1,000\n").unwrap_err();
        match err {
            DataLoadError::MalformedRecord { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("found 4"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = parse("customer_id,trans_date,tran_amount\nCS1,2019-01-01,1\nCS2\n").unwrap_err();
        match err {
            DataLoadError::MalformedRecord { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("found 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_bad_date_and_amount() {
        let err = parse("customer_id,trans_date,tran_amount\nCS1,16/10/2019,1\n").unwrap_err();
        assert!(matches!(err, DataLoadError::MalformedRecord { line: 2, .. }));

        let err = parse("customer_id,trans_date,tran_amount\nCS1,2019-10-16,abc\n").unwrap_err();
        assert!(matches!(err, DataLoadError::MalformedRecord { line: 2, .. }));

        let err = parse("customer_id,trans_date,tran_amount\nCS1,2019-10-16,-4\n").unwrap_err();
        assert!(matches!(err, DataLoadError::MalformedRecord { line: 2, .. }));

        let err = parse("customer_id,trans_date,tran_amount\nCS1,2019-10-16,NaN\n").unwrap_err();
        assert!(matches!(err, DataLoadError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_retail_date_format_and_delimiter() {
        let options = ParseOptions::default()
            .with_date_format(RETAIL_DATE_FORMAT)
            .with_delimiter(b';');
        let rows = parse_transactions(
            "customer_id;trans_date;tran_amount\nCS5295;11-Feb-13;35\n".as_bytes(),
            &options,
        )
        .unwrap();

        assert_eq!(rows[0].trans_date, date(2013, 2, 11));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_transactions_file(Path::new("does/not/exist.csv"), &ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
