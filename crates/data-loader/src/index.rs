//! Loading a `TransactionTable` from disk.
//!
//! Steps:
//! 1. Parse the CSV file into transactions
//! 2. Build the table and its per-customer index
//! 3. Validate the loaded data

use crate::error::{DataLoadError, Result};
use crate::parser::{self, ParseOptions};
use crate::types::*;
use std::path::Path;
use std::time::Instant;

impl TransactionTable {
    /// Load and validate a transaction file.
    ///
    /// This is the main entry point for loading data.
    pub fn load_from_file(path: &Path, options: &ParseOptions) -> Result<Self> {
        tracing::info!("Loading transactions from {}", path.display());
        let start = Instant::now();

        let transactions = parser::parse_transactions_file(path, options)?;
        let table = Self::from_transactions(transactions);
        table.validate()?;

        tracing::info!(
            "Loaded {} transactions for {} customers in {:?}",
            table.len(),
            table.customer_count(),
            start.elapsed()
        );
        Ok(table)
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - the table is not empty
    /// - every amount is finite and non-negative
    /// - every customer id is non-empty
    ///
    /// The parser already enforces the per-row rules; this guards tables
    /// built directly from transactions.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(DataLoadError::EmptyInput);
        }
        for (position, transaction) in self.transactions.iter().enumerate() {
            // +2: 1-based, and the header occupies line 1
            let line = position as u64 + 2;
            if transaction.customer_id.is_empty() {
                return Err(DataLoadError::MalformedRecord {
                    line,
                    reason: "Missing customer_id".to_string(),
                });
            }
            if !transaction.amount.is_finite() || transaction.amount < 0.0 {
                return Err(DataLoadError::MalformedRecord {
                    line,
                    reason: format!("Invalid tran_amount {}", transaction.amount),
                });
            }
        }
        Ok(())
    }
}
