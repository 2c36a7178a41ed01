//! # Data Loader Crate
//!
//! Loads customer purchase transactions and aggregates them per customer.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Transaction, CustomerSummary, TransactionTable)
//! - **parser**: Parse the delimited transaction file
//! - **index**: Load and validate a `TransactionTable`
//! - **aggregate**: Group transactions into per-customer summaries
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{ParseOptions, TransactionTable};
//! use std::path::Path;
//!
//! let table = TransactionTable::load_from_file(
//!     Path::new("data/transactions.csv"),
//!     &ParseOptions::default(),
//! )?;
//! let customers = table.summarize()?;
//!
//! println!("{} customers, mean amount {:?}", customers.len(), table.mean_amount());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod aggregate;

// Re-export commonly used types for convenience
pub use aggregate::aggregate_customers;
pub use error::{DataLoadError, Result};
pub use parser::{ISO_DATE_FORMAT, ParseOptions, RETAIL_DATE_FORMAT};
pub use types::{CustomerId, CustomerSummary, CustomerTable, Transaction, TransactionTable};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_table_creation() {
        let table = TransactionTable::new();

        assert!(table.is_empty());
        assert_eq!(table.customer_count(), 0);
        assert_eq!(table.latest_date(), None);
        assert_eq!(table.mean_amount(), None);
    }

    #[test]
    fn test_insert_transaction() {
        let mut table = TransactionTable::new();
        let day = NaiveDate::from_ymd_opt(2019, 10, 16).unwrap();

        table.insert(Transaction::new("CS1", day, 12.5));
        table.insert(Transaction::new("CS1", day, 7.5));

        assert_eq!(table.len(), 2);
        assert_eq!(table.customer_count(), 1);
        assert_eq!(table.transactions()[1].amount, 7.5);
        assert_eq!(table.mean_amount(), Some(10.0));
    }
}
