//! Per-customer aggregation.
//!
//! One pass over the transactions computing, for every customer id, the
//! last (and first) transaction date, the number of transactions and the
//! summed amount.

use crate::error::{DataLoadError, Result};
use crate::types::{CustomerSummary, CustomerTable, Transaction, TransactionTable};
use std::collections::btree_map::Entry;

/// Group transactions by customer.
///
/// Returns one summary per distinct customer id, keyed and iterated in
/// ascending id order. Fails with [`DataLoadError::EmptyInput`] when there
/// is nothing to aggregate.
pub fn aggregate_customers(transactions: &[Transaction]) -> Result<CustomerTable> {
    if transactions.is_empty() {
        return Err(DataLoadError::EmptyInput);
    }

    let mut customers = CustomerTable::new();
    for transaction in transactions {
        match customers.entry(transaction.customer_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(CustomerSummary::from_transaction(transaction));
            }
            Entry::Occupied(mut slot) => slot.get_mut().absorb(transaction),
        }
    }

    tracing::debug!(
        "Aggregated {} transactions into {} customers",
        transactions.len(),
        customers.len()
    );
    Ok(customers)
}

impl TransactionTable {
    /// Validate, then aggregate the whole table, see [`aggregate_customers`]
    pub fn summarize(&self) -> Result<CustomerTable> {
        self.validate()?;
        aggregate_customers(&self.transactions)
    }
}
