//! Core domain types for purchase transactions.
//!
//! `Transaction` is what the parser produces, `CustomerSummary` is what the
//! aggregator produces, and `TransactionTable` is the in-memory table that
//! owns the transactions and answers the population-level queries the
//! pipeline needs (latest date, mean amount, per-customer rows).

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Customer identifier as it appears in the `customer_id` column
pub type CustomerId = String;

/// Aggregated customers keyed by id.
///
/// A `BTreeMap` so that iteration order (ascending customer id) is stable
/// from run to run; the unsorted selection order relies on it.
pub type CustomerTable = BTreeMap<CustomerId, CustomerSummary>;

// =============================================================================
// Transaction
// =============================================================================

/// One purchase event. Created by the loader, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub customer_id: CustomerId,
    pub trans_date: NaiveDate,
    /// Non-negative purchase amount
    pub amount: f64,
}

impl Transaction {
    pub fn new(customer_id: impl Into<CustomerId>, trans_date: NaiveDate, amount: f64) -> Self {
        Self {
            customer_id: customer_id.into(),
            trans_date,
            amount,
        }
    }
}

// =============================================================================
// CustomerSummary
// =============================================================================

/// Per-customer aggregate over every transaction of that customer.
///
/// `transaction_count` is always at least 1: a summary only exists for a
/// customer id that was observed in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    pub customer_id: CustomerId,
    pub first_transaction_date: NaiveDate,
    pub last_transaction_date: NaiveDate,
    pub transaction_count: u32,
    pub total_amount: f64,
}

impl CustomerSummary {
    /// Start a summary from the customer's first observed transaction
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            customer_id: transaction.customer_id.clone(),
            first_transaction_date: transaction.trans_date,
            last_transaction_date: transaction.trans_date,
            transaction_count: 1,
            total_amount: transaction.amount,
        }
    }

    /// Fold another transaction of the same customer into the summary
    pub fn absorb(&mut self, transaction: &Transaction) {
        debug_assert_eq!(self.customer_id, transaction.customer_id);
        self.first_transaction_date = self.first_transaction_date.min(transaction.trans_date);
        self.last_transaction_date = self.last_transaction_date.max(transaction.trans_date);
        self.transaction_count += 1;
        self.total_amount += transaction.amount;
    }

    /// Mean spend per purchase
    pub fn average_amount(&self) -> f64 {
        self.total_amount / self.transaction_count as f64
    }
}

// =============================================================================
// TransactionTable - the loaded input
// =============================================================================

/// The full, validated transaction set held in memory.
///
/// Rows keep their file order; `by_customer` indexes row positions so that a
/// single customer's history can be listed without a scan.
#[derive(Debug, Clone, Default)]
pub struct TransactionTable {
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) by_customer: HashMap<CustomerId, Vec<usize>>,
}

impl TransactionTable {
    /// Creates a new, empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from already-parsed transactions
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let mut table = Self::new();
        for transaction in transactions {
            table.insert(transaction);
        }
        table
    }

    /// Append a transaction and update the customer index
    pub fn insert(&mut self, transaction: Transaction) {
        let position = self.transactions.len();
        self.by_customer
            .entry(transaction.customer_id.clone())
            .or_default()
            .push(position);
        self.transactions.push(transaction);
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// All transactions in file order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Number of distinct customers
    pub fn customer_count(&self) -> usize {
        self.by_customer.len()
    }

    /// Every transaction of one customer, in file order.
    ///
    /// Empty when the customer id was never observed.
    pub fn transactions_for(&self, customer_id: &str) -> Vec<&Transaction> {
        self.by_customer
            .get(customer_id)
            .map(|positions| positions.iter().map(|&i| &self.transactions[i]).collect())
            .unwrap_or_default()
    }

    /// Earliest and latest transaction date, `None` for an empty table
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.transactions.iter().map(|t| t.trans_date).min()?;
        let last = self.transactions.iter().map(|t| t.trans_date).max()?;
        Some((first, last))
    }

    /// Most recent transaction date across all customers
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.transactions.iter().map(|t| t.trans_date).max()
    }

    /// Mean amount over all transactions (not over customers)
    pub fn mean_amount(&self) -> Option<f64> {
        if self.transactions.is_empty() {
            return None;
        }
        let total: f64 = self.transactions.iter().map(|t| t.amount).sum();
        Some(total / self.transactions.len() as f64)
    }
}
