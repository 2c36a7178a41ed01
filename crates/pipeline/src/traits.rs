//! Core traits for the selection pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to a scored customer population.

use crate::error::Result;
use crate::scoring::ScoredCustomer;

/// Core trait for filtering scored customers.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across threads
/// - Filters take ownership of the Vec<ScoredCustomer> and return a filtered Vec
/// - Filters must keep the relative order of the customers they retain
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of customers.
    ///
    /// # Arguments
    /// * `customers` - The customers to filter (takes ownership)
    ///
    /// # Returns
    /// * `Ok(Vec<ScoredCustomer>)` - The retained customers
    /// * `Err` - If filtering fails
    fn apply(&self, customers: Vec<ScoredCustomer>) -> Result<Vec<ScoredCustomer>>;
}
