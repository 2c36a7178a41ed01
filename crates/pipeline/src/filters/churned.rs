//! Filter to keep only churned customers.
//!
//! Active customers never receive a win-back coupon.

use crate::error::Result;
use crate::scoring::ScoredCustomer;
use crate::traits::Filter;

/// Removes every customer not labelled churned.
pub struct ChurnedFilter;

impl Filter for ChurnedFilter {
    fn name(&self) -> &str {
        "ChurnedFilter"
    }

    fn apply(&self, customers: Vec<ScoredCustomer>) -> Result<Vec<ScoredCustomer>> {
        Ok(customers.into_iter().filter(|c| c.churned).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scored;

    #[test]
    fn test_churned_filter() {
        let customers = vec![
            scored("CS1", true, 10.0),
            scored("CS2", false, 99.0),
            scored("CS3", true, 30.0),
        ];

        let filtered = ChurnedFilter.apply(customers).unwrap();

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|c| c.churned));
        assert_eq!(filtered[0].customer_id(), "CS1");
        assert_eq!(filtered[1].customer_id(), "CS3");
    }
}
