//! Filter to ensure a minimum value threshold.
//!
//! Removes customers whose score is below a floor, so a generous budget is
//! not spent on low-value customers.

use crate::error::{PipelineError, Result};
use crate::scoring::ScoredCustomer;
use crate::traits::Filter;

/// Removes customers scoring below `min_score`.
pub struct MinimumScoreFilter {
    min_score: f64,
}

impl MinimumScoreFilter {
    /// Create a new MinimumScoreFilter.
    ///
    /// # Arguments
    /// * `min_score` - Lowest score kept, on the `[0, 100]` scale
    pub fn new(min_score: f64) -> Self {
        Self { min_score }
    }
}

impl Filter for MinimumScoreFilter {
    fn name(&self) -> &str {
        "MinimumScoreFilter"
    }

    fn apply(&self, customers: Vec<ScoredCustomer>) -> Result<Vec<ScoredCustomer>> {
        if !(0.0..=100.0).contains(&self.min_score) {
            return Err(PipelineError::InvalidConfig(format!(
                "min_score must be in [0, 100], got {}",
                self.min_score
            )));
        }
        Ok(customers
            .into_iter()
            .filter(|c| c.score >= self.min_score)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scored;

    #[test]
    fn test_minimum_score_filter() {
        let customers = vec![
            scored("CS1", true, 75.0),
            scored("CS2", true, 40.0),
            scored("CS3", false, 40.5),
        ];

        let filter = MinimumScoreFilter::new(40.5);
        let filtered = filter.apply(customers).unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].customer_id(), "CS1");
        assert_eq!(filtered[1].customer_id(), "CS3");
    }

    #[test]
    fn test_zero_threshold_keeps_everyone() {
        let customers = vec![scored("CS1", true, 0.0), scored("CS2", true, 100.0)];

        let filtered = MinimumScoreFilter::new(0.0).apply(customers).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_out_of_range_threshold() {
        let result = MinimumScoreFilter::new(150.0).apply(vec![scored("CS1", true, 1.0)]);
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }
}
