//! Churn classification, value scoring and coupon recipient selection.
//!
//! This crate provides:
//! - ChurnClassifier for labelling customers against a cutoff date
//! - CustomerScorer for min-max normalized value scores
//! - Filter trait and implementations for recipient filtering
//! - FilterPipeline for composing filters
//! - Selector and CouponQuote for turning a budget into recipients
//!
//! ## Architecture
//! The pipeline processes a customer table in stages:
//! 1. ChurnClassifier labels every customer churned or active
//! 2. CustomerScorer normalizes count and amount and combines them
//! 3. Filters remove customers that must not receive a coupon
//! 4. Selector orders the rest and keeps as many as the budget buys
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{CampaignConfig, ChurnClassifier, CouponQuote, CustomerScorer, Selector};
//!
//! let config = CampaignConfig::default();
//! let customers = table.summarize()?;
//!
//! let classifier = ChurnClassifier::from_config(&config, latest_date)?;
//! let scored = CustomerScorer::from_config(&config).score_all(&customers, &classifier)?;
//!
//! let quote = CouponQuote::from_config(mean_amount, &config)?;
//! let limit = quote.recipient_limit(config.budget)?;
//! let recipients = Selector::from_config(&config).select(scored, limit)?;
//! ```

pub mod error;
pub mod config;
pub mod churn;
pub mod scoring;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod selection;

// Re-export main types
pub use churn::ChurnClassifier;
pub use config::CampaignConfig;
pub use error::{PipelineError, Result};
pub use filter_pipeline::FilterPipeline;
pub use scoring::{CustomerScorer, DegeneratePolicy, Feature, MinMaxScaler, ScoreWeights, ScoredCustomer};
pub use selection::{CouponQuote, CouponRounding, SelectionOrder, Selector};
pub use traits::Filter;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::scoring::ScoredCustomer;
    use chrono::NaiveDate;
    use data_loader::CustomerSummary;

    /// A scored customer with only the fields filters and selectors look at
    pub(crate) fn scored(id: &str, churned: bool, score: f64) -> ScoredCustomer {
        let day = NaiveDate::from_ymd_opt(2019, 6, 1).unwrap();
        ScoredCustomer {
            summary: CustomerSummary {
                customer_id: id.to_string(),
                first_transaction_date: day,
                last_transaction_date: day,
                transaction_count: 1,
                total_amount: score,
            },
            churned,
            scaled_count: score / 100.0,
            scaled_amount: score / 100.0,
            score,
        }
    }
}
