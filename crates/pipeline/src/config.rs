//! Campaign configuration.
//!
//! Every business constant of the pipeline lives here instead of being a
//! literal in the algorithm: cutoff, budget, discount fraction, rounding,
//! score weights and the two open policies (degenerate features, selection
//! order). Values come from `Default`, optionally overridden by a TOML file:
//!
//! ```toml
//! cutoff_date = "2019-10-16"
//! budget = 1000.0
//! coupon_discount_fraction = 0.3
//! coupon_rounding = "nearest"
//! selection_order = "score"
//! degenerate_policy = "fail"
//!
//! [weights]
//! count = 0.5
//! amount = 0.5
//! ```

use crate::churn::DEFAULT_CHURN_WINDOW_MONTHS;
use crate::error::{PipelineError, Result};
use crate::scoring::{DegeneratePolicy, ScoreWeights};
use crate::selection::{CouponRounding, SelectionOrder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BUDGET: f64 = 1000.0;
pub const DEFAULT_COUPON_DISCOUNT_FRACTION: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CampaignConfig {
    /// Fixed churn cutoff. When absent it is derived from the latest
    /// transaction minus `churn_window_months`.
    pub cutoff_date: Option<NaiveDate>,
    pub churn_window_months: u32,
    /// Total discount currency shared by the selected customers
    pub budget: f64,
    /// Coupon value as a fraction of the mean transaction amount
    pub coupon_discount_fraction: f64,
    pub coupon_rounding: CouponRounding,
    pub weights: ScoreWeights,
    pub degenerate_policy: DegeneratePolicy,
    pub selection_order: SelectionOrder,
    /// Optional floor on the score of a selected customer
    pub min_score: Option<f64>,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            cutoff_date: None,
            churn_window_months: DEFAULT_CHURN_WINDOW_MONTHS,
            budget: DEFAULT_BUDGET,
            coupon_discount_fraction: DEFAULT_COUPON_DISCOUNT_FRACTION,
            coupon_rounding: CouponRounding::default(),
            weights: ScoreWeights::default(),
            degenerate_policy: DegeneratePolicy::default(),
            selection_order: SelectionOrder::default(),
            min_score: None,
        }
    }
}

impl CampaignConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::InvalidConfig(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "budget must be positive, got {}",
                self.budget
            )));
        }
        let fraction = self.coupon_discount_fraction;
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "coupon_discount_fraction must be in (0, 1], got {fraction}"
            )));
        }
        self.weights.validate()?;
        if let Some(min_score) = self.min_score {
            if !(0.0..=100.0).contains(&min_score) {
                return Err(PipelineError::InvalidConfig(format!(
                    "min_score must be in [0, 100], got {min_score}"
                )));
            }
        }
        if self.cutoff_date.is_none() && self.churn_window_months == 0 {
            return Err(PipelineError::InvalidConfig(
                "churn_window_months must be at least 1 when no cutoff_date is set".to_string(),
            ));
        }
        Ok(())
    }
}
