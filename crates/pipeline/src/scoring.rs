//! Customer value scoring.
//!
//! Transaction count and total amount live on very different scales, so each
//! is min-max normalized over the whole population before the two are
//! combined:
//!
//! ```text
//! scaled = (value - min) / (max - min)
//! score  = 100 * (w_count * scaled_count + w_amount * scaled_amount)
//! ```
//!
//! With weights summing to one the score lies in `[0, 100]`.

use crate::churn::ChurnClassifier;
use crate::config::CampaignConfig;
use crate::error::{PipelineError, Result};
use data_loader::{CustomerSummary, CustomerTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance on the sum of the score weights
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// The two normalized inputs of the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    TransactionCount,
    TotalAmount,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::TransactionCount => write!(f, "transaction_count"),
            Feature::TotalAmount => write!(f, "total_amount"),
        }
    }
}

/// What to do when every customer has the same value for a feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// Abort with [`PipelineError::DegenerateFeature`]
    #[default]
    Fail,
    /// Scale the feature to 0.0 for every customer
    Zero,
}

/// Relative influence of frequency and spend on the score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreWeights {
    pub count: f64,
    pub amount: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            count: 0.5,
            amount: 0.5,
        }
    }
}

impl ScoreWeights {
    /// Weights must be finite, non-negative and sum to one
    pub fn validate(&self) -> Result<()> {
        let valid = |w: f64| w.is_finite() && w >= 0.0;
        if !valid(self.count) || !valid(self.amount) {
            return Err(PipelineError::InvalidConfig(format!(
                "score weights must be non-negative, got count={} amount={}",
                self.count, self.amount
            )));
        }
        if (self.count + self.amount - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(PipelineError::InvalidConfig(format!(
                "score weights must sum to 1, got {}",
                self.count + self.amount
            )));
        }
        Ok(())
    }
}

/// Observed range of one feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    pub min: f64,
    pub max: f64,
}

impl MinMaxScaler {
    /// Fit on a population; `None` when it is empty
    pub fn fit(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |range, value| match range {
            None => Some(Self { min: value, max: value }),
            Some(Self { min, max }) => Some(Self {
                min: min.min(value),
                max: max.max(value),
            }),
        })
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Every observed value is the same, so scaling would divide by zero
    pub fn is_degenerate(&self) -> bool {
        self.range() <= 0.0
    }

    /// Map a value into `[0, 1]`; min maps to exactly 0, max to exactly 1
    pub fn transform(&self, value: f64) -> f64 {
        ((value - self.min) / self.range()).clamp(0.0, 1.0)
    }
}

/// A customer summary with churn label and score attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCustomer {
    pub summary: CustomerSummary,
    pub churned: bool,
    pub scaled_count: f64,
    pub scaled_amount: f64,
    pub score: f64,
}

impl ScoredCustomer {
    pub fn customer_id(&self) -> &str {
        &self.summary.customer_id
    }
}

/// Labels and scores a whole customer population.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerScorer {
    weights: ScoreWeights,
    degenerate_policy: DegeneratePolicy,
}

impl CustomerScorer {
    pub fn new(weights: ScoreWeights, degenerate_policy: DegeneratePolicy) -> Self {
        Self {
            weights,
            degenerate_policy,
        }
    }

    pub fn from_config(config: &CampaignConfig) -> Self {
        Self::new(config.weights, config.degenerate_policy)
    }

    /// Score every customer.
    ///
    /// Output order is the aggregation order of `customers` (ascending id).
    pub fn score_all(
        &self,
        customers: &CustomerTable,
        classifier: &ChurnClassifier,
    ) -> Result<Vec<ScoredCustomer>> {
        self.weights.validate()?;

        let count_scaler = self.fit_feature(
            Feature::TransactionCount,
            customers.values().map(|c| c.transaction_count as f64),
        )?;
        let amount_scaler = self.fit_feature(
            Feature::TotalAmount,
            customers.values().map(|c| c.total_amount),
        )?;

        let scored = customers
            .values()
            .map(|summary| {
                let scaled_count =
                    count_scaler.map_or(0.0, |s| s.transform(summary.transaction_count as f64));
                let scaled_amount = amount_scaler.map_or(0.0, |s| s.transform(summary.total_amount));
                ScoredCustomer {
                    summary: summary.clone(),
                    churned: classifier.classify(summary),
                    scaled_count,
                    scaled_amount,
                    score: self.combine(scaled_count, scaled_amount),
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "Scored {} customers ({} churned)",
            scored.len(),
            scored.iter().filter(|c| c.churned).count()
        );
        Ok(scored)
    }

    /// Weighted score in `[0, 100]`
    pub fn combine(&self, scaled_count: f64, scaled_amount: f64) -> f64 {
        let score = 100.0 * (self.weights.count * scaled_count + self.weights.amount * scaled_amount);
        score.clamp(0.0, 100.0)
    }

    /// Fit a feature's scaler, applying the degenerate policy.
    ///
    /// `Ok(None)` means the feature contributes 0.0 for everyone.
    fn fit_feature(
        &self,
        feature: Feature,
        values: impl IntoIterator<Item = f64>,
    ) -> Result<Option<MinMaxScaler>> {
        let scaler = MinMaxScaler::fit(values).ok_or(PipelineError::EmptyInput)?;
        if !scaler.is_degenerate() {
            return Ok(Some(scaler));
        }
        match self.degenerate_policy {
            DegeneratePolicy::Fail => Err(PipelineError::DegenerateFeature {
                feature,
                value: scaler.min,
            }),
            DegeneratePolicy::Zero => {
                tracing::warn!(
                    "Every customer has {} = {}; scaling it to 0 for all",
                    feature,
                    scaler.min
                );
                Ok(None)
            }
        }
    }
}
