//! Coupon pricing and recipient selection.
//!
//! The coupon is a fraction of the mean transaction amount, rounded by a
//! [`CouponRounding`] policy. The budget then buys `floor(budget / coupon)`
//! coupons, handed to churned customers in the order chosen by
//! [`SelectionOrder`].

use crate::config::CampaignConfig;
use crate::error::{PipelineError, Result};
use crate::filter_pipeline::FilterPipeline;
use crate::filters::{ChurnedFilter, MinimumScoreFilter};
use crate::scoring::ScoredCustomer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How the raw coupon value is rounded before dividing the budget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponRounding {
    /// Round to cents, then to the nearest whole unit with halves away from
    /// zero: 19.4975736 -> 19.50 -> 20
    #[default]
    Nearest,
    /// Round up to the next whole unit
    Up,
    /// Keep the raw value
    Exact,
}

impl CouponRounding {
    pub fn apply(self, raw: f64) -> f64 {
        match self {
            CouponRounding::Nearest => ((raw * 100.0).round() / 100.0).round(),
            CouponRounding::Up => raw.ceil(),
            CouponRounding::Exact => raw,
        }
    }
}

/// Order in which churned customers are granted coupons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionOrder {
    /// Take churned customers in aggregation order (ascending customer id),
    /// ignoring their score
    Aggregation,
    /// Highest score first, ties broken by ascending customer id
    #[default]
    Score,
}

/// The per-customer coupon derived from the transaction population
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CouponQuote {
    pub mean_amount: f64,
    pub discount_fraction: f64,
    /// `discount_fraction * mean_amount` before rounding
    pub raw_value: f64,
    pub value: f64,
}

impl CouponQuote {
    pub fn new(mean_amount: f64, discount_fraction: f64, rounding: CouponRounding) -> Result<Self> {
        let raw_value = discount_fraction * mean_amount;
        let value = rounding.apply(raw_value);
        if !value.is_finite() || value <= 0.0 {
            return Err(PipelineError::InvalidCoupon { value });
        }
        Ok(Self {
            mean_amount,
            discount_fraction,
            raw_value,
            value,
        })
    }

    pub fn from_config(mean_amount: f64, config: &CampaignConfig) -> Result<Self> {
        Self::new(
            mean_amount,
            config.coupon_discount_fraction,
            config.coupon_rounding,
        )
    }

    /// How many coupons the budget buys
    pub fn recipient_limit(&self, budget: f64) -> Result<usize> {
        recipient_limit(budget, self.value)
    }
}

/// `floor(budget / coupon)`
pub fn recipient_limit(budget: f64, coupon_value: f64) -> Result<usize> {
    if !coupon_value.is_finite() || coupon_value <= 0.0 {
        return Err(PipelineError::InvalidCoupon {
            value: coupon_value,
        });
    }
    if !budget.is_finite() || budget < 0.0 {
        return Err(PipelineError::InvalidConfig(format!(
            "budget must be non-negative, got {budget}"
        )));
    }
    Ok((budget / coupon_value).floor() as usize)
}

/// Score descending, then customer id ascending
pub fn compare_by_score(a: &ScoredCustomer, b: &ScoredCustomer) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.customer_id().cmp(b.customer_id()))
}

/// Picks coupon recipients from a scored population.
#[derive(Debug)]
pub struct Selector {
    order: SelectionOrder,
    filters: FilterPipeline,
}

impl Selector {
    /// Selector that only keeps churned customers
    pub fn new(order: SelectionOrder) -> Self {
        Self {
            order,
            filters: FilterPipeline::new().add_filter(ChurnedFilter),
        }
    }

    /// Additionally drop customers scoring below `min_score`
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.filters = self.filters.add_filter(MinimumScoreFilter::new(min_score));
        self
    }

    pub fn from_config(config: &CampaignConfig) -> Self {
        let selector = Self::new(config.selection_order);
        match config.min_score {
            Some(min_score) => selector.with_min_score(min_score),
            None => selector,
        }
    }

    pub fn order(&self) -> SelectionOrder {
        self.order
    }

    /// Filter, order and truncate to at most `limit` customers.
    ///
    /// `scored` is expected in aggregation order, which is what
    /// [`SelectionOrder::Aggregation`] preserves.
    pub fn select(&self, scored: Vec<ScoredCustomer>, limit: usize) -> Result<Vec<ScoredCustomer>> {
        let mut eligible = self.filters.apply(scored)?;
        if self.order == SelectionOrder::Score {
            eligible.sort_by(compare_by_score);
        }
        eligible.truncate(limit);

        tracing::debug!(
            "Selected {} customers (limit {}, order {:?})",
            eligible.len(),
            limit,
            self.order
        );
        Ok(eligible)
    }
}
