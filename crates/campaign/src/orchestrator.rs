//! # Campaign Orchestrator
//!
//! This module coordinates the entire planning pipeline:
//! 1. Aggregate transactions per customer
//! 2. Resolve the churn cutoff and classify customers
//! 3. Score customers
//! 4. Price the coupon and derive how many customers the budget covers
//! 5. Select the recipients
//!
//! Every step recomputes from the full table; nothing is cached between
//! runs, so a planner can be reused for any number of tables.

use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use data_loader::{CustomerId, TransactionTable};
use pipeline::{
    CampaignConfig, ChurnClassifier, CouponQuote, CustomerScorer, ScoredCustomer, SelectionOrder,
    Selector,
};

/// One customer granted a coupon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouponRecipient {
    pub customer_id: CustomerId,
    pub score: f64,
    pub coupon_value: f64,
}

/// Result of a planning run
#[derive(Debug, Clone, Serialize)]
pub struct CampaignPlan {
    pub cutoff_date: NaiveDate,
    pub selection_order: SelectionOrder,
    pub budget: f64,
    pub coupon: CouponQuote,
    /// `floor(budget / coupon.value)`
    pub recipient_limit: usize,
    pub customer_count: usize,
    pub churned_count: usize,
    /// Selected customers, in grant order
    pub recipients: Vec<CouponRecipient>,
    /// Whole scored population, in aggregation order
    #[serde(skip)]
    pub scored: Vec<ScoredCustomer>,
}

impl CampaignPlan {
    /// Budget actually handed out
    pub fn total_spend(&self) -> f64 {
        self.recipients.len() as f64 * self.coupon.value
    }

    /// Look up one customer's score and churn label
    pub fn get_customer(&self, customer_id: &str) -> Option<&ScoredCustomer> {
        self.scored
            .binary_search_by(|c| c.customer_id().cmp(customer_id))
            .ok()
            .map(|i| &self.scored[i])
    }

    pub fn is_recipient(&self, customer_id: &str) -> bool {
        self.recipients.iter().any(|r| r.customer_id == customer_id)
    }
}

/// Main orchestrator that runs the planning pipeline
#[derive(Debug, Clone)]
pub struct CampaignPlanner {
    config: CampaignConfig,
}

impl CampaignPlanner {
    /// Create a planner, rejecting an invalid configuration up front
    pub fn new(config: CampaignConfig) -> Result<Self> {
        config.validate().context("Invalid campaign configuration")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CampaignConfig {
        &self.config
    }

    /// Main entry point: plan a campaign for a transaction table
    ///
    /// Any failure aborts the whole run; no partial plan is returned.
    pub fn plan(&self, table: &TransactionTable) -> Result<CampaignPlan> {
        let start_time = Instant::now();

        // Aggregate
        let customers = table
            .summarize()
            .context("Failed to aggregate transactions")?;
        info!(
            "Aggregated {} transactions into {} customers",
            table.len(),
            customers.len()
        );

        // Classify
        let latest = table
            .latest_date()
            .context("Transaction table has no dates")?;
        let classifier = ChurnClassifier::from_config(&self.config, latest)
            .context("Failed to resolve churn cutoff")?;
        let churned_count = classifier.count_churned(customers.values());
        info!(
            "Cutoff {} (latest transaction {}): {} of {} customers churned",
            classifier.cutoff(),
            latest,
            churned_count,
            customers.len()
        );

        // Score
        let scored = CustomerScorer::from_config(&self.config)
            .score_all(&customers, &classifier)
            .context("Failed to score customers")?;

        // Price the coupon
        let mean_amount = table
            .mean_amount()
            .context("Transaction table has no amounts")?;
        let coupon = CouponQuote::from_config(mean_amount, &self.config)
            .context("Failed to price coupon")?;
        let recipient_limit = coupon
            .recipient_limit(self.config.budget)
            .context("Failed to divide budget")?;
        info!(
            "Coupon {:.2} (raw {:.4} from mean amount {:.4}), budget {} covers {} customers",
            coupon.value,
            coupon.raw_value,
            mean_amount,
            self.config.budget,
            recipient_limit
        );

        // Select
        let selected = Selector::from_config(&self.config)
            .select(scored.clone(), recipient_limit)
            .context("Failed to select recipients")?;
        let recipients: Vec<CouponRecipient> = selected
            .into_iter()
            .map(|c| CouponRecipient {
                customer_id: c.summary.customer_id,
                score: c.score,
                coupon_value: coupon.value,
            })
            .collect();
        info!(
            "Selected {} recipients ({:?} order)",
            recipients.len(),
            self.config.selection_order
        );

        info!("Total planning time: {:.2?}", start_time.elapsed());
        Ok(CampaignPlan {
            cutoff_date: classifier.cutoff(),
            selection_order: self.config.selection_order,
            budget: self.config.budget,
            coupon,
            recipient_limit,
            customer_count: customers.len(),
            churned_count,
            recipients,
            scored,
        })
    }
}
