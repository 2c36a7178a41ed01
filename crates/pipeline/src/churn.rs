//! Churn classification against a cutoff date.

use crate::config::CampaignConfig;
use crate::error::{PipelineError, Result};
use chrono::{Months, NaiveDate};
use data_loader::CustomerSummary;

/// Months of inactivity before the latest transaction that make a customer
/// churned when no explicit cutoff is configured
pub const DEFAULT_CHURN_WINDOW_MONTHS: u32 = 3;

/// Labels customers churned or active.
///
/// A customer is churned iff their last transaction is strictly before the
/// cutoff; a last purchase on the cutoff date itself counts as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChurnClassifier {
    cutoff: NaiveDate,
}

impl ChurnClassifier {
    pub fn new(cutoff: NaiveDate) -> Self {
        Self { cutoff }
    }

    /// Use the configured cutoff, or derive one from the latest observed
    /// transaction date.
    pub fn from_config(config: &CampaignConfig, latest_transaction: NaiveDate) -> Result<Self> {
        let cutoff = match config.cutoff_date {
            Some(cutoff) => cutoff,
            None => cutoff_before(latest_transaction, config.churn_window_months)?,
        };
        Ok(Self::new(cutoff))
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    pub fn is_churned(&self, last_transaction_date: NaiveDate) -> bool {
        last_transaction_date < self.cutoff
    }

    pub fn classify(&self, summary: &CustomerSummary) -> bool {
        self.is_churned(summary.last_transaction_date)
    }

    pub fn count_churned<'a>(&self, customers: impl IntoIterator<Item = &'a CustomerSummary>) -> usize {
        customers.into_iter().filter(|c| self.classify(c)).count()
    }
}

/// `months` calendar months before `latest`, clamped to the end of shorter
/// months (2020-05-31 minus 3 months is 2020-02-29).
pub fn cutoff_before(latest: NaiveDate, months: u32) -> Result<NaiveDate> {
    if months == 0 {
        return Err(PipelineError::InvalidConfig(
            "churn window must be at least one month".to_string(),
        ));
    }
    latest.checked_sub_months(Months::new(months)).ok_or_else(|| {
        PipelineError::InvalidConfig(format!("cannot subtract {months} months from {latest}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summary(last: NaiveDate) -> CustomerSummary {
        CustomerSummary {
            customer_id: "CS1".to_string(),
            first_transaction_date: last,
            last_transaction_date: last,
            transaction_count: 1,
            total_amount: 10.0,
        }
    }

    #[test]
    fn test_cutoff_boundary() {
        let classifier = ChurnClassifier::new(date(2019, 10, 16));

        assert!(classifier.classify(&summary(date(2019, 10, 14))));
        assert!(classifier.classify(&summary(date(2019, 10, 15))));
        assert!(!classifier.classify(&summary(date(2019, 10, 16))));
        assert!(!classifier.classify(&summary(date(2019, 10, 17))));
    }

    #[test]
    fn test_moving_cutoff_flips_label() {
        let last = date(2019, 10, 14);

        assert!(ChurnClassifier::new(date(2019, 10, 16)).is_churned(last));
        assert!(!ChurnClassifier::new(date(2019, 10, 14)).is_churned(last));
        assert!(!ChurnClassifier::new(date(2019, 10, 1)).is_churned(last));
    }

    #[test]
    fn test_derived_cutoff() {
        let config = CampaignConfig::default();
        let classifier = ChurnClassifier::from_config(&config, date(2020, 1, 16)).unwrap();
        assert_eq!(classifier.cutoff(), date(2019, 10, 16));

        assert_eq!(cutoff_before(date(2020, 5, 31), 3).unwrap(), date(2020, 2, 29));
        assert!(cutoff_before(date(2020, 5, 31), 0).is_err());
    }

    #[test]
    fn test_explicit_cutoff_wins() {
        let config = CampaignConfig {
            cutoff_date: Some(date(2019, 1, 1)),
            ..CampaignConfig::default()
        };
        let classifier = ChurnClassifier::from_config(&config, date(2020, 1, 16)).unwrap();
        assert_eq!(classifier.cutoff(), date(2019, 1, 1));
    }

    #[test]
    fn test_count_churned() {
        let classifier = ChurnClassifier::new(date(2019, 10, 16));
        let customers = [
            summary(date(2019, 1, 1)),
            summary(date(2019, 10, 16)),
            summary(date(2019, 12, 1)),
        ];
        assert_eq!(classifier.count_churned(&customers), 1);
    }
}
