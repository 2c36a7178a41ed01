//! Error types for the scoring pipeline.

use crate::scoring::Feature;
use thiserror::Error;

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// There are no customers to classify or score
    #[error("No customers to score")]
    EmptyInput,

    /// Min-max normalization is undefined because every customer has the
    /// same value for this feature
    #[error("Cannot normalize {feature}: every customer has the same value ({value})")]
    DegenerateFeature { feature: Feature, value: f64 },

    /// The per-customer coupon is zero, negative or not a number
    #[error("Invalid coupon value {value}: must be a finite positive amount")]
    InvalidCoupon { value: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
