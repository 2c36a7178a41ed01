//! Filter implementations for the selection pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod churned;
pub mod minimum_score;

// Re-export for convenience
pub use churned::ChurnedFilter;
pub use minimum_score::MinimumScoreFilter;
