//! Campaign crate for the win-back coupon planner.
//!
//! This crate contains the orchestrator that runs the planning pipeline
//! end to end, and the exporters for its result.

pub mod orchestrator;
pub mod export;

pub use export::{ExportFormat, export_plan, write_plan};
pub use orchestrator::{CampaignPlan, CampaignPlanner, CouponRecipient};
