//! Export of a campaign plan.
//!
//! CSV carries one row per recipient (`customer_id,score,coupon_value`),
//! JSON carries the whole plan including the coupon quote and population
//! counts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::orchestrator::CampaignPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Guess the format from a file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

/// Render a plan to a string
pub fn export_plan(plan: &CampaignPlan, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            for recipient in &plan.recipients {
                wtr.serialize(recipient)?;
            }
            let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
            String::from_utf8(bytes).context("CSV output is not valid UTF-8")
        }
        ExportFormat::Json => {
            serde_json::to_string_pretty(plan).context("Failed to serialize plan to JSON")
        }
    }
}

/// Render a plan and write it to `path`
pub fn write_plan(plan: &CampaignPlan, path: &Path, format: ExportFormat) -> Result<()> {
    let content = export_plan(plan, format)?;
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(
        "Wrote {} recipients to {}",
        plan.recipients.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::CouponRecipient;
    use chrono::NaiveDate;
    use pipeline::{CouponQuote, CouponRounding, SelectionOrder};

    fn plan() -> CampaignPlan {
        let coupon = CouponQuote::new(64.991912, 0.3, CouponRounding::Nearest).unwrap();
        CampaignPlan {
            cutoff_date: NaiveDate::from_ymd_opt(2019, 10, 16).unwrap(),
            selection_order: SelectionOrder::Score,
            budget: 1000.0,
            coupon,
            recipient_limit: 50,
            customer_count: 3,
            churned_count: 2,
            recipients: vec![
                CouponRecipient {
                    customer_id: "CS1".to_string(),
                    score: 100.0,
                    coupon_value: 20.0,
                },
                CouponRecipient {
                    customer_id: "CS2".to_string(),
                    score: 12.5,
                    coupon_value: 20.0,
                },
            ],
            scored: Vec::new(),
        }
    }

    #[test]
    fn test_csv_export() {
        let csv = export_plan(&plan(), ExportFormat::Csv).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines, vec!["customer_id,score,coupon_value", "CS1,100.0,20.0", "CS2,12.5,20.0"]);
    }

    #[test]
    fn test_json_export() {
        let json = export_plan(&plan(), ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["cutoff_date"], "2019-10-16");
        assert_eq!(value["selection_order"], "score");
        assert_eq!(value["coupon"]["value"], 20.0);
        assert_eq!(value["recipients"][1]["customer_id"], "CS2");
        assert!(value.get("scored").is_none());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("out.json")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("out.JSON")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("out.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("out")), ExportFormat::Csv);
    }

    #[test]
    fn test_write_plan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipients.csv");

        write_plan(&plan(), &path, ExportFormat::Csv).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("customer_id,score,coupon_value\n"));
    }
}
