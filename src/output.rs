//! Plain-text and JSON rendering of a headless `check` run

use serde::Serialize;
use tracing::warn;

use crate::api::{BandStatistics, VisualizationApi};
use crate::config_file::WizardConfig;
use crate::logic::{recommend_from_report, Recommendation};
use crate::stats::{fetch_preview_statistics, Histogram};
use crate::validation::{ValidationReport, ValidationRunner};

/// Histogram size in the text output
const CHART_WIDTH: usize = 60;
const CHART_HEIGHT: usize = 8;

/// Everything a `check` run produced
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutput {
    pub report: ValidationReport,
    pub recommendation: Option<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<BandStatistics>,
    /// Why the recommendation or statistics are missing
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl CheckOutput {
    pub fn exit_code(&self) -> i32 {
        if self.report.aborted { 1 } else { 0 }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report
    pub fn to_text(&self) -> String {
        let mut out = Vec::new();
        out.push(format!("Checks for {}", self.report.input));
        for result in &self.report.results {
            out.push(format!(
                "  {} {:<26} {}",
                result.status.icon(),
                result.check.title(),
                result.message
            ));
        }
        let summary = self.report.summary();
        out.push(format!(
            "  {} passed, {} warnings, {} failed, {} skipped",
            summary.passed, summary.warnings, summary.failed, summary.skipped
        ));

        if let Some(rec) = &self.recommendation {
            out.push(String::new());
            out.push(format!("Recommended: {}", rec.primary.label()));
            if let Some(backend) = rec.cmr_backend {
                out.push(format!("  backend: {}", backend));
            }
            if !rec.alternatives.is_empty() {
                let names: Vec<&str> = rec.alternatives.iter().map(|s| s.label()).collect();
                out.push(format!("  also: {}", names.join(", ")));
            }
            for reason in &rec.rationale {
                out.push(format!("  - {}", reason));
            }
            if !rec.endpoints.is_empty() {
                out.push(String::new());
                out.push("Example endpoints:".to_string());
                for endpoint in &rec.endpoints {
                    out.push(format!("  {}", endpoint.label));
                    out.push(format!("    {}", endpoint.url));
                }
            }
            if let Some(advice) = &rec.conversion {
                out.push(String::new());
                out.push(format!("Conversion: {}", advice.summary));
                for command in &advice.commands {
                    out.push(format!("  $ {}", command));
                }
            }
        }

        if let Some(hist) = self.statistics.as_ref().and_then(Histogram::first_of) {
            out.push(String::new());
            out.push(format!("Histogram ({})", hist.band));
            out.extend(hist.render_ascii(CHART_WIDTH, CHART_HEIGHT));
        }

        for note in &self.notes {
            out.push(format!("note: {}", note));
        }
        out.join("\n")
    }
}

/// Validate `input`, recommend a service, and optionally fetch statistics
pub fn run_check(
    api: &dyn VisualizationApi,
    config: &WizardConfig,
    input: &str,
    with_stats: bool,
) -> CheckOutput {
    let report = ValidationRunner::new(api).run(input, &mut |_| {});
    let mut notes = Vec::new();

    let recommendation = match recommend_from_report(&report, config) {
        Ok(rec) => Some(rec),
        Err(e) => {
            notes.push(e.to_string());
            None
        }
    };

    let statistics = if with_stats && recommendation.is_some() {
        match fetch_preview_statistics(api, &report.properties) {
            Ok(Some(stats)) => Some(stats),
            Ok(None) => {
                notes.push("statistics are only previewed for Cloud Optimized GeoTIFFs".to_string());
                None
            }
            Err(e) => {
                warn!("Statistics request failed: {}", e);
                notes.push(format!("statistics unavailable: {}", e));
                None
            }
        }
    } else {
        None
    };

    CheckOutput {
        report,
        recommendation,
        statistics,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CheckStatus;
    use crate::validation::{CheckResult, DetectedProperties, ValidationCheck};

    fn aborted_report() -> ValidationReport {
        ValidationReport {
            input: "ftp://nope".to_string(),
            results: vec![CheckResult {
                check: ValidationCheck::InputSyntax,
                status: CheckStatus::Failed,
                message: "unsupported scheme".to_string(),
            }],
            properties: DetectedProperties::default(),
            aborted: true,
        }
    }

    #[test]
    fn test_aborted_output() {
        let output = CheckOutput {
            report: aborted_report(),
            recommendation: None,
            statistics: None,
            notes: vec!["validation failed".to_string()],
        };
        assert_eq!(output.exit_code(), 1);
        let text = output.to_text();
        assert!(text.contains("unsupported scheme"));
        assert!(!text.contains("Recommended"));
        assert!(text.ends_with("note: validation failed"));
    }

    #[test]
    fn test_json_skips_empty_fields() {
        let output = CheckOutput {
            report: aborted_report(),
            recommendation: None,
            statistics: None,
            notes: vec![],
        };
        let json = output.to_json().expect("json");
        assert!(!json.contains("statistics"));
        assert!(!json.contains("notes"));
        assert!(json.contains("\"recommendation\": null"));
    }
}
