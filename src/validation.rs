//! Sequential validation checks
//!
//! The runner walks a fixed list of checks against a file reference. Each
//! check either applies to the reference or is recorded as skipped, so a
//! finished report always lists every check in order.
//!
//! # Check Order
//!
//! ```text
//! InputSyntax
//!     ↓
//! Reachability         (S3, HTTPS)
//!     ↓
//! CmrLookup            (CMR)
//!     ↓
//! FormatDetection
//!     ↓
//! CogCompliance        (GeoTIFF, not CMR)
//!     ↓
//! DimensionInspection  (NetCDF / HDF5 / Zarr, not CMR)
//! ```
//!
//! A fatal failure aborts the run. Every later check is then recorded as
//! skipped and the report is marked aborted, which blocks the wizard from
//! moving on to a recommendation.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, info, warn};

use crate::api::{CmrRecord, HeadInfo, VisualizationApi};
use crate::source::{
    detect_format_from_cmr, detect_format_from_content_type, FileReference,
};
use crate::types::{CheckStatus, CmrBackend, FileFormat, SourceKind, SpatialType};

/// Individual validation checks, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumIter)]
pub enum ValidationCheck {
    #[strum(serialize = "input-syntax")]
    InputSyntax,
    #[strum(serialize = "reachability")]
    Reachability,
    #[strum(serialize = "cmr-lookup")]
    CmrLookup,
    #[strum(serialize = "format-detection")]
    FormatDetection,
    #[strum(serialize = "cog-compliance")]
    CogCompliance,
    #[strum(serialize = "dimension-inspection")]
    DimensionInspection,
}

impl ValidationCheck {
    /// All checks in the order they run
    pub const ALL: [Self; 6] = [
        Self::InputSyntax,
        Self::Reachability,
        Self::CmrLookup,
        Self::FormatDetection,
        Self::CogCompliance,
        Self::DimensionInspection,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::InputSyntax => "Input syntax",
            Self::Reachability => "File reachable",
            Self::CmrLookup => "CMR catalog lookup",
            Self::FormatDetection => "Format detection",
            Self::CogCompliance => "Cloud Optimized GeoTIFF",
            Self::DimensionInspection => "Dimensions and variables",
        }
    }
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check: ValidationCheck,
    pub status: CheckStatus,
    pub message: String,
}

/// Everything validation learned about the file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectedProperties {
    pub source_kind: Option<SourceKind>,
    pub format: FileFormat,
    pub spatial_type: SpatialType,
    pub is_cog: bool,
    pub has_time_dimension: bool,
    pub is_cmr: bool,
    pub cmr_backend_hint: Option<CmrBackend>,
    pub variables: Vec<String>,
    pub band_count: Option<u32>,
    pub zoom_range: Option<(u8, u8)>,
    pub content_length: Option<u64>,
    /// URL handed to the tilers (S3 or HTTPS)
    pub data_url: Option<String>,
    pub concept_id: Option<String>,
    pub file_name: Option<String>,
}

/// Progress notifications emitted while running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationEvent {
    CheckStarted(ValidationCheck),
    CheckFinished(CheckResult),
}

/// Counts per status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CheckSummary {
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Finished validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub input: String,
    pub results: Vec<CheckResult>,
    pub properties: DetectedProperties,
    pub aborted: bool,
}

impl ValidationReport {
    /// True when no check failed fatally
    pub fn is_success(&self) -> bool {
        !self.aborted
    }

    pub fn result(&self, check: ValidationCheck) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.check == check)
    }

    /// The check that aborted the run, if any
    pub fn fatal_failure(&self) -> Option<&CheckResult> {
        if !self.aborted {
            return None;
        }
        self.results
            .iter()
            .rev()
            .find(|r| r.status == CheckStatus::Failed)
    }

    pub fn summary(&self) -> CheckSummary {
        let mut summary = CheckSummary::default();
        for result in &self.results {
            match result.status {
                CheckStatus::Passed => summary.passed += 1,
                CheckStatus::Warning => summary.warnings += 1,
                CheckStatus::Failed => summary.failed += 1,
                CheckStatus::Skipped => summary.skipped += 1,
                CheckStatus::Pending | CheckStatus::Running => {}
            }
        }
        summary
    }
}

struct Outcome {
    status: CheckStatus,
    message: String,
    fatal: bool,
}

impl Outcome {
    fn passed(message: impl Into<String>) -> Self {
        Self { status: CheckStatus::Passed, message: message.into(), fatal: false }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self { status: CheckStatus::Warning, message: message.into(), fatal: false }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self { status: CheckStatus::Failed, message: message.into(), fatal: false }
    }

    fn fatal(message: impl Into<String>) -> Self {
        Self { status: CheckStatus::Failed, message: message.into(), fatal: true }
    }

    fn skipped(message: impl Into<String>) -> Self {
        Self { status: CheckStatus::Skipped, message: message.into(), fatal: false }
    }
}

/// Mutable state threaded through one run
#[derive(Default)]
struct RunState {
    reference: Option<FileReference>,
    head: Option<HeadInfo>,
    cmr: Option<CmrRecord>,
    properties: DetectedProperties,
}

/// Whether a dimension name denotes time
pub fn is_time_dimension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    matches!(lower.as_str(), "time" | "t" | "date") || lower.starts_with("time")
}

/// Runs the validation checks against a [`VisualizationApi`]
pub struct ValidationRunner<'a> {
    api: &'a dyn VisualizationApi,
}

impl<'a> ValidationRunner<'a> {
    pub fn new(api: &'a dyn VisualizationApi) -> Self {
        Self { api }
    }

    /// Run every check in order and collect a report.
    ///
    /// `on_event` sees a `CheckStarted` for each check that applies and a
    /// `CheckFinished` for every check, including skipped ones.
    pub fn run(&self, input: &str, on_event: &mut dyn FnMut(ValidationEvent)) -> ValidationReport {
        info!("Starting validation for '{}'", input.trim());

        let mut state = RunState::default();
        let mut results = Vec::with_capacity(ValidationCheck::ALL.len());
        let mut aborted = false;

        for check in ValidationCheck::ALL {
            let outcome = if aborted {
                Outcome::skipped("not run: earlier check failed")
            } else if let Some(reason) = Self::skip_reason(check, &state) {
                Outcome::skipped(reason)
            } else {
                on_event(ValidationEvent::CheckStarted(check));
                match check {
                    ValidationCheck::InputSyntax => Self::check_input_syntax(input, &mut state),
                    ValidationCheck::Reachability => self.check_reachability(&mut state),
                    ValidationCheck::CmrLookup => self.check_cmr_lookup(&mut state),
                    ValidationCheck::FormatDetection => Self::check_format(&mut state),
                    ValidationCheck::CogCompliance => self.check_cog(&mut state),
                    ValidationCheck::DimensionInspection => self.check_dimensions(&mut state),
                }
            };

            if outcome.fatal {
                warn!("Check {} failed fatally: {}", check, outcome.message);
                aborted = true;
            } else {
                debug!("Check {} -> {}: {}", check, outcome.status, outcome.message);
            }

            let result = CheckResult {
                check,
                status: outcome.status,
                message: outcome.message,
            };
            on_event(ValidationEvent::CheckFinished(result.clone()));
            results.push(result);
        }

        let report = ValidationReport {
            input: input.trim().to_string(),
            results,
            properties: state.properties,
            aborted,
        };
        let summary = report.summary();
        info!(
            "Validation finished: {} passed, {} warnings, {} failed, {} skipped{}",
            summary.passed,
            summary.warnings,
            summary.failed,
            summary.skipped,
            if aborted { " (aborted)" } else { "" }
        );
        report
    }

    /// Why a check does not apply to this reference, if it doesn't
    fn skip_reason(check: ValidationCheck, state: &RunState) -> Option<&'static str> {
        let props = &state.properties;
        match check {
            ValidationCheck::InputSyntax | ValidationCheck::FormatDetection => None,
            ValidationCheck::Reachability if props.is_cmr => {
                Some("CMR concepts are checked through the catalog")
            }
            ValidationCheck::CmrLookup if !props.is_cmr => Some("not a CMR concept ID"),
            ValidationCheck::CogCompliance if props.is_cmr => {
                Some("CMR data is read through titiler-cmr")
            }
            ValidationCheck::CogCompliance if props.format != FileFormat::GeoTiff => {
                Some("not a GeoTIFF")
            }
            ValidationCheck::DimensionInspection if props.is_cmr => {
                Some("CMR data is read through titiler-cmr")
            }
            ValidationCheck::DimensionInspection if !props.format.is_multidimensional() => {
                Some("not a multidimensional format")
            }
            _ => None,
        }
    }

    fn check_input_syntax(input: &str, state: &mut RunState) -> Outcome {
        match FileReference::parse(input) {
            Ok(reference) => {
                let props = &mut state.properties;
                props.source_kind = Some(reference.kind());
                props.is_cmr = reference.is_cmr();
                props.data_url = reference.data_url();
                props.concept_id = reference.cmr_concept().map(|(id, _)| id.to_string());
                props.file_name = reference.file_name().map(str::to_string);

                let message = match reference.kind() {
                    SourceKind::S3 => "S3 object URL".to_string(),
                    SourceKind::Https => "HTTPS URL".to_string(),
                    SourceKind::CmrConcept => format!(
                        "CMR {} from provider {}",
                        reference
                            .cmr_concept()
                            .map(|(_, kind)| kind.to_string())
                            .unwrap_or_default(),
                        reference.provider().unwrap_or("unknown")
                    ),
                };
                state.reference = Some(reference);
                Outcome::passed(message)
            }
            Err(e) => Outcome::fatal(e.to_string()),
        }
    }

    fn check_reachability(&self, state: &mut RunState) -> Outcome {
        let Some(reference) = state.reference.as_ref() else {
            return Outcome::fatal("no parsed reference");
        };
        let Some(url) = reference.http_url() else {
            return Outcome::skipped("no HTTP location to probe");
        };

        match self.api.head(&url) {
            Ok(head) => {
                let outcome = if head.is_success() {
                    state.properties.content_length = head.content_length;
                    match head.content_length {
                        Some(len) => Outcome::passed(format!("HTTP {} ({} bytes)", head.status, len)),
                        None => Outcome::passed(format!("HTTP {}", head.status)),
                    }
                } else if head.status == 403 && reference.kind() == SourceKind::S3 {
                    Outcome::warning(
                        "HTTP 403: bucket is not public, the tile server may still have access",
                    )
                } else if reference.format_hint() == FileFormat::Zarr {
                    Outcome::warning(format!(
                        "HTTP {} on the store root (zarr stores are directories)",
                        head.status
                    ))
                } else {
                    Outcome::fatal(format!("HTTP {} from {}", head.status, url))
                };
                state.head = Some(head);
                outcome
            }
            Err(e) => Outcome::fatal(e.to_string()),
        }
    }

    fn check_cmr_lookup(&self, state: &mut RunState) -> Outcome {
        let Some((concept_id, kind)) = state.reference.as_ref().and_then(|r| r.cmr_concept()) else {
            return Outcome::fatal("no CMR concept to look up");
        };

        match self.api.cmr_lookup(concept_id, kind) {
            Ok(Some(record)) => {
                state.properties.has_time_dimension = record.has_temporal;
                let name = record.short_name.as_deref().unwrap_or(concept_id);
                let message = if record.formats.is_empty() {
                    format!("found {} (no distribution format listed)", name)
                } else {
                    format!("found {} ({})", name, record.formats.join(", "))
                };
                state.cmr = Some(record);
                Outcome::passed(message)
            }
            Ok(None) => Outcome::fatal(format!("{} not found in CMR", concept_id)),
            Err(e) => Outcome::fatal(e.to_string()),
        }
    }

    fn check_format(state: &mut RunState) -> Outcome {
        let mut source = "file extension";
        let mut format = state
            .reference
            .as_ref()
            .map(FileReference::format_hint)
            .unwrap_or_default();

        if format == FileFormat::Unknown {
            if let Some(ct) = state.head.as_ref().and_then(|h| h.content_type.as_deref()) {
                format = detect_format_from_content_type(ct);
                source = "Content-Type header";
            }
        }

        if format == FileFormat::Unknown {
            if let Some(record) = &state.cmr {
                format = record
                    .formats
                    .iter()
                    .map(|f| detect_format_from_cmr(f))
                    .find(|f| *f != FileFormat::Unknown)
                    .unwrap_or_default();
                source = "CMR metadata";
            }
        }

        let props = &mut state.properties;
        props.format = format;
        props.spatial_type = format.spatial_type();
        if props.is_cmr {
            props.cmr_backend_hint = Some(if format == FileFormat::GeoTiff {
                CmrBackend::Rasterio
            } else {
                CmrBackend::Xarray
            });
        }

        if format == FileFormat::Unknown {
            Outcome::warning("could not determine the file format")
        } else {
            Outcome::passed(format!(
                "{} ({}) from {}",
                format.label(),
                format.spatial_type(),
                source
            ))
        }
    }

    fn check_cog(&self, state: &mut RunState) -> Outcome {
        let Some(url) = state.properties.data_url.clone() else {
            return Outcome::skipped("no file URL");
        };

        match self.api.cog_validate(&url) {
            Ok(validation) if validation.is_cog => {
                state.properties.is_cog = true;
                match self.api.cog_info(&url) {
                    Ok(raster) => {
                        state.properties.band_count = raster.count;
                        if let (Some(min), Some(max)) = (raster.minzoom, raster.maxzoom) {
                            state.properties.zoom_range = Some((min, max));
                        }
                    }
                    Err(e) => warn!("COG info unavailable for {}: {}", url, e),
                }
                if validation.warnings.is_empty() {
                    Outcome::passed("valid Cloud Optimized GeoTIFF")
                } else {
                    Outcome::passed(format!(
                        "valid Cloud Optimized GeoTIFF ({} warnings)",
                        validation.warnings.len()
                    ))
                }
            }
            Ok(validation) => {
                state.properties.is_cog = false;
                let reason = validation
                    .errors
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "layout is not cloud optimized".to_string());
                Outcome::warning(format!("not a COG: {}", reason))
            }
            Err(e) => Outcome::failed(format!("COG validation unavailable: {}", e)),
        }
    }

    fn check_dimensions(&self, state: &mut RunState) -> Outcome {
        let Some(url) = state.properties.data_url.clone() else {
            return Outcome::skipped("no file URL");
        };

        let variables = match self.api.md_variables(&url) {
            Ok(v) => v,
            Err(e) => return Outcome::failed(format!("variable listing unavailable: {}", e)),
        };
        if variables.is_empty() {
            return Outcome::warning("dataset has no variables the tiler can read");
        }

        let first = variables[0].clone();
        let count = variables.len();
        state.properties.variables = variables;

        match self.api.md_info(&url, &first) {
            Ok(info) => {
                let has_time = info.dimensions.iter().any(|d| is_time_dimension(d));
                state.properties.has_time_dimension = has_time;
                state.properties.band_count = info.count;
                Outcome::passed(format!(
                    "{} variable(s); '{}' has dimensions [{}]{}",
                    count,
                    first,
                    info.dimensions.join(", "),
                    if has_time { ", time-enabled" } else { "" }
                ))
            }
            Err(e) => Outcome::failed(format!(
                "{} variable(s), but dimensions of '{}' unavailable: {}",
                count, first, e
            )),
        }
    }
}
