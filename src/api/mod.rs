//! External visualization API seam
//!
//! The wizard never reads file bytes itself. Every fact about a file comes
//! from one of the hosted services behind [`VisualizationApi`]: TiTiler for
//! COG validation and statistics, the xarray tiler for multidimensional
//! datasets, and CMR for catalog lookups. The production implementation is
//! [`HttpVisualizationApi`]; tests substitute canned responses.

mod http;

pub use http::HttpVisualizationApi;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::types::CmrConceptKind;

/// Errors returned by API calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Result of a HEAD probe. A non-2xx status is data, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeadInfo {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

impl HeadInfo {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Response of `/cog/validate`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CogValidation {
    #[serde(rename = "COG")]
    pub is_cog: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Response of `/cog/info` (the subset the wizard uses)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RasterInfo {
    #[serde(default)]
    pub bounds: Vec<f64>,
    #[serde(default)]
    pub minzoom: Option<u8>,
    #[serde(default)]
    pub maxzoom: Option<u8>,
    #[serde(default)]
    pub band_descriptions: Vec<(String, String)>,
    #[serde(default)]
    pub dtype: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub nodata_type: Option<String>,
}

/// Per-band statistics from `/cog/statistics`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BandStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
    #[serde(default)]
    pub count: f64,
    /// `[[counts...], [bin edges...]]`
    #[serde(default)]
    pub histogram: Vec<Vec<f64>>,
}

/// Band name (`b1`, `b2`, ...) to statistics
pub type BandStatistics = BTreeMap<String, BandStats>;

/// Response of `/md/info` (the subset the wizard uses)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetInfo {
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

/// What CMR knows about a concept
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CmrRecord {
    pub concept_id: String,
    pub short_name: Option<String>,
    pub formats: Vec<String>,
    pub has_temporal: bool,
}

/// Calls the wizard makes against external services
pub trait VisualizationApi: Send + Sync {
    /// HEAD the URL and report status and selected headers
    fn head(&self, url: &str) -> ApiResult<HeadInfo>;

    /// Ask TiTiler whether the file is a valid COG
    fn cog_validate(&self, url: &str) -> ApiResult<CogValidation>;

    /// Raster metadata from TiTiler
    fn cog_info(&self, url: &str) -> ApiResult<RasterInfo>;

    /// Per-band statistics from TiTiler
    fn cog_statistics(&self, url: &str) -> ApiResult<BandStatistics>;

    /// Variables of a multidimensional dataset
    fn md_variables(&self, url: &str) -> ApiResult<Vec<String>>;

    /// Dimension info for one variable of a multidimensional dataset
    fn md_info(&self, url: &str, variable: &str) -> ApiResult<DatasetInfo>;

    /// Look up a concept in CMR. `Ok(None)` means CMR has no such concept.
    fn cmr_lookup(&self, concept_id: &str, kind: CmrConceptKind) -> ApiResult<Option<CmrRecord>>;
}

/// Extract a [`CmrRecord`] from a CMR `umm_json` search response.
///
/// Collections carry formats under
/// `ArchiveAndDistributionInformation.FileDistributionInformation` and a
/// `TemporalExtents` list. Granules carry them under
/// `DataGranule.ArchiveAndDistributionInformation` and a single
/// `TemporalExtent` object.
pub fn parse_cmr_response(concept_id: &str, kind: CmrConceptKind, body: &Value) -> Option<CmrRecord> {
    let items = body.get("items").and_then(Value::as_array)?;
    let hits = body
        .get("hits")
        .and_then(Value::as_u64)
        .unwrap_or(items.len() as u64);
    if hits == 0 {
        return None;
    }
    let umm = items.first()?.get("umm")?;

    let (format_path, short_name) = match kind {
        CmrConceptKind::Collection => (
            "/ArchiveAndDistributionInformation/FileDistributionInformation",
            umm.get("ShortName").and_then(Value::as_str),
        ),
        CmrConceptKind::Granule => (
            "/DataGranule/ArchiveAndDistributionInformation",
            umm.pointer("/CollectionReference/ShortName")
                .or_else(|| umm.get("GranuleUR"))
                .and_then(Value::as_str),
        ),
    };

    let formats = umm
        .pointer(format_path)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.get("Format").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let has_temporal = match kind {
        CmrConceptKind::Collection => umm
            .get("TemporalExtents")
            .and_then(Value::as_array)
            .is_some_and(|a| !a.is_empty()),
        CmrConceptKind::Granule => umm.get("TemporalExtent").is_some_and(|v| !v.is_null()),
    };

    Some(CmrRecord {
        concept_id: concept_id.to_string(),
        short_name: short_name.map(str::to_string),
        formats,
        has_temporal,
    })
}
