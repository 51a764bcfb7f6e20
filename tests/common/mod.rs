//! Shared test fixtures
//!
//! `FakeApi` answers every `VisualizationApi` call from canned responses
//! keyed by URL (or concept ID) and records each call it receives.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use geoviz_wizard::api::{
    ApiError, ApiResult, BandStatistics, BandStats, CmrRecord, CogValidation, DatasetInfo,
    HeadInfo, RasterInfo, VisualizationApi,
};
use geoviz_wizard::types::CmrConceptKind;

#[derive(Default)]
pub struct FakeApi {
    heads: HashMap<String, ApiResult<HeadInfo>>,
    validations: HashMap<String, ApiResult<CogValidation>>,
    infos: HashMap<String, RasterInfo>,
    statistics: HashMap<String, ApiResult<BandStatistics>>,
    variables: HashMap<String, ApiResult<Vec<String>>>,
    dimensions: HashMap<String, DatasetInfo>,
    info_errors: HashSet<String>,
    cmr: HashMap<String, ApiResult<Option<CmrRecord>>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

fn not_found(endpoint: &str) -> ApiError {
    ApiError::Status {
        endpoint: endpoint.to_string(),
        status: 404,
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// HEAD answer for a URL. Unknown URLs answer 200 with no headers.
    pub fn with_head(mut self, url: &str, status: u16, content_type: Option<&str>) -> Self {
        self.heads.insert(
            url.to_string(),
            Ok(HeadInfo {
                status,
                content_type: content_type.map(str::to_string),
                content_length: Some(1024),
            }),
        );
        self
    }

    pub fn with_head_error(mut self, url: &str) -> Self {
        self.heads.insert(
            url.to_string(),
            Err(ApiError::Transport {
                endpoint: url.to_string(),
                message: "connection refused".to_string(),
            }),
        );
        self
    }

    /// COG validation result plus raster info (zoom 2-14, 3 bands) for valid COGs
    pub fn with_cog(mut self, url: &str, is_cog: bool) -> Self {
        let validation = CogValidation {
            is_cog,
            errors: if is_cog {
                vec![]
            } else {
                vec!["The file is greater than 512xH or 512xW, it is recommended to include internal overviews".to_string()]
            },
            warnings: vec![],
        };
        self.validations.insert(url.to_string(), Ok(validation));
        if is_cog {
            self.infos.insert(
                url.to_string(),
                RasterInfo {
                    minzoom: Some(2),
                    maxzoom: Some(14),
                    count: Some(3),
                    ..Default::default()
                },
            );
        }
        self
    }

    pub fn with_cog_error(mut self, url: &str) -> Self {
        self.validations.insert(
            url.to_string(),
            Err(ApiError::Status {
                endpoint: "/cog/validate".to_string(),
                status: 500,
            }),
        );
        self
    }

    /// Single-band statistics with the given histogram
    pub fn with_statistics(mut self, url: &str, counts: Vec<f64>, edges: Vec<f64>) -> Self {
        let mut stats = BandStatistics::new();
        stats.insert(
            "b1".to_string(),
            BandStats {
                min: edges.first().copied().unwrap_or_default(),
                max: edges.last().copied().unwrap_or_default(),
                mean: 0.0,
                std: 0.0,
                count: counts.iter().sum(),
                histogram: vec![counts, edges],
            },
        );
        self.statistics.insert(url.to_string(), Ok(stats));
        self
    }

    /// Variables of a dataset; the first variable gets `dims`
    pub fn with_variables(mut self, url: &str, variables: &[&str], dims: &[&str]) -> Self {
        self.variables.insert(
            url.to_string(),
            Ok(variables.iter().map(|v| v.to_string()).collect()),
        );
        self.dimensions.insert(
            url.to_string(),
            DatasetInfo {
                dimensions: dims.iter().map(|d| d.to_string()).collect(),
                count: Some(1),
            },
        );
        self
    }

    /// Variables of a dataset whose `/md/info` lookup fails with HTTP 500
    pub fn with_variables_info_error(mut self, url: &str, variables: &[&str]) -> Self {
        self.variables.insert(
            url.to_string(),
            Ok(variables.iter().map(|v| v.to_string()).collect()),
        );
        self.info_errors.insert(url.to_string());
        self
    }

    /// The canned statistics for a URL, if any
    pub fn statistics_for(&self, url: &str) -> Option<BandStatistics> {
        self.statistics.get(url).and_then(|r| r.clone().ok())
    }

    pub fn with_cmr(mut self, concept_id: &str, record: Option<CmrRecord>) -> Self {
        self.cmr.insert(concept_id.to_string(), Ok(record));
        self
    }

    /// Sleep before answering each HEAD request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Calls received so far, as `"<method> <target>"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(method))
            .count()
    }

    fn record(&self, method: &str, target: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{} {}", method, target));
        }
    }
}

impl VisualizationApi for FakeApi {
    fn head(&self, url: &str) -> ApiResult<HeadInfo> {
        self.record("head", url);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.heads.get(url).cloned().unwrap_or_else(|| {
            Ok(HeadInfo {
                status: 200,
                content_type: None,
                content_length: None,
            })
        })
    }

    fn cog_validate(&self, url: &str) -> ApiResult<CogValidation> {
        self.record("cog_validate", url);
        self.validations
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(not_found("/cog/validate")))
    }

    fn cog_info(&self, url: &str) -> ApiResult<RasterInfo> {
        self.record("cog_info", url);
        self.infos
            .get(url)
            .cloned()
            .ok_or_else(|| not_found("/cog/info"))
    }

    fn cog_statistics(&self, url: &str) -> ApiResult<BandStatistics> {
        self.record("cog_statistics", url);
        self.statistics
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(not_found("/cog/statistics")))
    }

    fn md_variables(&self, url: &str) -> ApiResult<Vec<String>> {
        self.record("md_variables", url);
        self.variables
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(not_found("/md/variables")))
    }

    fn md_info(&self, url: &str, variable: &str) -> ApiResult<DatasetInfo> {
        self.record("md_info", &format!("{} {}", url, variable));
        if self.info_errors.contains(url) {
            return Err(ApiError::Status {
                endpoint: "/md/info".to_string(),
                status: 500,
            });
        }
        self.dimensions
            .get(url)
            .cloned()
            .ok_or_else(|| not_found("/md/info"))
    }

    fn cmr_lookup(&self, concept_id: &str, kind: CmrConceptKind) -> ApiResult<Option<CmrRecord>> {
        self.record("cmr_lookup", &format!("{} {}", kind, concept_id));
        self.cmr.get(concept_id).cloned().unwrap_or(Ok(None))
    }
}

/// A CMR record with the given formats
pub fn cmr_record(concept_id: &str, formats: &[&str], has_temporal: bool) -> CmrRecord {
    CmrRecord {
        concept_id: concept_id.to_string(),
        short_name: Some("TEST-COLLECTION".to_string()),
        formats: formats.iter().map(|f| f.to_string()).collect(),
        has_temporal,
    }
}
