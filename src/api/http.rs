//! Blocking HTTP implementation of [`VisualizationApi`].
//!
//! Calls run on the validation worker thread, never on the UI thread, so a
//! blocking client with a per-request timeout is enough.

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{
    parse_cmr_response, ApiError, ApiResult, BandStatistics, CmrRecord, CogValidation,
    DatasetInfo, HeadInfo, RasterInfo, VisualizationApi,
};
use crate::config_file::WizardConfig;
use crate::types::CmrConceptKind;

const USER_AGENT: &str = concat!("geoviz-wizard/", env!("CARGO_PKG_VERSION"));

/// Visualization API client backed by `reqwest`
pub struct HttpVisualizationApi {
    client: Client,
    config: WizardConfig,
}

impl HttpVisualizationApi {
    pub fn new(config: &WizardConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Transport {
                endpoint: "client setup".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn endpoint(base: &str, path: &str, params: &[(&str, &str)]) -> ApiResult<Url> {
        let mut url = Url::parse(&format!("{}{}", base, path))
            .map_err(|e| ApiError::InvalidUrl(format!("{}{}: {}", base, path, e)))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let endpoint = format!("{}{}", url.origin().ascii_serialization(), url.path());
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ApiError::Transport {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned {}", endpoint, status);
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        response.json::<T>().map_err(|e| ApiError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}

impl VisualizationApi for HttpVisualizationApi {
    fn head(&self, url: &str) -> ApiResult<HeadInfo> {
        debug!("HEAD {}", url);
        let response = self
            .client
            .head(url)
            .send()
            .map_err(|e| ApiError::Transport {
                endpoint: url.to_string(),
                message: e.to_string(),
            })?;

        let headers = response.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        Ok(HeadInfo {
            status: response.status().as_u16(),
            content_type,
            content_length,
        })
    }

    fn cog_validate(&self, url: &str) -> ApiResult<CogValidation> {
        let endpoint = Self::endpoint(self.config.titiler_base(), "/cog/validate", &[("url", url)])?;
        self.get_json(endpoint)
    }

    fn cog_info(&self, url: &str) -> ApiResult<RasterInfo> {
        let endpoint = Self::endpoint(self.config.titiler_base(), "/cog/info", &[("url", url)])?;
        self.get_json(endpoint)
    }

    fn cog_statistics(&self, url: &str) -> ApiResult<BandStatistics> {
        let endpoint =
            Self::endpoint(self.config.titiler_base(), "/cog/statistics", &[("url", url)])?;
        self.get_json(endpoint)
    }

    fn md_variables(&self, url: &str) -> ApiResult<Vec<String>> {
        let endpoint = Self::endpoint(self.config.xarray_base(), "/md/variables", &[("url", url)])?;
        self.get_json(endpoint)
    }

    fn md_info(&self, url: &str, variable: &str) -> ApiResult<DatasetInfo> {
        let endpoint = Self::endpoint(
            self.config.xarray_base(),
            "/md/info",
            &[("url", url), ("variable", variable)],
        )?;
        self.get_json(endpoint)
    }

    fn cmr_lookup(&self, concept_id: &str, kind: CmrConceptKind) -> ApiResult<Option<CmrRecord>> {
        let path = format!("/search/{}.umm_json", kind.search_path());
        let endpoint =
            Self::endpoint(self.config.cmr_base(), &path, &[("concept_id", concept_id)])?;
        let body: Value = self.get_json(endpoint)?;
        Ok(parse_cmr_response(concept_id, kind, &body))
    }
}
