//! Example endpoint URLs for recommended services.
//!
//! Query values are form-encoded. Template placeholders (`{z}`, `{x}`,
//! `{y}`, `{datetime}`) stay literal so the URLs can be pasted straight into
//! a map client.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::config_file::WizardConfig;
use crate::types::CmrBackend;

const TILE_PATH: &str = "/tiles/WebMercatorQuad/{z}/{x}/{y}";

/// A labelled example URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointExample {
    pub label: String,
    pub url: String,
}

impl EndpointExample {
    fn new(label: &str, url: String) -> Self {
        Self {
            label: label.to_string(),
            url,
        }
    }
}

/// Join base, path, encoded params and literal template params
fn build(base: &str, path: &str, params: &[(&str, &str)], templates: &[&str]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    let mut query = serializer.finish();
    for name in templates {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&format!("{}={{{}}}", name, name));
    }

    if query.is_empty() {
        format!("{}{}", base, path)
    } else {
        format!("{}{}?{}", base, path, query)
    }
}

fn datetime_template(has_time: bool) -> &'static [&'static str] {
    if has_time { &["datetime"] } else { &[] }
}

/// Tiles, viewer and info for a COG
pub fn cog_endpoints(config: &WizardConfig, data_url: &str) -> Vec<EndpointExample> {
    let base = config.titiler_base();
    let params = [("url", data_url)];
    vec![
        EndpointExample::new("XYZ tiles", build(base, &format!("/cog{}", TILE_PATH), &params, &[])),
        EndpointExample::new("Map viewer", build(base, "/cog/WebMercatorQuad/map", &params, &[])),
        EndpointExample::new("Raster info", build(base, "/cog/info", &params, &[])),
    ]
}

/// Band statistics for a COG
pub fn cog_statistics_endpoint(config: &WizardConfig, data_url: &str) -> EndpointExample {
    EndpointExample::new(
        "Band statistics",
        build(config.titiler_base(), "/cog/statistics", &[("url", data_url)], &[]),
    )
}

/// Tiles and info for one variable of a multidimensional dataset
pub fn xarray_endpoints(
    config: &WizardConfig,
    data_url: &str,
    variable: &str,
    has_time: bool,
) -> Vec<EndpointExample> {
    let base = config.xarray_base();
    let params = [("url", data_url), ("variable", variable)];
    vec![
        EndpointExample::new(
            "XYZ tiles",
            build(base, &format!("/md{}", TILE_PATH), &params, datetime_template(has_time)),
        ),
        EndpointExample::new("Dataset info", build(base, "/md/info", &params, &[])),
    ]
}

/// Statistics for one variable of a multidimensional dataset
pub fn xarray_statistics_endpoint(
    config: &WizardConfig,
    data_url: &str,
    variable: &str,
    has_time: bool,
) -> EndpointExample {
    EndpointExample::new(
        "Variable statistics",
        build(
            config.xarray_base(),
            "/md/statistics",
            &[("url", data_url), ("variable", variable)],
            datetime_template(has_time),
        ),
    )
}

/// Tiles for a CMR concept through titiler-cmr
pub fn cmr_endpoints(
    config: &WizardConfig,
    concept_id: &str,
    backend: CmrBackend,
    has_time: bool,
) -> Vec<EndpointExample> {
    let backend = backend.to_string();
    let params = [("concept_id", concept_id), ("backend", backend.as_str())];
    vec![EndpointExample::new(
        "XYZ tiles",
        build(
            config.titiler_cmr_base(),
            TILE_PATH,
            &params,
            datetime_template(has_time),
        ),
    )]
}

/// Time-series statistics for a CMR concept
pub fn cmr_timeseries_statistics_endpoint(config: &WizardConfig, concept_id: &str) -> EndpointExample {
    EndpointExample::new(
        "Time-series statistics",
        build(
            config.titiler_cmr_base(),
            "/timeseries/statistics",
            &[("concept_id", concept_id)],
            &["datetime"],
        ),
    )
}
