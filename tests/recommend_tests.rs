//! Tests for the service decision tree and example endpoints
//!
//! These tests verify:
//! - Primary service and alternatives for each kind of input
//! - Exact example endpoint URLs (encoding and placeholders)
//! - Conversion advice for inputs no service renders directly
//! - Custom service base URLs flow into the endpoints

mod common;

use common::{cmr_record, FakeApi};
use geoviz_wizard::config_file::WizardConfig;
use geoviz_wizard::logic::{recommend, recommend_from_report};
use geoviz_wizard::types::{
    CmrBackend, ConversionTarget, FileFormat, ServiceKind, SourceKind, SpatialType,
};
use geoviz_wizard::validation::{DetectedProperties, ValidationRunner};

fn urls(props: &DetectedProperties, config: &WizardConfig) -> Vec<String> {
    recommend(props, config)
        .endpoints
        .into_iter()
        .map(|e| e.url)
        .collect()
}

fn cog_props(data_url: &str) -> DetectedProperties {
    DetectedProperties {
        source_kind: Some(SourceKind::S3),
        format: FileFormat::GeoTiff,
        spatial_type: SpatialType::Raster,
        is_cog: true,
        data_url: Some(data_url.to_string()),
        file_name: Some("a.tif".to_string()),
        ..Default::default()
    }
}

fn netcdf_props(has_time: bool) -> DetectedProperties {
    DetectedProperties {
        source_kind: Some(SourceKind::Https),
        format: FileFormat::NetCdf,
        spatial_type: SpatialType::Raster,
        has_time_dimension: has_time,
        variables: vec!["sst".to_string()],
        data_url: Some("https://data.example.com/sst.nc".to_string()),
        file_name: Some("sst.nc".to_string()),
        ..Default::default()
    }
}

fn cmr_props(format: FileFormat, backend: CmrBackend, has_time: bool) -> DetectedProperties {
    DetectedProperties {
        source_kind: Some(SourceKind::CmrConcept),
        format,
        spatial_type: format.spatial_type(),
        is_cmr: true,
        cmr_backend_hint: Some(backend),
        has_time_dimension: has_time,
        concept_id: Some("C123-POCLOUD".to_string()),
        ..Default::default()
    }
}

// =============================================================================
// COG
// =============================================================================

#[test]
fn test_cog_endpoint_urls() {
    let config = WizardConfig::default();
    assert_eq!(
        urls(&cog_props("s3://sentinel-cogs/a.tif"), &config),
        vec![
            "https://titiler.xyz/cog/tiles/WebMercatorQuad/{z}/{x}/{y}?url=s3%3A%2F%2Fsentinel-cogs%2Fa.tif",
            "https://titiler.xyz/cog/WebMercatorQuad/map?url=s3%3A%2F%2Fsentinel-cogs%2Fa.tif",
            "https://titiler.xyz/cog/info?url=s3%3A%2F%2Fsentinel-cogs%2Fa.tif",
            "https://titiler.xyz/cog/statistics?url=s3%3A%2F%2Fsentinel-cogs%2Fa.tif",
        ]
    );
}

#[test]
fn test_cog_query_string_in_source_is_encoded() {
    let config = WizardConfig::default();
    let props = cog_props("https://example.com/a.tif?token=x&v=1");
    let first = urls(&props, &config).remove(0);
    assert!(first.ends_with("?url=https%3A%2F%2Fexample.com%2Fa.tif%3Ftoken%3Dx%26v%3D1"));
}

#[test]
fn test_cog_uses_configured_titiler() {
    let config = WizardConfig {
        titiler_url: "https://tiles.internal.example".to_string(),
        ..WizardConfig::default()
    };
    for url in urls(&cog_props("s3://sentinel-cogs/a.tif"), &config) {
        assert!(url.starts_with("https://tiles.internal.example/cog/"), "{}", url);
    }
}

#[test]
fn test_cog_labels() {
    let rec = recommend(&cog_props("s3://sentinel-cogs/a.tif"), &WizardConfig::default());
    let labels: Vec<&str> = rec.endpoints.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["XYZ tiles", "Map viewer", "Raster info", "Band statistics"]);
    assert_eq!(rec.primary.label(), "TiTiler COG tile server");
}

// =============================================================================
// Multidimensional
// =============================================================================

#[test]
fn test_netcdf_with_time_endpoints() {
    let config = WizardConfig::default();
    let rec = recommend(&netcdf_props(true), &config);

    assert_eq!(rec.primary, ServiceKind::XarrayTileServer);
    assert_eq!(
        rec.alternatives,
        vec![ServiceKind::StatisticsApi, ServiceKind::FormatConversion]
    );
    let urls: Vec<&str> = rec.endpoints.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://titiler.xyz/md/tiles/WebMercatorQuad/{z}/{x}/{y}?url=https%3A%2F%2Fdata.example.com%2Fsst.nc&variable=sst&datetime={datetime}",
            "https://titiler.xyz/md/info?url=https%3A%2F%2Fdata.example.com%2Fsst.nc&variable=sst",
            "https://titiler.xyz/md/statistics?url=https%3A%2F%2Fdata.example.com%2Fsst.nc&variable=sst&datetime={datetime}",
        ]
    );
    let advice = rec.conversion.expect("conversion advice");
    assert_eq!(advice.target, ConversionTarget::Cog);
}

#[test]
fn test_netcdf_without_time_has_no_statistics() {
    let config = WizardConfig::default();
    let rec = recommend(&netcdf_props(false), &config);

    assert_eq!(rec.alternatives, vec![ServiceKind::FormatConversion]);
    assert_eq!(rec.endpoints.len(), 2);
    assert!(rec.endpoints.iter().all(|e| !e.url.contains("{datetime}")));
}

#[test]
fn test_multidimensional_without_variables_converts_to_zarr() {
    let props = DetectedProperties {
        variables: vec![],
        ..netcdf_props(true)
    };
    let rec = recommend(&props, &WizardConfig::default());

    assert_eq!(rec.primary, ServiceKind::FormatConversion);
    assert!(rec.alternatives.is_empty());
    assert!(rec.endpoints.is_empty());
    let advice = rec.conversion.expect("conversion advice");
    assert_eq!(advice.target, ConversionTarget::Zarr);
    assert!(advice.commands[0].contains("open_dataset('sst.nc').to_zarr('sst.zarr')"));
}

// =============================================================================
// CMR
// =============================================================================

#[test]
fn test_cmr_collection_with_time() {
    let config = WizardConfig::default();
    let rec = recommend(&cmr_props(FileFormat::NetCdf, CmrBackend::Xarray, true), &config);

    assert_eq!(rec.primary, ServiceKind::CmrTileServer);
    assert_eq!(rec.cmr_backend, Some(CmrBackend::Xarray));
    assert_eq!(rec.alternatives, vec![ServiceKind::StatisticsApi]);
    let urls: Vec<&str> = rec.endpoints.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://staging.openveda.cloud/api/titiler-cmr/tiles/WebMercatorQuad/{z}/{x}/{y}?concept_id=C123-POCLOUD&backend=xarray&datetime={datetime}",
            "https://staging.openveda.cloud/api/titiler-cmr/timeseries/statistics?concept_id=C123-POCLOUD&datetime={datetime}",
        ]
    );
    assert!(rec.conversion.is_none());
}

#[test]
fn test_cmr_cog_without_time() {
    let config = WizardConfig::default();
    let rec = recommend(&cmr_props(FileFormat::GeoTiff, CmrBackend::Rasterio, false), &config);

    assert_eq!(rec.cmr_backend, Some(CmrBackend::Rasterio));
    assert!(rec.alternatives.is_empty());
    assert_eq!(
        urls(&cmr_props(FileFormat::GeoTiff, CmrBackend::Rasterio, false), &config),
        vec!["https://staging.openveda.cloud/api/titiler-cmr/tiles/WebMercatorQuad/{z}/{x}/{y}?concept_id=C123-POCLOUD&backend=rasterio"]
    );
}

#[test]
fn test_cmr_beats_format_rules() {
    // A COG granule in CMR still goes to titiler-cmr
    let mut props = cmr_props(FileFormat::GeoTiff, CmrBackend::Rasterio, false);
    props.is_cog = true;
    let rec = recommend(&props, &WizardConfig::default());
    assert_eq!(rec.primary, ServiceKind::CmrTileServer);
}

// =============================================================================
// Conversion-only outcomes
// =============================================================================

#[test]
fn test_vector_input_gets_vector_tiles_advice() {
    let props = DetectedProperties {
        source_kind: Some(SourceKind::Https),
        format: FileFormat::GeoJson,
        spatial_type: SpatialType::Vector,
        file_name: Some("parcels.geojson".to_string()),
        ..Default::default()
    };
    let rec = recommend(&props, &WizardConfig::default());

    assert_eq!(rec.primary, ServiceKind::FormatConversion);
    let advice = rec.conversion.expect("conversion advice");
    assert_eq!(advice.target, ConversionTarget::VectorTiles);
    assert_eq!(advice.commands[0], "tippecanoe -o parcels.pmtiles parcels.geojson");
    assert!(rec.rationale[0].starts_with("GeoJSON is vector data"));
}

#[test]
fn test_unknown_format_defaults_to_cog_conversion() {
    let rec = recommend(&DetectedProperties::default(), &WizardConfig::default());
    assert_eq!(rec.primary, ServiceKind::FormatConversion);
    assert_eq!(
        rec.conversion.map(|c| c.commands[0].clone()).as_deref(),
        Some("rio cogeo create input input_cog.tif")
    );
}

// =============================================================================
// From a validation report
// =============================================================================

#[test]
fn test_recommend_from_aborted_report_fails() {
    let api = FakeApi::new();
    let report = ValidationRunner::new(&api).run("http://example.com/a.tif", &mut |_| {});
    let err = recommend_from_report(&report, &WizardConfig::default()).expect_err("aborted");
    let message = err.to_string();
    assert!(message.contains("Input syntax failed"), "{}", message);
    assert!(message.contains("use https"), "{}", message);
}

#[test]
fn test_recommend_from_cmr_report() {
    let api = FakeApi::new().with_cmr(
        "C123-POCLOUD",
        Some(cmr_record("C123-POCLOUD", &["netCDF-4"], true)),
    );
    let report = ValidationRunner::new(&api).run("C123-POCLOUD", &mut |_| {});
    let rec = recommend_from_report(&report, &WizardConfig::default()).expect("recommendation");
    assert_eq!(rec.primary, ServiceKind::CmrTileServer);
    assert_eq!(rec.cmr_backend, Some(CmrBackend::Xarray));
    assert_eq!(rec.endpoints.len(), 2);
}

#[test]
fn test_recommendation_is_deterministic() {
    let config = WizardConfig::default();
    let props = netcdf_props(true);
    assert_eq!(recommend(&props, &config), recommend(&props, &config));
}
