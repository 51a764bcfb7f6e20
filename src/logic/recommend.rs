//! Service recommendation decision tree
//!
//! Turns the properties detected during validation into a recommended
//! hosted service, a list of alternatives, and concrete example endpoints.
//!
//! # Decision Rules
//!
//! | Detected                              | Primary                     | Alternatives |
//! |---------------------------------------|-----------------------------|--------------|
//! | CMR concept                           | titiler-cmr tiles           | statistics (if time) |
//! | GeoTIFF, valid COG                    | COG tile server             | statistics |
//! | GeoTIFF, not a COG                    | convert to COG              | COG tiles after conversion |
//! | NetCDF / HDF5 / Zarr with variables   | xarray tile server          | statistics (if time), convert to COG |
//! | NetCDF / HDF5 / Zarr, no variables    | convert to Zarr             | none |
//! | Vector formats                        | convert to vector tiles     | none |
//! | Unknown                               | convert to COG              | none |
//!
//! The tree is pure. It does no I/O, and the same properties always produce
//! the same recommendation.

use serde::{Deserialize, Serialize};

use super::conversion::{conversion_advice, ConversionAdvice};
use super::endpoints::{
    cmr_endpoints, cmr_timeseries_statistics_endpoint, cog_endpoints, cog_statistics_endpoint,
    xarray_endpoints, xarray_statistics_endpoint, EndpointExample,
};
use crate::config_file::WizardConfig;
use crate::error::{Result, WizardError};
use crate::types::{CmrBackend, ConversionTarget, FileFormat, ServiceKind, SpatialType};
use crate::validation::{DetectedProperties, ValidationReport};

/// The wizard's answer for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub primary: ServiceKind,
    pub alternatives: Vec<ServiceKind>,
    /// Reader backend when the primary service is titiler-cmr
    pub cmr_backend: Option<CmrBackend>,
    pub rationale: Vec<String>,
    pub endpoints: Vec<EndpointExample>,
    pub conversion: Option<ConversionAdvice>,
}

impl Recommendation {
    fn new(primary: ServiceKind) -> Self {
        Self {
            primary,
            alternatives: Vec::new(),
            cmr_backend: None,
            rationale: Vec::new(),
            endpoints: Vec::new(),
            conversion: None,
        }
    }

    fn because(mut self, reason: impl Into<String>) -> Self {
        self.rationale.push(reason.into());
        self
    }

    fn with_alternative(mut self, service: ServiceKind) -> Self {
        if !self.alternatives.contains(&service) && service != self.primary {
            self.alternatives.push(service);
        }
        self
    }

    fn with_conversion(mut self, target: ConversionTarget, props: &DetectedProperties) -> Self {
        self.conversion = Some(conversion_advice(target, props.file_name.as_deref()));
        self
    }

    /// Every service mentioned, primary first
    pub fn services(&self) -> impl Iterator<Item = ServiceKind> + '_ {
        std::iter::once(self.primary).chain(self.alternatives.iter().copied())
    }
}

/// Recommend a service for the detected properties.
pub fn recommend(props: &DetectedProperties, config: &WizardConfig) -> Recommendation {
    if props.is_cmr {
        return recommend_cmr(props, config);
    }

    match props.format {
        FileFormat::GeoTiff if props.is_cog => recommend_cog(props, config),
        FileFormat::GeoTiff => Recommendation::new(ServiceKind::FormatConversion)
            .because("The GeoTIFF is not cloud optimized, so tiles would need whole-file reads")
            .because("After conversion the COG tile server can serve it directly")
            .with_alternative(ServiceKind::CogTileServer)
            .with_conversion(ConversionTarget::Cog, props),
        format if format.is_multidimensional() => recommend_multidimensional(props, config),
        _ if props.spatial_type == SpatialType::Vector => {
            Recommendation::new(ServiceKind::FormatConversion)
                .because(format!(
                    "{} is vector data; the hosted tile servers only render rasters",
                    props.format.label()
                ))
                .with_conversion(ConversionTarget::VectorTiles, props)
        }
        _ => Recommendation::new(ServiceKind::FormatConversion)
            .because("The file format was not recognised by any hosted service")
            .because("A Cloud Optimized GeoTIFF is the most widely supported raster layout")
            .with_conversion(ConversionTarget::Cog, props),
    }
}

/// Recommend from a finished validation report.
///
/// Fails when validation aborted, since the detected properties are then
/// incomplete.
pub fn recommend_from_report(report: &ValidationReport, config: &WizardConfig) -> Result<Recommendation> {
    if let Some(failure) = report.fatal_failure() {
        return Err(WizardError::validation(format!(
            "{} failed: {}",
            failure.check.title(),
            failure.message
        )));
    }
    if report.aborted {
        return Err(WizardError::validation("validation did not complete"));
    }
    Ok(recommend(&report.properties, config))
}

fn recommend_cmr(props: &DetectedProperties, config: &WizardConfig) -> Recommendation {
    let backend = props.cmr_backend_hint.unwrap_or(if props.format == FileFormat::GeoTiff {
        CmrBackend::Rasterio
    } else {
        CmrBackend::Xarray
    });

    let mut rec = Recommendation::new(ServiceKind::CmrTileServer)
        .because("CMR concepts are tiled by titiler-cmr, which resolves granules from the catalog")
        .because(format!("The {} backend matches {} data", backend, props.format.label()));
    rec.cmr_backend = Some(backend);

    if props.format == FileFormat::Unknown {
        rec = rec.because("CMR lists no recognised format; the xarray backend is the default guess");
    }

    let concept_id = props.concept_id.as_deref().unwrap_or_default();
    rec.endpoints = cmr_endpoints(config, concept_id, backend, props.has_time_dimension);

    if props.has_time_dimension {
        rec = rec
            .because("The collection has a temporal extent, so time-series statistics are available")
            .with_alternative(ServiceKind::StatisticsApi);
        rec.endpoints
            .push(cmr_timeseries_statistics_endpoint(config, concept_id));
    }
    rec
}

fn recommend_cog(props: &DetectedProperties, config: &WizardConfig) -> Recommendation {
    let mut rec = Recommendation::new(ServiceKind::CogTileServer)
        .because("The file is a valid Cloud Optimized GeoTIFF and can be tiled on the fly")
        .with_alternative(ServiceKind::StatisticsApi);

    if let Some((min, max)) = props.zoom_range {
        rec = rec.because(format!("Native zoom range is {} to {}", min, max));
    }

    if let Some(url) = props.data_url.as_deref() {
        rec.endpoints = cog_endpoints(config, url);
        rec.endpoints.push(cog_statistics_endpoint(config, url));
    }
    rec
}

fn recommend_multidimensional(props: &DetectedProperties, config: &WizardConfig) -> Recommendation {
    let Some(variable) = props.variables.first() else {
        return Recommendation::new(ServiceKind::FormatConversion)
            .because(format!(
                "The {} dataset exposes no variables the multidimensional tiler can read",
                props.format.label()
            ))
            .with_conversion(ConversionTarget::Zarr, props);
    };

    let mut rec = Recommendation::new(ServiceKind::XarrayTileServer).because(format!(
        "{} is multidimensional; the xarray tiler renders one variable at a time",
        props.format.label()
    ));

    if let Some(url) = props.data_url.as_deref() {
        rec.endpoints = xarray_endpoints(config, url, variable, props.has_time_dimension);
    }

    if props.has_time_dimension {
        rec = rec
            .because("A time dimension is present, so statistics can be computed per time step")
            .with_alternative(ServiceKind::StatisticsApi);
        if let Some(url) = props.data_url.as_deref() {
            rec.endpoints
                .push(xarray_statistics_endpoint(config, url, variable, true));
        }
    }

    rec.because("A single time slice or variable can also be exported as a COG")
        .with_alternative(ServiceKind::FormatConversion)
        .with_conversion(ConversionTarget::Cog, props)
}
