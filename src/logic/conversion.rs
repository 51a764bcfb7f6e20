//! Format-conversion advice for files no hosted service can render as-is

use serde::{Deserialize, Serialize};

use crate::types::ConversionTarget;

/// What to convert to, and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionAdvice {
    pub target: ConversionTarget,
    pub summary: String,
    pub commands: Vec<String>,
}

/// Build conversion advice for a target, using the source file name in
/// the example commands (`input` when the reference has none).
pub fn conversion_advice(target: ConversionTarget, file_name: Option<&str>) -> ConversionAdvice {
    let input = file_name.filter(|n| !n.is_empty()).unwrap_or("input");
    let stem = match input.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => input,
    };

    match target {
        ConversionTarget::Cog => ConversionAdvice {
            target,
            summary: "Convert to a Cloud Optimized GeoTIFF so the COG tile server can stream it"
                .to_string(),
            commands: vec![
                format!("rio cogeo create {} {}_cog.tif", input, stem),
                format!("gdal_translate -of COG {} {}_cog.tif", input, stem),
            ],
        },
        ConversionTarget::Zarr => ConversionAdvice {
            target,
            summary: "Rewrite as a Zarr store so the multidimensional tiler can read it lazily"
                .to_string(),
            commands: vec![format!(
                "python -c \"import xarray as xr; xr.open_dataset('{}').to_zarr('{}.zarr')\"",
                input, stem
            )],
        },
        ConversionTarget::VectorTiles => ConversionAdvice {
            target,
            summary: "Raster tile servers cannot render vector data; build vector tiles instead"
                .to_string(),
            commands: vec![
                format!("tippecanoe -o {}.pmtiles {}", stem, input),
                format!("ogr2ogr -f FlatGeobuf {}.fgb {}", stem, input),
            ],
        },
    }
}
