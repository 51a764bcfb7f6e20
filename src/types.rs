//! Type-safe domain types for the wizard
//!
//! Source kinds, detected formats, check outcomes and service choices are
//! all closed sets, so they are enums with strum string forms rather than
//! loose strings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Where a file reference points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum SourceKind {
    #[strum(serialize = "s3")]
    S3,
    #[strum(serialize = "https")]
    Https,
    #[strum(serialize = "cmr")]
    CmrConcept,
}

/// CMR concept type, taken from the concept ID prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum CmrConceptKind {
    Collection,
    Granule,
}

impl CmrConceptKind {
    /// Map a concept ID prefix letter to its kind
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'C' => Some(Self::Collection),
            'G' => Some(Self::Granule),
            _ => None,
        }
    }

    /// CMR search path segment for this kind
    pub fn search_path(&self) -> &'static str {
        match self {
            Self::Collection => "collections",
            Self::Granule => "granules",
        }
    }
}

/// Detected file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum FileFormat {
    #[strum(serialize = "geotiff")]
    GeoTiff,
    #[strum(serialize = "netcdf")]
    NetCdf,
    Hdf5,
    Zarr,
    #[strum(serialize = "geojson")]
    GeoJson,
    Shapefile,
    #[strum(serialize = "geoparquet")]
    GeoParquet,
    #[strum(serialize = "flatgeobuf")]
    FlatGeobuf,
    #[default]
    Unknown,
}

impl FileFormat {
    /// Raster or vector, as far as the visualization services care
    pub fn spatial_type(&self) -> SpatialType {
        match self {
            Self::GeoTiff | Self::NetCdf | Self::Hdf5 | Self::Zarr => SpatialType::Raster,
            Self::GeoJson | Self::Shapefile | Self::GeoParquet | Self::FlatGeobuf => {
                SpatialType::Vector
            }
            Self::Unknown => SpatialType::Unknown,
        }
    }

    /// Formats served through the xarray-backed tiler
    pub fn is_multidimensional(&self) -> bool {
        matches!(self, Self::NetCdf | Self::Hdf5 | Self::Zarr)
    }

    /// Human-readable name for UI output
    pub fn label(&self) -> &'static str {
        match self {
            Self::GeoTiff => "GeoTIFF",
            Self::NetCdf => "NetCDF",
            Self::Hdf5 => "HDF5",
            Self::Zarr => "Zarr",
            Self::GeoJson => "GeoJSON",
            Self::Shapefile => "Shapefile",
            Self::GeoParquet => "GeoParquet",
            Self::FlatGeobuf => "FlatGeobuf",
            Self::Unknown => "Unknown",
        }
    }
}

/// Raster vs vector data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SpatialType {
    Raster,
    Vector,
    #[default]
    Unknown,
}

/// Outcome of a single validation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum CheckStatus {
    #[default]
    Pending,
    Running,
    Passed,
    Warning,
    Failed,
    Skipped,
}

impl CheckStatus {
    /// Whether the check has produced its final outcome
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }

    /// Status glyph for list rendering
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Pending => "·",
            Self::Running => "…",
            Self::Passed => "✓",
            Self::Warning => "!",
            Self::Failed => "✗",
            Self::Skipped => "-",
        }
    }
}

/// Hosted service the wizard can recommend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum ServiceKind {
    #[strum(serialize = "cog-tile-server")]
    CogTileServer,
    #[strum(serialize = "xarray-tile-server")]
    XarrayTileServer,
    #[strum(serialize = "cmr-tile-server")]
    CmrTileServer,
    #[strum(serialize = "statistics-api")]
    StatisticsApi,
    #[strum(serialize = "format-conversion")]
    FormatConversion,
}

impl ServiceKind {
    /// Display name for the service
    pub fn label(&self) -> &'static str {
        match self {
            Self::CogTileServer => "TiTiler COG tile server",
            Self::XarrayTileServer => "TiTiler multidimensional (xarray) tile server",
            Self::CmrTileServer => "titiler-cmr tile server",
            Self::StatisticsApi => "Statistics API",
            Self::FormatConversion => "Format conversion",
        }
    }
}

/// Reader backend used by titiler-cmr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum CmrBackend {
    Rasterio,
    Xarray,
}

/// Target format for conversion advice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum ConversionTarget {
    #[strum(serialize = "cog")]
    Cog,
    #[strum(serialize = "zarr")]
    Zarr,
    #[strum(serialize = "vector-tiles")]
    VectorTiles,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_spatial_type_mapping() {
        assert_eq!(FileFormat::GeoTiff.spatial_type(), SpatialType::Raster);
        assert_eq!(FileFormat::Zarr.spatial_type(), SpatialType::Raster);
        assert_eq!(FileFormat::FlatGeobuf.spatial_type(), SpatialType::Vector);
        assert_eq!(FileFormat::Unknown.spatial_type(), SpatialType::Unknown);
    }

    #[test]
    fn test_multidimensional_formats() {
        let multi: Vec<FileFormat> = FileFormat::iter()
            .filter(|f| f.is_multidimensional())
            .collect();
        assert_eq!(multi, vec![FileFormat::NetCdf, FileFormat::Hdf5, FileFormat::Zarr]);
    }

    #[test]
    fn test_format_string_roundtrip() {
        for format in FileFormat::iter() {
            let parsed: FileFormat = format.to_string().parse().expect("should parse");
            assert_eq!(parsed, format);
        }
    }

    #[test]
    fn test_concept_kind_prefix() {
        assert_eq!(CmrConceptKind::from_prefix('C'), Some(CmrConceptKind::Collection));
        assert_eq!(CmrConceptKind::from_prefix('G'), Some(CmrConceptKind::Granule));
        assert_eq!(CmrConceptKind::from_prefix('S'), None);
        assert_eq!(CmrConceptKind::Granule.search_path(), "granules");
    }

    #[test]
    fn test_check_status_finished() {
        assert!(!CheckStatus::Pending.is_finished());
        assert!(!CheckStatus::Running.is_finished());
        assert!(CheckStatus::Skipped.is_finished());
        assert!(CheckStatus::Failed.is_finished());
    }
}
