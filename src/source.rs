//! File reference parsing and format detection
//!
//! A file reference is whatever the user typed in the first wizard step:
//! an `s3://` object URL, an `https://` URL, or a CMR concept ID. Parsing is
//! purely syntactic. Nothing here touches the network.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::types::{CmrConceptKind, FileFormat, SourceKind};

static CONCEPT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([CG])([0-9]+)-([A-Z0-9_]+)$").expect("concept ID pattern is valid")
});

static S3_BUCKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9.-]{3,63}$").expect("bucket pattern is valid"));

/// Errors produced while parsing a file reference
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("no file reference given")]
    Empty,

    #[error("invalid S3 URL '{0}' (expected s3://bucket/key)")]
    InvalidS3(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("plain http is not supported, use https")]
    InsecureScheme,

    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("'{0}' is not an S3 URL, HTTPS URL or CMR concept ID")]
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    S3 { bucket: String, key: String },
    Https { url: Url },
    Cmr {
        concept_id: String,
        kind: CmrConceptKind,
        provider: String,
    },
}

/// A syntactically valid file reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    raw: String,
    location: Location,
}

impl FileReference {
    /// Parse user input into a file reference.
    ///
    /// Leading and trailing whitespace is ignored. The S3 scheme prefix is
    /// matched case-insensitively, the concept ID pattern is not.
    pub fn parse(input: &str) -> Result<Self, SourceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SourceError::Empty);
        }

        let location = if has_prefix_ignore_case(trimmed, "s3://") {
            parse_s3(trimmed)?
        } else if let Some(caps) = CONCEPT_ID_RE.captures(trimmed) {
            let prefix = caps[1].chars().next().unwrap_or('C');
            let kind = CmrConceptKind::from_prefix(prefix)
                .ok_or_else(|| SourceError::Unrecognized(trimmed.to_string()))?;
            Location::Cmr {
                concept_id: trimmed.to_string(),
                kind,
                provider: caps[3].to_string(),
            }
        } else if trimmed.contains("://") {
            parse_url(trimmed)?
        } else {
            return Err(SourceError::Unrecognized(trimmed.to_string()));
        };

        Ok(Self {
            raw: trimmed.to_string(),
            location,
        })
    }

    /// The trimmed input this reference was parsed from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> SourceKind {
        match self.location {
            Location::S3 { .. } => SourceKind::S3,
            Location::Https { .. } => SourceKind::Https,
            Location::Cmr { .. } => SourceKind::CmrConcept,
        }
    }

    pub fn is_cmr(&self) -> bool {
        matches!(self.location, Location::Cmr { .. })
    }

    /// Concept ID and kind for CMR references
    pub fn cmr_concept(&self) -> Option<(&str, CmrConceptKind)> {
        match &self.location {
            Location::Cmr {
                concept_id, kind, ..
            } => Some((concept_id.as_str(), *kind)),
            _ => None,
        }
    }

    /// Data provider named in a CMR concept ID
    pub fn provider(&self) -> Option<&str> {
        match &self.location {
            Location::Cmr { provider, .. } => Some(provider.as_str()),
            _ => None,
        }
    }

    /// The URL handed to the tile servers.
    ///
    /// S3 references are passed through unchanged since the hosted tilers
    /// read `s3://` themselves. CMR references have no file URL.
    pub fn data_url(&self) -> Option<String> {
        match &self.location {
            Location::S3 { .. } => Some(self.raw.clone()),
            Location::Https { url } => Some(url.to_string()),
            Location::Cmr { .. } => None,
        }
    }

    /// An HTTPS URL usable for a reachability probe.
    ///
    /// S3 objects are mapped to the public virtual-hosted endpoint, with
    /// each key segment percent-encoded.
    pub fn http_url(&self) -> Option<String> {
        match &self.location {
            Location::S3 { bucket, key } => {
                let mut url = Url::parse(&format!("https://{}.s3.amazonaws.com/", bucket)).ok()?;
                url.path_segments_mut()
                    .ok()?
                    .pop_if_empty()
                    .extend(key.split('/'));
                Some(url.to_string())
            }
            Location::Https { url } => Some(url.to_string()),
            Location::Cmr { .. } => None,
        }
    }

    fn path(&self) -> Option<&str> {
        match &self.location {
            Location::S3 { key, .. } => Some(key.as_str()),
            Location::Https { url } => Some(url.path()),
            Location::Cmr { .. } => None,
        }
    }

    /// Last non-empty path segment
    pub fn file_name(&self) -> Option<&str> {
        self.path()?
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
    }

    /// Lowercased file extension.
    ///
    /// A `.zarr` directory anywhere in the path makes the whole reference a
    /// zarr store, so `s3://b/store.zarr/` and `s3://b/store.zarr/.zmetadata`
    /// both report `zarr`.
    pub fn extension(&self) -> Option<String> {
        let path = self.path()?;
        if path
            .split('/')
            .any(|seg| seg.to_ascii_lowercase().ends_with(".zarr"))
        {
            return Some("zarr".to_string());
        }
        let name = self.file_name()?;
        let (_, ext) = name.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_ascii_lowercase())
        }
    }

    /// Format implied by the file extension alone
    pub fn format_hint(&self) -> FileFormat {
        self.extension()
            .map(|ext| detect_format_from_extension(&ext))
            .unwrap_or_default()
    }
}

impl fmt::Display for FileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(prefix))
}

fn parse_s3(input: &str) -> Result<Location, SourceError> {
    let rest = &input[5..];
    let (bucket, key) = rest
        .split_once('/')
        .ok_or_else(|| SourceError::InvalidS3(input.to_string()))?;

    if !S3_BUCKET_RE.is_match(bucket) || key.trim_matches('/').is_empty() {
        return Err(SourceError::InvalidS3(input.to_string()));
    }

    Ok(Location::S3 {
        bucket: bucket.to_string(),
        key: key.to_string(),
    })
}

fn parse_url(input: &str) -> Result<Location, SourceError> {
    let url = Url::parse(input).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;

    match url.scheme() {
        "https" => {}
        "http" => return Err(SourceError::InsecureScheme),
        other => return Err(SourceError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(SourceError::InvalidUrl(format!("'{}' has no host", input)));
    }
    if url.path().trim_matches('/').is_empty() {
        return Err(SourceError::InvalidUrl(format!(
            "'{}' does not point to a file",
            input
        )));
    }

    Ok(Location::Https { url })
}

/// Map a lowercased file extension to a format
pub fn detect_format_from_extension(ext: &str) -> FileFormat {
    match ext {
        "tif" | "tiff" => FileFormat::GeoTiff,
        "nc" | "nc4" | "cdf" => FileFormat::NetCdf,
        "h5" | "hdf5" | "he5" | "hdf" => FileFormat::Hdf5,
        "zarr" => FileFormat::Zarr,
        "geojson" | "json" => FileFormat::GeoJson,
        "shp" | "zip" => FileFormat::Shapefile,
        "parquet" | "geoparquet" => FileFormat::GeoParquet,
        "fgb" => FileFormat::FlatGeobuf,
        _ => FileFormat::Unknown,
    }
}

/// Map an HTTP Content-Type to a format, ignoring parameters
pub fn detect_format_from_content_type(content_type: &str) -> FileFormat {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "image/tiff" => FileFormat::GeoTiff,
        "application/x-netcdf" | "application/netcdf" => FileFormat::NetCdf,
        "application/x-hdf5" | "application/x-hdf" => FileFormat::Hdf5,
        "application/geo+json" => FileFormat::GeoJson,
        _ => FileFormat::Unknown,
    }
}

/// Map a CMR distribution format string (free text) to a format
pub fn detect_format_from_cmr(format: &str) -> FileFormat {
    let lower = format.to_ascii_lowercase();
    if lower.contains("netcdf") {
        FileFormat::NetCdf
    } else if lower.contains("hdf") {
        FileFormat::Hdf5
    } else if lower.contains("zarr") {
        FileFormat::Zarr
    } else if lower.contains("cog") || lower.contains("geotiff") || lower.contains("tiff") {
        FileFormat::GeoTiff
    } else {
        FileFormat::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_s3() {
        let r = FileReference::parse("  s3://my-bucket/data/scene.TIF ").expect("valid");
        assert_eq!(r.kind(), SourceKind::S3);
        assert_eq!(r.raw(), "s3://my-bucket/data/scene.TIF");
        assert_eq!(r.file_name(), Some("scene.TIF"));
        assert_eq!(r.extension().as_deref(), Some("tif"));
        assert_eq!(
            r.http_url().as_deref(),
            Some("https://my-bucket.s3.amazonaws.com/data/scene.TIF")
        );
        assert_eq!(r.data_url().as_deref(), Some("s3://my-bucket/data/scene.TIF"));
    }

    #[test]
    fn test_s3_http_url_encodes_key() {
        let r = FileReference::parse("s3://my-bucket/scenes/run#2.tif").expect("valid");
        let probe = r.http_url().expect("http url");
        assert_eq!(probe, "https://my-bucket.s3.amazonaws.com/scenes/run%232.tif");
        let parsed = Url::parse(&probe).expect("parses");
        assert_eq!(parsed.path(), "/scenes/run%232.tif");
        assert_eq!(parsed.fragment(), None);

        let r = FileReference::parse("s3://my-bucket/a b/x?y%z.tif").expect("valid");
        assert_eq!(
            r.http_url().as_deref(),
            Some("https://my-bucket.s3.amazonaws.com/a%20b/x%3Fy%25z.tif")
        );
        // The tilers still get the raw object URL
        assert_eq!(r.data_url().as_deref(), Some("s3://my-bucket/a b/x?y%z.tif"));
    }

    #[test]
    fn test_s3_http_url_keeps_trailing_slash() {
        let r = FileReference::parse("s3://bucket/path/store.zarr/").expect("valid");
        assert_eq!(
            r.http_url().as_deref(),
            Some("https://bucket.s3.amazonaws.com/path/store.zarr/")
        );
    }

    #[test]
    fn test_parse_s3_uppercase_scheme() {
        let r = FileReference::parse("S3://bucket/key.nc").expect("valid");
        assert_eq!(r.kind(), SourceKind::S3);
    }

    #[test]
    fn test_parse_s3_rejects_missing_key() {
        assert!(matches!(
            FileReference::parse("s3://bucket"),
            Err(SourceError::InvalidS3(_))
        ));
        assert!(matches!(
            FileReference::parse("s3://bucket/"),
            Err(SourceError::InvalidS3(_))
        ));
    }

    #[test]
    fn test_parse_s3_rejects_bad_bucket() {
        assert!(matches!(
            FileReference::parse("s3://Bad_Bucket/key.tif"),
            Err(SourceError::InvalidS3(_))
        ));
        assert!(matches!(
            FileReference::parse("s3://ab/key.tif"),
            Err(SourceError::InvalidS3(_))
        ));
    }

    #[test]
    fn test_parse_https() {
        let r = FileReference::parse("https://example.com/cogs/elevation.tiff?token=1")
            .expect("valid");
        assert_eq!(r.kind(), SourceKind::Https);
        assert_eq!(r.file_name(), Some("elevation.tiff"));
        assert_eq!(r.format_hint(), FileFormat::GeoTiff);
    }

    #[test]
    fn test_parse_http_rejected() {
        assert_eq!(
            FileReference::parse("http://example.com/a.tif"),
            Err(SourceError::InsecureScheme)
        );
    }

    #[test]
    fn test_parse_other_scheme_rejected() {
        assert_eq!(
            FileReference::parse("ftp://example.com/a.tif"),
            Err(SourceError::UnsupportedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn test_parse_https_without_path_rejected() {
        assert!(matches!(
            FileReference::parse("https://example.com/"),
            Err(SourceError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_parse_cmr_collection() {
        let r = FileReference::parse("C1996881146-POCLOUD").expect("valid");
        assert!(r.is_cmr());
        assert_eq!(
            r.cmr_concept(),
            Some(("C1996881146-POCLOUD", CmrConceptKind::Collection))
        );
        assert_eq!(r.provider(), Some("POCLOUD"));
        assert_eq!(r.http_url(), None);
        assert_eq!(r.file_name(), None);
    }

    #[test]
    fn test_parse_cmr_granule() {
        let r = FileReference::parse("G2839123456-LPCLOUD").expect("valid");
        assert_eq!(r.cmr_concept().map(|(_, k)| k), Some(CmrConceptKind::Granule));
    }

    #[test]
    fn test_parse_cmr_lowercase_rejected() {
        assert!(matches!(
            FileReference::parse("c1996881146-pocloud"),
            Err(SourceError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(FileReference::parse("   "), Err(SourceError::Empty));
    }

    #[test]
    fn test_zarr_store_extension() {
        let r = FileReference::parse("s3://bucket/path/store.zarr/").expect("valid");
        assert_eq!(r.extension().as_deref(), Some("zarr"));
        assert_eq!(r.file_name(), Some("store.zarr"));

        let r = FileReference::parse("https://host.org/store.zarr/.zmetadata").expect("valid");
        assert_eq!(r.format_hint(), FileFormat::Zarr);
    }

    #[test]
    fn test_no_extension() {
        let r = FileReference::parse("https://host.org/download/12345").expect("valid");
        assert_eq!(r.extension(), None);
        assert_eq!(r.format_hint(), FileFormat::Unknown);
    }

    #[test]
    fn test_detect_from_extension() {
        assert_eq!(detect_format_from_extension("nc4"), FileFormat::NetCdf);
        assert_eq!(detect_format_from_extension("he5"), FileFormat::Hdf5);
        assert_eq!(detect_format_from_extension("fgb"), FileFormat::FlatGeobuf);
        assert_eq!(detect_format_from_extension("parquet"), FileFormat::GeoParquet);
        assert_eq!(detect_format_from_extension("jpg"), FileFormat::Unknown);
    }

    #[test]
    fn test_detect_from_content_type() {
        assert_eq!(
            detect_format_from_content_type("image/tiff; application=geotiff"),
            FileFormat::GeoTiff
        );
        assert_eq!(
            detect_format_from_content_type("Application/X-NetCDF"),
            FileFormat::NetCdf
        );
        assert_eq!(
            detect_format_from_content_type("application/octet-stream"),
            FileFormat::Unknown
        );
    }

    #[test]
    fn test_detect_from_cmr() {
        assert_eq!(detect_format_from_cmr("netCDF-4"), FileFormat::NetCdf);
        assert_eq!(detect_format_from_cmr("HDF-EOS5"), FileFormat::Hdf5);
        assert_eq!(detect_format_from_cmr("Cloud Optimized GeoTIFF"), FileFormat::GeoTiff);
        assert_eq!(detect_format_from_cmr("COG"), FileFormat::GeoTiff);
        assert_eq!(detect_format_from_cmr("ASCII"), FileFormat::Unknown);
    }
}
