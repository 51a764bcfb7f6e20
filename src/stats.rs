//! Statistics preview: histogram model and linear scaling.
//!
//! The Recommend step shows the first band's histogram for COG input. The
//! same model backs the ASCII chart printed by `check --stats`.

use thiserror::Error;
use tracing::debug;

use crate::api::{ApiResult, BandStatistics, BandStats, VisualizationApi};
use crate::validation::DetectedProperties;

/// Linear map from a data domain to an output range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map a domain value into the range. A zero-width domain maps
    /// everything to the middle of the range.
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) * (r1 - r0) / (d1 - d0)
    }

    /// `count` evenly spaced domain values, both ends included
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        if count < 2 {
            return vec![d0];
        }
        let step = (d1 - d0) / (count - 1) as f64;
        (0..count)
            .map(|i| if i == count - 1 { d1 } else { d0 + step * i as f64 })
            .collect()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistogramError {
    #[error("band has no histogram")]
    Empty,
}

/// Histogram bins for one band
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub band: String,
    /// Bin centres
    pub centers: Vec<f64>,
    pub counts: Vec<f64>,
}

impl Histogram {
    /// Build from TiTiler's `[[counts], [edges]]` layout.
    ///
    /// Edges normally hold one more value than counts; bins are paired up
    /// to the shorter of the two.
    pub fn from_band(band: &str, stats: &BandStats) -> Result<Self, HistogramError> {
        let (counts, edges) = match stats.histogram.as_slice() {
            [counts, edges, ..] => (counts, edges),
            _ => return Err(HistogramError::Empty),
        };

        let centers: Vec<f64> = if edges.len() > counts.len() {
            edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
        } else {
            edges.clone()
        };

        let len = counts.len().min(centers.len());
        if len == 0 {
            return Err(HistogramError::Empty);
        }

        Ok(Self {
            band: band.to_string(),
            centers: centers[..len].to_vec(),
            counts: counts[..len].to_vec(),
        })
    }

    /// First band (in name order) that has a usable histogram
    pub fn first_of(stats: &BandStatistics) -> Option<Self> {
        stats
            .iter()
            .find_map(|(band, s)| Self::from_band(band, s).ok())
    }

    pub fn max_count(&self) -> f64 {
        self.counts.iter().copied().fold(0.0, f64::max)
    }

    /// Counts scaled to `0..=max_height`
    pub fn bar_heights(&self, max_height: u64) -> Vec<u64> {
        let scale = LinearScale::new((0.0, self.max_count()), (0.0, max_height as f64));
        self.counts
            .iter()
            .map(|&c| {
                if self.max_count() == 0.0 {
                    0
                } else {
                    scale.scale(c).round().clamp(0.0, max_height as f64) as u64
                }
            })
            .collect()
    }

    /// Value range covered by the bins
    pub fn value_range(&self) -> (f64, f64) {
        let first = self.centers.first().copied().unwrap_or_default();
        let last = self.centers.last().copied().unwrap_or_default();
        (first, last)
    }

    /// Render as rows of `#` for plain-text output.
    ///
    /// Bins are resampled to `width` columns by nearest bin; the last row is
    /// an axis with the value range.
    pub fn render_ascii(&self, width: usize, height: usize) -> Vec<String> {
        if width == 0 || height == 0 {
            return Vec::new();
        }
        let heights = self.bar_heights(height as u64);
        let column = LinearScale::new((0.0, width as f64), (0.0, heights.len() as f64));
        let columns: Vec<u64> = (0..width)
            .map(|x| {
                let idx = column.scale(x as f64 + 0.5).floor() as usize;
                heights.get(idx.min(heights.len() - 1)).copied().unwrap_or(0)
            })
            .collect();

        let mut rows: Vec<String> = (1..=height as u64)
            .rev()
            .map(|level| {
                columns
                    .iter()
                    .map(|&h| if h >= level { '#' } else { ' ' })
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect();

        let (lo, hi) = self.value_range();
        let left = format!("{:.2}", lo);
        let right = format!("{:.2}", hi);
        let gap = width.saturating_sub(left.len() + right.len()).max(1);
        rows.push(format!("{}{}{}", left, " ".repeat(gap), right));
        rows
    }
}

/// Fetch statistics for COG input; other inputs have nothing to preview
pub fn fetch_preview_statistics(
    api: &dyn VisualizationApi,
    props: &DetectedProperties,
) -> ApiResult<Option<BandStatistics>> {
    if !props.is_cog || props.is_cmr {
        return Ok(None);
    }
    let Some(url) = props.data_url.as_deref() else {
        return Ok(None);
    };
    debug!("Fetching preview statistics for {}", url);
    api.cog_statistics(url).map(Some)
}
