use ndarray::Array2;

use crate::consts::{
    HARMONIC_TERM_COUNT, NUM_OBS_FIELD, T_BREAK_FIELD, T_END_FIELD, T_START_FIELD,
};
use crate::error::{CcdcError, Result};

/// One band's per-segment harmonic fit.
#[derive(Clone, Debug)]
pub struct BandModel {
    pub name: String,
    /// Harmonic coefficients, shape = (segments, HARMONIC_TERM_COUNT)
    pub coefs: Array2<f64>,
    pub magnitude: Vec<f64>,
    pub rmse: Vec<f64>,
}

impl BandModel {
    pub fn new(name: impl Into<String>, coefs: Array2<f64>, magnitude: Vec<f64>, rmse: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            coefs,
            magnitude,
            rmse,
        }
    }
}

/// Temporal segmentation of a single pixel as produced by the change-detection fit.
///
/// Every series is indexed by segment. Timestamps are milliseconds since the
/// Unix epoch. Segments are ordered by `t_start`.
#[derive(Clone, Debug, Default)]
pub struct SegmentedPixelModel {
    pub t_start: Vec<i64>,
    pub t_end: Vec<i64>,
    pub t_break: Vec<i64>,
    pub num_obs: Vec<i64>,
    pub bands: Vec<BandModel>,
}

impl SegmentedPixelModel {
    /// Number of segments reported for the pixel (length of `tBreak`).
    pub fn nsegs(&self) -> usize {
        self.t_break.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t_end.is_empty()
    }

    pub fn band(&self, name: &str) -> Option<&BandModel> {
        self.bands.iter().find(|b| b.name == name)
    }

    pub fn band_names(&self) -> impl Iterator<Item = &str> {
        self.bands.iter().map(|b| b.name.as_str())
    }

    /// Check that every series has the same segment count and that segment
    /// dates are ordered.
    pub fn validate(&self) -> Result<()> {
        let n = self.t_end.len();
        let pixel_series = [
            (T_START_FIELD, self.t_start.len()),
            (T_BREAK_FIELD, self.t_break.len()),
            (NUM_OBS_FIELD, self.num_obs.len()),
        ];
        for (name, len) in pixel_series {
            if len != n {
                return Err(CcdcError::MalformedModel(format!(
                    "{name} has {len} segments, {T_END_FIELD} has {n}"
                )));
            }
        }

        for band in &self.bands {
            let (rows, cols) = band.coefs.dim();
            if rows != n {
                return Err(CcdcError::MalformedModel(format!(
                    "{}_coefs has {rows} segments, {T_END_FIELD} has {n}",
                    band.name
                )));
            }
            if cols != HARMONIC_TERM_COUNT {
                return Err(CcdcError::MalformedModel(format!(
                    "{}_coefs has {cols} terms per segment, expected {HARMONIC_TERM_COUNT}",
                    band.name
                )));
            }
            if band.magnitude.len() != n || band.rmse.len() != n {
                return Err(CcdcError::MalformedModel(format!(
                    "{} magnitude/rmse lengths {}/{} do not match {n} segments",
                    band.name,
                    band.magnitude.len(),
                    band.rmse.len()
                )));
            }
        }

        for (i, (start, end)) in self.t_start.iter().zip(&self.t_end).enumerate() {
            if start > end {
                return Err(CcdcError::MalformedModel(format!(
                    "segment {i} starts at {start} after it ends at {end}"
                )));
            }
        }
        if self.t_start.windows(2).any(|w| w[0] > w[1]) {
            return Err(CcdcError::MalformedModel(
                "segments are not ordered by start date".into(),
            ));
        }

        Ok(())
    }
}

/// A point-in-time query against a pixel model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sample {
    /// Query date, milliseconds since the Unix epoch.
    pub millis: i64,
    /// Pass-through fields in input order, written verbatim to the output.
    pub metadata: Vec<(String, String)>,
}

impl Sample {
    pub fn new(millis: i64) -> Self {
        Self {
            millis,
            metadata: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((name.into(), value.into()));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
