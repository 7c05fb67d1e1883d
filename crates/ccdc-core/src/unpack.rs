use std::fmt;

use crate::consts::{
    HARMONIC_TERMS, HARMONIC_TERM_COUNT, MAGNITUDE_SUFFIX, NUM_OBS_FIELD, RMSE_SUFFIX,
    T_BREAK_FIELD, T_END_FIELD, T_START_FIELD,
};
use crate::error::{CcdcError, Result};
use crate::model::SegmentedPixelModel;

/// A scalar taken from one segment of a pixel model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    /// No segment was selected for the sample.
    Missing,
}

impl AttrValue {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(v) => Some(v as f64),
            Self::Float(v) => Some(v),
            Self::Missing => None,
        }
    }

    /// Render for tabular output. `precision` fixes the decimals of floats.
    pub fn format(&self, precision: Option<usize>) -> String {
        match (*self, precision) {
            (Self::Float(v), Some(p)) if v.is_finite() => format!("{v:.p$}"),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Missing => Ok(()),
        }
    }
}

/// Flat, ordered `name -> value` mapping for one segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentAttributes {
    entries: Vec<(String, AttrValue)>,
}

impl SegmentAttributes {
    pub fn get(&self, key: &str) -> Option<AttrValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    fn push(&mut self, key: String, value: AttrValue) {
        self.entries.push((key, value));
    }
}

/// Attribute names produced for a band set, in output order: for each band
/// its harmonic terms, magnitude and rmse, then the pixel-wide series.
pub fn attribute_keys<S: AsRef<str>>(bands: &[S]) -> Vec<String> {
    let mut keys = Vec::with_capacity(bands.len() * (HARMONIC_TERM_COUNT + 2) + 4);
    for band in bands {
        let band = band.as_ref();
        keys.extend(HARMONIC_TERMS.iter().map(|term| format!("{band}_{term}")));
        keys.push(format!("{band}{MAGNITUDE_SUFFIX}"));
        keys.push(format!("{band}{RMSE_SUFFIX}"));
    }
    keys.extend(
        [NUM_OBS_FIELD, T_BREAK_FIELD, T_END_FIELD, T_START_FIELD].map(String::from),
    );
    keys
}

/// Attributes for a sample with no selected segment. Same keys as [`unpack`].
pub fn missing_attributes<S: AsRef<str>>(bands: &[S]) -> SegmentAttributes {
    SegmentAttributes {
        entries: attribute_keys(bands)
            .into_iter()
            .map(|k| (k, AttrValue::Missing))
            .collect(),
    }
}

/// Flatten segment `seg` of `model` into named scalars.
///
/// Fails with [`CcdcError::IndexOutOfRange`] if any series is too short for
/// `seg`, rather than substituting a value.
pub fn unpack(model: &SegmentedPixelModel, seg: usize) -> Result<SegmentAttributes> {
    let mut attrs = SegmentAttributes {
        entries: Vec::with_capacity(model.bands.len() * (HARMONIC_TERM_COUNT + 2) + 4),
    };

    for band in &model.bands {
        let (rows, cols) = band.coefs.dim();
        if seg >= rows {
            return Err(CcdcError::IndexOutOfRange {
                series: format!("{}_coefs", band.name),
                index: seg,
                len: rows,
            });
        }
        if cols != HARMONIC_TERM_COUNT {
            return Err(CcdcError::MalformedModel(format!(
                "{}_coefs has {cols} terms per segment, expected {HARMONIC_TERM_COUNT}",
                band.name
            )));
        }
        for (i, term) in HARMONIC_TERMS.iter().enumerate() {
            attrs.push(
                format!("{}_{term}", band.name),
                AttrValue::Float(band.coefs[[seg, i]]),
            );
        }
        let magnitude_key = format!("{}{MAGNITUDE_SUFFIX}", band.name);
        let magnitude = at(&band.magnitude, seg, &magnitude_key)?;
        attrs.push(magnitude_key, AttrValue::Float(magnitude));

        let rmse_key = format!("{}{RMSE_SUFFIX}", band.name);
        let rmse = at(&band.rmse, seg, &rmse_key)?;
        attrs.push(rmse_key, AttrValue::Float(rmse));
    }

    for (name, series) in [
        (NUM_OBS_FIELD, &model.num_obs),
        (T_BREAK_FIELD, &model.t_break),
        (T_END_FIELD, &model.t_end),
        (T_START_FIELD, &model.t_start),
    ] {
        attrs.push(name.to_string(), AttrValue::Int(at(series, seg, name)?));
    }

    Ok(attrs)
}

fn at<T: Copy>(series: &[T], index: usize, name: &str) -> Result<T> {
    series
        .get(index)
        .copied()
        .ok_or_else(|| CcdcError::IndexOutOfRange {
            series: name.to_string(),
            index,
            len: series.len(),
        })
}
