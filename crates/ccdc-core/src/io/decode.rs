use ndarray::Array2;
use serde_json::Value;

use crate::consts::{
    CHANGE_PROB_FIELD, COEFS_SUFFIX, HARMONIC_TERM_COUNT, MAGNITUDE_SUFFIX, NUM_OBS_FIELD,
    RMSE_SUFFIX, T_BREAK_FIELD, T_END_FIELD, T_START_FIELD,
};
use crate::error::{CcdcError, Result};
use crate::extract::SampledPixel;
use crate::model::{BandModel, Sample, SegmentedPixelModel};
use crate::pipeline::config::ModelLayout;

use super::table::RawRecord;

/// Whether `name` is part of a pixel model rather than sample metadata.
pub fn is_model_field(name: &str) -> bool {
    let pixel_series = [
        T_START_FIELD,
        T_END_FIELD,
        T_BREAK_FIELD,
        NUM_OBS_FIELD,
        CHANGE_PROB_FIELD,
    ];
    pixel_series.contains(&name)
        || name.ends_with(COEFS_SUFFIX)
        || name.ends_with(MAGNITUDE_SUFFIX)
        || name.ends_with(RMSE_SUFFIX)
}

/// Band prefixes present in a table, from its `<band>_coefs` fields.
pub fn discover_bands<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    names
        .into_iter()
        .filter_map(|n| n.strip_suffix(COEFS_SUFFIX))
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect()
}

/// Model fields the layout requires that are absent from `names`.
pub fn missing_fields<'a>(layout: &ModelLayout, names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let names: Vec<&str> = names.into_iter().collect();
    required_fields(layout)
        .into_iter()
        .filter(|f| !names.contains(&f.as_str()))
        .collect()
}

fn required_fields(layout: &ModelLayout) -> Vec<String> {
    let mut fields = vec![layout.millis_field.clone()];
    fields.extend([T_START_FIELD, T_END_FIELD, T_BREAK_FIELD, NUM_OBS_FIELD].map(String::from));
    for band in &layout.bands {
        fields.push(format!("{band}{COEFS_SUFFIX}"));
        fields.push(format!("{band}{MAGNITUDE_SUFFIX}"));
        fields.push(format!("{band}{RMSE_SUFFIX}"));
    }
    if let Some(meta) = &layout.metadata_fields {
        fields.extend(meta.iter().cloned());
    }
    fields
}

/// Decode one table row into a sample and its pixel model.
///
/// Empty or null model cells decode as zero-length series, so a fully masked
/// pixel surfaces as an empty model rather than a parse error.
pub fn decode_record(record: &RawRecord, layout: &ModelLayout) -> Result<SampledPixel> {
    let millis = parse_i64(field(record, &layout.millis_field)?, &layout.millis_field)?;

    let metadata = match &layout.metadata_fields {
        Some(names) => names
            .iter()
            .map(|name| Ok((name.clone(), metadata_text(field(record, name)?))))
            .collect::<Result<Vec<_>>>()?,
        None => record
            .fields
            .iter()
            .filter(|(name, _)| !is_model_field(name))
            .map(|(name, value)| (name.clone(), metadata_text(value)))
            .collect(),
    };

    let bands = layout
        .bands
        .iter()
        .map(|band| {
            let coefs_name = format!("{band}{COEFS_SUFFIX}");
            let magnitude_name = format!("{band}{MAGNITUDE_SUFFIX}");
            let rmse_name = format!("{band}{RMSE_SUFFIX}");
            Ok(BandModel::new(
                band.as_str(),
                coef_matrix(field(record, &coefs_name)?, &coefs_name)?,
                float_series(field(record, &magnitude_name)?, &magnitude_name)?,
                float_series(field(record, &rmse_name)?, &rmse_name)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let model = SegmentedPixelModel {
        t_start: int_series(field(record, T_START_FIELD)?, T_START_FIELD)?,
        t_end: int_series(field(record, T_END_FIELD)?, T_END_FIELD)?,
        t_break: int_series(field(record, T_BREAK_FIELD)?, T_BREAK_FIELD)?,
        num_obs: int_series(field(record, NUM_OBS_FIELD)?, NUM_OBS_FIELD)?,
        bands,
    };

    Ok(SampledPixel {
        row: record.row,
        sample: Sample { millis, metadata },
        model,
    })
}

fn field<'a>(record: &'a RawRecord, name: &str) -> Result<&'a Value> {
    record
        .get(name)
        .ok_or_else(|| CcdcError::MissingField(name.to_string()))
}

fn metadata_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> CcdcError {
    CcdcError::InvalidField {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Integer from a JSON number or numeric text. Integral floats such as
/// `1.5617376E12` are accepted.
fn parse_i64(value: &Value, name: &str) -> Result<i64> {
    let number = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            n.as_f64()
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(i);
            }
            s.parse::<f64>().ok()
        }
        _ => None,
    };
    match number {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(invalid(name, format!("expected an integer, got {value}"))),
    }
}

fn parse_f64(value: &Value, name: &str) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| invalid(name, format!("unrepresentable number {n}"))),
        Value::Null => Ok(f64::NAN),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(name, format!("expected a number, got '{s}'"))),
        other => Err(invalid(name, format!("expected a number, got {other}"))),
    }
}

/// Array elements from a native JSON array or a JSON-text cell.
fn array_items(value: &Value, name: &str) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items.clone()),
        Value::Null => Ok(Vec::new()),
        Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(other) => Err(invalid(name, format!("expected an array, got {other}"))),
            Err(e) => Err(invalid(name, e.to_string())),
        },
        other => Err(invalid(name, format!("expected an array, got {other}"))),
    }
}

fn int_series(value: &Value, name: &str) -> Result<Vec<i64>> {
    array_items(value, name)?
        .iter()
        .map(|v| parse_i64(v, name))
        .collect()
}

fn float_series(value: &Value, name: &str) -> Result<Vec<f64>> {
    array_items(value, name)?
        .iter()
        .map(|v| parse_f64(v, name))
        .collect()
}

/// Segment-by-term coefficient matrix from a nested array.
fn coef_matrix(value: &Value, name: &str) -> Result<Array2<f64>> {
    let rows = array_items(value, name)?;
    if rows.is_empty() {
        return Ok(Array2::zeros((0, HARMONIC_TERM_COUNT)));
    }

    let mut width = None;
    let mut flat = Vec::with_capacity(rows.len() * HARMONIC_TERM_COUNT);
    for (i, row) in rows.iter().enumerate() {
        let terms = float_series(row, name)?;
        match width {
            None => width = Some(terms.len()),
            Some(w) if w != terms.len() => {
                return Err(CcdcError::MalformedModel(format!(
                    "{name} segment {i} has {} terms, segment 0 has {w}",
                    terms.len()
                )))
            }
            Some(_) => {}
        }
        flat.extend(terms);
    }

    let cols = width.unwrap_or(HARMONIC_TERM_COUNT);
    Array2::from_shape_vec((rows.len(), cols), flat)
        .map_err(|e| CcdcError::MalformedModel(format!("{name}: {e}")))
}
