use crate::error::{CcdcError, Result};
use crate::model::SegmentedPixelModel;
use crate::pipeline::config::SelectionPolicy;

/// Index of the first segment whose end date is strictly after `millis`.
///
/// When every segment ends on or before `millis` the last segment is returned,
/// so samples dated after the final model end still get a row. Those rows may
/// describe a model that was never fitted on data at the sample's date.
pub fn select_segment(t_end: &[i64], millis: i64) -> Result<usize> {
    if t_end.is_empty() {
        return Err(CcdcError::EmptySegmentSeries);
    }
    Ok(first_ending_after(t_end, millis).unwrap_or(t_end.len() - 1))
}

/// Index of the first segment whose end date is strictly after `millis`, if any.
pub fn first_ending_after(t_end: &[i64], millis: i64) -> Option<usize> {
    t_end.iter().position(|&end| end > millis)
}

/// Index of the first segment with `t_start <= millis <= t_end`, if any.
pub fn intersecting_segment(t_start: &[i64], t_end: &[i64], millis: i64) -> Result<Option<usize>> {
    if t_start.len() != t_end.len() {
        return Err(CcdcError::MalformedModel(format!(
            "tStart has {} segments, tEnd has {}",
            t_start.len(),
            t_end.len()
        )));
    }
    Ok(t_start
        .iter()
        .zip(t_end)
        .position(|(&start, &end)| start <= millis && millis <= end))
}

/// Whether `millis` falls on or after the end of the last segment.
pub fn is_past_last_segment(t_end: &[i64], millis: i64) -> bool {
    t_end.last().is_some_and(|&end| millis >= end)
}

impl SelectionPolicy {
    /// Pick the segment applying at `millis` under this policy.
    ///
    /// `Ok(None)` means the policy found no segment for the date. Empty models
    /// are an error under every policy.
    pub fn select(&self, model: &SegmentedPixelModel, millis: i64) -> Result<Option<usize>> {
        if model.t_end.is_empty() {
            return Err(CcdcError::EmptySegmentSeries);
        }
        match self {
            Self::FirstEndingAfter => select_segment(&model.t_end, millis).map(Some),
            Self::FirstEndingAfterStrict => Ok(first_ending_after(&model.t_end, millis)),
            Self::Intersecting => intersecting_segment(&model.t_start, &model.t_end, millis),
        }
    }
}
