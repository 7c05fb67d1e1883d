#[allow(dead_code)]
mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use ccdc_core::error::CcdcError;
use ccdc_core::extract::{extract, extract_batch, SampledPixel};
use ccdc_core::model::Sample;
use ccdc_core::pipeline::config::SelectionPolicy;
use ccdc_core::unpack::AttrValue;

const ENDS: [i64; 3] = [1000, 2000, 3000];

#[test]
fn test_extract_merges_metadata_and_segment() {
    let model = common::build_model(&["red", "nir"], &ENDS);
    let sample = Sample::new(1500)
        .with_field("shot_num", "73480100100060726")
        .with_field("millis", "1500");

    let result = extract(&sample, &model, SelectionPolicy::default()).unwrap();
    assert_eq!(result.metadata, sample.metadata);
    assert_eq!(result.seg, Some(1));
    assert_eq!(result.nsegs, 3);
    assert!(!result.past_last_segment);
    assert_eq!(result.attributes.len(), 2 * 8 + 2 * 2 + 4);
    assert_eq!(result.attributes.get("tEnd"), Some(AttrValue::Int(2000)));
}

#[test]
fn test_extract_late_sample_uses_last_segment() {
    let model = common::build_model(&["red"], &ENDS);
    let result = extract(&Sample::new(5000), &model, SelectionPolicy::default()).unwrap();
    assert_eq!(result.seg, Some(2));
    assert!(result.past_last_segment);
    assert_eq!(result.attributes.get("tEnd"), Some(AttrValue::Int(3000)));
}

#[test]
fn test_extract_strict_unmatched_keeps_key_set() {
    let model = common::build_model(&["red", "nir"], &ENDS);
    let result = extract(
        &Sample::new(5000),
        &model,
        SelectionPolicy::FirstEndingAfterStrict,
    )
    .unwrap();
    assert_eq!(result.seg, None);
    assert_eq!(result.nsegs, 3);
    assert_eq!(result.attributes.len(), 2 * 8 + 2 * 2 + 4);
    assert_eq!(result.attributes.get("red_INTP"), Some(AttrValue::Missing));
}

#[test]
fn test_extract_empty_model_is_error() {
    let model = common::build_model(&["red"], &[]);
    let result = extract(&Sample::new(0), &model, SelectionPolicy::default());
    assert!(matches!(result, Err(CcdcError::EmptySegmentSeries)));
}

#[test]
fn test_extract_nsegs_counts_breaks() {
    let mut model = common::build_model(&["red"], &ENDS);
    model.t_break.pop();
    let result = extract(&Sample::new(100), &model, SelectionPolicy::default()).unwrap();
    assert_eq!(result.nsegs, 2);
}

fn pixels(n: usize) -> Vec<SampledPixel> {
    (0..n)
        .map(|row| {
            let millis = (row as i64 % 4) * 1000 + 500;
            SampledPixel {
                row,
                sample: Sample::new(millis).with_field("id", row.to_string()),
                model: common::build_model(&["red"], &ENDS),
            }
        })
        .collect()
}

#[test]
fn test_batch_preserves_order() {
    let input = pixels(700);
    let batch = extract_batch(&input, SelectionPolicy::default(), None);
    assert!(batch.failures.is_empty());
    assert_eq!(batch.results.len(), 700);
    for (i, (row, result)) in batch.results.iter().enumerate() {
        assert_eq!(*row, i);
        assert_eq!(result.metadata[0].1, i.to_string());
        let expected_seg = (i % 4).min(2);
        assert_eq!(result.seg, Some(expected_seg), "row {i}");
    }
}

#[test]
fn test_batch_isolates_failures() {
    let mut input = pixels(10);
    input[3].model = common::build_model(&["red"], &[]);
    input[7].model.bands[0].magnitude.clear();

    let batch = extract_batch(&input, SelectionPolicy::default(), None);
    assert_eq!(batch.results.len(), 8);
    let failed: Vec<usize> = batch.failures.iter().map(|f| f.row).collect();
    assert_eq!(failed, vec![3, 7]);
    assert!(matches!(
        batch.failures[0].error,
        CcdcError::EmptySegmentSeries
    ));
    assert!(matches!(
        batch.failures[1].error,
        CcdcError::IndexOutOfRange { .. }
    ));
}

#[test]
fn test_batch_reports_progress() {
    let input = pixels(5000);
    let last = AtomicUsize::new(0);
    let calls = AtomicUsize::new(0);
    let progress = |done: usize| {
        last.store(done, Ordering::SeqCst);
        calls.fetch_add(1, Ordering::SeqCst);
    };
    extract_batch(&input, SelectionPolicy::default(), Some(&progress as &dyn Fn(usize)));
    assert_eq!(last.load(Ordering::SeqCst), 5000);
    assert!(calls.load(Ordering::SeqCst) >= 2);
}

#[test]
fn test_batch_empty_input() {
    let batch = extract_batch(&[], SelectionPolicy::default(), None);
    assert!(batch.results.is_empty());
    assert!(batch.failures.is_empty());
}
