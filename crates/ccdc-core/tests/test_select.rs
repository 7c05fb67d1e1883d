#[allow(dead_code)]
mod common;

use ccdc_core::error::CcdcError;
use ccdc_core::pipeline::config::SelectionPolicy;
use ccdc_core::select::{
    first_ending_after, intersecting_segment, is_past_last_segment, select_segment,
};

const ENDS: [i64; 3] = [1000, 2000, 3000];

#[test]
fn test_select_inside_second_segment() {
    assert_eq!(select_segment(&ENDS, 1500).unwrap(), 1);
}

#[test]
fn test_select_before_first_end() {
    assert_eq!(select_segment(&ENDS, 500).unwrap(), 0);
}

#[test]
fn test_select_after_last_end_uses_last_segment() {
    assert_eq!(select_segment(&ENDS, 5000).unwrap(), 2);
}

#[test]
fn test_select_on_end_date_moves_to_next_segment() {
    // tEnd must be strictly greater than the date.
    assert_eq!(select_segment(&ENDS, 1000).unwrap(), 1);
    assert_eq!(select_segment(&ENDS, 3000).unwrap(), 2);
}

#[test]
fn test_select_single_segment() {
    assert_eq!(select_segment(&[42], i64::MIN).unwrap(), 0);
    assert_eq!(select_segment(&[42], i64::MAX).unwrap(), 0);
}

#[test]
fn test_select_empty_is_error() {
    let result = select_segment(&[], 1000);
    assert!(matches!(result, Err(CcdcError::EmptySegmentSeries)));
}

#[test]
fn test_select_index_always_in_range() {
    let ends = [10, 250, 250, 900, 4000];
    for millis in (-100..5000).step_by(7) {
        let seg = select_segment(&ends, millis).unwrap();
        assert!(seg < ends.len(), "millis {millis} gave {seg}");
    }
}

#[test]
fn test_select_monotonic_in_date() {
    let ends = [10, 250, 250, 900, 4000];
    let mut previous = 0;
    for millis in -100..5000 {
        let seg = select_segment(&ends, millis).unwrap();
        assert!(seg >= previous, "index decreased at {millis}");
        previous = seg;
    }
}

#[test]
fn test_first_ending_after_none_past_end() {
    assert_eq!(first_ending_after(&ENDS, 1500), Some(1));
    assert_eq!(first_ending_after(&ENDS, 3000), None);
    assert_eq!(first_ending_after(&[], 0), None);
}

#[test]
fn test_intersecting_inside_and_in_break() {
    let starts = [0, 1100, 2100];
    assert_eq!(intersecting_segment(&starts, &ENDS, 1500).unwrap(), Some(1));
    // Both bounds are inclusive.
    assert_eq!(intersecting_segment(&starts, &ENDS, 1100).unwrap(), Some(1));
    assert_eq!(intersecting_segment(&starts, &ENDS, 2000).unwrap(), Some(1));
    // Between segment 0 end and segment 1 start.
    assert_eq!(intersecting_segment(&starts, &ENDS, 1050).unwrap(), None);
    assert_eq!(intersecting_segment(&starts, &ENDS, 3001).unwrap(), None);
}

#[test]
fn test_intersecting_length_mismatch() {
    let result = intersecting_segment(&[0, 1100], &ENDS, 1500);
    assert!(matches!(result, Err(CcdcError::MalformedModel(_))));
}

#[test]
fn test_past_last_segment() {
    assert!(is_past_last_segment(&ENDS, 3000));
    assert!(is_past_last_segment(&ENDS, 5000));
    assert!(!is_past_last_segment(&ENDS, 2999));
    assert!(!is_past_last_segment(&[], 0));
}

#[test]
fn test_policy_default_matches_select_segment() {
    let model = common::build_model(&["red"], &ENDS);
    for millis in [500, 1500, 3000, 5000] {
        let expected = select_segment(&ENDS, millis).unwrap();
        let got = SelectionPolicy::FirstEndingAfter.select(&model, millis).unwrap();
        assert_eq!(got, Some(expected));
    }
}

#[test]
fn test_policy_strict_has_no_override() {
    let model = common::build_model(&["red"], &ENDS);
    let policy = SelectionPolicy::FirstEndingAfterStrict;
    assert_eq!(policy.select(&model, 1500).unwrap(), Some(1));
    assert_eq!(policy.select(&model, 5000).unwrap(), None);
}

#[test]
fn test_policy_intersecting_break_has_no_segment() {
    // Segment 1 starts at 1100, so 1050 lies in the break after segment 0.
    let model = common::build_model(&["red"], &ENDS);
    let policy = SelectionPolicy::Intersecting;
    assert_eq!(policy.select(&model, 1050).unwrap(), None);
    assert_eq!(policy.select(&model, 2500).unwrap(), Some(2));
}

#[test]
fn test_policy_empty_model_is_error_for_every_policy() {
    let model = common::build_model(&["red"], &[]);
    for policy in [
        SelectionPolicy::FirstEndingAfter,
        SelectionPolicy::FirstEndingAfterStrict,
        SelectionPolicy::Intersecting,
    ] {
        let result = policy.select(&model, 0);
        assert!(
            matches!(result, Err(CcdcError::EmptySegmentSeries)),
            "{policy} accepted an empty model"
        );
    }
}
