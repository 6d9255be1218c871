//! Segment frame selection tests

use burst_plan::frame::{select_frames, FrameRecord};

fn frame(detector: &str, start: f64, duration: f64) -> FrameRecord {
    FrameRecord::new(detector, format!("/d/{detector}-{start}-{duration}.gwf"), start, duration)
        .unwrap()
}

#[test]
fn test_partial_overlap_with_padding_is_kept() {
    // lo = 92, hi = 208
    let frames = vec![frame("H1", 85.0, 10.0), frame("H1", 50.0, 10.0)];
    let kept = select_frames(&frames, 100.0, 200.0, 8.0);
    assert_eq!(kept, vec![frame("H1", 85.0, 10.0)]);
}

#[test]
fn test_frame_ending_before_padding_is_excluded() {
    let frames = vec![frame("H1", 50.0, 10.0)];
    assert!(select_frames(&frames, 100.0, 200.0, 8.0).is_empty());
}

#[test]
fn test_frame_in_trailing_padding_is_kept() {
    let frames = vec![frame("H1", 205.0, 10.0), frame("H1", 208.0, 10.0)];
    let kept = select_frames(&frames, 100.0, 200.0, 8.0);
    assert_eq!(kept, vec![frame("H1", 205.0, 10.0)]);
}

#[test]
fn test_frame_covering_whole_segment_is_kept() {
    let frames = vec![frame("L1", 0.0, 4096.0)];
    assert_eq!(select_frames(&frames, 100.0, 200.0, 8.0).len(), 1);
}

#[test]
fn test_empty_input_returns_empty() {
    assert!(select_frames(&[], 100.0, 200.0, 8.0).is_empty());
}

#[test]
fn test_input_not_mutated_and_order_kept() {
    let frames = vec![
        frame("H1", 190.0, 16.0),
        frame("H1", 90.0, 16.0),
        frame("H1", 500.0, 16.0),
        frame("H1", 140.0, 16.0),
    ];
    let before = frames.clone();
    let kept = select_frames(&frames, 100.0, 200.0, 8.0);
    assert_eq!(frames, before);
    assert_eq!(
        kept,
        vec![frame("H1", 190.0, 16.0), frame("H1", 90.0, 16.0), frame("H1", 140.0, 16.0)]
    );
}

#[test]
fn test_per_detector_results_concatenate() {
    let h1 = vec![frame("H1", 96.0, 64.0), frame("H1", 160.0, 64.0)];
    let l1 = vec![frame("L1", 96.0, 128.0)];

    let mut segment_frames = select_frames(&h1, 100.0, 200.0, 8.0);
    segment_frames.extend(select_frames(&l1, 100.0, 200.0, 8.0));

    let detectors: Vec<&str> = segment_frames.iter().map(FrameRecord::detector_id).collect();
    assert_eq!(detectors, vec!["H1", "H1", "L1"]);
}
