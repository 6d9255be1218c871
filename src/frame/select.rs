//! Frame selection for one analysis segment

use tracing::debug;

use super::FrameRecord;

/// Frames overlapping `[segment_start - edge, segment_stop + edge)`.
///
/// Frames that only touch the padding are kept so that windowed processing
/// has real data at the segment boundaries. Input order is preserved and an
/// empty result is not an error.
///
/// # Examples
///
/// ```rust
/// use burst_plan::frame::{select_frames, FrameRecord};
///
/// let frames = vec![
///     FrameRecord::new("H1", "a.gwf", 50.0, 10.0)?,
///     FrameRecord::new("H1", "b.gwf", 85.0, 10.0)?,
/// ];
/// let kept = select_frames(&frames, 100.0, 200.0, 8.0);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].path(), "b.gwf");
/// # Ok::<(), burst_plan::ValidationError>(())
/// ```
#[must_use]
pub fn select_frames(
    frames: &[FrameRecord],
    segment_start: f64,
    segment_stop: f64,
    edge: f64,
) -> Vec<FrameRecord> {
    let lo = segment_start - edge;
    let hi = segment_stop + edge;

    let selected: Vec<FrameRecord> = frames
        .iter()
        .filter(|frame| frame.overlaps(lo, hi))
        .cloned()
        .collect();

    debug!(
        lo,
        hi,
        candidates = frames.len(),
        selected = selected.len(),
        "Selected frames for segment"
    );
    selected
}
