use crate::configuration::system_segment::SystemSegment;
use crate::error::{PlannerError, Result};

pub const USER_SEGMENT_LABEL: &str = "User Software";

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub label: String,
    pub size_gb: f64,
}

impl Segment {
    pub fn new<S: Into<String>>(label: S, size_gb: f64) -> Self {
        Self {
            label: label.into(),
            size_gb,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SegmentLayout {
    pub label: String,
    pub offset_percent: f64,
    pub width_percent: f64,
}

impl SegmentLayout {
    pub fn is_empty(&self) -> bool {
        self.width_percent <= 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    Square,
    Rounded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentShape {
    pub left: Corner,
    pub right: Corner,
}

/// The segments of the storage bar: the system segments in data order,
/// followed by the space taken by the selected software.
pub fn storage_segments(system: &[SystemSegment], user_gb: f64) -> Vec<Segment> {
    let mut segments: Vec<Segment> = system
        .iter()
        .map(|s| Segment::new(s.label.clone(), s.size.to_canonical()))
        .collect();
    segments.push(Segment::new(USER_SEGMENT_LABEL, user_gb));

    segments
}

/// Stacks the segments left to right and expresses offset and width as
/// percent of the capacity. Values are not clamped, an over-full bar sums
/// past 100.
pub fn layout(capacity_gb: f64, segments: &[Segment]) -> Result<Vec<SegmentLayout>> {
    if !capacity_gb.is_finite() || capacity_gb <= 0.0 {
        return Err(PlannerError::InvalidCapacity(capacity_gb));
    }

    let mut preceding_gb = 0.0;
    let mut layouts = Vec::with_capacity(segments.len());
    for segment in segments {
        layouts.push(SegmentLayout {
            label: segment.label.clone(),
            offset_percent: preceding_gb / capacity_gb * 100.0,
            width_percent: segment.size_gb / capacity_gb * 100.0,
        });
        preceding_gb += segment.size_gb;
    }

    Ok(layouts)
}

/// Rounds the outer edges of the bar: the first non-empty segment on the
/// left, the last non-empty segment on the right. Empty segments stay square.
pub fn corners(layouts: &[SegmentLayout]) -> Vec<SegmentShape> {
    let first = layouts.iter().position(|l| !l.is_empty());
    let last = layouts.iter().rposition(|l| !l.is_empty());

    layouts
        .iter()
        .enumerate()
        .map(|(index, _)| SegmentShape {
            left: if Some(index) == first {
                Corner::Rounded
            } else {
                Corner::Square
            },
            right: if Some(index) == last {
                Corner::Rounded
            } else {
                Corner::Square
            },
        })
        .collect()
}
