//! Rendering the catheter as a smooth curve.

use crate::catheter::{CatheterPose, RENDER_SCALE};
use crate::error::{Error, Result};
use crate::frame::{Path, PathSample};
use crate::math::{polyline_length, sample_evenly, scale_point, Point3d};
use serde::{Deserialize, Serialize};

/// The default number of samples along a rendered curve.
pub const DEFAULT_SEGMENT_COUNT: usize = 16;

/// Points sampled along the catheter's spline, in rendering space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderedCurve {
    points: Vec<Point3d>,
}

impl RenderedCurve {
    /// The sampled points, ordered from the proximal to the distal end.
    pub fn points(&self) -> &[Point3d] {
        &self.points
    }

    /// The number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The length of the polyline through the samples, in rendering units.
    pub fn length(&self) -> f64 {
        polyline_length(&self.points)
    }

    /// Converts the curve into a [Path] in the given coordinate frame,
    /// numbering each sample by its index.
    pub fn to_path(&self, frame_id: &str) -> Path {
        Path {
            frame_id: frame_id.to_owned(),
            poses: self
                .points
                .iter()
                .enumerate()
                .map(|(seq, &position)| PathSample { seq, position })
                .collect(),
        }
    }
}

/// Samples the pose's spline at `segment_count` evenly spaced parameters in [0, 1]
/// and scales the samples into rendering space.
///
/// The first sample is the scaled A control point and the last the scaled C control point.
/// Fails if `segment_count` is less than 2.
pub fn build_curve(pose: &CatheterPose, segment_count: usize) -> Result<RenderedCurve> {
    if segment_count < 2 {
        return Err(Error::InvalidSegmentCount(segment_count));
    }
    let spline = pose.spline();
    let points = sample_evenly(&spline, segment_count)
        .map(|p| scale_point(p, RENDER_SCALE))
        .collect();
    Ok(RenderedCurve { points })
}
