//! The data published for each simulation tick.

use crate::catheter::{ControlPoints, MeasuredPose};
use crate::math::Point3d;
use serde::{Deserialize, Serialize};

/// The coordinate frame that published data is expressed in by default.
pub const DEFAULT_FRAME_ID: &str = "catheter_base";

/// A single sample along a rendered [Path].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathSample {
    /// The index of the sample along the path.
    pub seq: usize,
    /// The sample's position in rendering space.
    pub position: Point3d,
}

/// The rendered catheter as an ordered sequence of samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub frame_id: String,
    pub poses: Vec<PathSample>,
}

/// The three control points of a pose, scaled into rendering space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    pub frame_id: String,
    pub points: [Point3d; 3],
}

impl PointCloud {
    /// Projects a pose's control points into rendering space.
    pub fn from_pose(pose: &impl ControlPoints, frame_id: &str) -> Self {
        Self {
            frame_id: frame_id.to_owned(),
            points: pose.scaled_points(),
        }
    }
}

/// Everything published for one tick of the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// The tick index, starting at 0.
    pub tick: usize,
    /// The drive current used for this tick, in amps.
    pub drive: f64,
    /// The rendered catheter curve.
    pub path: Path,
    /// The true control points.
    pub cloud: PointCloud,
    /// The noisy measurement, unscaled.
    pub measured: MeasuredPose,
    /// The noisy control points.
    pub measured_cloud: PointCloud,
}
