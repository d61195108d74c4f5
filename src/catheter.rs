//! Catheter poses described by three control points.

use crate::math::{scale_point, Point3d, QuadraticBezier3d};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Factor converting pose coordinates into rendering space.
pub const RENDER_SCALE: f64 = 10.0;

/// A type holding the three catheter control points A, B and C.
pub trait ControlPoints {
    /// The control points in order A, B, C.
    fn points(&self) -> [Point3d; 3];

    /// The control points multiplied by [RENDER_SCALE].
    fn scaled_points(&self) -> [Point3d; 3] {
        self.points().map(|p| scale_point(p, RENDER_SCALE))
    }
}

/// The true shape of the catheter.
///
/// `a` is the proximal control point, `b` the mid control point and `c` the distal tip.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatheterPose {
    a: Point3d,
    b: Point3d,
    c: Point3d,
}

/// A catheter pose as seen by a noisy sensor.
///
/// Structurally the same as [CatheterPose], but kept as its own type so measured
/// and true poses cannot be mixed up.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasuredPose {
    a: Point3d,
    b: Point3d,
    c: Point3d,
}

impl CatheterPose {
    /// Creates a pose from its proximal, mid and distal control points.
    pub const fn new(a: Point3d, b: Point3d, c: Point3d) -> Self {
        Self { a, b, c }
    }

    /// The proximal control point.
    pub fn a(&self) -> Point3d {
        self.a
    }

    /// The mid control point.
    pub fn b(&self) -> Point3d {
        self.b
    }

    /// The distal control point.
    pub fn c(&self) -> Point3d {
        self.c
    }

    /// The quadratic bezier spline with A, B and C as its control points.
    pub fn spline(&self) -> QuadraticBezier3d {
        QuadraticBezier3d::new(&[self.a, self.b, self.c])
    }
}

impl MeasuredPose {
    /// Creates a measurement from its proximal, mid and distal control points.
    pub const fn new(a: Point3d, b: Point3d, c: Point3d) -> Self {
        Self { a, b, c }
    }

    /// The measured proximal control point.
    pub fn a(&self) -> Point3d {
        self.a
    }

    /// The measured mid control point.
    pub fn b(&self) -> Point3d {
        self.b
    }

    /// The measured distal control point.
    pub fn c(&self) -> Point3d {
        self.c
    }
}

impl ControlPoints for CatheterPose {
    fn points(&self) -> [Point3d; 3] {
        [self.a, self.b, self.c]
    }
}

impl ControlPoints for MeasuredPose {
    fn points(&self) -> [Point3d; 3] {
        [self.a, self.b, self.c]
    }
}

/// Reinterprets a measurement as a pose, mapping A to A, B to B and C to C.
impl From<MeasuredPose> for CatheterPose {
    fn from(measured: MeasuredPose) -> Self {
        let [a, b, c] = measured.points();
        CatheterPose::new(a, b, c)
    }
}

impl Display for CatheterPose {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.points();
        write!(
            f,
            "A: ({:.6}, {:.6}, {:.6}) B: ({:.6}, {:.6}, {:.6}) C: ({:.6}, {:.6}, {:.6})",
            a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z
        )
    }
}
