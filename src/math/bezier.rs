use cgmath::prelude::*;
use crate::util::Interval;
use super::Point3d;
use super::curve::ParametricCurve3d;

/// A quadratic bezier curve
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadraticBezier3d {
    points: [Point3d; 3]
}

impl QuadraticBezier3d {
    pub const fn new(points: &[Point3d; 3]) -> Self {
        Self { points: *points }
    }

    /// The three control points.
    pub fn points(&self) -> &[Point3d; 3] {
        &self.points
    }
}

impl ParametricCurve3d for QuadraticBezier3d {
    fn sample(&self, t: f64) -> Point3d {
        let t1 = 1.0 - t;
        Point3d::from_vec(t1 * t1 * self.points[0].to_vec()
            + 2.0 * t1 * t * self.points[1].to_vec()
            + t * t * self.points[2].to_vec())
    }

    fn bounds(&self) -> Interval<f64> {
        Interval { min: 0.0, max: 1.0 }
    }
}
