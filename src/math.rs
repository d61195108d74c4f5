//! Mathematical structs and functions.

use cgmath::prelude::*;
use cgmath::{Point3, Vector3};
pub use bezier::QuadraticBezier3d;
pub use curve::{polyline_length, sample_evenly, ParametricCurve3d};

mod bezier;
mod curve;

/// A 3D point
pub type Point3d = Point3<f64>;

/// A 3D vector
pub type Vector3d = Vector3<f64>;

/// Multiplies every coordinate of a point by `factor`.
pub fn scale_point(point: Point3d, factor: f64) -> Point3d {
    Point3d::from_vec(point.to_vec() * factor)
}
