use cgmath::prelude::*;
use itertools::Itertools;
use crate::util::Interval;
use super::Point3d;

/// A parametric curve in 3D space.
pub trait ParametricCurve3d {
    /// Samples the parametric curve.
    fn sample(&self, t: f64) -> Point3d;

    /// Returns the minimum and maximum t-values that define the bounds of the curve.
    fn bounds(&self) -> Interval<f64>;
}

impl<T: ParametricCurve3d + ?Sized> ParametricCurve3d for &T {
    fn sample(&self, t: f64) -> Point3d {
        (**self).sample(t)
    }

    fn bounds(&self) -> Interval<f64> {
        (**self).bounds()
    }
}

/// Samples `count` points at evenly spaced t-values spanning the curve's bounds,
/// including both end points.
///
/// The i-th t-value is computed from its index rather than by accumulating a step,
/// so the last sample lands exactly on the end of the curve.
pub fn sample_evenly<C: ParametricCurve3d>(
    curve: &C,
    count: usize,
) -> impl Iterator<Item = Point3d> + '_ {
    let bounds = curve.bounds();
    let last = count.saturating_sub(1).max(1) as f64;
    (0..count).map(move |i| curve.sample(bounds.lerp(i as f64 / last)))
}

/// Computes the total length of the polyline through `points`.
pub fn polyline_length(points: &[Point3d]) -> f64 {
    points
        .iter()
        .tuple_windows()
        .map(|(a, b)| a.distance(*b))
        .sum()
}
