//! Synthesising noisy measurements of a catheter pose.

use crate::catheter::{CatheterPose, ControlPoints, MeasuredPose};
use crate::error::Result;
use crate::math::Point3d;
use crate::noise::IrwinHall;
use rand::distributions::Distribution;
use rand::Rng;

/// Adds independent noise to each of the 9 coordinates of `pose`.
///
/// Draws are taken in the order A.x, A.y, A.z, B.x, ..., C.z.
pub fn synthesize_with<R: Rng + ?Sized>(
    pose: &CatheterPose,
    noise: &IrwinHall,
    rng: &mut R,
) -> MeasuredPose {
    let [a, b, c] = pose.points();
    let mut perturb = |p: Point3d| {
        let x = p.x + noise.sample(rng);
        let y = p.y + noise.sample(rng);
        let z = p.z + noise.sample(rng);
        Point3d::new(x, y, z)
    };
    let a = perturb(a);
    let b = perturb(b);
    let c = perturb(c);
    MeasuredPose::new(a, b, c)
}

/// Like [synthesize_with], for the noise parameter `bound`.
///
/// Fails if `bound` is negative or not finite.
pub fn synthesize<R: Rng + ?Sized>(
    pose: &CatheterPose,
    bound: f64,
    rng: &mut R,
) -> Result<MeasuredPose> {
    Ok(synthesize_with(pose, &IrwinHall::new(bound)?, rng))
}
