//! Sources of catheter poses.

use crate::catheter::CatheterPose;
use crate::error::{Error, Result};
use crate::math::{Point3d, Vector3d};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Bend angles below this magnitude are treated as a straight catheter, in radians.
const STRAIGHT_EPSILON: f64 = 1e-9;

/// Produces a catheter pose for a given drive current.
pub trait PoseSource {
    /// Returns a fresh pose for the drive current `drive`, in amps.
    fn pose(&mut self, drive: f64) -> CatheterPose;
}

impl<T: PoseSource + ?Sized> PoseSource for &mut T {
    fn pose(&mut self, drive: f64) -> CatheterPose {
        (**self).pose(drive)
    }
}

/// The standard deviations of the noise applied to each particle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionErrors {
    /// Per-axis standard deviation of the mid control point.
    pub b: Vector3d,
    /// Standard deviation of the bend angle, in radians.
    pub bend: f64,
}

impl Default for MotionErrors {
    fn default() -> Self {
        Self {
            b: Vector3d::new(1e-7, 1e-7, 1e-7),
            bend: 1e-7,
        }
    }
}

/// The attributes of the catheter model driving a [ParticleFilter].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterAttributes {
    /// The arc length of the catheter.
    pub length: f64,
    /// Bend angle per unit of drive current, in rad/A.
    pub gain: f64,
    /// The largest bend angle the catheter can reach, in radians.
    pub max_bend: f64,
    /// The noise applied to each particle.
    pub motion_errors: MotionErrors,
}

impl Default for FilterAttributes {
    fn default() -> Self {
        Self {
            length: 1.0,
            gain: 0.1,
            max_bend: PI - 0.01,
            motion_errors: MotionErrors::default(),
        }
    }
}

/// A minimal particle filter that samples catheter poses around a
/// constant-curvature bending model.
///
/// The catheter starts at the origin heading along +z and bends in the x-z plane
/// by an angle proportional to the drive current. C is the end of the arc and B
/// the intersection of the tangents at its two ends, which makes the quadratic
/// bezier through A, B and C follow the arc closely.
pub struct ParticleFilter<R = StdRng> {
    attributes: FilterAttributes,
    b_noise: [Normal<f64>; 3],
    bend_noise: Normal<f64>,
    particles: Vec<CatheterPose>,
    rng: R,
}

impl ParticleFilter<StdRng> {
    /// Creates a filter tracking `count` particles, seeded from system entropy.
    pub fn from_entropy(count: usize, attributes: FilterAttributes) -> Result<Self> {
        Self::new(count, attributes, StdRng::from_entropy())
    }
}

impl<R: Rng> ParticleFilter<R> {
    /// Creates a filter tracking `count` particles; at least one particle is always tracked.
    pub fn new(count: usize, attributes: FilterAttributes, rng: R) -> Result<Self> {
        let (b_noise, bend_noise) = motion_distributions(&attributes.motion_errors)?;
        let nominal = nominal_pose(&attributes, 0.0);
        Ok(Self {
            attributes,
            b_noise,
            bend_noise,
            particles: vec![nominal; count.max(1)],
            rng,
        })
    }

    /// Sets the standard deviations of the noise applied to each particle.
    pub fn set_motion_errors(&mut self, b: Vector3d, bend: f64) -> Result<()> {
        let errors = MotionErrors { b, bend };
        (self.b_noise, self.bend_noise) = motion_distributions(&errors)?;
        self.attributes.motion_errors = errors;
        Ok(())
    }

    /// Resamples every particle for the drive current `amps`.
    pub fn generate_particles(&mut self, amps: f64) {
        let bend = bend_angle(&self.attributes, amps);
        for particle in &mut self.particles {
            let bend = bend + self.bend_noise.sample(&mut self.rng);
            let [a, b, c] = arc_control_points(self.attributes.length, bend);
            let b = Point3d::new(
                b.x + self.b_noise[0].sample(&mut self.rng),
                b.y + self.b_noise[1].sample(&mut self.rng),
                b.z + self.b_noise[2].sample(&mut self.rng),
            );
            *particle = CatheterPose::new(a, b, c);
        }
    }

    /// The particles from the most recent [generate_particles](Self::generate_particles).
    pub fn particles(&self) -> &[CatheterPose] {
        &self.particles
    }

    pub fn attributes(&self) -> &FilterAttributes {
        &self.attributes
    }
}

impl<R: Rng> PoseSource for ParticleFilter<R> {
    fn pose(&mut self, drive: f64) -> CatheterPose {
        self.generate_particles(drive);
        self.particles[0]
    }
}

/// The noise-free pose of the bending model for the drive current `amps`.
pub fn nominal_pose(attributes: &FilterAttributes, amps: f64) -> CatheterPose {
    let [a, b, c] = arc_control_points(attributes.length, bend_angle(attributes, amps));
    CatheterPose::new(a, b, c)
}

fn bend_angle(attributes: &FilterAttributes, amps: f64) -> f64 {
    let limit = attributes.max_bend.abs();
    (attributes.gain * amps).max(-limit).min(limit)
}

/// Control points of a circular arc of the given length that turns by `bend` radians.
fn arc_control_points(length: f64, bend: f64) -> [Point3d; 3] {
    let a = Point3d::new(0.0, 0.0, 0.0);
    if bend.abs() < STRAIGHT_EPSILON {
        return [a, Point3d::new(0.0, 0.0, 0.5 * length), Point3d::new(0.0, 0.0, length)];
    }
    let radius = length / bend;
    let b = Point3d::new(0.0, 0.0, radius * (0.5 * bend).tan());
    let c = Point3d::new(radius * (1.0 - bend.cos()), 0.0, radius * bend.sin());
    [a, b, c]
}

fn motion_distributions(errors: &MotionErrors) -> Result<([Normal<f64>; 3], Normal<f64>)> {
    let normal = |sd: f64| Normal::new(0.0, sd).map_err(|_| Error::InvalidNoise(sd));
    let b = [normal(errors.b.x)?, normal(errors.b.y)?, normal(errors.b.z)?];
    Ok((b, normal(errors.bend)?))
}
