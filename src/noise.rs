//! Approximately Gaussian measurement noise.

use crate::error::{Error, Result};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// The number of uniform variates summed per noise draw.
pub const IRWIN_HALL_TERMS: usize = 12;

/// Zero-mean noise built from the sum of 12 uniform variates on `[-b, b]`, halved.
///
/// The sum has variance `12 * b² / 3 = 4b²`, so halving it gives a distribution
/// with standard deviation `b` whose support is `[-6b, 6b]`.
#[derive(Clone, Debug)]
pub struct IrwinHall {
    uniform: Uniform<f64>,
}

impl IrwinHall {
    /// Creates the distribution for the noise parameter `bound`.
    ///
    /// Fails if `bound` is negative or not finite.
    pub fn new(bound: f64) -> Result<Self> {
        if !bound.is_finite() || bound < 0.0 {
            return Err(Error::InvalidNoise(bound));
        }
        Ok(Self {
            uniform: Uniform::new_inclusive(-bound, bound),
        })
    }
}

impl Distribution<f64> for IrwinHall {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let mut sum = 0.0;
        for _ in 0..IRWIN_HALL_TERMS {
            sum += self.uniform.sample(rng);
        }
        sum / 2.0
    }
}

/// Draws a single noise value with parameter `bound` from `rng`.
pub fn sample_noise<R: Rng + ?Sized>(rng: &mut R, bound: f64) -> Result<f64> {
    Ok(IrwinHall::new(bound)?.sample(rng))
}
