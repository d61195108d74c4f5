//! Miscellaneous utility structs and functions.

use std::fmt::Debug;

use cgmath::num_traits::Float;
use serde::{Deserialize, Serialize};

/// An interval on the real number line.
#[derive(Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: std::cmp::PartialOrd> Interval<T> {
    /// Returns true if this interval contains the value.
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

impl<T: Float> Interval<T> {
    /// Creates an interval with the given centre and radius.
    pub fn disc(centre: T, radius: T) -> Self {
        Self {
            min: centre - radius,
            max: centre + radius,
        }
    }

    /// Maps `t` in [0, 1] onto the interval. `lerp(1)` is exactly `max`.
    pub fn lerp(&self, t: T) -> T {
        if t == T::one() {
            self.max
        } else {
            self.min + t * (self.max - self.min)
        }
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}
