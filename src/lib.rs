//! Simulates the shape of a flexible catheter and noisy measurements of it,
//! for visualising and testing catheter state estimators.

pub use catheter::{CatheterPose, ControlPoints, MeasuredPose, RENDER_SCALE};
pub use cgmath;
pub use error::{Error, Result};
pub use filter::{FilterAttributes, MotionErrors, ParticleFilter, PoseSource};
pub use frame::{Frame, Path, PathSample, PointCloud};
pub use measurement::{synthesize, synthesize_with};
pub use noise::{sample_noise, IrwinHall};
pub use render::{build_curve, RenderedCurve};
pub use simulation::{DriveState, Simulation, SimulationAttributes};
pub use sink::{FrameSink, JsonLinesSink};

mod catheter;
mod error;
pub mod filter;
pub mod frame;
pub mod math;
mod measurement;
mod noise;
pub mod render;
pub mod simulation;
mod sink;
mod util;

pub use util::Interval;
