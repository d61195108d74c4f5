use crate::catheter::CatheterPose;
use crate::error::{Error, Result};
use crate::filter::PoseSource;
use crate::frame::{Frame, PointCloud, DEFAULT_FRAME_ID};
use crate::measurement::synthesize_with;
use crate::noise::IrwinHall;
use crate::render::{build_curve, DEFAULT_SEGMENT_COUNT};
use crate::sink::FrameSink;
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

/// The default measurement noise parameter.
pub const DEFAULT_NOISE: f64 = 0.001;

/// The default time between ticks.
pub const DEFAULT_PERIOD_SEC: f64 = 0.02; // s

/// Log the current pose once per this many ticks.
pub const DEFAULT_DUMP_INTERVAL: usize = 200;

/// The attributes of a [Simulation].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationAttributes {
    /// The number of samples along the rendered curve; at least 2.
    pub segment_count: usize,
    /// The measurement noise parameter.
    pub noise: f64,
    /// The time between ticks in s.
    pub period: f64,
    /// Log the current pose once per this many ticks; 0 disables the dump.
    pub dump_interval: usize,
    /// The coordinate frame attached to published data.
    pub frame_id: String,
}

impl Default for SimulationAttributes {
    fn default() -> Self {
        Self {
            segment_count: DEFAULT_SEGMENT_COUNT,
            noise: DEFAULT_NOISE,
            period: DEFAULT_PERIOD_SEC,
            dump_interval: DEFAULT_DUMP_INTERVAL,
            frame_id: DEFAULT_FRAME_ID.to_owned(),
        }
    }
}

/// Whether the simulation has received a drive current yet.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DriveState {
    /// No drive current has arrived yet.
    WaitingForDriveInput,
    /// Ticking with the most recently received drive current, in amps.
    Running { drive: f64 },
}

/// A catheter simulation.
///
/// Each tick requests a pose from the [PoseSource], renders it as a curve and
/// synthesises a noisy measurement of it using the simulation's own random generator.
pub struct Simulation<S, R> {
    /// The attributes the simulation was created with.
    attributes: SimulationAttributes,
    /// Where true poses come from.
    source: S,
    /// The generator behind all measurement noise.
    rng: R,
    /// The measurement noise distribution.
    noise: IrwinHall,
    /// Whether a drive current has arrived.
    state: DriveState,
    /// The number of ticks simulated so far.
    tick: usize,
}

impl<S: PoseSource, R: Rng> Simulation<S, R> {
    /// Creates a new simulation, validating its attributes.
    pub fn new(attributes: SimulationAttributes, source: S, rng: R) -> Result<Self> {
        if attributes.segment_count < 2 {
            return Err(Error::InvalidSegmentCount(attributes.segment_count));
        }
        if !attributes.period.is_finite() || attributes.period < 0.0 {
            return Err(Error::InvalidPeriod(attributes.period));
        }
        let noise = IrwinHall::new(attributes.noise)?;
        Ok(Self {
            attributes,
            source,
            rng,
            noise,
            state: DriveState::WaitingForDriveInput,
            tick: 0,
        })
    }

    pub fn attributes(&self) -> &SimulationAttributes {
        &self.attributes
    }

    pub fn state(&self) -> DriveState {
        self.state
    }

    /// Gets the number of ticks simulated so far.
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Records a newly received drive current.
    pub fn set_drive(&mut self, drive: f64) {
        match self.state {
            DriveState::WaitingForDriveInput => info!("Got input {} amps.", drive),
            DriveState::Running { drive: prev } if prev != drive => {
                debug!("Drive changed from {} to {} amps.", prev, drive)
            }
            DriveState::Running { .. } => {}
        }
        self.state = DriveState::Running { drive };
    }

    /// Simulates a single tick with the most recent drive current.
    ///
    /// Returns `None` without consuming a tick while no drive current has arrived.
    pub fn step(&mut self) -> Result<Option<Frame>> {
        match self.state {
            DriveState::WaitingForDriveInput => Ok(None),
            DriveState::Running { drive } => self.simulate(drive).map(Some),
        }
    }

    /// Runs the simulation until `shutdown` is set.
    ///
    /// Blocks until the first drive current arrives on `input`, then publishes one frame to
    /// `sink` per period. Later drive values are picked up between ticks; if none arrive the
    /// last one keeps being used. Fails if `input` closes before delivering any value,
    /// unless `shutdown` was already requested.
    pub fn run(
        &mut self,
        input: &Receiver<f64>,
        sink: &mut impl FrameSink,
        shutdown: &AtomicBool,
    ) -> Result<()> {
        if self.state == DriveState::WaitingForDriveInput {
            info!("Waiting for drive input...");
            match input.recv() {
                Ok(drive) => self.set_drive(drive),
                Err(_) if shutdown.load(Ordering::Relaxed) => {
                    info!("Shut down before any drive input.");
                    return Ok(());
                }
                Err(_) => return Err(Error::DriveInputClosed),
            }
        }

        let period = Duration::from_secs_f64(self.attributes.period);
        let mut connected = true;
        while !shutdown.load(Ordering::Relaxed) {
            if connected {
                connected = self.receive_drive(input);
            }
            if let Some(frame) = self.step()? {
                sink.publish(&frame)?;
            }
            std::thread::sleep(period);
        }
        info!("Shut down after {} ticks.", self.tick);
        Ok(())
    }

    /// Takes every pending drive value, keeping the newest.
    /// Returns false once the input has disconnected.
    fn receive_drive(&mut self, input: &Receiver<f64>) -> bool {
        loop {
            match input.try_recv() {
                Ok(drive) => self.set_drive(drive),
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => {
                    warn!("Drive input closed; holding the last value.");
                    return false;
                }
            }
        }
    }

    fn simulate(&mut self, drive: f64) -> Result<Frame> {
        let pose = self.source.pose(drive);
        let tick = self.tick;
        self.tick += 1;
        self.dump_pose(&pose);

        let frame_id = &self.attributes.frame_id;
        let curve = build_curve(&pose, self.attributes.segment_count)?;
        let measured = synthesize_with(&pose, &self.noise, &mut self.rng);
        Ok(Frame {
            tick,
            drive,
            path: curve.to_path(frame_id),
            cloud: PointCloud::from_pose(&pose, frame_id),
            measured,
            measured_cloud: PointCloud::from_pose(&measured, frame_id),
        })
    }

    fn dump_pose(&self, pose: &CatheterPose) {
        if self.should_dump() {
            info!("Catheter after {} ticks: {}", self.tick, pose);
        }
    }

    /// Whether the pose of the tick just simulated is due to be logged.
    fn should_dump(&self) -> bool {
        let interval = self.attributes.dump_interval;
        interval > 0 && self.tick % interval == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catheter::ControlPoints;
    use crate::math::Point3d;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::mpsc;

    /// Returns a pose whose tip sits at the drive current, and counts requests.
    #[derive(Default)]
    struct EchoSource {
        requests: usize,
    }

    impl PoseSource for EchoSource {
        fn pose(&mut self, drive: f64) -> CatheterPose {
            self.requests += 1;
            CatheterPose::new(
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(0.0, 0.0, 0.5),
                Point3d::new(drive, 0.0, 1.0),
            )
        }
    }

    /// Stops the simulation after a fixed number of frames.
    struct StopAfter<'a> {
        frames: Vec<Frame>,
        limit: usize,
        shutdown: &'a AtomicBool,
    }

    impl FrameSink for StopAfter<'_> {
        fn publish(&mut self, frame: &Frame) -> Result<()> {
            self.frames.push(frame.clone());
            if self.frames.len() >= self.limit {
                self.shutdown.store(true, Ordering::Relaxed);
            }
            Ok(())
        }
    }

    fn rng() -> StdRng {
        StdRng::from_seed(*b"Vegemite sandwhich is not fun...")
    }

    fn fast() -> SimulationAttributes {
        SimulationAttributes {
            period: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn waits_for_drive() {
        let mut sim = Simulation::new(fast(), EchoSource::default(), rng()).unwrap();
        assert_eq!(sim.state(), DriveState::WaitingForDriveInput);
        assert!(sim.step().unwrap().is_none());
        assert_eq!(sim.tick(), 0);

        sim.set_drive(2.0);
        let frame = sim.step().unwrap().unwrap();
        assert_eq!(frame.tick, 0);
        assert_eq!(frame.drive, 2.0);
        assert_eq!(sim.tick(), 1);
    }

    #[test]
    fn frame_contents() {
        let mut sim = Simulation::new(fast(), EchoSource::default(), rng()).unwrap();
        sim.set_drive(0.25);
        let frame = sim.step().unwrap().unwrap();
        assert_eq!(frame.path.poses.len(), DEFAULT_SEGMENT_COUNT);
        assert_eq!(frame.path.frame_id, DEFAULT_FRAME_ID);
        assert_eq!(frame.cloud.points[2], Point3d::new(2.5, 0.0, 10.0));
        assert_eq!(frame.measured_cloud.points, frame.measured.scaled_points());
        assert_ne!(frame.measured.c(), Point3d::new(0.25, 0.0, 1.0));
    }

    #[test]
    fn noiseless_measurement_matches_truth() {
        let attributes = SimulationAttributes {
            noise: 0.0,
            ..fast()
        };
        let mut sim = Simulation::new(attributes, EchoSource::default(), rng()).unwrap();
        sim.set_drive(1.0);
        let frame = sim.step().unwrap().unwrap();
        assert_eq!(frame.measured_cloud.points, frame.cloud.points);
    }

    #[test]
    fn same_seed_same_measurements() {
        let run = || {
            let mut sim = Simulation::new(fast(), EchoSource::default(), rng()).unwrap();
            sim.set_drive(1.0);
            (0..3)
                .map(|_| sim.step().unwrap().unwrap().measured)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn rejects_bad_attributes() {
        let bad_segments = SimulationAttributes {
            segment_count: 1,
            ..fast()
        };
        assert!(matches!(
            Simulation::new(bad_segments, EchoSource::default(), rng()),
            Err(Error::InvalidSegmentCount(1))
        ));
        let bad_noise = SimulationAttributes {
            noise: -0.5,
            ..fast()
        };
        assert!(Simulation::new(bad_noise, EchoSource::default(), rng()).is_err());
        let bad_period = SimulationAttributes {
            period: f64::NAN,
            ..fast()
        };
        assert!(Simulation::new(bad_period, EchoSource::default(), rng()).is_err());
    }

    #[test]
    fn run_holds_stale_drive() {
        let (tx, rx) = mpsc::channel();
        tx.send(1.0).unwrap();
        tx.send(3.0).unwrap();
        drop(tx);

        let shutdown = AtomicBool::new(false);
        let mut sink = StopAfter {
            frames: vec![],
            limit: 5,
            shutdown: &shutdown,
        };
        let mut sim = Simulation::new(fast(), EchoSource::default(), rng()).unwrap();
        sim.run(&rx, &mut sink, &shutdown).unwrap();

        assert_eq!(sink.frames.len(), 5);
        assert_eq!(sink.frames[0].drive, 3.0);
        assert!(sink.frames.iter().all(|f| f.drive == 3.0));
        let ticks: Vec<usize> = sink.frames.iter().map(|f| f.tick).collect();
        assert_eq!(ticks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn run_fails_without_input() {
        let (tx, rx) = mpsc::channel::<f64>();
        drop(tx);
        let shutdown = AtomicBool::new(false);
        let mut sim = Simulation::new(fast(), EchoSource::default(), rng()).unwrap();
        let result = sim.run(&rx, &mut Vec::<Frame>::new(), &shutdown);
        assert!(matches!(result, Err(Error::DriveInputClosed)));
    }

    #[test]
    fn run_accepts_shutdown_without_input() {
        let (tx, rx) = mpsc::channel::<f64>();
        drop(tx);
        let shutdown = AtomicBool::new(true);
        let mut frames: Vec<Frame> = Vec::new();
        let mut sim = Simulation::new(fast(), EchoSource::default(), rng()).unwrap();
        sim.run(&rx, &mut frames, &shutdown).unwrap();
        assert!(frames.is_empty());
        assert_eq!(sim.state(), DriveState::WaitingForDriveInput);
    }

    #[test]
    fn dumps_every_interval() {
        let mut sim = Simulation::new(fast(), EchoSource::default(), rng()).unwrap();
        let mut dumped = vec![];
        for tick in 1..=400 {
            sim.tick = tick;
            if sim.should_dump() {
                dumped.push(tick);
            }
        }
        assert_eq!(dumped, vec![200, 400]);
    }

    #[test]
    fn zero_interval_never_dumps() {
        let attributes = SimulationAttributes {
            dump_interval: 0,
            ..fast()
        };
        let mut sim = Simulation::new(attributes, EchoSource::default(), rng()).unwrap();
        sim.set_drive(1.0);
        for _ in 0..400 {
            sim.step().unwrap();
            assert!(!sim.should_dump());
        }
        assert_eq!(sim.tick(), 400);
    }

    #[test]
    fn run_stops_on_shutdown() {
        let (tx, rx) = mpsc::channel();
        tx.send(0.5).unwrap();
        let shutdown = AtomicBool::new(true);
        let mut frames: Vec<Frame> = Vec::new();
        let mut sim = Simulation::new(fast(), EchoSource::default(), rng()).unwrap();
        sim.run(&rx, &mut frames, &shutdown).unwrap();
        assert!(frames.is_empty());
        assert_eq!(sim.state(), DriveState::Running { drive: 0.5 });
    }
}
