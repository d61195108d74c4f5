//! Destinations for published frames.

use crate::error::Result;
use crate::frame::Frame;
use std::io::Write;

/// Receives the frames produced by a [Simulation](crate::Simulation).
pub trait FrameSink {
    /// Publishes a single frame.
    fn publish(&mut self, frame: &Frame) -> Result<()>;
}

impl<T: FrameSink + ?Sized> FrameSink for &mut T {
    fn publish(&mut self, frame: &Frame) -> Result<()> {
        (**self).publish(frame)
    }
}

/// Collects frames in memory.
impl FrameSink for Vec<Frame> {
    fn publish(&mut self, frame: &Frame) -> Result<()> {
        self.push(frame.clone());
        Ok(())
    }
}

/// Writes each frame as a single line of JSON.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwraps the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn publish(&mut self, frame: &Frame) -> Result<()> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
