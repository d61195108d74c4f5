use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

/// Errors raised by the catheter simulation.
#[derive(Debug)]
pub enum Error {
    /// A rendered curve needs at least two samples.
    InvalidSegmentCount(usize),
    /// Noise bounds and standard deviations must be finite and non-negative.
    InvalidNoise(f64),
    /// The tick period must be finite and non-negative, in seconds.
    InvalidPeriod(f64),
    /// The drive input closed before a single value arrived.
    DriveInputClosed,
    /// Writing a frame to a sink failed.
    Sink(std::io::Error),
    /// Encoding a frame as JSON failed.
    Json(serde_json::Error),
}

/// Shorthand for results carrying an [Error].
pub type Result<T> = std::result::Result<T, Error>;

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidSegmentCount(n) => {
                write!(f, "segment count must be at least 2, got {}", n)
            }
            Error::InvalidNoise(b) => write!(f, "invalid noise parameter {}", b),
            Error::InvalidPeriod(p) => write!(f, "invalid tick period {} s", p),
            Error::DriveInputClosed => write!(f, "drive input closed before any value arrived"),
            Error::Sink(err) => write!(f, "failed to publish frame: {}", err),
            Error::Json(err) => write!(f, "failed to encode frame: {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Sink(err) => Some(err),
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Sink(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
