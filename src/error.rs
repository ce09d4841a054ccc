//! Unified error types for the AirSentry firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level control loop's error handling uniform. All variants are `Copy`
//! so they can move through the polling loop without allocation.
//!
//! Propagation policy: frame errors are absorbed at the PMS boundary (the
//! caller keeps its last-known-good reading and drops the validity flag);
//! comms errors are logged and never halt the loop.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A particulate frame failed framing or validation.
    Frame(FrameError),
    /// A sensor could not be read or returned unusable data.
    Sensor(SensorError),
    /// The notifier or telemetry transport failed.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame(e) => write!(f, "frame: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Frame errors (PMS5003 serial protocol)
// ---------------------------------------------------------------------------

/// Reasons a 32-byte particulate frame is rejected.
///
/// Every variant leaves the caller on its last-known-good reading; none of
/// them may surface decoded values to the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// No `0x42 0x4D` start sequence found within the scan budget.
    NoStartMarker,
    /// Markers found but the 30-byte body did not arrive before timeout.
    Incomplete,
    /// Declared length field differs from the fixed 0x001C constant.
    InvalidLength,
    /// Additive checksum over bytes 0–29 does not match the trailer.
    ChecksumMismatch,
    /// Decoded PM values exceed the plausible physical range.
    OutOfRange,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStartMarker => write!(f, "no start marker"),
            Self::Incomplete => write!(f, "incomplete frame"),
            Self::InvalidLength => write!(f, "invalid frame length"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::OutOfRange => write!(f, "value out of range"),
        }
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Sensor did not respond or returned NaN.
    Unavailable,
    /// ADC read returned an error.
    AdcReadFailed,
    /// Minimum sampling interval has not elapsed yet.
    TooSoon,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "sensor unavailable"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::TooSoon => write!(f, "minimum interval not elapsed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The notifier transport rejected or timed out on an alert message.
    NotifierUnreachable,
    /// The telemetry endpoint rejected or timed out on a publish.
    PublishFailed,
    /// The modem answered an AT command with ERROR after all retries.
    CommandRejected,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotifierUnreachable => write!(f, "notifier unreachable"),
            Self::PublishFailed => write!(f, "telemetry publish failed"),
            Self::CommandRejected => write!(f, "AT command rejected"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
