//! PMS5003 particulate sensor wrapper.
//!
//! Owns the [`FrameSynchronizer`] and the read-failure bookkeeping the
//! frame layer deliberately does not: last-known-good retention, the
//! validity flag, and the consecutive-failure counter that requests a
//! hardware reset through the link once the stream looks unrecoverable.

use log::{info, warn};

use crate::error::FrameError;
use crate::pms::sync::{ByteSource, FrameSynchronizer};
use crate::pms::ParticulateFrame;

/// Serial link to the particulate sensor: a byte stream plus the RESET
/// line. Links without a wired reset keep the default no-op.
pub trait ParticulateLink: ByteSource {
    /// Pulse the sensor's hardware reset line. Returns false when the link
    /// has no reset capability.
    fn hardware_reset(&mut self) -> bool {
        false
    }

    /// Drain stale buffered bytes so the next parse starts near a frame
    /// boundary.
    fn drain(&mut self) {
        while self.read_byte().is_some() {}
    }
}

pub struct PmsSensor<L: ParticulateLink> {
    link: L,
    sync: FrameSynchronizer,
    last: ParticulateFrame,
    data_valid: bool,
    fail_count: u8,
    reset_after: u8,
}

impl<L: ParticulateLink> PmsSensor<L> {
    pub fn new(link: L, read_timeout_ms: u32, reset_after_failures: u8) -> Self {
        Self {
            link,
            sync: FrameSynchronizer::new(read_timeout_ms),
            last: ParticulateFrame::default(),
            data_valid: false,
            fail_count: 0,
            reset_after: reset_after_failures,
        }
    }

    /// Attempt to read one validated frame.
    ///
    /// On failure the last-known-good values stay readable but
    /// [`is_data_valid`](Self::is_data_valid) reports false, so the alert
    /// layer never evaluates stale or garbage particulate data. Repeated
    /// failures escalate to a hardware reset instead of an error.
    pub fn read(&mut self) -> bool {
        match self.sync.parse_next(&mut self.link) {
            Ok(frame) => {
                self.last = frame;
                self.data_valid = true;
                self.fail_count = 0;
                true
            }
            Err(err) => {
                self.data_valid = false;
                self.fail_count = self.fail_count.saturating_add(1);
                warn!(
                    "PMS read failed ({err}), consecutive failures: {}",
                    self.fail_count
                );
                if self.fail_count >= self.reset_after {
                    self.request_reset(err);
                }
                false
            }
        }
    }

    fn request_reset(&mut self, cause: FrameError) {
        info!("resetting PMS sensor after repeated failures ({cause})");
        if !self.link.hardware_reset() {
            warn!("PMS link has no hardware reset, draining buffer only");
        }
        self.link.drain();
        self.fail_count = 0;
    }

    /// PM2.5 concentration (CF=1), last-known-good.
    pub fn pm25(&self) -> u16 {
        self.last.pm25_standard
    }

    /// PM10 concentration (CF=1), last-known-good.
    pub fn pm10(&self) -> u16 {
        self.last.pm100_standard
    }

    /// The retained frame was validated on the most recent read.
    pub fn is_data_valid(&self) -> bool {
        self.data_valid
    }

    /// Full last-known-good frame (particle bins included).
    pub fn last_frame(&self) -> &ParticulateFrame {
        &self.last
    }
}
