//! Frame synchronizer — marker scan and bounded reassembly.
//!
//! The PMS5003 streams frames continuously, so after a dropped byte the
//! reader is mid-frame with no alignment. The synchronizer scans the byte
//! stream for the `0x42 0x4D` marker pair one byte at a time (a lone `0x42`
//! inside payload data must not be mistaken for a frame start), then waits —
//! bounded by the configured timeout — for the 30-byte remainder before
//! handing the full buffer to [`ParticulateFrame::decode`].
//!
//! The synchronizer itself holds no reading state; given identical byte
//! streams it produces identical results.

use crate::error::FrameError;

use super::{ParticulateFrame, FRAME_LEN, MARKER_HI, MARKER_LO};

/// A readable serial byte stream with a bounded wait primitive.
///
/// `wait_for` blocks (implementation-defined: spin, poll, or not at all for
/// in-memory sources) until at least `count` bytes are buffered or
/// `budget_ms` elapses, returning whether the bytes arrived.
pub trait ByteSource {
    /// Bytes currently buffered and readable without waiting.
    fn available(&self) -> usize;

    /// Look at the next byte without consuming it.
    fn peek(&mut self) -> Option<u8>;

    /// Consume and return the next byte.
    fn read_byte(&mut self) -> Option<u8>;

    /// Wait until `count` bytes are available or the budget expires.
    fn wait_for(&mut self, count: usize, budget_ms: u32) -> bool;
}

/// Scans a [`ByteSource`] for valid particulate frames.
pub struct FrameSynchronizer {
    timeout_ms: u32,
}

impl FrameSynchronizer {
    pub fn new(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }

    /// Extract the next valid frame from the stream.
    ///
    /// Consumes bytes up to and including the frame (or the garbage
    /// preceding a failure). Never exposes decoded values on any error
    /// path — callers keep their last-known-good reading.
    pub fn parse_next(&self, src: &mut impl ByteSource) -> Result<ParticulateFrame, FrameError> {
        loop {
            // 1. Discard until the first marker byte.
            match src.peek() {
                None => return Err(FrameError::NoStartMarker),
                Some(MARKER_HI) => {}
                Some(_) => {
                    let _ = src.read_byte();
                    continue;
                }
            }
            let _ = src.read_byte(); // consume 0x42

            // 2. Confirm the second marker. On mismatch keep scanning from
            //    the byte we just peeked — it may itself be a 0x42.
            match src.peek() {
                None => return Err(FrameError::NoStartMarker),
                Some(MARKER_LO) => {
                    let _ = src.read_byte();
                }
                Some(_) => continue,
            }

            // 3. Bounded wait for the 30-byte remainder.
            let body_len = FRAME_LEN - 2;
            if !src.wait_for(body_len, self.timeout_ms) {
                log::warn!(
                    "PMS frame incomplete: only {} of {} body bytes",
                    src.available(),
                    body_len
                );
                return Err(FrameError::Incomplete);
            }

            let mut buf = [0u8; FRAME_LEN];
            buf[0] = MARKER_HI;
            buf[1] = MARKER_LO;
            for slot in buf.iter_mut().skip(2) {
                // wait_for guaranteed availability
                *slot = src.read_byte().ok_or(FrameError::Incomplete)?;
            }

            // 4–6. Length, checksum, and plausibility checks.
            return ParticulateFrame::decode(&buf);
        }
    }
}
