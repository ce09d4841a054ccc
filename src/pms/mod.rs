//! PMS5003 particulate frame protocol.
//!
//! Wire format (all multi-byte fields big-endian):
//! ```text
//! ┌──────┬──────┬────────┬──────────────────────────────┬──────────┐
//! │ 0x42 │ 0x4D │ len 2B │ 12 × u16 data fields (24 B)  │ unused   │
//! │      │      │ =0x1C  │ PM + particle-bin counts     │ + cksum  │
//! └──────┴──────┴────────┴──────────────────────────────┴──────────┘
//! ```
//! 32 bytes total. The trailing checksum is the additive sum of bytes 0–29.
//!
//! [`sync::FrameSynchronizer`] re-establishes byte alignment on a noisy
//! serial link and hands complete 32-byte buffers to
//! [`ParticulateFrame::decode`], which performs length, checksum, and
//! plausibility validation. A rejected frame never surfaces any decoded
//! values — the caller keeps its last-known-good reading.

pub mod sync;

use crate::error::FrameError;

/// First start-of-frame marker byte ('B').
pub const MARKER_HI: u8 = 0x42;
/// Second start-of-frame marker byte ('M').
pub const MARKER_LO: u8 = 0x4D;
/// Total frame size on the wire, markers included.
pub const FRAME_LEN: usize = 32;
/// Bytes covered by the checksum (everything before the 2-byte trailer).
pub const CHECKSUM_SPAN: usize = 30;
/// Value the declared-length field must carry (28 = frame minus markers
/// and length field).
pub const DECLARED_LEN: u16 = 0x001C;

/// PM2.5 readings above this are physically implausible (µg/m³).
const PM25_MAX: u16 = 1000;
/// PM10 readings above this are physically implausible (µg/m³).
const PM100_MAX: u16 = 2000;

/// Decoded PMS5003 data frame.
///
/// Standard fields are CF=1 (factory calibration); env fields are
/// atmospheric-corrected. Particle bins count particles per 0.1 L of air.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticulateFrame {
    pub pm10_standard: u16,
    pub pm25_standard: u16,
    pub pm100_standard: u16,
    pub pm10_env: u16,
    pub pm25_env: u16,
    pub pm100_env: u16,
    pub particles_03um: u16,
    pub particles_05um: u16,
    pub particles_10um: u16,
    pub particles_25um: u16,
    pub particles_50um: u16,
    pub particles_100um: u16,
}

impl ParticulateFrame {
    /// Validate and decode a complete 32-byte frame buffer.
    ///
    /// The buffer must start with the marker pair (the synchronizer
    /// guarantees this); validation order is markers → declared length →
    /// checksum → plausibility bounds, failing fast on the first mismatch.
    pub fn decode(buf: &[u8; FRAME_LEN]) -> Result<Self, FrameError> {
        if buf[0] != MARKER_HI || buf[1] != MARKER_LO {
            return Err(FrameError::NoStartMarker);
        }

        if read_u16(buf, 2) != DECLARED_LEN {
            return Err(FrameError::InvalidLength);
        }

        if checksum(buf) != read_u16(buf, CHECKSUM_SPAN) {
            return Err(FrameError::ChecksumMismatch);
        }

        let frame = Self {
            pm10_standard: read_u16(buf, 4),
            pm25_standard: read_u16(buf, 6),
            pm100_standard: read_u16(buf, 8),
            pm10_env: read_u16(buf, 10),
            pm25_env: read_u16(buf, 12),
            pm100_env: read_u16(buf, 14),
            particles_03um: read_u16(buf, 16),
            particles_05um: read_u16(buf, 18),
            particles_10um: read_u16(buf, 20),
            particles_25um: read_u16(buf, 22),
            particles_50um: read_u16(buf, 24),
            particles_100um: read_u16(buf, 26),
        };

        if frame.pm25_standard > PM25_MAX || frame.pm100_standard > PM100_MAX {
            return Err(FrameError::OutOfRange);
        }

        Ok(frame)
    }
}

/// Additive checksum over bytes 0–29.
pub fn checksum(buf: &[u8; FRAME_LEN]) -> u16 {
    buf[..CHECKSUM_SPAN]
        .iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)))
}

fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([buf[offset], buf[offset + 1]])
}

#[cfg(test)]
pub(crate) fn build_test_frame(fields: &[u16; 13]) -> [u8; FRAME_LEN] {
    // fields[0..12] = data words, fields[12] is the reserved word.
    let mut buf = [0u8; FRAME_LEN];
    buf[0] = MARKER_HI;
    buf[1] = MARKER_LO;
    buf[2..4].copy_from_slice(&DECLARED_LEN.to_be_bytes());
    for (i, f) in fields.iter().enumerate() {
        buf[4 + i * 2..6 + i * 2].copy_from_slice(&f.to_be_bytes());
    }
    let sum = checksum(&buf);
    buf[30..32].copy_from_slice(&sum.to_be_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_frame() -> [u8; FRAME_LEN] {
        build_test_frame(&[5, 12, 30, 5, 11, 28, 900, 260, 40, 4, 2, 1, 0])
    }

    #[test]
    fn decodes_fields_byte_exactly() {
        let frame = ParticulateFrame::decode(&valid_frame()).unwrap();
        assert_eq!(frame.pm10_standard, 5);
        assert_eq!(frame.pm25_standard, 12);
        assert_eq!(frame.pm100_standard, 30);
        assert_eq!(frame.pm25_env, 11);
        assert_eq!(frame.particles_03um, 900);
        assert_eq!(frame.particles_100um, 1);
    }

    #[test]
    fn decode_is_idempotent() {
        let buf = valid_frame();
        assert_eq!(
            ParticulateFrame::decode(&buf).unwrap(),
            ParticulateFrame::decode(&buf).unwrap()
        );
    }

    #[test]
    fn rejects_wrong_declared_length() {
        let mut buf = valid_frame();
        // Declared length 0x0020 (32) instead of 0x001C.
        buf[2..4].copy_from_slice(&0x0020u16.to_be_bytes());
        let sum = checksum(&buf);
        buf[30..32].copy_from_slice(&sum.to_be_bytes());
        assert_eq!(
            ParticulateFrame::decode(&buf),
            Err(FrameError::InvalidLength)
        );
    }

    #[test]
    fn rejects_corrupted_payload() {
        let mut buf = valid_frame();
        buf[7] ^= 0x01;
        assert_eq!(
            ParticulateFrame::decode(&buf),
            Err(FrameError::ChecksumMismatch)
        );
    }

    #[test]
    fn rejects_missing_markers() {
        let mut buf = valid_frame();
        buf[0] = 0x00;
        assert_eq!(
            ParticulateFrame::decode(&buf),
            Err(FrameError::NoStartMarker)
        );
    }

    #[test]
    fn rejects_implausible_pm25() {
        let buf = build_test_frame(&[5, 1500, 30, 5, 11, 28, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ParticulateFrame::decode(&buf), Err(FrameError::OutOfRange));
    }

    #[test]
    fn rejects_implausible_pm10() {
        let buf = build_test_frame(&[5, 12, 2500, 5, 11, 28, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ParticulateFrame::decode(&buf), Err(FrameError::OutOfRange));
    }
}
