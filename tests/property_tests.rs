//! Property and fuzz-style tests for the frame codec and alert core.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use airsentry::alert::{conditions::evaluate, AlertStateMachine, Severity};
use airsentry::config::SystemConfig;
use airsentry::error::FrameError;
use airsentry::pms::sync::{ByteSource, FrameSynchronizer};
use airsentry::pms::{checksum, ParticulateFrame, DECLARED_LEN, FRAME_LEN, MARKER_HI, MARKER_LO};
use airsentry::sensors::SensorSnapshot;
use proptest::prelude::*;

// ── Helpers ───────────────────────────────────────────────────

fn build_frame(fields: &[u16; 13]) -> [u8; FRAME_LEN] {
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

/// In-memory byte source over a fixed buffer.
struct SliceSource {
    data: Vec<u8>,
    pos: usize,
}

impl ByteSource for SliceSource {
    fn available(&self) -> usize {
        self.data.len() - self.pos
    }

    fn peek(&mut self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn read_byte(&mut self) -> Option<u8> {
        let b = self.data.get(self.pos).copied();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn wait_for(&mut self, count: usize, _budget_ms: u32) -> bool {
        self.available() >= count
    }
}

/// Plausible field set: PM bounds respected so only injected corruption can
/// make the frame invalid.
fn arb_fields() -> impl Strategy<Value = [u16; 13]> {
    (
        0u16..=1000,
        0u16..=1000,
        0u16..=2000,
        proptest::array::uniform10(any::<u16>()),
    )
        .prop_map(|(pm10s, pm25s, pm100s, rest)| {
            let mut fields = [0u16; 13];
            fields[0] = pm10s;
            fields[1] = pm25s;
            fields[2] = pm100s;
            fields[3..13].copy_from_slice(&rest);
            fields
        })
}

// ── Frame codec robustness ────────────────────────────────────

proptest! {
    /// Any single-bit corruption within the checksummed span must be
    /// rejected — the additive checksum always moves when one bit flips.
    #[test]
    fn single_bit_corruption_never_decodes(
        fields in arb_fields(),
        byte_idx in 0usize..30,
        bit in 0u8..8,
    ) {
        let mut buf = build_frame(&fields);
        buf[byte_idx] ^= 1 << bit;
        prop_assert!(ParticulateFrame::decode(&buf).is_err());
    }

    /// An intact frame always decodes, and to exactly the encoded fields.
    #[test]
    fn intact_frame_decodes_to_encoded_fields(fields in arb_fields()) {
        let frame = ParticulateFrame::decode(&build_frame(&fields)).unwrap();
        prop_assert_eq!(frame.pm10_standard, fields[0]);
        prop_assert_eq!(frame.pm25_standard, fields[1]);
        prop_assert_eq!(frame.pm100_standard, fields[2]);
        prop_assert_eq!(frame.particles_03um, fields[6]);
    }

    /// The synchronizer locks onto a frame behind any amount of non-marker
    /// garbage on the line.
    #[test]
    fn synchronizer_skips_garbage_prefix(
        fields in arb_fields(),
        garbage in proptest::collection::vec(0u8..MARKER_HI, 0..64),
    ) {
        let mut data = garbage;
        data.extend_from_slice(&build_frame(&fields));
        let mut source = SliceSource { data, pos: 0 };

        let sync = FrameSynchronizer::new(1000);
        let frame = sync.parse_next(&mut source).unwrap();
        prop_assert_eq!(frame.pm25_standard, fields[1]);
    }

    /// A truncated tail is reported as incomplete, never as a bogus frame.
    #[test]
    fn truncated_frame_reports_incomplete(
        fields in arb_fields(),
        keep in 2usize..FRAME_LEN,
    ) {
        let data = build_frame(&fields)[..keep].to_vec();
        let mut source = SliceSource { data, pos: 0 };

        let sync = FrameSynchronizer::new(1000);
        prop_assert_eq!(sync.parse_next(&mut source), Err(FrameError::Incomplete));
    }
}

// ── Alert core invariants ─────────────────────────────────────

fn arb_snapshot() -> impl Strategy<Value = SensorSnapshot> {
    (
        -40.0f32..60.0,
        0.0f32..100.0,
        proptest::array::uniform4(0u16..1024),
        0u16..200,
        0u16..200,
        any::<bool>(),
    )
        .prop_map(|(temperature_c, humidity_pct, mq, pm25, pm10, pm_valid)| {
            SensorSnapshot {
                temperature_c,
                humidity_pct,
                mq135: mq[0],
                mq2: mq[1],
                mq4: mq[2],
                mq9: mq[3],
                pm25,
                pm10,
                pm_valid,
            }
        })
}

/// Independent oracle for the expected severity of one snapshot against the
/// default thresholds, starting from a clean latch table.
fn expected_severity(s: &SensorSnapshot, c: &SystemConfig) -> Severity {
    let critical = s.temperature_c > c.temp_high_c
        || s.temperature_c < c.temp_low_c
        || s.mq2 > c.mq2_threshold
        || s.mq4 > c.mq4_threshold
        || s.mq9 > c.mq9_threshold;
    let warning = s.humidity_pct > c.humidity_high_pct
        || s.humidity_pct < c.humidity_low_pct
        || s.mq135 > c.mq135_threshold
        || (s.pm_valid && (s.pm25 > c.pm25_threshold || s.pm10 > c.pm10_threshold));
    if critical {
        Severity::Critical
    } else if warning {
        Severity::Warning
    } else {
        Severity::Normal
    }
}

proptest! {
    /// From a clean state, one cycle lands on the max severity across all
    /// holding conditions, and produces a message exactly when something
    /// fired.
    #[test]
    fn severity_is_max_over_holding_conditions(snapshot in arb_snapshot()) {
        let config = SystemConfig::default();
        let mut machine = AlertStateMachine::new();

        let states = *machine.states();
        let eval = evaluate(&snapshot, &states, &config, 0);
        let outcome = machine.apply(&eval, 0);

        let expected = expected_severity(&snapshot, &config);
        prop_assert_eq!(outcome.severity, expected);
        prop_assert_eq!(outcome.message.is_some(), expected != Severity::Normal);
    }

    /// Particulate conditions never fire while the frame validity flag is
    /// down, whatever the retained values claim.
    #[test]
    fn invalid_pm_never_fires(pm25 in 0u16..2000, pm10 in 0u16..2000) {
        let config = SystemConfig::default();
        let snapshot = SensorSnapshot {
            temperature_c: 25.0,
            humidity_pct: 50.0,
            pm25,
            pm10,
            pm_valid: false,
            ..SensorSnapshot::default()
        };

        let mut machine = AlertStateMachine::new();
        let states = *machine.states();
        let eval = evaluate(&snapshot, &states, &config, 0);
        let outcome = machine.apply(&eval, 0);
        prop_assert_eq!(outcome.severity, Severity::Normal);
        prop_assert!(outcome.message.is_none());
    }

    /// A condition that keeps holding produces at most one notification per
    /// cooldown window, and notifies again once the window has passed.
    #[test]
    fn one_notification_per_cooldown_window(
        within in 1u64..3_600_000,
        beyond in 3_600_001u64..7_200_000,
    ) {
        let config = SystemConfig::default();
        let snapshot = SensorSnapshot {
            temperature_c: 25.0,
            humidity_pct: 50.0,
            mq2: 900,
            ..SensorSnapshot::default()
        };

        let mut machine = AlertStateMachine::new();

        let states = *machine.states();
        let outcome = machine.apply(&evaluate(&snapshot, &states, &config, 0), 0);
        prop_assert!(outcome.message.is_some());

        let states = *machine.states();
        let outcome = machine.apply(&evaluate(&snapshot, &states, &config, within), within);
        prop_assert!(outcome.message.is_none());
        // Severity holds while the condition stays latched.
        prop_assert_eq!(outcome.severity, Severity::Critical);

        let states = *machine.states();
        let outcome = machine.apply(&evaluate(&snapshot, &states, &config, beyond), beyond);
        prop_assert!(outcome.message.is_some());
    }
}
