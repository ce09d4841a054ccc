//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on
//! the other side decide what to do with them — log to serial, mirror to a
//! dashboard, record in tests.

use crate::alert::Severity;
use crate::sensors::SensorSnapshot;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The monitor service has started.
    Started,

    /// One or more conditions fired; carries the rendered alert text and
    /// the post-merge severity.
    AlertRaised {
        severity: Severity,
        text: heapless::String<512>,
    },

    /// Severity changed between cycles (including recovery to NORMAL).
    SeverityChanged { from: Severity, to: Severity },

    /// The notifier port rejected an alert; the state transition stands.
    NotifierFailed,

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// Telemetry publish failed; the next interval retries naturally.
    TelemetryFailed,
}

/// A point-in-time measurement record for the data platform.
///
/// PM fields carry the last-known-good values; `pm_valid` tells the
/// platform whether to trust them this interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub mq135: u16,
    pub mq2: u16,
    pub mq4: u16,
    pub mq9: u16,
    pub pm25: u16,
    pub pm10: u16,
    pub pm_valid: bool,
}

impl From<&SensorSnapshot> for TelemetryData {
    fn from(s: &SensorSnapshot) -> Self {
        Self {
            temperature_c: s.temperature_c,
            humidity_pct: s.humidity_pct,
            mq135: s.mq135,
            mq2: s.mq2,
            mq4: s.mq4,
            mq9: s.mq9,
            pm25: s.pm25,
            pm10: s.pm10,
            pm_valid: s.pm_valid,
        }
    }
}
