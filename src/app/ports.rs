//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (sensor hub, GSM modem, GPIO indicators, event sinks)
//! implement these traits. The [`MonitorService`](super::service::MonitorService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::error::CommsError;
use crate::indicators::IndicatorCommand;
use crate::sensors::SensorSnapshot;

use super::events::{AppEvent, TelemetryData};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain one snapshot per cycle.
pub trait SensorPort {
    /// Read every sensor and return a unified snapshot.
    ///
    /// Must not fail: unavailable sensors surface as retained values with
    /// dropped validity flags, never as errors.
    fn read_all(&mut self, now_ms: u64) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LEDs/buzzer)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the LED panel and buzzer. Fire-and-forget — GPIO
/// writes have no meaningful failure mode to report.
pub trait IndicatorPort {
    fn apply(&mut self, cmd: &IndicatorCommand);
}

// ───────────────────────────────────────────────────────────────
// Notifier port (driven adapter: domain → SMS/remote alerting)
// ───────────────────────────────────────────────────────────────

/// Outbound alert channel (SMS in production).
///
/// Failures are reported, logged by the caller, and never block the alert
/// state transition — the cooldown clock starts whether or not the message
/// left the device.
pub trait AlertNotifier {
    fn send_alert(&mut self, text: &str) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (driven adapter: domain → data platform)
// ───────────────────────────────────────────────────────────────

/// Periodic measurement upload, independent of alert state.
pub trait TelemetryPublisher {
    fn publish(&mut self, data: &TelemetryData) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / diagnostics)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port. Adapters
/// decide where they go (serial log, dashboard, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
