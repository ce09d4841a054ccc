//! Monitor service — the hexagonal core.
//!
//! [`MonitorService`] owns the alert state machine and the indicator
//! driver and runs the per-cycle pipeline:
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────────┐ ──▶ AlertNotifier
//!                 │       MonitorService        │ ──▶ EventSink
//!                 │  evaluate · machine · blink │
//!                 └─────────────────────────────┘ ──▶ IndicatorPort
//! ```
//!
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters. Single-threaded by design:
//! one `tick` per polling cycle, no locking anywhere.

use log::{error, info, warn};

use crate::alert::{conditions, AlertStateMachine, Severity};
use crate::config::SystemConfig;
use crate::indicators::IndicatorDriver;
use crate::sensors::SensorSnapshot;

use super::events::{AppEvent, TelemetryData};
use super::ports::{AlertNotifier, EventSink, IndicatorPort, SensorPort, TelemetryPublisher};

/// The application service orchestrates all domain logic.
pub struct MonitorService {
    config: SystemConfig,
    machine: AlertStateMachine,
    indicators: IndicatorDriver,
    last_snapshot: SensorSnapshot,
    last_telemetry_ms: Option<u64>,
    tick_count: u64,
}

impl MonitorService {
    pub fn new(config: SystemConfig) -> Self {
        let indicators =
            IndicatorDriver::new(config.led_blink_interval_ms, config.buzzer_duration_ms);
        Self {
            config,
            machine: AlertStateMachine::new(),
            indicators,
            last_snapshot: SensorSnapshot::default(),
            last_telemetry_ms: None,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Startup self-test: light every channel and chirp the buzzer so a
    /// bench check catches dead hardware, then settle to NORMAL outputs.
    pub fn start(&mut self, hw: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        hw.apply(&IndicatorDriver::self_test_command());
        sink.emit(&AppEvent::Started);
        info!("monitor started, severity {}", self.machine.severity());
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full polling cycle: read sensors → evaluate → apply →
    /// notify → indicators.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`IndicatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit. Returns the cycle's severity.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + IndicatorPort),
        notifier: &mut impl AlertNotifier,
        sink: &mut impl EventSink,
    ) -> Severity {
        self.tick_count += 1;
        let prev_severity = self.machine.severity();

        // 1. Snapshot via SensorPort.
        let snapshot = hw.read_all(now_ms);
        self.last_snapshot = snapshot;

        // 2–3. Pure evaluation, then latch/severity update.
        let eval = conditions::evaluate(&snapshot, self.machine.states(), &self.config, now_ms);
        let outcome = self.machine.apply(&eval, now_ms);

        // 4. Buzzer arms on the firing itself, not on the blink tick.
        if outcome.arm_buzzer {
            self.indicators.arm_buzzer(now_ms);
        }

        // 5. Notify. A failed send is logged and reported; the latches and
        //    cooldown clocks above are already committed.
        if let Some(message) = &outcome.message {
            let text = message.render();
            sink.emit(&AppEvent::AlertRaised {
                severity: outcome.severity,
                text: text.clone(),
            });
            if let Err(e) = notifier.send_alert(text.as_str()) {
                error!("alert notification failed: {e}");
                sink.emit(&AppEvent::NotifierFailed);
            }
        }

        if outcome.severity != prev_severity {
            info!("severity {} -> {}", prev_severity, outcome.severity);
            sink.emit(&AppEvent::SeverityChanged {
                from: prev_severity,
                to: outcome.severity,
            });
        }

        // 6. Indicator outputs for this tick.
        let cmd = self.indicators.tick(now_ms, outcome.severity);
        hw.apply(&cmd);

        outcome.severity
    }

    // ── Telemetry ─────────────────────────────────────────────

    /// Publish a measurement record when the interval has elapsed.
    ///
    /// Runs on its own clock, not gated by alert state. Returns whether a
    /// publish was attempted.
    pub fn publish_telemetry_if_due(
        &mut self,
        now_ms: u64,
        publisher: &mut impl TelemetryPublisher,
        sink: &mut impl EventSink,
    ) -> bool {
        let due = match self.last_telemetry_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.config.telemetry_interval_ms,
        };
        if !due {
            return false;
        }
        self.last_telemetry_ms = Some(now_ms);

        let data = TelemetryData::from(&self.last_snapshot);
        match publisher.publish(&data) {
            Ok(()) => sink.emit(&AppEvent::Telemetry(data)),
            Err(e) => {
                warn!("telemetry publish failed: {e}");
                sink.emit(&AppEvent::TelemetryFailed);
            }
        }
        true
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current severity tier.
    pub fn severity(&self) -> Severity {
        self.machine.severity()
    }

    /// Whether the buzzer is currently sounding.
    pub fn buzzer_active(&self) -> bool {
        self.indicators.buzzer_active()
    }

    /// Total polling cycles executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Direct access to the latch table (diagnostics, tests).
    pub fn machine(&self) -> &AlertStateMachine {
        &self.machine
    }
}
