//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production). A future MQTT or dashboard
//! adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | T={:.1}\u{00b0}C RH={:.0}% | MQ135={} MQ2={} MQ4={} MQ9={} | \
                     PM2.5={} PM10={} ({})",
                    t.temperature_c,
                    t.humidity_pct,
                    t.mq135,
                    t.mq2,
                    t.mq4,
                    t.mq9,
                    t.pm25,
                    t.pm10,
                    if t.pm_valid { "valid" } else { "stale" },
                );
            }
            AppEvent::AlertRaised { severity, text } => {
                warn!("ALERT | {severity} | {text}");
            }
            AppEvent::SeverityChanged { from, to } => {
                info!("SEVERITY | {from} -> {to}");
            }
            AppEvent::NotifierFailed => {
                warn!("NOTIFY | alert delivery failed");
            }
            AppEvent::TelemetryFailed => {
                warn!("TELEM | publish failed");
            }
            AppEvent::Started => {
                info!("START | monitor running");
            }
        }
    }
}
