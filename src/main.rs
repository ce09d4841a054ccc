//! AirSentry firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  HardwareAdapter    GsmModem          LogEventSink       │
//! │  (Sensor+Indicator) (Notifier+Telem)  (EventSink)        │
//! │                                                          │
//! │  ───────────── Port Trait Boundary ──────────────        │
//! │                                                          │
//! │  ┌──────────────────────────────────────────────────┐    │
//! │  │           MonitorService (pure logic)            │    │
//! │  │  evaluate · alert machine · indicator driver     │    │
//! │  └──────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::{error, info, warn};

use airsentry::adapters::gsm::GsmModem;
use airsentry::adapters::hardware::{self, HardwareAdapter, GsmUartLink, PmsUartLink};
use airsentry::adapters::log_sink::LogEventSink;
use airsentry::app::service::MonitorService;
use airsentry::config::SystemConfig;
use airsentry::sensors::dht::DhtSensor;
use airsentry::sensors::particulate::PmsSensor;
use airsentry::sensors::SensorHub;

// Deployment credentials. Baked in at build time, same as every other
// parameter — provisioning at runtime is out of scope for this board.
const GSM_APN: &str = "internet";
const THINGSPEAK_API_KEY: &str = "XR1OCESZGWSNRVVN";
const ALERT_PHONE_NUMBER: &str = "+1234567890";

/// Polling cadence. Matches the LED blink interval so WARNING/CRITICAL
/// blinking stays visually even.
const POLL_INTERVAL_MS: u64 = 250;

fn now_ms() -> u64 {
    // SAFETY: esp_timer is started by the IDF runtime before main().
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() } / 1000) as u64
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("AirSentry v{}", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hardware::init_peripherals() {
        // Peripheral init failure is critical — log and halt; the task
        // watchdog resets the board after timeout.
        error!("peripheral init failed: {e} — halting");
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Adapters ───────────────────────────────────────────
    let hub = SensorHub::new(
        DhtSensor::new(config.dht_min_interval_ms),
        PmsSensor::new(
            PmsUartLink::new(),
            config.pms_read_timeout_ms,
            config.pms_reset_after_failures,
        ),
    );
    let mut hw = HardwareAdapter::new(hub);
    let mut sink = LogEventSink::new();

    let mut modem = GsmModem::new(GsmUartLink, GSM_APN, THINGSPEAK_API_KEY, ALERT_PHONE_NUMBER);
    if let Err(e) = modem.init() {
        // Degraded mode: local indicators still work, comms retried per use.
        warn!("GSM init failed ({e}), continuing without connectivity");
    }

    // ── 4. Monitor service ────────────────────────────────────
    let mut service = MonitorService::new(config);
    service.start(&mut hw, &mut sink);

    // Let the self-test pattern show before normal output takes over.
    FreeRtos::delay_ms(500);

    info!("system ready, entering polling loop");

    // ── 5. Polling loop ───────────────────────────────────────
    loop {
        let now = now_ms();
        service.tick(now, &mut hw, &mut modem, &mut sink);
        service.publish_telemetry_if_due(now, &mut modem, &mut sink);
        FreeRtos::delay_ms(POLL_INTERVAL_MS as u32);
    }
}
