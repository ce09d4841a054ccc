//! System configuration parameters
//!
//! All tunable thresholds and timing for the AirSentry monitor. The struct is
//! built once at startup and injected by value — nothing mutates it at
//! runtime (runtime-configurable thresholds are an explicit non-goal).

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Environmental thresholds ---
    /// Temperature above this fires a critical alert (°C)
    pub temp_high_c: f32,
    /// Temperature below this fires a critical alert (°C)
    pub temp_low_c: f32,
    /// Relative humidity above this fires a warning (%RH)
    pub humidity_high_pct: f32,
    /// Relative humidity below this fires a warning (%RH)
    pub humidity_low_pct: f32,

    // --- Gas thresholds (raw ADC counts) ---
    /// MQ-135 air quality channel
    pub mq135_threshold: u16,
    /// MQ-2 combustible gas channel
    pub mq2_threshold: u16,
    /// MQ-4 methane channel
    pub mq4_threshold: u16,
    /// MQ-9 CO / combustible gas channel
    pub mq9_threshold: u16,

    // --- Particulate thresholds (µg/m³) ---
    pub pm25_threshold: u16,
    pub pm10_threshold: u16,

    // --- Timing ---
    /// Bounded wait for a complete PMS5003 frame (milliseconds)
    pub pms_read_timeout_ms: u32,
    /// Minimum interval between DHT reads (milliseconds)
    pub dht_min_interval_ms: u32,
    /// Buzzer sounding duration from arm (milliseconds)
    pub buzzer_duration_ms: u32,
    /// LED blink-phase toggle period (milliseconds)
    pub led_blink_interval_ms: u32,
    /// Minimum time between repeat notifications for one condition (milliseconds)
    pub alert_cooldown_ms: u64,
    /// Telemetry publish interval (milliseconds)
    pub telemetry_interval_ms: u64,

    // --- Resync ---
    /// Consecutive PMS read failures before a hardware reset is requested
    pub pms_reset_after_failures: u8,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Environmental
            temp_high_c: 30.0,
            temp_low_c: 5.0,
            humidity_high_pct: 80.0,
            humidity_low_pct: 20.0,

            // Gas channels
            mq135_threshold: 700,
            mq2_threshold: 600,
            mq4_threshold: 600,
            mq9_threshold: 600,

            // Particulates
            pm25_threshold: 25,
            pm10_threshold: 50,

            // Timing
            pms_read_timeout_ms: 3000,
            dht_min_interval_ms: 2100,
            buzzer_duration_ms: 3000,
            led_blink_interval_ms: 250,
            alert_cooldown_ms: 3_600_000, // 1 hour
            telemetry_interval_ms: 30_000,

            // Resync
            pms_reset_after_failures: 2,
        }
    }
}
