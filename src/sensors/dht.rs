//! DHT22 temperature/humidity driver.
//!
//! The DHT22 cannot be sampled faster than roughly every two seconds;
//! reads inside that window return the retained values. A failed or NaN
//! read likewise keeps the last good pair so one glitch never produces a
//! spurious temperature alert.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: single-wire read through the hardware adapter.
//! On host/test: reads from static atomics for injection.

use core::sync::atomic::{AtomicU32, Ordering};

use log::warn;

// f32 bit patterns; host runs start at a benign 25.0 °C / 50 %RH.
static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(0x41C8_0000); // 25.0
static SIM_HUMIDITY_BITS: AtomicU32 = AtomicU32::new(0x4248_0000); // 50.0

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(temperature_c: f32, humidity_pct: f32) {
    SIM_TEMP_BITS.store(temperature_c.to_bits(), Ordering::Relaxed);
    SIM_HUMIDITY_BITS.store(humidity_pct.to_bits(), Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    /// False when the minimum interval gated the read or the sensor failed
    /// (values are then the retained last-known-good pair).
    pub fresh: bool,
}

pub struct DhtSensor {
    min_interval_ms: u32,
    last_read_ms: u64,
    last_temperature_c: f32,
    last_humidity_pct: f32,
    has_read: bool,
}

impl DhtSensor {
    pub fn new(min_interval_ms: u32) -> Self {
        Self {
            min_interval_ms,
            last_read_ms: 0,
            last_temperature_c: 25.0,
            last_humidity_pct: 50.0,
            has_read: false,
        }
    }

    pub fn read(&mut self, now_ms: u64) -> ClimateReading {
        let due = !self.has_read
            || now_ms.saturating_sub(self.last_read_ms) >= u64::from(self.min_interval_ms);
        if due {
            self.last_read_ms = now_ms;
            match self.read_raw() {
                Some((t, h)) if !t.is_nan() && !h.is_nan() => {
                    self.last_temperature_c = t;
                    self.last_humidity_pct = h;
                    self.has_read = true;
                    return ClimateReading {
                        temperature_c: t,
                        humidity_pct: h,
                        fresh: true,
                    };
                }
                _ => {
                    warn!("DHT read failed, keeping last good values");
                }
            }
        }

        ClimateReading {
            temperature_c: self.last_temperature_c,
            humidity_pct: self.last_humidity_pct,
            fresh: false,
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&self) -> Option<(f32, f32)> {
        crate::adapters::hardware::dht_read()
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&self) -> Option<(f32, f32)> {
        Some((
            f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed)),
            f32::from_bits(SIM_HUMIDITY_BITS.load(Ordering::Relaxed)),
        ))
    }
}
