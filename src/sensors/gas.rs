//! MQ-series analog gas sensor driver.
//!
//! Four channels share one driver: the MQ sensors differ only in which gas
//! their heater/load resistor combination favours, and the alert layer
//! compares raw ADC counts against per-channel thresholds, so no ppm
//! conversion happens here.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the channel's ADC1 input via the hardware adapter.
//! On host/test: reads from per-channel static atomics for injection.

use core::sync::atomic::{AtomicU16, Ordering};

/// Which gas channel a [`GasSensor`] samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum GasChannel {
    /// MQ-135 — general air quality.
    AirQuality = 0,
    /// MQ-2 — combustible gas / smoke.
    Combustible = 1,
    /// MQ-4 — methane.
    Methane = 2,
    /// MQ-9 — carbon monoxide / combustible gas.
    CarbonMonoxide = 3,
}

pub const GAS_CHANNEL_COUNT: usize = 4;

static SIM_GAS_ADC: [AtomicU16; GAS_CHANNEL_COUNT] = [
    AtomicU16::new(0),
    AtomicU16::new(0),
    AtomicU16::new(0),
    AtomicU16::new(0),
];

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_gas_adc(channel: GasChannel, raw: u16) {
    SIM_GAS_ADC[channel as usize].store(raw, Ordering::Relaxed);
}

pub struct GasSensor {
    channel: GasChannel,
    last: u16,
}

impl GasSensor {
    pub fn new(channel: GasChannel) -> Self {
        Self { channel, last: 0 }
    }

    /// Sample the channel. Analog reads cannot fail mid-flight, so the
    /// value is always considered valid.
    pub fn read(&mut self) -> u16 {
        self.last = self.read_adc();
        self.last
    }

    pub fn last_reading(&self) -> u16 {
        self.last
    }

    pub fn channel(&self) -> GasChannel {
        self.channel
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        crate::adapters::hardware::gas_adc_read(self.channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_GAS_ADC[self.channel as usize].load(Ordering::Relaxed)
    }
}
