//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every driver and produces a [`SensorSnapshot`] each polling
//! cycle. Individual read failures are logged and the previous good value
//! is retained — a single flaky sensor must not block alerting on the rest.

pub mod dht;
pub mod gas;
pub mod particulate;

use dht::DhtSensor;
use gas::{GasChannel, GasSensor};
use particulate::{ParticulateLink, PmsSensor};

/// A point-in-time snapshot of every sensor in the system.
///
/// Ephemeral and read-only for the evaluation cycle that consumes it;
/// produced fresh each cycle, never retained.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Ambient temperature (°C).
    pub temperature_c: f32,
    /// Relative humidity (%RH).
    pub humidity_pct: f32,

    /// MQ-135 air quality channel (raw ADC counts).
    pub mq135: u16,
    /// MQ-2 combustible gas channel.
    pub mq2: u16,
    /// MQ-4 methane channel.
    pub mq4: u16,
    /// MQ-9 CO / combustible gas channel.
    pub mq9: u16,

    /// PM2.5 concentration, last-known-good (µg/m³, CF=1).
    pub pm25: u16,
    /// PM10 concentration, last-known-good (µg/m³, CF=1).
    pub pm10: u16,
    /// The PM values come from a frame validated this cycle.
    pub pm_valid: bool,
}

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub<L: ParticulateLink> {
    pub dht: DhtSensor,
    pub mq135: GasSensor,
    pub mq2: GasSensor,
    pub mq4: GasSensor,
    pub mq9: GasSensor,
    pub pms: PmsSensor<L>,
}

impl<L: ParticulateLink> SensorHub<L> {
    /// Construct a new hub. Pass in pre-built drivers (built in main where
    /// peripheral ownership is established).
    pub fn new(dht: DhtSensor, pms: PmsSensor<L>) -> Self {
        Self {
            dht,
            mq135: GasSensor::new(GasChannel::AirQuality),
            mq2: GasSensor::new(GasChannel::Combustible),
            mq4: GasSensor::new(GasChannel::Methane),
            mq9: GasSensor::new(GasChannel::CarbonMonoxide),
            pms,
        }
    }

    /// Read every sensor and return a unified snapshot.
    pub fn read_all(&mut self, now_ms: u64) -> SensorSnapshot {
        let climate = self.dht.read(now_ms);
        let _ = self.pms.read();

        SensorSnapshot {
            temperature_c: climate.temperature_c,
            humidity_pct: climate.humidity_pct,
            mq135: self.mq135.read(),
            mq2: self.mq2.read(),
            mq4: self.mq4.read(),
            mq9: self.mq9.read(),
            pm25: self.pms.pm25(),
            pm10: self.pms.pm10(),
            pm_valid: self.pms.is_data_valid(),
        }
    }
}
