//! Alert correlation — conditions, severity merge, and the alert machine.
//!
//! Ten independent threshold conditions are evaluated once per polling
//! cycle against the latest [`SensorSnapshot`](crate::sensors::SensorSnapshot).
//! Each condition latches with a notification cooldown and clears the
//! moment its comparison stops holding (asymmetric hysteresis: trigger is
//! cooldown-gated, recovery is instantaneous). The per-cycle severity is
//! the maximum over conditions firing this cycle, held while any condition
//! remains latched.

pub mod conditions;
pub mod machine;
pub mod message;

pub use conditions::{evaluate, Evaluation};
pub use machine::{AlertStateMachine, CycleOutcome};
pub use message::{AlertClause, AlertMessage};

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Ordered alert tier. Derives `Ord` so the per-cycle merge is a plain
/// `max` over fired conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl core::fmt::Display for Severity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ---------------------------------------------------------------------------
// Condition identity
// ---------------------------------------------------------------------------

/// One independently tracked threshold check.
/// Must stay in sync with the table in [`conditions::CONDITIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConditionId {
    TempHigh = 0,
    TempLow = 1,
    HumidityHigh = 2,
    HumidityLow = 3,
    AirQuality = 4,
    CombustibleGas = 5,
    Methane = 6,
    CarbonMonoxide = 7,
    Pm25High = 8,
    Pm10High = 9,
}

impl ConditionId {
    /// Total number of conditions — sizes the state table.
    pub const COUNT: usize = 10;

    /// All conditions in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::TempHigh,
        Self::TempLow,
        Self::HumidityHigh,
        Self::HumidityLow,
        Self::AirQuality,
        Self::CombustibleGas,
        Self::Methane,
        Self::CarbonMonoxide,
        Self::Pm25High,
        Self::Pm10High,
    ];
}

// ---------------------------------------------------------------------------
// Per-condition latch state
// ---------------------------------------------------------------------------

/// Latch and cooldown bookkeeping for a single condition.
///
/// Owned exclusively by [`AlertStateMachine`]; mutated only when an
/// [`Evaluation`] is applied, cleared only by explicit recovery.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionState {
    /// The condition's comparison held on the most recent cycle it was
    /// examined (latched until recovery).
    pub active: bool,
    /// Timestamp (ms) of the last notification-producing firing.
    pub last_triggered_at: u64,
}
