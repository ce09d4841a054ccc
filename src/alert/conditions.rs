//! Static condition table and the pure threshold evaluator.
//!
//! Each condition is one row: a comparison function, a fixed severity
//! class, and the unit its clause carries. The table is the single source
//! of truth — the machine, the message renderer, and the tests all index
//! it by [`ConditionId`].
//!
//! Severity classes follow the physical risk: sudden temperature or
//! combustible/toxic gas excursions are life-safety-critical, while stale
//! air and particulates are a degraded-comfort warning.

use crate::config::SystemConfig;
use crate::sensors::SensorSnapshot;

use super::message::ClauseValue;
use super::{ConditionId, ConditionState, Severity};

// ---------------------------------------------------------------------------
// Condition descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Comparison function: `Some(value)` iff the condition's comparison holds
/// against the snapshot. Invalid data never holds.
pub type ConditionCheckFn = fn(&SensorSnapshot, &SystemConfig) -> Option<ClauseValue>;

/// Static descriptor for a single threshold condition.
pub struct ConditionSpec {
    pub id: ConditionId,
    pub name: &'static str,
    pub severity: Severity,
    pub check: ConditionCheckFn,
}

/// The full condition table, indexed by `ConditionId as usize`.
pub static CONDITIONS: [ConditionSpec; ConditionId::COUNT] = [
    ConditionSpec {
        id: ConditionId::TempHigh,
        name: "temperature high",
        severity: Severity::Critical,
        check: |s, c| (s.temperature_c > c.temp_high_c).then_some(ClauseValue::Celsius(s.temperature_c)),
    },
    ConditionSpec {
        id: ConditionId::TempLow,
        name: "temperature low",
        severity: Severity::Critical,
        check: |s, c| (s.temperature_c < c.temp_low_c).then_some(ClauseValue::Celsius(s.temperature_c)),
    },
    ConditionSpec {
        id: ConditionId::HumidityHigh,
        name: "humidity high",
        severity: Severity::Warning,
        check: |s, c| {
            (s.humidity_pct > c.humidity_high_pct).then_some(ClauseValue::Percent(s.humidity_pct))
        },
    },
    ConditionSpec {
        id: ConditionId::HumidityLow,
        name: "humidity low",
        severity: Severity::Warning,
        check: |s, c| {
            (s.humidity_pct < c.humidity_low_pct).then_some(ClauseValue::Percent(s.humidity_pct))
        },
    },
    ConditionSpec {
        id: ConditionId::AirQuality,
        name: "air quality (MQ135)",
        severity: Severity::Warning,
        check: |s, c| (s.mq135 > c.mq135_threshold).then_some(ClauseValue::Counts(s.mq135)),
    },
    ConditionSpec {
        id: ConditionId::CombustibleGas,
        name: "combustible gas (MQ2)",
        severity: Severity::Critical,
        check: |s, c| (s.mq2 > c.mq2_threshold).then_some(ClauseValue::Counts(s.mq2)),
    },
    ConditionSpec {
        id: ConditionId::Methane,
        name: "methane (MQ4)",
        severity: Severity::Critical,
        check: |s, c| (s.mq4 > c.mq4_threshold).then_some(ClauseValue::Counts(s.mq4)),
    },
    ConditionSpec {
        id: ConditionId::CarbonMonoxide,
        name: "CO (MQ9)",
        severity: Severity::Critical,
        check: |s, c| (s.mq9 > c.mq9_threshold).then_some(ClauseValue::Counts(s.mq9)),
    },
    ConditionSpec {
        id: ConditionId::Pm25High,
        name: "PM2.5",
        severity: Severity::Warning,
        check: |s, c| {
            (s.pm_valid && s.pm25 > c.pm25_threshold).then_some(ClauseValue::Micrograms(s.pm25))
        },
    },
    ConditionSpec {
        id: ConditionId::Pm10High,
        name: "PM10",
        severity: Severity::Warning,
        check: |s, c| {
            (s.pm_valid && s.pm10 > c.pm10_threshold).then_some(ClauseValue::Micrograms(s.pm10))
        },
    },
];

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// One condition that fires a notification this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Firing {
    pub id: ConditionId,
    pub severity: Severity,
    pub value: ClauseValue,
}

/// Result of evaluating all ten conditions against one snapshot.
///
/// Conditions in neither set are unchanged: either quiescent, or latched
/// active inside their cooldown window with the comparison still holding.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    /// Conditions firing a notification this cycle (comparison holds, and
    /// either newly active or past cooldown).
    pub fired: heapless::Vec<Firing, { ConditionId::COUNT }>,
    /// Previously active conditions whose comparison no longer holds.
    pub cleared: heapless::Vec<ConditionId, { ConditionId::COUNT }>,
}

/// Evaluate every condition independently. Pure: reads the prior states,
/// mutates nothing — the machine applies the result.
pub fn evaluate(
    snapshot: &SensorSnapshot,
    states: &[ConditionState; ConditionId::COUNT],
    config: &SystemConfig,
    now_ms: u64,
) -> Evaluation {
    let mut eval = Evaluation::default();

    for spec in &CONDITIONS {
        let state = &states[spec.id as usize];
        match (spec.check)(snapshot, config) {
            Some(value) => {
                let past_cooldown = now_ms.saturating_sub(state.last_triggered_at)
                    > config.alert_cooldown_ms;
                if !state.active || past_cooldown {
                    // Vec is sized to hold every condition; push cannot fail.
                    let _ = eval.fired.push(Firing {
                        id: spec.id,
                        severity: spec.severity,
                        value,
                    });
                }
                // Holding within cooldown: stays active, no re-fire.
            }
            None if state.active => {
                let _ = eval.cleared.push(spec.id);
            }
            None => {}
        }
    }

    eval
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::message::ClauseValue;

    fn quiet_snapshot() -> SensorSnapshot {
        SensorSnapshot {
            temperature_c: 22.0,
            humidity_pct: 50.0,
            mq135: 300,
            mq2: 200,
            mq4: 200,
            mq9: 200,
            pm25: 10,
            pm10: 20,
            pm_valid: true,
        }
    }

    fn fresh_states() -> [ConditionState; ConditionId::COUNT] {
        [ConditionState::default(); ConditionId::COUNT]
    }

    #[test]
    fn table_order_matches_condition_ids() {
        for (i, spec) in CONDITIONS.iter().enumerate() {
            assert_eq!(spec.id as usize, i, "row {} out of order", i);
        }
    }

    #[test]
    fn quiet_snapshot_fires_nothing() {
        let eval = evaluate(&quiet_snapshot(), &fresh_states(), &SystemConfig::default(), 0);
        assert!(eval.fired.is_empty());
        assert!(eval.cleared.is_empty());
    }

    #[test]
    fn temp_high_fires_critical_with_value() {
        let mut snap = quiet_snapshot();
        snap.temperature_c = 32.0;
        let eval = evaluate(&snap, &fresh_states(), &SystemConfig::default(), 0);
        assert_eq!(eval.fired.len(), 1);
        let firing = eval.fired[0];
        assert_eq!(firing.id, ConditionId::TempHigh);
        assert_eq!(firing.severity, Severity::Critical);
        assert_eq!(firing.value, ClauseValue::Celsius(32.0));
    }

    #[test]
    fn within_cooldown_does_not_refire() {
        let mut snap = quiet_snapshot();
        snap.mq2 = 650;
        let mut states = fresh_states();
        states[ConditionId::CombustibleGas as usize] = ConditionState {
            active: true,
            last_triggered_at: 0,
        };
        // 10 s after the firing — well inside the 1 h window.
        let eval = evaluate(&snap, &states, &SystemConfig::default(), 10_000);
        assert!(eval.fired.is_empty());
        assert!(eval.cleared.is_empty());
    }

    #[test]
    fn past_cooldown_refires_while_still_holding() {
        let mut snap = quiet_snapshot();
        snap.mq2 = 650;
        let mut states = fresh_states();
        states[ConditionId::CombustibleGas as usize] = ConditionState {
            active: true,
            last_triggered_at: 0,
        };
        let config = SystemConfig::default();
        let eval = evaluate(&snap, &states, &config, config.alert_cooldown_ms + 1);
        assert_eq!(eval.fired.len(), 1);
        assert_eq!(eval.fired[0].id, ConditionId::CombustibleGas);
    }

    #[test]
    fn clearing_is_instantaneous() {
        let mut states = fresh_states();
        states[ConditionId::TempHigh as usize] = ConditionState {
            active: true,
            last_triggered_at: 5_000,
        };
        // Comparison no longer holds one cycle later — no cooldown on recovery.
        let eval = evaluate(&quiet_snapshot(), &states, &SystemConfig::default(), 6_000);
        assert!(eval.fired.is_empty());
        assert_eq!(eval.cleared.as_slice(), &[ConditionId::TempHigh]);
    }

    #[test]
    fn invalid_pm_never_fires() {
        let mut snap = quiet_snapshot();
        snap.pm25 = 30; // above the 25 threshold
        snap.pm10 = 80;
        snap.pm_valid = false;
        let eval = evaluate(&snap, &fresh_states(), &SystemConfig::default(), 0);
        assert!(eval.fired.is_empty());
    }

    #[test]
    fn invalid_pm_clears_a_latched_condition() {
        let mut snap = quiet_snapshot();
        snap.pm25 = 30;
        snap.pm_valid = false;
        let mut states = fresh_states();
        states[ConditionId::Pm25High as usize].active = true;
        let eval = evaluate(&snap, &states, &SystemConfig::default(), 0);
        assert_eq!(eval.cleared.as_slice(), &[ConditionId::Pm25High]);
    }

    #[test]
    fn boundary_values_do_not_fire() {
        let mut snap = quiet_snapshot();
        let config = SystemConfig::default();
        // Strict comparisons: exactly-at-threshold is not an excursion.
        snap.temperature_c = config.temp_high_c;
        snap.humidity_pct = config.humidity_high_pct;
        snap.mq2 = config.mq2_threshold;
        snap.pm25 = config.pm25_threshold;
        let eval = evaluate(&snap, &fresh_states(), &config, 0);
        assert!(eval.fired.is_empty());
    }

    #[test]
    fn multiple_conditions_fire_together() {
        let mut snap = quiet_snapshot();
        snap.temperature_c = 35.0;
        snap.humidity_pct = 90.0;
        snap.mq4 = 700;
        let eval = evaluate(&snap, &fresh_states(), &SystemConfig::default(), 0);
        let ids: Vec<ConditionId> = eval.fired.iter().map(|f| f.id).collect();
        assert_eq!(
            ids,
            vec![
                ConditionId::TempHigh,
                ConditionId::HumidityHigh,
                ConditionId::Methane
            ]
        );
    }
}
