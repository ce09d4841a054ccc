//! Structured alert clauses and text rendering.
//!
//! The core records *what* fired as `(condition, value)` pairs; only this
//! module turns them into notification text. Keeping formatting out of the
//! machine lets a different presentation layer (SMS vs. dashboard) render
//! the same clauses its own way.

use core::fmt::Write;

use heapless::{String, Vec};

use super::ConditionId;

/// Rendered message capacity — ten worst-case clauses plus the prefix.
const MESSAGE_CAP: usize = 512;

/// The measured value a clause carries, tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClauseValue {
    /// Temperature in °C.
    Celsius(f32),
    /// Relative humidity in %.
    Percent(f32),
    /// Raw gas-channel ADC counts.
    Counts(u16),
    /// Particulate concentration in µg/m³.
    Micrograms(u16),
}

/// One firing condition with its measured value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertClause {
    pub id: ConditionId,
    pub value: ClauseValue,
}

/// Ordered clauses composed for one notification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertMessage {
    pub clauses: Vec<AlertClause, { ConditionId::COUNT }>,
}

impl AlertMessage {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render to the notification wire text, e.g.
    /// `ALERT: High temperature: 32.0C. Combustible gas detected: 650. `
    ///
    /// A message that cannot fit is truncated at a clause boundary rather
    /// than dropped.
    pub fn render(&self) -> String<MESSAGE_CAP> {
        let mut out: String<MESSAGE_CAP> = String::new();
        let _ = out.push_str("ALERT: ");
        for clause in &self.clauses {
            let mut piece: String<64> = String::new();
            if write_clause(&mut piece, clause).is_err() {
                continue;
            }
            if out.push_str(&piece).is_err() {
                log::warn!("alert text truncated at {} clauses", self.clauses.len());
                break;
            }
        }
        out
    }
}

fn write_clause(out: &mut String<64>, clause: &AlertClause) -> core::fmt::Result {
    match (clause.id, clause.value) {
        (ConditionId::TempHigh, ClauseValue::Celsius(v)) => {
            write!(out, "High temperature: {v:.1}C. ")
        }
        (ConditionId::TempLow, ClauseValue::Celsius(v)) => {
            write!(out, "Low temperature: {v:.1}C. ")
        }
        (ConditionId::HumidityHigh, ClauseValue::Percent(v)) => {
            write!(out, "High humidity: {v:.1}%. ")
        }
        (ConditionId::HumidityLow, ClauseValue::Percent(v)) => {
            write!(out, "Low humidity: {v:.1}%. ")
        }
        (ConditionId::AirQuality, ClauseValue::Counts(v)) => {
            write!(out, "Poor air quality: {v}. ")
        }
        (ConditionId::CombustibleGas, ClauseValue::Counts(v)) => {
            write!(out, "Combustible gas detected: {v}. ")
        }
        (ConditionId::Methane, ClauseValue::Counts(v)) => {
            write!(out, "Methane detected: {v}. ")
        }
        (ConditionId::CarbonMonoxide, ClauseValue::Counts(v)) => {
            write!(out, "CO/combustible gas detected: {v}. ")
        }
        (ConditionId::Pm25High, ClauseValue::Micrograms(v)) => {
            write!(out, "High PM2.5: {v}ug/m3. ")
        }
        (ConditionId::Pm10High, ClauseValue::Micrograms(v)) => {
            write!(out, "High PM10: {v}ug/m3. ")
        }
        // Mismatched unit — the condition table guarantees this is
        // unreachable; render nothing rather than lie about units.
        _ => Err(core::fmt::Error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_temperature_clause() {
        let mut msg = AlertMessage::default();
        msg.clauses
            .push(AlertClause {
                id: ConditionId::TempHigh,
                value: ClauseValue::Celsius(32.0),
            })
            .unwrap();
        assert_eq!(msg.render().as_str(), "ALERT: High temperature: 32.0C. ");
    }

    #[test]
    fn concatenates_clauses_in_order() {
        let mut msg = AlertMessage::default();
        msg.clauses
            .push(AlertClause {
                id: ConditionId::TempLow,
                value: ClauseValue::Celsius(2.5),
            })
            .unwrap();
        msg.clauses
            .push(AlertClause {
                id: ConditionId::CombustibleGas,
                value: ClauseValue::Counts(650),
            })
            .unwrap();
        assert_eq!(
            msg.render().as_str(),
            "ALERT: Low temperature: 2.5C. Combustible gas detected: 650. "
        );
    }

    #[test]
    fn mismatched_unit_renders_nothing() {
        let mut msg = AlertMessage::default();
        msg.clauses
            .push(AlertClause {
                id: ConditionId::TempHigh,
                value: ClauseValue::Counts(3),
            })
            .unwrap();
        assert_eq!(msg.render().as_str(), "ALERT: ");
    }
}
