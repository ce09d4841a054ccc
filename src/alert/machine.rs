//! Alert state machine — latch ownership and per-cycle transition rule.
//!
//! States mirror [`Severity`]: NORMAL, WARNING, CRITICAL. There is no
//! terminal state; the machine is re-entered every polling cycle and NORMAL
//! is both the initial and a recurring steady state.
//!
//! Transition rule per cycle:
//! 1. Apply an [`Evaluation`] (produced by [`evaluate`](super::evaluate)).
//! 2. Anything fired → severity = max over *fired* severities, compose one
//!    message with a clause per firing, request the buzzer on CRITICAL.
//! 3. Nothing fired but a latch still active (cooldown, comparison still
//!    true) → severity holds, no notification.
//! 4. Nothing fired, nothing active → NORMAL.
//!
//! Cooldown timestamps are written here, before any notifier I/O happens —
//! an unreachable notifier therefore never rolls a firing back.

use log::{info, warn};

use super::conditions::Evaluation;
use super::message::{AlertClause, AlertMessage};
use super::{ConditionId, ConditionState, Severity};

/// What one evaluation cycle decided.
#[derive(Debug, Clone, Default)]
pub struct CycleOutcome {
    /// Severity after this cycle.
    pub severity: Severity,
    /// Composed notification for this cycle's firings, if any fired.
    pub message: Option<AlertMessage>,
    /// The buzzer should be armed (CRITICAL firing this cycle).
    pub arm_buzzer: bool,
}

/// Owns the per-condition latch table and the current severity.
pub struct AlertStateMachine {
    states: [ConditionState; ConditionId::COUNT],
    severity: Severity,
}

impl AlertStateMachine {
    pub fn new() -> Self {
        Self {
            states: [ConditionState::default(); ConditionId::COUNT],
            severity: Severity::Normal,
        }
    }

    /// Apply one cycle's evaluation, mutating latches and severity.
    pub fn apply(&mut self, eval: &Evaluation, now_ms: u64) -> CycleOutcome {
        for &id in &eval.cleared {
            self.states[id as usize].active = false;
            info!("condition cleared: {:?}", id);
        }

        if eval.fired.is_empty() {
            if !self.any_active() {
                self.severity = Severity::Normal;
            }
            // Otherwise: hold severity through the cooldown window.
            return CycleOutcome {
                severity: self.severity,
                message: None,
                arm_buzzer: false,
            };
        }

        let mut message = AlertMessage::default();
        let mut new_severity = Severity::Normal;

        // Severity merge happens after every condition is applied — a later
        // lower-severity firing must not mask an earlier higher one.
        for firing in &eval.fired {
            let state = &mut self.states[firing.id as usize];
            state.active = true;
            state.last_triggered_at = now_ms;

            new_severity = new_severity.max(firing.severity);
            let _ = message.clauses.push(AlertClause {
                id: firing.id,
                value: firing.value,
            });
        }

        self.severity = new_severity;
        warn!(
            "alert triggered: {} condition(s), severity {}",
            eval.fired.len(),
            new_severity
        );

        CycleOutcome {
            severity: new_severity,
            message: Some(message),
            arm_buzzer: new_severity == Severity::Critical,
        }
    }

    /// Current severity tier.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Latch state for one condition.
    pub fn state(&self, id: ConditionId) -> ConditionState {
        self.states[id as usize]
    }

    /// Snapshot of the whole latch table (for the evaluator).
    pub fn states(&self) -> &[ConditionState; ConditionId::COUNT] {
        &self.states
    }

    /// True if any condition is currently latched.
    pub fn any_active(&self) -> bool {
        self.states.iter().any(|s| s.active)
    }
}

impl Default for AlertStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
