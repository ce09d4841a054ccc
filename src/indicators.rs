//! Indicator driver — LED blink phases and buzzer timing.
//!
//! Pure pattern logic ticked by the control loop; the resulting
//! [`IndicatorCommand`] is applied to GPIO by the hardware adapter. Channel
//! mapping:
//!
//! | Severity | green  | yellow | red    |
//! |----------|--------|--------|--------|
//! | NORMAL   | steady | off    | off    |
//! | WARNING  | off    | blink  | off    |
//! | CRITICAL | off    | off    | blink  |
//!
//! The buzzer is armed out-of-band by the alert machine (CRITICAL firing)
//! and sounds for a fixed duration from the *first* arm; re-arming while
//! sounding neither extends nor retriggers it.

use crate::alert::Severity;

/// Discrete on/off outputs for one tick. Fire-and-forget: the sink applies
/// them without replying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndicatorCommand {
    pub green: bool,
    pub yellow: bool,
    pub red: bool,
    pub buzzer: bool,
}

/// Owns blink phase and buzzer timing state.
pub struct IndicatorDriver {
    blink_interval_ms: u32,
    buzzer_duration_ms: u32,
    blink_phase: bool,
    last_toggle_ms: u64,
    buzzer_armed: bool,
    buzzer_armed_at: u64,
}

impl IndicatorDriver {
    pub fn new(blink_interval_ms: u32, buzzer_duration_ms: u32) -> Self {
        Self {
            blink_interval_ms,
            buzzer_duration_ms,
            blink_phase: false,
            last_toggle_ms: 0,
            buzzer_armed: false,
            buzzer_armed_at: 0,
        }
    }

    /// Arm the buzzer. No-op while already sounding — duration is fixed
    /// from the first arm.
    pub fn arm_buzzer(&mut self, now_ms: u64) {
        if !self.buzzer_armed {
            self.buzzer_armed = true;
            self.buzzer_armed_at = now_ms;
        }
    }

    /// Advance the blink phase and compute this tick's outputs.
    pub fn tick(&mut self, now_ms: u64, severity: Severity) -> IndicatorCommand {
        if now_ms.saturating_sub(self.last_toggle_ms) >= u64::from(self.blink_interval_ms) {
            self.last_toggle_ms = now_ms;
            self.blink_phase = !self.blink_phase;
        }

        if self.buzzer_armed
            && now_ms.saturating_sub(self.buzzer_armed_at) >= u64::from(self.buzzer_duration_ms)
        {
            self.buzzer_armed = false;
        }

        let mut cmd = IndicatorCommand {
            buzzer: self.buzzer_armed,
            ..IndicatorCommand::default()
        };
        match severity {
            Severity::Normal => cmd.green = true,
            Severity::Warning => cmd.yellow = self.blink_phase,
            Severity::Critical => cmd.red = self.blink_phase,
        }
        cmd
    }

    /// Whether the buzzer is currently sounding.
    pub fn buzzer_active(&self) -> bool {
        self.buzzer_armed
    }

    /// Startup self-test: everything on briefly so a bench check catches a
    /// dead LED or buzzer before deployment.
    pub fn self_test_command() -> IndicatorCommand {
        IndicatorCommand {
            green: true,
            yellow: true,
            red: true,
            buzzer: true,
        }
    }
}
