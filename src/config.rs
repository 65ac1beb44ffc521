//! System configuration parameters
//!
//! All tunable parameters for the HomeWatch controller.  Defaults match the
//! bench-tested board; a validated override can be pushed at runtime with
//! the `CONFIG {json}` serial command.  Nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fsm::SystemState;

/// Per-target stability windows for the transition arbiter (ms).
///
/// Windows grow with severity: `idle <= alert <= monitoring <= alarm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionWindows {
    pub idle_ms: u32,
    pub monitoring_ms: u32,
    pub alert_ms: u32,
    pub alarm_ms: u32,
}

impl TransitionWindows {
    /// Debounce window for a transition *into* `target`.
    pub const fn for_target(&self, target: SystemState) -> u32 {
        match target {
            SystemState::Idle => self.idle_ms,
            SystemState::Monitoring => self.monitoring_ms,
            SystemState::Alert => self.alert_ms,
            SystemState::Alarm => self.alarm_ms,
        }
    }
}

impl Default for TransitionWindows {
    fn default() -> Self {
        Self {
            idle_ms: 100,
            monitoring_ms: 1_000,
            alert_ms: 500,
            alarm_ms: 2_000,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Debounce / timing ---
    /// Minimum gap between committed changes on one digital line (ms).
    pub debounce_delay_ms: u32,
    /// Alarm duration before automatic retreat to Monitoring (ms).
    pub alarm_timeout_ms: u32,
    /// Temperature / analog gas polling interval (ms).
    pub temp_read_interval_ms: u32,
    /// Compact status line interval while not Idle (ms).
    pub status_update_interval_ms: u32,
    /// Period of the hardware tick timer (ms).  Fixed at boot: the timer is
    /// armed once, so a runtime override must carry the running value.
    pub tick_period_ms: u32,
    /// Arbiter windows per target state.
    pub transitions: TransitionWindows,

    // --- Thresholds ---
    /// Analog gas reading (10-bit counts) above which gas is a trigger.
    pub gas_warning_threshold: i32,
    /// Temperature above which the room is out of range (°C).
    pub temp_high_warning_c: f32,
    /// Temperature below which the room is out of range (°C).
    pub temp_low_warning_c: f32,

    // --- Reporting ---
    /// Minimum analog gas change worth a log line (counts).
    pub gas_report_delta: i32,
    /// Minimum temperature change worth a log line (°C).
    pub temp_report_delta_c: f32,
    /// Report every sample and every committed edge.
    pub verbose_logging: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            debounce_delay_ms: 50,
            alarm_timeout_ms: 10_000,
            temp_read_interval_ms: 2_000,
            status_update_interval_ms: 500,
            tick_period_ms: 1_000,
            transitions: TransitionWindows::default(),

            // Thresholds
            gas_warning_threshold: 500,
            temp_high_warning_c: 35.0,
            temp_low_warning_c: 5.0,

            // Reporting
            gas_report_delta: 25,
            temp_report_delta_c: 0.5,
            verbose_logging: false,
        }
    }
}

impl SystemConfig {
    /// Reject values that would make the controller misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_delay_ms == 0 {
            return Err(ConfigError::ValidationFailed("debounce_delay_ms must be > 0"));
        }
        if self.alarm_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("alarm_timeout_ms must be > 0"));
        }
        if self.temp_read_interval_ms == 0
            || self.status_update_interval_ms == 0
            || self.tick_period_ms == 0
        {
            return Err(ConfigError::ValidationFailed("intervals must be > 0"));
        }
        if !self.temp_low_warning_c.is_finite()
            || !self.temp_high_warning_c.is_finite()
            || self.temp_low_warning_c >= self.temp_high_warning_c
        {
            return Err(ConfigError::ValidationFailed(
                "temp_low_warning_c must be below temp_high_warning_c",
            ));
        }
        if self.gas_warning_threshold < 0 {
            return Err(ConfigError::ValidationFailed("gas_warning_threshold must be >= 0"));
        }
        if self.gas_report_delta < 0 || self.temp_report_delta_c < 0.0 {
            return Err(ConfigError::ValidationFailed("report deltas must be >= 0"));
        }

        let w = &self.transitions;
        if !(w.idle_ms <= w.alert_ms && w.alert_ms <= w.monitoring_ms && w.monitoring_ms <= w.alarm_ms) {
            return Err(ConfigError::ValidationFailed(
                "transition windows must satisfy idle <= alert <= monitoring <= alarm",
            ));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON override and validate it.
    ///
    /// Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }
}
