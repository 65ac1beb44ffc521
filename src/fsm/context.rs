//! Data the state machine reads from and writes to.
//!
//! [`SensorSnapshot`] is the authoritative, debounced view of the world.
//! Only the commit stage writes it; the evaluator and arbiter borrow it
//! read-only.  [`SystemFlags`] is the arming posture plus alarm and
//! transition bookkeeping, owned by the application service.

use crate::clock::Millis;
use crate::config::SystemConfig;

// ---------------------------------------------------------------------------
// Sensor snapshot (read-only to state handlers; written by the commit stage)
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of every sensor in the system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    /// PIR motion line, debounced.
    pub motion_active: bool,
    /// Gas digital line, debounced.  `true` = below the module's trip point.
    pub gas_safe: bool,
    /// Motion value before the last committed change.
    pub motion_previous: bool,
    /// Gas line value before the last committed change.
    pub gas_previous: bool,
    /// Analog gas reading, 10-bit counts.
    pub gas_reading: i32,
    /// Room temperature (°C).
    pub temperature_c: f32,
    /// Time of the last committed motion change.
    pub motion_last_change: Millis,
    /// Time of the last committed gas line change.
    pub gas_last_change: Millis,
    /// Time of the last analog poll.
    pub last_sample_time: Millis,
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self {
            motion_active: false,
            gas_safe: true,
            motion_previous: false,
            gas_previous: true,
            gas_reading: 0,
            temperature_c: 20.0,
            motion_last_change: 0,
            gas_last_change: 0,
            last_sample_time: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// System flags
// ---------------------------------------------------------------------------

/// Arming posture and alarm bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemFlags {
    /// Set by the arming collaborator only.
    pub armed: bool,
    /// Buzzer-worthy alarm in progress.
    pub alarm_active: bool,
    /// When the current alarm started; meaningful while `alarm_active`.
    pub alarm_start_time: Millis,
    /// When the last committed transition happened.
    pub last_state_change_time: Millis,
}

// ---------------------------------------------------------------------------
// Evaluator input
// ---------------------------------------------------------------------------

/// Everything a state's evaluate function may look at.  Borrowed, never
/// mutated: evaluation is a pure function of this value.
#[derive(Debug, Clone, Copy)]
pub struct EvalInput<'a> {
    pub sensors: &'a SensorSnapshot,
    pub flags: &'a SystemFlags,
    pub config: &'a SystemConfig,
    pub now: Millis,
}

impl EvalInput<'_> {
    /// Analog gas reading above the warning threshold.
    pub fn gas_over_threshold(&self) -> bool {
        self.sensors.gas_reading > self.config.gas_warning_threshold
    }

    pub fn temperature_high(&self) -> bool {
        self.sensors.temperature_c > self.config.temp_high_warning_c
    }

    pub fn temperature_low(&self) -> bool {
        self.sensors.temperature_c < self.config.temp_low_warning_c
    }

    /// Temperature outside the comfort band on either side.
    pub fn temperature_out_of_range(&self) -> bool {
        self.temperature_high() || self.temperature_low()
    }
}
