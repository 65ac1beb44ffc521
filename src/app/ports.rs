//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (pins, indicators, event sinks) implement these traits.
//! The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::fsm::SystemState;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
///
/// Reads are infallible at this boundary.  An adapter whose underlying pin
/// or ADC read fails reports the last good value.
pub trait SensorPort {
    /// Current PIR line level.  `true` = motion.
    fn read_motion_level(&mut self) -> bool;

    /// Current gas module digital line level.  `true` = safe.
    fn read_gas_level(&mut self) -> bool;

    /// Sample the thermistor and the analog gas channel together.
    /// Returns (°C, gas reading on the 10-bit scale).
    fn sample_temperature_and_gas_analog(&mut self) -> (f32, i32);
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the indicators.
pub trait ActuatorPort {
    /// Drive the alarm LED and buzzer for `state`.  Called after every
    /// committed transition and once per loop.  `blink_phase` is the tick
    /// toggle bit, used for the Alert flash.
    fn apply_state_outputs(&mut self, state: SystemState, alarm_active: bool, blink_phase: bool);

    /// Set the heartbeat status LED.
    fn set_status_led(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
