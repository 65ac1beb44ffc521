//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (log to serial, forward elsewhere).

use serde::Serialize;

use crate::error::CommandError;
use crate::fsm::triggers::TriggerSet;
use crate::fsm::{Cause, SystemState};
use crate::sensors::SensorNotice;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started.
    Started { state: SystemState, armed: bool },

    /// The FSM committed a transition.
    StateChanged {
        from: SystemState,
        to: SystemState,
        cause: Cause,
        triggers: TriggerSet,
    },

    /// The commit stage has something to report.
    Sensor(SensorNotice),

    /// Status report.  `full` for the STATUS command, compact for the
    /// periodic line.
    Status { report: StatusReport, full: bool },

    /// Periodic "still watching" line driven by the tick.
    Heartbeat { ticks: u32, state: SystemState },

    Armed,
    Disarmed,
    VerboseChanged(bool),
    ConfigUpdated,

    /// An operator command was refused.
    CommandRejected(CommandError),
}

/// A point-in-time status snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusReport {
    pub state: SystemState,
    pub armed: bool,
    pub alarm_active: bool,
    pub motion_active: bool,
    pub gas_safe: bool,
    pub temperature_c: f32,
    pub gas_reading: i32,
    pub uptime_secs: u32,
    /// Target of the transition being held, if any.
    pub pending: Option<SystemState>,
}
