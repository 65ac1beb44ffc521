//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: an optional entry and exit
//! action plus a **pure** evaluate function that proposes the desired next
//! state.  Evaluate never mutates anything; timing and commitment belong to
//! the [`TransitionArbiter`](super::arbiter::TransitionArbiter).
//!
//! ```text
//!  IDLE ──[armed]──▶ MONITORING ──[any trigger]──▶ ALERT
//!    ▲                  ▲  ▲                         │  │
//!    │                  │  └──────[all clear]────────┘  │
//!    │                  │                   [≥2 triggers or
//!    │                  │                    motion + gas line]
//!    │                  └──[alarm timeout]── ALARM ◀────┘
//!    │                                         │
//!    └────────────────[disarmed]───────────────┘   (from any state)
//! ```

use log::{info, warn};

use super::alarm;
use super::context::{EvalInput, SystemFlags};
use super::triggers::{Trigger, TriggerSet};
use super::{Cause, Evaluation, StateDescriptor, SystemState};
use crate::clock::Millis;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; SystemState::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: SystemState::Idle,
            name: "IDLE",
            on_enter: Some(idle_enter),
            on_exit: None,
            evaluate: idle_evaluate,
        },
        // Index 1: Monitoring
        StateDescriptor {
            id: SystemState::Monitoring,
            name: "MONITORING",
            on_enter: Some(monitoring_enter),
            on_exit: None,
            evaluate: monitoring_evaluate,
        },
        // Index 2: Alert
        StateDescriptor {
            id: SystemState::Alert,
            name: "ALERT",
            on_enter: Some(alert_enter),
            on_exit: None,
            evaluate: alert_evaluate,
        },
        // Index 3: Alarm
        StateDescriptor {
            id: SystemState::Alarm,
            name: "ALARM",
            on_enter: Some(alarm_enter),
            on_exit: Some(alarm_exit),
            evaluate: alarm_evaluate,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state: disarmed, only waiting for the arm command
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(flags: &mut SystemFlags, _now: Millis) {
    alarm::silence(flags);
    info!("IDLE: system disarmed, outputs off");
}

pub(crate) fn idle_evaluate(input: &EvalInput<'_>) -> Evaluation {
    if input.flags.armed {
        return Evaluation::to(SystemState::Monitoring, Cause::Armed);
    }
    Evaluation::stay(SystemState::Idle)
}

// ═══════════════════════════════════════════════════════════════════════════
//  MONITORING state: armed, watching every sensor
// ═══════════════════════════════════════════════════════════════════════════

fn monitoring_enter(_flags: &mut SystemFlags, _now: Millis) {
    info!("MONITORING: armed, watching motion / gas / temperature");
}

pub(crate) fn monitoring_evaluate(input: &EvalInput<'_>) -> Evaluation {
    if !input.flags.armed {
        return Evaluation::to(SystemState::Idle, Cause::Disarmed);
    }

    let observed = TriggerSet::observe(input);
    let mut raised = TriggerSet::EMPTY;
    if observed.contains(Trigger::Motion) {
        raised = raised | Trigger::Motion;
    }
    // The analog reading only counts while the digital line still says safe;
    // an unsafe line is its own trigger.
    if observed.contains(Trigger::GasOverThreshold) && input.sensors.gas_safe {
        raised = raised | Trigger::GasOverThreshold;
    }
    if observed.contains(Trigger::GasLineUnsafe) {
        raised = raised | Trigger::GasLineUnsafe;
    }
    if observed.contains(Trigger::TemperatureHigh) {
        raised = raised | Trigger::TemperatureHigh;
    }
    if observed.contains(Trigger::TemperatureLow) {
        raised = raised | Trigger::TemperatureLow;
    }

    if raised.is_empty() {
        Evaluation::stay(SystemState::Monitoring)
    } else {
        Evaluation::to(SystemState::Alert, Cause::Triggered).with_triggers(raised)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALERT state: one condition seen, deciding whether it is an alarm
// ═══════════════════════════════════════════════════════════════════════════

fn alert_enter(_flags: &mut SystemFlags, _now: Millis) {
    warn!("ALERT: trigger condition detected, alarm LED flashing");
}

pub(crate) fn alert_evaluate(input: &EvalInput<'_>) -> Evaluation {
    if !input.flags.armed {
        return Evaluation::to(SystemState::Idle, Cause::Disarmed);
    }

    let observed = TriggerSet::observe(input);

    // Escalation first: it wins over any simultaneous de-escalation.
    let multiple = observed.independent_count() >= 2;
    let intrusion_with_gas =
        observed.contains(Trigger::Motion) && observed.contains(Trigger::GasLineUnsafe);
    if multiple || intrusion_with_gas {
        return Evaluation::to(SystemState::Alarm, Cause::Escalated).with_triggers(observed);
    }

    if observed.is_empty() {
        return Evaluation::to(SystemState::Monitoring, Cause::Cleared);
    }

    // Persistent single trigger.
    Evaluation::stay(SystemState::Alert).with_triggers(observed)
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALARM state: buzzer on until disarm or timeout
// ═══════════════════════════════════════════════════════════════════════════

fn alarm_enter(flags: &mut SystemFlags, now: Millis) {
    alarm::start(flags, now);
    warn!("ALARM: multiple sensors triggered, buzzer on");
}

fn alarm_exit(flags: &mut SystemFlags, _now: Millis) {
    alarm::silence(flags);
}

pub(crate) fn alarm_evaluate(input: &EvalInput<'_>) -> Evaluation {
    if !input.flags.armed {
        return Evaluation::to(SystemState::Idle, Cause::Disarmed).silencing();
    }
    if alarm::expired(input.flags, input.now, input.config.alarm_timeout_ms) {
        return Evaluation::to(SystemState::Monitoring, Cause::AlarmTimeout).silencing();
    }
    Evaluation::stay(SystemState::Alarm)
}
