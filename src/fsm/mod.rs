//! Function-pointer finite state machine engine.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌────────────┬────────────┬────────────┬─────────────────┐  │
//! │  │ SystemState│ on_enter   │ on_exit    │ evaluate        │  │
//! │  ├────────────┼────────────┼────────────┼─────────────────┤  │
//! │  │ Idle       │ fn(flags)  │ -          │ fn(&in)->Eval   │  │
//! │  │ Monitoring │ fn(flags)  │ -          │ fn(&in)->Eval   │  │
//! │  │ Alert      │ fn(flags)  │ -          │ fn(&in)->Eval   │  │
//! │  │ Alarm      │ fn(flags)  │ fn(flags)  │ fn(&in)->Eval   │  │
//! │  └────────────┴────────────┴────────────┴─────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A cycle is two steps.  [`Fsm::evaluate`] calls the current state's
//! pure `evaluate` and returns an [`Evaluation`].  [`Fsm::advance`] hands
//! the desired state to the [`TransitionArbiter`]; only when the arbiter
//! reports a commit does the engine run `on_exit` for the current state,
//! then `on_enter` for the next, and move the current pointer.

pub mod alarm;
pub mod arbiter;
pub mod context;
pub mod states;
pub mod triggers;

use core::fmt;

use log::info;
use serde::Serialize;

use crate::clock::Millis;
use crate::config::TransitionWindows;
use arbiter::{Arbitration, PendingTransition, TransitionArbiter};
use context::{EvalInput, SystemFlags};
use triggers::TriggerSet;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all possible system states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum SystemState {
    Idle = 0,
    Monitoring = 1,
    Alert = 2,
    Alarm = 3,
}

impl SystemState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 4;

    pub const ALL: [SystemState; Self::COUNT] = [
        SystemState::Idle,
        SystemState::Monitoring,
        SystemState::Alert,
        SystemState::Alarm,
    ];

    /// Convert an index back to `SystemState`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Monitoring,
            2 => Self::Alert,
            3 => Self::Alarm,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Monitoring => "MONITORING",
            Self::Alert => "ALERT",
            Self::Alarm => "ALARM",
        }
    }
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Evaluation result
// ---------------------------------------------------------------------------

/// Why the evaluator asked for a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// Desired equals current.
    Hold,
    Armed,
    Disarmed,
    Triggered,
    Escalated,
    Cleared,
    AlarmTimeout,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hold => write!(f, "hold"),
            Self::Armed => write!(f, "armed"),
            Self::Disarmed => write!(f, "disarmed"),
            Self::Triggered => write!(f, "sensor triggered"),
            Self::Escalated => write!(f, "multiple triggers"),
            Self::Cleared => write!(f, "all clear"),
            Self::AlarmTimeout => write!(f, "alarm timeout"),
        }
    }
}

/// Output of a state's evaluate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub desired: SystemState,
    pub triggers: TriggerSet,
    pub cause: Cause,
    /// Clear `alarm_active` now, independent of when the retreat commits.
    pub silence_alarm: bool,
}

impl Evaluation {
    pub const fn stay(state: SystemState) -> Self {
        Self {
            desired: state,
            triggers: TriggerSet::EMPTY,
            cause: Cause::Hold,
            silence_alarm: false,
        }
    }

    pub const fn to(state: SystemState, cause: Cause) -> Self {
        Self {
            desired: state,
            triggers: TriggerSet::EMPTY,
            cause,
            silence_alarm: false,
        }
    }

    pub const fn with_triggers(mut self, triggers: TriggerSet) -> Self {
        self.triggers = triggers;
        self
    }

    pub const fn silencing(mut self) -> Self {
        self.silence_alarm = true;
        self
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each committed transition.
pub type StateActionFn = fn(&mut SystemFlags, Millis);

/// Signature for the per-cycle evaluate handler.  Must not have side effects.
pub type StateEvaluateFn = fn(&EvalInput<'_>) -> Evaluation;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array, no heap and no `dyn`.
pub struct StateDescriptor {
    pub id: SystemState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub evaluate: StateEvaluateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and the arbiter.  The system flags are owned by the
/// caller and passed into every action so the service can read them between
/// cycles.
pub struct Fsm {
    /// Fixed-size table indexed by `SystemState as usize`.
    table: [StateDescriptor; SystemState::COUNT],
    current: usize,
    previous: usize,
    arbiter: TransitionArbiter,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; SystemState::COUNT], initial: SystemState) -> Self {
        Self {
            table,
            current: initial as usize,
            previous: initial as usize,
            arbiter: TransitionArbiter::new(),
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first cycle.
    pub fn start(&mut self, flags: &mut SystemFlags, now: Millis) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        flags.last_state_change_time = now;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(flags, now);
        }
    }

    /// Ask the current state what it wants.  Pure.
    pub fn evaluate(&self, input: &EvalInput<'_>) -> Evaluation {
        (self.table[self.current].evaluate)(input)
    }

    /// Feed `desired` to the arbiter and perform the transition if it
    /// commits.
    pub fn advance(
        &mut self,
        desired: SystemState,
        now: Millis,
        windows: &TransitionWindows,
        flags: &mut SystemFlags,
    ) -> Arbitration {
        let outcome = self
            .arbiter
            .arbitrate(self.current_state(), desired, now, windows);
        if let Arbitration::Commit(next) = outcome {
            self.transition(next, now, flags);
        }
        outcome
    }

    /// Immediate transition that bypasses the arbiter (disarm override).
    /// Any pending change is dropped.
    pub fn force_transition(&mut self, next: SystemState, now: Millis, flags: &mut SystemFlags) {
        self.arbiter.clear();
        if next as usize != self.current {
            self.transition(next, now, flags);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> SystemState {
        SystemState::from_index(self.current)
    }

    /// The state before the last committed transition.
    pub fn previous_state(&self) -> SystemState {
        SystemState::from_index(self.previous)
    }

    /// The change the arbiter is holding, if any.
    pub fn pending(&self) -> Option<PendingTransition> {
        self.arbiter.pending()
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: SystemState, now: Millis, flags: &mut SystemFlags) {
        let next_idx = next as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(flags, now);
        }

        self.previous = self.current;
        self.current = next_idx;
        flags.last_state_change_time = now;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(flags, now);
        }
    }
}
