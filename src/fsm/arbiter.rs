//! Transition arbiter: debounce of the state decision itself.
//!
//! ```text
//!            desired == current
//!   ┌──────────────────────────────────────┐
//!   ▼                                      │
//! NONE ──[desired != current]──▶ PENDING(target, requested_at)
//!   ▲                              │   │
//!   │       [desired != target]────┘   │ restart: (desired, now)
//!   │                                  │
//!   └──────[now - requested_at >= window(target)]── COMMIT
//! ```
//!
//! A flicker between two desired states restarts the clock every time it
//! changes, so it never accumulates toward either target.

use crate::clock::{self, Millis};
use crate::config::TransitionWindows;

use super::SystemState;

/// A requested change that has not yet been held long enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    pub target: SystemState,
    pub requested_at: Millis,
}

/// Result of one arbitration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arbitration {
    /// Desired equals current; nothing pending.
    Steady,
    /// A change is being held.  `remaining_ms` until it may commit.
    Pending {
        target: SystemState,
        remaining_ms: u32,
    },
    /// The held change is now authoritative.
    Commit(SystemState),
}

/// Holds at most one pending transition.
#[derive(Debug, Default, Clone)]
pub struct TransitionArbiter {
    pending: Option<PendingTransition>,
}

impl TransitionArbiter {
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// The change currently being held, if any.
    pub fn pending(&self) -> Option<PendingTransition> {
        self.pending
    }

    /// Drop any held change (used by the disarm override).
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Feed one evaluator decision.
    ///
    /// On [`Arbitration::Commit`] the pending entry has already been
    /// cleared; the caller performs the actual state change.
    pub fn arbitrate(
        &mut self,
        current: SystemState,
        desired: SystemState,
        now: Millis,
        windows: &TransitionWindows,
    ) -> Arbitration {
        if desired == current {
            self.pending = None;
            return Arbitration::Steady;
        }

        let window = windows.for_target(desired);
        match self.pending {
            Some(p) if p.target == desired => {
                let held = clock::elapsed(now, p.requested_at);
                if held >= window {
                    self.pending = None;
                    Arbitration::Commit(desired)
                } else {
                    Arbitration::Pending {
                        target: desired,
                        remaining_ms: window - held,
                    }
                }
            }
            _ => {
                self.pending = Some(PendingTransition {
                    target: desired,
                    requested_at: now,
                });
                Arbitration::Pending {
                    target: desired,
                    remaining_ms: window,
                }
            }
        }
    }
}
