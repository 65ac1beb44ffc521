//! Alarm timer.
//!
//! The alarm clock starts when the machine commits to `Alarm`, not when
//! the evaluator first asks for it.  Expiry is judged from the start stamp
//! alone and stays true after the buzzer is silenced, while the move back
//! to `Monitoring` is held by the arbiter.

use log::info;

use super::context::SystemFlags;
use crate::clock::{self, Millis};

/// Start the alarm at `now`.
pub fn start(flags: &mut SystemFlags, now: Millis) {
    flags.alarm_active = true;
    flags.alarm_start_time = now;
    info!("ALARM: timer started at {now} ms");
}

/// Silence the alarm.  The start stamp is kept for expiry checks.
pub fn silence(flags: &mut SystemFlags) {
    if flags.alarm_active {
        info!("ALARM: silenced");
    }
    flags.alarm_active = false;
}

/// Milliseconds since the alarm started.
pub fn elapsed(flags: &SystemFlags, now: Millis) -> u32 {
    clock::elapsed(now, flags.alarm_start_time)
}

/// `true` once strictly more than `timeout_ms` has passed since the start.
pub fn expired(flags: &SystemFlags, now: Millis, timeout_ms: u32) -> bool {
    clock::exceeded(now, flags.alarm_start_time, timeout_ms)
}
