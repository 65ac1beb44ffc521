//! Wraparound-safe millisecond arithmetic.
//!
//! The board clock is a free-running `u32` millisecond counter that wraps
//! after ~49.7 days.  Every duration in the firmware is computed as
//! `now.wrapping_sub(start)`; absolute comparisons such as
//! `now > start + duration` break at the wrap and must never be written.

/// Milliseconds since boot, truncated to `u32` (wraps).
pub type Millis = u32;

/// Milliseconds elapsed from `since` to `now`, correct across one wrap.
#[inline]
pub const fn elapsed(now: Millis, since: Millis) -> u32 {
    now.wrapping_sub(since)
}

/// `true` once at least `window` ms have passed since `since`.
#[inline]
pub const fn has_elapsed(now: Millis, since: Millis, window: u32) -> bool {
    elapsed(now, since) >= window
}

/// `true` once strictly more than `window` ms have passed since `since`.
#[inline]
pub const fn exceeded(now: Millis, since: Millis, window: u32) -> bool {
    elapsed(now, since) > window
}
