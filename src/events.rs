//! Interrupt-side event capture.
//!
//! Flags are produced by:
//! - the GPIO ISR on any edge of the motion or gas digital line
//! - the 1 Hz hardware tick timer
//!
//! and consumed by the main control loop, which reads-then-clears them once
//! per cycle.
//!
//! ```text
//! ┌─────────────┐      ┌──────────────────┐      ┌──────────────────┐
//! │ GPIO ISR    │─set─▶│                  │─take▶│ SensorStage      │
//! │             │      │   CaptureFlags   │      │ (commit)         │
//! │ Tick timer  │─set─▶│  (atomic bools)  │─take▶│ AppService tick  │
//! └─────────────┘      └──────────────────┘      └──────────────────┘
//!        ▲                                                │
//!        └──────────── committed line levels ◀────────────┘
//! ```
//!
//! Each flag has exactly one producer and one consumer.  Handlers only ever
//! *set* a flag; the loop only ever *swaps it back to false*.  The
//! committed-level mirror runs the other way: the loop writes it after a
//! debounced commit, the ISR only reads it.  Handlers never do timing or
//! debounce work.

use core::sync::atomic::{AtomicBool, Ordering};

/// Pin-edge flags drained by the commit stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinEvents {
    /// Motion line level differs from the committed value.
    pub motion_changed: bool,
    /// Gas line level differs from the committed value.
    pub gas_changed: bool,
    /// At least one edge fired on the pin group.
    pub any_pin_event: bool,
}

impl PinEvents {
    /// Nothing to commit.
    pub const fn is_empty(&self) -> bool {
        !self.any_pin_event && !self.motion_changed && !self.gas_changed
    }
}

/// Lock-free flag block shared between interrupt context and the main loop.
///
/// `const`-constructible so the binary can place one instance in a
/// `static` for the ISRs; the library itself never holds a global.
pub struct CaptureFlags {
    motion_changed: AtomicBool,
    gas_changed: AtomicBool,
    tick: AtomicBool,
    any_pin_event: AtomicBool,
    /// Status LED phase, flipped on every tick.
    status_toggle: AtomicBool,

    // Loop → ISR mirror of the committed snapshot levels.
    committed_motion: AtomicBool,
    committed_gas_safe: AtomicBool,
}

impl Default for CaptureFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureFlags {
    pub const fn new() -> Self {
        Self {
            motion_changed: AtomicBool::new(false),
            gas_changed: AtomicBool::new(false),
            tick: AtomicBool::new(false),
            any_pin_event: AtomicBool::new(false),
            status_toggle: AtomicBool::new(false),
            committed_motion: AtomicBool::new(false),
            committed_gas_safe: AtomicBool::new(true),
        }
    }

    // ── Producer side (interrupt context) ─────────────────────

    /// Pin-group edge handler.  `motion_level` / `gas_level` are the raw
    /// line levels read inside the ISR.
    ///
    /// Safe to call from interrupt context: a handful of atomic ops, no
    /// timing, no locking.
    pub fn on_pin_edge(&self, motion_level: bool, gas_level: bool) {
        if motion_level != self.committed_motion.load(Ordering::Acquire) {
            self.motion_changed.store(true, Ordering::Release);
        }
        if gas_level != self.committed_gas_safe.load(Ordering::Acquire) {
            self.gas_changed.store(true, Ordering::Release);
        }
        self.any_pin_event.store(true, Ordering::Release);
    }

    /// Periodic tick handler (1 Hz).
    pub fn on_tick(&self) {
        self.status_toggle.fetch_xor(true, Ordering::AcqRel);
        self.tick.store(true, Ordering::Release);
    }

    // ── Consumer side (main loop) ─────────────────────────────

    /// Read-and-clear every pin flag.
    ///
    /// `any_pin_event` is swapped first and the line flags are only cleared
    /// by a drain that saw it set. The edge handler stores the line flags
    /// before `any_pin_event`, so a line flag raised by an edge still in
    /// flight stays set until the drain that also observes its
    /// `any_pin_event`.
    pub fn take_pin_events(&self) -> PinEvents {
        if !self.any_pin_event.swap(false, Ordering::AcqRel) {
            return PinEvents::default();
        }
        PinEvents {
            any_pin_event: true,
            motion_changed: self.motion_changed.swap(false, Ordering::AcqRel),
            gas_changed: self.gas_changed.swap(false, Ordering::AcqRel),
        }
    }

    /// Read-and-clear the tick flag.
    pub fn take_tick(&self) -> bool {
        self.tick.swap(false, Ordering::AcqRel)
    }

    /// Current status LED phase (toggled by [`on_tick`](Self::on_tick)).
    pub fn status_toggle(&self) -> bool {
        self.status_toggle.load(Ordering::Acquire)
    }

    /// Publish the committed line levels for the ISR to compare against.
    /// Called by the loop after every debounced commit and at start-up.
    pub fn publish_committed(&self, motion_active: bool, gas_safe: bool) {
        self.committed_motion.store(motion_active, Ordering::Release);
        self.committed_gas_safe.store(gas_safe, Ordering::Release);
    }
}
