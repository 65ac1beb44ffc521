//! Millisecond clock adapter.
//!
//! Provides the wrapping `u32` millisecond counter the control core runs on.
//!
//! - **`target_os = "espidf"`**: truncates `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side simulation.
//!
//! The truncation wraps after ~49.7 days; every consumer measures durations
//! with [`clock::elapsed`](crate::clock::elapsed).

use crate::clock::Millis;

pub struct MillisClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MillisClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MillisClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot, modulo 2^32.
    #[cfg(target_os = "espidf")]
    pub fn now_ms(&self) -> Millis {
        // SAFETY: esp_timer_get_time is a read of the RTC counter.
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() } as u64;
        (us / 1_000) as Millis
    }

    /// Milliseconds since construction, modulo 2^32.
    #[cfg(not(target_os = "espidf"))]
    pub fn now_ms(&self) -> Millis {
        self.start.elapsed().as_millis() as Millis
    }
}
