//! MQ-series gas module, analog side.
//!
//! Thresholds are expressed on a 10-bit scale (0..=1023).  The ESP32 ADC
//! delivers 12-bit counts, so readings are shifted down before they reach
//! the snapshot.

/// Largest value on the normalised scale.
pub const SCALE_MAX: i32 = 1023;

/// Normalise a 12-bit ADC count to the 10-bit scale.
pub fn normalise(raw12: u16) -> i32 {
    i32::from(raw12.min(4095) >> 2)
}
