//! Indicator drivers, hardware initialisation, and peripheral helpers.

pub mod hw_init;
pub mod hw_timer;
pub mod indicators;

/// A single-shot analog input channel.
///
/// The digital side uses the `embedded-hal` 1.0 pin traits directly; this
/// fills the gap for oneshot ADC reads.
pub trait AnalogInput {
    type Error: core::fmt::Debug;

    /// Take one raw conversion.
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}
