//! Individual sensor trigger conditions.
//!
//! A trigger is one sensor condition considered on its own.  The evaluator
//! folds the active set into a bitmask so the arbiter can log exactly
//! which conditions justified a transition.

use core::fmt;

use super::context::EvalInput;

/// One sensor condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Trigger {
    /// PIR reports movement.
    Motion = 0b0000_0001,
    /// Analog gas reading above the warning threshold.
    GasOverThreshold = 0b0000_0010,
    /// Gas module digital line reports danger.
    GasLineUnsafe = 0b0000_0100,
    /// Temperature above the high bound.
    TemperatureHigh = 0b0000_1000,
    /// Temperature below the low bound.
    TemperatureLow = 0b0001_0000,
}

impl Trigger {
    pub const ALL: [Trigger; 5] = [
        Trigger::Motion,
        Trigger::GasOverThreshold,
        Trigger::GasLineUnsafe,
        Trigger::TemperatureHigh,
        Trigger::TemperatureLow,
    ];

    /// Return the bitmask for this trigger.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Motion => write!(f, "motion"),
            Self::GasOverThreshold => write!(f, "gas reading high"),
            Self::GasLineUnsafe => write!(f, "gas line unsafe"),
            Self::TemperatureHigh => write!(f, "temperature high"),
            Self::TemperatureLow => write!(f, "temperature low"),
        }
    }
}

/// Set of active triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerSet(u8);

impl TriggerSet {
    pub const EMPTY: Self = Self(0);

    /// Collect every condition currently true in `input`.
    pub fn observe(input: &EvalInput<'_>) -> Self {
        let mut set = Self::EMPTY;
        set.set_if(Trigger::Motion, input.sensors.motion_active);
        set.set_if(Trigger::GasOverThreshold, input.gas_over_threshold());
        set.set_if(Trigger::GasLineUnsafe, !input.sensors.gas_safe);
        set.set_if(Trigger::TemperatureHigh, input.temperature_high());
        set.set_if(Trigger::TemperatureLow, input.temperature_low());
        set
    }

    pub fn contains(self, trigger: Trigger) -> bool {
        self.0 & trigger.mask() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Number of *independent* triggers used for escalation: motion, gas
    /// reading over threshold, temperature out of range (either side
    /// counts once).  The gas digital line is not counted here.
    pub fn independent_count(self) -> u8 {
        u8::from(self.contains(Trigger::Motion))
            + u8::from(self.contains(Trigger::GasOverThreshold))
            + u8::from(self.contains(Trigger::TemperatureHigh) || self.contains(Trigger::TemperatureLow))
    }

    /// Iterate active triggers in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Trigger> {
        Trigger::ALL.into_iter().filter(move |t| self.contains(*t))
    }

    fn set_if(&mut self, trigger: Trigger, condition: bool) {
        if condition {
            self.0 |= trigger.mask();
        }
    }
}

impl From<Trigger> for TriggerSet {
    fn from(t: Trigger) -> Self {
        Self(t.mask())
    }
}

impl core::ops::BitOr<Trigger> for TriggerSet {
    type Output = Self;

    fn bitor(self, rhs: Trigger) -> Self {
        Self(self.0 | rhs.mask())
    }
}

impl fmt::Display for TriggerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        for (i, t) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{t}")?;
        }
        Ok(())
    }
}
