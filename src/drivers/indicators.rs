//! State-to-indicator mapping.
//!
//! | State      | Alarm LED           | Buzzer                |
//! |------------|---------------------|-----------------------|
//! | Idle       | off                 | off                   |
//! | Monitoring | off                 | off                   |
//! | Alert      | flashes with tick   | off                   |
//! | Alarm      | on                  | on while alarm active |

use crate::fsm::SystemState;

/// Levels to drive onto the alarm LED and buzzer pins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndicatorOutputs {
    pub alarm_led: bool,
    pub buzzer: bool,
}

impl IndicatorOutputs {
    pub const OFF: Self = Self {
        alarm_led: false,
        buzzer: false,
    };

    /// Outputs for `state`.  `blink_phase` is the 1 Hz toggle bit.
    pub const fn for_state(state: SystemState, alarm_active: bool, blink_phase: bool) -> Self {
        match state {
            SystemState::Idle | SystemState::Monitoring => Self::OFF,
            SystemState::Alert => Self {
                alarm_led: blink_phase,
                buzzer: false,
            },
            SystemState::Alarm => Self {
                alarm_led: true,
                buzzer: alarm_active,
            },
        }
    }
}
