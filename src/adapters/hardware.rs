//! Hardware adapter: bridges real pins to domain port traits.
//!
//! Generic over the `embedded-hal` 1.0 digital pin traits and the
//! [`AnalogInput`] trait, so the same adapter runs on the raw ESP-IDF
//! handles from [`hw_init`](crate::drivers::hw_init) and on host mocks.
//! A failed read is logged and the last good value is reported instead.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::indicators::IndicatorOutputs;
use crate::drivers::AnalogInput;
use crate::fsm::SystemState;
use crate::sensors::{gas, temperature};

/// The sensor inputs.
pub struct SensorPins<I, A> {
    pub motion: I,
    pub gas_digital: I,
    pub temperature_adc: A,
    pub gas_adc: A,
}

/// The indicator outputs.
pub struct IndicatorPins<O> {
    pub status_led: O,
    pub alarm_led: O,
    pub buzzer: O,
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<I, O, A> {
    inputs: SensorPins<I, A>,
    outputs: IndicatorPins<O>,
    last_motion: bool,
    last_gas_safe: bool,
    last_temperature_c: f32,
    last_gas_reading: i32,
}

impl<I, O, A> HardwareAdapter<I, O, A>
where
    I: InputPin,
    O: OutputPin,
    A: AnalogInput,
{
    pub fn new(inputs: SensorPins<I, A>, outputs: IndicatorPins<O>) -> Self {
        Self {
            inputs,
            outputs,
            last_motion: false,
            last_gas_safe: true,
            last_temperature_c: 20.0,
            last_gas_reading: 0,
        }
    }

    /// Drive every indicator low.
    pub fn all_off(&mut self) {
        drive(&mut self.outputs.status_led, false, "status LED");
        drive(&mut self.outputs.alarm_led, false, "alarm LED");
        drive(&mut self.outputs.buzzer, false, "buzzer");
    }
}

fn drive<O: OutputPin>(pin: &mut O, high: bool, what: &str) {
    let res = if high { pin.set_high() } else { pin.set_low() };
    if let Err(e) = res {
        warn!("{} write failed: {:?}", what, e);
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<I, O, A> SensorPort for HardwareAdapter<I, O, A>
where
    I: InputPin,
    O: OutputPin,
    A: AnalogInput,
{
    fn read_motion_level(&mut self) -> bool {
        match self.inputs.motion.is_high() {
            Ok(level) => self.last_motion = level,
            Err(e) => warn!("motion pin read failed: {:?}", e),
        }
        self.last_motion
    }

    fn read_gas_level(&mut self) -> bool {
        match self.inputs.gas_digital.is_high() {
            Ok(level) => self.last_gas_safe = level,
            Err(e) => warn!("gas pin read failed: {:?}", e),
        }
        self.last_gas_safe
    }

    fn sample_temperature_and_gas_analog(&mut self) -> (f32, i32) {
        match self.inputs.temperature_adc.read_raw() {
            Ok(raw) => match temperature::adc_to_celsius(raw) {
                Some(c) => self.last_temperature_c = c,
                None => warn!("thermistor reading {} at rail, keeping {:.1} C", raw, self.last_temperature_c),
            },
            Err(e) => warn!("temperature ADC read failed: {:?}", e),
        }
        match self.inputs.gas_adc.read_raw() {
            Ok(raw) => self.last_gas_reading = gas::normalise(raw),
            Err(e) => warn!("gas ADC read failed: {:?}", e),
        }
        (self.last_temperature_c, self.last_gas_reading)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<I, O, A> ActuatorPort for HardwareAdapter<I, O, A>
where
    I: InputPin,
    O: OutputPin,
    A: AnalogInput,
{
    fn apply_state_outputs(&mut self, state: SystemState, alarm_active: bool, blink_phase: bool) {
        let out = IndicatorOutputs::for_state(state, alarm_active, blink_phase);
        drive(&mut self.outputs.alarm_led, out.alarm_led, "alarm LED");
        drive(&mut self.outputs.buzzer, out.buzzer, "buzzer");
    }

    fn set_status_led(&mut self, on: bool) {
        drive(&mut self.outputs.status_led, on, "status LED");
    }
}
