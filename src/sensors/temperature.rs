//! NTC thermistor temperature conversion (10 kOhm @ 25 C, B = 3950).
//!
//! Wired in a voltage-divider with a fixed 10 kOhm resistor, read via
//! a 12-bit ADC. The simplified Beta (Steinhart-Hart) equation
//! converts resistance to temperature.

const R25: f32 = 10_000.0;
const BETA: f32 = 3950.0;
const T25_K: f32 = 298.15;
const R_DIVIDER: f32 = 10_000.0;
const KELVIN_OFFSET: f32 = 273.15;

/// Full-scale count of the temperature ADC.
pub const ADC_MAX: u16 = 4095;

/// Convert a raw ADC count to degrees Celsius.
///
/// Returns `None` when the reading sits on either rail (open or shorted
/// thermistor), where the Beta equation has no meaningful answer.
pub fn adc_to_celsius(raw: u16) -> Option<f32> {
    let raw = raw.min(ADC_MAX);
    if raw <= 2 || raw >= ADC_MAX - 2 {
        return None;
    }
    let counts = f32::from(raw);
    let r_ntc = R_DIVIDER * counts / (f32::from(ADC_MAX) - counts);
    let inv_t = (1.0 / T25_K) + (1.0 / BETA) * (r_ntc / R25).ln();
    if inv_t <= 0.0 {
        return None;
    }
    Some((1.0 / inv_t) - KELVIN_OFFSET)
}
