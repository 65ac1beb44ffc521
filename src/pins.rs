//! GPIO / peripheral pin assignments for the HomeWatch controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Sensors: digital (pin-group interrupt, any edge)
// ---------------------------------------------------------------------------

/// HC-SR501 PIR motion detector.  HIGH = motion.
pub const MOTION_GPIO: i32 = 4;
/// MQ-2 gas module digital output.  HIGH = below trip point (safe).
pub const GAS_DIGITAL_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Sensors: analog (ADC1, 12-bit, 12 dB attenuation)
// ---------------------------------------------------------------------------

/// NTC thermistor, 10 kΩ @ 25 °C, voltage-divider to ADC.
/// ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 1;
pub const TEMP_ADC_CHANNEL: u32 = 0;
/// MQ-2 gas module analog output.
/// ADC1 channel 1 (GPIO 2 on ESP32-S3).
pub const GAS_ADC_GPIO: i32 = 2;
pub const GAS_ADC_CHANNEL: u32 = 1;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Heartbeat LED, toggled by the 1 Hz tick.
pub const STATUS_LED_GPIO: i32 = 10;
/// Alarm LED: flashes in Alert, solid in Alarm.
pub const ALARM_LED_GPIO: i32 = 11;
/// Active buzzer (driven HIGH = sounding).
pub const BUZZER_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// UART console (operator commands + log output)
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 43;
pub const UART_RX_GPIO: i32 = 44;
pub const UART_BAUD: u32 = 115_200;
