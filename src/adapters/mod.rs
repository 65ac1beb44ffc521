//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                    |
//! |------------|--------------|--------------------------------|
//! | `hardware` | SensorPort   | GPIO inputs, ADC1 oneshot      |
//! |            | ActuatorPort | Status LED, alarm LED, buzzer  |
//! | `log_sink` | EventSink    | Serial log output              |
//! | `serial`   | -            | UART command intake            |
//! | `time`     | -            | ESP32 system timer             |

pub mod hardware;
pub mod log_sink;
pub mod serial;
pub mod time;
