//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (which goes to UART on the board).  Every record is a
//! single `TAG | key=value` line.

use log::{info, warn};

use crate::app::commands::USAGE;
use crate::app::events::{AppEvent, StatusReport};
use crate::app::ports::EventSink;
use crate::sensors::SensorNotice;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn safe_or_danger(safe: bool) -> &'static str {
    if safe { "SAFE" } else { "DANGER" }
}

fn log_compact_status(r: &StatusReport) {
    info!(
        "STATUS | state={} armed={} alarm={} motion={} gas={} T={:.1}\u{00b0}C gas_adc={}",
        r.state,
        r.armed,
        r.alarm_active,
        u8::from(r.motion_active),
        safe_or_danger(r.gas_safe),
        r.temperature_c,
        r.gas_reading,
    );
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { state, armed } => {
                info!("SYSTEM | started state={} armed={}", state, armed);
            }
            AppEvent::StateChanged { from, to, cause, triggers } => {
                info!("STATE | {} -> {} | cause={} | triggers={}", from, to, cause, triggers);
            }
            AppEvent::Sensor(notice) => match *notice {
                SensorNotice::Motion { active } => {
                    info!("SENSOR | motion={}", if active { "ACTIVE" } else { "INACTIVE" });
                }
                SensorNotice::GasLine { safe } if safe => {
                    info!("SENSOR | gas_line=SAFE");
                }
                SensorNotice::GasLine { .. } => {
                    warn!("WARN | gas_line=DANGER");
                }
                SensorNotice::Sample { temperature_c, gas_reading } => {
                    info!("SENSOR | T={:.1}\u{00b0}C gas_adc={}", temperature_c, gas_reading);
                }
                SensorNotice::GasHigh { reading } => {
                    warn!("WARN | gas reading high: {}", reading);
                }
                SensorNotice::TemperatureOutOfRange { celsius } => {
                    warn!("WARN | temperature out of range: {:.1}\u{00b0}C", celsius);
                }
            },
            AppEvent::Status { report, full: false } => log_compact_status(report),
            AppEvent::Status { report, full: true } => match serde_json::to_string(report) {
                Ok(json) => info!("STATUS | {}", json),
                Err(_) => log_compact_status(report),
            },
            AppEvent::Heartbeat { ticks, state } => {
                info!("TIMER | periodic check tick={} state={}", ticks, state);
            }
            AppEvent::Armed => info!("SYSTEM | armed"),
            AppEvent::Disarmed => info!("SYSTEM | disarmed"),
            AppEvent::VerboseChanged(on) => {
                info!("SYSTEM | verbose logging {}", if *on { "ON" } else { "OFF" });
            }
            AppEvent::ConfigUpdated => info!("SYSTEM | configuration updated"),
            AppEvent::CommandRejected(e) => {
                warn!("SYSTEM | command rejected: {} | usage: {}", e, USAGE);
            }
        }
    }
}
