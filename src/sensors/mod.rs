//! Sensor commit stage.
//!
//! [`SensorStage`] owns the authoritative [`SensorSnapshot`].  Once per
//! loop cycle it consumes the pin flags drained from
//! [`CaptureFlags`](crate::events::CaptureFlags), applies the per-signal
//! debounce, and re-reads the line level through the [`SensorPort`] for
//! every change it accepts.  Analog sampling runs on its own interval and
//! is not debounced.
//!
//! ```text
//!  PinEvents ──▶ commit_pin_events ──┐
//!                                    ├──▶ SensorSnapshot ──▶ evaluator
//!  interval  ──▶ poll_analog ────────┘
//! ```
//!
//! Both methods return the [`SensorNotice`]s worth reporting; the service
//! forwards them to the event sink.

pub mod gas;
pub mod temperature;

use heapless::Vec;

use crate::app::ports::SensorPort;
use crate::clock::{self, Millis};
use crate::config::SystemConfig;
use crate::events::PinEvents;
use crate::fsm::context::SensorSnapshot;

/// Something the commit stage wants reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorNotice {
    /// Committed motion level changed.
    Motion { active: bool },
    /// Committed gas line level changed.
    GasLine { safe: bool },
    /// Analog sample worth logging (moved past the reporting delta, or verbose).
    Sample { temperature_c: f32, gas_reading: i32 },
    /// Gas reading crossed above the warning threshold.
    GasHigh { reading: i32 },
    /// Temperature left the comfort band.
    TemperatureOutOfRange { celsius: f32 },
}

impl SensorNotice {
    /// Danger notices are logged as warnings.
    pub fn is_warning(&self) -> bool {
        match self {
            Self::GasLine { safe } => !safe,
            Self::GasHigh { .. } | Self::TemperatureOutOfRange { .. } => true,
            Self::Motion { .. } | Self::Sample { .. } => false,
        }
    }
}

/// Notices produced by one commit or poll step.
///
/// A commit pushes at most two notices (one per line) and a poll at most
/// three (sample, gas high, temperature), so four slots never fill.
pub type Notices = Vec<SensorNotice, 4>;

fn note(notices: &mut Notices, notice: SensorNotice) {
    let pushed = notices.push(notice);
    debug_assert!(pushed.is_ok(), "notice capacity exceeded");
}

/// Owner of the debounced sensor snapshot.
#[derive(Debug, Clone)]
pub struct SensorStage {
    snapshot: SensorSnapshot,
    reported_gas: i32,
    reported_temp_c: f32,
    gas_high: bool,
    temp_out_of_range: bool,
}

impl Default for SensorStage {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorStage {
    pub fn new() -> Self {
        let snapshot = SensorSnapshot::default();
        Self {
            reported_gas: snapshot.gas_reading,
            reported_temp_c: snapshot.temperature_c,
            snapshot,
            gas_high: false,
            temp_out_of_range: false,
        }
    }

    /// Read every input once at start-up so the first evaluation sees real
    /// levels.  The debounce timers start at `now`.
    pub fn seed(&mut self, port: &mut impl SensorPort, now: Millis, config: &SystemConfig) {
        let motion = port.read_motion_level();
        let gas_safe = port.read_gas_level();
        let s = &mut self.snapshot;
        s.motion_active = motion;
        s.motion_previous = motion;
        s.gas_safe = gas_safe;
        s.gas_previous = gas_safe;
        s.motion_last_change = now;
        s.gas_last_change = now;

        let (celsius, reading) = port.sample_temperature_and_gas_analog();
        self.store_sample(celsius, reading, now);
        self.reported_gas = reading;
        self.reported_temp_c = celsius;
        self.gas_high = reading > config.gas_warning_threshold;
        self.temp_out_of_range = out_of_band(celsius, config);
    }

    /// The authoritative snapshot.
    pub fn snapshot(&self) -> &SensorSnapshot {
        &self.snapshot
    }

    /// Commit debounced pin changes.
    ///
    /// A change is accepted only if strictly more than `debounce_ms` has
    /// passed since the last accepted change of the same signal.  Both
    /// signals are judged against the same `now`.  The caller has already
    /// cleared the flags, so a suppressed change is dropped.
    pub fn commit_pin_events(
        &mut self,
        events: PinEvents,
        port: &mut impl SensorPort,
        now: Millis,
        debounce_ms: u32,
    ) -> Notices {
        let mut notices = Notices::new();
        if !events.any_pin_event {
            return notices;
        }
        let s = &mut self.snapshot;

        if events.motion_changed && clock::exceeded(now, s.motion_last_change, debounce_ms) {
            s.motion_previous = s.motion_active;
            s.motion_active = port.read_motion_level();
            s.motion_last_change = now;
            if s.motion_active != s.motion_previous {
                note(&mut notices, SensorNotice::Motion {
                    active: s.motion_active,
                });
            }
        }

        if events.gas_changed && clock::exceeded(now, s.gas_last_change, debounce_ms) {
            s.gas_previous = s.gas_safe;
            s.gas_safe = port.read_gas_level();
            s.gas_last_change = now;
            if s.gas_safe != s.gas_previous {
                note(&mut notices, SensorNotice::GasLine { safe: s.gas_safe });
            }
        }

        notices
    }

    /// Sample temperature and analog gas if the read interval has elapsed.
    pub fn poll_analog(
        &mut self,
        port: &mut impl SensorPort,
        now: Millis,
        config: &SystemConfig,
    ) -> Notices {
        let mut notices = Notices::new();
        if !clock::has_elapsed(now, self.snapshot.last_sample_time, config.temp_read_interval_ms) {
            return notices;
        }

        let (celsius, reading) = port.sample_temperature_and_gas_analog();
        self.store_sample(celsius, reading, now);

        let moved = (reading - self.reported_gas).abs() > config.gas_report_delta
            || (celsius - self.reported_temp_c).abs() > config.temp_report_delta_c;
        if moved || config.verbose_logging {
            self.reported_gas = reading;
            self.reported_temp_c = celsius;
            note(&mut notices, SensorNotice::Sample {
                temperature_c: celsius,
                gas_reading: reading,
            });
        }

        let gas_high = reading > config.gas_warning_threshold;
        if gas_high && !self.gas_high {
            note(&mut notices, SensorNotice::GasHigh { reading });
        }
        self.gas_high = gas_high;

        let temp_out = out_of_band(celsius, config);
        if temp_out && !self.temp_out_of_range {
            note(&mut notices, SensorNotice::TemperatureOutOfRange { celsius });
        }
        self.temp_out_of_range = temp_out;

        notices
    }

    fn store_sample(&mut self, celsius: f32, reading: i32, now: Millis) {
        self.snapshot.temperature_c = celsius;
        self.snapshot.gas_reading = reading;
        self.snapshot.last_sample_time = now;
    }
}

fn out_of_band(celsius: f32, config: &SystemConfig) -> bool {
    celsius > config.temp_high_warning_c || celsius < config.temp_low_warning_c
}
