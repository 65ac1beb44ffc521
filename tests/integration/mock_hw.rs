//! Mock board and test rig for integration tests.
//!
//! [`MockBoard`] stands in for the hardware adapter: tests set pin levels
//! and analog values directly and it records every actuator call.
//! [`Rig`] wires a board, a recording sink and a leaked `CaptureFlags`
//! (the test stand-in for the firmware's `static`) around an `AppService`,
//! and drives the loop on a simulated clock.

use homewatch::app::events::AppEvent;
use homewatch::app::ports::{ActuatorPort, EventSink, SensorPort};
use homewatch::app::service::AppService;
use homewatch::config::SystemConfig;
use homewatch::error::CommandError;
use homewatch::events::CaptureFlags;
use homewatch::fsm::SystemState;

/// Simulated loop period.
pub const STEP_MS: u32 = 10;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorCall {
    Outputs {
        state: SystemState,
        alarm_active: bool,
        blink: bool,
    },
    StatusLed(bool),
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub motion: bool,
    pub gas_safe: bool,
    pub temperature_c: f32,
    pub gas_reading: i32,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            motion: false,
            gas_safe: true,
            temperature_c: 21.0,
            gas_reading: 100,
            calls: Vec::new(),
        }
    }

    pub fn last_outputs(&self) -> Option<ActuatorCall> {
        self.calls
            .iter()
            .rev()
            .find(|c| matches!(c, ActuatorCall::Outputs { .. }))
            .copied()
    }

    pub fn buzzer_on(&self) -> bool {
        matches!(
            self.last_outputs(),
            Some(ActuatorCall::Outputs {
                state: SystemState::Alarm,
                alarm_active: true,
                ..
            })
        )
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockBoard {
    fn read_motion_level(&mut self) -> bool {
        self.motion
    }

    fn read_gas_level(&mut self) -> bool {
        self.gas_safe
    }

    fn sample_temperature_and_gas_analog(&mut self) -> (f32, i32) {
        (self.temperature_c, self.gas_reading)
    }
}

impl ActuatorPort for MockBoard {
    fn apply_state_outputs(&mut self, state: SystemState, alarm_active: bool, blink_phase: bool) {
        self.calls.push(ActuatorCall::Outputs {
            state,
            alarm_active,
            blink: blink_phase,
        });
    }

    fn set_status_led(&mut self, on: bool) {
        self.calls.push(ActuatorCall::StatusLed(on));
    }
}

// ── Recording sink ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    /// Every committed (from, to) pair, in order.
    pub fn transitions(&self) -> Vec<(SystemState, SystemState)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::StateChanged { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

pub struct Rig {
    pub capture: &'static CaptureFlags,
    pub app: AppService<'static>,
    pub hw: MockBoard,
    pub sink: RecordingSink,
    pub now: u32,
    last_tick: u32,
    tick_period: u32,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with(SystemConfig::default(), 0)
    }

    /// Start the service at `start` ms with `config`.
    pub fn with(config: SystemConfig, start: u32) -> Self {
        let capture: &'static CaptureFlags = Box::leak(Box::new(CaptureFlags::new()));
        let tick_period = config.tick_period_ms;
        let mut rig = Self {
            capture,
            app: AppService::new(config, capture),
            hw: MockBoard::new(),
            sink: RecordingSink::default(),
            now: start,
            last_tick: start,
            tick_period,
        };
        rig.app.start(start, &mut rig.hw, &mut rig.sink);
        rig
    }

    /// Start and arm, then run until Monitoring is committed.
    pub fn armed() -> Self {
        let mut rig = Self::new();
        rig.command("ARM").expect("ARM accepted");
        rig.run_until_state(SystemState::Monitoring, 5_000);
        rig
    }

    pub fn command(&mut self, line: &str) -> Result<(), CommandError> {
        self.app.handle_line(line, self.now, &mut self.hw, &mut self.sink)
    }

    pub fn state(&self) -> SystemState {
        self.app.state()
    }

    // ── Pin-level stimulus (what the ISR would see) ───────────

    pub fn set_motion(&mut self, active: bool) {
        self.hw.motion = active;
        self.capture.on_pin_edge(self.hw.motion, self.hw.gas_safe);
    }

    pub fn set_gas_line(&mut self, safe: bool) {
        self.hw.gas_safe = safe;
        self.capture.on_pin_edge(self.hw.motion, self.hw.gas_safe);
    }

    pub fn set_motion_and_gas_line(&mut self, motion: bool, gas_safe: bool) {
        self.hw.motion = motion;
        self.hw.gas_safe = gas_safe;
        self.capture.on_pin_edge(motion, gas_safe);
    }

    // ── Clock ─────────────────────────────────────────────────

    /// One loop pass, `STEP_MS` after the previous one.
    pub fn step(&mut self) {
        self.now = self.now.wrapping_add(STEP_MS);
        if self.now.wrapping_sub(self.last_tick) >= self.tick_period {
            self.last_tick = self.now;
            self.capture.on_tick();
        }
        self.app.run_cycle(self.now, &mut self.hw, &mut self.sink);
    }

    /// Run passes for `ms` simulated milliseconds.
    pub fn run_for(&mut self, ms: u32) {
        for _ in 0..(ms / STEP_MS) {
            self.step();
        }
    }

    /// Run until `state` is current or `limit_ms` passes.  Returns the
    /// time of arrival.
    pub fn run_until_state(&mut self, state: SystemState, limit_ms: u32) -> u32 {
        let start = self.now;
        while self.state() != state {
            assert!(
                self.now.wrapping_sub(start) <= limit_ms,
                "did not reach {state} within {limit_ms} ms (stuck in {})",
                self.state()
            );
            self.step();
        }
        self.now
    }
}
