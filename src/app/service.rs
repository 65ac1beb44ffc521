//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the sensor commit stage, the system flags, the FSM
//! and the live configuration.  It exposes a hardware-agnostic API.  All
//! I/O flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  CaptureFlags ─┐
//!  SensorPort ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                 │         AppService          │
//! ActuatorPort ◀──│ commit · evaluate · arbiter │
//!                 └─────────────────────────────┘
//! ```
//!
//! One call to [`AppService::run_cycle`] is one pass of the main loop:
//! capture → commit → tick housekeeping → analog poll → evaluate →
//! arbitrate → outputs → periodic status.

use log::{debug, info};

use crate::clock::{self, Millis};
use crate::config::SystemConfig;
use crate::error::CommandError;
use crate::events::CaptureFlags;
use crate::fsm::arbiter::Arbitration;
use crate::fsm::context::{EvalInput, SensorSnapshot, SystemFlags};
use crate::fsm::states::build_state_table;
use crate::fsm::triggers::TriggerSet;
use crate::fsm::{alarm, Cause, Fsm, SystemState};
use crate::sensors::{SensorNotice, SensorStage};

use super::commands::AppCommand;
use super::events::{AppEvent, StatusReport};
use super::ports::{ActuatorPort, EventSink, SensorPort};

/// Ticks between heartbeat lines in Monitoring.
const HEARTBEAT_TICKS: u32 = 30;
/// Ticks between heartbeat lines in any state with verbose logging on.
const HEARTBEAT_TICKS_VERBOSE: u32 = 10;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
///
/// The capture flags are borrowed: the binary keeps them in a `static`
/// for the interrupt handlers, tests keep them on the stack.
pub struct AppService<'a> {
    capture: &'a CaptureFlags,
    fsm: Fsm,
    sensors: SensorStage,
    flags: SystemFlags,
    config: SystemConfig,
    tick_count: u32,
    last_status_time: Millis,
}

impl<'a> AppService<'a> {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig, capture: &'a CaptureFlags) -> Self {
        Self {
            capture,
            fsm: Fsm::new(build_state_table(), SystemState::Idle),
            sensors: SensorStage::new(),
            flags: SystemFlags::default(),
            config,
            tick_count: 0,
            last_status_time: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Seed the snapshot from the live pins, publish the committed levels
    /// to the capture layer, and enter Idle.
    pub fn start(
        &mut self,
        now: Millis,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        self.sensors.seed(hw, now, &self.config);
        self.publish_committed();
        self.fsm.start(&mut self.flags, now);
        self.last_status_time = now;
        hw.apply_state_outputs(self.state(), self.flags.alarm_active, false);
        sink.emit(&AppEvent::Started {
            state: self.state(),
            armed: self.flags.armed,
        });
        info!("AppService started in {}", self.state());
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full pass of the control loop.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], so one mutable borrow covers both ports.
    pub fn run_cycle(
        &mut self,
        now: Millis,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        // 1. Drain pin flags and commit debounced changes
        let events = self.capture.take_pin_events();
        if !events.is_empty() {
            let notices =
                self.sensors
                    .commit_pin_events(events, hw, now, self.config.debounce_delay_ms);
            self.publish_committed();
            for notice in notices {
                self.report(notice, sink);
            }
        }

        // 2. 1 Hz housekeeping
        if self.capture.take_tick() {
            self.on_tick(hw, sink);
        }

        // 3. Analog sampling on its own interval
        for notice in self.sensors.poll_analog(hw, now, &self.config) {
            self.report(notice, sink);
        }

        // 4. Evaluate (pure) and apply the immediate silence effect
        let eval = self.fsm.evaluate(&EvalInput {
            sensors: self.sensors.snapshot(),
            flags: &self.flags,
            config: &self.config,
            now,
        });
        if eval.silence_alarm {
            alarm::silence(&mut self.flags);
        }

        // 5. Arbitrate
        let from = self.state();
        let outcome = self
            .fsm
            .advance(eval.desired, now, &self.config.transitions, &mut self.flags);
        match outcome {
            Arbitration::Commit(to) => {
                sink.emit(&AppEvent::StateChanged {
                    from,
                    to,
                    cause: eval.cause,
                    triggers: eval.triggers,
                });
            }
            Arbitration::Pending { target, remaining_ms } if self.config.verbose_logging => {
                debug!("pending {} -> {} ({} ms left)", from, target, remaining_ms);
            }
            _ => {}
        }

        // 6. Outputs every pass
        hw.apply_state_outputs(self.state(), self.flags.alarm_active, self.capture.status_toggle());

        // 7. Compact status while not idle
        if self.state() != SystemState::Idle
            && clock::has_elapsed(now, self.last_status_time, self.config.status_update_interval_ms)
        {
            self.last_status_time = now;
            sink.emit(&AppEvent::Status {
                report: self.status_report(now),
                full: false,
            });
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an operator command.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now: Millis,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Result<(), CommandError> {
        match cmd {
            AppCommand::Arm => {
                self.flags.armed = true;
                sink.emit(&AppEvent::Armed);
            }
            AppCommand::Disarm => self.disarm(now, hw, sink),
            AppCommand::Status => {
                sink.emit(&AppEvent::Status {
                    report: self.status_report(now),
                    full: true,
                });
            }
            AppCommand::Verbose(on) => {
                self.config.verbose_logging = on;
                sink.emit(&AppEvent::VerboseChanged(on));
            }
            AppCommand::UpdateConfig(new_config) => {
                new_config.validate()?;
                if new_config.tick_period_ms != self.config.tick_period_ms {
                    return Err(CommandError::BadArgument("tick_period_ms is fixed at boot"));
                }
                self.config = new_config;
                sink.emit(&AppEvent::ConfigUpdated);
                info!("Configuration updated at runtime");
            }
        }
        Ok(())
    }

    /// Parse and run one console line.  Rejections are reported through the
    /// sink as well as returned.
    pub fn handle_line(
        &mut self,
        line: &str,
        now: Millis,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Result<(), CommandError> {
        let result = AppCommand::parse(line).and_then(|cmd| self.handle_command(cmd, now, hw, sink));
        if let Err(e) = result {
            sink.emit(&AppEvent::CommandRejected(e));
        }
        result
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a status snapshot.
    pub fn status_report(&self, now: Millis) -> StatusReport {
        let s = self.sensors.snapshot();
        StatusReport {
            state: self.state(),
            armed: self.flags.armed,
            alarm_active: self.flags.alarm_active,
            motion_active: s.motion_active,
            gas_safe: s.gas_safe,
            temperature_c: s.temperature_c,
            gas_reading: s.gas_reading,
            uptime_secs: now / 1_000,
            pending: self.fsm.pending().map(|p| p.target),
        }
    }

    /// Current FSM state.
    pub fn state(&self) -> SystemState {
        self.fsm.current_state()
    }

    /// State before the last committed transition.
    pub fn previous_state(&self) -> SystemState {
        self.fsm.previous_state()
    }

    pub fn is_armed(&self) -> bool {
        self.flags.armed
    }

    pub fn flags(&self) -> &SystemFlags {
        &self.flags
    }

    pub fn snapshot(&self) -> &SensorSnapshot {
        self.sensors.snapshot()
    }

    /// Target of the transition currently held by the arbiter.
    pub fn pending_target(&self) -> Option<SystemState> {
        self.fsm.pending().map(|p| p.target)
    }

    /// 1 Hz ticks seen since start.
    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Out-of-band disarm: no debounce, pending change dropped, outputs off
    /// right away.
    fn disarm(&mut self, now: Millis, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let from = self.state();
        self.flags.armed = false;
        alarm::silence(&mut self.flags);
        self.fsm.force_transition(SystemState::Idle, now, &mut self.flags);
        hw.apply_state_outputs(SystemState::Idle, false, false);
        sink.emit(&AppEvent::Disarmed);
        if from != SystemState::Idle {
            sink.emit(&AppEvent::StateChanged {
                from,
                to: SystemState::Idle,
                cause: Cause::Disarmed,
                triggers: TriggerSet::EMPTY,
            });
        }
    }

    fn on_tick(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.tick_count = self.tick_count.wrapping_add(1);
        hw.set_status_led(self.capture.status_toggle());

        let due = if self.config.verbose_logging {
            self.tick_count % HEARTBEAT_TICKS_VERBOSE == 0
        } else {
            self.state() == SystemState::Monitoring && self.tick_count % HEARTBEAT_TICKS == 0
        };
        if due {
            sink.emit(&AppEvent::Heartbeat {
                ticks: self.tick_count,
                state: self.state(),
            });
        }
    }

    /// Motion edges are only worth a line when they matter or when asked.
    fn report(&self, notice: SensorNotice, sink: &mut impl EventSink) {
        let wanted = match notice {
            SensorNotice::Motion { active } => {
                self.config.verbose_logging || (active && self.flags.armed)
            }
            _ => true,
        };
        if wanted {
            sink.emit(&AppEvent::Sensor(notice));
        }
    }

    fn publish_committed(&self) {
        let s = self.sensors.snapshot();
        self.capture.publish_committed(s.motion_active, s.gas_safe);
    }
}
