//! Integration tests for the command surface and the per-cycle housekeeping
//! of `AppService`: arming, status reporting, heartbeat, debounce, outputs.

use homewatch::app::events::AppEvent;
use homewatch::config::SystemConfig;
use homewatch::error::{CommandError, ConfigError};
use homewatch::fsm::SystemState;
use homewatch::sensors::SensorNotice;

use crate::mock_hw::{ActuatorCall, Rig};

fn is_compact_status(e: &AppEvent) -> bool {
    matches!(e, AppEvent::Status { full: false, .. })
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn starts_idle_disarmed_with_outputs_off() {
    let rig = Rig::new();

    assert_eq!(rig.state(), SystemState::Idle);
    assert!(!rig.app.flags().armed);
    assert!(!rig.app.flags().alarm_active);
    assert_eq!(
        rig.sink.events[0],
        AppEvent::Started {
            state: SystemState::Idle,
            armed: false
        }
    );
    assert_eq!(
        rig.hw.last_outputs(),
        Some(ActuatorCall::Outputs {
            state: SystemState::Idle,
            alarm_active: false,
            blink: false
        })
    );
}

#[test]
fn stays_idle_while_disarmed_whatever_the_sensors() {
    let mut rig = Rig::new();
    rig.set_motion_and_gas_line(true, false);
    rig.hw.gas_reading = 900;
    rig.hw.temperature_c = 50.0;

    rig.run_for(5_000);

    assert_eq!(rig.state(), SystemState::Idle);
    assert!(rig.sink.transitions().is_empty());
    assert_eq!(rig.app.pending_target(), None);
}

// ── Arming ────────────────────────────────────────────────────

#[test]
fn arm_reaches_monitoring_after_window() {
    let mut rig = Rig::new();
    rig.command("ARM").unwrap();
    assert!(rig.app.is_armed());
    // ARM itself does not move the state.
    assert_eq!(rig.state(), SystemState::Idle);

    rig.run_for(990);
    assert_eq!(rig.state(), SystemState::Idle);
    assert_eq!(rig.app.pending_target(), Some(SystemState::Monitoring));

    rig.step();
    assert_eq!(rig.now, 1_000);
    assert_eq!(rig.state(), SystemState::Idle);
    rig.step();
    assert_eq!(rig.now, 1_010);
    assert_eq!(rig.state(), SystemState::Monitoring);
    assert_eq!(rig.sink.transitions(), vec![(SystemState::Idle, SystemState::Monitoring)]);
}

#[test]
fn disarm_before_commit_drops_pending() {
    let mut rig = Rig::new();
    rig.command("ARM").unwrap();
    rig.run_for(500);
    assert_eq!(rig.app.pending_target(), Some(SystemState::Monitoring));

    rig.command("DISARM").unwrap();
    assert_eq!(rig.app.pending_target(), None);
    assert_eq!(rig.state(), SystemState::Idle);

    rig.run_for(2_000);
    assert_eq!(rig.state(), SystemState::Idle);
    assert!(rig.sink.transitions().is_empty());
}

#[test]
fn disarm_from_monitoring_is_immediate() {
    let mut rig = Rig::armed();
    rig.command("disarm").unwrap();

    assert_eq!(rig.state(), SystemState::Idle);
    assert_eq!(rig.app.previous_state(), SystemState::Monitoring);
    assert!(rig.sink.events.contains(&AppEvent::Disarmed));
    assert_eq!(
        rig.sink.transitions().last(),
        Some(&(SystemState::Monitoring, SystemState::Idle))
    );
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn unknown_command_is_rejected_and_reported() {
    let mut rig = Rig::new();
    assert_eq!(rig.command("SELFDESTRUCT"), Err(CommandError::Unknown));
    assert_eq!(
        rig.sink.events.last(),
        Some(&AppEvent::CommandRejected(CommandError::Unknown))
    );
    assert!(!rig.app.flags().armed);
}

#[test]
fn status_command_emits_full_report() {
    let mut rig = Rig::armed();
    rig.run_for(990);
    assert_eq!(rig.now, 2_000);

    rig.command("STATUS").unwrap();

    let Some(AppEvent::Status { report, full: true }) = rig.sink.events.last() else {
        panic!("expected a full status report, got {:?}", rig.sink.events.last());
    };
    assert_eq!(report.state, SystemState::Monitoring);
    assert!(report.armed);
    assert!(!report.alarm_active);
    assert!(!report.motion_active);
    assert!(report.gas_safe);
    assert_eq!(report.gas_reading, 100);
    assert!((report.temperature_c - 21.0).abs() < f32::EPSILON);
    assert_eq!(report.uptime_secs, 2);
    assert_eq!(report.pending, None);
}

#[test]
fn config_command_replaces_live_config() {
    let mut rig = Rig::new();
    rig.command(r#"CONFIG {"alarm_timeout_ms": 3000, "gas_warning_threshold": 700}"#)
        .unwrap();

    assert_eq!(rig.app.config().alarm_timeout_ms, 3_000);
    assert_eq!(rig.app.config().gas_warning_threshold, 700);
    assert_eq!(rig.app.config().debounce_delay_ms, 50);
    assert_eq!(rig.sink.events.last(), Some(&AppEvent::ConfigUpdated));
}

#[test]
fn invalid_config_command_keeps_previous() {
    let mut rig = Rig::new();
    let err = rig.command(r#"CONFIG {"debounce_delay_ms": 0}"#).unwrap_err();

    assert!(matches!(
        err,
        CommandError::Config(ConfigError::ValidationFailed(_))
    ));
    assert_eq!(rig.app.config(), &SystemConfig::default());

    assert_eq!(
        rig.command("CONFIG {not json"),
        Err(CommandError::Config(ConfigError::Malformed))
    );
}

#[test]
fn config_command_cannot_retime_tick() {
    let mut rig = Rig::new();
    assert_eq!(
        rig.command(r#"CONFIG {"tick_period_ms": 500}"#),
        Err(CommandError::BadArgument("tick_period_ms is fixed at boot"))
    );
    assert_eq!(rig.app.config(), &SystemConfig::default());

    // Carrying the running period through is fine.
    rig.command(r#"CONFIG {"tick_period_ms": 1000, "alarm_timeout_ms": 4000}"#)
        .unwrap();
    assert_eq!(rig.app.config().alarm_timeout_ms, 4_000);
}

// ── Periodic output ───────────────────────────────────────────

#[test]
fn no_periodic_status_while_idle() {
    let mut rig = Rig::new();
    rig.run_for(5_000);
    assert_eq!(rig.sink.count(is_compact_status), 0);
}

#[test]
fn periodic_status_every_interval_when_not_idle() {
    let mut rig = Rig::armed();
    // The commit cycle itself already reported once.
    assert_eq!(rig.sink.count(is_compact_status), 1);
    rig.sink.events.clear();

    rig.run_for(2_000);
    assert_eq!(rig.sink.count(is_compact_status), 4);
}

#[test]
fn heartbeat_every_thirty_ticks_in_monitoring() {
    let mut rig = Rig::armed();
    rig.run_for(29_000);
    assert_eq!(rig.now, 30_010);

    let beats: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Heartbeat { ticks, state } => Some((*ticks, *state)),
            _ => None,
        })
        .collect();
    assert_eq!(beats, vec![(30, SystemState::Monitoring)]);
    assert_eq!(rig.app.tick_count(), 30);
}

#[test]
fn verbose_heartbeat_every_ten_ticks() {
    let mut rig = Rig::armed();
    rig.command("VERBOSE ON").unwrap();
    assert!(rig.app.config().verbose_logging);

    rig.run_for(9_000);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::Heartbeat { ticks: 10, .. })),
        1
    );
}

#[test]
fn verbose_heartbeat_also_runs_while_idle() {
    let mut rig = Rig::new();
    rig.command("VERBOSE ON").unwrap();

    rig.run_for(10_000);
    assert_eq!(rig.state(), SystemState::Idle);
    assert_eq!(rig.app.tick_count(), 10);
    assert!(rig.sink.events.contains(&AppEvent::Heartbeat {
        ticks: 10,
        state: SystemState::Idle
    }));

    rig.command("VERBOSE OFF").unwrap();
    rig.run_for(30_000);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::Heartbeat { .. })),
        1
    );
}

#[test]
fn status_led_follows_tick() {
    let mut rig = Rig::new();
    rig.run_for(2_000);

    let leds: Vec<bool> = rig
        .hw
        .calls
        .iter()
        .filter_map(|c| match c {
            ActuatorCall::StatusLed(on) => Some(*on),
            _ => None,
        })
        .collect();
    assert_eq!(leds, vec![true, false]);
}

// ── Debounce ──────────────────────────────────────────────────

#[test]
fn bounce_inside_debounce_is_dropped() {
    let mut rig = Rig::armed();

    rig.set_motion(true);
    rig.step();
    assert!(rig.app.snapshot().motion_active);
    let committed_at = rig.app.snapshot().motion_last_change;

    // Release 10 ms later: inside the 50 ms window, flag drained, ignored.
    rig.set_motion(false);
    rig.step();
    assert!(rig.app.snapshot().motion_active);
    assert_eq!(rig.app.snapshot().motion_last_change, committed_at);

    // No new edge, no new commit.
    rig.run_for(200);
    assert!(rig.app.snapshot().motion_active);

    // The next edge past the window is accepted.
    rig.set_motion(false);
    rig.step();
    assert!(!rig.app.snapshot().motion_active);
    assert!(rig.app.snapshot().motion_previous);
}

#[test]
fn motion_notice_only_when_armed() {
    let mut rig = Rig::new();
    rig.run_for(100);
    rig.set_motion(true);
    rig.step();
    assert!(rig.app.snapshot().motion_active);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::Sensor(SensorNotice::Motion { .. }))),
        0
    );

    let mut rig = Rig::armed();
    rig.set_motion(true);
    rig.step();
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::Sensor(SensorNotice::Motion { active: true })));
}

#[test]
fn gas_line_danger_is_always_reported() {
    let mut rig = Rig::new();
    rig.run_for(100);
    rig.set_gas_line(false);
    rig.step();
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::Sensor(SensorNotice::GasLine { safe: false })));
}

// ── Clock wrap ────────────────────────────────────────────────

#[test]
fn windows_hold_across_clock_wrap() {
    let start = u32::MAX - 500;
    let mut rig = Rig::with(SystemConfig::default(), start);
    rig.command("ARM").unwrap();

    let arrived = rig.run_until_state(SystemState::Monitoring, 2_000);
    assert!(arrived < start, "clock should have wrapped");
    assert_eq!(arrived.wrapping_sub(start), 1_010);

    rig.set_motion(true);
    rig.step();
    assert!(rig.app.snapshot().motion_active);
    let requested = rig.now;
    let alert = rig.run_until_state(SystemState::Alert, 2_000);
    assert_eq!(alert.wrapping_sub(requested), 500);
}
