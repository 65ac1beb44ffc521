//! End-to-end scenarios on the simulated clock: escalation, alarm timeout,
//! disarm override, analog triggers.  The loop runs every 10 ms and the
//! rig is armed at t=0, so Monitoring is committed at t=1010.

use homewatch::app::events::AppEvent;
use homewatch::fsm::triggers::Trigger;
use homewatch::fsm::{Cause, SystemState};
use homewatch::sensors::SensorNotice;

use crate::mock_hw::{ActuatorCall, Rig};

/// Armed rig with motion and gas-line danger asserted at t=1100, run until
/// the alarm commits.
fn rig_in_alarm() -> Rig {
    let mut rig = Rig::armed();
    rig.run_for(90);
    rig.set_motion_and_gas_line(true, false);
    let at = rig.run_until_state(SystemState::Alarm, 5_000);
    assert_eq!(at, 3_620);
    rig
}

fn last_change(rig: &Rig) -> Option<(SystemState, SystemState, Cause)> {
    rig.sink.events.iter().rev().find_map(|e| match e {
        AppEvent::StateChanged { from, to, cause, .. } => Some((*from, *to, *cause)),
        _ => None,
    })
}

// ── Escalation ────────────────────────────────────────────────

#[test]
fn motion_with_gas_danger_escalates_to_alarm() {
    let mut rig = Rig::armed();
    rig.run_for(90);
    assert_eq!(rig.now, 1_100);
    rig.set_motion_and_gas_line(true, false);

    assert_eq!(rig.run_until_state(SystemState::Alert, 1_000), 1_610);
    let Some(AppEvent::StateChanged { triggers, cause, .. }) = rig
        .sink
        .events
        .iter()
        .rev()
        .find(|e| matches!(e, AppEvent::StateChanged { .. }))
    else {
        panic!("no transition recorded");
    };
    assert_eq!(*cause, Cause::Triggered);
    assert!(triggers.contains(Trigger::Motion));
    assert!(triggers.contains(Trigger::GasLineUnsafe));

    // Alarm needs its longer window.
    rig.run_for(2_000);
    assert_eq!(rig.now, 3_610);
    assert_eq!(rig.state(), SystemState::Alert);
    assert_eq!(rig.app.pending_target(), Some(SystemState::Alarm));

    rig.step();
    assert_eq!(rig.now, 3_620);
    assert_eq!(rig.state(), SystemState::Alarm);
    assert_eq!(
        last_change(&rig),
        Some((SystemState::Alert, SystemState::Alarm, Cause::Escalated))
    );
    assert!(rig.app.flags().alarm_active);
    assert_eq!(rig.app.flags().alarm_start_time, 3_620);
    assert!(rig.hw.buzzer_on());
}

#[test]
fn two_independent_triggers_escalate() {
    let mut rig = Rig::armed();
    rig.hw.temperature_c = 40.0;

    // Picked up by the 2 s analog poll.
    assert_eq!(rig.run_until_state(SystemState::Alert, 2_000), 2_500);
    assert!(rig.sink.events.contains(&AppEvent::Sensor(
        SensorNotice::TemperatureOutOfRange { celsius: 40.0 }
    )));

    rig.run_for(100);
    rig.set_motion(true);
    rig.step();
    assert_eq!(rig.now, 2_610);
    assert_eq!(rig.run_until_state(SystemState::Alarm, 3_000), 4_610);
}

#[test]
fn single_trigger_holds_alert() {
    let mut rig = Rig::armed();
    rig.hw.gas_reading = 600;

    assert_eq!(rig.run_until_state(SystemState::Alert, 2_000), 2_500);
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::Sensor(SensorNotice::GasHigh { reading: 600 })));

    rig.run_for(10_000);
    assert_eq!(rig.state(), SystemState::Alert);
    assert_eq!(rig.app.pending_target(), None);
    // Warning is edge-triggered: one notice for one crossing.
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::Sensor(SensorNotice::GasHigh { .. }))),
        1
    );
}

#[test]
fn alert_blinks_alarm_led_with_status_phase() {
    let mut rig = Rig::armed();
    rig.hw.gas_reading = 600;
    rig.run_until_state(SystemState::Alert, 2_000);
    rig.hw.calls.clear();

    rig.run_for(3_000);

    let phases: Vec<bool> = rig
        .hw
        .calls
        .iter()
        .filter_map(|c| match c {
            ActuatorCall::Outputs {
                state: SystemState::Alert,
                alarm_active,
                blink,
            } => {
                assert!(!alarm_active);
                Some(*blink)
            }
            _ => None,
        })
        .collect();
    assert!(phases.contains(&true));
    assert!(phases.contains(&false));
}

// ── De-escalation ─────────────────────────────────────────────

#[test]
fn cleared_alert_returns_to_monitoring() {
    let mut rig = Rig::armed();
    rig.run_for(90);
    rig.set_motion(true);
    assert_eq!(rig.run_until_state(SystemState::Alert, 1_000), 1_610);

    rig.run_for(390);
    rig.set_motion(false);
    rig.step();
    assert_eq!(rig.now, 2_010);
    assert!(!rig.app.snapshot().motion_active);

    assert_eq!(rig.run_until_state(SystemState::Monitoring, 2_000), 3_010);
    assert_eq!(
        last_change(&rig),
        Some((SystemState::Alert, SystemState::Monitoring, Cause::Cleared))
    );
}

#[test]
fn short_blip_never_reaches_alert() {
    let mut rig = Rig::armed();
    rig.run_for(90);
    rig.set_motion(true);
    rig.run_for(200);
    rig.set_motion(false);
    rig.run_for(2_000);

    assert_eq!(rig.state(), SystemState::Monitoring);
    assert_eq!(rig.sink.transitions(), vec![(SystemState::Idle, SystemState::Monitoring)]);
}

// ── Alarm timeout round trip ──────────────────────────────────

#[test]
fn alarm_times_out_back_to_monitoring() {
    let mut rig = rig_in_alarm();

    // Scene clears while the alarm sounds; alarm keeps going.
    rig.run_for(380);
    rig.set_motion_and_gas_line(false, true);
    rig.step();
    assert_eq!(rig.state(), SystemState::Alarm);
    assert!(rig.app.flags().alarm_active);

    rig.run_for(9_610);
    assert_eq!(rig.now, 13_620);
    assert!(rig.app.flags().alarm_active, "exactly the timeout is not yet expired");

    rig.step();
    assert_eq!(rig.now, 13_630);
    assert!(!rig.app.flags().alarm_active, "silenced as soon as expired");
    assert_eq!(rig.state(), SystemState::Alarm);
    assert_eq!(rig.app.pending_target(), Some(SystemState::Monitoring));
    assert_eq!(
        rig.hw.last_outputs(),
        Some(ActuatorCall::Outputs {
            state: SystemState::Alarm,
            alarm_active: false,
            blink: rig.capture.status_toggle(),
        })
    );

    assert_eq!(rig.run_until_state(SystemState::Monitoring, 2_000), 14_630);
    assert_eq!(
        last_change(&rig),
        Some((SystemState::Alarm, SystemState::Monitoring, Cause::AlarmTimeout))
    );

    rig.run_for(3_000);
    assert_eq!(rig.state(), SystemState::Monitoring);
    assert_eq!(
        rig.sink.transitions(),
        vec![
            (SystemState::Idle, SystemState::Monitoring),
            (SystemState::Monitoring, SystemState::Alert),
            (SystemState::Alert, SystemState::Alarm),
            (SystemState::Alarm, SystemState::Monitoring),
        ]
    );
}

#[test]
fn runtime_config_shortens_alarm() {
    let mut rig = rig_in_alarm();
    rig.command(r#"CONFIG {"alarm_timeout_ms": 3000}"#).unwrap();

    rig.run_for(3_000);
    assert!(rig.app.flags().alarm_active);
    rig.step();
    assert!(!rig.app.flags().alarm_active);
}

// ── Disarm override ───────────────────────────────────────────

#[test]
fn disarm_silences_alarm_immediately() {
    let mut rig = rig_in_alarm();
    rig.run_for(500);

    rig.command("DISARM").unwrap();

    assert_eq!(rig.state(), SystemState::Idle);
    assert!(!rig.app.flags().armed);
    assert!(!rig.app.flags().alarm_active);
    assert_eq!(rig.app.pending_target(), None);
    assert_eq!(
        rig.hw.last_outputs(),
        Some(ActuatorCall::Outputs {
            state: SystemState::Idle,
            alarm_active: false,
            blink: false,
        })
    );
    assert_eq!(
        last_change(&rig),
        Some((SystemState::Alarm, SystemState::Idle, Cause::Disarmed))
    );

    // Sensors still tripped, but disarmed means Idle.
    rig.run_for(5_000);
    assert_eq!(rig.state(), SystemState::Idle);
    assert!(!rig.hw.buzzer_on());
}

#[test]
fn rearm_after_disarm_starts_over() {
    let mut rig = rig_in_alarm();
    rig.command("DISARM").unwrap();
    rig.set_motion_and_gas_line(false, true);
    rig.run_for(100);

    rig.command("ARM").unwrap();
    let requested = rig.now;
    let at = rig.run_until_state(SystemState::Monitoring, 2_000);
    assert_eq!(at - requested, 1_010);
}
