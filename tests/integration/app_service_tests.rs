//! AppService against mock hardware: cycle order, relay, sensor faults,
//! reset policies and telemetry.

use peoplecounter::app::events::AppEvent;
use peoplecounter::config::SystemConfig;
use peoplecounter::counting::occupancy::OccupancyEvent;
use peoplecounter::counting::{NO_ECHO_CM, SensorId};
use peoplecounter::error::SensorError;

use super::mock_hw::{FAR, MockStore, NEAR, Rig};

#[test]
fn reads_inbound_then_outbound_every_cycle() {
    let mut rig = Rig::started(SystemConfig::default(), MockStore::default());
    rig.step(0, FAR, FAR);
    rig.step(100, FAR, FAR);
    assert_eq!(
        rig.hw.reads,
        vec![
            SensorId::Inbound,
            SensorId::Outbound,
            SensorId::Inbound,
            SensorId::Outbound
        ]
    );
}

#[test]
fn relay_follows_empty_to_occupied_transitions_only() {
    let mut rig = Rig::started(SystemConfig::default(), MockStore::default());
    assert_eq!(rig.hw.relay_calls, vec![false]);

    assert_eq!(rig.walk_in(1000), Some(OccupancyEvent::Entered(1)));
    assert_eq!(rig.walk_in(2000), Some(OccupancyEvent::Entered(2)));
    assert_eq!(rig.walk_out(3000), Some(OccupancyEvent::Exited(1)));
    assert_eq!(rig.hw.relay_calls, vec![false, true]);

    assert_eq!(rig.walk_out(4000), Some(OccupancyEvent::Exited(0)));
    assert_eq!(rig.hw.relay_calls, vec![false, true, false]);
    assert_eq!(rig.sink.relay_changes(), vec![false, true, false]);
}

#[test]
fn failed_relay_write_is_retried_next_cycle() {
    let mut rig = Rig::started(SystemConfig::default(), MockStore::default());
    rig.hw.fail_relay = true;
    assert_eq!(rig.walk_in(1000), Some(OccupancyEvent::Entered(1)));
    assert!(!rig.app.light_on());

    rig.hw.fail_relay = false;
    rig.step(1200, FAR, FAR);
    assert!(rig.app.light_on());
    assert_eq!(rig.hw.relay_on(), Some(true));
}

#[test]
fn echo_timeout_never_arms() {
    let mut rig = Rig::started(SystemConfig::default(), MockStore::default());
    rig.hw.distances = [Ok(NEAR), Err(SensorError::EchoTimeout)];
    rig.app
        .tick(&mut rig.hw, &rig.clock, &mut rig.store, &mut rig.sink);

    assert!(rig.app.flags().is_armed(SensorId::Inbound));
    assert!(!rig.app.flags().is_armed(SensorId::Outbound));
    assert_eq!(rig.app.readings()[1].distance_cm, NO_ECHO_CM);
    assert_eq!(rig.app.stats().no_echo_reads, 1);
}

#[test]
fn sensor_debug_reports_flags_after_the_cycle() {
    let mut rig = Rig::started(SystemConfig::default(), MockStore::default());
    rig.step(500, FAR, NEAR);
    let last = rig
        .sink
        .events
        .iter()
        .rev()
        .find_map(|e| match e {
            AppEvent::SensorDebug { readings, at_ms } => Some((*readings, *at_ms)),
            _ => None,
        })
        .expect("debug event every cycle");

    let (readings, at_ms) = last;
    assert_eq!(at_ms, 500);
    assert_eq!(readings[0].distance_cm, FAR);
    assert!(!readings[0].flag.armed);
    assert_eq!(readings[1].distance_cm, NEAR);
    assert!(readings[1].flag.armed);
    assert_eq!(readings[1].flag.armed_at_ms, 500);
}

#[test]
fn mirrored_mapping_swaps_directions() {
    let config = SystemConfig {
        entry_sensor: SensorId::Inbound,
        ..Default::default()
    };
    let mut rig = Rig::started(config, MockStore::default());
    // Room sensor first is now the way in.
    assert_eq!(rig.walk_out(1000), Some(OccupancyEvent::Entered(1)));
    assert_eq!(rig.walk_in(2000), Some(OccupancyEvent::Exited(0)));
}

#[test]
fn deferred_reset_waits_for_both_sensors_to_clear() {
    let mut rig = Rig::started(SystemConfig::deferred_reset(), MockStore::default());

    rig.step(0, FAR, NEAR);
    assert_eq!(rig.step(100, NEAR, NEAR), Some(OccupancyEvent::Entered(1)));
    assert!(rig.app.flags().is_latched());

    // Person still in the doorway: nothing new, however long the reads bounce.
    assert_eq!(rig.step(200, NEAR, FAR), None);
    assert_eq!(rig.step(300, FAR, NEAR), None);
    assert_eq!(rig.step(400, NEAR, FAR), None);
    assert_eq!(rig.app.count(), 1);

    // Both clear: released.
    assert_eq!(rig.step(500, FAR, FAR), None);
    assert!(!rig.app.flags().any_armed());

    assert_eq!(rig.walk_out(600), Some(OccupancyEvent::Exited(0)));
}

#[test]
fn deferred_reset_latch_expires_with_the_short_window() {
    let mut rig = Rig::started(SystemConfig::deferred_reset(), MockStore::default());
    rig.step(0, FAR, NEAR);
    rig.step(100, NEAR, NEAR);
    assert!(rig.app.flags().is_latched());

    // Someone stands in the doorway past the 3500 ms window.
    rig.step(3500, NEAR, NEAR);
    assert!(rig.app.flags().is_latched());
    rig.step(3501, FAR, FAR);
    assert!(!rig.app.flags().is_latched());
    assert_eq!(rig.app.stats().flag_timeouts, 1);
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::FlagsExpired { count: 1, at_ms: 3501 }
    )));
}

#[test]
fn stats_track_every_outcome() {
    let config = SystemConfig {
        room_capacity: 1,
        ..Default::default()
    };
    let mut rig = Rig::started(config, MockStore::default());
    rig.walk_out(0);
    rig.walk_in(1000);
    rig.walk_in(2000);
    rig.walk_out(3000);

    let stats = rig.app.stats();
    assert_eq!(stats.ghost_exits, 1);
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.rejected_full, 1);
    assert_eq!(stats.exits, 1);
    assert_eq!(stats.cycles, 8);
}

#[test]
fn telemetry_snapshot_reflects_state() {
    let config = SystemConfig {
        telemetry_interval_secs: 5,
        ..Default::default()
    };
    let mut rig = Rig::started(config, MockStore::default());
    rig.walk_in(1000);
    rig.step(5000, FAR, FAR);

    let t = rig
        .sink
        .events
        .iter()
        .find_map(|e| match e {
            AppEvent::Telemetry(t) => Some(*t),
            _ => None,
        })
        .expect("telemetry after 5 s");
    assert_eq!(t.count, 1);
    assert_eq!(t.capacity, 5);
    assert!(t.light_on);
    assert_eq!(t.entries, 1);
    assert_eq!(t.uptime_ms, 5000);
}
