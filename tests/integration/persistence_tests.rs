//! Count persistence: restore on start, save on change, survive storage
//! faults.

use peoplecounter::adapters::nvs::NvsAdapter;
use peoplecounter::app::events::AppEvent;
use peoplecounter::app::ports::{CounterStore, StorageError};
use peoplecounter::app::service::AppService;
use peoplecounter::config::SystemConfig;
use peoplecounter::counting::occupancy::OccupancyEvent;

use super::mock_hw::{FAR, MockClock, MockHardware, MockStore, NEAR, RecordingSink, Rig};

#[test]
fn restores_stored_count_and_lights_up() {
    let rig = Rig::started(SystemConfig::default(), MockStore::with_count(3));
    assert_eq!(rig.app.count(), 3);
    assert_eq!(rig.hw.relay_calls, vec![true]);
    assert!(rig.store.saves.is_empty());
}

#[test]
fn first_boot_marks_store_initialised() {
    let rig = Rig::started(SystemConfig::default(), MockStore::default());
    assert_eq!(rig.app.count(), 0);
    assert_eq!(rig.store.saves, vec![0]);
    assert_eq!(rig.store.stored, Some(0));
}

#[test]
fn restored_count_above_capacity_is_clamped() {
    let rig = Rig::started(SystemConfig::default(), MockStore::with_count(40));
    assert_eq!(rig.app.count(), 5);
    assert!(rig.app.is_full());
}

#[test]
fn load_failure_starts_empty_and_reports() {
    let store = MockStore {
        stored: Some(4),
        fail_load: true,
        ..Default::default()
    };
    let mut rig = Rig::started(SystemConfig::default(), store);
    assert_eq!(rig.app.count(), 0);
    assert_eq!(rig.sink.persistence_failures(), 1);
    assert!(
        rig.sink
            .events
            .contains(&AppEvent::PersistenceFailed(StorageError::IoError))
    );

    // Still counting.
    assert_eq!(rig.walk_in(1000), Some(OccupancyEvent::Entered(1)));
}

#[test]
fn every_change_is_saved_and_nothing_else() {
    let config = SystemConfig {
        room_capacity: 1,
        ..Default::default()
    };
    let mut rig = Rig::started(config, MockStore::with_count(0));
    rig.walk_out(0); // ghost
    rig.walk_in(1000); // 1
    rig.walk_in(2000); // full
    rig.walk_out(3000); // 0
    rig.step(4000, FAR, FAR);
    assert_eq!(rig.store.saves, vec![1, 0]);
}

#[test]
fn save_failure_keeps_counting_in_memory() {
    let mut rig = Rig::started(SystemConfig::default(), MockStore::with_count(0));
    rig.store.fail_save = true;
    assert_eq!(rig.walk_in(1000), Some(OccupancyEvent::Entered(1)));
    assert_eq!(rig.walk_in(2000), Some(OccupancyEvent::Entered(2)));
    assert_eq!(rig.app.count(), 2);
    assert_eq!(rig.sink.persistence_failures(), 2);
    assert_eq!(rig.store.stored, Some(0));
}

#[test]
fn persistence_can_be_disabled() {
    let config = SystemConfig {
        persist_count: false,
        ..Default::default()
    };
    let mut rig = Rig::started(config, MockStore::with_count(3));
    assert_eq!(rig.app.count(), 0);
    rig.walk_in(1000);
    assert_eq!(rig.store.loads.get(), 0);
    assert!(rig.store.saves.is_empty());
}

#[test]
fn count_survives_a_reboot_through_nvs() {
    let mut nvs = NvsAdapter::new().unwrap();
    let clock = MockClock::default();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();

    let mut app = AppService::new(SystemConfig::default());
    app.start(&mut nvs, &mut hw, &clock, &mut sink);
    for (t, inbound, outbound) in [(0, FAR, NEAR), (100, NEAR, FAR), (200, FAR, FAR)] {
        clock.set(t);
        hw.set(inbound, outbound);
        app.tick(&mut hw, &clock, &mut nvs, &mut sink);
    }
    assert_eq!(app.count(), 1);

    // Same flash, fresh service.
    let mut rebooted = AppService::new(SystemConfig::default());
    rebooted.start(&mut nvs, &mut hw, &clock, &mut sink);
    assert_eq!(rebooted.count(), 1);
    assert_eq!(nvs.load_count(), Ok(Some(1)));
}
