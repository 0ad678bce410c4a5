//! LCD presenter driven by real service events.

use peoplecounter::adapters::lcd_presenter::LcdPresenter;
use peoplecounter::app::events::{AppEvent, SensorReading};
use peoplecounter::app::ports::EventSink;
use peoplecounter::config::{DisplayMode, SystemConfig};
use peoplecounter::counting::occupancy::OccupancyEvent;
use peoplecounter::counting::{FlagState, SensorId};

use super::mock_hw::{FAR, MockDisplay, MockStore, NEAR, Rig};

fn presenter(mode: DisplayMode) -> LcdPresenter<MockDisplay> {
    LcdPresenter::new(MockDisplay::new(), mode, 1000)
}

fn idle_readings(inbound_cm: u32, outbound_cm: u32) -> [SensorReading; 2] {
    [
        SensorReading {
            sensor: SensorId::Inbound,
            distance_cm: inbound_cm,
            flag: FlagState::default(),
        },
        SensorReading {
            sensor: SensorId::Outbound,
            distance_cm: outbound_cm,
            flag: FlagState::default(),
        },
    ]
}

fn debug(at_ms: u64, inbound_cm: u32, outbound_cm: u32) -> AppEvent {
    AppEvent::SensorDebug {
        at_ms,
        readings: idle_readings(inbound_cm, outbound_cm),
    }
}

/// Replay everything a service run emitted into a presenter.
fn replay(rig: &Rig, p: &mut LcdPresenter<MockDisplay>) {
    for e in &rig.sink.events {
        p.emit(e);
    }
}

#[test]
fn welcome_banner_is_held_then_replaced() {
    let mut p = presenter(DisplayMode::Developer);
    p.emit(&AppEvent::Started {
        count: 0,
        capacity: 5,
    });
    assert_eq!(p.display().row(0), "    Welcome     ");
    assert_eq!(p.display().row(1), "    count: 0    ");

    p.emit(&debug(999, 120, 45));
    assert_eq!(p.display().row(0), "    Welcome     ");

    p.emit(&debug(1000, 120, 45));
    assert_eq!(p.display().row(0), "S1: 120cm   (0) ");
    assert_eq!(p.display().row(1), "S2: 45cm    (0) ");
}

#[test]
fn entry_message_from_a_real_crossing() {
    let mut rig = Rig::started(SystemConfig::default(), MockStore::default());
    rig.step(5000, FAR, NEAR);
    rig.step(5100, NEAR, FAR);

    let mut p = presenter(DisplayMode::Developer);
    replay(&rig, &mut p);
    assert_eq!(p.display().row(0), "Person entered! ");
    assert_eq!(p.display().row(1), "    count: 1    ");

    // Held for a second after the crossing.
    p.emit(&debug(6099, FAR, FAR));
    assert_eq!(p.display().row(0), "Person entered! ");
    p.emit(&debug(6100, FAR, FAR));
    assert_eq!(p.display().row(0), "S1: 200cm   (0) ");
}

#[test]
fn every_outcome_has_its_message() {
    let cases = [
        (OccupancyEvent::Entered(1), "Person entered! "),
        (OccupancyEvent::EnteredButFull, "   Room Full!   "),
        (OccupancyEvent::Exited(0), " Person exited! "),
        (OccupancyEvent::ExitedButAlreadyEmpty, " Ghost exited!? "),
    ];
    for (event, expected) in cases {
        let mut p = presenter(DisplayMode::Status);
        p.emit(&AppEvent::Occupancy {
            event,
            count: 1,
            capacity: 5,
            at_ms: 0,
        });
        assert_eq!(p.display().row(0), expected, "{:?}", event);
    }
}

#[test]
fn developer_frame_shows_room_full_at_capacity() {
    let mut p = presenter(DisplayMode::Developer);
    p.emit(&AppEvent::Started {
        count: 5,
        capacity: 5,
    });
    p.emit(&debug(2000, FAR, FAR));
    assert_eq!(p.display().row(0), "   Room Full    ");
    assert_eq!(p.display().row(1), "    count: 5    ");
}

#[test]
fn status_frame_tracks_light() {
    let mut rig = Rig::started(SystemConfig::default(), MockStore::default());
    rig.walk_in(2000);
    rig.step(4000, FAR, FAR);

    let mut p = presenter(DisplayMode::Status);
    replay(&rig, &mut p);
    assert_eq!(p.display().row(0), "People: 1       ");
    assert_eq!(p.display().row(1), "Light is On     ");
}

#[test]
fn unchanged_rows_are_not_rewritten() {
    let mut p = presenter(DisplayMode::Status);
    p.emit(&debug(0, FAR, FAR));
    let writes = p.display().writes;
    p.emit(&debug(100, FAR, FAR));
    p.emit(&debug(200, NEAR, FAR));
    assert_eq!(p.display().writes, writes);
}

#[test]
fn reinit_forces_a_full_redraw() {
    let mut p = presenter(DisplayMode::Status);
    p.emit(&debug(0, FAR, FAR));
    p.reinit();
    assert_eq!(p.display().reinits, 1);
    assert_eq!(p.display().row(0), "                ");

    p.emit(&debug(100, FAR, FAR));
    assert_eq!(p.display().row(0), "People: 0       ");
    assert_eq!(p.display().row(1), "Light is Off    ");
}

#[test]
fn display_faults_are_not_fatal() {
    let mut display = MockDisplay::new();
    display.fail = true;
    let mut p = LcdPresenter::new(display, DisplayMode::Developer, 0);
    p.emit(&debug(0, FAR, FAR));
    assert_eq!(p.shown(), [None, None]);
}
