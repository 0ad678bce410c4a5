//! Mock hardware adapters for integration tests.
//!
//! Records every port call so tests can assert on the full history
//! without touching real GPIO or I²C.

use peoplecounter::app::events::AppEvent;
use peoplecounter::app::ports::{
    ClockPort, CounterStore, DisplayPort, DistanceSource, EventSink, RelayPort, StorageError,
};
use peoplecounter::app::service::AppService;
use peoplecounter::config::SystemConfig;
use peoplecounter::counting::SensorId;
use peoplecounter::counting::occupancy::OccupancyEvent;
use peoplecounter::error::{ActuatorError, DisplayError, SensorError};
use std::cell::Cell;

pub const FAR: u32 = 200;
pub const NEAR: u32 = 10;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub distances: [Result<u32, SensorError>; 2],
    pub reads: Vec<SensorId>,
    pub relay_calls: Vec<bool>,
    pub fail_relay: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            distances: [Ok(FAR), Ok(FAR)],
            reads: Vec::new(),
            relay_calls: Vec::new(),
            fail_relay: false,
        }
    }

    pub fn set(&mut self, inbound_cm: u32, outbound_cm: u32) {
        self.distances = [Ok(inbound_cm), Ok(outbound_cm)];
    }

    pub fn relay_on(&self) -> Option<bool> {
        self.relay_calls.last().copied()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl DistanceSource for MockHardware {
    fn read(&mut self, sensor: SensorId) -> Result<u32, SensorError> {
        self.reads.push(sensor);
        self.distances[sensor.index()]
    }
}

impl RelayPort for MockHardware {
    fn set_relay(&mut self, on: bool) -> Result<(), ActuatorError> {
        if self.fail_relay {
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.relay_calls.push(on);
        Ok(())
    }
}

// ── MockClock ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockClock(Cell<u64>);

#[allow(dead_code)]
impl MockClock {
    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }
}

impl ClockPort for MockClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

// ── MockStore ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockStore {
    pub stored: Option<u16>,
    pub loads: Cell<u32>,
    pub saves: Vec<u16>,
    pub fail_load: bool,
    pub fail_save: bool,
}

#[allow(dead_code)]
impl MockStore {
    pub fn with_count(count: u16) -> Self {
        Self {
            stored: Some(count),
            ..Default::default()
        }
    }
}

impl CounterStore for MockStore {
    fn load_count(&self) -> Result<Option<u16>, StorageError> {
        self.loads.set(self.loads.get() + 1);
        if self.fail_load {
            return Err(StorageError::IoError);
        }
        Ok(self.stored)
    }

    fn save_count(&mut self, count: u16) -> Result<(), StorageError> {
        if self.fail_save {
            return Err(StorageError::Full);
        }
        self.saves.push(count);
        self.stored = Some(count);
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn occupancy(&self) -> Vec<OccupancyEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Occupancy { event, .. } => Some(*event),
                _ => None,
            })
            .collect()
    }

    pub fn persistence_failures(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::PersistenceFailed(_)))
            .count()
    }

    pub fn relay_changes(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::RelayChanged(on) => Some(*on),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockDisplay ───────────────────────────────────────────────

pub struct MockDisplay {
    pub rows: [[char; 16]; 2],
    pub writes: usize,
    pub reinits: usize,
    pub fail: bool,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self {
            rows: [[' '; 16]; 2],
            writes: 0,
            reinits: 0,
            fail: false,
        }
    }

    pub fn row(&self, row: usize) -> String {
        self.rows[row].iter().collect()
    }
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for MockDisplay {
    fn reinit(&mut self) -> Result<(), DisplayError> {
        self.reinits += 1;
        self.clear()
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.rows = [[' '; 16]; 2];
        Ok(())
    }

    fn write_at(&mut self, col: u8, row: u8, text: &str) -> Result<(), DisplayError> {
        if self.fail {
            return Err(DisplayError::BusWriteFailed);
        }
        let line = self
            .rows
            .get_mut(usize::from(row))
            .ok_or(DisplayError::RowOutOfRange(row))?;
        for (slot, c) in line.iter_mut().skip(usize::from(col)).zip(text.chars()) {
            *slot = c;
        }
        self.writes += 1;
        Ok(())
    }
}

// ── Rig: a started service wired to mocks ─────────────────────

pub struct Rig {
    pub app: AppService,
    pub hw: MockHardware,
    pub clock: MockClock,
    pub store: MockStore,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: SystemConfig, store: MockStore) -> Self {
        Self {
            app: AppService::new(config),
            hw: MockHardware::new(),
            clock: MockClock::default(),
            store,
            sink: RecordingSink::default(),
        }
    }

    pub fn started(config: SystemConfig, store: MockStore) -> Self {
        let mut rig = Self::new(config, store);
        rig.app
            .start(&mut rig.store, &mut rig.hw, &rig.clock, &mut rig.sink);
        rig
    }

    /// One polling cycle at `t_ms` with the given readings.
    pub fn step(&mut self, t_ms: u64, inbound_cm: u32, outbound_cm: u32) -> Option<OccupancyEvent> {
        self.clock.set(t_ms);
        self.hw.set(inbound_cm, outbound_cm);
        self.app
            .tick(&mut self.hw, &self.clock, &mut self.store, &mut self.sink)
    }

    /// Corridor sensor, then room sensor.
    pub fn walk_in(&mut self, t_ms: u64) -> Option<OccupancyEvent> {
        self.step(t_ms, FAR, NEAR);
        self.step(t_ms + 100, NEAR, FAR)
    }

    /// Room sensor, then corridor sensor.
    pub fn walk_out(&mut self, t_ms: u64) -> Option<OccupancyEvent> {
        self.step(t_ms, NEAR, FAR);
        self.step(t_ms + 100, FAR, NEAR)
    }
}
