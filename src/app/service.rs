//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the direction detector, the occupancy counter and
//! the flag timeout supervisor.  It exposes a clean, hardware-agnostic
//! API.  All I/O flows through port traits injected at call sites, making
//! the entire service testable with mock adapters.
//!
//! ```text
//!  DistanceSource ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!       ClockPort ──▶ │          AppService           │
//!       RelayPort ◀── │ Supervisor · Detector · Count │ ──▶ CounterStore
//!                     └──────────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::counting::detector::DirectionDetector;
use crate::counting::occupancy::{OccupancyCounter, OccupancyEvent};
use crate::counting::supervisor::FlagTimeoutSupervisor;
use crate::counting::{DistanceSample, FlagBank, NO_ECHO_CM, SensorId};

use super::events::{AppEvent, SensorReading, TelemetryData};
use super::ports::{ClockPort, CounterStore, DistanceSource, EventSink, RelayPort};

/// Running totals since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterStats {
    pub entries: u32,
    pub exits: u32,
    pub rejected_full: u32,
    pub ghost_exits: u32,
    pub flag_timeouts: u32,
    pub no_echo_reads: u32,
    pub cycles: u64,
}

impl CounterStats {
    fn record(&mut self, event: OccupancyEvent) {
        let slot = match event {
            OccupancyEvent::Entered(_) => &mut self.entries,
            OccupancyEvent::EnteredButFull => &mut self.rejected_full,
            OccupancyEvent::Exited(_) => &mut self.exits,
            OccupancyEvent::ExitedButAlreadyEmpty => &mut self.ghost_exits,
        };
        *slot = slot.saturating_add(1);
    }
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all counting logic.
pub struct AppService {
    config: SystemConfig,
    detector: DirectionDetector,
    counter: OccupancyCounter,
    supervisor: FlagTimeoutSupervisor,
    /// Last state successfully written to the relay.  `None` until the
    /// first write succeeds.
    relay_on: Option<bool>,
    readings: [SensorReading; 2],
    stats: CounterStats,
    last_telemetry_ms: u64,
}

impl AppService {
    /// Construct the service from configuration with an empty room.
    ///
    /// Does **not** touch hardware or storage: call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let detector = DirectionDetector::new(
            config.detect_distance_threshold_cm,
            config.detection_mapping(),
            config.reset_policy,
        );
        let counter = OccupancyCounter::new(config.room_capacity);
        let supervisor = FlagTimeoutSupervisor::new(config.flag_timeout_ms);
        let readings = SensorId::ALL.map(|sensor| SensorReading {
            sensor,
            distance_cm: NO_ECHO_CM,
            flag: Default::default(),
        });

        Self {
            config,
            detector,
            counter,
            supervisor,
            relay_on: None,
            readings,
            stats: CounterStats::default(),
            last_telemetry_ms: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Restore the persisted count, synchronise the relay and announce
    /// the start.
    pub fn start(
        &mut self,
        store: &mut impl CounterStore,
        relay: &mut impl RelayPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        if self.config.persist_count {
            self.restore_count(store, sink);
        }

        self.sync_relay(relay, sink);
        self.last_telemetry_ms = clock.now_ms();

        sink.emit(&AppEvent::Started {
            count: self.counter.count(),
            capacity: self.counter.capacity(),
        });
        info!(
            "AppService started: count={}/{} policy={:?} timeout={}ms",
            self.counter.count(),
            self.counter.capacity(),
            self.detector.policy(),
            self.supervisor.timeout_ms()
        );
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one polling cycle:
    /// sweep → read both sensors → detect → count → persist → relay → report.
    ///
    /// The `hw` parameter satisfies **both** [`DistanceSource`] and
    /// [`RelayPort`], since one adapter owns the sensors and the relay.
    ///
    /// Returns the occupancy outcome when a crossing completed.
    pub fn tick(
        &mut self,
        hw: &mut (impl DistanceSource + RelayPort),
        clock: &impl ClockPort,
        store: &mut impl CounterStore,
        sink: &mut impl EventSink,
    ) -> Option<OccupancyEvent> {
        self.stats.cycles += 1;
        let cycle_start = clock.now_ms();

        // 1. Stale flags go first, before anything can arm this cycle.
        let expired = self.supervisor.sweep(self.detector.flags_mut(), cycle_start);
        if !expired.is_empty() {
            self.stats.flag_timeouts = self
                .stats
                .flag_timeouts
                .saturating_add(expired.len() as u32);
            sink.emit(&AppEvent::FlagsExpired {
                count: expired.len() as u8,
                at_ms: cycle_start,
            });
        }

        // 2. Range both sensors, in order.
        let samples = SensorId::ALL.map(|sensor| self.sample(hw, clock, sensor));

        // 3. Detect → count.
        let outcome = self.detector.observe(&samples).map(|crossing| {
            let event = self.counter.apply(&crossing);
            self.stats.record(event);
            (event, crossing.at_ms)
        });

        if let Some((event, at_ms)) = outcome {
            // 4. Persist only real changes.
            if event.changed_count() && self.config.persist_count {
                if let Err(e) = store.save_count(self.counter.count()) {
                    warn!("count save failed: {}", e);
                    sink.emit(&AppEvent::PersistenceFailed(e));
                }
            }
            sink.emit(&AppEvent::Occupancy {
                event,
                count: self.counter.count(),
                capacity: self.counter.capacity(),
                at_ms,
            });
        }

        // 5. Relay follows occupancy.
        self.sync_relay(hw, sink);

        // 6. Report.
        let flags = *self.detector.flags();
        for (reading, sample) in self.readings.iter_mut().zip(samples.iter()) {
            reading.distance_cm = sample.distance_cm;
            reading.flag = flags.get(reading.sensor);
        }
        let now = clock.now_ms();
        sink.emit(&AppEvent::SensorDebug {
            at_ms: now,
            readings: self.readings,
        });

        let interval_ms = u64::from(self.config.telemetry_interval_secs) * 1000;
        if now.saturating_sub(self.last_telemetry_ms) >= interval_ms {
            self.last_telemetry_ms = now;
            sink.emit(&AppEvent::Telemetry(self.build_telemetry(now)));
        }

        outcome.map(|(event, _)| event)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot.
    pub fn build_telemetry(&self, uptime_ms: u64) -> TelemetryData {
        TelemetryData {
            uptime_ms,
            count: self.counter.count(),
            capacity: self.counter.capacity(),
            light_on: self.light_on(),
            entries: self.stats.entries,
            exits: self.stats.exits,
            rejected_full: self.stats.rejected_full,
            ghost_exits: self.stats.ghost_exits,
            flag_timeouts: self.stats.flag_timeouts,
            no_echo_reads: self.stats.no_echo_reads,
            cycles: self.stats.cycles,
        }
    }

    /// People currently in the room.
    pub fn count(&self) -> u16 {
        self.counter.count()
    }

    pub fn capacity(&self) -> u16 {
        self.counter.capacity()
    }

    pub fn is_full(&self) -> bool {
        self.counter.is_full()
    }

    /// Last relay state that reached the hardware.
    pub fn light_on(&self) -> bool {
        self.relay_on.unwrap_or(false)
    }

    pub fn flags(&self) -> &FlagBank {
        self.detector.flags()
    }

    /// Readings from the most recent cycle.
    pub fn readings(&self) -> &[SensorReading; 2] {
        &self.readings
    }

    pub fn stats(&self) -> CounterStats {
        self.stats
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn restore_count(&mut self, store: &mut impl CounterStore, sink: &mut impl EventSink) {
        match store.load_count() {
            Ok(Some(count)) => {
                self.counter = OccupancyCounter::restore(self.config.room_capacity, count);
                info!("restored count {}", self.counter.count());
            }
            Ok(None) => {
                info!("no stored count, initialising store at 0");
                if let Err(e) = store.save_count(0) {
                    warn!("count store init failed: {}", e);
                    sink.emit(&AppEvent::PersistenceFailed(e));
                }
            }
            Err(e) => {
                warn!("count load failed ({}), starting from 0", e);
                sink.emit(&AppEvent::PersistenceFailed(e));
            }
        }
    }

    fn sample(
        &mut self,
        source: &mut impl DistanceSource,
        clock: &impl ClockPort,
        sensor: SensorId,
    ) -> DistanceSample {
        let result = source.read(sensor);
        let at_ms = clock.now_ms();
        match result {
            Ok(cm) if cm != NO_ECHO_CM => DistanceSample::new(sensor, cm, at_ms),
            Ok(_) => {
                self.stats.no_echo_reads = self.stats.no_echo_reads.saturating_add(1);
                DistanceSample::no_echo(sensor, at_ms)
            }
            Err(e) => {
                debug!("{} read failed: {}", sensor.label(), e);
                self.stats.no_echo_reads = self.stats.no_echo_reads.saturating_add(1);
                DistanceSample::no_echo(sensor, at_ms)
            }
        }
    }

    /// Drive the relay to match occupancy.  Only writes on a 0↔nonzero
    /// change; a failed write is retried next cycle.
    fn sync_relay(&mut self, relay: &mut impl RelayPort, sink: &mut impl EventSink) {
        let want = !self.counter.is_empty();
        if self.relay_on == Some(want) {
            return;
        }
        match relay.set_relay(want) {
            Ok(()) => {
                self.relay_on = Some(want);
                info!("light {}", if want { "on" } else { "off" });
                sink.emit(&AppEvent::RelayChanged(want));
            }
            Err(e) => warn!("relay write failed: {}", e),
        }
    }
}
