//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Presenters on the other
//! side decide what to do with them: log to serial, draw on the LCD.

use serde::Serialize;

use crate::counting::occupancy::OccupancyEvent;
use crate::counting::{FlagState, SensorId};

use super::ports::StorageError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the restored count).
    Started { count: u16, capacity: u16 },

    /// A crossing was applied to the counter.
    Occupancy {
        event: OccupancyEvent,
        count: u16,
        capacity: u16,
        at_ms: u64,
    },

    /// Per-cycle raw readings and flag state, for developer displays.
    SensorDebug {
        at_ms: u64,
        readings: [SensorReading; 2],
    },

    /// Stale flags cleared by the timeout supervisor this cycle.
    FlagsExpired { count: u8, at_ms: u64 },

    /// The light relay was switched.
    RelayChanged(bool),

    /// Loading or saving the count failed; running from memory.
    PersistenceFailed(StorageError),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// One sensor's view of the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReading {
    pub sensor: SensorId,
    /// [`NO_ECHO_CM`](crate::counting::NO_ECHO_CM) when no echo came back.
    pub distance_cm: u32,
    pub flag: FlagState,
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TelemetryData {
    pub uptime_ms: u64,
    pub count: u16,
    pub capacity: u16,
    pub light_on: bool,
    pub entries: u32,
    pub exits: u32,
    pub rejected_full: u32,
    pub ghost_exits: u32,
    pub flag_timeouts: u32,
    pub no_echo_reads: u32,
    pub cycles: u64,
}
