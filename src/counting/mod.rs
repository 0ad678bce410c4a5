//! Occupancy counting core: the two-sensor direction state machine.
//!
//! ```text
//!  DistanceSample x2 ──▶ DirectionDetector ──▶ CrossingEvent
//!                              ▲                    │
//!              FlagTimeoutSupervisor                ▼
//!              (sweeps the FlagBank)        OccupancyCounter ──▶ OccupancyEvent
//! ```
//!
//! A person walking through the doorway blocks one ultrasonic sensor and
//! then the other.  Each sensor owns an "armed" flag; arming the second
//! sensor while the first is still armed completes a crossing, and the
//! arming order decides its direction.  Nothing in here performs I/O.

pub mod detector;
pub mod occupancy;
pub mod supervisor;

use serde::{Deserialize, Serialize};

/// Distance reported when a sensor produced no echo.  Never "close".
pub const NO_ECHO_CM: u32 = u32::MAX;

// ---------------------------------------------------------------------------
// Sensor identity
// ---------------------------------------------------------------------------

/// One of the two doorway sensors.
///
/// `Inbound` sits on the room side of the doorway (sensor "A", shown as
/// `S1`); `Outbound` faces the corridor (sensor "B", shown as `S2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorId {
    Inbound,
    Outbound,
}

impl SensorId {
    /// Both sensors in polling order.
    pub const ALL: [SensorId; 2] = [SensorId::Inbound, SensorId::Outbound];

    /// Index into per-sensor arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::Inbound => 0,
            Self::Outbound => 1,
        }
    }

    /// The companion sensor.
    pub const fn other(self) -> Self {
        match self {
            Self::Inbound => Self::Outbound,
            Self::Outbound => Self::Inbound,
        }
    }

    /// Short label used on the display and in logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inbound => "S1",
            Self::Outbound => "S2",
        }
    }
}

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

/// One distance reading taken during a polling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceSample {
    pub sensor: SensorId,
    pub distance_cm: u32,
    pub timestamp_ms: u64,
}

impl DistanceSample {
    pub fn new(sensor: SensorId, distance_cm: u32, timestamp_ms: u64) -> Self {
        Self {
            sensor,
            distance_cm,
            timestamp_ms,
        }
    }

    /// A reading that timed out waiting for its echo.
    pub fn no_echo(sensor: SensorId, timestamp_ms: u64) -> Self {
        Self::new(sensor, NO_ECHO_CM, timestamp_ms)
    }

    pub fn is_no_echo(&self) -> bool {
        self.distance_cm == NO_ECHO_CM
    }
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// Per-sensor trigger flag.  `armed_at_ms` is only meaningful while armed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagState {
    pub armed: bool,
    pub armed_at_ms: u64,
}

impl FlagState {
    fn arm(&mut self, at_ms: u64) {
        self.armed = true;
        self.armed_at_ms = at_ms;
    }

    fn clear(&mut self) {
        self.armed = false;
        self.armed_at_ms = 0;
    }
}

/// The flag pair plus the post-crossing latch used by
/// [`ResetPolicy::UntilClear`].
///
/// Owned by the [`DirectionDetector`](detector::DirectionDetector); the
/// [`FlagTimeoutSupervisor`](supervisor::FlagTimeoutSupervisor) is the
/// only other writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagBank {
    flags: [FlagState; 2],
    latched: bool,
}

impl FlagBank {
    pub fn get(&self, sensor: SensorId) -> FlagState {
        self.flags[sensor.index()]
    }

    pub fn is_armed(&self, sensor: SensorId) -> bool {
        self.flags[sensor.index()].armed
    }

    pub fn any_armed(&self) -> bool {
        self.flags.iter().any(|f| f.armed)
    }

    /// True while a completed crossing waits for both sensors to clear.
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Clear a flag that outlived its timeout.  Expiring any flag of a
    /// latched bank releases the whole bank.
    pub fn expire(&mut self, sensor: SensorId) {
        if self.latched {
            self.clear_all();
        } else {
            self.flags[sensor.index()].clear();
        }
    }

    fn arm(&mut self, sensor: SensorId, at_ms: u64) {
        self.flags[sensor.index()].arm(at_ms);
    }

    fn latch(&mut self) {
        self.latched = true;
    }

    fn clear_all(&mut self) {
        for flag in &mut self.flags {
            flag.clear();
        }
        self.latched = false;
    }
}

// ---------------------------------------------------------------------------
// Crossings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Entry,
    Exit,
}

/// A completed pass through the doorway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossingEvent {
    pub direction: Direction,
    /// The sensor whose arming completed the crossing.
    pub completed_by: SensorId,
    pub at_ms: u64,
}

/// Which arming order counts as an entry.
///
/// `entry_first` is the sensor a person walking *into* the room blocks
/// first.  Completing a crossing on the other sensor is an entry;
/// completing on `entry_first` itself is an exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionMapping {
    pub entry_first: SensorId,
}

impl DirectionMapping {
    pub const fn new(entry_first: SensorId) -> Self {
        Self { entry_first }
    }

    pub fn direction_completed_by(&self, completed_by: SensorId) -> Direction {
        if completed_by == self.entry_first {
            Direction::Exit
        } else {
            Direction::Entry
        }
    }
}

impl Default for DirectionMapping {
    /// Corridor sensor first, then room sensor: walking in.
    fn default() -> Self {
        Self::new(SensorId::Outbound)
    }
}

/// What happens to the flag pair once a crossing completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetPolicy {
    /// Clear both flags in the same cycle that completes the crossing.
    #[default]
    OnCompletion,
    /// Keep both flags armed until a cycle in which neither sensor reads
    /// close, then clear them.  Nothing arms in the meantime.
    UntilClear,
}
