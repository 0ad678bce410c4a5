//! Bounded occupancy counter.
//!
//! The count only moves through [`OccupancyCounter::apply`].  Entries past
//! capacity and exits from an empty room are reported, not applied, so
//! sensor noise can never push the count out of `[0, capacity]`.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{CrossingEvent, Direction};

/// Classified outcome of applying one crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccupancyEvent {
    /// Someone came in; carries the new count.
    Entered(u16),
    /// Entry seen while the room was already at capacity.
    EnteredButFull,
    /// Someone left; carries the new count.
    Exited(u16),
    /// Exit seen while the count was already zero.
    ExitedButAlreadyEmpty,
}

impl OccupancyEvent {
    /// True when the count actually changed.
    pub fn changed_count(&self) -> bool {
        matches!(self, Self::Entered(_) | Self::Exited(_))
    }
}

pub struct OccupancyCounter {
    count: u16,
    capacity: u16,
}

impl OccupancyCounter {
    /// An empty room.
    pub fn new(capacity: u16) -> Self {
        Self { count: 0, capacity }
    }

    /// Start from a persisted count.  Values above capacity (e.g. after the
    /// capacity was lowered) are clamped.
    pub fn restore(capacity: u16, count: u16) -> Self {
        if count > capacity {
            warn!(
                "occupancy: restored count {} exceeds capacity {}, clamping",
                count, capacity
            );
        }
        Self {
            count: count.min(capacity),
            capacity,
        }
    }

    pub fn apply(&mut self, crossing: &CrossingEvent) -> OccupancyEvent {
        match crossing.direction {
            Direction::Entry if self.count < self.capacity => {
                self.count += 1;
                info!("occupancy: entry, count={}/{}", self.count, self.capacity);
                OccupancyEvent::Entered(self.count)
            }
            Direction::Entry => {
                info!("occupancy: entry rejected, room full ({})", self.capacity);
                OccupancyEvent::EnteredButFull
            }
            Direction::Exit if self.count > 0 => {
                self.count -= 1;
                info!("occupancy: exit, count={}/{}", self.count, self.capacity);
                OccupancyEvent::Exited(self.count)
            }
            Direction::Exit => {
                warn!("occupancy: exit from empty room ignored");
                OccupancyEvent::ExitedButAlreadyEmpty
            }
        }
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn capacity(&self) -> u16 {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
