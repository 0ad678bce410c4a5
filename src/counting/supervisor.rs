//! Flag timeout supervisor.
//!
//! Runs **every cycle before the detector**.  A flag that has been armed
//! for longer than the timeout without its companion ever arming (someone
//! lingered, turned back, or a false trip) is cleared so it cannot block
//! the next detection.
//!
//! The comparison is strict: a flag armed at `T` survives a sweep at
//! `T + timeout` and clears at the first sweep after it.  Clearing is pure
//! local state correction and cannot fail.

use heapless::Vec;
use log::debug;

use super::{FlagBank, SensorId};

pub struct FlagTimeoutSupervisor {
    timeout_ms: u64,
    /// Total flags cleared by timeout since startup.
    expired_total: u32,
}

impl FlagTimeoutSupervisor {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms: u64::from(timeout_ms),
            expired_total: 0,
        }
    }

    /// Clear every stale flag.  Returns the sensors whose flags expired.
    pub fn sweep(&mut self, bank: &mut FlagBank, now_ms: u64) -> Vec<SensorId, 2> {
        let mut expired = Vec::new();

        for sensor in SensorId::ALL {
            let flag = bank.get(sensor);
            if !flag.armed {
                continue;
            }
            if now_ms.saturating_sub(flag.armed_at_ms) > self.timeout_ms {
                bank.expire(sensor);
                // Capacity 2 matches SensorId::ALL.
                let _ = expired.push(sensor);
                self.expired_total = self.expired_total.saturating_add(1);
                debug!(
                    "supervisor: {} flag expired (armed at {}ms, now {}ms)",
                    sensor.label(),
                    flag.armed_at_ms,
                    now_ms
                );
            }
        }

        expired
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn expired_total(&self) -> u32 {
        self.expired_total
    }
}
