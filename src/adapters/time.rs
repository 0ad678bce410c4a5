//! Monotonic time adapter.
//!
//! - **`espidf`**: wraps `esp_timer_get_time()` from the ESP-IDF
//!   high-resolution timer (microsecond precision, monotonic).
//! - **host**: uses `std::time::Instant` for simulation.
//!
//! One clock serves both the service ([`ClockPort`], milliseconds) and the
//! HC-SR04 echo timing ([`MicroTimer`], microseconds).  It is `Copy`, so
//! each range finder gets its own handle.

use crate::app::ports::ClockPort;
use crate::drivers::hcsr04::MicroTimer;

#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot.
    #[cfg(feature = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since construction.
    #[cfg(not(feature = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl ClockPort for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.uptime_us() / 1000
    }
}

impl MicroTimer for MonotonicClock {
    fn now_us(&self) -> u64 {
        self.uptime_us()
    }
}
