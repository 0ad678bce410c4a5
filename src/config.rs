//! System configuration parameters
//!
//! All tunable parameters for the people counter.  Values are persisted in
//! NVS by [`NvsAdapter`](crate::adapters::nvs::NvsAdapter) and validated
//! before every save.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::counting::{DirectionMapping, ResetPolicy, SensorId};

/// Which status frame the display shows between messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Raw distances and flag state per sensor.
    #[default]
    Developer,
    /// People count and light state.
    Status,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Detection ---
    /// Readings strictly below this distance (cm) count as "close"
    pub detect_distance_threshold_cm: u32,
    /// Armed flag lifetime without a completing crossing (ms)
    pub flag_timeout_ms: u32,
    /// Flag handling once a crossing completes
    pub reset_policy: ResetPolicy,
    /// Sensor a person walking into the room blocks first
    pub entry_sensor: SensorId,

    // --- Occupancy ---
    /// Maximum number of people counted in the room
    pub room_capacity: u16,
    /// Persist the count after every change and restore it on boot
    pub persist_count: bool,

    // --- Sensors ---
    /// Upper bound on waiting for each echo edge (µs)
    pub echo_timeout_us: u32,
    /// Pause after each ranging to let stray echoes die out (ms)
    pub sensor_settle_ms: u32,

    // --- Outputs ---
    /// Relay module switches on when its input is driven low
    pub relay_active_low: bool,
    /// Status frame shown on the LCD
    pub display_mode: DisplayMode,
    /// How long an entry/exit message stays on the LCD (ms)
    pub message_hold_ms: u32,

    // --- Timing ---
    /// Main polling loop interval (ms)
    pub poll_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Detection
            detect_distance_threshold_cm: 30,
            flag_timeout_ms: 7000,
            reset_policy: ResetPolicy::OnCompletion,
            entry_sensor: SensorId::Outbound,

            // Occupancy
            room_capacity: 5,
            persist_count: true,

            // Sensors
            echo_timeout_us: 30_000, // ~5 m round trip
            sensor_settle_ms: 10,

            // Outputs
            relay_active_low: false,
            display_mode: DisplayMode::Developer,
            message_hold_ms: 1000,

            // Timing
            poll_interval_ms: 100,
            telemetry_interval_secs: 60,
        }
    }
}

impl SystemConfig {
    /// Deferred-reset variant: flags are held after a crossing until both
    /// sensors clear, with a shorter stale-flag window.
    pub fn deferred_reset() -> Self {
        Self {
            reset_policy: ResetPolicy::UntilClear,
            flag_timeout_ms: 3500,
            ..Self::default()
        }
    }

    /// Sensor-order to direction mapping for the detector.
    pub fn detection_mapping(&self) -> DirectionMapping {
        DirectionMapping::new(self.entry_sensor)
    }

    /// Range-check every field.  Invalid values are rejected, never
    /// silently clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=400).contains(&self.detect_distance_threshold_cm) {
            return Err(ConfigError::ValidationFailed(
                "detect_distance_threshold_cm must be 2–400",
            ));
        }
        if !(500..=60_000).contains(&self.flag_timeout_ms) {
            return Err(ConfigError::ValidationFailed(
                "flag_timeout_ms must be 500–60000",
            ));
        }
        if !(1..=999).contains(&self.room_capacity) {
            return Err(ConfigError::ValidationFailed("room_capacity must be 1–999"));
        }
        if !(1_000..=60_000).contains(&self.echo_timeout_us) {
            return Err(ConfigError::ValidationFailed(
                "echo_timeout_us must be 1000–60000",
            ));
        }
        if self.sensor_settle_ms > 100 {
            return Err(ConfigError::ValidationFailed(
                "sensor_settle_ms must be 0–100",
            ));
        }
        if self.message_hold_ms > 10_000 {
            return Err(ConfigError::ValidationFailed(
                "message_hold_ms must be 0–10000",
            ));
        }
        if !(20..=2_000).contains(&self.poll_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "poll_interval_ms must be 20–2000",
            ));
        }
        if !(5..=3600).contains(&self.telemetry_interval_secs) {
            return Err(ConfigError::ValidationFailed(
                "telemetry_interval_secs must be 5–3600",
            ));
        }
        Ok(())
    }
}
