//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{debug, info, warn};

use crate::app::events::{AppEvent, SensorReading};
use crate::app::ports::EventSink;
use crate::counting::NO_ECHO_CM;
use crate::counting::occupancy::OccupancyEvent;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { count, capacity } => {
                info!("START | count={}/{}", count, capacity);
            }
            AppEvent::Occupancy {
                event,
                count,
                capacity,
                at_ms,
            } => {
                let tag = match event {
                    OccupancyEvent::Entered(_) => "entered",
                    OccupancyEvent::EnteredButFull => "rejected_full",
                    OccupancyEvent::Exited(_) => "exited",
                    OccupancyEvent::ExitedButAlreadyEmpty => "ghost_exit",
                };
                info!("COUNT | {} | count={}/{} | t={}ms", tag, count, capacity, at_ms);
            }
            AppEvent::SensorDebug { at_ms, readings } => {
                let [a, b] = readings;
                debug!("SENSE | t={}ms | {} | {}", at_ms, Fmt(a), Fmt(b));
            }
            AppEvent::FlagsExpired { count, at_ms } => {
                info!("FLAGS | expired={} | t={}ms", count, at_ms);
            }
            AppEvent::RelayChanged(on) => {
                info!("RELAY | light={}", if *on { "on" } else { "off" });
            }
            AppEvent::PersistenceFailed(e) => {
                warn!("STORE | failed: {} | running from memory", e);
            }
            AppEvent::Telemetry(t) => match serde_json::to_string(t) {
                Ok(json) => info!("TELEM | {}", json),
                Err(_) => info!("TELEM | count={}/{} cycles={}", t.count, t.capacity, t.cycles),
            },
        }
    }
}

struct Fmt<'a>(&'a SensorReading);

impl core::fmt::Display for Fmt<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let r = self.0;
        let flag = if r.flag.armed { "armed" } else { "idle" };
        if r.distance_cm == NO_ECHO_CM {
            write!(f, "{}=--- ({})", r.sensor.label(), flag)
        } else {
            write!(f, "{}={}cm ({})", r.sensor.label(), r.distance_cm, flag)
        }
    }
}
