//! LCD presenter: renders application events on a 16×2 display.
//!
//! ```text
//!  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐
//!  │Person entered! │   │S1: 12cm    (1) │   │People: 2       │
//!  │    count: 2    │   │S2: ---     (0) │   │Light is On     │
//!  └────────────────┘   └────────────────┘   └────────────────┘
//!     message (held)       Developer mode        Status mode
//! ```
//!
//! Occupancy messages stay up for `message_hold_ms` before the status
//! frame returns; the hold is measured on event timestamps, so the
//! polling loop never blocks on the display.  Rows are cached and only
//! rewritten when their text changes.

use core::fmt::Write;

use heapless::String;
use log::warn;

use crate::app::events::{AppEvent, SensorReading};
use crate::app::ports::{DisplayPort, EventSink};
use crate::config::DisplayMode;
use crate::counting::NO_ECHO_CM;
use crate::counting::occupancy::OccupancyEvent;
use crate::error::DisplayError;

const COLUMNS: usize = 16;
/// Column of the flag marker in the developer frame.
const FLAG_COL: usize = 12;

/// One full display row.
pub type Row = String<COLUMNS>;

/// Text shown for each occupancy outcome.
pub fn occupancy_message(event: &OccupancyEvent) -> &'static str {
    match event {
        OccupancyEvent::Entered(_) => "Person entered!",
        OccupancyEvent::EnteredButFull => "Room Full!",
        OccupancyEvent::Exited(_) => "Person exited!",
        OccupancyEvent::ExitedButAlreadyEmpty => "Ghost exited!?",
    }
}

/// Left-aligned, space-padded to the full row; overflow is dropped.
pub fn fit(text: &str) -> Row {
    let mut row = Row::new();
    for c in text.chars() {
        if row.push(c).is_err() {
            break;
        }
    }
    while row.push(' ').is_ok() {}
    row
}

/// Centred on the row, the extra space (if odd) going right.
pub fn center(text: &str) -> Row {
    let len = text.chars().count().min(COLUMNS);
    let mut row = Row::new();
    for _ in 0..(COLUMNS - len) / 2 {
        let _ = row.push(' ');
    }
    for c in text.chars().take(len) {
        let _ = row.push(c);
    }
    while row.push(' ').is_ok() {}
    row
}

fn count_row(count: u16) -> Row {
    let mut s = Row::new();
    // "    count: 999" is at most 14 chars.
    let _ = write!(s, "    count: {}", count);
    fit(&s)
}

fn sensor_row(reading: &SensorReading) -> Row {
    let mut s = Row::new();
    if reading.distance_cm == NO_ECHO_CM {
        let _ = write!(s, "{}: ---", reading.sensor.label());
    } else {
        let _ = write!(s, "{}: {}cm", reading.sensor.label(), reading.distance_cm);
    }
    while s.len() < FLAG_COL && s.push(' ').is_ok() {}
    let _ = s.push_str(if reading.flag.armed { "(1)" } else { "(0)" });
    fit(&s)
}

pub struct LcdPresenter<D> {
    display: D,
    mode: DisplayMode,
    hold_ms: u64,
    /// A message is on screen until this timestamp.
    hold_until: Option<u64>,
    count: u16,
    capacity: u16,
    light_on: bool,
    shown: [Option<Row>; 2],
}

impl<D: DisplayPort> LcdPresenter<D> {
    pub fn new(display: D, mode: DisplayMode, message_hold_ms: u32) -> Self {
        Self {
            display,
            mode,
            hold_ms: u64::from(message_hold_ms),
            hold_until: None,
            count: 0,
            capacity: 0,
            light_on: false,
            shown: [None, None],
        }
    }

    /// Re-initialise the panel (reset button).  The current frame is
    /// redrawn on the next cycle.
    pub fn reinit(&mut self) {
        self.shown = [None, None];
        if let Err(e) = self.display.reinit() {
            warn!("LCD reinit failed: {}", e);
        }
    }

    /// Rows currently on the panel, as last written.
    pub fn shown(&self) -> [Option<&str>; 2] {
        [self.shown[0].as_deref(), self.shown[1].as_deref()]
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    fn show(&mut self, top: Row, bottom: Row) {
        for (row, text) in [(0u8, top), (1u8, bottom)] {
            if let Err(e) = self.write_row(row, text) {
                warn!("LCD write failed: {}", e);
                self.shown = [None, None];
                return;
            }
        }
    }

    fn write_row(&mut self, row: u8, text: Row) -> Result<(), DisplayError> {
        let slot = &mut self.shown[usize::from(row)];
        if slot.as_ref() == Some(&text) {
            return Ok(());
        }
        self.display.write_at(0, row, &text)?;
        *slot = Some(text);
        Ok(())
    }

    fn show_message(&mut self, message: &str, at_ms: u64) {
        self.show(center(message), count_row(self.count));
        self.hold_until = Some(at_ms.saturating_add(self.hold_ms));
    }

    fn show_frame(&mut self, readings: &[SensorReading; 2]) {
        match self.mode {
            DisplayMode::Developer if self.capacity > 0 && self.count >= self.capacity => {
                self.show(center("Room Full"), count_row(self.count));
            }
            DisplayMode::Developer => {
                self.show(sensor_row(&readings[0]), sensor_row(&readings[1]));
            }
            DisplayMode::Status => {
                let mut top = Row::new();
                let _ = write!(top, "People: {}", self.count);
                let bottom = if self.light_on {
                    "Light is On"
                } else {
                    "Light is Off"
                };
                self.show(fit(&top), fit(bottom));
            }
        }
    }
}

impl<D: DisplayPort> EventSink for LcdPresenter<D> {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { count, capacity } => {
                self.count = *count;
                self.capacity = *capacity;
                // Boot time is t=0 on the monotonic clock.
                self.show_message("Welcome", 0);
            }
            AppEvent::Occupancy {
                event,
                count,
                capacity,
                at_ms,
            } => {
                self.count = *count;
                self.capacity = *capacity;
                self.show_message(occupancy_message(event), *at_ms);
            }
            AppEvent::RelayChanged(on) => self.light_on = *on,
            AppEvent::SensorDebug { at_ms, readings } => {
                if let Some(until) = self.hold_until {
                    if *at_ms < until {
                        return;
                    }
                    self.hold_until = None;
                }
                self.show_frame(readings);
            }
            AppEvent::FlagsExpired { .. }
            | AppEvent::PersistenceFailed(_)
            | AppEvent::Telemetry(_) => {}
        }
    }
}
