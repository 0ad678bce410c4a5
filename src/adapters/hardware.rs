//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns both range finders and the light relay, exposing them through
//! [`DistanceSource`] and [`RelayPort`].  The drivers are generic over
//! `embedded-hal`, so the same adapter runs against ESP-IDF pin drivers
//! and host-side mocks.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{DistanceSource, RelayPort};
use crate::counting::SensorId;
use crate::drivers::hcsr04::RangeFinder;
use crate::drivers::relay::Relay;
use crate::error::{ActuatorError, SensorError};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<A, B, R> {
    inbound: A,
    outbound: B,
    relay: Relay<R>,
}

impl<A, B, R> HardwareAdapter<A, B, R>
where
    A: RangeFinder,
    B: RangeFinder,
    R: OutputPin,
{
    /// `inbound` is the room-side sensor, `outbound` faces the corridor.
    pub fn new(inbound: A, outbound: B, relay: Relay<R>) -> Self {
        Self {
            inbound,
            outbound,
            relay,
        }
    }

    pub fn relay(&self) -> &Relay<R> {
        &self.relay
    }
}

// ── DistanceSource implementation ─────────────────────────────

impl<A, B, R> DistanceSource for HardwareAdapter<A, B, R>
where
    A: RangeFinder,
    B: RangeFinder,
    R: OutputPin,
{
    fn read(&mut self, sensor: SensorId) -> Result<u32, SensorError> {
        match sensor {
            SensorId::Inbound => self.inbound.measure_cm(),
            SensorId::Outbound => self.outbound.measure_cm(),
        }
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl<A, B, R> RelayPort for HardwareAdapter<A, B, R>
where
    A: RangeFinder,
    B: RangeFinder,
    R: OutputPin,
{
    fn set_relay(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.relay.set(on)
    }
}
