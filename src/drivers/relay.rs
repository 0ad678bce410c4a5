//! Room light relay.
//!
//! Single-channel relay module on one GPIO.  Some modules switch on when
//! their input is pulled low; `active_low` inverts the drive level so
//! callers always think in terms of "light on".

use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

pub struct Relay<P> {
    pin: P,
    active_low: bool,
    on: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Takes the pin and drives it to the "off" level immediately.
    pub fn new(pin: P, active_low: bool) -> Result<Self, ActuatorError> {
        let mut relay = Self {
            pin,
            active_low,
            on: false,
        };
        relay.drive(false)?;
        Ok(relay)
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.drive(on)?;
        self.on = on;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    fn drive(&mut self, on: bool) -> Result<(), ActuatorError> {
        let high = on != self.active_low;
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| ActuatorError::GpioWriteFailed)
    }
}
