//! HC-SR04 ultrasonic range finder.
//!
//! ## Measurement
//!
//! 1. Drive TRIG low for 2 µs, high for 10 µs, low again.
//! 2. Busy-wait for ECHO to rise, then for it to fall.  Both waits are
//!    bounded by `echo_timeout_us`.
//! 3. Sound travels ~29 µs per cm, and the echo covers the distance
//!    twice: `cm = width_us / 29 / 2`.
//!
//! An optional settle delay after each ranging keeps one sensor's late
//! echoes out of the next sensor's measurement when two units face the
//! same doorway.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::SensorError;

/// Microseconds per centimetre of sound travel.
const US_PER_CM: u64 = 29;

/// Free-running microsecond counter used to time the echo pulse.
pub trait MicroTimer {
    fn now_us(&self) -> u64;
}

/// Anything that can produce a single distance measurement.
pub trait RangeFinder {
    fn measure_cm(&mut self) -> Result<u32, SensorError>;
}

/// Echo pulse width to distance.
pub fn echo_to_cm(width_us: u64) -> u32 {
    (width_us / US_PER_CM / 2).min(u64::from(u32::MAX - 1)) as u32
}

pub struct HcSr04<TRIG, ECHO, D, T> {
    trigger: TRIG,
    echo: ECHO,
    delay: D,
    timer: T,
    echo_timeout_us: u64,
    settle_ms: u32,
}

impl<TRIG, ECHO, D, T> HcSr04<TRIG, ECHO, D, T>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    D: DelayNs,
    T: MicroTimer,
{
    pub fn new(trigger: TRIG, echo: ECHO, delay: D, timer: T, echo_timeout_us: u32) -> Self {
        Self {
            trigger,
            echo,
            delay,
            timer,
            echo_timeout_us: u64::from(echo_timeout_us),
            settle_ms: 0,
        }
    }

    /// Pause for `settle_ms` after every ranging, successful or not.
    pub fn with_settle_ms(mut self, settle_ms: u32) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    fn ping(&mut self) -> Result<u32, SensorError> {
        self.trigger
            .set_low()
            .map_err(|_| SensorError::GpioWriteFailed)?;
        self.delay.delay_us(2);
        self.trigger
            .set_high()
            .map_err(|_| SensorError::GpioWriteFailed)?;
        self.delay.delay_us(10);
        self.trigger
            .set_low()
            .map_err(|_| SensorError::GpioWriteFailed)?;

        let width_us = self.echo_width_us()?;
        Ok(echo_to_cm(width_us))
    }

    fn echo_width_us(&mut self) -> Result<u64, SensorError> {
        let wait_start = self.timer.now_us();
        while !self.echo_high()? {
            if self.timer.now_us().saturating_sub(wait_start) > self.echo_timeout_us {
                return Err(SensorError::EchoTimeout);
            }
        }

        let rise = self.timer.now_us();
        while self.echo_high()? {
            if self.timer.now_us().saturating_sub(rise) > self.echo_timeout_us {
                return Err(SensorError::EchoTimeout);
            }
        }

        Ok(self.timer.now_us().saturating_sub(rise))
    }

    fn echo_high(&mut self) -> Result<bool, SensorError> {
        self.echo.is_high().map_err(|_| SensorError::GpioReadFailed)
    }
}

impl<TRIG, ECHO, D, T> RangeFinder for HcSr04<TRIG, ECHO, D, T>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    D: DelayNs,
    T: MicroTimer,
{
    fn measure_cm(&mut self) -> Result<u32, SensorError> {
        let result = self.ping();
        if self.settle_ms > 0 {
            self.delay.delay_ms(self.settle_ms);
        }
        result
    }
}
