//! Peripheral drivers, written against `embedded-hal` 1.0 traits so they
//! run on ESP-IDF pin drivers and on host-side mocks alike.

pub mod button;
pub mod hcsr04;
pub mod lcd1602;
pub mod relay;
