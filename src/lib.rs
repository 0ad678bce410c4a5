//! People-counter firmware library.
//!
//! Two ultrasonic sensors across a doorway, a bounded occupancy counter,
//! a light relay and a 16×2 LCD.  Everything except the ESP-IDF bootstrap
//! in `main.rs` lives here so it can be tested on the host.  ESP-IDF
//! backends are guarded by the `espidf` feature inside each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod counting;
pub mod error;
pub mod pins;

pub mod adapters;
pub mod drivers;
