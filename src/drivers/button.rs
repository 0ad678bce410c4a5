//! Polled, debounced reset button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with the internal pull-up enabled.  The
//! main loop calls [`ResetButton::poll`] once per cycle; a press is
//! reported once, after the pin has read low for [`DEBOUNCE_MS`], and the
//! button must be released before it can fire again.
//!
//! A press re-initialises the display only.  It never touches the count.

use embedded_hal::digital::InputPin;
use log::warn;

pub const DEBOUNCE_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Released,
    Debouncing { since_ms: u64 },
    Held,
}

pub struct ResetButton<P> {
    pin: P,
    state: PressState,
}

impl<P: InputPin> ResetButton<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: PressState::Released,
        }
    }

    /// Returns `true` exactly once per debounced press.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let pressed = match self.pin.is_low() {
            Ok(low) => low,
            Err(_) => {
                warn!("reset button read failed");
                false
            }
        };

        match self.state {
            PressState::Released => {
                if pressed {
                    self.state = PressState::Debouncing { since_ms: now_ms };
                }
                false
            }

            PressState::Debouncing { since_ms } => {
                if !pressed {
                    self.state = PressState::Released;
                    false
                } else if now_ms.saturating_sub(since_ms) >= DEBOUNCE_MS {
                    self.state = PressState::Held;
                    true
                } else {
                    false
                }
            }

            PressState::Held => {
                if !pressed {
                    self.state = PressState::Released;
                }
                false
            }
        }
    }
}
