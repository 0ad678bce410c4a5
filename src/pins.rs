//! GPIO / peripheral pin assignments for the people-counter board.
//!
//! Single source of truth: the binary references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Ultrasonic sensors (HC-SR04, 5 V echo through a divider)
// ---------------------------------------------------------------------------

/// Room-side sensor ("S1") trigger output.
pub const INBOUND_TRIG_GPIO: i32 = 4;
/// Room-side sensor ("S1") echo input.
pub const INBOUND_ECHO_GPIO: i32 = 5;
/// Corridor-side sensor ("S2") trigger output.
pub const OUTBOUND_TRIG_GPIO: i32 = 6;
/// Corridor-side sensor ("S2") echo input.
pub const OUTBOUND_ECHO_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Room light relay
// ---------------------------------------------------------------------------

/// Relay module input.  Polarity is `SystemConfig::relay_active_low`.
pub const RELAY_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// I²C bus (LCD backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;
pub const I2C_FREQ_HZ: u32 = 100_000;

/// PCF8574 backpack address (A0–A2 open).
pub const LCD_I2C_ADDR: u8 = 0x27;

// ---------------------------------------------------------------------------
// User button (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button: re-initialises the LCD.
pub const RESET_BUTTON_GPIO: i32 = 16;
