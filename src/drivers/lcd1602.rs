//! HD44780 16×2 character LCD behind a PCF8574 I²C backpack.
//!
//! ## Backpack wiring
//!
//! | PCF8574 | LCD   |
//! |---------|-------|
//! | P0      | RS    |
//! | P1      | RW (held low) |
//! | P2      | EN    |
//! | P3      | backlight |
//! | P4–P7   | D4–D7 |
//!
//! The controller runs in 4-bit mode: every byte goes out as two nibbles,
//! each latched by a high→low pulse on EN.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::app::ports::DisplayPort;
use crate::error::DisplayError;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

// HD44780 instructions
const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];
const COLUMNS: u8 = 16;

pub struct Lcd1602<I, D> {
    i2c: I,
    delay: D,
    address: u8,
    backlight: bool,
}

impl<I: I2c, D: DelayNs> Lcd1602<I, D> {
    /// Does not talk to the bus; call [`DisplayPort::reinit`] before use.
    pub fn new(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            backlight: true,
        }
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.backlight = on;
        self.expander_write(0)
    }

    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.send(cmd, 0)
    }

    fn send(&mut self, value: u8, mode: u8) -> Result<(), DisplayError> {
        self.write_nibble(value & 0xF0, mode)?;
        self.write_nibble((value << 4) & 0xF0, mode)
    }

    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), DisplayError> {
        let byte = nibble | mode;
        self.expander_write(byte | EN)?;
        self.delay.delay_us(1);
        self.expander_write(byte & !EN)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn expander_write(&mut self, byte: u8) -> Result<(), DisplayError> {
        let bl = if self.backlight { BACKLIGHT } else { 0 };
        self.i2c
            .write(self.address, &[byte | bl])
            .map_err(|_| DisplayError::BusWriteFailed)
    }
}

impl<I: I2c, D: DelayNs> DisplayPort for Lcd1602<I, D> {
    fn reinit(&mut self) -> Result<(), DisplayError> {
        // Power-on wait, then the datasheet's "initialise by instruction"
        // sequence to get into 4-bit mode from any state.
        self.delay.delay_ms(50);
        self.expander_write(0)?;
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(150);
        self.write_nibble(0x20, 0)?;

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_MODE_INC)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    fn write_at(&mut self, col: u8, row: u8, text: &str) -> Result<(), DisplayError> {
        let offset = *ROW_OFFSETS
            .get(usize::from(row))
            .ok_or(DisplayError::RowOutOfRange(row))?;
        if col >= COLUMNS {
            return Ok(());
        }
        self.command(CMD_SET_DDRAM | (offset + col))?;
        for c in text.chars().take(usize::from(COLUMNS - col)) {
            let byte = if c.is_ascii() { c as u8 } else { b'?' };
            self.send(byte, RS)?;
        }
        Ok(())
    }
}
