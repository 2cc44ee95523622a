use embedded_hal::{delay::DelayNs, i2c::I2c};

use crate::{
    command::{Command, ReadWriteOp, RegisterSelection},
    config::CommMode,
    error::TransportError,
    sender::SendCommand,
    utils::nibbles,
};

// I2C to parallel:
// P7 -> P0
// DB7/DB6/DB5/DB4/BL/EN/RW/RS
const RS: u8 = 0b0000_0001;
const EN: u8 = 0b0000_0100;
const BL: u8 = 0b0000_1000;

/// 7-bit address of a PCF8574 backpack with A0..A2 left open
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Sender for a PCF8574-style I2C backpack
///
/// The expander's R/W line is held low, so the status register is never read and the
/// backlight bit is kept on in every transfer.
pub struct I2cSender<I2C: I2c> {
    i2c: I2C,
    addr: u8,
}

impl<I2C: I2c> I2cSender<I2C> {
    /// `addr` is the 7-bit device address
    pub fn new(i2c: I2C, addr: u8) -> Self {
        Self { i2c, addr }
    }

    /// Sender at [`DEFAULT_ADDRESS`]
    pub fn with_default_address(i2c: I2C) -> Self {
        Self::new(i2c, DEFAULT_ADDRESS)
    }

    /// 7-bit device address
    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Give back the bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// The 4 expander bytes latching `byte`: high nibble then low nibble, each with EN high then low
pub(crate) fn frame(byte: u8, rs: RegisterSelection) -> [u8; 4] {
    let control = match rs {
        RegisterSelection::Command => BL,
        RegisterSelection::Data => BL | RS,
    };
    let (high, low) = nibbles(byte);
    let high = (high << 4) | control;
    let low = (low << 4) | control;

    [high | EN, high, low | EN, low]
}

impl<I2C, Delayer> SendCommand<Delayer> for I2cSender<I2C>
where
    I2C: I2c,
    Delayer: DelayNs,
{
    fn comm_mode(&self) -> CommMode {
        CommMode::Serial
    }

    fn supports_read(&self) -> bool {
        false
    }

    fn init_lines(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn send(
        &mut self,
        command: Command,
        _delayer: &mut Delayer,
    ) -> Result<Option<u8>, TransportError> {
        match (command.get_read_write_op(), command.get_data()) {
            (ReadWriteOp::Write, Some(byte)) => {
                let seq = frame(byte, command.get_register_selection());
                self.i2c
                    .write(self.addr, &seq)
                    .map_err(TransportError::bus)?;
                Ok(None)
            }
            (ReadWriteOp::Read, _) => Err(TransportError::Unsupported),
            (ReadWriteOp::Write, None) => Ok(None),
        }
    }
}
