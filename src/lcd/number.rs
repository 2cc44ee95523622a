use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;

use crate::{
    command::CommandSet,
    error::Error,
    lcd::Lcd,
    sender::SendCommand,
    utils::digit_count,
};

/// Largest `precision` accepted by [`Lcd::write_float`]
pub const MAX_FLOAT_PRECISION: u8 = 9;

// f32::MAX has 39 integer digits
type FloatBuf = heapless::String<64>;

impl<M, Sender, Delayer> Lcd<M, Sender, Delayer>
where
    M: RawMutex,
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    /// Write `value` in decimal, with a leading `-` when negative
    pub fn write_int(&self, value: i32) -> Result<(), Error> {
        let magnitude = value.unsigned_abs();
        let digits = digit_count(magnitude);

        self.with_bus("write_int", |bus, wait| {
            if value < 0 {
                bus.write(CommandSet::WriteDataToRAM(b'-'), wait)?;
            }
            for position in (0..digits).rev() {
                let digit = (magnitude / 10u32.pow(position)) % 10;
                bus.write(CommandSet::WriteDataToRAM(b'0' + digit as u8), wait)?;
            }
            Ok(())
        })
    }

    /// Write `value` with `precision` digits after the decimal point, rounded
    ///
    /// With `precision == 0` no decimal point is written. `-0.0` is written without a sign, while a
    /// negative value that rounds to zero keeps its sign (`-0.04` at precision 1 is `-0.0`).
    pub fn write_float(&self, value: f32, precision: u8) -> Result<(), Error> {
        if precision > MAX_FLOAT_PRECISION {
            return Err(Error::InvalidArgument("float precision larger than 9"));
        }
        if !value.is_finite() {
            return Err(Error::InvalidArgument("float is NaN or infinite"));
        }

        let negative = value < 0.0;
        let magnitude = if negative {
            -value
        } else if value == 0.0 {
            // drop the sign bit of -0.0
            0.0
        } else {
            value
        };

        let mut rendered = FloatBuf::new();
        write!(rendered, "{:.*}", precision as usize, magnitude)
            .map_err(|_| Error::InvalidArgument("float doesn't fit the render buffer"))?;

        self.with_bus("write_float", |bus, wait| {
            if negative {
                bus.write(CommandSet::WriteDataToRAM(b'-'), wait)?;
            }
            for &byte in rendered.as_bytes() {
                bus.write(CommandSet::WriteDataToRAM(byte), wait)?;
            }
            Ok(())
        })
    }
}
