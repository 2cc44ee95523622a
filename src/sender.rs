//! Built-in sender
//! If you want to create a new sender, you will need to implement [`SendCommand`] trait

use embedded_hal::delay::DelayNs;

use crate::{
    command::{Command, CommandSet},
    config::CommMode,
    error::TransportError,
    utils::{BitOps, BitState},
};

mod i2c_sender;
mod parallel_sender;

pub use i2c_sender::{I2cSender, DEFAULT_ADDRESS};
pub use parallel_sender::ParallelSender;

/// Length of each half of the enable pulse
pub const ENABLE_PULSE_US: u32 = 1;

/// [`SendCommand`] is the trait a sender should implement to communicate with the hardware
pub trait SendCommand<Delayer: DelayNs> {
    /// Wire encoding this sender produces
    fn comm_mode(&self) -> CommMode;

    /// Whether [`Command::status_read`] can be served, i.e. the R/W line is wired
    fn supports_read(&self) -> bool;

    /// Drive every line to its idle level before the power-on sequence
    fn init_lines(&mut self) -> Result<(), TransportError>;

    /// Frame a [`Command`] onto the hardware,
    /// and return the byte read back when [`Command`] is a
    /// [`ReadWriteOp::Read`](crate::command::ReadWriteOp::Read) command
    fn send(&mut self, command: Command, delayer: &mut Delayer)
        -> Result<Option<u8>, TransportError>;

    /// Check LCD busy state
    fn check_busy(&mut self, delayer: &mut Delayer) -> Result<bool, TransportError> {
        let status = self
            .send(CommandSet::ReadBusyFlagAndAddress.into(), delayer)?
            .ok_or(TransportError::Unsupported)?;
        Ok(status.check_bit(7) == BitState::Set)
    }

    /// Wait in a busy loop, until LCD is idle
    fn wait_for_idle(
        &mut self,
        delayer: &mut Delayer,
        poll_interval_us: u32,
    ) -> Result<(), TransportError> {
        while self.check_busy(delayer)? {
            delayer.delay_us(poll_interval_us);
        }
        Ok(())
    }
}
