//! The [`Lcd`] handle and its runtime operations

use core::{cell::RefCell, fmt};

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};
use embedded_hal::delay::DelayNs;

use crate::{
    command::{Command, CommandSet, MoveDirection, ShiftType, State},
    config::{Config, DisplaySize},
    error::{Error, TransportError},
    sender::SendCommand,
    wait::WaitStrategy,
};

mod init;
mod number;

pub use number::MAX_FLOAT_PRECISION;

/// A running HD44780 controller
///
/// Every operation takes `&self` and holds the handle's lock for its whole duration, waits
/// included. With a thread safe `M` the handle can be shared between threads, and calls are
/// serialized byte for byte.
///
/// With [`CriticalSectionRawMutex`](crate::mutex::CriticalSectionRawMutex) on a bare metal
/// target, holding the lock means interrupts are masked: a 16 byte [`Lcd::write_string`] with the
/// default fixed delay keeps them off for more than 32 ms, and in busy flag mode a disconnected
/// controller keeps them off forever. Prefer [`NoopRawMutex`](crate::mutex::NoopRawMutex) with the
/// handle owned by a single thread or task there.
pub struct Lcd<M, Sender, Delayer>
where
    M: RawMutex,
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    config: Config,
    wait: WaitStrategy,
    bus: Mutex<M, RefCell<Bus<Sender, Delayer>>>,
}

struct Bus<Sender, Delayer> {
    sender: Sender,
    delayer: Delayer,
}

impl<Sender, Delayer> Bus<Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    fn write(
        &mut self,
        command: impl Into<Command>,
        wait: &WaitStrategy,
    ) -> Result<(), TransportError> {
        let command = command.into();
        log::trace!("send {:?}", command);
        self.sender.send(command, &mut self.delayer)?;
        wait.wait(&mut self.sender, &mut self.delayer)
    }
}

impl<M, Sender, Delayer> Lcd<M, Sender, Delayer>
where
    M: RawMutex,
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    // lock, run `f`, and log the failure under `op`
    fn with_bus<F>(&self, op: &'static str, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Bus<Sender, Delayer>, &WaitStrategy) -> Result<(), Error>,
    {
        let result = self.bus.lock(|bus| f(&mut *bus.borrow_mut(), &self.wait));
        if let Err(e) = &result {
            log::error!("{} failed: {}", op, e);
        }
        result
    }

    /// The config this handle was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Display geometry
    pub fn size(&self) -> DisplaySize {
        self.config.get_size()
    }

    /// The wait strategy picked at init
    pub fn wait_strategy(&self) -> WaitStrategy {
        self.wait
    }

    /// Shut the handle down, giving back the sender and the delayer
    pub fn release(self) -> (Sender, Delayer) {
        let Bus { sender, delayer } = self.bus.into_inner().into_inner();
        (sender, delayer)
    }

    /// Clear the display and return the cursor to (0, 0)
    pub fn clear(&self) -> Result<(), Error> {
        self.with_bus("clear", |bus, wait| Ok(bus.write(CommandSet::ClearDisplay, wait)?))
    }

    /// Return the cursor to (0, 0) and undo display shifts
    pub fn home(&self) -> Result<(), Error> {
        self.with_bus("home", |bus, wait| Ok(bus.write(CommandSet::ReturnHome, wait)?))
    }

    /// Write one byte at the cursor, the byte is a character code of the controller's ROM
    pub fn write_char(&self, byte: u8) -> Result<(), Error> {
        self.with_bus("write_char", |bus, wait| {
            Ok(bus.write(CommandSet::WriteDataToRAM(byte), wait)?)
        })
    }

    /// Write bytes in order, stopping at the first failure
    pub fn write_string(&self, bytes: &[u8]) -> Result<(), Error> {
        self.with_bus("write_string", |bus, wait| {
            for &byte in bytes {
                bus.write(CommandSet::WriteDataToRAM(byte), wait)?;
            }
            Ok(())
        })
    }

    /// Move the cursor to `col` of `row`
    ///
    /// Rows map to DDRAM bases 0x00, 0x40, 0x14 and 0x54, any row past 3 is treated as row 3.
    /// Neither `col` nor `row` is checked against [`Lcd::size`].
    pub fn goto(&self, col: u8, row: u8) -> Result<(), Error> {
        let base: u8 = match row {
            0 => 0x00,
            1 => 0x40,
            2 => 0x14,
            _ => 0x54,
        };
        self.with_bus("goto", |bus, wait| {
            Ok(bus.write(CommandSet::SetDDRAM(base.wrapping_add(col)), wait)?)
        })
    }

    /// Move the cursor right by `steps`
    pub fn shift_cursor_forward(&self, steps: u8) -> Result<(), Error> {
        self.shift(
            "shift_cursor_forward",
            ShiftType::CursorOnly,
            MoveDirection::LeftToRight,
            steps,
        )
    }

    /// Move the cursor left by `steps`
    pub fn shift_cursor_backward(&self, steps: u8) -> Result<(), Error> {
        self.shift(
            "shift_cursor_backward",
            ShiftType::CursorOnly,
            MoveDirection::RightToLeft,
            steps,
        )
    }

    /// Scroll the whole display by `steps`, DDRAM content is untouched
    pub fn shift_display(&self, direction: MoveDirection, steps: u8) -> Result<(), Error> {
        self.shift("shift_display", ShiftType::CursorAndDisplay, direction, steps)
    }

    fn shift(
        &self,
        op: &'static str,
        shift_type: ShiftType,
        direction: MoveDirection,
        steps: u8,
    ) -> Result<(), Error> {
        self.with_bus(op, |bus, wait| {
            for _ in 0..steps {
                bus.write(CommandSet::CursorOrDisplayShift(shift_type, direction), wait)?;
            }
            Ok(())
        })
    }

    /// Turn the display, the underline cursor and the blinking block on or off
    pub fn set_display_control(
        &self,
        display: State,
        cursor: State,
        cursor_blink: State,
    ) -> Result<(), Error> {
        self.with_bus("set_display_control", |bus, wait| {
            Ok(bus.write(
                CommandSet::DisplayOnOff {
                    display,
                    cursor,
                    cursor_blink,
                },
                wait,
            )?)
        })
    }
}

impl<M, Sender, Delayer> fmt::Write for Lcd<M, Sender, Delayer>
where
    M: RawMutex,
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_string(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
