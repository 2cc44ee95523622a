/*!
# HD44780 Character LCD Driver

Drives 16x2, 16x4 and 20x4 character displays built around the HD44780 controller.

Basic Usage:

1. Initialize a "sender" <br/>
    This crate include 3 wirings:
    * 4-pin/8-pin parallel driver [`sender::ParallelSender`], with or without the R/W line
    * I2C driver with a PCF8574 backpack [`sender::I2cSender`]

    You can choose either of it, or you can use any driver implemented [`sender::SendCommand`].
<br/>
<br/>
2. Use [`lcd::Lcd::new()`] with a [`config::Config`] to create a [`lcd::Lcd`], and initialize the
    hardware. Pick a [`mutex`] flavour for the handle's lock. [`mutex::NoopRawMutex`] fits a
    handle owned by one thread or task, and is the usual choice: share the display by handing that
    owner the work. [`mutex::CriticalSectionRawMutex`] makes the handle `Sync`, but the lock is held
    for a whole operation, waits included. On a single core MCU that means interrupts stay masked
    for `ready_delay_us` per byte, and without end if the busy flag never clears.
<br/>
<br/>
3. use any methods provide by [`lcd::Lcd`] to control the display, every method returns
    [`error::Error`] on the first failed pin or bus operation
*/

#![no_std]
#![warn(missing_docs)]

pub mod command;
pub mod config;
pub mod error;
pub mod lcd;
pub mod sender;
pub mod utils;
pub mod wait;

/// Raw mutex flavours for the lock of a [`lcd::Lcd`]
pub mod mutex {
    pub use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex, RawMutex};
}

pub use config::{CommMode, Config, DisplaySize};
pub use error::Error;
pub use lcd::Lcd;
