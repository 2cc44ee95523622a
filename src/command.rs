//! HD44780 instructions, and the [`Command`] a sender puts on the wire

use crate::utils::{BitOps, BitState};

/// The subset of the HD44780 instruction set this driver issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandSet {
    /// 0x01
    ClearDisplay,
    /// 0x02
    ReturnHome,
    /// 0x04 | I/D | S
    EntryModeSet(MoveDirection, ShiftType),
    /// 0x08 | D | C | B
    DisplayOnOff {
        /// D
        display: State,
        /// C
        cursor: State,
        /// B
        cursor_blink: State,
    },
    /// 0x10 | S/C | R/L
    CursorOrDisplayShift(ShiftType, MoveDirection),
    /// 0x20 | DL | N | F
    FunctionSet(DataWidth, LineMode, Font),
    /// 0x80 + address, wraps on overflow
    SetDDRAM(u8),
    /// RS low, RW high
    ReadBusyFlagAndAddress,
    /// RS high, RW low
    WriteDataToRAM(u8),
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveDirection {
    RightToLeft,
    #[default]
    LeftToRight,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftType {
    #[default]
    CursorOnly,
    CursorAndDisplay,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Off,
    #[default]
    On,
}

impl From<State> for BitState {
    fn from(state: State) -> Self {
        match state {
            State::Off => BitState::Clear,
            State::On => BitState::Set,
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataWidth {
    #[default]
    Bit4,
    Bit8,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineMode {
    OneLine,
    #[default]
    TwoLine,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    #[default]
    Font5x8,
    Font5x11,
}

/// Which register of the controller a [`Command`] addresses
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterSelection {
    Command,
    Data,
}

/// Direction of a [`Command`]
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadWriteOp {
    Write,
    Read,
}

/// A single bus transfer: RS, RW and, for writes, the byte to latch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    rs: RegisterSelection,
    rw: ReadWriteOp,
    // filled by the sender when it's a read
    data: Option<u8>,
}

impl Command {
    /// A write of `byte` to the instruction register
    pub const fn instruction(byte: u8) -> Self {
        Self {
            rs: RegisterSelection::Command,
            rw: ReadWriteOp::Write,
            data: Some(byte),
        }
    }

    /// A write of `byte` to the data register
    pub const fn data(byte: u8) -> Self {
        Self {
            rs: RegisterSelection::Data,
            rw: ReadWriteOp::Write,
            data: Some(byte),
        }
    }

    /// A read of the status register
    pub const fn status_read() -> Self {
        Self {
            rs: RegisterSelection::Command,
            rw: ReadWriteOp::Read,
            data: None,
        }
    }

    #[allow(missing_docs)]
    pub fn get_register_selection(&self) -> RegisterSelection {
        self.rs
    }

    #[allow(missing_docs)]
    pub fn get_read_write_op(&self) -> ReadWriteOp {
        self.rw
    }

    /// The byte to write, `None` for a read
    pub fn get_data(&self) -> Option<u8> {
        self.data
    }
}

impl From<CommandSet> for Command {
    fn from(command: CommandSet) -> Self {
        match command {
            CommandSet::ClearDisplay => Self::instruction(0b0000_0001),

            CommandSet::ReturnHome => Self::instruction(0b0000_0010),

            CommandSet::EntryModeSet(dir, st) => {
                let mut raw_bits: u8 = 0b0000_0100;
                raw_bits.put_bit(1, (dir == MoveDirection::LeftToRight).into());
                raw_bits.put_bit(0, (st == ShiftType::CursorAndDisplay).into());
                Self::instruction(raw_bits)
            }

            CommandSet::DisplayOnOff {
                display,
                cursor,
                cursor_blink,
            } => {
                let mut raw_bits: u8 = 0b0000_1000;
                raw_bits.put_bit(2, display.into());
                raw_bits.put_bit(1, cursor.into());
                raw_bits.put_bit(0, cursor_blink.into());
                Self::instruction(raw_bits)
            }

            CommandSet::CursorOrDisplayShift(st, dir) => {
                let mut raw_bits: u8 = 0b0001_0000;
                raw_bits.put_bit(3, (st == ShiftType::CursorAndDisplay).into());
                raw_bits.put_bit(2, (dir == MoveDirection::LeftToRight).into());
                Self::instruction(raw_bits)
            }

            CommandSet::FunctionSet(width, line, font) => {
                let mut raw_bits: u8 = 0b0010_0000;
                raw_bits.put_bit(4, (width == DataWidth::Bit8).into());
                raw_bits.put_bit(3, (line == LineMode::TwoLine).into());
                raw_bits.put_bit(2, (font == Font::Font5x11).into());
                Self::instruction(raw_bits)
            }

            // no range check, addresses past the display wrap the same way the hardware does
            CommandSet::SetDDRAM(addr) => Self::instruction(0b1000_0000u8.wrapping_add(addr)),

            CommandSet::ReadBusyFlagAndAddress => Self::status_read(),

            CommandSet::WriteDataToRAM(data) => Self::data(data),
        }
    }
}
