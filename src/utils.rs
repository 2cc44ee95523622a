//! Common tools

/// The state of a bit,
/// It's either [`BitState::Clear`] to represent a 0
/// or [`BitState::Set`] to represent a 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitState {
    /// Bit is 0
    Clear,
    /// Bit is 1
    Set,
}

impl From<bool> for BitState {
    fn from(value: bool) -> Self {
        match value {
            true => BitState::Set,
            false => BitState::Clear,
        }
    }
}

/// Simple bit ops on a register byte
pub trait BitOps {
    /// Set bit at `pos` and return the new value
    fn set_bit(&mut self, pos: u8) -> Self;
    /// Clear bit at `pos` and return the new value
    fn clear_bit(&mut self, pos: u8) -> Self;
    /// Set or clear bit at `pos` depending on `state`
    fn put_bit(&mut self, pos: u8, state: BitState) -> Self;
    /// Read bit at `pos`
    fn check_bit(&self, pos: u8) -> BitState;
}

impl BitOps for u8 {
    fn set_bit(&mut self, pos: u8) -> Self {
        debug_assert!(pos <= 7, "bit offset larger than 7");
        *self |= 1u8 << (pos & 7);
        *self
    }

    fn clear_bit(&mut self, pos: u8) -> Self {
        debug_assert!(pos <= 7, "bit offset larger than 7");
        *self &= !(1u8 << (pos & 7));
        *self
    }

    fn put_bit(&mut self, pos: u8, state: BitState) -> Self {
        match state {
            BitState::Set => self.set_bit(pos),
            BitState::Clear => self.clear_bit(pos),
        }
    }

    fn check_bit(&self, pos: u8) -> BitState {
        debug_assert!(pos <= 7, "bit offset larger than 7");
        BitState::from((*self >> (pos & 7)) & 1 == 1)
    }
}

/// Split a byte into `(high, low)` nibbles, each in the lower 4 bits
pub(crate) fn nibbles(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0x0F)
}

/// Number of decimal digits in `value`, `0` counts as one digit
pub(crate) fn digit_count(mut value: u32) -> u32 {
    let mut count = 1;
    while value >= 10 {
        value /= 10;
        count += 1;
    }
    count
}
