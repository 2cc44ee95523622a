use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::{
    command::{Command, ReadWriteOp, RegisterSelection},
    config::CommMode,
    error::{Line, TransportError},
    sender::{SendCommand, ENABLE_PULSE_US},
    utils::{nibbles, BitOps, BitState},
};

/// Sender that drives the controller's pins directly, with 4 or 8 data lines
///
/// Data pins have to be readable back, for example open drain outputs with pull ups,
/// when the busy flag is going to be polled.
/// When `rw` is `None`, the R/W pin is assumed tied to ground: it is never touched, and the
/// status register can't be read.
pub struct ParallelSender<ControlPin, DBPin, const PIN_CNT: usize>
where
    ControlPin: OutputPin,
    DBPin: OutputPin + InputPin,
{
    rs_pin: ControlPin,
    rw_pin: Option<ControlPin>,
    en_pin: ControlPin,
    // lowest data line first
    db_pins: [DBPin; PIN_CNT],
}

impl<ControlPin, DBPin> ParallelSender<ControlPin, DBPin, 4>
where
    ControlPin: OutputPin,
    DBPin: OutputPin + InputPin,
{
    /// Sender for the 4 line interface, wired to DB4..DB7
    pub fn new_4pin(
        rs: ControlPin,
        rw: Option<ControlPin>,
        en: ControlPin,
        db4: DBPin,
        db5: DBPin,
        db6: DBPin,
        db7: DBPin,
    ) -> Self {
        Self {
            rs_pin: rs,
            rw_pin: rw,
            en_pin: en,
            db_pins: [db4, db5, db6, db7],
        }
    }
}

impl<ControlPin, DBPin> ParallelSender<ControlPin, DBPin, 8>
where
    ControlPin: OutputPin,
    DBPin: OutputPin + InputPin,
{
    /// Sender for the 8 line interface
    #[allow(clippy::too_many_arguments)]
    pub fn new_8pin(
        rs: ControlPin,
        rw: Option<ControlPin>,
        en: ControlPin,
        db0: DBPin,
        db1: DBPin,
        db2: DBPin,
        db3: DBPin,
        db4: DBPin,
        db5: DBPin,
        db6: DBPin,
        db7: DBPin,
    ) -> Self {
        Self {
            rs_pin: rs,
            rw_pin: rw,
            en_pin: en,
            db_pins: [db0, db1, db2, db3, db4, db5, db6, db7],
        }
    }
}

impl<ControlPin, DBPin, const PIN_CNT: usize> ParallelSender<ControlPin, DBPin, PIN_CNT>
where
    ControlPin: OutputPin,
    DBPin: OutputPin + InputPin,
{
    /// Give back `(rs, rw, en, data pins)`
    pub fn release(self) -> (ControlPin, Option<ControlPin>, ControlPin, [DBPin; PIN_CNT]) {
        (self.rs_pin, self.rw_pin, self.en_pin, self.db_pins)
    }

    // DB index of db_pins[0]
    const FIRST_LINE: u8 = (8 - PIN_CNT) as u8;

    fn set_register_selection(&mut self, rs: RegisterSelection) -> Result<(), TransportError> {
        match rs {
            RegisterSelection::Command => self.rs_pin.set_low(),
            RegisterSelection::Data => self.rs_pin.set_high(),
        }
        .map_err(|e| TransportError::pin(Line::Rs, e))
    }

    fn push_bits(&mut self, raw_bits: u8) -> Result<(), TransportError> {
        for (index, pin) in self.db_pins.iter_mut().enumerate() {
            let line = Line::Db(Self::FIRST_LINE + index as u8);
            match raw_bits.check_bit(index as u8) {
                BitState::Set => pin.set_high(),
                BitState::Clear => pin.set_low(),
            }
            .map_err(|e| TransportError::pin(line, e))?;
        }
        Ok(())
    }

    fn fetch_bits(&mut self) -> Result<u8, TransportError> {
        let mut acc = 0u8;
        for (index, pin) in self.db_pins.iter_mut().enumerate() {
            let line = Line::Db(Self::FIRST_LINE + index as u8);
            let high = pin.is_high().map_err(|e| TransportError::pin(line, e))?;
            acc.put_bit(index as u8, high.into());
        }
        Ok(acc)
    }

    fn release_data_lines(&mut self) -> Result<(), TransportError> {
        // in open drain mode, set pin high to release control
        for (index, pin) in self.db_pins.iter_mut().enumerate() {
            let line = Line::Db(Self::FIRST_LINE + index as u8);
            pin.set_high().map_err(|e| TransportError::pin(line, e))?;
        }
        Ok(())
    }

    fn pulse_enable<Delayer: DelayNs>(
        &mut self,
        delayer: &mut Delayer,
    ) -> Result<(), TransportError> {
        self.en_pin
            .set_high()
            .map_err(|e| TransportError::pin(Line::En, e))?;
        delayer.delay_us(ENABLE_PULSE_US);
        self.en_pin
            .set_low()
            .map_err(|e| TransportError::pin(Line::En, e))?;
        delayer.delay_us(ENABLE_PULSE_US);
        Ok(())
    }

    // controller drives the bus while EN is high, sample before dropping it
    fn strobe_read<Delayer: DelayNs>(
        &mut self,
        delayer: &mut Delayer,
    ) -> Result<u8, TransportError> {
        self.en_pin
            .set_high()
            .map_err(|e| TransportError::pin(Line::En, e))?;
        delayer.delay_us(ENABLE_PULSE_US);
        let bits = self.fetch_bits()?;
        self.en_pin
            .set_low()
            .map_err(|e| TransportError::pin(Line::En, e))?;
        delayer.delay_us(ENABLE_PULSE_US);
        Ok(bits)
    }

    fn write_byte<Delayer: DelayNs>(
        &mut self,
        byte: u8,
        delayer: &mut Delayer,
    ) -> Result<(), TransportError> {
        self.restore_rw()?;

        if PIN_CNT == 4 {
            let (high, low) = nibbles(byte);
            self.push_bits(high)?;
            self.pulse_enable(delayer)?;
            self.push_bits(low)?;
            self.pulse_enable(delayer)?;
        } else {
            self.push_bits(byte)?;
            self.pulse_enable(delayer)?;
        }

        Ok(())
    }

    fn read_byte<Delayer: DelayNs>(
        &mut self,
        delayer: &mut Delayer,
    ) -> Result<u8, TransportError> {
        let mut cycle = ReadCycle::begin(self)?;

        let byte = if PIN_CNT == 4 {
            let high = cycle.sender.strobe_read(delayer)?;
            let low = cycle.sender.strobe_read(delayer)?;
            (high << 4) | (low & 0x0F)
        } else {
            cycle.sender.strobe_read(delayer)?
        };

        cycle.finish()?;
        Ok(byte)
    }

    fn restore_rw(&mut self) -> Result<(), TransportError> {
        if let Some(rw_pin) = self.rw_pin.as_mut() {
            rw_pin.set_low().map_err(|e| TransportError::pin(Line::Rw, e))?;
        }
        Ok(())
    }
}

/// R/W held high with the data lines released, until [`ReadCycle::finish`]
///
/// A cycle dropped without `finish`, after a failed read, still turns R/W back low.
struct ReadCycle<'a, ControlPin, DBPin, const PIN_CNT: usize>
where
    ControlPin: OutputPin,
    DBPin: OutputPin + InputPin,
{
    sender: &'a mut ParallelSender<ControlPin, DBPin, PIN_CNT>,
    finished: bool,
}

impl<'a, ControlPin, DBPin, const PIN_CNT: usize> ReadCycle<'a, ControlPin, DBPin, PIN_CNT>
where
    ControlPin: OutputPin,
    DBPin: OutputPin + InputPin,
{
    fn begin(
        sender: &'a mut ParallelSender<ControlPin, DBPin, PIN_CNT>,
    ) -> Result<Self, TransportError> {
        sender.release_data_lines()?;
        let rw_pin = sender.rw_pin.as_mut().ok_or(TransportError::Unsupported)?;
        rw_pin.set_high().map_err(|e| TransportError::pin(Line::Rw, e))?;
        Ok(Self {
            sender,
            finished: false,
        })
    }

    fn finish(mut self) -> Result<(), TransportError> {
        self.finished = true;
        self.sender.restore_rw()
    }
}

impl<ControlPin, DBPin, const PIN_CNT: usize> Drop for ReadCycle<'_, ControlPin, DBPin, PIN_CNT>
where
    ControlPin: OutputPin,
    DBPin: OutputPin + InputPin,
{
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // the read error is the one reported
        if let Err(e) = self.sender.restore_rw() {
            log::warn!("failed to drive R/W back low after a failed status read: {}", e);
        }
    }
}

impl<ControlPin, DBPin, Delayer, const PIN_CNT: usize> SendCommand<Delayer>
    for ParallelSender<ControlPin, DBPin, PIN_CNT>
where
    ControlPin: OutputPin,
    DBPin: OutputPin + InputPin,
    Delayer: DelayNs,
{
    fn comm_mode(&self) -> CommMode {
        if PIN_CNT == 4 {
            CommMode::Bit4
        } else {
            CommMode::Bit8
        }
    }

    fn supports_read(&self) -> bool {
        self.rw_pin.is_some()
    }

    fn init_lines(&mut self) -> Result<(), TransportError> {
        self.rs_pin
            .set_low()
            .map_err(|e| TransportError::pin(Line::Rs, e))?;
        if let Some(rw_pin) = self.rw_pin.as_mut() {
            rw_pin.set_low().map_err(|e| TransportError::pin(Line::Rw, e))?;
        }
        self.en_pin
            .set_low()
            .map_err(|e| TransportError::pin(Line::En, e))?;
        self.push_bits(0)
    }

    fn send(
        &mut self,
        command: Command,
        delayer: &mut Delayer,
    ) -> Result<Option<u8>, TransportError> {
        // reject before touching any pin
        if command.get_read_write_op() == ReadWriteOp::Read && self.rw_pin.is_none() {
            return Err(TransportError::Unsupported);
        }

        self.set_register_selection(command.get_register_selection())?;

        match (command.get_read_write_op(), command.get_data()) {
            (ReadWriteOp::Write, Some(byte)) => {
                self.write_byte(byte, delayer)?;
                Ok(None)
            }
            (ReadWriteOp::Read, _) => self.read_byte(delayer).map(Some),
            // Command constructors never build a write without a byte
            (ReadWriteOp::Write, None) => Ok(None),
        }
    }
}
