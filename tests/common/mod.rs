//! Instrumented pins, delay and I2C bus sharing one event log

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use embedded_hal::{
    delay::DelayNs,
    digital::{self, ErrorType, InputPin, OutputPin},
    i2c::{self, I2c, Operation},
};
use lcd_hd44780::sender::ParallelSender;

pub type Sender4 = ParallelSender<RecPin, RecPin, 4>;
pub type Sender8 = ParallelSender<RecPin, RecPin, 8>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pin {
    Rs,
    Rw,
    En,
    Db(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Set(Pin, bool),
    Read(Pin),
    DelayUs(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Command(u8),
    Data(u8),
}

#[derive(Default)]
struct Inner {
    events: Vec<Event>,
    // status bytes the fake controller answers with, 0x00 once empty
    status: VecDeque<u8>,
    wide: bool,
    rw_high: bool,
    en_high: bool,
    low_nibble_next: bool,
    pending_low: u8,
    presented: u8,
    fail_from: Option<usize>,
}

impl Inner {
    fn failing(&self) -> bool {
        matches!(self.fail_from, Some(n) if self.events.len() >= n)
    }

    // rising EN with R/W high: put the next status byte (or nibble) on the bus
    fn present(&mut self) {
        if self.wide {
            self.presented = self.status.pop_front().unwrap_or(0);
        } else if self.low_nibble_next {
            self.presented = self.pending_low << 4;
            self.low_nibble_next = false;
        } else {
            let status = self.status.pop_front().unwrap_or(0);
            self.presented = status & 0xF0;
            self.pending_low = status & 0x0F;
            self.low_nibble_next = true;
        }
    }
}

/// Shared log every instrumented part writes into
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Inner>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pin(&self, pin: Pin) -> RecPin {
        RecPin {
            pin,
            rec: self.clone(),
        }
    }

    pub fn delay(&self) -> RecDelay {
        RecDelay { rec: self.clone() }
    }

    pub fn four_bit(&self, with_rw: bool) -> Sender4 {
        ParallelSender::new_4pin(
            self.pin(Pin::Rs),
            with_rw.then(|| self.pin(Pin::Rw)),
            self.pin(Pin::En),
            self.pin(Pin::Db(4)),
            self.pin(Pin::Db(5)),
            self.pin(Pin::Db(6)),
            self.pin(Pin::Db(7)),
        )
    }

    pub fn eight_bit(&self, with_rw: bool) -> Sender8 {
        self.0.lock().unwrap().wide = true;
        ParallelSender::new_8pin(
            self.pin(Pin::Rs),
            with_rw.then(|| self.pin(Pin::Rw)),
            self.pin(Pin::En),
            self.pin(Pin::Db(0)),
            self.pin(Pin::Db(1)),
            self.pin(Pin::Db(2)),
            self.pin(Pin::Db(3)),
            self.pin(Pin::Db(4)),
            self.pin(Pin::Db(5)),
            self.pin(Pin::Db(6)),
            self.pin(Pin::Db(7)),
        )
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().events.clone()
    }

    pub fn events_since(&self, mark: usize) -> Vec<Event> {
        self.0.lock().unwrap().events[mark..].to_vec()
    }

    pub fn mark(&self) -> usize {
        self.0.lock().unwrap().events.len()
    }

    pub fn queue_status(&self, status: &[u8]) {
        self.0.lock().unwrap().status.extend(status.iter().copied());
    }

    /// Every pin operation fails once `count` more events have been logged
    pub fn fail_after(&self, count: usize) {
        let mut inner = self.0.lock().unwrap();
        inner.fail_from = Some(inner.events.len() + count);
    }

    pub fn transfers(&self) -> Vec<Transfer> {
        self.transfers_since(0)
    }

    pub fn transfers_since(&self, mark: usize) -> Vec<Transfer> {
        let inner = self.0.lock().unwrap();
        decode(&inner.events[mark..], inner.wide)
    }
}

/// Rebuild the bytes the controller latched, from falling EN edges with R/W low
pub fn decode(events: &[Event], wide: bool) -> Vec<Transfer> {
    let mut rs = false;
    let mut rw = false;
    let mut en = false;
    let mut lines = 0u8;
    let mut high: Option<u8> = None;
    let mut out = Vec::new();

    for event in events {
        match *event {
            Event::Set(Pin::Rs, level) => rs = level,
            Event::Set(Pin::Rw, level) => rw = level,
            Event::Set(Pin::Db(n), level) => {
                if level {
                    lines |= 1 << n;
                } else {
                    lines &= !(1 << n);
                }
            }
            Event::Set(Pin::En, level) => {
                let falling = en && !level;
                en = level;
                if !falling || rw {
                    continue;
                }
                let byte = if wide {
                    Some(lines)
                } else {
                    match high.take() {
                        None => {
                            high = Some(lines >> 4);
                            None
                        }
                        Some(h) => Some((h << 4) | (lines >> 4)),
                    }
                };
                if let Some(byte) = byte {
                    out.push(if rs {
                        Transfer::Data(byte)
                    } else {
                        Transfer::Command(byte)
                    });
                }
            }
            _ => {}
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

pub struct RecPin {
    pin: Pin,
    rec: Recorder,
}

impl RecPin {
    fn set(&mut self, level: bool) -> Result<(), PinFault> {
        let mut inner = self.rec.0.lock().unwrap();
        if inner.failing() {
            return Err(PinFault);
        }
        inner.events.push(Event::Set(self.pin, level));
        match self.pin {
            Pin::Rw => inner.rw_high = level,
            Pin::En => {
                if level && !inner.en_high && inner.rw_high {
                    inner.present();
                }
                inner.en_high = level;
            }
            _ => {}
        }
        Ok(())
    }
}

impl ErrorType for RecPin {
    type Error = PinFault;
}

impl OutputPin for RecPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }
}

impl InputPin for RecPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut inner = self.rec.0.lock().unwrap();
        if inner.failing() {
            return Err(PinFault);
        }
        inner.events.push(Event::Read(self.pin));
        Ok(match self.pin {
            Pin::Db(n) => (inner.presented >> n) & 1 == 1,
            _ => false,
        })
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct RecDelay {
    rec: Recorder,
}

impl RecDelay {
    fn push(&mut self, us: u32) {
        self.rec.0.lock().unwrap().events.push(Event::DelayUs(us));
    }
}

impl DelayNs for RecDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.push(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.push(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.push(ms.saturating_mul(1_000));
    }
}

/// I2C bus keeping every write burst
#[derive(Clone, Default)]
pub struct RecI2c {
    writes: Arc<Mutex<Vec<(u8, Vec<u8>)>>>,
    fail: Arc<Mutex<bool>>,
}

impl RecI2c {
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn fail(&self) {
        *self.fail.lock().unwrap() = true;
    }
}

impl i2c::ErrorType for RecI2c {
    type Error = i2c::ErrorKind;
}

impl I2c for RecI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if *self.fail.lock().unwrap() {
            return Err(i2c::ErrorKind::NoAcknowledge(
                i2c::NoAcknowledgeSource::Address,
            ));
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    self.writes.lock().unwrap().push((address, bytes.to_vec()))
                }
                Operation::Read(_) => return Err(i2c::ErrorKind::Other),
            }
        }
        Ok(())
    }
}
