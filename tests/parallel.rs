mod common;

use common::{Event, Pin, Recorder};
use lcd_hd44780::{
    command::Command,
    error::{Line, TransportError},
    sender::SendCommand,
};
use proptest::prelude::*;

fn pulse() -> [Event; 4] {
    [
        Event::Set(Pin::En, true),
        Event::DelayUs(1),
        Event::Set(Pin::En, false),
        Event::DelayUs(1),
    ]
}

fn drive(bits: u8, first_line: u8, count: u8) -> Vec<Event> {
    (0..count)
        .map(|i| Event::Set(Pin::Db(first_line + i), (bits >> i) & 1 == 1))
        .collect()
}

proptest! {
    #[test]
    fn four_bit_framing(byte in any::<u8>(), is_data in any::<bool>()) {
        let rec = Recorder::new();
        let mut sender = rec.four_bit(false);
        let mut delay = rec.delay();

        let command = if is_data { Command::data(byte) } else { Command::instruction(byte) };
        prop_assert_eq!(sender.send(command, &mut delay), Ok(None));

        let mut expected = vec![Event::Set(Pin::Rs, is_data)];
        expected.extend(drive(byte >> 4, 4, 4));
        expected.extend(pulse());
        expected.extend(drive(byte & 0x0F, 4, 4));
        expected.extend(pulse());
        prop_assert_eq!(rec.events(), expected);
    }

    #[test]
    fn eight_bit_framing(byte in any::<u8>()) {
        let rec = Recorder::new();
        let mut sender = rec.eight_bit(true);
        let mut delay = rec.delay();

        prop_assert_eq!(sender.send(Command::data(byte), &mut delay), Ok(None));

        let mut expected = vec![Event::Set(Pin::Rs, true), Event::Set(Pin::Rw, false)];
        expected.extend(drive(byte, 0, 8));
        expected.extend(pulse());
        prop_assert_eq!(rec.events(), expected);
    }
}

#[test]
fn four_bit_counts_per_byte() {
    let rec = Recorder::new();
    let mut sender = rec.four_bit(false);
    let mut delay = rec.delay();

    sender.send(Command::data(0xA5), &mut delay).unwrap();

    let events = rec.events();
    let data_sets = events
        .iter()
        .filter(|e| matches!(e, Event::Set(Pin::Db(_), _)))
        .count();
    let enable_highs = events
        .iter()
        .filter(|e| **e == Event::Set(Pin::En, true))
        .count();
    let enable_lows = events
        .iter()
        .filter(|e| **e == Event::Set(Pin::En, false))
        .count();
    assert_eq!(data_sets, 8);
    assert_eq!(enable_highs, 2);
    assert_eq!(enable_lows, 2);
}

#[test]
fn wired_rw_is_driven_low_before_data() {
    let rec = Recorder::new();
    let mut sender = rec.four_bit(true);
    let mut delay = rec.delay();

    sender.send(Command::instruction(0x0C), &mut delay).unwrap();

    let events = rec.events();
    assert_eq!(events[0], Event::Set(Pin::Rs, false));
    assert_eq!(events[1], Event::Set(Pin::Rw, false));
    assert!(!events[2..]
        .iter()
        .any(|e| matches!(e, Event::Set(Pin::Rw, _))));
}

#[test]
fn four_bit_status_read() {
    let rec = Recorder::new();
    let mut sender = rec.four_bit(true);
    let mut delay = rec.delay();
    rec.queue_status(&[0x9A]);

    assert_eq!(
        sender.send(Command::status_read(), &mut delay),
        Ok(Some(0x9A))
    );

    let events = rec.events();
    let reads = events
        .iter()
        .filter(|e| matches!(e, Event::Read(Pin::Db(_))))
        .count();
    assert_eq!(reads, 8);
    assert_eq!(events.last(), Some(&Event::Set(Pin::Rw, false)));
}

#[test]
fn busy_flag_polling_on_sender() {
    let rec = Recorder::new();
    let mut sender = rec.eight_bit(true);
    let mut delay = rec.delay();
    rec.queue_status(&[0x80, 0x83, 0x03]);

    SendCommand::wait_for_idle(&mut sender, &mut delay, 25).unwrap();

    let polls = rec
        .events()
        .iter()
        .filter(|e| **e == Event::DelayUs(25))
        .count();
    assert_eq!(polls, 2);
}

#[test]
fn status_read_without_rw_is_unsupported() {
    let rec = Recorder::new();
    let mut sender = rec.four_bit(false);
    let mut delay = rec.delay();

    assert_eq!(
        sender.send(Command::status_read(), &mut delay),
        Err(TransportError::Unsupported)
    );
    assert!(rec.events().is_empty());
}

#[test]
fn pin_failure_aborts_the_write() {
    let rec = Recorder::new();
    let mut sender = rec.four_bit(false);
    let mut delay = rec.delay();
    // RS and the four high nibble lines go through, EN doesn't
    rec.fail_after(5);

    assert_eq!(
        sender.send(Command::data(b'x'), &mut delay),
        Err(TransportError::Pin {
            line: Line::En,
            kind: embedded_hal::digital::ErrorKind::Other
        })
    );
    assert_eq!(rec.events().len(), 5);
}

#[test]
fn release_gives_pins_back() {
    let rec = Recorder::new();
    let sender = rec.four_bit(false);

    let (_rs, rw, _en, db) = sender.release();
    assert!(rw.is_none());
    assert_eq!(db.len(), 4);
}
