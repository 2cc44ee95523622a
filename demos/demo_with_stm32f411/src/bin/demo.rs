//! Drive a 16x2 HD44780 display with a STM32F411RET6 in 4 Pin Mode, polling the busy flag
//!
//! Wiring diagram
//!
//! LCD1602 <-> STM32F411RET6
//!     Vss <-> GND
//!     Vdd <-> 5V
//!      V0 <-> potentiometer <-> 5V & GND (to adjust the display contrast)
//!      RS <-> PA0
//!      RW <-> PA1 (or tie it to GND and pass `None`, the driver then waits a fixed delay)
//!      EN <-> PA2 (and optionally connect to a 4.7 kOhm Pulldown resistor, to stable voltage level when STM32 reset)
//!      D4 <-> PA3
//!      D5 <-> PA4
//!      D6 <-> PA5
//!      D7 <-> PA6
//!       A <-> 5V
//!       K <-> GND

#![no_std]
#![no_main]

use core::fmt::Write;

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f4xx_hal::{pac, prelude::*};

use lcd_hd44780::{
    command::MoveDirection, mutex::NoopRawMutex, sender::ParallelSender, CommMode, Config,
    DisplaySize, Error, Lcd,
};

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_print!();

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(12.MHz()).freeze();

    let delayer = cp.SYST.delay(&clocks);
    let mut timer = dp.TIM2.delay_us(&clocks);

    let gpioa = dp.GPIOA.split();

    // Push-pull mode for a fast interaction
    let rs_pin = gpioa.pa0.into_push_pull_output().erase();
    let rw_pin = gpioa.pa1.into_push_pull_output().erase();
    let en_pin = gpioa.pa2.into_push_pull_output().erase();

    // data lines are read back when polling the busy flag
    let db4_pin = gpioa
        .pa3
        .into_open_drain_output()
        .internal_pull_up(true)
        .erase();
    let db5_pin = gpioa
        .pa4
        .into_open_drain_output()
        .internal_pull_up(true)
        .erase();
    let db6_pin = gpioa
        .pa5
        .into_open_drain_output()
        .internal_pull_up(true)
        .erase();
    let db7_pin = gpioa
        .pa6
        .into_open_drain_output()
        .internal_pull_up(true)
        .erase();

    let sender = ParallelSender::new_4pin(
        rs_pin,
        Some(rw_pin),
        en_pin,
        db4_pin,
        db5_pin,
        db6_pin,
        db7_pin,
    );

    let config = Config::default()
        .set_size(DisplaySize::Lcd16x2)
        .set_comm_mode(CommMode::Bit4);

    let mut lcd: Lcd<NoopRawMutex, _, _> = match Lcd::new(sender, delayer, config) {
        Ok(lcd) => lcd,
        Err(e) => {
            rprintln!("lcd init failed: {}", e);
            loop {
                cortex_m::asm::wfi();
            }
        }
    };
    rprintln!("lcd ready, waiting with {:?}", lcd.wait_strategy());

    let mut count: i32 = -5;
    loop {
        if let Err(e) = draw(&mut lcd, count) {
            rprintln!("draw failed: {}", e);
        }
        count += 1;
        timer.delay_ms(1_000);
    }
}

fn draw<Sender, Delayer>(
    lcd: &mut Lcd<NoopRawMutex, Sender, Delayer>,
    count: i32,
) -> Result<(), Error>
where
    Sender: lcd_hd44780::sender::SendCommand<Delayer>,
    Delayer: embedded_hal::delay::DelayNs,
{
    lcd.clear()?;
    lcd.write_string(b"hello,")?;
    lcd.shift_cursor_forward(1)?;
    lcd.write_string(b"world!")?;

    lcd.goto(0, 1)?;
    lcd.write_string(b"n=")?;
    lcd.write_int(count)?;
    lcd.shift_cursor_forward(1)?;
    lcd.write_float(count as f32 / 3.0, 2)?;

    // fmt::Write goes through write_string
    write!(lcd, "!").map_err(|_| Error::InvalidArgument("format"))?;

    if count % 4 == 0 {
        lcd.shift_display(MoveDirection::LeftToRight, 2)?;
        lcd.home()?;
    }
    Ok(())
}
