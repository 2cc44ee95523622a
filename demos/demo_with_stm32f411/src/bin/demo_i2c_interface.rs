//! Drive a 20x4 HD44780 display through a PCF8574 I2C backpack with a STM32F411RET6
//!
//! Wiring diagram
//!
//! PCF8574 backpack <-> STM32F411RET6
//!              GND <-> GND
//!              VCC <-> 5V
//!              SDA <-> PB7
//!              SCL <-> PB6

#![no_std]
#![no_main]

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f4xx_hal::{
    i2c::{self, I2c},
    pac,
    prelude::*,
};

use lcd_hd44780::{
    mutex::NoopRawMutex, sender::I2cSender, CommMode, Config, DisplaySize, Error, Lcd,
};

const ROWS: [&[u8]; 4] = [b"row zero", b"row one", b"row two", b"row three"];

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_print!();

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(12.MHz()).freeze();

    let delayer = cp.SYST.delay(&clocks);
    let mut timer = dp.TIM2.delay_us(&clocks);

    let gpiob = dp.GPIOB.split();

    let i2c = I2c::new(
        dp.I2C1,
        (gpiob.pb6, gpiob.pb7),
        i2c::Mode::standard(100.kHz()), // The PCF8574T max I2C speed
        &clocks,
    );

    let sender = I2cSender::with_default_address(i2c);

    let config = Config::default()
        .set_size(DisplaySize::Lcd20x4)
        .set_comm_mode(CommMode::Serial);

    let lcd: Lcd<NoopRawMutex, _, _> = match Lcd::new(sender, delayer, config) {
        Ok(lcd) => lcd,
        Err(e) => {
            rprintln!("lcd init failed: {}", e);
            loop {
                cortex_m::asm::wfi();
            }
        }
    };

    let mut tick: i32 = 0;
    loop {
        let result: Result<(), Error> = (|| {
            for (row, text) in ROWS.iter().enumerate() {
                lcd.goto(0, row as u8)?;
                lcd.write_string(text)?;
            }
            lcd.goto(16, 0)?;
            lcd.write_int(tick)?;
            lcd.shift_cursor_backward(4)?;
            Ok(())
        })();
        if let Err(e) = result {
            rprintln!("update failed: {}", e);
        }
        tick += 1;
        timer.delay_ms(500);
    }
}
