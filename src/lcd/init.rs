use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};
use embedded_hal::delay::DelayNs;

use crate::{
    command::{CommandSet, DataWidth, Font, LineMode, MoveDirection, ShiftType, State},
    config::{CommMode, Config},
    error::{ConfigError, Error, TransportError},
    lcd::{Bus, Lcd},
    sender::SendCommand,
    wait::WaitStrategy,
};

impl<M, Sender, Delayer> Lcd<M, Sender, Delayer>
where
    M: RawMutex,
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    /// Create a [`Lcd`] driver, and run the power-on sequence of the controller
    ///
    /// The config's mode must match the sender, otherwise nothing is sent.
    /// On failure the sender and the delayer are dropped and no handle exists.
    pub fn new(mut sender: Sender, mut delayer: Delayer, config: Config) -> Result<Self, Error> {
        let transport = sender.comm_mode();
        if config.get_comm_mode() != transport {
            let err = ConfigError::ModeMismatch {
                configured: config.get_comm_mode(),
                transport,
            };
            log::error!("init failed: {}", err);
            return Err(err.into());
        }

        if let Err(e) = power_on(&mut sender, &mut delayer, &config) {
            log::error!("init failed: {}", e);
            return Err(e.into());
        }

        let wait = WaitStrategy::select::<Sender, Delayer>(&sender, &config);
        log::debug!(
            "lcd ready: {:?} {:?}, waiting with {:?}",
            config.get_size(),
            transport,
            wait
        );

        Ok(Self {
            config,
            wait,
            bus: Mutex::new(RefCell::new(Bus { sender, delayer })),
        })
    }

    /// [`Lcd::new`] from raw size and mode indexes, see [`Config::from_raw`]
    ///
    /// Out of range indexes are rejected before any pin or bus access.
    pub fn with_raw_config(
        sender: Sender,
        delayer: Delayer,
        size: u8,
        comm_mode: u8,
    ) -> Result<Self, Error> {
        let config = Config::from_raw(size, comm_mode).map_err(|e| {
            log::error!("init failed: {}", e);
            e
        })?;
        Self::new(sender, delayer, config)
    }
}

// every step is followed by the init settling delay, the busy flag isn't trusted yet
fn power_on<Sender, Delayer>(
    sender: &mut Sender,
    delayer: &mut Delayer,
    config: &Config,
) -> Result<(), TransportError>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    let step_delay_us = config.get_init_step_delay_us();

    sender.init_lines()?;
    delayer.delay_us(step_delay_us);

    let data_width = match config.get_comm_mode() {
        CommMode::Bit8 => DataWidth::Bit8,
        CommMode::Bit4 | CommMode::Serial => DataWidth::Bit4,
    };

    let sequence = [
        CommandSet::ReturnHome,
        CommandSet::FunctionSet(data_width, LineMode::TwoLine, Font::Font5x8),
        CommandSet::EntryModeSet(MoveDirection::LeftToRight, ShiftType::CursorOnly),
        CommandSet::DisplayOnOff {
            display: State::On,
            cursor: State::Off,
            cursor_blink: State::Off,
        },
        CommandSet::ClearDisplay,
    ];

    for command in sequence {
        log::debug!("init {:?}", command);
        sender.send(command.into(), delayer)?;
        delayer.delay_us(step_delay_us);
    }

    Ok(())
}
