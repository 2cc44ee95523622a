//! Init config of a [`Lcd`](crate::lcd::Lcd)

use crate::error::ConfigError;

/// Display geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplaySize {
    /// 16 columns, 2 rows
    #[default]
    Lcd16x2,
    /// 16 columns, 4 rows
    Lcd16x4,
    /// 20 columns, 4 rows
    Lcd20x4,
}

impl DisplaySize {
    /// Characters per row
    pub fn columns(&self) -> u8 {
        match self {
            DisplaySize::Lcd16x2 | DisplaySize::Lcd16x4 => 16,
            DisplaySize::Lcd20x4 => 20,
        }
    }

    /// Number of rows
    pub fn rows(&self) -> u8 {
        match self {
            DisplaySize::Lcd16x2 => 2,
            DisplaySize::Lcd16x4 | DisplaySize::Lcd20x4 => 4,
        }
    }
}

impl TryFrom<u8> for DisplaySize {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DisplaySize::Lcd16x2),
            1 => Ok(DisplaySize::Lcd16x4),
            2 => Ok(DisplaySize::Lcd20x4),
            _ => Err(ConfigError::InvalidSize(value)),
        }
    }
}

/// How the controller is wired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommMode {
    /// 4 data lines, every byte sent as two nibbles
    #[default]
    Bit4,
    /// 8 data lines, one pulse per byte
    Bit8,
    /// I2C GPIO expander backpack
    Serial,
}

impl TryFrom<u8> for CommMode {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CommMode::Bit4),
            1 => Ok(CommMode::Bit8),
            2 => Ok(CommMode::Serial),
            _ => Err(ConfigError::InvalidMode(value)),
        }
    }
}

/// [`Config`] is the init config of a [`Lcd`](crate::lcd::Lcd)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    size: DisplaySize,
    comm_mode: CommMode,
    ready_delay_us: u32,
    init_step_delay_us: u32,
    poll_interval_us: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: DisplaySize::default(),
            comm_mode: CommMode::default(),
            ready_delay_us: 2_000,
            init_step_delay_us: 100_000,
            poll_interval_us: 10,
        }
    }
}

#[allow(missing_docs)]
impl Config {
    /// Build a config from raw size and mode indexes, as they'd come from a board description
    pub fn from_raw(size: u8, comm_mode: u8) -> Result<Self, ConfigError> {
        Ok(Self::default()
            .set_size(DisplaySize::try_from(size)?)
            .set_comm_mode(CommMode::try_from(comm_mode)?))
    }

    pub fn get_size(&self) -> DisplaySize {
        self.size
    }

    pub fn set_size(mut self, size: DisplaySize) -> Self {
        self.size = size;
        self
    }

    pub fn get_comm_mode(&self) -> CommMode {
        self.comm_mode
    }

    pub fn set_comm_mode(mut self, comm_mode: CommMode) -> Self {
        self.comm_mode = comm_mode;
        self
    }

    /// Delay after each byte when the busy flag can't be read
    pub fn get_ready_delay_us(&self) -> u32 {
        self.ready_delay_us
    }

    pub fn set_ready_delay_us(mut self, delay_us: u32) -> Self {
        self.ready_delay_us = delay_us;
        self
    }

    /// Settling delay after each command of the power-on sequence
    pub fn get_init_step_delay_us(&self) -> u32 {
        self.init_step_delay_us
    }

    pub fn set_init_step_delay_us(mut self, delay_us: u32) -> Self {
        self.init_step_delay_us = delay_us;
        self
    }

    /// Pause between two busy flag polls
    pub fn get_poll_interval_us(&self) -> u32 {
        self.poll_interval_us
    }

    pub fn set_poll_interval_us(mut self, interval_us: u32) -> Self {
        self.poll_interval_us = interval_us;
        self
    }
}
