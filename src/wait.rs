//! How the driver waits for the controller to be ready for the next byte

use embedded_hal::delay::DelayNs;

use crate::{config::Config, error::TransportError, sender::SendCommand};

/// Wait strategy, picked once when the [`Lcd`](crate::lcd::Lcd) is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitStrategy {
    /// Sleep a fixed time, long enough for the slowest instruction (clear / home)
    FixedDelay {
        /// sleep after each byte
        delay_us: u32,
    },
    /// Poll the busy flag until it clears, with no upper bound
    BusyFlag {
        /// sleep between two polls
        poll_interval_us: u32,
    },
}

impl WaitStrategy {
    /// Busy flag polling when the sender can read the status register, fixed delay otherwise
    pub fn select<Sender, Delayer>(sender: &Sender, config: &Config) -> Self
    where
        Sender: SendCommand<Delayer>,
        Delayer: DelayNs,
    {
        if sender.supports_read() {
            WaitStrategy::BusyFlag {
                poll_interval_us: config.get_poll_interval_us(),
            }
        } else {
            WaitStrategy::FixedDelay {
                delay_us: config.get_ready_delay_us(),
            }
        }
    }

    /// Block until the controller is ready
    pub fn wait<Sender, Delayer>(
        &self,
        sender: &mut Sender,
        delayer: &mut Delayer,
    ) -> Result<(), TransportError>
    where
        Sender: SendCommand<Delayer>,
        Delayer: DelayNs,
    {
        match *self {
            WaitStrategy::FixedDelay { delay_us } => {
                delayer.delay_us(delay_us);
                Ok(())
            }
            WaitStrategy::BusyFlag { poll_interval_us } => {
                sender.wait_for_idle(delayer, poll_interval_us)
            }
        }
    }

    #[allow(missing_docs)]
    pub fn is_busy_flag(&self) -> bool {
        matches!(self, WaitStrategy::BusyFlag { .. })
    }
}
