//! Advisory bus arbitration
//!
//! When the PSSI pins are shared, the application attaches a [`BusMutex`]
//! and brackets its transfers with [`Pssi::acquire_bus`] and
//! [`Pssi::release_bus`]. The driver never takes the mutex on its own.

use super::error::{Error, Result};
use super::pssi::Pssi;
use crate::hal::bus::BusMutex;
use crate::hal::clock::TickSource;
use crate::hal::dma::DmaChannel;
use crate::internal::register::pssi::RegisterAccess;

impl<'d, R: RegisterAccess, D: DmaChannel, T: TickSource> Pssi<'d, R, D, T> {
    /// Attach the mutex guarding the bus
    pub fn attach_bus(&mut self, mutex: &'d dyn BusMutex) {
        self.bus = Some(mutex);
    }

    /// Detach the bus mutex, returning it
    pub fn detach_bus(&mut self) -> Option<&'d dyn BusMutex> {
        self.bus.take()
    }

    /// Take the bus mutex. Thread context only.
    ///
    /// # Errors
    /// - `InvalidState` if no mutex is attached
    /// - `Busy` if the mutex was not taken within `timeout_ms`
    pub fn acquire_bus(&self, timeout_ms: u32) -> Result<()> {
        let mutex = self.bus.ok_or(Error::InvalidState)?;
        mutex.take(timeout_ms).map_err(|_e| {
            #[cfg(feature = "defmt")]
            defmt::debug!("PSSI bus acquire failed: {}", _e);

            Error::Busy
        })
    }

    /// Release the bus mutex. Callable from any context.
    pub fn release_bus(&self) -> Result<()> {
        let mutex = self.bus.ok_or(Error::InvalidState)?;
        mutex.give().map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::config::PssiConfig;
    use crate::test_utils::{MockBusMutex, MockRegisters, configured_pssi};

    #[test]
    fn acquire_without_mutex_is_invalid_state() {
        let regs = MockRegisters::new();
        let pssi = configured_pssi(&regs, &PssiConfig::new());

        assert_eq!(pssi.acquire_bus(10), Err(Error::InvalidState));
        assert_eq!(pssi.release_bus(), Err(Error::InvalidState));
    }

    #[test]
    fn acquire_and_release() {
        let mutex = MockBusMutex::new();
        let regs = MockRegisters::new();
        let mut pssi = configured_pssi(&regs, &PssiConfig::new());
        pssi.attach_bus(&mutex);

        pssi.acquire_bus(10).unwrap();
        assert!(mutex.is_held());
        assert_eq!(pssi.acquire_bus(10), Err(Error::Busy));

        pssi.release_bus().unwrap();
        assert!(!mutex.is_held());
        assert_eq!(pssi.release_bus(), Err(Error::InvalidState));
    }

    #[test]
    fn detach_returns_mutex() {
        let mutex = MockBusMutex::new();
        let regs = MockRegisters::new();
        let mut pssi = configured_pssi(&regs, &PssiConfig::new());
        pssi.attach_bus(&mutex);

        assert!(pssi.detach_bus().is_some());
        assert!(pssi.detach_bus().is_none());
        assert_eq!(pssi.acquire_bus(0), Err(Error::InvalidState));
    }
}
