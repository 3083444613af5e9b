//! Blocking transfers
//!
//! The CPU moves every 1/2/4-byte unit through the data register, waiting on
//! the FIFO-ready status flag before each one. Buffers are little-endian
//! packed: unit `n` occupies bytes `n*w..(n+1)*w`.

use super::config::{DataWidth, Direction, State};
use super::error::{Error, ErrorFlags, Result};
use super::pssi::Pssi;
use crate::hal::clock::TickSource;
use crate::hal::dma::DmaChannel;
use crate::internal::constants::WAIT_FOREVER;
use crate::internal::register::pssi::RegisterAccess;

impl<R: RegisterAccess, D: DmaChannel, T: TickSource> Pssi<'_, R, D, T> {
    /// Transmit `data`, blocking until every unit has been written.
    ///
    /// `timeout_ms` bounds the wait for each unit, not the whole transfer.
    /// [`WAIT_FOREVER`](crate::constants::WAIT_FOREVER) waits indefinitely and
    /// `0` checks the FIFO once.
    ///
    /// # Errors
    /// - `InvalidParam` for an empty or misaligned buffer
    /// - `Busy` if the handle is not `Idle`
    /// - `Timeout` if the FIFO did not become ready in time
    /// - `Underrun` if the underrun flag was raised during the transfer
    pub fn transmit(&mut self, data: &[u8], timeout_ms: u32) -> Result<()> {
        self.check_transfer_len(data.len())?;
        self.begin(Direction::Tx)?;
        self.start_polled(Direction::Tx);

        let width = self.data_width;
        let access = width.access_width();
        for unit in data.chunks_exact(width.bytes()) {
            self.wait_fifo_ready(timeout_ms)?;
            self.regs.write_data(access, pack_unit(unit));
        }

        self.finish_polled(Direction::Tx)
    }

    /// Receive into `buf`, blocking until it is full.
    ///
    /// Timeout semantics match [`transmit`](Self::transmit).
    ///
    /// # Errors
    /// - `InvalidParam` for an empty or misaligned buffer
    /// - `Busy` if the handle is not `Idle`
    /// - `Timeout` if no data arrived in time
    /// - `Overrun` if the overrun flag was raised during the transfer
    pub fn receive(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<()> {
        self.check_transfer_len(buf.len())?;
        self.begin(Direction::Rx)?;
        self.start_polled(Direction::Rx);

        let width = self.data_width;
        let access = width.access_width();
        for unit in buf.chunks_exact_mut(width.bytes()) {
            self.wait_fifo_ready(timeout_ms)?;
            let word = self.regs.read_data(access);
            unit.copy_from_slice(&word.to_le_bytes()[..unit.len()]);
        }

        self.finish_polled(Direction::Rx)
    }

    fn start_polled(&mut self, direction: Direction) {
        self.regs.disable();
        self.regs.set_direction(direction == Direction::Tx, false);
        self.regs.enable();
    }

    /// Check the overrun/underrun flag once and return to `Idle`
    fn finish_polled(&mut self, direction: Direction) -> Result<()> {
        if self.regs.overrun_raw() {
            self.regs.disable();
            self.regs.clear_overrun();
            self.state = State::Idle;

            let (flag, err) = match direction {
                Direction::Tx => (ErrorFlags::UNDERRUN, Error::Underrun),
                Direction::Rx => (ErrorFlags::OVERRUN, Error::Overrun),
            };
            self.errors.insert(flag);

            #[cfg(feature = "defmt")]
            defmt::warn!("PSSI polled transfer failed: {}", err);

            return Err(err);
        }

        self.state = State::Idle;
        Ok(())
    }

    /// Spin until the FIFO can move one unit.
    ///
    /// On timeout the peripheral is disabled and the handle forced to `Idle`.
    fn wait_fifo_ready(&mut self, timeout_ms: u32) -> Result<()> {
        let start = self.tick.now_ms();

        while !self.fifo_ready() {
            if timeout_ms == WAIT_FOREVER {
                continue;
            }
            if timeout_ms == 0 || self.tick.elapsed_ms(start) > timeout_ms {
                // The flag may have been set while the tick was read
                if self.fifo_ready() {
                    break;
                }
                self.regs.disable();
                self.state = State::Idle;

                #[cfg(feature = "defmt")]
                defmt::warn!("PSSI FIFO wait timed out after {} ms", timeout_ms);

                return Err(Error::Timeout);
            }
        }
        Ok(())
    }

    fn fifo_ready(&self) -> bool {
        match self.data_width {
            DataWidth::Bits8 => self.regs.fifo_ready_1b(),
            DataWidth::Bits16 | DataWidth::Bits32 => self.regs.fifo_ready_4b(),
        }
    }
}

/// Little-endian pack of a 1/2/4-byte unit
fn pack_unit(unit: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word[..unit.len()].copy_from_slice(unit);
    u32::from_le_bytes(word)
}

// =============================================================================
// Unit Tests
// =============================================================================
