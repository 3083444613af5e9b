//! DMA Channel Abstraction
//!
//! The driver never programs a DMA controller itself. The application lends
//! the handle a channel implementing [`DmaChannel`] and forwards the channel's
//! interrupt events to [`Pssi::on_dma_event`](crate::driver::pssi::Pssi::on_dma_event).
//!
//! # Example
//!
//! ```ignore
//! #[interrupt]
//! fn GPDMA1_CH0() {
//!     let event = if channel_flags.transfer_complete() {
//!         DmaEvent::TransferComplete
//!     } else {
//!         DmaEvent::TransferError
//!     };
//!     PSSI.with(|pssi| pssi.on_dma_event(Direction::Rx, event));
//! }
//! ```

use crate::driver::error::{ChannelError, ChannelResult};

/// Event raised by a DMA channel and routed to the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaEvent {
    /// Programmed block fully transferred
    TransferComplete,
    /// Bus error during the transfer
    TransferError,
    /// Asynchronous abort finished
    AbortComplete,
}

/// A single DMA channel able to move one contiguous block.
///
/// Addresses are bus addresses. For transmit `src` is memory and `dst` the
/// PSSI data register; for receive the roles are swapped.
pub trait DmaChannel {
    /// Program and start a block transfer of `len` bytes
    fn start(&mut self, src: usize, dst: usize, len: usize) -> ChannelResult<()>;

    /// Stop the channel and wait until it is idle
    fn abort(&mut self) -> ChannelResult<()>;

    /// Request a stop; completion is signalled with [`DmaEvent::AbortComplete`]
    fn abort_async(&mut self) -> ChannelResult<()>;
}

impl<T: DmaChannel + ?Sized> DmaChannel for &mut T {
    fn start(&mut self, src: usize, dst: usize, len: usize) -> ChannelResult<()> {
        (**self).start(src, dst, len)
    }

    fn abort(&mut self) -> ChannelResult<()> {
        (**self).abort()
    }

    fn abort_async(&mut self) -> ChannelResult<()> {
        (**self).abort_async()
    }
}

/// Placeholder channel for handles that only use the polled engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDma;

impl DmaChannel for NoDma {
    fn start(&mut self, _src: usize, _dst: usize, _len: usize) -> ChannelResult<()> {
        Err(ChannelError::InvalidTransfer)
    }

    fn abort(&mut self) -> ChannelResult<()> {
        Ok(())
    }

    fn abort_async(&mut self) -> ChannelResult<()> {
        Err(ChannelError::InvalidTransfer)
    }
}
