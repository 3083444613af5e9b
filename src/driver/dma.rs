//! DMA transfer engine for the PSSI.
//!
//! This module extends [`Pssi`] with non-blocking transfers driven by a
//! lent [`DmaChannel`]. Buffers longer than [`MAX_CHUNK`] are split into
//! consecutive chunks; chunk N+1 is only armed from chunk N's completion.
//!
//! # Event Flow
//!
//! 1. `transmit_dma` / `receive_dma` arm the first chunk and return
//! 2. The application's DMA ISR forwards channel events to
//!    [`Pssi::on_dma_event`](super::pssi::Pssi::on_dma_event)
//! 3. The hook registered on the link for that event runs: re-arm the next
//!    chunk, finish the transfer, or handle the failure
//! 4. The user callback fires once the handle is back in `Idle`
//!
//! # Example
//!
//! ```ignore
//! pssi.link_rx_dma(&mut rx_channel)?;
//! pssi.register_callback(Event::RxComplete, frame_ready)?;
//! pssi.receive_dma(&mut FRAME)?;
//! ```

use super::callbacks::Event;
use super::config::{Direction, State};
use super::error::{ChannelError, ChannelResult, Error, ErrorFlags, Result};
use super::pssi::Pssi;
use crate::hal::clock::TickSource;
use crate::hal::dma::DmaChannel;
use crate::internal::constants::MAX_CHUNK;
use crate::internal::register::pssi::RegisterAccess;

// =============================================================================
// Transfer Bookkeeping
// =============================================================================

/// Cursor over a chunked DMA transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transfer {
    pub(crate) direction: Direction,
    /// Total bytes requested
    pub(crate) total: usize,
    /// Byte offset of the current chunk
    pub(crate) offset: usize,
    /// Bytes not yet handed to the channel
    pub(crate) remaining: usize,
    /// Length of the current chunk
    pub(crate) chunk: usize,
}

impl Transfer {
    fn new(direction: Direction, total: usize) -> Self {
        Self {
            direction,
            total,
            offset: 0,
            remaining: total,
            chunk: total.min(MAX_CHUNK),
        }
    }

    /// Move to the chunk following the current one
    fn advance(&mut self) {
        self.offset += self.chunk;
        self.chunk = self.remaining.min(MAX_CHUNK);
    }
}

/// Buffer lent to the engine for the lifetime of the handle borrow
#[derive(Debug, Default)]
pub(crate) enum DmaBuffer<'d> {
    #[default]
    Empty,
    Tx(&'d [u8]),
    Rx(&'d mut [u8]),
}

/// Why an asynchronous channel abort was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AbortReason {
    /// [`Pssi::abort_async`] was called
    UserRequested,
    /// An overrun/underrun forced the transfer down
    ErrorForced,
}

/// Engine routine run for a channel event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DmaHook {
    ChunkComplete,
    ChunkError,
    AbortComplete,
}

/// Hooks registered on one channel link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ChannelHooks {
    pub(crate) complete: Option<DmaHook>,
    pub(crate) error: Option<DmaHook>,
    pub(crate) abort: Option<DmaHook>,
}

/// A lent DMA channel and the hooks registered on it
#[derive(Debug)]
pub(crate) struct DmaLink<'d, D> {
    pub(crate) channel: &'d mut D,
    pub(crate) hooks: ChannelHooks,
}

impl<'d, D> DmaLink<'d, D> {
    fn new(channel: &'d mut D) -> Self {
        Self {
            channel,
            hooks: ChannelHooks::default(),
        }
    }
}

// =============================================================================
// DMA Engine
// =============================================================================

impl<'d, R: RegisterAccess, D: DmaChannel, T: TickSource> Pssi<'d, R, D, T> {
    // =========================================================================
    // Channel Linking
    // =========================================================================

    /// Lend the channel used by [`transmit_dma`](Self::transmit_dma)
    pub fn link_tx_dma(&mut self, channel: &'d mut D) -> Result<()> {
        if self.state.is_active() {
            return Err(Error::Busy);
        }
        self.tx_dma = Some(DmaLink::new(channel));
        Ok(())
    }

    /// Lend the channel used by [`receive_dma`](Self::receive_dma)
    pub fn link_rx_dma(&mut self, channel: &'d mut D) -> Result<()> {
        if self.state.is_active() {
            return Err(Error::Busy);
        }
        self.rx_dma = Some(DmaLink::new(channel));
        Ok(())
    }

    /// Take back the transmit channel
    pub fn unlink_tx_dma(&mut self) -> Result<Option<&'d mut D>> {
        if self.state.is_active() {
            return Err(Error::Busy);
        }
        Ok(self.tx_dma.take().map(|link| link.channel))
    }

    /// Take back the receive channel
    pub fn unlink_rx_dma(&mut self) -> Result<Option<&'d mut D>> {
        if self.state.is_active() {
            return Err(Error::Busy);
        }
        Ok(self.rx_dma.take().map(|link| link.channel))
    }

    /// Take back the buffer lent to [`receive_dma`](Self::receive_dma).
    ///
    /// Returns `None` while a transfer is running or when no receive buffer
    /// is held.
    pub fn take_rx_buffer(&mut self) -> Option<&'d mut [u8]> {
        if self.state.is_active() {
            return None;
        }
        match core::mem::take(&mut self.buffer) {
            DmaBuffer::Rx(buf) => Some(buf),
            other => {
                self.buffer = other;
                None
            }
        }
    }

    /// Bytes handed to the channel so far and the total, while a DMA
    /// transfer is running
    pub fn dma_progress(&self) -> Option<(usize, usize)> {
        self.transfer.map(|t| (t.total - t.remaining, t.total))
    }

    // =========================================================================
    // Transfers
    // =========================================================================

    /// Start a DMA transmit of `data`.
    ///
    /// Returns once the first chunk is armed. Completion is reported through
    /// the `TxComplete` callback. The peripheral stays enabled after the last
    /// chunk so the FIFO can drain.
    pub fn transmit_dma(&mut self, data: &'d [u8]) -> Result<()> {
        self.check_transfer_len(data.len())?;
        if self.tx_dma.is_none() {
            return Err(Error::InvalidParam);
        }
        self.begin(Direction::Tx)?;
        self.regs.disable();

        self.buffer = DmaBuffer::Tx(data);
        self.start_dma(Direction::Tx, data.len())
    }

    /// Start a DMA receive into `buf`.
    ///
    /// Returns once the first chunk is armed. Completion is reported through
    /// the `RxComplete` callback; the buffer is available again through
    /// [`take_rx_buffer`](Self::take_rx_buffer).
    pub fn receive_dma(&mut self, buf: &'d mut [u8]) -> Result<()> {
        self.check_transfer_len(buf.len())?;
        if self.rx_dma.is_none() {
            return Err(Error::InvalidParam);
        }
        self.begin(Direction::Rx)?;
        self.regs.disable();

        let len = buf.len();
        self.buffer = DmaBuffer::Rx(buf);
        self.start_dma(Direction::Rx, len)
    }

    fn start_dma(&mut self, direction: Direction, len: usize) -> Result<()> {
        let mut transfer = Transfer::new(direction, len);

        if let Err(_e) = self.arm_chunk(direction, transfer.offset, transfer.chunk) {
            #[cfg(feature = "defmt")]
            defmt::warn!("PSSI DMA start failed: {}", _e);

            self.errors.insert(ErrorFlags::DMA);
            self.transfer = None;
            self.state = State::Idle;
            return Err(Error::Dma);
        }
        transfer.remaining -= transfer.chunk;
        self.transfer = Some(transfer);

        self.regs.enable_overrun_interrupt();
        self.regs.set_direction(direction == Direction::Tx, true);
        self.regs.enable();
        Ok(())
    }

    /// Register the chunk hooks on the direction's link and start one chunk
    fn arm_chunk(&mut self, direction: Direction, offset: usize, len: usize) -> ChannelResult<()> {
        let data_reg = self.regs.data_address();
        let (src, dst) = match (&mut self.buffer, direction) {
            (DmaBuffer::Tx(buf), Direction::Tx) => (buf.as_ptr() as usize + offset, data_reg),
            (DmaBuffer::Rx(buf), Direction::Rx) => (data_reg, buf.as_mut_ptr() as usize + offset),
            _ => return Err(ChannelError::InvalidTransfer),
        };

        let link = self.link_mut(direction).ok_or(ChannelError::InvalidTransfer)?;
        link.hooks.complete = Some(DmaHook::ChunkComplete);
        link.hooks.error = Some(DmaHook::ChunkError);
        link.channel.start(src, dst, len)
    }

    pub(super) fn link_mut(&mut self, direction: Direction) -> Option<&mut DmaLink<'d, D>> {
        match direction {
            Direction::Tx => self.tx_dma.as_mut(),
            Direction::Rx => self.rx_dma.as_mut(),
        }
    }

    /// Stop the peripheral side of a DMA transfer
    pub(super) fn stop_dma_requests(&mut self) {
        self.regs.disable();
        self.regs.disable_dma_request();
        self.regs.disable_overrun_interrupt();
    }

    // =========================================================================
    // Channel Hooks
    // =========================================================================

    /// A chunk finished: finish the transfer or arm the next chunk
    pub(super) fn chunk_complete(&mut self) {
        if !matches!(self.state, State::Tx | State::Rx) {
            return;
        }
        let Some(mut transfer) = self.transfer else {
            return;
        };

        if transfer.remaining == 0 {
            let event = match transfer.direction {
                Direction::Tx => Event::TxComplete,
                Direction::Rx => {
                    self.stop_dma_requests();
                    Event::RxComplete
                }
            };

            #[cfg(feature = "defmt")]
            defmt::debug!("PSSI DMA transfer complete: {} bytes", transfer.total);

            self.finish(event);
            return;
        }

        transfer.advance();
        match self.arm_chunk(transfer.direction, transfer.offset, transfer.chunk) {
            Ok(()) => {
                transfer.remaining -= transfer.chunk;
                self.transfer = Some(transfer);
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("PSSI DMA re-arm failed at offset {}: {}", transfer.offset, _e);

                self.stop_dma_requests();
                self.errors.insert(ErrorFlags::DMA);
                self.finish(Event::Error);
            }
        }
    }

    /// The channel reported a bus error
    pub(super) fn chunk_error(&mut self) {
        if !self.state.is_active() {
            return;
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("PSSI DMA channel error");

        // A pending abort completion must not report a second time
        self.clear_hooks();
        self.stop_dma_requests();
        self.errors.insert(ErrorFlags::DMA);

        let event = match self.pending_abort.take() {
            Some(AbortReason::UserRequested) => Event::AbortComplete,
            _ => Event::Error,
        };
        self.finish(event);
    }

    /// An asynchronous channel abort finished
    pub(super) fn abort_complete(&mut self) {
        self.clear_hooks();

        let event = match self.pending_abort.take() {
            Some(AbortReason::UserRequested) => Event::AbortComplete,
            Some(AbortReason::ErrorForced) => Event::Error,
            None => return,
        };
        self.finish(event);
    }

    /// Drop every hook registered on both links
    fn clear_hooks(&mut self) {
        if let Some(link) = self.tx_dma.as_mut() {
            link.hooks = ChannelHooks::default();
        }
        if let Some(link) = self.rx_dma.as_mut() {
            link.hooks = ChannelHooks::default();
        }
    }

    /// Abort the direction's channel asynchronously.
    ///
    /// Runs [`abort_complete`](Self::abort_complete) directly when the
    /// channel refuses the request.
    pub(super) fn request_channel_abort(&mut self, direction: Direction, reason: AbortReason) -> Result<()> {
        self.pending_abort = Some(reason);
        self.transfer = None;

        let Some(link) = self.link_mut(direction) else {
            return Err(Error::Dma);
        };
        // Chunks still in flight must not re-arm or complete the transfer
        link.hooks.complete = None;
        link.hooks.abort = Some(DmaHook::AbortComplete);
        if let Err(_e) = link.channel.abort_async() {
            #[cfg(feature = "defmt")]
            defmt::warn!("PSSI DMA abort request failed: {}", _e);

            self.errors.insert(ErrorFlags::DMA);
            self.abort_complete();
            return Err(Error::Dma);
        }
        Ok(())
    }

    // =========================================================================
    // Abort
    // =========================================================================

    /// Abort the running DMA transfer and wait for the channel to stop.
    ///
    /// Only valid while transmitting or receiving. The handle always ends in
    /// `Idle`; `Dma` is returned (and recorded) when no DMA transfer was
    /// running or the channel failed to stop.
    pub fn abort(&mut self) -> Result<()> {
        let direction = self.active_direction()?;

        #[cfg(feature = "defmt")]
        defmt::debug!("PSSI abort: {}", direction);

        self.regs.disable_overrun_interrupt();

        let result = if self.regs.is_dma_request_enabled() {
            self.state = State::Abort;
            self.regs.disable();
            self.regs.disable_dma_request();

            match self.link_mut(direction) {
                Some(link) => link.channel.abort().map_err(Error::from),
                None => Err(Error::Dma),
            }
        } else {
            Err(Error::Dma)
        };

        if result.is_err() {
            self.errors.insert(ErrorFlags::DMA);
        }
        self.clear_hooks();
        self.transfer = None;
        self.pending_abort = None;
        self.state = State::Idle;
        result
    }

    /// Request an abort of the running DMA transfer.
    ///
    /// Only valid while transmitting or receiving. Completion is reported
    /// through the `AbortComplete` callback once the channel has stopped.
    pub fn abort_async(&mut self) -> Result<()> {
        let direction = self.active_direction()?;

        #[cfg(feature = "defmt")]
        defmt::debug!("PSSI abort (async): {}", direction);

        self.regs.disable_overrun_interrupt();

        if !self.regs.is_dma_request_enabled() {
            self.transfer = None;
            self.finish(Event::Error);
            return Err(Error::Dma);
        }

        self.state = State::Abort;
        self.transfer = None;
        self.regs.disable();
        self.regs.disable_dma_request();

        if self.link_mut(direction).is_none() {
            self.errors.insert(ErrorFlags::DMA);
            self.finish(Event::Error);
            return Err(Error::Dma);
        }
        self.request_channel_abort(direction, AbortReason::UserRequested)
    }

    fn active_direction(&self) -> Result<Direction> {
        match self.state {
            State::Tx => Ok(Direction::Tx),
            State::Rx => Ok(Direction::Rx),
            _ => Err(Error::InvalidState),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
