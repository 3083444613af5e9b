//! Interrupt entry points and status parsing for the PSSI.
//!
//! The application calls [`Pssi::on_interrupt`] from the PSSI interrupt
//! vector and [`Pssi::on_dma_event`] from each linked DMA channel's vector.

use super::callbacks::Event;
use super::config::{Direction, State};
use super::dma::{AbortReason, DmaHook};
use super::error::ErrorFlags;
use super::pssi::Pssi;
use crate::hal::clock::TickSource;
use crate::hal::dma::{DmaChannel, DmaEvent};
use crate::internal::register::pssi::{MIS_OVR_MIS, RIS_OVR_RIS, RegisterAccess};

// =============================================================================
// Interrupt Status
// =============================================================================

/// Overrun/underrun flags parsed from the RIS and MIS registers.
///
/// # Example
///
/// ```ignore
/// let status = pssi.interrupt_status();
/// if status.overrun_raw && !status.overrun_masked {
///     // Flag raised while the interrupt was disabled (polled transfer)
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// Overrun (Rx) or underrun (Tx) occurred
    pub overrun_raw: bool,
    /// Same flag, gated by the interrupt enable
    pub overrun_masked: bool,
}

impl InterruptStatus {
    /// Parse raw RIS and MIS register values
    #[inline]
    pub fn from_raw(ris: u32, mis: u32) -> Self {
        Self {
            overrun_raw: (ris & RIS_OVR_RIS) != 0,
            overrun_masked: (mis & MIS_OVR_MIS) != 0,
        }
    }

    /// Convert back to `(ris, mis)` register values
    #[inline]
    pub fn to_raw(&self) -> (u32, u32) {
        let ris = if self.overrun_raw { RIS_OVR_RIS } else { 0 };
        let mis = if self.overrun_masked { MIS_OVR_MIS } else { 0 };
        (ris, mis)
    }

    /// Check if any flag is set
    #[inline]
    pub fn any(&self) -> bool {
        self.overrun_raw || self.overrun_masked
    }
}

// =============================================================================
// Dispatch
// =============================================================================

impl<R: RegisterAccess, D: DmaChannel, T: TickSource> Pssi<'_, R, D, T> {
    /// Current overrun/underrun flags
    pub fn interrupt_status(&self) -> InterruptStatus {
        InterruptStatus::from_raw(self.regs.raw_interrupt_status(), self.regs.masked_interrupt_status())
    }

    /// Check if the overrun/underrun interrupt is enabled
    pub fn is_overrun_interrupt_enabled(&self) -> bool {
        self.regs.is_overrun_interrupt_enabled()
    }

    /// Handle the PSSI interrupt.
    ///
    /// On an overrun/underrun the peripheral is stopped and the flag cleared.
    /// A running DMA transfer records `UNDERRUN` (Tx) or `OVERRUN` (Rx) and
    /// its channel is aborted; the `Error` callback fires once the abort
    /// completes, or immediately when no channel is linked.
    pub fn on_interrupt(&mut self) {
        if !self.regs.overrun_raw() {
            return;
        }

        self.regs.disable_overrun_interrupt();
        self.regs.disable();
        self.regs.clear_overrun();
        self.transfer = None;

        #[cfg(feature = "defmt")]
        defmt::warn!("PSSI overrun/underrun in state {}", self.state);

        if self.regs.is_dma_request_enabled() {
            let (direction, flag) = match self.state {
                State::Tx => (Direction::Tx, ErrorFlags::UNDERRUN),
                State::Rx => (Direction::Rx, ErrorFlags::OVERRUN),
                _ => return,
            };
            self.errors.insert(flag);
            self.regs.disable_dma_request();

            if self.link_mut(direction).is_some() {
                // A refused abort has already reported through abort_complete
                let _ = self.request_channel_abort(direction, AbortReason::ErrorForced);
            } else {
                self.finish(Event::Error);
            }
        } else if matches!(self.state, State::Tx | State::Rx) {
            // An abort in flight reports through its own completion
            self.finish(Event::Error);
        }
    }

    /// Handle an event from the DMA channel linked for `direction`.
    ///
    /// Events without a hook registered on that link are ignored.
    pub fn on_dma_event(&mut self, direction: Direction, event: DmaEvent) {
        let Some(link) = self.link_mut(direction) else {
            return;
        };
        let hook = match event {
            DmaEvent::TransferComplete => link.hooks.complete,
            DmaEvent::TransferError => link.hooks.error,
            DmaEvent::AbortComplete => link.hooks.abort,
        };

        match hook {
            Some(DmaHook::ChunkComplete) => self.chunk_complete(),
            Some(DmaHook::ChunkError) => self.chunk_error(),
            Some(DmaHook::AbortComplete) => self.abort_complete(),
            None => {
                #[cfg(feature = "defmt")]
                defmt::trace!("PSSI ignoring unhooked DMA event {}", event);
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
