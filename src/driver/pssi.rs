//! Core PSSI driver handle.
//!
//! This module contains the [`Pssi`] structure and the operations that do not
//! move data:
//!
//! - Construction, clock gating and de-initialization
//! - Configuration and per-field control register access
//! - State, error record and user data accessors
//! - Callback registration
//!
//! Data movement lives in [`polling`](super::polling) and [`dma`](super::dma),
//! interrupt entry points in [`interrupt`](super::interrupt) and bus
//! arbitration in [`arbiter`](super::arbiter).

use super::callbacks::{Callback, CallbackContext, Callbacks, Event};
use super::config::{
    ClockPolarity, ControlSignal, DataEnablePolarity, DataWidth, Direction, Instance, PssiConfig,
    ReadyPolarity, State,
};
use super::dma::{AbortReason, DmaBuffer, DmaLink, Transfer};
use super::error::{Error, ErrorFlags, Result};
use crate::hal::bus::BusMutex;
use crate::hal::clock::{PeripheralClock, TickSource};
use crate::hal::dma::{DmaChannel, NoDma};
use crate::internal::register::pssi::{CR_DEPOL, CR_RDYPOL, PssiRegs, RegisterAccess};

// =============================================================================
// PSSI Driver
// =============================================================================

/// STM32U5 PSSI driver handle
///
/// # Type Parameters
/// * `R` - Register access ([`MmioRegisters`](crate::unsafe_registers::MmioRegisters) on hardware)
/// * `D` - DMA channel type lent by the application ([`NoDma`] for polling only)
/// * `T` - Millisecond tick source
///
/// # Example
/// ```ignore
/// let regs = MmioRegisters::for_instance(Instance::Pssi1);
/// let mut pssi = Pssi::with_clock(Instance::Pssi1, regs, SysTick, &mut rcc);
///
/// pssi.configure(&PssiConfig::camera_8bit())?;
/// pssi.receive(&mut frame, 100)?;
/// ```
///
/// The handle is not internally synchronized. Share it with interrupt
/// handlers through [`SharedPssi`](crate::sync::SharedPssi).
pub struct Pssi<'d, R, D, T> {
    pub(super) instance: Instance,
    pub(super) regs: PssiRegs<R>,
    pub(super) tick: T,
    pub(super) state: State,
    pub(super) data_width: DataWidth,
    /// Active DMA transfer cursor
    pub(super) transfer: Option<Transfer>,
    /// Buffer lent to the DMA engine
    pub(super) buffer: DmaBuffer<'d>,
    pub(super) tx_dma: Option<DmaLink<'d, D>>,
    pub(super) rx_dma: Option<DmaLink<'d, D>>,
    pub(super) errors: ErrorFlags,
    pub(super) user_data: Option<usize>,
    pub(super) callbacks: Callbacks,
    pub(super) bus: Option<&'d dyn BusMutex>,
    pub(super) pending_abort: Option<AbortReason>,
}

/// Handle without DMA support
pub type PollingPssi<'d, R, T> = Pssi<'d, R, NoDma, T>;

impl<'d, R: RegisterAccess, D: DmaChannel, T: TickSource> Pssi<'d, R, D, T> {
    /// Create a handle bound to `instance`.
    ///
    /// This is a const function suitable for static initialization. The
    /// functional clock is left untouched and the handle starts in
    /// [`State::Init`].
    pub const fn new(instance: Instance, regs: R, tick: T) -> Self {
        Self {
            instance,
            regs: PssiRegs::new(regs),
            tick,
            state: State::Init,
            data_width: DataWidth::Bits8,
            transfer: None,
            buffer: DmaBuffer::Empty,
            tx_dma: None,
            rx_dma: None,
            errors: ErrorFlags::NONE,
            user_data: None,
            callbacks: Callbacks::new(),
            bus: None,
            pending_abort: None,
        }
    }

    /// Create a handle and enable the instance's functional clock first.
    pub fn with_clock<C: PeripheralClock>(instance: Instance, regs: R, tick: T, clock: &mut C) -> Self {
        clock.enable_functional_clock(instance);

        #[cfg(feature = "defmt")]
        defmt::debug!("PSSI functional clock enabled");

        Self::new(instance, regs, tick)
    }

    /// Stop the peripheral and return to [`State::Init`].
    ///
    /// Disables the peripheral and the overrun/underrun interrupt and clears
    /// the pending flag. Linked DMA channels, the bus mutex and callbacks stay
    /// attached.
    pub fn deinit(&mut self) {
        self.regs.disable();
        self.regs.disable_overrun_interrupt();
        self.regs.clear_overrun();

        self.transfer = None;
        self.pending_abort = None;
        self.state = State::Init;
    }

    // =========================================================================
    // State Accessors
    // =========================================================================

    /// Current driver state
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Errors recorded by the last transfer
    #[inline]
    pub fn last_errors(&self) -> ErrorFlags {
        self.errors
    }

    /// Bound instance
    #[inline]
    pub fn instance(&self) -> Instance {
        self.instance
    }

    /// Configured data width
    #[inline]
    pub fn data_width(&self) -> DataWidth {
        self.data_width
    }

    /// Store an opaque user token passed back in every [`CallbackContext`]
    pub fn set_user_data(&mut self, data: usize) {
        self.user_data = Some(data);
    }

    /// User token, if set
    pub fn user_data(&self) -> Option<usize> {
        self.user_data
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Apply a full configuration.
    ///
    /// Allowed in [`State::Init`] and [`State::Idle`]. The peripheral is
    /// disabled before the control register is rewritten and is left
    /// disabled; the next transfer enables it.
    pub fn configure(&mut self, config: &PssiConfig) -> Result<()> {
        self.ensure_not_active()?;
        config.validate()?;

        self.regs.disable();
        self.regs.apply_config(config.to_cr_bits());
        self.data_width = config.data_width;
        self.state = State::Idle;

        #[cfg(feature = "defmt")]
        defmt::debug!("PSSI configured: {}", config);

        Ok(())
    }

    /// Read back the live configuration
    pub fn config(&self) -> Result<PssiConfig> {
        self.ensure_configured()?;
        Ok(PssiConfig::from_cr_bits(self.regs.control(), self.data_width))
    }

    /// Change the DE/RDY configuration. Leaves the peripheral disabled.
    pub fn set_control_signal(&mut self, signal: ControlSignal) -> Result<()> {
        self.ensure_idle()?;
        self.regs.disable();
        self.regs.set_control_signal(signal.to_bits());
        Ok(())
    }

    /// DE/RDY configuration
    pub fn control_signal(&self) -> Result<ControlSignal> {
        self.ensure_configured()?;
        Ok(ControlSignal::from_bits(self.regs.control_signal()))
    }

    /// Change the DE polarity. Leaves the peripheral disabled.
    pub fn set_data_enable_polarity(&mut self, polarity: DataEnablePolarity) -> Result<()> {
        self.ensure_idle()?;
        self.regs.disable();
        self.regs.set_data_enable_polarity(polarity.to_bits(CR_DEPOL));
        Ok(())
    }

    /// DE polarity
    pub fn data_enable_polarity(&self) -> Result<DataEnablePolarity> {
        self.ensure_configured()?;
        Ok(DataEnablePolarity::from_bits(self.regs.data_enable_polarity(), CR_DEPOL))
    }

    /// Change the RDY polarity. Leaves the peripheral disabled.
    pub fn set_ready_polarity(&mut self, polarity: ReadyPolarity) -> Result<()> {
        self.ensure_idle()?;
        self.regs.disable();
        self.regs.set_ready_polarity(polarity.to_bits(CR_RDYPOL));
        Ok(())
    }

    /// RDY polarity
    pub fn ready_polarity(&self) -> Result<ReadyPolarity> {
        self.ensure_configured()?;
        Ok(ReadyPolarity::from_bits(self.regs.ready_polarity(), CR_RDYPOL))
    }

    /// Change the clock sampling edge. Leaves the peripheral disabled.
    pub fn set_clock_polarity(&mut self, polarity: ClockPolarity) -> Result<()> {
        self.ensure_idle()?;
        self.regs.disable();
        self.regs.set_clock_polarity(polarity.to_bits());
        Ok(())
    }

    /// Clock sampling edge
    pub fn clock_polarity(&self) -> Result<ClockPolarity> {
        self.ensure_configured()?;
        Ok(ClockPolarity::from_bits(self.regs.clock_polarity()))
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// Register a callback for one event. Allowed in `Init` and `Idle`.
    pub fn register_callback(&mut self, event: Event, callback: Callback) -> Result<()> {
        self.ensure_not_active()?;
        self.callbacks.set(event, callback);
        Ok(())
    }

    /// Replace every callback at once. Allowed in `Init` and `Idle`.
    pub fn set_callbacks(&mut self, callbacks: Callbacks) -> Result<()> {
        self.ensure_not_active()?;
        self.callbacks = callbacks;
        Ok(())
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Invoke the user callback for `event`, if any
    pub(super) fn notify(&self, event: Event) {
        if let Some(callback) = self.callbacks.get(event) {
            callback(&CallbackContext {
                instance: self.instance,
                state: self.state,
                errors: self.errors,
                user_data: self.user_data,
            });
        }
    }

    /// Return to `Idle` and report `event`
    pub(super) fn finish(&mut self, event: Event) {
        self.transfer = None;
        self.state = State::Idle;
        self.notify(event);
    }

    /// Checked `Idle -> Tx|Rx` transition; clears the error record
    pub(super) fn begin(&mut self, direction: Direction) -> Result<()> {
        if self.state != State::Idle {
            return Err(Error::Busy);
        }
        self.state = direction.state();
        self.errors.clear();
        self.pending_abort = None;

        #[cfg(feature = "defmt")]
        defmt::debug!("PSSI transfer start: {}", direction);

        Ok(())
    }

    /// Length and width checks shared by every transfer entry point
    pub(super) fn check_transfer_len(&self, len: usize) -> Result<()> {
        if len == 0 {
            return Err(Error::InvalidParam);
        }
        let valid = match self.data_width {
            DataWidth::Bits8 => self.regs.bus_width() == 0,
            DataWidth::Bits16 => len % 2 == 0,
            DataWidth::Bits32 => len % 4 == 0,
        };
        if valid { Ok(()) } else { Err(Error::InvalidParam) }
    }

    fn ensure_not_active(&self) -> Result<()> {
        if self.state.is_active() {
            Err(Error::Busy)
        } else {
            Ok(())
        }
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.state == State::Init {
            Err(Error::InvalidState)
        } else {
            Ok(())
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.state {
            State::Idle => Ok(()),
            State::Init => Err(Error::InvalidState),
            _ => Err(Error::Busy),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
