//! Clock and Time Base HAL
//!
//! [`PeripheralClock`] gates the PSSI functional clock and [`TickSource`]
//! supplies the millisecond time base used by timeouts. [`RccClock`] is the
//! STM32U5 RCC implementation of the clock gate.

use crate::driver::config::Instance;
use crate::internal::register::modify_reg;
use crate::internal::register::rcc::{AHB2ENR1_DCMI_PSSIEN, AHB2ENR1_OFFSET, RCC_BASE};

// =============================================================================
// Traits
// =============================================================================

/// Enables the functional clock of a peripheral instance.
pub trait PeripheralClock {
    /// Ungate the functional clock feeding `instance`
    fn enable_functional_clock(&mut self, instance: Instance);
}

/// Free-running millisecond counter.
///
/// The counter may wrap; elapsed time is computed with wrapping subtraction.
pub trait TickSource {
    /// Current tick in milliseconds
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `start`
    #[inline]
    fn elapsed_ms(&self, start: u32) -> u32 {
        self.now_ms().wrapping_sub(start)
    }
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

// =============================================================================
// RCC Clock Gate
// =============================================================================

/// Clock gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockState {
    /// Clock not touched by this driver
    #[default]
    Unconfigured,
    /// Clock enabled
    Enabled,
    /// Clock disabled
    Disabled,
}

/// RCC-backed clock gate for the DCMI/PSSI block
#[derive(Debug)]
pub struct RccClock {
    base: usize,
    state: ClockState,
}

impl RccClock {
    /// Clock gate at the STM32U5 RCC base address.
    ///
    /// # Safety
    ///
    /// Must only be used on an STM32U5 where this driver may modify
    /// `RCC_AHB2ENR1`.
    pub const unsafe fn stm32u5() -> Self {
        Self {
            base: RCC_BASE,
            state: ClockState::Unconfigured,
        }
    }

    /// Clock gate at an arbitrary RCC base address.
    ///
    /// # Safety
    ///
    /// `base` must point at memory laid out like the RCC register block.
    pub const unsafe fn new(base: usize) -> Self {
        Self {
            base,
            state: ClockState::Unconfigured,
        }
    }

    /// Gate the DCMI/PSSI clock off
    pub fn disable(&mut self) {
        // SAFETY: base points at an RCC block (constructor contract)
        unsafe {
            modify_reg(self.base + AHB2ENR1_OFFSET, |v| v & !AHB2ENR1_DCMI_PSSIEN);
        }
        self.state = ClockState::Disabled;
    }

    /// Check if the clock was enabled through this gate
    pub fn is_enabled(&self) -> bool {
        self.state == ClockState::Enabled
    }

    /// Get current clock state
    pub fn state(&self) -> ClockState {
        self.state
    }
}

impl PeripheralClock for RccClock {
    fn enable_functional_clock(&mut self, instance: Instance) {
        match instance {
            Instance::Pssi1 => {
                // SAFETY: base points at an RCC block (constructor contract)
                unsafe {
                    modify_reg(self.base + AHB2ENR1_OFFSET, |v| v | AHB2ENR1_DCMI_PSSIEN);
                }
            }
        }
        self.state = ClockState::Enabled;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
