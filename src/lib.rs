//! STM32U5 PSSI Driver
//!
//! A `no_std`, `no_alloc` Rust driver for the STM32U5 Parallel Synchronous
//! Slave Interface (PSSI), the 8/16-line parallel data port used for camera
//! sensors, FPGAs and other parallel data sources and sinks.
//!
//! # Architecture
//!
//! The driver is organized into three layers:
//!
//! 1. **Driver Layer** ([`driver`]): The [`Pssi`] handle with its state
//!    machine, polled and DMA transfer engines and interrupt entry points
//! 2. **HAL Layer** ([`hal`]): Traits the application implements for the
//!    functional clock, DMA channels, ticks and bus arbitration, plus small
//!    board helpers
//! 3. **Sync Layer** ([`sync`]): Critical-section wrappers for sharing the
//!    handle with interrupt handlers
//!
//! Every register access goes through [`unsafe_registers::RegisterAccess`];
//! [`unsafe_registers::MmioRegisters`] is the only place volatile memory
//! access happens.
//!
//! # Features
//!
//! - `critical-section` (default): Enable [`sync::SharedPssi`] and
//!   [`sync::CsBusLock`]
//! - `defmt`: Enable defmt formatting for public types and driver logging
//!
//! # Example
//!
//! ```ignore
//! use ph_stm32_pssi::{Pssi, PssiConfig, Instance, DataWidth, Event};
//! use ph_stm32_pssi::unsafe_registers::MmioRegisters;
//!
//! let regs = MmioRegisters::for_instance(Instance::Pssi1);
//! let mut pssi = Pssi::with_clock(Instance::Pssi1, regs, SysTick, &mut rcc);
//!
//! pssi.configure(&PssiConfig::camera_8bit())?;
//!
//! // Blocking
//! pssi.receive(&mut line, 100)?;
//!
//! // DMA, completion reported from the channel's interrupt
//! pssi.link_rx_dma(&mut gpdma_ch0)?;
//! pssi.register_callback(Event::RxComplete, frame_done)?;
//! pssi.receive_dma(&mut FRAME)?;
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::callbacks::{Callback, CallbackContext, Callbacks, Event};
pub use driver::config::{
    BusWidth, ClockPolarity, ControlSignal, DataEnablePolarity, DataWidth, Direction, Instance,
    Polarity, PssiConfig, ReadyPolarity, State,
};
pub use driver::error::{ChannelError, Error, ErrorFlags, LockError, Result};
pub use driver::interrupt::InterruptStatus;
pub use driver::pssi::{PollingPssi, Pssi};
pub use hal::dma::{DmaChannel, DmaEvent, NoDma};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{CsBusLock, SharedPssi};

/// Low-level register accessors for advanced use.
///
/// These are intentionally separated from the primary facade. Most users should
/// prefer the driver APIs instead of touching registers directly.
///
/// # Safety
///
/// Direct register access bypasses driver invariants. Use only if you fully
/// understand the PSSI hardware and accept responsibility for correct
/// sequencing and synchronization.
pub mod unsafe_registers {
    pub use crate::internal::register::pssi::{
        AccessWidth, MmioRegisters, PssiRegs, RegisterAccess,
    };
}

/// Shared driver constants.
pub mod constants {
    pub use crate::internal::constants::{MAX_CHUNK, PSSI1_BASE, WAIT_FOREVER};
}

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare a static, ISR-safe PSSI handle bound to PSSI1.
///
/// Expands to a [`SharedPssi`](crate::sync::SharedPssi) static over the
/// memory-mapped register block.
///
/// # Examples
///
/// ```ignore
/// ph_stm32_pssi::pssi_static!(PSSI, Gpdma1Channel, SysTick, SysTick::new());
///
/// PSSI.with(|pssi| pssi.configure(&PssiConfig::camera_8bit()))?;
///
/// #[interrupt]
/// fn PSSI() {
///     PSSI.with(|pssi| pssi.on_interrupt());
/// }
/// ```
#[cfg(feature = "critical-section")]
#[macro_export]
macro_rules! pssi_static {
    ($name:ident, $dma:ty, $tick:ty, $tick_init:expr) => {
        static $name: $crate::sync::SharedPssi<
            'static,
            $crate::unsafe_registers::MmioRegisters,
            $dma,
            $tick,
        > = $crate::sync::SharedPssi::new($crate::Pssi::new(
            $crate::Instance::Pssi1,
            $crate::unsafe_registers::MmioRegisters::for_instance($crate::Instance::Pssi1),
            $tick_init,
        ));
    };
}
