//! Synchronization Support
//!
//! Critical-section based wrappers for sharing the driver with interrupt
//! handlers:
//!
//! - [`CriticalSectionCell`] - ISR-safe interior mutability
//! - [`SharedPssi`] - the PSSI handle behind a critical section
//! - [`CsBusLock`] - a [`BusMutex`](crate::hal::bus::BusMutex) for
//!   [`Pssi::attach_bus`](crate::driver::pssi::Pssi::attach_bus)
//!
//! # Feature Flags
//!
//! - `critical-section` (default): enables this module. The critical-section
//!   implementation itself comes from the HAL or runtime crate.
//!
//! # Example
//!
//! ```ignore
//! static PSSI: SharedPssi<'static, MmioRegisters, Gpdma1Ch0, SysTick> = SharedPssi::new(
//!     Pssi::new(Instance::Pssi1, MmioRegisters::for_instance(Instance::Pssi1), SysTick),
//! );
//!
//! #[interrupt]
//! fn GPDMA1_CH0() {
//!     PSSI.with(|pssi| pssi.on_dma_event(Direction::Rx, DmaEvent::TransferComplete));
//! }
//! ```

mod bus_lock;
mod primitives;
mod shared;

pub use bus_lock::CsBusLock;
pub use primitives::CriticalSectionCell;
pub use shared::SharedPssi;
