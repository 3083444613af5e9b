//! Hardware Abstraction Layer
//!
//! Traits for the collaborators the driver relies on, plus small board-level
//! helpers.
//!
//! # Modules
//!
//! - [`clock`]: Functional clock gate and millisecond tick
//! - [`dma`]: DMA channel seam
//! - [`bus`]: Bus semaphore seam
//! - [`led`]: Status LED on an `embedded_hal` output pin

pub mod bus;
pub mod clock;
pub mod dma;
pub mod led;

// Re-export commonly used types
pub use bus::BusMutex;
pub use clock::{ClockState, PeripheralClock, RccClock, TickSource};
pub use dma::{DmaChannel, DmaEvent, NoDma};
pub use led::{ActiveLevel, Led};
