//! Core driver components for the STM32U5 PSSI peripheral.
//!
//! The [`Pssi`] handle is defined in [`pssi`]; its operations are spread over
//! sibling modules:
//!
//! - [`config`] - Configuration types, state machine and builders
//! - [`error`] - Error types, result aliases and the error record
//! - [`callbacks`] - User completion and error callbacks
//! - [`polling`] - Blocking CPU-driven transfers
//! - [`dma`] - Chunked DMA transfers and aborts
//! - [`interrupt`] - PSSI and DMA interrupt entry points
//! - [`arbiter`] - Advisory bus mutex
//!
//! # Example
//!
//! ```ignore
//! use ph_stm32_pssi::driver::{Pssi, PssiConfig, DataWidth};
//!
//! let config = PssiConfig::camera_8bit().with_data_width(DataWidth::Bits8);
//! pssi.configure(&config)?;
//! ```

// Submodules
pub mod arbiter;
pub mod callbacks;
pub mod config;
pub mod dma;
pub mod error;
pub mod interrupt;
pub mod polling;
pub mod pssi;

// Re-exports for convenience
pub use callbacks::{Callback, CallbackContext, Callbacks, Event};
pub use config::{
    BusWidth, ClockPolarity, ControlSignal, DataEnablePolarity, DataWidth, Direction, Instance,
    Polarity, PssiConfig, ReadyPolarity, State,
};
pub use dma::AbortReason;
pub use error::{
    ChannelError, ChannelResult, Error, ErrorFlags, LockError, LockResult, Result,
};
pub use interrupt::InterruptStatus;
pub use pssi::{PollingPssi, Pssi};
