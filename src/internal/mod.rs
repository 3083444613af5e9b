//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`register`]: PSSI and RCC register definitions and the access seam
//! - [`constants`]: Addresses, transfer limits and timing values
//!
//! # Stability
//!
//! **WARNING:** This module is `pub(crate)` only. The few items meant for
//! external use are re-exported from [`crate::unsafe_registers`] and
//! [`crate::constants`].

pub(crate) mod constants;
pub(crate) mod register;
