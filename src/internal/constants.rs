//! Driver constants
//!
//! Addresses, limits and timing values shared across the driver.

// =============================================================================
// Peripheral Addresses
// =============================================================================

/// PSSI1 register block base address
pub const PSSI1_BASE: usize = 0x4202_C400;

// =============================================================================
// Transfer Limits
// =============================================================================

/// Largest number of bytes handed to the DMA channel in a single chunk.
///
/// Multiple of four so every chunk stays word aligned for 32-bit transfers.
pub const MAX_CHUNK: usize = 0xFFFC;

// =============================================================================
// Timing
// =============================================================================

/// Timeout value meaning "wait indefinitely"
pub const WAIT_FOREVER: u32 = u32::MAX;
