//! Error types for the STM32U5 PSSI driver
//!
//! Errors are organized by domain:
//! - [`Error`]: returned by every driver operation
//! - [`ChannelError`]: reported by a [`DmaChannel`](crate::hal::dma::DmaChannel)
//! - [`LockError`]: reported by a [`BusMutex`](crate::hal::bus::BusMutex)
//!
//! [`ErrorFlags`] is the accumulating record of transfer failures exposed by
//! [`Pssi::last_errors`](crate::driver::pssi::Pssi::last_errors).

// =============================================================================
// Driver Errors
// =============================================================================

/// Driver operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Invalid argument or configuration combination
    InvalidParam,
    /// Operation not allowed in the current state
    InvalidState,
    /// A transfer is already running, or the bus could not be taken
    Busy,
    /// FIFO did not become ready in time
    Timeout,
    /// Transmit FIFO underrun
    Underrun,
    /// Receive FIFO overrun
    Overrun,
    /// DMA channel failure
    Dma,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Error::InvalidParam => "invalid parameter",
            Error::InvalidState => "invalid state for operation",
            Error::Busy => "peripheral busy",
            Error::Timeout => "operation timed out",
            Error::Underrun => "transmit FIFO underrun",
            Error::Overrun => "receive FIFO overrun",
            Error::Dma => "DMA channel error",
        }
    }
}

// =============================================================================
// DMA Channel Errors
// =============================================================================

/// Errors reported by a DMA channel implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// Channel is already running a transfer
    Busy,
    /// Channel rejected the addresses or length
    InvalidTransfer,
    /// Channel did not stop in time
    Timeout,
    /// Bus error raised by the channel
    Transfer,
}

impl core::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ChannelError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChannelError::Busy => "channel busy",
            ChannelError::InvalidTransfer => "invalid transfer",
            ChannelError::Timeout => "channel timeout",
            ChannelError::Transfer => "channel bus error",
        }
    }
}

// =============================================================================
// Bus Lock Errors
// =============================================================================

/// Errors reported by a bus mutex implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockError {
    /// Mutex could not be taken before the timeout expired
    Timeout,
    /// Mutex released while not held
    NotHeld,
}

impl core::fmt::Display for LockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LockError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LockError::Timeout => "lock timeout",
            LockError::NotHeld => "lock not held",
        }
    }
}

// From impls for automatic conversion
impl From<ChannelError> for Error {
    fn from(_: ChannelError) -> Self {
        Error::Dma
    }
}

impl From<LockError> for Error {
    fn from(e: LockError) -> Self {
        match e {
            LockError::Timeout => Error::Busy,
            LockError::NotHeld => Error::InvalidState,
        }
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for DMA channel operations
pub type ChannelResult<T> = core::result::Result<T, ChannelError>;

/// Result type alias for bus mutex operations
pub type LockResult<T> = core::result::Result<T, LockError>;

// =============================================================================
// Error Record
// =============================================================================

/// Accumulated transfer error bits.
///
/// Cleared when a transfer starts and OR'd into by the abort and error paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ErrorFlags(u32);

impl ErrorFlags {
    /// No error recorded
    pub const NONE: Self = Self(0);
    /// Transmit FIFO underrun
    pub const UNDERRUN: Self = Self(1 << 2);
    /// Receive FIFO overrun
    pub const OVERRUN: Self = Self(1 << 3);
    /// DMA channel failure
    pub const DMA: Self = Self(1 << 4);

    /// Create from a raw bit value (unknown bits are dropped)
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & (Self::UNDERRUN.0 | Self::OVERRUN.0 | Self::DMA.0))
    }

    /// Raw bit value
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if no error bit is set
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Record the bits of `other`
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Forget every recorded error
    #[inline]
    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

impl core::ops::BitOr for ErrorFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for ErrorFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
