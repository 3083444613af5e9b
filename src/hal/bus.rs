//! Bus Arbitration HAL
//!
//! The PSSI pins may be shared with other users. [`BusMutex`] is the
//! semaphore an application attaches to the handle to arbitrate them.

use crate::driver::error::LockResult;

/// Semaphore guarding the parallel bus.
///
/// `take` may block up to `timeout_ms`; `give` must be callable from any
/// context, including interrupt handlers. Implementations are shared between
/// thread and interrupt context, hence the `Sync` bound.
pub trait BusMutex: Sync {
    /// Take the mutex, waiting at most `timeout_ms` milliseconds
    fn take(&self, timeout_ms: u32) -> LockResult<()>;

    /// Release the mutex
    fn give(&self) -> LockResult<()>;
}
