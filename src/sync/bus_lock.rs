//! Critical-section bus mutex

use super::primitives::CriticalSectionCell;
use crate::driver::error::{LockError, LockResult};
use crate::hal::bus::BusMutex;
use crate::hal::clock::TickSource;
use crate::internal::constants::WAIT_FOREVER;

/// [`BusMutex`] built on a critical-section flag.
///
/// `take` spins on the flag, polling `tick` for the timeout. `give` never
/// blocks and may be called from an interrupt handler.
///
/// # Example
///
/// ```ignore
/// static BUS: CsBusLock<SysTick> = CsBusLock::new(SysTick);
///
/// pssi.attach_bus(&BUS);
/// pssi.acquire_bus(50)?;
/// pssi.receive(&mut line, 10)?;
/// pssi.release_bus()?;
/// ```
pub struct CsBusLock<T> {
    held: CriticalSectionCell<bool>,
    tick: T,
}

impl<T> CsBusLock<T> {
    /// Create an unlocked mutex
    pub const fn new(tick: T) -> Self {
        Self {
            held: CriticalSectionCell::new(false),
            tick,
        }
    }

    /// Check if the mutex is currently held
    pub fn is_held(&self) -> bool {
        self.held.with(|held| *held)
    }

    fn try_take(&self) -> bool {
        self.held.with(|held| !core::mem::replace(held, true))
    }
}

impl<T: TickSource + Sync> BusMutex for CsBusLock<T> {
    fn take(&self, timeout_ms: u32) -> LockResult<()> {
        let start = self.tick.now_ms();
        loop {
            if self.try_take() {
                return Ok(());
            }
            if timeout_ms != WAIT_FOREVER
                && (timeout_ms == 0 || self.tick.elapsed_ms(start) > timeout_ms)
            {
                return Err(LockError::Timeout);
            }
            core::hint::spin_loop();
        }
    }

    fn give(&self) -> LockResult<()> {
        if self.held.replace(false) {
            Ok(())
        } else {
            Err(LockError::NotHeld)
        }
    }
}
