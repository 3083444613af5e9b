//! Critical-section cell shared by the sync wrappers.

use core::cell::RefCell;
use critical_section::Mutex;

/// Interior-mutable cell guarded by a critical section.
///
/// Backs [`SharedPssi`](super::SharedPssi) and [`CsBusLock`](super::CsBusLock).
/// Every access runs with interrupts masked, so closures should be short.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Wrap `value` (const, suitable for statics)
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` with exclusive access.
    ///
    /// # Panics
    /// If called re-entrantly from inside another `with` on the same cell.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Run `f` with exclusive access, or return `None` if the cell is
    /// already borrowed (an ISR preempting a `with` on the same cell).
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut value = self.inner.borrow(cs).try_borrow_mut().ok()?;
            Some(f(&mut value))
        })
    }

    /// Store `value`, returning the previous one
    #[inline]
    pub fn replace(&self, value: T) -> T {
        critical_section::with(|cs| self.inner.borrow(cs).replace(value))
    }
}

// SAFETY: every access to the inner value happens inside a critical section,
// and `T: Send` lets the value be reached from whichever context enters it.
unsafe impl<T: Send> Sync for CriticalSectionCell<T> {}
