//! Memory-mapped register definitions for the STM32U5 PSSI
//!
//! This module provides type-safe access to the PSSI peripheral registers.
//! All hardware register access is volatile to ensure proper hardware
//! interaction, and all of it goes through [`pssi::RegisterAccess`] so the
//! driver can run against a mock register file on the host.

pub mod pssi;
pub mod rcc;

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

/// Modify a register using a read-modify-write operation
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn modify_reg<F>(addr: usize, f: F)
where
    F: FnOnce(u32) -> u32,
{
    // SAFETY: caller guarantees address validity
    let value = unsafe { read_reg(addr) };
    unsafe { write_reg(addr, f(value)) }
}

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate set/clear bit operation methods on a register view.
///
/// The view must provide `set_bits(offset, bits)` and `clear_bits(offset, bits)`.
///
/// # Example
/// ```ignore
/// impl<R: RegisterAccess> PssiRegs<R> {
///     reg_bit_ops!(enable, disable, CR_OFFSET, CR_ENABLE,
///                  "the peripheral logic", "Enable", "Disable");
/// }
/// ```
macro_rules! reg_bit_ops {
    ($set_fn:ident, $clear_fn:ident, $offset:expr, $bit:expr, $what:expr, $set_verb:expr, $clear_verb:expr) => {
        #[doc = concat!($set_verb, " ", $what)]
        #[inline(always)]
        pub fn $set_fn(&self) {
            self.set_bits($offset, $bit);
        }

        #[doc = concat!($clear_verb, " ", $what)]
        #[inline(always)]
        pub fn $clear_fn(&self) {
            self.clear_bits($offset, $bit);
        }
    };
}

/// Generate a bit check method (true when the bit is set).
macro_rules! reg_bit_check {
    ($fn:ident, $offset:expr, $bit:expr, $doc:expr) => {
        #[doc = $doc]
        #[inline(always)]
        pub fn $fn(&self) -> bool {
            (self.read($offset) & $bit) != 0
        }
    };
}

/// Generate a masked field getter/setter pair on a register view.
macro_rules! reg_field {
    ($get_fn:ident, $set_fn:ident, $offset:expr, $mask:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $get_fn(&self) -> u32 {
            self.read($offset) & $mask
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $set_fn(&self, value: u32) {
            self.modify($offset, |v| (v & !$mask) | (value & $mask));
        }
    };
}

pub(crate) use reg_bit_check;
pub(crate) use reg_bit_ops;
pub(crate) use reg_field;
