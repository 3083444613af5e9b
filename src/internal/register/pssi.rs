//! PSSI Register Definitions
//!
//! Register offsets and bit fields for the STM32U5 PSSI block, the
//! [`RegisterAccess`] seam and the [`PssiRegs`] typed view the driver uses.

use super::{read_reg, reg_bit_check, reg_bit_ops, reg_field, write_reg};
use crate::driver::config::Instance;

// =============================================================================
// Register Offsets
// =============================================================================

/// Control register
pub const CR_OFFSET: usize = 0x00;
/// FIFO status register
pub const SR_OFFSET: usize = 0x04;
/// Raw interrupt status register
pub const RIS_OFFSET: usize = 0x08;
/// Interrupt enable register
pub const IER_OFFSET: usize = 0x0C;
/// Masked interrupt status register
pub const MIS_OFFSET: usize = 0x10;
/// Interrupt clear register
pub const ICR_OFFSET: usize = 0x14;
/// Data register
pub const DR_OFFSET: usize = 0x28;

// =============================================================================
// CR Register Bits
// =============================================================================

/// Clock polarity
pub const CR_CKPOL: u32 = 1 << 5;
/// Data enable (DE) polarity
pub const CR_DEPOL: u32 = 1 << 6;
/// Ready (RDY) polarity
pub const CR_RDYPOL: u32 = 1 << 8;
/// Extended data mode shift
pub const CR_EDM_SHIFT: u32 = 10;
/// Extended data mode mask (8 or 16 data lines)
pub const CR_EDM: u32 = 0x3 << CR_EDM_SHIFT;
/// Peripheral enable
pub const CR_ENABLE: u32 = 1 << 14;
/// DE/RDY configuration shift
pub const CR_DERDYCFG_SHIFT: u32 = 18;
/// DE/RDY configuration mask
pub const CR_DERDYCFG: u32 = 0x7 << CR_DERDYCFG_SHIFT;
/// DMA request enable
pub const CR_DMAEN: u32 = 1 << 30;
/// Data direction (set = transmit)
pub const CR_OUTEN: u32 = 1 << 31;

/// Every CR field written by a full configuration
pub const CR_CONFIG_MASK: u32 = 0xC01C_4D60;

// =============================================================================
// SR Register Bits
// =============================================================================

/// FIFO ready to transfer four bytes
pub const SR_RTT4B: u32 = 1 << 2;
/// FIFO ready to transfer one byte
pub const SR_RTT1B: u32 = 1 << 3;

// =============================================================================
// Interrupt Register Bits
// =============================================================================

/// Overrun/underrun raw status
pub const RIS_OVR_RIS: u32 = 1 << 1;
/// Overrun/underrun interrupt enable
pub const IER_OVR_IE: u32 = 1 << 1;
/// Overrun/underrun masked status
pub const MIS_OVR_MIS: u32 = 1 << 1;
/// Overrun/underrun flag clear
pub const ICR_OVR_ISC: u32 = 1 << 1;

// =============================================================================
// Register Access Seam
// =============================================================================

/// Width of a single data register access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccessWidth {
    /// 8-bit access
    Byte,
    /// 16-bit access
    HalfWord,
    /// 32-bit access
    Word,
}

impl AccessWidth {
    /// Number of bytes moved by one access
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            AccessWidth::Byte => 1,
            AccessWidth::HalfWord => 2,
            AccessWidth::Word => 4,
        }
    }
}

/// Raw access to one PSSI register block.
///
/// All volatile memory access performed by the driver goes through this
/// trait. [`MmioRegisters`] is the hardware implementation; tests use a mock
/// register file.
pub trait RegisterAccess {
    /// Read the 32-bit register at `offset`
    fn read(&self, offset: usize) -> u32;

    /// Write the 32-bit register at `offset`
    fn write(&self, offset: usize, value: u32);

    /// Read one unit from the data register using the given access width
    fn read_data(&self, width: AccessWidth) -> u32;

    /// Write one unit to the data register using the given access width
    fn write_data(&self, width: AccessWidth, value: u32);

    /// Bus address of the data register, as seen by the DMA controller
    fn data_register_address(&self) -> usize;
}

/// Memory-mapped PSSI register block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmioRegisters {
    base: usize,
}

impl MmioRegisters {
    /// Create a register block at an arbitrary base address.
    ///
    /// # Safety
    ///
    /// `base` must be the address of a PSSI register block, and no other
    /// code may drive that block while this value is in use.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Register block of a known PSSI instance.
    pub const fn for_instance(instance: Instance) -> Self {
        Self {
            base: instance.base_address(),
        }
    }

    /// Register block base address
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterAccess for MmioRegisters {
    #[inline(always)]
    fn read(&self, offset: usize) -> u32 {
        // SAFETY: base points at a PSSI block (constructor contract)
        unsafe { read_reg(self.base + offset) }
    }

    #[inline(always)]
    fn write(&self, offset: usize, value: u32) {
        // SAFETY: base points at a PSSI block (constructor contract)
        unsafe { write_reg(self.base + offset, value) }
    }

    #[inline(always)]
    fn read_data(&self, width: AccessWidth) -> u32 {
        let addr = self.base + DR_OFFSET;
        // SAFETY: DR supports 8/16/32-bit accesses at its base address
        unsafe {
            match width {
                AccessWidth::Byte => core::ptr::read_volatile(addr as *const u8) as u32,
                AccessWidth::HalfWord => core::ptr::read_volatile(addr as *const u16) as u32,
                AccessWidth::Word => core::ptr::read_volatile(addr as *const u32),
            }
        }
    }

    #[inline(always)]
    fn write_data(&self, width: AccessWidth, value: u32) {
        let addr = self.base + DR_OFFSET;
        // SAFETY: DR supports 8/16/32-bit accesses at its base address
        unsafe {
            match width {
                AccessWidth::Byte => core::ptr::write_volatile(addr as *mut u8, value as u8),
                AccessWidth::HalfWord => core::ptr::write_volatile(addr as *mut u16, value as u16),
                AccessWidth::Word => core::ptr::write_volatile(addr as *mut u32, value),
            }
        }
    }

    fn data_register_address(&self) -> usize {
        self.base + DR_OFFSET
    }
}

// =============================================================================
// Typed Register View
// =============================================================================

/// Named accessors over a PSSI register block.
#[derive(Debug)]
pub struct PssiRegs<R> {
    raw: R,
}

impl<R: RegisterAccess> PssiRegs<R> {
    /// Wrap a raw register block
    pub const fn new(raw: R) -> Self {
        Self { raw }
    }

    /// Access the underlying register block
    pub fn raw(&self) -> &R {
        &self.raw
    }

    #[inline(always)]
    fn read(&self, offset: usize) -> u32 {
        self.raw.read(offset)
    }

    #[inline(always)]
    fn modify<F: FnOnce(u32) -> u32>(&self, offset: usize, f: F) {
        let value = self.raw.read(offset);
        self.raw.write(offset, f(value));
    }

    #[inline(always)]
    fn set_bits(&self, offset: usize, bits: u32) {
        self.modify(offset, |v| v | bits);
    }

    #[inline(always)]
    fn clear_bits(&self, offset: usize, bits: u32) {
        self.modify(offset, |v| v & !bits);
    }

    // CR
    reg_bit_ops!(enable, disable, CR_OFFSET, CR_ENABLE, "the peripheral logic", "Enable", "Disable");
    reg_bit_ops!(
        enable_dma_request,
        disable_dma_request,
        CR_OFFSET,
        CR_DMAEN,
        "the DMA request line",
        "Enable",
        "Disable"
    );
    reg_bit_check!(is_enabled, CR_OFFSET, CR_ENABLE, "Check if the peripheral logic is enabled");
    reg_bit_check!(
        is_dma_request_enabled,
        CR_OFFSET,
        CR_DMAEN,
        "Check if the DMA request line is enabled"
    );
    reg_bit_check!(is_output, CR_OFFSET, CR_OUTEN, "Check if the data direction is transmit");

    reg_field!(control_signal, set_control_signal, CR_OFFSET, CR_DERDYCFG, "DE/RDY configuration");
    reg_field!(data_enable_polarity, set_data_enable_polarity, CR_OFFSET, CR_DEPOL, "DE polarity");
    reg_field!(ready_polarity, set_ready_polarity, CR_OFFSET, CR_RDYPOL, "RDY polarity");
    reg_field!(clock_polarity, set_clock_polarity, CR_OFFSET, CR_CKPOL, "clock polarity");
    reg_field!(bus_width, set_bus_width, CR_OFFSET, CR_EDM, "extended data mode");

    /// Read the whole control register
    #[inline]
    pub fn control(&self) -> u32 {
        self.read(CR_OFFSET)
    }

    /// Write every configuration field of CR in one access
    #[inline]
    pub fn apply_config(&self, bits: u32) {
        self.modify(CR_OFFSET, |v| (v & !CR_CONFIG_MASK) | (bits & CR_CONFIG_MASK));
    }

    /// Program data direction and DMA request in one access
    #[inline]
    pub fn set_direction(&self, output: bool, dma: bool) {
        let mut bits = 0;
        if output {
            bits |= CR_OUTEN;
        }
        if dma {
            bits |= CR_DMAEN;
        }
        self.modify(CR_OFFSET, |v| (v & !(CR_OUTEN | CR_DMAEN)) | bits);
    }

    // SR
    reg_bit_check!(fifo_ready_1b, SR_OFFSET, SR_RTT1B, "Check if the FIFO can transfer one byte");
    reg_bit_check!(fifo_ready_4b, SR_OFFSET, SR_RTT4B, "Check if the FIFO can transfer four bytes");

    // Interrupts
    reg_bit_ops!(
        enable_overrun_interrupt,
        disable_overrun_interrupt,
        IER_OFFSET,
        IER_OVR_IE,
        "the overrun/underrun interrupt",
        "Enable",
        "Disable"
    );
    reg_bit_check!(
        is_overrun_interrupt_enabled,
        IER_OFFSET,
        IER_OVR_IE,
        "Check if the overrun/underrun interrupt is enabled"
    );
    reg_bit_check!(overrun_raw, RIS_OFFSET, RIS_OVR_RIS, "Check the raw overrun/underrun flag");
    reg_bit_check!(overrun_masked, MIS_OFFSET, MIS_OVR_MIS, "Check the masked overrun/underrun flag");

    /// Read the raw interrupt status register
    #[inline]
    pub fn raw_interrupt_status(&self) -> u32 {
        self.read(RIS_OFFSET)
    }

    /// Read the masked interrupt status register
    #[inline]
    pub fn masked_interrupt_status(&self) -> u32 {
        self.read(MIS_OFFSET)
    }

    /// Clear the overrun/underrun flag (write-1-to-clear)
    #[inline]
    pub fn clear_overrun(&self) {
        self.raw.write(ICR_OFFSET, ICR_OVR_ISC);
    }

    // DR
    /// Read one unit from the FIFO
    #[inline]
    pub fn read_data(&self, width: AccessWidth) -> u32 {
        self.raw.read_data(width)
    }

    /// Write one unit to the FIFO
    #[inline]
    pub fn write_data(&self, width: AccessWidth, value: u32) {
        self.raw.write_data(width, value);
    }

    /// DMA-visible address of the data register
    #[inline]
    pub fn data_address(&self) -> usize {
        self.raw.data_register_address()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
