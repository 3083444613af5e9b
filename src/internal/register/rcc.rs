//! RCC Register Definitions
//!
//! Only the AHB2 clock gate feeding the DCMI/PSSI block is described here.

/// RCC register block base address (secure alias not used)
pub const RCC_BASE: usize = 0x4602_0C00;

/// AHB2 peripheral clock enable register 1
pub const AHB2ENR1_OFFSET: usize = 0x08C;

/// DCMI and PSSI shared clock enable
pub const AHB2ENR1_DCMI_PSSIEN: u32 = 1 << 12;
