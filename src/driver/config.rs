//! Configuration types for the STM32U5 PSSI driver

use crate::driver::error::{Error, Result};
use crate::internal::constants::PSSI1_BASE;
use crate::internal::register::pssi::{
    AccessWidth, CR_CKPOL, CR_DEPOL, CR_DERDYCFG, CR_DERDYCFG_SHIFT, CR_EDM, CR_RDYPOL,
};

/// PSSI peripheral instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Instance {
    /// PSSI1
    #[default]
    Pssi1,
}

impl Instance {
    /// Register block base address
    pub const fn base_address(self) -> usize {
        match self {
            Instance::Pssi1 => PSSI1_BASE,
        }
    }
}

/// Width of one data unit moved through the FIFO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataWidth {
    /// 8 bits
    #[default]
    Bits8,
    /// 16 bits
    Bits16,
    /// 32 bits
    Bits32,
}

impl DataWidth {
    /// Bytes per data unit
    pub const fn bytes(self) -> usize {
        self.access_width().bytes()
    }

    /// Data register access width used for this unit size
    pub const fn access_width(self) -> AccessWidth {
        match self {
            DataWidth::Bits8 => AccessWidth::Byte,
            DataWidth::Bits16 => AccessWidth::HalfWord,
            DataWidth::Bits32 => AccessWidth::Word,
        }
    }
}

/// Number of parallel data lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusWidth {
    /// 8 data lines
    #[default]
    Lines8,
    /// 16 data lines
    Lines16,
}

impl BusWidth {
    /// CR field value
    pub const fn to_bits(self) -> u32 {
        match self {
            BusWidth::Lines8 => 0,
            BusWidth::Lines16 => CR_EDM,
        }
    }

    /// Decode from a CR value
    pub const fn from_bits(cr: u32) -> Self {
        if (cr & CR_EDM) == CR_EDM {
            BusWidth::Lines16
        } else {
            BusWidth::Lines8
        }
    }
}

/// DE/RDY control signal configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ControlSignal {
    /// Neither DE nor RDY enabled
    #[default]
    DeRdyDisable = 0,
    /// Only RDY enabled
    RdyEnable = 1,
    /// Only DE enabled
    DeEnable = 2,
    /// Both RDY and DE alternate functions enabled
    DeRdyAltEnable = 3,
    /// Bidirectional on the RDY pin
    MapRdyBidirEnable = 4,
    /// Only RDY enabled, mapped to the DE pin
    RdyMapEnable = 5,
    /// Only DE enabled, mapped to the RDY pin
    DeMapEnable = 6,
    /// Bidirectional on the DE pin
    MapDeBidirEnable = 7,
}

impl ControlSignal {
    /// CR field value
    pub const fn to_bits(self) -> u32 {
        (self as u32) << CR_DERDYCFG_SHIFT
    }

    /// Decode from a CR value
    pub const fn from_bits(cr: u32) -> Self {
        match (cr & CR_DERDYCFG) >> CR_DERDYCFG_SHIFT {
            0 => ControlSignal::DeRdyDisable,
            1 => ControlSignal::RdyEnable,
            2 => ControlSignal::DeEnable,
            3 => ControlSignal::DeRdyAltEnable,
            4 => ControlSignal::MapRdyBidirEnable,
            5 => ControlSignal::RdyMapEnable,
            6 => ControlSignal::DeMapEnable,
            _ => ControlSignal::MapDeBidirEnable,
        }
    }
}

/// Signal polarity for DE and RDY
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Active low
    #[default]
    ActiveLow,
    /// Active high
    ActiveHigh,
}

impl Polarity {
    /// CR field value for the polarity bit `bit`
    pub const fn to_bits(self, bit: u32) -> u32 {
        match self {
            Polarity::ActiveLow => 0,
            Polarity::ActiveHigh => bit,
        }
    }

    /// Decode the polarity bit `bit` from a CR value
    pub const fn from_bits(cr: u32, bit: u32) -> Self {
        if (cr & bit) != 0 {
            Polarity::ActiveHigh
        } else {
            Polarity::ActiveLow
        }
    }
}

/// Data enable (DE) polarity
pub type DataEnablePolarity = Polarity;

/// Ready (RDY) polarity
pub type ReadyPolarity = Polarity;

/// Sampling edge of the parallel clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockPolarity {
    /// Falling edge for receive, rising edge for transmit
    #[default]
    RxFallingTxRising,
    /// Rising edge for receive, falling edge for transmit
    RxRisingTxFalling,
}

impl ClockPolarity {
    /// CR field value
    pub const fn to_bits(self) -> u32 {
        match self {
            ClockPolarity::RxFallingTxRising => 0,
            ClockPolarity::RxRisingTxFalling => CR_CKPOL,
        }
    }

    /// Decode from a CR value
    pub const fn from_bits(cr: u32) -> Self {
        if (cr & CR_CKPOL) != 0 {
            ClockPolarity::RxRisingTxFalling
        } else {
            ClockPolarity::RxFallingTxRising
        }
    }
}

/// PSSI configuration
///
/// Use the builder pattern to customize:
///
/// ```ignore
/// let config = PssiConfig::new()
///     .with_control_signal(ControlSignal::DeEnable)
///     .with_data_width(DataWidth::Bits16)
///     .with_bus_width(BusWidth::Lines16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PssiConfig {
    /// DE/RDY control signal configuration
    pub control_signal: ControlSignal,
    /// Data enable polarity
    pub data_enable_polarity: DataEnablePolarity,
    /// Ready polarity
    pub ready_polarity: ReadyPolarity,
    /// Clock sampling edge
    pub clock_polarity: ClockPolarity,
    /// Number of data lines
    pub bus_width: BusWidth,
    /// Width of one data unit
    pub data_width: DataWidth,
}

impl Default for PssiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PssiConfig {
    /// Create a configuration with every field at its reset value
    pub const fn new() -> Self {
        Self {
            control_signal: ControlSignal::DeRdyDisable,
            data_enable_polarity: Polarity::ActiveLow,
            ready_polarity: Polarity::ActiveLow,
            clock_polarity: ClockPolarity::RxFallingTxRising,
            bus_width: BusWidth::Lines8,
            data_width: DataWidth::Bits8,
        }
    }

    /// Common 8-bit camera-style receiver: DE active high, sampled on the rising edge
    pub const fn camera_8bit() -> Self {
        Self::new()
            .with_control_signal(ControlSignal::DeEnable)
            .with_data_enable_polarity(Polarity::ActiveHigh)
            .with_clock_polarity(ClockPolarity::RxRisingTxFalling)
    }

    /// Set the DE/RDY control signal configuration
    pub const fn with_control_signal(mut self, signal: ControlSignal) -> Self {
        self.control_signal = signal;
        self
    }

    /// Set the data enable polarity
    pub const fn with_data_enable_polarity(mut self, polarity: DataEnablePolarity) -> Self {
        self.data_enable_polarity = polarity;
        self
    }

    /// Set the ready polarity
    pub const fn with_ready_polarity(mut self, polarity: ReadyPolarity) -> Self {
        self.ready_polarity = polarity;
        self
    }

    /// Set the clock sampling edge
    pub const fn with_clock_polarity(mut self, polarity: ClockPolarity) -> Self {
        self.clock_polarity = polarity;
        self
    }

    /// Set the number of data lines
    pub const fn with_bus_width(mut self, width: BusWidth) -> Self {
        self.bus_width = width;
        self
    }

    /// Set the data unit width
    pub const fn with_data_width(mut self, width: DataWidth) -> Self {
        self.data_width = width;
        self
    }

    /// Check the bus/data width combination.
    ///
    /// 8-bit data cannot be carried on a 16-line bus.
    pub const fn validate(&self) -> Result<()> {
        match (self.data_width, self.bus_width) {
            (DataWidth::Bits8, BusWidth::Lines16) => Err(Error::InvalidParam),
            _ => Ok(()),
        }
    }

    /// CR bits for every field carried by the control register
    pub const fn to_cr_bits(&self) -> u32 {
        self.control_signal.to_bits()
            | self.data_enable_polarity.to_bits(CR_DEPOL)
            | self.ready_polarity.to_bits(CR_RDYPOL)
            | self.clock_polarity.to_bits()
            | self.bus_width.to_bits()
    }

    /// Rebuild a configuration from a CR value and the stored data width
    pub const fn from_cr_bits(cr: u32, data_width: DataWidth) -> Self {
        Self {
            control_signal: ControlSignal::from_bits(cr),
            data_enable_polarity: Polarity::from_bits(cr, CR_DEPOL),
            ready_polarity: Polarity::from_bits(cr, CR_RDYPOL),
            clock_polarity: ClockPolarity::from_bits(cr),
            bus_width: BusWidth::from_bits(cr),
            data_width,
        }
    }
}

/// Driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Handle created, not yet configured
    #[default]
    Init,
    /// Configured and ready for a transfer
    Idle,
    /// Transmit in progress
    Tx,
    /// Receive in progress
    Rx,
    /// Abort in progress
    Abort,
}

impl State {
    /// True while a transfer or abort owns the peripheral
    pub const fn is_active(self) -> bool {
        matches!(self, State::Tx | State::Rx | State::Abort)
    }
}

/// Transfer direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Memory to peripheral
    Tx,
    /// Peripheral to memory
    Rx,
}

impl Direction {
    /// State entered while a transfer in this direction runs
    pub const fn state(self) -> State {
        match self {
            Direction::Tx => State::Tx,
            Direction::Rx => State::Rx,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = PssiConfig::new();

        assert_eq!(config.control_signal, ControlSignal::DeRdyDisable);
        assert_eq!(config.data_enable_polarity, Polarity::ActiveLow);
        assert_eq!(config.ready_polarity, Polarity::ActiveLow);
        assert_eq!(config.clock_polarity, ClockPolarity::RxFallingTxRising);
        assert_eq!(config.bus_width, BusWidth::Lines8);
        assert_eq!(config.data_width, DataWidth::Bits8);
        assert_eq!(config.to_cr_bits(), 0);
    }

    #[test]
    fn config_default_trait_matches_new() {
        assert_eq!(PssiConfig::default(), PssiConfig::new());
    }

    #[test]
    fn config_builder_chaining() {
        let config = PssiConfig::new()
            .with_control_signal(ControlSignal::DeRdyAltEnable)
            .with_ready_polarity(Polarity::ActiveHigh)
            .with_bus_width(BusWidth::Lines16)
            .with_data_width(DataWidth::Bits32);

        assert_eq!(config.control_signal, ControlSignal::DeRdyAltEnable);
        assert_eq!(config.ready_polarity, Polarity::ActiveHigh);
        assert_eq!(config.bus_width, BusWidth::Lines16);
        assert_eq!(config.data_width, DataWidth::Bits32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn camera_preset() {
        let config = PssiConfig::camera_8bit();

        assert_eq!(config.control_signal, ControlSignal::DeEnable);
        assert_eq!(config.data_enable_polarity, Polarity::ActiveHigh);
        assert_eq!(config.clock_polarity, ClockPolarity::RxRisingTxFalling);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_8bit_on_16_lines() {
        let config = PssiConfig::new().with_bus_width(BusWidth::Lines16);
        assert_eq!(config.validate(), Err(Error::InvalidParam));
    }

    #[test]
    fn validate_accepts_wide_data_on_8_lines() {
        let config = PssiConfig::new().with_data_width(DataWidth::Bits32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cr_bits_round_trip_all_control_signals() {
        let signals = [
            ControlSignal::DeRdyDisable,
            ControlSignal::RdyEnable,
            ControlSignal::DeEnable,
            ControlSignal::DeRdyAltEnable,
            ControlSignal::MapRdyBidirEnable,
            ControlSignal::RdyMapEnable,
            ControlSignal::DeMapEnable,
            ControlSignal::MapDeBidirEnable,
        ];

        for signal in signals {
            assert_eq!(ControlSignal::from_bits(signal.to_bits()), signal);
        }
    }

    #[test]
    fn cr_bits_match_register_layout() {
        let config = PssiConfig::new()
            .with_control_signal(ControlSignal::RdyEnable)
            .with_data_enable_polarity(Polarity::ActiveHigh)
            .with_ready_polarity(Polarity::ActiveHigh)
            .with_clock_polarity(ClockPolarity::RxRisingTxFalling)
            .with_bus_width(BusWidth::Lines16)
            .with_data_width(DataWidth::Bits16);

        let bits = config.to_cr_bits();
        assert_eq!(bits, (1 << 18) | CR_DEPOL | CR_RDYPOL | CR_CKPOL | CR_EDM);
        assert_eq!(PssiConfig::from_cr_bits(bits, DataWidth::Bits16), config);
    }

    #[test]
    fn data_width_bytes() {
        assert_eq!(DataWidth::Bits8.bytes(), 1);
        assert_eq!(DataWidth::Bits16.bytes(), 2);
        assert_eq!(DataWidth::Bits32.bytes(), 4);
    }

    #[test]
    fn state_default() {
        assert_eq!(State::default(), State::Init);
    }

    #[test]
    fn state_is_active() {
        assert!(!State::Init.is_active());
        assert!(!State::Idle.is_active());
        assert!(State::Tx.is_active());
        assert!(State::Rx.is_active());
        assert!(State::Abort.is_active());
    }

    #[test]
    fn direction_state() {
        assert_eq!(Direction::Tx.state(), State::Tx);
        assert_eq!(Direction::Rx.state(), State::Rx);
    }

    #[test]
    fn instance_base_address() {
        assert_eq!(Instance::Pssi1.base_address(), 0x4202_C400);
    }
}
