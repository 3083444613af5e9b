//! Testing utilities and mock implementations
//!
//! This module provides mock implementations for testing the PSSI driver
//! on the host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use crate::driver::callbacks::{CallbackContext, Callbacks, Event};
use crate::driver::config::{Instance, PssiConfig};
use crate::driver::error::{ChannelError, ChannelResult, LockError, LockResult};
use crate::driver::pssi::Pssi;
use crate::hal::bus::BusMutex;
use crate::hal::clock::{PeripheralClock, TickSource};
use crate::hal::dma::DmaChannel;
use crate::internal::register::pssi::{
    AccessWidth, CR_DMAEN, CR_ENABLE, CR_OFFSET, CR_OUTEN, DR_OFFSET, ICR_OFFSET, IER_OFFSET,
    IER_OVR_IE, MIS_OFFSET, RIS_OFFSET, RIS_OVR_RIS, RegisterAccess, SR_OFFSET, SR_RTT1B, SR_RTT4B,
};

// =============================================================================
// Mock Register File
// =============================================================================

const REG_COUNT: usize = DR_OFFSET / 4 + 1;

#[derive(Debug, Default)]
struct RegisterFile {
    regs: [u32; REG_COUNT],
    fifo_ready: bool,
    writes: usize,
    tx_log: Vec<u32>,
    rx_queue: VecDeque<u32>,
}

/// Mock PSSI register block.
///
/// Clones share the same register file, so a test keeps one clone for
/// inspection while the driver owns another.
///
/// - `SR` reports both FIFO-ready flags while [`set_fifo_ready`](Self::set_fifo_ready) is on
/// - `MIS` reads as `RIS & IER`
/// - Writing `ICR` clears the matching `RIS` bits
/// - Data register writes are logged; reads pop from a queue (0 when empty)
#[derive(Debug, Clone, Default)]
pub struct MockRegisters {
    file: Rc<RefCell<RegisterFile>>,
}

impl MockRegisters {
    /// Register file with every register zero and the FIFO not ready
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fifo_ready(&self, ready: bool) {
        self.file.borrow_mut().fifo_ready = ready;
    }

    /// Store a raw register value without counting a write
    pub fn poke(&self, offset: usize, value: u32) {
        self.file.borrow_mut().regs[offset / 4] = value;
    }

    /// Stored raw register value
    pub fn peek(&self, offset: usize) -> u32 {
        self.file.borrow().regs[offset / 4]
    }

    /// Latch the overrun/underrun flag as the hardware would
    pub fn raise_overrun(&self) {
        self.file.borrow_mut().regs[RIS_OFFSET / 4] |= RIS_OVR_RIS;
    }

    pub fn overrun_pending(&self) -> bool {
        self.peek(RIS_OFFSET) & RIS_OVR_RIS != 0
    }

    pub fn is_enabled(&self) -> bool {
        self.peek(CR_OFFSET) & CR_ENABLE != 0
    }

    pub fn is_dma_enabled(&self) -> bool {
        self.peek(CR_OFFSET) & CR_DMAEN != 0
    }

    pub fn is_output(&self) -> bool {
        self.peek(CR_OFFSET) & CR_OUTEN != 0
    }

    pub fn overrun_interrupt_enabled(&self) -> bool {
        self.peek(IER_OFFSET) & IER_OVR_IE != 0
    }

    /// Register and data writes since creation or the last reset
    pub fn write_count(&self) -> usize {
        self.file.borrow().writes
    }

    pub fn reset_write_count(&self) {
        self.file.borrow_mut().writes = 0;
    }

    /// Units written to the data register
    pub fn tx_log(&self) -> Vec<u32> {
        self.file.borrow().tx_log.clone()
    }

    /// Queue a unit for the next data register read
    pub fn push_rx(&self, value: u32) {
        self.file.borrow_mut().rx_queue.push_back(value);
    }

    pub fn data_address(&self) -> usize {
        self.data_register_address()
    }
}

fn width_mask(width: AccessWidth) -> u32 {
    match width {
        AccessWidth::Byte => 0xFF,
        AccessWidth::HalfWord => 0xFFFF,
        AccessWidth::Word => u32::MAX,
    }
}

impl RegisterAccess for MockRegisters {
    fn read(&self, offset: usize) -> u32 {
        let file = self.file.borrow();
        match offset {
            SR_OFFSET if file.fifo_ready => SR_RTT1B | SR_RTT4B,
            SR_OFFSET | ICR_OFFSET => 0,
            MIS_OFFSET => file.regs[RIS_OFFSET / 4] & file.regs[IER_OFFSET / 4],
            _ => file.regs[offset / 4],
        }
    }

    fn write(&self, offset: usize, value: u32) {
        let mut file = self.file.borrow_mut();
        file.writes += 1;
        match offset {
            ICR_OFFSET => file.regs[RIS_OFFSET / 4] &= !value,
            SR_OFFSET | RIS_OFFSET | MIS_OFFSET => {}
            _ => file.regs[offset / 4] = value,
        }
    }

    fn read_data(&self, width: AccessWidth) -> u32 {
        let value = self.file.borrow_mut().rx_queue.pop_front().unwrap_or(0);
        value & width_mask(width)
    }

    fn write_data(&self, width: AccessWidth, value: u32) {
        let mut file = self.file.borrow_mut();
        file.writes += 1;
        file.tx_log.push(value & width_mask(width));
    }

    fn data_register_address(&self) -> usize {
        0x4202_C400 + DR_OFFSET
    }
}

// =============================================================================
// Mock DMA Channel
// =============================================================================

/// One recorded `DmaChannel::start` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaStart {
    pub src: usize,
    pub dst: usize,
    pub len: usize,
}

#[derive(Debug, Default)]
struct ChannelLog {
    starts: Vec<DmaStart>,
    start_calls: usize,
    aborts: usize,
    async_aborts: usize,
    fail_start_at: Option<usize>,
    fail_abort: bool,
    fail_abort_async: bool,
}

/// Mock DMA channel. Lent to the driver while the paired [`DmaProbe`]
/// stays with the test.
#[derive(Debug)]
pub struct MockDmaChannel {
    log: Rc<RefCell<ChannelLog>>,
}

/// Test-side view of a [`MockDmaChannel`]
#[derive(Debug, Clone)]
pub struct DmaProbe {
    log: Rc<RefCell<ChannelLog>>,
}

impl MockDmaChannel {
    pub fn new() -> (Self, DmaProbe) {
        let log = Rc::new(RefCell::new(ChannelLog::default()));
        (Self { log: log.clone() }, DmaProbe { log })
    }
}

impl DmaChannel for MockDmaChannel {
    fn start(&mut self, src: usize, dst: usize, len: usize) -> ChannelResult<()> {
        let mut log = self.log.borrow_mut();
        let call = log.start_calls;
        log.start_calls += 1;
        if log.fail_start_at == Some(call) {
            return Err(ChannelError::Transfer);
        }
        log.starts.push(DmaStart { src, dst, len });
        Ok(())
    }

    fn abort(&mut self) -> ChannelResult<()> {
        let mut log = self.log.borrow_mut();
        log.aborts += 1;
        if log.fail_abort { Err(ChannelError::Timeout) } else { Ok(()) }
    }

    fn abort_async(&mut self) -> ChannelResult<()> {
        let mut log = self.log.borrow_mut();
        log.async_aborts += 1;
        if log.fail_abort_async { Err(ChannelError::Busy) } else { Ok(()) }
    }
}

impl DmaProbe {
    /// Successful `start` calls, in order
    pub fn starts(&self) -> Vec<DmaStart> {
        self.log.borrow().starts.clone()
    }

    pub fn start_lengths(&self) -> Vec<usize> {
        self.log.borrow().starts.iter().map(|s| s.len).collect()
    }

    pub fn aborts(&self) -> usize {
        self.log.borrow().aborts
    }

    pub fn async_aborts(&self) -> usize {
        self.log.borrow().async_aborts
    }

    /// Fail the `n`th `start` call (zero based)
    pub fn fail_start_at(&self, n: usize) {
        self.log.borrow_mut().fail_start_at = Some(n);
    }

    pub fn fail_abort(&self) {
        self.log.borrow_mut().fail_abort = true;
    }

    pub fn fail_abort_async(&self) {
        self.log.borrow_mut().fail_abort_async = true;
    }
}

// =============================================================================
// Mock Tick, Clock, Bus Mutex, Pin
// =============================================================================

/// Millisecond tick advancing by `step` on every read
#[derive(Debug)]
pub struct MockTick {
    now: AtomicU32,
    step: u32,
}

impl MockTick {
    /// Starts at 0, advancing 1 ms per read
    pub fn new() -> Self {
        Self::starting_at(0, 1)
    }

    pub fn starting_at(start: u32, step: u32) -> Self {
        Self {
            now: AtomicU32::new(start),
            step,
        }
    }

    pub fn set(&self, value: u32) {
        self.now.store(value, Ordering::Relaxed);
    }
}

impl TickSource for MockTick {
    fn now_ms(&self) -> u32 {
        self.now.fetch_add(self.step, Ordering::Relaxed)
    }
}

/// Records every instance whose clock was enabled
#[derive(Debug, Default)]
pub struct MockClock {
    enabled: Vec<Instance>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(&self) -> Vec<Instance> {
        self.enabled.clone()
    }
}

impl PeripheralClock for MockClock {
    fn enable_functional_clock(&mut self, instance: Instance) {
        self.enabled.push(instance);
    }
}

/// Non-blocking bus mutex: `take` fails immediately when held
#[derive(Debug, Default)]
pub struct MockBusMutex {
    held: AtomicBool,
}

impl MockBusMutex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Relaxed)
    }
}

impl BusMutex for MockBusMutex {
    fn take(&self, _timeout_ms: u32) -> LockResult<()> {
        if self.held.swap(true, Ordering::Relaxed) {
            Err(LockError::Timeout)
        } else {
            Ok(())
        }
    }

    fn give(&self) -> LockResult<()> {
        if self.held.swap(false, Ordering::Relaxed) {
            Ok(())
        } else {
            Err(LockError::NotHeld)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl embedded_hal::digital::Error for MockPinError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// Output pin recording its level, with one-shot failure injection
#[derive(Debug, Default)]
pub struct MockPin {
    high: bool,
    fail: bool,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    /// Make the next level change fail
    pub fn fail_next(&mut self) {
        self.fail = true;
    }

    fn drive(&mut self, high: bool) -> Result<(), MockPinError> {
        if core::mem::take(&mut self.fail) {
            return Err(MockPinError);
        }
        self.high = high;
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = MockPinError;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

// =============================================================================
// Callback Recorder
// =============================================================================

/// One callback invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedEvent {
    pub event: Event,
    pub context: CallbackContext,
}

std::thread_local! {
    static EVENTS: RefCell<Vec<RecordedEvent>> = const { RefCell::new(Vec::new()) };
}

fn record(event: Event, context: &CallbackContext) {
    EVENTS.with(|events| {
        events.borrow_mut().push(RecordedEvent {
            event,
            context: *context,
        });
    });
}

fn on_tx_complete(ctx: &CallbackContext) {
    record(Event::TxComplete, ctx);
}

fn on_rx_complete(ctx: &CallbackContext) {
    record(Event::RxComplete, ctx);
}

fn on_error(ctx: &CallbackContext) {
    record(Event::Error, ctx);
}

fn on_abort_complete(ctx: &CallbackContext) {
    record(Event::AbortComplete, ctx);
}

/// Callbacks that append to this thread's event log
pub fn recording_callbacks() -> Callbacks {
    Callbacks::new()
        .with_tx_complete(on_tx_complete)
        .with_rx_complete(on_rx_complete)
        .with_error(on_error)
        .with_abort_complete(on_abort_complete)
}

/// Events recorded on this thread
pub fn recorded_events() -> Vec<RecordedEvent> {
    EVENTS.with(|events| events.borrow().clone())
}

pub fn clear_events() {
    EVENTS.with(|events| events.borrow_mut().clear());
}

// =============================================================================
// Driver Fixtures
// =============================================================================

/// Driver wired to the mocks
pub type TestPssi<'d> = Pssi<'d, MockRegisters, MockDmaChannel, MockTick>;

/// Configured handle sharing `regs` with the caller
pub fn configured_pssi<'d>(regs: &MockRegisters, config: &PssiConfig) -> TestPssi<'d> {
    let mut pssi = Pssi::new(Instance::Pssi1, regs.clone(), MockTick::new());
    pssi.configure(config).expect("test configuration must be valid");
    pssi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_registers_model_status_registers() {
        let regs = MockRegisters::new();
        assert_eq!(regs.read(SR_OFFSET), 0);
        regs.set_fifo_ready(true);
        assert_eq!(regs.read(SR_OFFSET), SR_RTT1B | SR_RTT4B);

        regs.raise_overrun();
        assert_eq!(regs.read(MIS_OFFSET), 0);
        regs.write(IER_OFFSET, IER_OVR_IE);
        assert_eq!(regs.read(MIS_OFFSET), RIS_OVR_RIS);

        regs.write(ICR_OFFSET, RIS_OVR_RIS);
        assert!(!regs.overrun_pending());
        assert_eq!(regs.write_count(), 2);
    }

    #[test]
    fn mock_registers_data_path() {
        let regs = MockRegisters::new();
        regs.push_rx(0x1234_5678);
        assert_eq!(regs.read_data(AccessWidth::HalfWord), 0x5678);
        assert_eq!(regs.read_data(AccessWidth::Word), 0);

        regs.write_data(AccessWidth::Byte, 0x1FF);
        assert_eq!(regs.tx_log(), [0xFF]);

        regs.reset_write_count();
        assert_eq!(regs.write_count(), 0);
    }

    #[test]
    fn mock_dma_channel_failure_injection() {
        let (mut channel, probe) = MockDmaChannel::new();
        probe.fail_start_at(1);

        assert!(channel.start(1, 2, 3).is_ok());
        assert_eq!(channel.start(4, 5, 6), Err(ChannelError::Transfer));
        assert!(channel.start(7, 8, 9).is_ok());
        assert_eq!(probe.start_lengths(), [3, 9]);
    }

    #[test]
    fn mock_tick_advances() {
        let tick = MockTick::new();
        assert_eq!(tick.now_ms(), 0);
        assert_eq!(tick.now_ms(), 1);
        tick.set(10);
        assert_eq!(tick.now_ms(), 10);
    }

    #[test]
    fn recorder_is_cleared() {
        clear_events();
        on_error(&CallbackContext {
            instance: Instance::Pssi1,
            state: crate::driver::config::State::Idle,
            errors: crate::driver::error::ErrorFlags::NONE,
            user_data: None,
        });
        assert_eq!(recorded_events().len(), 1);
        clear_events();
        assert!(recorded_events().is_empty());
    }
}
