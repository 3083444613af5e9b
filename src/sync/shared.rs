//! ISR-safe PSSI handle wrapper.

use super::primitives::CriticalSectionCell;
use crate::driver::pssi::Pssi;

/// PSSI handle shared between thread code and interrupt handlers.
///
/// All access goes through `critical_section::with()`.
///
/// # Example
///
/// ```ignore
/// static PSSI: SharedPssi<'static, MmioRegisters, Gpdma1Ch0, SysTick> = SharedPssi::new(
///     Pssi::new(Instance::Pssi1, MmioRegisters::for_instance(Instance::Pssi1), SysTick),
/// );
///
/// #[interrupt]
/// fn PSSI() {
///     PSSI.with(|pssi| pssi.on_interrupt());
/// }
/// ```
pub struct SharedPssi<'d, R, D, T> {
    inner: CriticalSectionCell<Pssi<'d, R, D, T>>,
}

impl<'d, R, D, T> SharedPssi<'d, R, D, T> {
    /// Wrap a handle (const, suitable for static initialization)
    pub const fn new(pssi: Pssi<'d, R, D, T>) -> Self {
        Self {
            inner: CriticalSectionCell::new(pssi),
        }
    }

    /// Run `f` with exclusive access to the handle.
    #[inline]
    pub fn with<U, F>(&self, f: F) -> U
    where
        F: FnOnce(&mut Pssi<'d, R, D, T>) -> U,
    {
        self.inner.with(f)
    }

    /// Run `f` with exclusive access, or return `None` if the handle is
    /// already borrowed.
    #[inline]
    pub fn try_with<U, F>(&self, f: F) -> Option<U>
    where
        F: FnOnce(&mut Pssi<'d, R, D, T>) -> U,
    {
        self.inner.try_with(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::config::{Direction, Instance, PssiConfig, State};
    use crate::hal::dma::DmaEvent;
    use crate::test_utils::{MockDmaChannel, MockRegisters, MockTick, TestPssi, configured_pssi};

    #[test]
    fn shared_handle_is_sync_over_send_parts() {
        use crate::hal::dma::NoDma;
        use crate::internal::register::pssi::MmioRegisters;
        use crate::sync::CsBusLock;

        fn assert_sync<S: Sync>() {}
        assert_sync::<SharedPssi<'static, MmioRegisters, NoDma, MockTick>>();
        assert_sync::<CsBusLock<MockTick>>();
    }

    #[test]
    fn with_reaches_handle() {
        let regs = MockRegisters::new();
        let pssi: TestPssi<'_> = Pssi::new(Instance::Pssi1, regs.clone(), MockTick::new());
        let shared = SharedPssi::new(pssi);

        assert_eq!(shared.with(|p| p.state()), State::Init);
        shared.with(|p| p.configure(&PssiConfig::new())).unwrap();
        assert_eq!(shared.try_with(|p| p.state()), Some(State::Idle));
    }

    #[test]
    fn try_with_refuses_nested_access() {
        let regs = MockRegisters::new();
        let shared = SharedPssi::new(configured_pssi(&regs, &PssiConfig::new()));

        let nested = shared.with(|_| shared.try_with(|p| p.state()));
        assert_eq!(nested, None);
    }

    #[test]
    fn isr_style_dma_completion() {
        let data = [0u8; 8];
        let (mut channel, _probe) = MockDmaChannel::new();
        let regs = MockRegisters::new();
        let mut pssi = configured_pssi(&regs, &PssiConfig::new());
        pssi.link_tx_dma(&mut channel).unwrap();
        pssi.transmit_dma(&data).unwrap();

        let shared = SharedPssi::new(pssi);
        assert_eq!(shared.with(|p| p.state()), State::Tx);
        shared.with(|p| p.on_dma_event(Direction::Tx, DmaEvent::TransferComplete));

        assert_eq!(shared.with(|p| p.state()), State::Idle);
    }
}
