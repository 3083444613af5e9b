//! User callbacks
//!
//! Completion and error notifications are delivered through plain function
//! pointers. Every callback receives a [`CallbackContext`] snapshot of the
//! handle taken after it has returned to [`State::Idle`].

use super::config::{Instance, State};
use super::error::ErrorFlags;

/// Snapshot of the handle passed to a callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallbackContext {
    /// Instance raising the event
    pub instance: Instance,
    /// Handle state when the callback runs
    pub state: State,
    /// Accumulated error record
    pub errors: ErrorFlags,
    /// User data token, if set
    pub user_data: Option<usize>,
}

/// User callback signature
pub type Callback = fn(&CallbackContext);

/// Events a callback can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// DMA transmit finished
    TxComplete,
    /// DMA receive finished
    RxComplete,
    /// Transfer failed
    Error,
    /// User abort finished
    AbortComplete,
}

/// Registered user callbacks. Unset entries are no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct Callbacks {
    /// Called when a DMA transmit completes
    pub on_tx_complete: Option<Callback>,
    /// Called when a DMA receive completes
    pub on_rx_complete: Option<Callback>,
    /// Called when a transfer fails
    pub on_error: Option<Callback>,
    /// Called when an asynchronous user abort completes
    pub on_abort_complete: Option<Callback>,
}

impl Callbacks {
    /// No callbacks registered
    pub const fn new() -> Self {
        Self {
            on_tx_complete: None,
            on_rx_complete: None,
            on_error: None,
            on_abort_complete: None,
        }
    }

    /// Set the transmit-complete callback
    pub const fn with_tx_complete(mut self, cb: Callback) -> Self {
        self.on_tx_complete = Some(cb);
        self
    }

    /// Set the receive-complete callback
    pub const fn with_rx_complete(mut self, cb: Callback) -> Self {
        self.on_rx_complete = Some(cb);
        self
    }

    /// Set the error callback
    pub const fn with_error(mut self, cb: Callback) -> Self {
        self.on_error = Some(cb);
        self
    }

    /// Set the abort-complete callback
    pub const fn with_abort_complete(mut self, cb: Callback) -> Self {
        self.on_abort_complete = Some(cb);
        self
    }

    /// Replace the callback for `event`
    pub fn set(&mut self, event: Event, cb: Callback) {
        *self.slot_mut(event) = Some(cb);
    }

    /// Callback registered for `event`
    pub fn get(&self, event: Event) -> Option<Callback> {
        match event {
            Event::TxComplete => self.on_tx_complete,
            Event::RxComplete => self.on_rx_complete,
            Event::Error => self.on_error,
            Event::AbortComplete => self.on_abort_complete,
        }
    }

    fn slot_mut(&mut self, event: Event) -> &mut Option<Callback> {
        match event {
            Event::TxComplete => &mut self.on_tx_complete,
            Event::RxComplete => &mut self.on_rx_complete,
            Event::Error => &mut self.on_error,
            Event::AbortComplete => &mut self.on_abort_complete,
        }
    }
}
