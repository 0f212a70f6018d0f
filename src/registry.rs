//! Interrupt dispatch table.
//!
//! The peripheral interrupt handler only knows a channel number. Channels
//! register here once they are up and deregister before teardown; the
//! handler forwards events through [`ChannelRegistry::dispatch_threshold`]
//! and [`ChannelRegistry::dispatch_transmit_done`].

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Vec;

use crate::channel::{Channel, SharedChannel};
use crate::driver::TransmissionDriver;
use crate::source::DataSource;

/// Receiver of hardware events for one channel
pub trait InterruptTarget: Sync {
    fn on_threshold(&self);

    fn on_transmit_done(&self);
}

impl<S, D, const N: usize> InterruptTarget for SharedChannel<Channel<S, D, N>>
where
    S: DataSource + Send,
    D: TransmissionDriver + Send,
{
    fn on_threshold(&self) {
        self.with(Channel::on_threshold);
    }

    fn on_transmit_done(&self) {
        self.with(Channel::on_transmit_done);
    }
}

/// Registration failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// Channel id already registered
    Occupied(u8),
    /// No free slot
    Full,
}

/// Process-wide table of interrupt targets, keyed by channel id.
///
/// `MAX` is the number of hardware channels.
pub struct ChannelRegistry<'a, const MAX: usize> {
    entries: Mutex<RefCell<Vec<(u8, &'a dyn InterruptTarget), MAX>>>,
}

impl<'a, const MAX: usize> ChannelRegistry<'a, MAX> {
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Route events for `channel_id` to `target`
    pub fn register(
        &self,
        channel_id: u8,
        target: &'a dyn InterruptTarget,
    ) -> Result<(), RegistryError> {
        critical_section::with(|cs| {
            let mut entries = self.entries.borrow(cs).borrow_mut();
            if entries.iter().any(|(id, _)| *id == channel_id) {
                return Err(RegistryError::Occupied(channel_id));
            }
            entries
                .push((channel_id, target))
                .map_err(|_| RegistryError::Full)
        })?;
        log::debug!("[registry] channel {channel_id} registered");
        Ok(())
    }

    /// Stop routing events for `channel_id`.
    ///
    /// Returns `false` if it was not registered.
    pub fn deregister(&self, channel_id: u8) -> bool {
        let removed = critical_section::with(|cs| {
            let mut entries = self.entries.borrow(cs).borrow_mut();
            match entries.iter().position(|(id, _)| *id == channel_id) {
                Some(index) => {
                    entries.swap_remove(index);
                    true
                }
                None => false,
            }
        });
        if removed {
            log::debug!("[registry] channel {channel_id} deregistered");
        }
        removed
    }

    /// Forward a threshold event. Returns `false` for unknown channels.
    pub fn dispatch_threshold(&self, channel_id: u8) -> bool {
        self.target(channel_id)
            .map(|target| target.on_threshold())
            .is_some()
    }

    /// Forward an end-of-transmission event. Returns `false` for unknown
    /// channels.
    pub fn dispatch_transmit_done(&self, channel_id: u8) -> bool {
        self.target(channel_id)
            .map(|target| target.on_transmit_done())
            .is_some()
    }

    pub fn is_registered(&self, channel_id: u8) -> bool {
        self.target(channel_id).is_some()
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.entries.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn target(&self, channel_id: u8) -> Option<&'a dyn InterruptTarget> {
        critical_section::with(|cs| {
            self.entries
                .borrow(cs)
                .borrow()
                .iter()
                .find(|(id, _)| *id == channel_id)
                .map(|(_, target)| *target)
        })
    }
}

impl<const MAX: usize> Default for ChannelRegistry<'_, MAX> {
    fn default() -> Self {
        Self::new()
    }
}
