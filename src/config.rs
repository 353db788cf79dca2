//! # Sequencer configuration.
//!
//! Provides [`SequencerConfig`], the settings of a [`Sequencer`](crate::Sequencer).
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by [`SequencerConfig::bus_capacity_clamped`]

use std::borrow::Cow;

/// Configuration for a startup sequencer.
///
/// ## Field semantics
/// - `name`: task name reported when the sequencer itself runs as a [`Task`](crate::Task)
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct SequencerConfig {
    /// Name used by the sequencer's own [`Task`](crate::Task) implementation.
    pub name: Cow<'static, str>,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` events observe `Lagged`
    /// and skip older items.
    pub bus_capacity: usize,
}

impl SequencerConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns a config with the given sequencer name.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for SequencerConfig {
    /// Default configuration:
    ///
    /// - `name = "sequencer"`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("sequencer"),
            bus_capacity: 256,
        }
    }
}
