//! Sequencing events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted while a [`Sequencer`](crate::Sequencer) activates.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: `Sequencer::activate`.
//! - **Consumers**: receivers from [`Sequencer::subscribe`](crate::Sequencer::subscribe)
//!   and the [`SubscriberSet`](crate::SubscriberSet) built from configured subscribers.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
