//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and (with the `logging` feature) the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Sequencer::activate ── publish(Event) ──► Bus ──► Sequencer::subscribe() receivers
//!                     │                               (lossy: slow receivers lag and skip)
//!                     └─ deliver(&Event).await ──► SubscriberSet
//!                                                    (lossless: waits for room)
//!                                              ├──► [lane S1] ─► worker ─► S1.on_event()
//!                                              └──► [lane SN] ─► worker ─► SN.on_event()
//! ```
//!
//! Use a [`Subscribe`] implementation when every event matters (audit, logs);
//! a bus receiver is enough for best-effort observation.

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
