//! Startup sequencing: run bootstrap tasks in place, then register the rest.
//!
//! - [`activation`]: the [`Sequencer`] and its activation flow;
//! - [`builder`]: fluent construction via [`SequencerBuilder`].

mod activation;
mod builder;

pub use activation::Sequencer;
pub use builder::SequencerBuilder;
