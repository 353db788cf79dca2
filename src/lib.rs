//! # bootvisor
//!
//! **bootvisor** sequences the startup of a process that hosts several
//! background tasks under a supervisor.
//!
//! Some tasks must finish a bootstrap phase (warm caches, run migrations, wait
//! for a dependency) **before** the long-running tasks are handed to the
//! supervisor. A [`Sequencer`] runs the bootstrap tasks one at a time, in the
//! order given, and only when all of them succeeded registers the steady-state
//! tasks, again in order, through the supervisor's [`Register`] capability.
//!
//! ## Architecture
//! ```text
//!   bootstrap: [A, B, ...]        steady-state: [C, D, ...]
//!          │                               │
//!          ▼                               ▼
//!   Sequencer::activate(ctx)
//!     1. A.run(ctx).await ─► B.run(ctx).await ─► ...
//!          sequential; first error ─► SequenceError::Bootstrap
//!     2. register_all(registrar, [C, D, ...])
//!          in order; first refusal ─► SequenceError::Registration
//!          (earlier registrations are kept)
//!          │                               │
//!          │ publish(Event)                │ register(task)
//!          ▼                               ▼
//!   Bus / SubscriberSet             external supervisor
//!   (receivers, LogWriter, ...)     (runs C, D, ... itself)
//! ```
//!
//! The sequencer is itself a [`Task`], so the usual wiring is to register it
//! with the supervisor whose start protocol then activates it once.
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                      |
//! |-------------------|----------------------------------------------------------|-----------------------------------------|
//! | **Sequencing**    | Bootstrap-then-register startup ordering.                | [`Sequencer`], [`SequencerBuilder`]     |
//! | **Registration**  | Ordered, stop-at-first-failure registration.             | [`Register`], [`register_all`]          |
//! | **Tasks**         | Async cancelable units, closure-backed helper.           | [`Task`], [`TaskFn`], [`TaskRef`]       |
//! | **Errors**        | Typed errors keeping the original cause.                 | [`SequenceError`], [`TaskError`], [`RegistrationError`] |
//! | **Events**        | Per-step events over a broadcast bus and subscribers.   | [`Event`], [`EventKind`], [`Subscribe`] |
//! | **Configuration** | Sequencer name and bus capacity.                         | [`SequencerConfig`]                     |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use tokio_util::sync::CancellationToken;
//! use bootvisor::{Register, RegistrationError, Sequencer, TaskError, TaskFn, TaskRef};
//!
//! #[derive(Default)]
//! struct Supervisor(Mutex<Vec<TaskRef>>);
//!
//! impl Register for Supervisor {
//!     fn register(&self, task: TaskRef) -> Result<(), RegistrationError> {
//!         self.0.lock().map_err(|_| RegistrationError::Closed)?.push(task);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sup = Arc::new(Supervisor::default());
//!
//!     let migrate: TaskRef = TaskFn::arc("migrate", |_ctx: CancellationToken| async {
//!         Err::<(), _>(TaskError::Fail { error: "disk unavailable".into() })
//!     });
//!     let worker: TaskRef = TaskFn::arc("worker", |_ctx: CancellationToken| async {
//!         Ok::<_, TaskError>(())
//!     });
//!
//!     let seq = Sequencer::builder(sup.clone())
//!         .bootstrap(migrate)
//!         .steady(worker)
//!         .build();
//!
//!     let err = seq.activate(CancellationToken::new()).await.unwrap_err();
//!     assert!(err.is_bootstrap());
//!     assert!(sup.0.lock().unwrap().is_empty());
//!     Ok(())
//! }
//! ```
mod config;
mod error;
mod events;
mod registrar;
mod sequencer;
mod subscribers;
mod tasks;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use config::SequencerConfig;
pub use error::{RegistrationError, SequenceError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use registrar::{Register, register_all};
pub use sequencer::{Sequencer, SequencerBuilder};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{Task, TaskFn, TaskRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
