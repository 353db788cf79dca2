//! # Events emitted while a startup sequence runs.
//!
//! The [`EventKind`] enum classifies events across two phases:
//! - **Bootstrap events**: a bootstrap task is started, completes or fails
//! - **Registration events**: a steady-state task is registered or refused
//!
//! plus [`EventKind::SequenceCompleted`] once every task has been handled.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use bootvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::BootstrapFailed)
//!     .with_task("warm-cache")
//!     .with_position(1, 3)
//!     .with_reason("disk unavailable");
//!
//! assert_eq!(ev.kind, EventKind::BootstrapFailed);
//! assert_eq!(ev.task.as_deref(), Some("warm-cache"));
//! assert_eq!(ev.index, Some(1));
//! assert_eq!(ev.total, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of sequencing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Bootstrap phase ===
    /// A bootstrap task is about to run.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `index`/`total`: position in the bootstrap list
    BootstrapStarting,

    /// A bootstrap task returned successfully.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `index`/`total`: position in the bootstrap list
    BootstrapCompleted,

    /// A bootstrap task failed; the sequence stops here.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `index`/`total`: position in the bootstrap list
    /// - `reason`: failure message
    BootstrapFailed,

    // === Registration phase ===
    /// A steady-state task was accepted by the supervisor.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `index`/`total`: position in the steady-state list
    TaskRegistered,

    /// The supervisor refused a steady-state task; the sequence stops here.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `index`/`total`: position in the steady-state list
    /// - `reason`: registrar error message
    RegistrationFailed,

    // === Terminal ===
    /// Every bootstrap task completed and every steady-state task was registered.
    ///
    /// Sets:
    /// - `total`: number of registered steady-state tasks
    SequenceCompleted,
}

/// Sequencing event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Zero-based position of the task within its phase.
    pub index: Option<usize>,
    /// Number of tasks in the phase.
    pub total: Option<usize>,
    /// Human-readable reason (error messages).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            index: None,
            total: None,
            reason: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches the task position within its phase.
    #[inline]
    pub fn with_position(mut self, index: usize, total: usize) -> Self {
        self.index = Some(index);
        self.total = Some(total);
        self
    }

    /// Attaches the phase size only.
    #[inline]
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
